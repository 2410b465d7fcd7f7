use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use crate::pv::{Field, Kind, PostHandler, PvTree, ScalarArrayValue, ScalarValue};

/// Handle to one node in a tree's arena.
///
/// Handles are only meaningful on the tree that produced them; a tree's shape
/// is fixed at construction, so a handle stays valid for the tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

/// Kind-specific value storage of one node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
	Scalar(ScalarValue),
	ScalarArray(ScalarArrayValue),
	Structure(Vec<NodeId>),
	StructureArray(Vec<PvTree>),
	Union(UnionValue),
	UnionArray(Vec<UnionValue>),
}

/// Value of a union node: the chosen member index and its value tree.
///
/// A freshly built union is unselected and holds neither.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
	pub(crate) selector: Option<usize>,
	pub(crate) value: Option<PvTree>,
}

impl UnionValue {
	/// Union value with no member chosen.
	pub fn unselected() -> Self {
		Self {
			selector: None,
			value: None,
		}
	}

	/// Union value choosing member `selector` with the given value tree.
	///
	/// The pairing of selector and tree shape is validated when the value is
	/// stored into a node, not here.
	pub fn selected(selector: usize, value: PvTree) -> Self {
		Self {
			selector: Some(selector),
			value: Some(value),
		}
	}

	/// Chosen member index, if any.
	pub fn selector(&self) -> Option<usize> {
		self.selector
	}

	/// Value tree of the chosen member, if any.
	pub fn value(&self) -> Option<&PvTree> {
		self.value.as_ref()
	}
}

/// One value node: a descriptor reference plus instance state.
pub struct PvNode {
	pub(crate) field: Arc<Field>,
	pub(crate) name: Box<str>,
	pub(crate) parent: Option<NodeId>,
	// next_field_offset 0 means the numbering has not been computed yet.
	pub(crate) field_offset: Cell<u32>,
	pub(crate) next_field_offset: Cell<u32>,
	pub(crate) immutable: bool,
	pub(crate) post_handler: Option<Arc<dyn PostHandler>>,
	pub(crate) payload: Payload,
}

impl PvNode {
	pub(crate) fn new(field: Arc<Field>, name: Box<str>, parent: Option<NodeId>, payload: Payload) -> Self {
		Self {
			field,
			name,
			parent,
			field_offset: Cell::new(0),
			next_field_offset: Cell::new(0),
			immutable: false,
			post_handler: None,
			payload,
		}
	}

	/// Shared descriptor this node is bound to; fixed for the node's lifetime.
	pub fn field(&self) -> &Arc<Field> {
		&self.field
	}

	/// Flat kind of the node's descriptor.
	pub fn kind(&self) -> Kind {
		self.field.kind()
	}

	/// Name assigned by the parent at build time; empty at a root.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Non-owning handle to the parent node; `None` at a root.
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// Return `true` once the node has been sealed against mutation.
	pub fn is_immutable(&self) -> bool {
		self.immutable
	}
}

// Clones carry values and the immutability flag but are fresh instances:
// hook registrations do not follow, and the offset cache restarts unset.
impl Clone for PvNode {
	fn clone(&self) -> Self {
		Self {
			field: self.field.clone(),
			name: self.name.clone(),
			parent: self.parent,
			field_offset: Cell::new(0),
			next_field_offset: Cell::new(0),
			immutable: self.immutable,
			post_handler: None,
			payload: self.payload.clone(),
		}
	}
}

// Value equality: descriptor, name, position, and payload. Offsets, the
// immutability flag, and hook registrations are instance state, not value.
impl PartialEq for PvNode {
	fn eq(&self, other: &Self) -> bool {
		self.field == other.field && self.name == other.name && self.parent == other.parent && self.payload == other.payload
	}
}

impl fmt::Debug for PvNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PvNode")
			.field("name", &self.name)
			.field("kind", &self.kind())
			.field("offsets", &(self.field_offset.get(), self.next_field_offset.get()))
			.field("immutable", &self.immutable)
			.field("payload", &self.payload)
			.finish_non_exhaustive()
	}
}
