use std::fmt;
use std::sync::Arc;

use crate::pv::node::Payload;
use crate::pv::{
	Field, Kind, LifecycleMetrics, NodeId, PostHandler, PvError, PvNode, Result, ScalarArrayValue, ScalarValue, UnionValue,
};

/// Label under which trees report to a lifecycle metrics collector.
pub const TREE_METRICS_LABEL: &str = "pvTree";

/// Construction limits for value trees.
#[derive(Debug, Clone)]
pub struct TreeOptions {
	/// Maximum descriptor nesting depth.
	pub max_depth: u32,
	/// Maximum total node count in one tree.
	pub max_nodes: usize,
}

impl Default for TreeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_nodes: 65_536,
		}
	}
}

/// A value tree: one arena of nodes built from a shared type descriptor.
///
/// Slot 0 is the root; nodes are stored in pre-order with children in
/// declaration order. The shape is fixed at construction: array elements may
/// be replaced wholesale, but no node is ever attached or detached. The tree
/// is not internally synchronized; concurrent access must be serialized by
/// the caller.
pub struct PvTree {
	pub(crate) nodes: Vec<PvNode>,
	metrics: Option<Arc<dyn LifecycleMetrics>>,
}

impl PvTree {
	/// Build a default-valued tree for a descriptor with default limits.
	pub fn new(field: Arc<Field>) -> Result<Self> {
		Self::with_options(field, &TreeOptions::default())
	}

	/// Build a default-valued tree for a descriptor with explicit limits.
	pub fn with_options(field: Arc<Field>, options: &TreeOptions) -> Result<Self> {
		let mut nodes = Vec::new();
		build_node(&mut nodes, field, "", None, 0, options)?;
		Ok(Self { nodes, metrics: None })
	}

	/// Build a tree that reports construction and destruction to `metrics`.
	pub fn with_metrics(field: Arc<Field>, options: &TreeOptions, metrics: Arc<dyn LifecycleMetrics>) -> Result<Self> {
		let mut tree = Self::with_options(field, options)?;
		metrics.constructed(TREE_METRICS_LABEL);
		tree.metrics = Some(metrics);
		Ok(tree)
	}

	/// Handle of the root node.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Total node count.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always `false`: a tree has at least its root.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Borrow a node. The handle must come from this tree.
	pub fn node(&self, id: NodeId) -> &PvNode {
		&self.nodes[id.index()]
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PvNode {
		&mut self.nodes[id.index()]
	}

	/// Iterate all node handles in pre-order.
	pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		(0..self.nodes.len()).map(|index| NodeId(index as u32))
	}

	/// Child handles of a structure node; empty for every other kind.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		match &self.node(id).payload {
			Payload::Structure(children) => children,
			_ => &[],
		}
	}

	/// Look up a direct child of a structure node by name.
	pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
		self.children(id).iter().copied().find(|child| self.node(*child).name() == name)
	}

	/// Resolve a dotted path of structure member names from the root.
	pub fn lookup(&self, path: &str) -> Option<NodeId> {
		if path.is_empty() {
			return None;
		}
		let mut current = self.root();
		for segment in path.split('.') {
			current = self.child_by_name(current, segment)?;
		}
		Some(current)
	}

	/// Dotted name from the nearest root down to this node.
	///
	/// Walks parent handles upward, stopping at the first ancestor with an
	/// empty name. The root's own full name is empty.
	pub fn full_name(&self, id: NodeId) -> String {
		let mut name = self.node(id).name.to_string();
		let mut current = self.node(id).parent;
		while let Some(parent_id) = current {
			let parent = self.node(parent_id);
			if parent.name.is_empty() {
				break;
			}
			name = format!("{}.{}", parent.name, name);
			current = parent.parent;
		}
		name
	}

	/// Seal a node and its entire subtree against mutation.
	///
	/// One-way and idempotent. Elements of structure and union arrays below
	/// the node are sealed along with it.
	pub fn set_immutable(&mut self, id: NodeId) {
		let mut stack = vec![id];
		while let Some(current) = stack.pop() {
			let node = &mut self.nodes[current.index()];
			node.immutable = true;
			match &mut node.payload {
				Payload::Structure(children) => stack.extend(children.iter().copied()),
				Payload::StructureArray(elements) => {
					for element in elements {
						let root = element.root();
						element.set_immutable(root);
					}
				}
				Payload::Union(value) => {
					if let Some(tree) = &mut value.value {
						let root = tree.root();
						tree.set_immutable(root);
					}
				}
				Payload::UnionArray(values) => {
					for value in values {
						if let Some(tree) = &mut value.value {
							let root = tree.root();
							tree.set_immutable(root);
						}
					}
				}
				Payload::Scalar(_) | Payload::ScalarArray(_) => {}
			}
		}
	}

	/// Register the node's single post handler.
	///
	/// Re-registering the same handler instance is a silent success; a
	/// different handler fails without replacing the existing one.
	pub fn register_post_handler(&mut self, id: NodeId, handler: Arc<dyn PostHandler>) -> Result<()> {
		if let Some(existing) = &self.node(id).post_handler {
			if Arc::ptr_eq(existing, &handler) {
				return Ok(());
			}
			return Err(PvError::HandlerAlreadyRegistered { name: self.full_name(id) });
		}
		self.node_mut(id).post_handler = Some(handler);
		Ok(())
	}

	/// Invoke the node's post handler if one is registered.
	///
	/// Every mutating operation on this tree calls this after a successful
	/// change; collaborators holding external payload state do the same.
	pub fn post(&self, id: NodeId) {
		if let Some(handler) = &self.node(id).post_handler {
			handler.post_put();
		}
	}

	/// Borrow a scalar node's value.
	pub fn scalar(&self, id: NodeId) -> Result<&ScalarValue> {
		match &self.node(id).payload {
			Payload::Scalar(value) => Ok(value),
			_ => Err(self.kind_mismatch(id, Kind::Scalar)),
		}
	}

	/// Assign a scalar node's value, converting across numeric kinds.
	pub fn set_scalar(&mut self, id: NodeId, value: ScalarValue) -> Result<()> {
		self.check_mutable(id)?;
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::Scalar(slot) => slot.copy_from(&value)?,
			_ => return Err(PvError::TypeMismatch { expected: Kind::Scalar, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Borrow a scalar-array node's value.
	pub fn scalar_array(&self, id: NodeId) -> Result<&ScalarArrayValue> {
		match &self.node(id).payload {
			Payload::ScalarArray(value) => Ok(value),
			_ => Err(self.kind_mismatch(id, Kind::ScalarArray)),
		}
	}

	/// Replace a scalar-array node's contents; element kinds must match.
	pub fn set_scalar_array(&mut self, id: NodeId, values: ScalarArrayValue) -> Result<()> {
		self.check_mutable(id)?;
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::ScalarArray(slot) => slot.copy_from(&values)?,
			_ => return Err(PvError::TypeMismatch { expected: Kind::ScalarArray, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Borrow a structure-array node's elements.
	pub fn struct_array(&self, id: NodeId) -> Result<&[PvTree]> {
		match &self.node(id).payload {
			Payload::StructureArray(elements) => Ok(elements),
			_ => Err(self.kind_mismatch(id, Kind::StructureArray)),
		}
	}

	/// Replace a structure-array node's elements.
	///
	/// Every element must be a tree of the declared element structure.
	pub fn set_struct_array(&mut self, id: NodeId, elements: Vec<PvTree>) -> Result<()> {
		self.check_mutable(id)?;
		let declared = match self.node(id).field.as_ref() {
			Field::StructureArray(decl) => decl.clone(),
			_ => return Err(self.kind_mismatch(id, Kind::StructureArray)),
		};
		for element in &elements {
			let matches = matches!(
				element.node(element.root()).field.as_ref(),
				Field::Structure(decl) if *decl == declared
			);
			if !matches {
				return Err(PvError::DeclMismatch { kind: Kind::StructureArray });
			}
		}
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::StructureArray(slot) => *slot = elements,
			_ => return Err(PvError::TypeMismatch { expected: Kind::StructureArray, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Build one default-valued element for a structure-array node.
	pub fn make_struct_element(&self, id: NodeId) -> Result<PvTree> {
		match self.node(id).field.as_ref() {
			Field::StructureArray(decl) => PvTree::new(Field::structure_from(decl.clone())),
			_ => Err(self.kind_mismatch(id, Kind::StructureArray)),
		}
	}

	/// Borrow a union node's value.
	pub fn union_value(&self, id: NodeId) -> Result<&UnionValue> {
		match &self.node(id).payload {
			Payload::Union(value) => Ok(value),
			_ => Err(self.kind_mismatch(id, Kind::Union)),
		}
	}

	/// Choose a union member, installing a default-valued tree for it.
	pub fn select_union(&mut self, id: NodeId, member: usize) -> Result<()> {
		self.check_mutable(id)?;
		let declared = match self.node(id).field.as_ref() {
			Field::Union(decl) => decl.clone(),
			_ => return Err(self.kind_mismatch(id, Kind::Union)),
		};
		let member_field = declared.members.get(member).ok_or(PvError::NoSuchMember {
			index: member,
			count: declared.members.len(),
		})?;
		let value = PvTree::new(member_field.field.clone())?;
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::Union(slot) => *slot = UnionValue::selected(member, value),
			_ => return Err(PvError::TypeMismatch { expected: Kind::Union, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Choose a union member and store the given value tree for it.
	pub fn set_union(&mut self, id: NodeId, member: usize, value: PvTree) -> Result<()> {
		self.check_mutable(id)?;
		let declared = match self.node(id).field.as_ref() {
			Field::Union(decl) => decl.clone(),
			_ => return Err(self.kind_mismatch(id, Kind::Union)),
		};
		let member_field = declared.members.get(member).ok_or(PvError::NoSuchMember {
			index: member,
			count: declared.members.len(),
		})?;
		if value.node(value.root()).field != member_field.field {
			return Err(PvError::DeclMismatch { kind: Kind::Union });
		}
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::Union(slot) => *slot = UnionValue::selected(member, value),
			_ => return Err(PvError::TypeMismatch { expected: Kind::Union, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Return a union node to the unselected state.
	pub fn clear_union(&mut self, id: NodeId) -> Result<()> {
		self.check_mutable(id)?;
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::Union(slot) => *slot = UnionValue::unselected(),
			_ => return Err(PvError::TypeMismatch { expected: Kind::Union, got }),
		}
		self.post(id);
		Ok(())
	}

	/// Borrow a union-array node's elements.
	pub fn union_array(&self, id: NodeId) -> Result<&[UnionValue]> {
		match &self.node(id).payload {
			Payload::UnionArray(values) => Ok(values),
			_ => Err(self.kind_mismatch(id, Kind::UnionArray)),
		}
	}

	/// Replace a union-array node's elements.
	///
	/// Each selected element must pair an in-range selector with a value tree
	/// of that member's declared type.
	pub fn set_union_array(&mut self, id: NodeId, values: Vec<UnionValue>) -> Result<()> {
		self.check_mutable(id)?;
		let declared = match self.node(id).field.as_ref() {
			Field::UnionArray(decl) => decl.clone(),
			_ => return Err(self.kind_mismatch(id, Kind::UnionArray)),
		};
		for value in &values {
			let Some(selector) = value.selector else { continue };
			let member_field = declared.members.get(selector).ok_or(PvError::NoSuchMember {
				index: selector,
				count: declared.members.len(),
			})?;
			let matches = value
				.value
				.as_ref()
				.is_some_and(|tree| tree.node(tree.root()).field == member_field.field);
			if !matches {
				return Err(PvError::DeclMismatch { kind: Kind::UnionArray });
			}
		}
		let got = self.node(id).kind();
		match &mut self.node_mut(id).payload {
			Payload::UnionArray(slot) => *slot = values,
			_ => return Err(PvError::TypeMismatch { expected: Kind::UnionArray, got }),
		}
		self.post(id);
		Ok(())
	}

	pub(crate) fn check_mutable(&self, id: NodeId) -> Result<()> {
		if self.node(id).immutable {
			return Err(PvError::ImmutableField { name: self.full_name(id) });
		}
		Ok(())
	}

	pub(crate) fn kind_mismatch(&self, id: NodeId, expected: Kind) -> PvError {
		PvError::TypeMismatch {
			expected,
			got: self.node(id).kind(),
		}
	}
}

fn build_node(
	nodes: &mut Vec<PvNode>,
	field: Arc<Field>,
	name: &str,
	parent: Option<NodeId>,
	depth: u32,
	options: &TreeOptions,
) -> Result<NodeId> {
	if depth >= options.max_depth {
		return Err(PvError::DepthExceeded {
			max_depth: options.max_depth,
		});
	}
	if nodes.len() >= options.max_nodes {
		return Err(PvError::TooManyNodes {
			max_nodes: options.max_nodes,
		});
	}

	let id = NodeId(nodes.len() as u32);
	let boxed_name = name.to_owned().into_boxed_str();
	match field.as_ref() {
		Field::Scalar(kind) => {
			let payload = Payload::Scalar(ScalarValue::default_for(*kind));
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, payload));
		}
		Field::ScalarArray(kind) => {
			let payload = Payload::ScalarArray(ScalarArrayValue::empty(*kind));
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, payload));
		}
		Field::Structure(decl) => {
			let decl = decl.clone();
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, Payload::Structure(Vec::new())));
			let mut children = Vec::with_capacity(decl.fields.len());
			for member in &decl.fields {
				children.push(build_node(nodes, member.field.clone(), &member.name, Some(id), depth + 1, options)?);
			}
			if let Payload::Structure(slot) = &mut nodes[id.index()].payload {
				*slot = children;
			}
		}
		Field::StructureArray(_) => {
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, Payload::StructureArray(Vec::new())));
		}
		Field::Union(_) => {
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, Payload::Union(UnionValue::unselected())));
		}
		Field::UnionArray(_) => {
			nodes.push(PvNode::new(field.clone(), boxed_name, parent, Payload::UnionArray(Vec::new())));
		}
	}
	Ok(id)
}

impl Clone for PvTree {
	fn clone(&self) -> Self {
		if let Some(metrics) = &self.metrics {
			metrics.constructed(TREE_METRICS_LABEL);
		}
		Self {
			nodes: self.nodes.clone(),
			metrics: self.metrics.clone(),
		}
	}
}

impl Drop for PvTree {
	fn drop(&mut self) {
		if let Some(metrics) = &self.metrics {
			metrics.destroyed(TREE_METRICS_LABEL);
		}
	}
}

// Value equality over shape and payloads; instance state does not compare.
impl PartialEq for PvTree {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes
	}
}

impl fmt::Debug for PvTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PvTree").field("nodes", &self.nodes).finish_non_exhaustive()
	}
}
