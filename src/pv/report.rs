use crate::pv::node::Payload;
use crate::pv::{Kind, NodeId, PvTree, ScalarValue};

/// Serializable snapshot of one node and its structure children.
///
/// Built for diagnostics and tooling; this is a human-oriented dump, not a
/// wire representation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TreeReport {
	/// Full dotted name; empty at the root.
	pub name: String,
	/// Flat kind of the node.
	pub kind: Kind,
	/// First slot of the node's address interval.
	pub offset: u32,
	/// One past the last slot of the node's address interval.
	pub next_offset: u32,
	/// Rendered value for leaf-like nodes; `None` for structures.
	pub value: Option<String>,
	/// Reports of structure children, in declaration order.
	pub children: Vec<TreeReport>,
}

impl TreeReport {
	/// Snapshot a whole tree from its root.
	pub fn from_tree(tree: &PvTree) -> Self {
		Self::from_node(tree, tree.root())
	}

	/// Snapshot the subtree rooted at `id`.
	pub fn from_node(tree: &PvTree, id: NodeId) -> Self {
		let value = match &tree.node(id).payload {
			Payload::Scalar(value) => Some(render_scalar(value)),
			Payload::ScalarArray(values) => Some(format!("{}[{}]", values.element_kind(), values.len())),
			Payload::Structure(_) => None,
			Payload::StructureArray(elements) => Some(format!("structure[{}]", elements.len())),
			Payload::Union(value) => Some(match value.selector() {
				Some(selector) => format!("selected {selector}"),
				None => "unselected".to_owned(),
			}),
			Payload::UnionArray(values) => Some(format!("union[{}]", values.len())),
		};
		Self {
			name: tree.full_name(id),
			kind: tree.node(id).kind(),
			offset: tree.field_offset(id),
			next_offset: tree.next_field_offset(id),
			value,
			children: tree.children(id).iter().map(|child| Self::from_node(tree, *child)).collect(),
		}
	}
}

fn render_scalar(value: &ScalarValue) -> String {
	match value {
		ScalarValue::Boolean(v) => v.to_string(),
		ScalarValue::Byte(v) => v.to_string(),
		ScalarValue::Short(v) => v.to_string(),
		ScalarValue::Int(v) => v.to_string(),
		ScalarValue::Long(v) => v.to_string(),
		ScalarValue::UByte(v) => v.to_string(),
		ScalarValue::UShort(v) => v.to_string(),
		ScalarValue::UInt(v) => v.to_string(),
		ScalarValue::ULong(v) => v.to_string(),
		ScalarValue::Float(v) => v.to_string(),
		ScalarValue::Double(v) => v.to_string(),
		ScalarValue::String(v) => v.to_string(),
	}
}
