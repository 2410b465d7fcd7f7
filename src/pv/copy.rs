use crate::pv::node::Payload;
use crate::pv::{Kind, NodeId, PvError, PvTree, Result};

// Structural copy between two trees of matching shape. The checked entry
// point verifies immutability and kind at every level; the unchecked one
// assumes a caller already proved the shapes compatible and skips both
// checks through the whole recursion.
impl PvTree {
	/// Copy the value at `src` in `src_tree` onto `dst` in this tree.
	///
	/// Fails with [`PvError::ImmutableField`] before touching anything if the
	/// destination is immutable, and with [`PvError::TypeMismatch`] if the two
	/// kinds differ. A structure copies field by field in declaration order
	/// through this same checked entry point, so a failure partway leaves the
	/// fields copied before it in place.
	pub fn copy_from(&mut self, dst: NodeId, src_tree: &PvTree, src: NodeId) -> Result<()> {
		self.check_mutable(dst)?;
		let expected = self.node(dst).kind();
		let got = src_tree.node(src).kind();
		if expected != got {
			return Err(PvError::TypeMismatch { expected, got });
		}
		self.copy_dispatch(dst, src_tree, src, true)
	}

	/// Copy without the immutability and kind checks, at every level.
	///
	/// For callers that have already verified kind compatibility for the whole
	/// subtree. The closed payload representation still cannot cross kinds:
	/// a mismatched pair surfaces as [`PvError::TypeMismatch`] rather than
	/// undefined behavior.
	pub fn copy_from_unchecked(&mut self, dst: NodeId, src_tree: &PvTree, src: NodeId) -> Result<()> {
		self.copy_dispatch(dst, src_tree, src, false)
	}

	fn copy_dispatch(&mut self, dst: NodeId, src_tree: &PvTree, src: NodeId, checked: bool) -> Result<()> {
		let expected = self.node(dst).kind();
		let got = src_tree.node(src).kind();
		let mismatch = PvError::TypeMismatch { expected, got };

		match expected {
			Kind::Scalar => {
				let value = match &src_tree.node(src).payload {
					Payload::Scalar(value) => value.clone(),
					_ => return Err(mismatch),
				};
				match &mut self.node_mut(dst).payload {
					Payload::Scalar(slot) => slot.copy_from(&value)?,
					_ => return Err(PvError::TypeMismatch { expected, got }),
				}
			}
			Kind::ScalarArray => {
				let values = match &src_tree.node(src).payload {
					Payload::ScalarArray(values) => values.clone(),
					_ => return Err(mismatch),
				};
				match &mut self.node_mut(dst).payload {
					Payload::ScalarArray(slot) => slot.copy_from(&values)?,
					_ => return Err(PvError::TypeMismatch { expected, got }),
				}
			}
			Kind::Structure => {
				let dst_children = match &self.node(dst).payload {
					Payload::Structure(children) => children.clone(),
					_ => return Err(mismatch),
				};
				let src_children = match &src_tree.node(src).payload {
					Payload::Structure(children) => children.clone(),
					_ => return Err(mismatch),
				};
				if checked && dst_children.len() != src_children.len() {
					return Err(PvError::FieldCountMismatch {
						expected: dst_children.len(),
						got: src_children.len(),
					});
				}
				for (dst_child, src_child) in dst_children.into_iter().zip(src_children) {
					if checked {
						self.copy_from(dst_child, src_tree, src_child)?;
					} else {
						self.copy_from_unchecked(dst_child, src_tree, src_child)?;
					}
				}
				// Leaf copies fired their own notifications; the structure
				// node itself holds no payload of its own to report.
				return Ok(());
			}
			Kind::StructureArray => {
				if checked && self.node(dst).field != src_tree.node(src).field {
					return Err(PvError::DeclMismatch { kind: expected });
				}
				let elements = match &src_tree.node(src).payload {
					Payload::StructureArray(elements) => elements.clone(),
					_ => return Err(mismatch),
				};
				match &mut self.node_mut(dst).payload {
					Payload::StructureArray(slot) => *slot = elements,
					_ => return Err(PvError::TypeMismatch { expected, got }),
				}
			}
			Kind::Union => {
				if checked && self.node(dst).field != src_tree.node(src).field {
					return Err(PvError::DeclMismatch { kind: expected });
				}
				let value = match &src_tree.node(src).payload {
					Payload::Union(value) => value.clone(),
					_ => return Err(mismatch),
				};
				match &mut self.node_mut(dst).payload {
					Payload::Union(slot) => *slot = value,
					_ => return Err(PvError::TypeMismatch { expected, got }),
				}
			}
			Kind::UnionArray => {
				if checked && self.node(dst).field != src_tree.node(src).field {
					return Err(PvError::DeclMismatch { kind: expected });
				}
				let values = match &src_tree.node(src).payload {
					Payload::UnionArray(values) => values.clone(),
					_ => return Err(mismatch),
				};
				match &mut self.node_mut(dst).payload {
					Payload::UnionArray(slot) => *slot = values,
					_ => return Err(PvError::TypeMismatch { expected, got }),
				}
			}
		}
		self.post(dst);
		Ok(())
	}
}
