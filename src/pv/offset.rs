use crate::pv::{Kind, NodeId, PvTree};

// Flat pre-order addressing. Every node owns a contiguous slot interval
// [field_offset, next_field_offset): non-structure nodes take one slot,
// a structure spans itself plus its whole subtree, and the root owns
// offset 0. The numbering is computed for the whole tree on the first
// query and cached on every node; a tree's shape never changes after
// construction, so the cache is never invalidated.
impl PvTree {
	/// First slot of the node's address interval.
	///
	/// Computes the whole tree's numbering on first use.
	pub fn field_offset(&self, id: NodeId) -> u32 {
		self.ensure_offsets(id);
		self.node(id).field_offset.get()
	}

	/// One past the last slot of the node's address interval.
	///
	/// Computes the whole tree's numbering on first use.
	pub fn next_field_offset(&self, id: NodeId) -> u32 {
		self.ensure_offsets(id);
		self.node(id).next_field_offset.get()
	}

	/// Address interval width: the number of slots the node's subtree spans.
	pub fn slot_count(&self, id: NodeId) -> u32 {
		self.ensure_offsets(id);
		let node = self.node(id);
		node.next_field_offset.get() - node.field_offset.get()
	}

	/// Find the node whose interval starts exactly at `offset`.
	///
	/// The arena is stored in pre-order, so start offsets are strictly
	/// increasing and a binary search resolves the slot directly.
	pub fn node_at_offset(&self, offset: u32) -> Option<NodeId> {
		self.ensure_offsets(self.root());
		let index = self.nodes.partition_point(|node| node.field_offset.get() < offset);
		let node = self.nodes.get(index)?;
		if node.field_offset.get() == offset {
			Some(NodeId(index as u32))
		} else {
			None
		}
	}

	fn ensure_offsets(&self, id: NodeId) {
		if self.node(id).next_field_offset.get() == 0 {
			self.compute_offsets();
		}
	}

	// Number the entire tree from its root. A standalone non-structure
	// root is the one special case: it owns [0, 1) directly.
	fn compute_offsets(&self) {
		let root = self.node(self.root());
		if root.field.kind() != Kind::Structure {
			root.field_offset.set(0);
			root.next_field_offset.set(1);
			return;
		}
		self.assign_structure(self.root(), 0);
	}

	// Assign a structure node's interval starting at `offset`; children are
	// visited depth-first in declaration order. Returns the interval end.
	fn assign_structure(&self, id: NodeId, offset: u32) -> u32 {
		let mut next = offset + 1;
		for &child in self.children(id) {
			let child_offset = next;
			let node = self.node(child);
			if node.field.kind() == Kind::Structure {
				next = self.assign_structure(child, child_offset);
			} else {
				next = child_offset + 1;
				node.field_offset.set(child_offset);
				node.next_field_offset.set(next);
			}
		}
		let node = self.node(id);
		node.field_offset.set(offset);
		node.next_field_offset.set(next);
		next
	}
}

#[cfg(test)]
mod tests {
	use crate::pv::{Field, PvTree, ScalarKind};

	#[test]
	fn standalone_scalar_root_owns_one_slot() {
		let tree = PvTree::new(Field::scalar(ScalarKind::Double)).expect("tree builds");
		let root = tree.root();
		assert_eq!(tree.field_offset(root), 0);
		assert_eq!(tree.next_field_offset(root), 1);
		assert_eq!(tree.slot_count(root), 1);
	}

	#[test]
	fn empty_structure_root_still_owns_offset_zero() {
		let field = Field::structure(Vec::new()).expect("decl builds");
		let tree = PvTree::new(field).expect("tree builds");
		assert_eq!(tree.field_offset(tree.root()), 0);
		assert_eq!(tree.next_field_offset(tree.root()), 1);
	}

	#[test]
	fn leaf_like_kinds_take_one_slot_each() {
		let inner = Field::structure(vec![("x", Field::scalar(ScalarKind::Int))]).expect("decl builds");
		let field = Field::structure(vec![
			("values", Field::scalar_array(ScalarKind::Double)),
			("choice", Field::union_of(vec![("i", Field::scalar(ScalarKind::Int))]).expect("union builds")),
			("nested", inner),
		])
		.expect("decl builds");
		let tree = PvTree::new(field).expect("tree builds");

		let values = tree.lookup("values").expect("values resolves");
		let choice = tree.lookup("choice").expect("choice resolves");
		let nested = tree.lookup("nested").expect("nested resolves");
		assert_eq!((tree.field_offset(values), tree.next_field_offset(values)), (1, 2));
		assert_eq!((tree.field_offset(choice), tree.next_field_offset(choice)), (2, 3));
		assert_eq!((tree.field_offset(nested), tree.next_field_offset(nested)), (3, 5));
		assert_eq!(tree.next_field_offset(tree.root()), 5);
	}
}
