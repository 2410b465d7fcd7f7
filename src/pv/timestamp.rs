use crate::pv::{Field, NodeId, PvTree, Result, ScalarKind, ScalarValue};

const NANOS_PER_SECOND: i32 = 1_000_000_000;
const MILLIS_PER_SECOND: i64 = 1_000;
const NANOS_PER_MILLI: i32 = 1_000_000;

/// Point in time as seconds past the epoch plus a normalized nanosecond part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeStamp {
	seconds_past_epoch: i64,
	nanoseconds: i32,
	user_tag: i32,
}

impl TimeStamp {
	/// Time stamp from seconds and nanoseconds; nanoseconds are normalized
	/// into `[0, 1_000_000_000)` with the carry folded into the seconds.
	pub fn new(seconds_past_epoch: i64, nanoseconds: i32) -> Self {
		let carry = nanoseconds.div_euclid(NANOS_PER_SECOND);
		Self {
			seconds_past_epoch: seconds_past_epoch + i64::from(carry),
			nanoseconds: nanoseconds.rem_euclid(NANOS_PER_SECOND),
			user_tag: 0,
		}
	}

	/// Time stamp from a millisecond count past the epoch.
	pub fn from_millis(milliseconds: i64) -> Self {
		Self {
			seconds_past_epoch: milliseconds.div_euclid(MILLIS_PER_SECOND),
			nanoseconds: milliseconds.rem_euclid(MILLIS_PER_SECOND) as i32 * NANOS_PER_MILLI,
			user_tag: 0,
		}
	}

	/// Milliseconds past the epoch.
	pub fn to_millis(self) -> i64 {
		self.seconds_past_epoch * MILLIS_PER_SECOND + i64::from(self.nanoseconds / NANOS_PER_MILLI)
	}

	/// Seconds past the epoch.
	pub fn seconds_past_epoch(self) -> i64 {
		self.seconds_past_epoch
	}

	/// Nanosecond part, always in `[0, 1_000_000_000)`.
	pub fn nanoseconds(self) -> i32 {
		self.nanoseconds
	}

	/// Caller-defined tag carried alongside the time.
	pub fn user_tag(self) -> i32 {
		self.user_tag
	}

	/// Set the caller-defined tag.
	pub fn set_user_tag(&mut self, user_tag: i32) {
		self.user_tag = user_tag;
	}
}

/// Accessor binding the conventional time structure
/// `{secondsPastEpoch: long, nanoseconds: int, userTag: int}` on one tree.
///
/// Attach resolves the three member handles once; a tree's shape is fixed, so
/// they stay valid for the tree's lifetime. Reads and writes go through the
/// tree, so immutability and post handlers apply as usual.
#[derive(Debug, Clone, Copy)]
pub struct PvTimeStamp {
	seconds: NodeId,
	nanoseconds: NodeId,
	user_tag: NodeId,
}

impl PvTimeStamp {
	/// Bind to the time structure at `id`, or `None` when the shape does not
	/// match the convention.
	pub fn attach(tree: &PvTree, id: NodeId) -> Option<Self> {
		let seconds = scalar_child(tree, id, "secondsPastEpoch", ScalarKind::Long)?;
		let nanoseconds = scalar_child(tree, id, "nanoseconds", ScalarKind::Int)?;
		let user_tag = scalar_child(tree, id, "userTag", ScalarKind::Int)?;
		Some(Self {
			seconds,
			nanoseconds,
			user_tag,
		})
	}

	/// Read the bound fields into a [`TimeStamp`].
	pub fn get(&self, tree: &PvTree) -> TimeStamp {
		let seconds = match tree.scalar(self.seconds) {
			Ok(ScalarValue::Long(value)) => *value,
			_ => 0,
		};
		let nanoseconds = match tree.scalar(self.nanoseconds) {
			Ok(ScalarValue::Int(value)) => *value,
			_ => 0,
		};
		let user_tag = match tree.scalar(self.user_tag) {
			Ok(ScalarValue::Int(value)) => *value,
			_ => 0,
		};
		let mut stamp = TimeStamp::new(seconds, nanoseconds);
		stamp.set_user_tag(user_tag);
		stamp
	}

	/// Write a [`TimeStamp`] into the bound fields.
	pub fn set(&self, tree: &mut PvTree, stamp: TimeStamp) -> Result<()> {
		tree.set_scalar(self.seconds, ScalarValue::Long(stamp.seconds_past_epoch()))?;
		tree.set_scalar(self.nanoseconds, ScalarValue::Int(stamp.nanoseconds()))?;
		tree.set_scalar(self.user_tag, ScalarValue::Int(stamp.user_tag()))?;
		Ok(())
	}
}

fn scalar_child(tree: &PvTree, id: NodeId, name: &str, kind: ScalarKind) -> Option<NodeId> {
	let child = tree.child_by_name(id, name)?;
	match tree.node(child).field().as_ref() {
		Field::Scalar(found) if *found == kind => Some(child),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::{PvTimeStamp, TimeStamp};
	use crate::pv::{Field, PvTree, ScalarKind, ScalarValue};

	fn time_field() -> Arc<Field> {
		Field::structure(vec![
			("secondsPastEpoch", Field::scalar(ScalarKind::Long)),
			("nanoseconds", Field::scalar(ScalarKind::Int)),
			("userTag", Field::scalar(ScalarKind::Int)),
		])
		.expect("decl builds")
	}

	#[test]
	fn nanoseconds_normalize_into_seconds() {
		let stamp = TimeStamp::new(10, 1_500_000_000);
		assert_eq!(stamp.seconds_past_epoch(), 11);
		assert_eq!(stamp.nanoseconds(), 500_000_000);

		let negative = TimeStamp::new(10, -1);
		assert_eq!(negative.seconds_past_epoch(), 9);
		assert_eq!(negative.nanoseconds(), 999_999_999);
	}

	#[test]
	fn millisecond_round_trip() {
		let stamp = TimeStamp::from_millis(-1_250);
		assert_eq!(stamp.seconds_past_epoch(), -2);
		assert_eq!(stamp.nanoseconds(), 750_000_000);
		assert_eq!(stamp.to_millis(), -1_250);
	}

	#[test]
	fn attach_requires_the_conventional_shape() {
		let tree = PvTree::new(time_field()).expect("tree builds");
		assert!(PvTimeStamp::attach(&tree, tree.root()).is_some());

		let scalar = PvTree::new(Field::scalar(ScalarKind::Long)).expect("tree builds");
		assert!(PvTimeStamp::attach(&scalar, scalar.root()).is_none());

		let partial = Field::structure(vec![
			("secondsPastEpoch", Field::scalar(ScalarKind::Long)),
			("nanoseconds", Field::scalar(ScalarKind::Int)),
		])
		.expect("decl builds");
		let partial_tree = PvTree::new(partial).expect("tree builds");
		assert!(PvTimeStamp::attach(&partial_tree, partial_tree.root()).is_none());
	}

	#[test]
	fn set_then_get_round_trips_through_the_tree() {
		let mut tree = PvTree::new(time_field()).expect("tree builds");
		let accessor = PvTimeStamp::attach(&tree, tree.root()).expect("attach succeeds");

		let mut stamp = TimeStamp::new(1_700_000_000, 42);
		stamp.set_user_tag(7);
		accessor.set(&mut tree, stamp).expect("set succeeds");
		assert_eq!(accessor.get(&tree), stamp);

		let seconds = tree.lookup("secondsPastEpoch").expect("field resolves");
		assert_eq!(tree.scalar(seconds).expect("scalar reads"), &ScalarValue::Long(1_700_000_000));
	}

	#[test]
	fn set_respects_immutability() {
		let mut tree = PvTree::new(time_field()).expect("tree builds");
		let accessor = PvTimeStamp::attach(&tree, tree.root()).expect("attach succeeds");
		let root = tree.root();
		tree.set_immutable(root);
		assert!(accessor.set(&mut tree, TimeStamp::new(1, 0)).is_err());
	}
}
