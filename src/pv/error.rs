use thiserror::Error;

use crate::pv::{Kind, ScalarKind};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PvError>;

/// Errors produced while declaring, building, mutating, and copying value trees.
#[derive(Debug, Error)]
pub enum PvError {
	/// Checked copy or typed access across differing value kinds.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Kind required by the destination or accessor.
		expected: Kind,
		/// Kind actually present on the source.
		got: Kind,
	},
	/// Copy between arrays or unions whose declarations differ structurally.
	#[error("declaration mismatch in {kind} copy")]
	DeclMismatch {
		/// Kind of the node being copied.
		kind: Kind,
	},
	/// Checked structure copy across differing child counts.
	#[error("field count mismatch: expected {expected}, got {got}")]
	FieldCountMismatch {
		/// Child count of the destination structure.
		expected: usize,
		/// Child count of the source structure.
		got: usize,
	},
	/// Mutation or checked copy targeting an immutable field.
	#[error("field is immutable: {name}")]
	ImmutableField {
		/// Full dotted name of the immutable field.
		name: String,
	},
	/// A different post handler is already registered on the field.
	#[error("a post handler is already registered on {name}")]
	HandlerAlreadyRegistered {
		/// Full dotted name of the field.
		name: String,
	},
	/// No conversion exists between the two scalar kinds.
	#[error("no scalar conversion from {from} to {to}")]
	ScalarConversion {
		/// Scalar kind of the source value.
		from: ScalarKind,
		/// Scalar kind of the destination container.
		to: ScalarKind,
	},
	/// Structure or union declaration repeats a member name.
	#[error("duplicate field name: {name}")]
	DuplicateFieldName {
		/// The repeated member name.
		name: String,
	},
	/// Structure or union declaration contains an empty member name.
	#[error("empty field name in declaration")]
	EmptyFieldName,
	/// Union selector outside the declared member range.
	#[error("union member index {index} out of range ({count} members)")]
	NoSuchMember {
		/// Requested member index.
		index: usize,
		/// Number of declared members.
		count: usize,
	},
	/// Tree construction exceeded the configured nesting depth.
	#[error("descriptor depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Tree construction exceeded the configured node budget.
	#[error("tree node budget exceeded (max={max_nodes})")]
	TooManyNodes {
		/// Configured node ceiling.
		max_nodes: usize,
	},
}
