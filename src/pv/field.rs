use std::fmt;
use std::sync::Arc;

use crate::pv::{PvError, Result};

/// The six value kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
	/// Single scalar value.
	Scalar,
	/// Variable-length array of one scalar kind.
	ScalarArray,
	/// Ordered, named collection of sub-fields.
	Structure,
	/// Variable-length array of one structure shape.
	StructureArray,
	/// Discriminated choice between declared members.
	Union,
	/// Variable-length array of one union shape.
	UnionArray,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Kind::Scalar => "scalar",
			Kind::ScalarArray => "scalarArray",
			Kind::Structure => "structure",
			Kind::StructureArray => "structureArray",
			Kind::Union => "union",
			Kind::UnionArray => "unionArray",
		};
		f.write_str(name)
	}
}

/// Scalar element types carried by scalar fields and scalar arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
	/// Truth value.
	Boolean,
	/// Signed 8-bit integer.
	Byte,
	/// Signed 16-bit integer.
	Short,
	/// Signed 32-bit integer.
	Int,
	/// Signed 64-bit integer.
	Long,
	/// Unsigned 8-bit integer.
	UByte,
	/// Unsigned 16-bit integer.
	UShort,
	/// Unsigned 32-bit integer.
	UInt,
	/// Unsigned 64-bit integer.
	ULong,
	/// 32-bit float.
	Float,
	/// 64-bit float.
	Double,
	/// UTF-8 string.
	String,
}

impl ScalarKind {
	/// Return `true` for the ten numeric kinds (everything except boolean and string).
	pub const fn is_numeric(self) -> bool {
		!matches!(self, ScalarKind::Boolean | ScalarKind::String)
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ScalarKind::Boolean => "boolean",
			ScalarKind::Byte => "byte",
			ScalarKind::Short => "short",
			ScalarKind::Int => "int",
			ScalarKind::Long => "long",
			ScalarKind::UByte => "ubyte",
			ScalarKind::UShort => "ushort",
			ScalarKind::UInt => "uint",
			ScalarKind::ULong => "ulong",
			ScalarKind::Float => "float",
			ScalarKind::Double => "double",
			ScalarKind::String => "string",
		};
		f.write_str(name)
	}
}

/// One named member inside a structure or union declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
	/// Member name, unique within its declaration.
	pub name: Box<str>,
	/// Member type descriptor.
	pub field: Arc<Field>,
}

/// Ordered member list of a structure shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
	/// Member declarations in source order.
	pub fields: Vec<FieldDecl>,
}

impl StructDecl {
	/// Build a declaration, rejecting empty and duplicate member names.
	pub fn new(fields: Vec<(&str, Arc<Field>)>) -> Result<Self> {
		Ok(Self {
			fields: check_members(fields)?,
		})
	}

	/// Look up a member slot by name.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|decl| &*decl.name == name)
	}

	/// Number of declared members.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Return `true` when no members are declared.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Ordered member list of a union shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDecl {
	/// Member declarations in source order.
	pub members: Vec<FieldDecl>,
}

impl UnionDecl {
	/// Build a declaration, rejecting empty and duplicate member names.
	pub fn new(members: Vec<(&str, Arc<Field>)>) -> Result<Self> {
		Ok(Self {
			members: check_members(members)?,
		})
	}

	/// Look up a member slot by name.
	pub fn member_index(&self, name: &str) -> Option<usize> {
		self.members.iter().position(|decl| &*decl.name == name)
	}

	/// Number of declared members.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Return `true` when no members are declared.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}
}

fn check_members(members: Vec<(&str, Arc<Field>)>) -> Result<Vec<FieldDecl>> {
	let mut out: Vec<FieldDecl> = Vec::with_capacity(members.len());
	for (name, field) in members {
		if name.is_empty() {
			return Err(PvError::EmptyFieldName);
		}
		if out.iter().any(|decl| &*decl.name == name) {
			return Err(PvError::DuplicateFieldName { name: name.to_owned() });
		}
		out.push(FieldDecl {
			name: name.to_owned().into_boxed_str(),
			field,
		});
	}
	Ok(out)
}

/// Immutable type descriptor, shared by every value instance of one shape.
///
/// A descriptor is never mutated after construction and is therefore safe to
/// read from any number of threads and trees concurrently. Equality is
/// structural and recursive. The element shape of a structure array is a
/// structure declaration by construction, and likewise for union arrays, so
/// no runtime kind check can fail there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
	/// Single scalar of the given kind.
	Scalar(ScalarKind),
	/// Array with scalar elements of the given kind.
	ScalarArray(ScalarKind),
	/// Structure with the given member declaration.
	Structure(Arc<StructDecl>),
	/// Array whose elements all have the given structure declaration.
	StructureArray(Arc<StructDecl>),
	/// Union choosing between the given member declaration.
	Union(Arc<UnionDecl>),
	/// Array whose elements all have the given union declaration.
	UnionArray(Arc<UnionDecl>),
}

impl Field {
	/// Scalar field descriptor.
	pub fn scalar(kind: ScalarKind) -> Arc<Field> {
		Arc::new(Field::Scalar(kind))
	}

	/// Scalar-array field descriptor.
	pub fn scalar_array(element: ScalarKind) -> Arc<Field> {
		Arc::new(Field::ScalarArray(element))
	}

	/// Structure descriptor from `(name, field)` pairs.
	pub fn structure(fields: Vec<(&str, Arc<Field>)>) -> Result<Arc<Field>> {
		Ok(Arc::new(Field::Structure(Arc::new(StructDecl::new(fields)?))))
	}

	/// Structure descriptor from an existing declaration.
	pub fn structure_from(decl: Arc<StructDecl>) -> Arc<Field> {
		Arc::new(Field::Structure(decl))
	}

	/// Structure-array descriptor with the given element declaration.
	pub fn structure_array(element: Arc<StructDecl>) -> Arc<Field> {
		Arc::new(Field::StructureArray(element))
	}

	/// Union descriptor from `(name, field)` pairs.
	pub fn union_of(members: Vec<(&str, Arc<Field>)>) -> Result<Arc<Field>> {
		Ok(Arc::new(Field::Union(Arc::new(UnionDecl::new(members)?))))
	}

	/// Union-array descriptor with the given element declaration.
	pub fn union_array(element: Arc<UnionDecl>) -> Arc<Field> {
		Arc::new(Field::UnionArray(element))
	}

	/// Flat kind of this descriptor.
	pub fn kind(&self) -> Kind {
		match self {
			Field::Scalar(_) => Kind::Scalar,
			Field::ScalarArray(_) => Kind::ScalarArray,
			Field::Structure(_) => Kind::Structure,
			Field::StructureArray(_) => Kind::StructureArray,
			Field::Union(_) => Kind::Union,
			Field::UnionArray(_) => Kind::UnionArray,
		}
	}

	/// Structure declaration when this is a structure or structure array.
	pub fn struct_decl(&self) -> Option<&Arc<StructDecl>> {
		match self {
			Field::Structure(decl) | Field::StructureArray(decl) => Some(decl),
			_ => None,
		}
	}

	/// Union declaration when this is a union or union array.
	pub fn union_decl(&self) -> Option<&Arc<UnionDecl>> {
		match self {
			Field::Union(decl) | Field::UnionArray(decl) => Some(decl),
			_ => None,
		}
	}

	/// Number of address slots an instance subtree of this shape occupies.
	///
	/// Any non-structure field takes one slot; a structure takes one slot for
	/// itself plus the slots of its entire member subtree.
	pub fn slot_count(&self) -> u32 {
		match self {
			Field::Structure(decl) => 1 + decl.fields.iter().map(|member| member.field.slot_count()).sum::<u32>(),
			_ => 1,
		}
	}
}
