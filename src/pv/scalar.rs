use crate::pv::{PvError, Result, ScalarKind};

/// One scalar payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
	/// Truth value.
	Boolean(bool),
	/// Signed 8-bit integer.
	Byte(i8),
	/// Signed 16-bit integer.
	Short(i16),
	/// Signed 32-bit integer.
	Int(i32),
	/// Signed 64-bit integer.
	Long(i64),
	/// Unsigned 8-bit integer.
	UByte(u8),
	/// Unsigned 16-bit integer.
	UShort(u16),
	/// Unsigned 32-bit integer.
	UInt(u32),
	/// Unsigned 64-bit integer.
	ULong(u64),
	/// 32-bit float.
	Float(f32),
	/// 64-bit float.
	Double(f64),
	/// UTF-8 string.
	String(Box<str>),
}

impl ScalarValue {
	/// Scalar kind of this value.
	pub fn kind(&self) -> ScalarKind {
		match self {
			ScalarValue::Boolean(_) => ScalarKind::Boolean,
			ScalarValue::Byte(_) => ScalarKind::Byte,
			ScalarValue::Short(_) => ScalarKind::Short,
			ScalarValue::Int(_) => ScalarKind::Int,
			ScalarValue::Long(_) => ScalarKind::Long,
			ScalarValue::UByte(_) => ScalarKind::UByte,
			ScalarValue::UShort(_) => ScalarKind::UShort,
			ScalarValue::UInt(_) => ScalarKind::UInt,
			ScalarValue::ULong(_) => ScalarKind::ULong,
			ScalarValue::Float(_) => ScalarKind::Float,
			ScalarValue::Double(_) => ScalarKind::Double,
			ScalarValue::String(_) => ScalarKind::String,
		}
	}

	/// Default value for a scalar kind: zero, `false`, or the empty string.
	pub fn default_for(kind: ScalarKind) -> Self {
		match kind {
			ScalarKind::Boolean => ScalarValue::Boolean(false),
			ScalarKind::Byte => ScalarValue::Byte(0),
			ScalarKind::Short => ScalarValue::Short(0),
			ScalarKind::Int => ScalarValue::Int(0),
			ScalarKind::Long => ScalarValue::Long(0),
			ScalarKind::UByte => ScalarValue::UByte(0),
			ScalarKind::UShort => ScalarValue::UShort(0),
			ScalarKind::UInt => ScalarValue::UInt(0),
			ScalarKind::ULong => ScalarValue::ULong(0),
			ScalarKind::Float => ScalarValue::Float(0.0),
			ScalarKind::Double => ScalarValue::Double(0.0),
			ScalarKind::String => ScalarValue::String("".into()),
		}
	}

	/// Assign from another scalar, converting across numeric kinds.
	///
	/// Same-kind assignment clones. Any numeric source assigns to any numeric
	/// destination with cast semantics. Boolean and string accept only their
	/// own kind.
	pub fn copy_from(&mut self, other: &ScalarValue) -> Result<()> {
		if self.kind() == other.kind() {
			*self = other.clone();
			return Ok(());
		}
		let mismatch = PvError::ScalarConversion {
			from: other.kind(),
			to: self.kind(),
		};
		match self {
			ScalarValue::Boolean(_) | ScalarValue::String(_) => return Err(mismatch),
			ScalarValue::Byte(v) => *v = integer_from(other).ok_or(mismatch)? as i8,
			ScalarValue::Short(v) => *v = integer_from(other).ok_or(mismatch)? as i16,
			ScalarValue::Int(v) => *v = integer_from(other).ok_or(mismatch)? as i32,
			ScalarValue::Long(v) => *v = integer_from(other).ok_or(mismatch)? as i64,
			ScalarValue::UByte(v) => *v = integer_from(other).ok_or(mismatch)? as u8,
			ScalarValue::UShort(v) => *v = integer_from(other).ok_or(mismatch)? as u16,
			ScalarValue::UInt(v) => *v = integer_from(other).ok_or(mismatch)? as u32,
			ScalarValue::ULong(v) => *v = integer_from(other).ok_or(mismatch)? as u64,
			ScalarValue::Float(v) => *v = float_from(other).ok_or(mismatch)? as f32,
			ScalarValue::Double(v) => *v = float_from(other).ok_or(mismatch)?,
		}
		Ok(())
	}
}

fn integer_from(value: &ScalarValue) -> Option<i128> {
	match value {
		ScalarValue::Byte(v) => Some(i128::from(*v)),
		ScalarValue::Short(v) => Some(i128::from(*v)),
		ScalarValue::Int(v) => Some(i128::from(*v)),
		ScalarValue::Long(v) => Some(i128::from(*v)),
		ScalarValue::UByte(v) => Some(i128::from(*v)),
		ScalarValue::UShort(v) => Some(i128::from(*v)),
		ScalarValue::UInt(v) => Some(i128::from(*v)),
		ScalarValue::ULong(v) => Some(i128::from(*v)),
		ScalarValue::Float(v) => Some(*v as i128),
		ScalarValue::Double(v) => Some(*v as i128),
		ScalarValue::Boolean(_) | ScalarValue::String(_) => None,
	}
}

fn float_from(value: &ScalarValue) -> Option<f64> {
	match value {
		ScalarValue::Byte(v) => Some(f64::from(*v)),
		ScalarValue::Short(v) => Some(f64::from(*v)),
		ScalarValue::Int(v) => Some(f64::from(*v)),
		ScalarValue::Long(v) => Some(*v as f64),
		ScalarValue::UByte(v) => Some(f64::from(*v)),
		ScalarValue::UShort(v) => Some(f64::from(*v)),
		ScalarValue::UInt(v) => Some(f64::from(*v)),
		ScalarValue::ULong(v) => Some(*v as f64),
		ScalarValue::Float(v) => Some(f64::from(*v)),
		ScalarValue::Double(v) => Some(*v),
		ScalarValue::Boolean(_) | ScalarValue::String(_) => None,
	}
}

/// Scalar-array payload: a typed vector per element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArrayValue {
	/// Truth values.
	Boolean(Vec<bool>),
	/// Signed 8-bit integers.
	Byte(Vec<i8>),
	/// Signed 16-bit integers.
	Short(Vec<i16>),
	/// Signed 32-bit integers.
	Int(Vec<i32>),
	/// Signed 64-bit integers.
	Long(Vec<i64>),
	/// Unsigned 8-bit integers.
	UByte(Vec<u8>),
	/// Unsigned 16-bit integers.
	UShort(Vec<u16>),
	/// Unsigned 32-bit integers.
	UInt(Vec<u32>),
	/// Unsigned 64-bit integers.
	ULong(Vec<u64>),
	/// 32-bit floats.
	Float(Vec<f32>),
	/// 64-bit floats.
	Double(Vec<f64>),
	/// UTF-8 strings.
	String(Vec<Box<str>>),
}

impl ScalarArrayValue {
	/// Empty array for an element kind.
	pub fn empty(kind: ScalarKind) -> Self {
		match kind {
			ScalarKind::Boolean => ScalarArrayValue::Boolean(Vec::new()),
			ScalarKind::Byte => ScalarArrayValue::Byte(Vec::new()),
			ScalarKind::Short => ScalarArrayValue::Short(Vec::new()),
			ScalarKind::Int => ScalarArrayValue::Int(Vec::new()),
			ScalarKind::Long => ScalarArrayValue::Long(Vec::new()),
			ScalarKind::UByte => ScalarArrayValue::UByte(Vec::new()),
			ScalarKind::UShort => ScalarArrayValue::UShort(Vec::new()),
			ScalarKind::UInt => ScalarArrayValue::UInt(Vec::new()),
			ScalarKind::ULong => ScalarArrayValue::ULong(Vec::new()),
			ScalarKind::Float => ScalarArrayValue::Float(Vec::new()),
			ScalarKind::Double => ScalarArrayValue::Double(Vec::new()),
			ScalarKind::String => ScalarArrayValue::String(Vec::new()),
		}
	}

	/// Element kind of this array.
	pub fn element_kind(&self) -> ScalarKind {
		match self {
			ScalarArrayValue::Boolean(_) => ScalarKind::Boolean,
			ScalarArrayValue::Byte(_) => ScalarKind::Byte,
			ScalarArrayValue::Short(_) => ScalarKind::Short,
			ScalarArrayValue::Int(_) => ScalarKind::Int,
			ScalarArrayValue::Long(_) => ScalarKind::Long,
			ScalarArrayValue::UByte(_) => ScalarKind::UByte,
			ScalarArrayValue::UShort(_) => ScalarKind::UShort,
			ScalarArrayValue::UInt(_) => ScalarKind::UInt,
			ScalarArrayValue::ULong(_) => ScalarKind::ULong,
			ScalarArrayValue::Float(_) => ScalarKind::Float,
			ScalarArrayValue::Double(_) => ScalarKind::Double,
			ScalarArrayValue::String(_) => ScalarKind::String,
		}
	}

	/// Element count.
	pub fn len(&self) -> usize {
		match self {
			ScalarArrayValue::Boolean(v) => v.len(),
			ScalarArrayValue::Byte(v) => v.len(),
			ScalarArrayValue::Short(v) => v.len(),
			ScalarArrayValue::Int(v) => v.len(),
			ScalarArrayValue::Long(v) => v.len(),
			ScalarArrayValue::UByte(v) => v.len(),
			ScalarArrayValue::UShort(v) => v.len(),
			ScalarArrayValue::UInt(v) => v.len(),
			ScalarArrayValue::ULong(v) => v.len(),
			ScalarArrayValue::Float(v) => v.len(),
			ScalarArrayValue::Double(v) => v.len(),
			ScalarArrayValue::String(v) => v.len(),
		}
	}

	/// Return `true` when the array holds no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Replace contents from another array of the same element kind.
	pub fn copy_from(&mut self, other: &ScalarArrayValue) -> Result<()> {
		if self.element_kind() != other.element_kind() {
			return Err(PvError::ScalarConversion {
				from: other.element_kind(),
				to: self.element_kind(),
			});
		}
		*self = other.clone();
		Ok(())
	}
}
