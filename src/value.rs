use crate::ast::FormatKind;
use std::fmt;

/// A decoded value.
///
/// Integers keep the exact width and signedness of the format code that
/// produced them, so they can be written back byte for byte.
///
/// # Examples
///
/// ```
/// use bq_lang::{Array, Value};
///
/// let byte = Value::I8(-1);
/// let word = Value::U16(513);
/// let name = Value::String("hi".to_string());
/// let bytes = Value::Array(Array::U8(vec![1, 2, 3, 4]));
/// assert_eq!(bytes.type_name(), "[]uint8");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),

    /// Null-terminated string, without its terminator
    String(String),

    /// Fixed-length array produced by a count prefix
    Array(Array),

    /// Named fields built by an object stage
    Object(Object),
}

/// Homogeneous array of one integer kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
}

/// Ordered collection of named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pub fields: Vec<ObjectField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: String,
    pub value: Value,
}

/// Result of evaluating a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Flat values in decode order
    Sequence(Vec<Value>),
    /// Values regrouped under names
    Object(Object),
}

impl Value {
    /// Format code this value would be decoded from.
    pub fn kind(&self) -> Option<FormatKind> {
        Some(match self {
            Value::I8(_) => FormatKind::I8,
            Value::U8(_) => FormatKind::U8,
            Value::I16(_) => FormatKind::I16,
            Value::U16(_) => FormatKind::U16,
            Value::I32(_) => FormatKind::I32,
            Value::U32(_) => FormatKind::U32,
            Value::I64(_) => FormatKind::I64,
            Value::U64(_) => FormatKind::U64,
            Value::String(_) => FormatKind::Str,
            Value::Array(arr) => arr.kind(),
            Value::Object(_) => return None,
        })
    }

    /// Type name as shown in tables (`int8`, `[]uint16`, `string`, `object`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Array(arr) => arr.type_name(),
            Value::Object(_) => "object",
            _ => self.kind().map(FormatKind::type_name).unwrap_or("unknown"),
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Array {
    pub fn kind(&self) -> FormatKind {
        match self {
            Array::I8(_) => FormatKind::I8,
            Array::U8(_) => FormatKind::U8,
            Array::I16(_) => FormatKind::I16,
            Array::U16(_) => FormatKind::U16,
            Array::I32(_) => FormatKind::I32,
            Array::U32(_) => FormatKind::U32,
            Array::I64(_) => FormatKind::I64,
            Array::U64(_) => FormatKind::U64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Array::I8(v) => v.len(),
            Array::U8(v) => v.len(),
            Array::I16(v) => v.len(),
            Array::U16(v) => v.len(),
            Array::I32(v) => v.len(),
            Array::U32(v) => v.len(),
            Array::I64(v) => v.len(),
            Array::U64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Array::I8(_) => "[]int8",
            Array::U8(_) => "[]uint8",
            Array::I16(_) => "[]int16",
            Array::U16(_) => "[]uint16",
            Array::I32(_) => "[]int32",
            Array::U32(_) => "[]uint32",
            Array::I64(_) => "[]int64",
            Array::U64(_) => "[]uint64",
        }
    }

    /// Elements as standalone scalar values.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Array::I8(v) => v.iter().copied().map(Value::I8).collect(),
            Array::U8(v) => v.iter().copied().map(Value::U8).collect(),
            Array::I16(v) => v.iter().copied().map(Value::I16).collect(),
            Array::U16(v) => v.iter().copied().map(Value::U16).collect(),
            Array::I32(v) => v.iter().copied().map(Value::I32).collect(),
            Array::U32(v) => v.iter().copied().map(Value::U32).collect(),
            Array::I64(v) => v.iter().copied().map(Value::I64).collect(),
            Array::U64(v) => v.iter().copied().map(Value::U64).collect(),
        }
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push(ObjectField {
            name: name.into(),
            value,
        });
    }

    /// First field with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Output {
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Output::Sequence(values) => Some(values),
            Output::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Output::Object(obj) => Some(obj),
            Output::Sequence(_) => None,
        }
    }

    /// Short name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Output::Sequence(_) => "sequence",
            Output::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(n) => write!(f, "{}", n),
            Value::U8(n) => write!(f, "{}", n),
            Value::I16(n) => write!(f, "{}", n),
            Value::U16(n) => write!(f, "{}", n),
            Value::I32(n) => write!(f, "{}", n),
            Value::U32(n) => write!(f, "{}", n),
            Value::I64(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                let items: Vec<String> = arr.values().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(" "))
            }
            Value::Object(obj) => {
                let items: Vec<String> = obj
                    .fields
                    .iter()
                    .map(|field| format!("{}:{}", field.name, field.value))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}
