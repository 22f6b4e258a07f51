use std::fmt;

/// Byte order used to decode and encode multi-byte integers.
///
/// Selected once per format expression by an optional prefix:
///
/// ```text
/// <bH    little-endian
/// >bH    big-endian
/// @bH    native
/// bH     native
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Byte order of the running machine
    #[default]
    Native,
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

/// Concrete endianness a [`ByteOrder`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl ByteOrder {
    /// Maps an order marker character to its byte order.
    pub fn from_marker(ch: char) -> Option<ByteOrder> {
        match ch {
            '<' => Some(ByteOrder::Little),
            '>' => Some(ByteOrder::Big),
            '@' => Some(ByteOrder::Native),
            _ => None,
        }
    }

    /// The marker character for this order.
    pub fn marker(self) -> char {
        match self {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::Native => '@',
        }
    }

    /// Resolves `Native` against the running machine.
    pub fn endianness(self) -> Endianness {
        match self {
            ByteOrder::Little => Endianness::Little,
            ByteOrder::Big => Endianness::Big,
            ByteOrder::Native => native_endianness(),
        }
    }
}

fn native_endianness() -> Endianness {
    if 0x0102u16.to_ne_bytes()[0] == 0x01 {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

/// One of the nine format code letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// Null-terminated string
    Str,
}

struct FormatInfo {
    code: char,
    kind: FormatKind,
    size: usize,
    signed: bool,
    type_name: &'static str,
}

const FORMAT_TABLE: [FormatInfo; 9] = [
    FormatInfo {
        code: 'b',
        kind: FormatKind::I8,
        size: 1,
        signed: true,
        type_name: "int8",
    },
    FormatInfo {
        code: 'B',
        kind: FormatKind::U8,
        size: 1,
        signed: false,
        type_name: "uint8",
    },
    FormatInfo {
        code: 'h',
        kind: FormatKind::I16,
        size: 2,
        signed: true,
        type_name: "int16",
    },
    FormatInfo {
        code: 'H',
        kind: FormatKind::U16,
        size: 2,
        signed: false,
        type_name: "uint16",
    },
    FormatInfo {
        code: 'i',
        kind: FormatKind::I32,
        size: 4,
        signed: true,
        type_name: "int32",
    },
    FormatInfo {
        code: 'I',
        kind: FormatKind::U32,
        size: 4,
        signed: false,
        type_name: "uint32",
    },
    FormatInfo {
        code: 'q',
        kind: FormatKind::I64,
        size: 8,
        signed: true,
        type_name: "int64",
    },
    FormatInfo {
        code: 'Q',
        kind: FormatKind::U64,
        size: 8,
        signed: false,
        type_name: "uint64",
    },
    FormatInfo {
        code: 's',
        kind: FormatKind::Str,
        size: 0,
        signed: false,
        type_name: "string",
    },
];

impl FormatKind {
    fn info(self) -> &'static FormatInfo {
        // The table is indexed in declaration order of the enum.
        &FORMAT_TABLE[self as usize]
    }

    /// Looks up a format code letter.
    pub fn from_code(ch: char) -> Option<FormatKind> {
        FORMAT_TABLE.iter().find(|info| info.code == ch).map(|info| info.kind)
    }

    /// True if `ch` is one of `b B h H i I q Q s`.
    pub fn is_code(ch: char) -> bool {
        Self::from_code(ch).is_some()
    }

    pub fn code(self) -> char {
        self.info().code
    }

    /// Width in bytes of one element; 0 for strings.
    pub fn size(self) -> usize {
        self.info().size
    }

    pub fn is_signed(self) -> bool {
        self.info().signed
    }

    /// Human-readable type name (`int8`, `uint16`, `string`, ...).
    pub fn type_name(self) -> &'static str {
        self.info().type_name
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single decoded unit: a format code and how many elements of it to read.
///
/// A count above one turns the unit into a fixed-length array:
///
/// ```text
/// 4B    four unsigned bytes, decoded as one array value
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCode {
    pub kind: FormatKind,
    /// Number of elements, always at least one
    pub count: usize,
}

impl FormatCode {
    pub fn new(kind: FormatKind, count: usize) -> Self {
        FormatCode { kind, count }
    }

    pub fn single(kind: FormatKind) -> Self {
        FormatCode { kind, count: 1 }
    }

    pub fn is_array(&self) -> bool {
        self.count > 1
    }

    /// Total bytes a fixed-width unit consumes, saturating at `usize::MAX`.
    pub fn byte_len(&self) -> usize {
        self.kind.size().saturating_mul(self.count)
    }
}

/// A parsed format expression: byte order plus an ordered list of codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub order: ByteOrder,
    pub formats: Vec<FormatCode>,
}

impl Expr {
    pub fn new(order: ByteOrder, formats: Vec<FormatCode>) -> Self {
        Expr { order, formats }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order != ByteOrder::Native {
            write!(f, "{}", self.order.marker())?;
        }
        for fc in &self.formats {
            if fc.is_array() {
                write!(f, "{}", fc.count)?;
            }
            write!(f, "{}", fc.kind)?;
        }
        Ok(())
    }
}
