//! Decode/encode binary data according to format expressions.
//!
//! Decoding consumes the byte source strictly forward: each format code reads
//! exactly `size × count` bytes (or up to a `0x00` for strings) and nothing is
//! ever zero-filled. Encoding is the inverse and is what `write(...)` uses to
//! put decoded values back on disk.

use crate::ast::{ByteOrder, Endianness, Expr, FormatCode, FormatKind};
use crate::value::{Array, Object, Output, Value};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read {needed} bytes for {count} x format '{code}': input ended early")]
    ShortRead {
        code: char,
        count: usize,
        needed: usize,
    },
    #[error("empty string: terminator found at the first byte")]
    EmptyString,
    #[error("non-printable character {ch:?} in string at byte {offset}")]
    NonPrintable { ch: char, offset: usize },
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("string {0:?} contains a NUL byte and cannot be encoded")]
    InteriorNul(String),
    #[error("format '{0}' cannot be repeated as an array")]
    UnsupportedArray(char),
    #[error("IO: {0}")]
    Io(#[from] io::Error),
}

/// Decodes every format code of `expr` from `reader`, in order.
///
/// # Examples
///
/// ```
/// use bq_lang::ast::{ByteOrder, Expr, FormatCode, FormatKind};
/// use bq_lang::codec::decode;
/// use bq_lang::Value;
///
/// let expr = Expr::new(
///     ByteOrder::Little,
///     vec![FormatCode::single(FormatKind::I8), FormatCode::single(FormatKind::U16)],
/// );
/// let values = decode(&mut &[0xFF, 0x01, 0x02][..], &expr).unwrap();
/// assert_eq!(values, vec![Value::I8(-1), Value::U16(513)]);
/// ```
pub fn decode<R: Read + ?Sized>(reader: &mut R, expr: &Expr) -> Result<Vec<Value>, CodecError> {
    match expr.order.endianness() {
        Endianness::Little => decode_codes::<LittleEndian, R>(reader, &expr.formats),
        Endianness::Big => decode_codes::<BigEndian, R>(reader, &expr.formats),
    }
}

fn decode_codes<E: byteorder::ByteOrder, R: Read + ?Sized>(
    r: &mut R,
    formats: &[FormatCode],
) -> Result<Vec<Value>, CodecError> {
    let mut values = Vec::with_capacity(formats.len());
    for fc in formats {
        let value = if fc.is_array() {
            decode_array::<E, R>(r, fc)?
        } else {
            decode_scalar::<E, R>(r, fc)?
        };
        values.push(value);
    }
    Ok(values)
}

fn short_read(fc: FormatCode) -> impl FnOnce(io::Error) -> CodecError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::ShortRead {
                code: fc.kind.code(),
                count: fc.count,
                needed: fc.byte_len(),
            }
        } else {
            CodecError::Io(e)
        }
    }
}

fn decode_scalar<E: byteorder::ByteOrder, R: Read + ?Sized>(
    r: &mut R,
    fc: &FormatCode,
) -> Result<Value, CodecError> {
    let value = match fc.kind {
        FormatKind::I8 => r.read_i8().map(Value::I8),
        FormatKind::U8 => r.read_u8().map(Value::U8),
        FormatKind::I16 => r.read_i16::<E>().map(Value::I16),
        FormatKind::U16 => r.read_u16::<E>().map(Value::U16),
        FormatKind::I32 => r.read_i32::<E>().map(Value::I32),
        FormatKind::U32 => r.read_u32::<E>().map(Value::U32),
        FormatKind::I64 => r.read_i64::<E>().map(Value::I64),
        FormatKind::U64 => r.read_u64::<E>().map(Value::U64),
        FormatKind::Str => return read_string(r).map(Value::String),
    };
    value.map_err(short_read(*fc))
}

fn decode_array<E: byteorder::ByteOrder, R: Read + ?Sized>(
    r: &mut R,
    fc: &FormatCode,
) -> Result<Value, CodecError> {
    // The buffer grows only with bytes that actually arrive.
    let needed = fc.byte_len();
    let mut buf = Vec::new();
    Read::take(&mut *r, needed as u64).read_to_end(&mut buf)?;
    if buf.len() < needed {
        return Err(CodecError::ShortRead {
            code: fc.kind.code(),
            count: fc.count,
            needed,
        });
    }
    let n = fc.count;

    let array = match fc.kind {
        FormatKind::I8 => Array::I8(buf.iter().map(|&b| b as i8).collect()),
        FormatKind::U8 => Array::U8(buf),
        FormatKind::I16 => {
            let mut out = vec![0i16; n];
            E::read_i16_into(&buf, &mut out);
            Array::I16(out)
        }
        FormatKind::U16 => {
            let mut out = vec![0u16; n];
            E::read_u16_into(&buf, &mut out);
            Array::U16(out)
        }
        FormatKind::I32 => {
            let mut out = vec![0i32; n];
            E::read_i32_into(&buf, &mut out);
            Array::I32(out)
        }
        FormatKind::U32 => {
            let mut out = vec![0u32; n];
            E::read_u32_into(&buf, &mut out);
            Array::U32(out)
        }
        FormatKind::I64 => {
            let mut out = vec![0i64; n];
            E::read_i64_into(&buf, &mut out);
            Array::I64(out)
        }
        FormatKind::U64 => {
            let mut out = vec![0u64; n];
            E::read_u64_into(&buf, &mut out);
            Array::U64(out)
        }
        FormatKind::Str => return Err(CodecError::UnsupportedArray(fc.kind.code())),
    };
    Ok(Value::Array(array))
}

/// Reads a null-terminated string.
///
/// The terminator is consumed but not returned; end of input also ends the
/// string. Only printable characters, tab and newline are accepted.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<String, CodecError> {
    let mut bytes = Vec::new();
    loop {
        let byte = match r.read_u8() {
            Ok(0) => break,
            Ok(byte) => byte,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(CodecError::Io(e)),
        };
        if byte.is_ascii_control() && !is_allowed_whitespace(byte as char) {
            return Err(CodecError::NonPrintable {
                ch: byte as char,
                offset: bytes.len(),
            });
        }
        bytes.push(byte);
    }

    if bytes.is_empty() {
        return Err(CodecError::EmptyString);
    }

    let s = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    if let Some((offset, ch)) = s
        .char_indices()
        .find(|&(_, ch)| ch.is_control() && !is_allowed_whitespace(ch))
    {
        return Err(CodecError::NonPrintable { ch, offset });
    }
    Ok(s)
}

fn is_allowed_whitespace(ch: char) -> bool {
    ch == '\t' || ch == '\n'
}

/// Encodes a single value in the given byte order.
///
/// Objects are flattened field by field in declaration order, so an object
/// built from a decoded sequence encodes back to the original bytes.
pub fn encode_value<W: Write + ?Sized>(
    w: &mut W,
    value: &Value,
    order: ByteOrder,
) -> Result<(), CodecError> {
    match order.endianness() {
        Endianness::Little => encode_with::<LittleEndian, W>(w, value),
        Endianness::Big => encode_with::<BigEndian, W>(w, value),
    }
}

/// Encodes an evaluation result: a sequence value by value, an object field by field.
pub fn encode_output<W: Write + ?Sized>(
    w: &mut W,
    output: &Output,
    order: ByteOrder,
) -> Result<(), CodecError> {
    match output {
        Output::Sequence(values) => {
            for value in values {
                encode_value(w, value, order)?;
            }
            Ok(())
        }
        Output::Object(obj) => encode_object(w, obj, order),
    }
}

pub fn encode_object<W: Write + ?Sized>(
    w: &mut W,
    obj: &Object,
    order: ByteOrder,
) -> Result<(), CodecError> {
    for field in &obj.fields {
        encode_value(w, &field.value, order)?;
    }
    Ok(())
}

/// Encodes a value into a fresh buffer.
pub fn encode_to_vec(value: &Value, order: ByteOrder) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_value(&mut out, value, order)?;
    Ok(out)
}

fn encode_with<E: byteorder::ByteOrder, W: Write + ?Sized>(
    w: &mut W,
    value: &Value,
) -> Result<(), CodecError> {
    match value {
        Value::I8(n) => w.write_i8(*n)?,
        Value::U8(n) => w.write_u8(*n)?,
        Value::I16(n) => w.write_i16::<E>(*n)?,
        Value::U16(n) => w.write_u16::<E>(*n)?,
        Value::I32(n) => w.write_i32::<E>(*n)?,
        Value::U32(n) => w.write_u32::<E>(*n)?,
        Value::I64(n) => w.write_i64::<E>(*n)?,
        Value::U64(n) => w.write_u64::<E>(*n)?,
        Value::String(s) => {
            if s.as_bytes().contains(&0) {
                return Err(CodecError::InteriorNul(s.clone()));
            }
            w.write_all(s.as_bytes())?;
            w.write_u8(0)?;
        }
        Value::Array(arr) => encode_array::<E, W>(w, arr)?,
        Value::Object(obj) => {
            for field in &obj.fields {
                encode_with::<E, W>(w, &field.value)?;
            }
        }
    }
    Ok(())
}

fn encode_array<E: byteorder::ByteOrder, W: Write + ?Sized>(
    w: &mut W,
    arr: &Array,
) -> io::Result<()> {
    match arr {
        Array::I8(v) => v.iter().try_for_each(|&n| w.write_i8(n)),
        Array::U8(v) => w.write_all(v),
        Array::I16(v) => v.iter().try_for_each(|&n| w.write_i16::<E>(n)),
        Array::U16(v) => v.iter().try_for_each(|&n| w.write_u16::<E>(n)),
        Array::I32(v) => v.iter().try_for_each(|&n| w.write_i32::<E>(n)),
        Array::U32(v) => v.iter().try_for_each(|&n| w.write_u32::<E>(n)),
        Array::I64(v) => v.iter().try_for_each(|&n| w.write_i64::<E>(n)),
        Array::U64(v) => v.iter().try_for_each(|&n| w.write_u64::<E>(n)),
    }
}
