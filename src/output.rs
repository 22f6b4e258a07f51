//! Human-readable and JSON rendering of evaluation results.
//!
//! # Table
//!
//! [`render_table()`] prints one row per value:
//!
//! ```text
//! Name       Code   Type                    Value                  Hex
//! --------------------------------------------------------------------
//! key        b      int8                       -1                 0xff
//! value      H      uint16                    513               0x0201
//! ```
//!
//! Arrays leave the Value column empty and list their elements in hex.
//! Nested objects print a header row and indent their fields.
//!
//! # JSON
//!
//! [`to_json()`] and [`to_json_pretty()`] dump the raw result. Object field
//! order is preserved.

use std::io::{self, Write};

use crate::{
    ast::{FormatKind, Node},
    value::{Array, Object, Output, Value},
};

const RULE: &str = "--------------------------------------------------------------------";

/// Writes `output` as a table; `node` supplies the format codes for sequences.
pub fn render_table<W: Write + ?Sized>(w: &mut W, node: &Node, output: &Output) -> io::Result<()> {
    writeln!(
        w,
        "{:<10} {:<6} {:<8} {:>20} {:>20}",
        "Name", "Code", "Type", "Value", "Hex"
    )?;
    writeln!(w, "{}", RULE)?;

    match output {
        Output::Sequence(values) => {
            let formats = node.source_expr().map(|expr| expr.formats.as_slice());
            for (i, value) in values.iter().enumerate() {
                let code = formats
                    .and_then(|f| f.get(i))
                    .map(|fc| fc.kind)
                    .or_else(|| value.kind());
                write_row(w, &i.to_string(), code, value)?;
            }
            Ok(())
        }
        Output::Object(obj) => write_object(w, obj, 0),
    }
}

fn write_object<W: Write + ?Sized>(w: &mut W, obj: &Object, indent: usize) -> io::Result<()> {
    let pad = "  ".repeat(indent);
    for field in &obj.fields {
        let name = format!("{}{}", pad, field.name);
        match &field.value {
            Value::Object(nested) => {
                writeln!(w, "{:<10} {:<6} {:<8} {:>20} {:>20}", name, "-", "object", "", "")?;
                write_object(w, nested, indent + 1)?;
            }
            value => write_row(w, &name, value.kind(), value)?,
        }
    }
    Ok(())
}

fn write_row<W: Write + ?Sized>(
    w: &mut W,
    name: &str,
    code: Option<FormatKind>,
    value: &Value,
) -> io::Result<()> {
    let code = code.map(|kind| kind.code()).unwrap_or('?');
    writeln!(
        w,
        "{:<10} {:<6} {:<8} {:>20} {:>20}",
        name,
        code,
        value.type_name(),
        format_value(value),
        format_hex(value)
    )
}

/// Value column text; arrays and objects are shown only through other columns.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => String::new(),
        _ => value.to_string(),
    }
}

/// Hex column text.
///
/// Scalars are zero-padded to their width (`0x00ff` for a `u16`); arrays and
/// strings list each element or byte inside brackets (`[68 69]`).
pub fn format_hex(value: &Value) -> String {
    match value {
        Value::I8(n) => format!("0x{:02x}", *n as u8),
        Value::U8(n) => format!("0x{:02x}", n),
        Value::I16(n) => format!("0x{:04x}", *n as u16),
        Value::U16(n) => format!("0x{:04x}", n),
        Value::I32(n) => format!("0x{:08x}", *n as u32),
        Value::U32(n) => format!("0x{:08x}", n),
        Value::I64(n) => format!("0x{:016x}", *n as u64),
        Value::U64(n) => format!("0x{:016x}", n),
        Value::String(s) => hex_list(s.bytes().map(|b| format!("{:02x}", b))),
        Value::Array(arr) => format_hex_array(arr),
        Value::Object(_) => String::new(),
    }
}

fn format_hex_array(arr: &Array) -> String {
    match arr {
        Array::I8(v) => hex_list(v.iter().map(|n| format!("{:02x}", *n as u8))),
        Array::U8(v) => hex_list(v.iter().map(|n| format!("{:02x}", n))),
        Array::I16(v) => hex_list(v.iter().map(|n| format!("{:04x}", *n as u16))),
        Array::U16(v) => hex_list(v.iter().map(|n| format!("{:04x}", n))),
        Array::I32(v) => hex_list(v.iter().map(|n| format!("{:08x}", *n as u32))),
        Array::U32(v) => hex_list(v.iter().map(|n| format!("{:08x}", n))),
        Array::I64(v) => hex_list(v.iter().map(|n| format!("{:016x}", *n as u64))),
        Array::U64(v) => hex_list(v.iter().map(|n| format!("{:016x}", n))),
    }
}

fn hex_list(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(" "))
}

/// Converts a result into a `serde_json` value.
///
/// Sequences and arrays become JSON arrays, objects become maps in field order.
pub fn to_json_value(output: &Output) -> serde_json::Value {
    match output {
        Output::Sequence(values) => {
            serde_json::Value::Array(values.iter().map(value_to_json).collect())
        }
        Output::Object(obj) => object_to_json(obj),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        Value::I8(n) => Json::from(*n),
        Value::U8(n) => Json::from(*n),
        Value::I16(n) => Json::from(*n),
        Value::U16(n) => Json::from(*n),
        Value::I32(n) => Json::from(*n),
        Value::U32(n) => Json::from(*n),
        Value::I64(n) => Json::from(*n),
        Value::U64(n) => Json::from(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(arr) => Json::Array(arr.values().iter().map(value_to_json).collect()),
        Value::Object(obj) => object_to_json(obj),
    }
}

/// Later fields win when two fields share a name.
fn object_to_json(obj: &Object) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = obj
        .fields
        .iter()
        .map(|field| (field.name.clone(), value_to_json(&field.value)))
        .collect();
    serde_json::Value::Object(map)
}

/// Compact JSON.
///
/// # Examples
///
/// ```
/// use bq_lang::output::to_json;
/// use bq_lang::{Output, Value};
///
/// let out = Output::Sequence(vec![Value::I8(-1), Value::U16(513)]);
/// assert_eq!(to_json(&out), "[-1,513]");
/// ```
pub fn to_json(output: &Output) -> String {
    to_json_value(output).to_string()
}

/// JSON with 2-space indentation.
pub fn to_json_pretty(output: &Output) -> String {
    format!("{:#}", to_json_value(output))
}
