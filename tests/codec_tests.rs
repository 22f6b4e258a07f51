// tests/codec_tests.rs

use bq_lang::ast::{ByteOrder, Expr, FormatCode, FormatKind};
use bq_lang::codec::{CodecError, decode, encode_output, encode_to_vec, read_string};
use bq_lang::parser::parse;
use bq_lang::{Array, Node, Object, Output, Value};
use proptest::prelude::*;

fn expr(input: &str) -> Expr {
    match parse(input).unwrap() {
        Node::Format(expr) => expr,
        other => panic!("Expected format expression, got {:?}", other),
    }
}

fn decode_bytes(format: &str, bytes: &[u8]) -> Result<Vec<Value>, CodecError> {
    let mut source = bytes;
    decode(&mut source, &expr(format))
}

// ============================================================================
// Scalars and arrays
// ============================================================================

#[test]
fn test_signed_byte_and_little_u16() {
    let values = decode_bytes("<bH", &[0xFF, 0x01, 0x02]).unwrap();
    assert_eq!(values, vec![Value::I8(-1), Value::U16(513)]);
}

#[test]
fn test_byte_order_selects_endianness() {
    let bytes = [0x01, 0x02, 0x03, 0x04];
    assert_eq!(decode_bytes("<I", &bytes).unwrap(), vec![Value::U32(0x04030201)]);
    assert_eq!(decode_bytes(">I", &bytes).unwrap(), vec![Value::U32(0x01020304)]);
    assert_eq!(
        decode_bytes("@I", &bytes).unwrap(),
        vec![Value::U32(u32::from_ne_bytes(bytes))]
    );
    assert_eq!(
        decode_bytes("I", &bytes).unwrap(),
        vec![Value::U32(u32::from_ne_bytes(bytes))]
    );
}

#[test]
fn test_every_integer_width() {
    let mut bytes = vec![0x80, 0x80];
    bytes.extend_from_slice(&(-2i16).to_be_bytes());
    bytes.extend_from_slice(&0xBEEFu16.to_be_bytes());
    bytes.extend_from_slice(&(-3i32).to_be_bytes());
    bytes.extend_from_slice(&0xDEADBEEFu32.to_be_bytes());
    bytes.extend_from_slice(&i64::MIN.to_be_bytes());
    bytes.extend_from_slice(&u64::MAX.to_be_bytes());

    let values = decode_bytes(">bBhHiIqQ", &bytes).unwrap();
    assert_eq!(
        values,
        vec![
            Value::I8(-128),
            Value::U8(128),
            Value::I16(-2),
            Value::U16(0xBEEF),
            Value::I32(-3),
            Value::U32(0xDEADBEEF),
            Value::I64(i64::MIN),
            Value::U64(u64::MAX),
        ]
    );
}

#[test]
fn test_count_yields_one_array_value() {
    let values = decode_bytes("4B", &[1, 2, 3, 4]).unwrap();
    assert_eq!(values, vec![Value::Array(Array::U8(vec![1, 2, 3, 4]))]);
}

#[test]
fn test_multi_byte_arrays() {
    let values = decode_bytes(">2H2b", &[0xFF, 0xFF, 0x00, 0x01, 0xFE, 0x02]).unwrap();
    assert_eq!(
        values,
        vec![
            Value::Array(Array::U16(vec![0xFFFF, 0x0001])),
            Value::Array(Array::I8(vec![-2, 2])),
        ]
    );
    assert_eq!(values[0].type_name(), "[]uint16");
}

#[test]
fn test_codes_consume_in_order() {
    let mut source: &[u8] = &[0x07, b'o', b'k', 0x00, 0x2A, 0x00];
    let values = decode(&mut source, &expr("<BsH")).unwrap();
    assert_eq!(
        values,
        vec![Value::U8(7), Value::String("ok".to_string()), Value::U16(42)]
    );
    assert!(source.is_empty());
}

#[test]
fn test_trailing_bytes_are_left_unread() {
    let mut source: &[u8] = &[0x01, 0x02, 0x03];
    decode(&mut source, &expr("B")).unwrap();
    assert_eq!(source, [0x02u8, 0x03].as_slice());
}

// ============================================================================
// Short reads
// ============================================================================

#[test]
fn test_short_scalar_read() {
    assert!(matches!(
        decode_bytes("<H", &[0x01]),
        Err(CodecError::ShortRead {
            code: 'H',
            count: 1,
            needed: 2,
        })
    ));
    assert!(matches!(
        decode_bytes("b", &[]),
        Err(CodecError::ShortRead { code: 'b', .. })
    ));
}

#[test]
fn test_short_array_read() {
    assert!(matches!(
        decode_bytes("4B", &[1, 2, 3]),
        Err(CodecError::ShortRead {
            code: 'B',
            count: 4,
            needed: 4,
        })
    ));
    assert!(matches!(
        decode_bytes("<3I", &[0; 11]),
        Err(CodecError::ShortRead { needed: 12, .. })
    ));
}

#[test]
fn test_huge_counts_are_short_reads() {
    assert!(matches!(
        decode_bytes("100000000000000Q", &[1, 2, 3]),
        Err(CodecError::ShortRead {
            code: 'Q',
            count: 100_000_000_000_000,
            needed: 800_000_000_000_000,
        })
    ));

    // size times count does not fit in usize
    assert!(matches!(
        decode_bytes("2305843009213693952Q", &[1, 2, 3]),
        Err(CodecError::ShortRead {
            code: 'Q',
            needed: usize::MAX,
            ..
        })
    ));
}

#[test]
fn test_short_read_after_earlier_values() {
    assert!(matches!(
        decode_bytes("<bq", &[0xFF, 0x00, 0x00]),
        Err(CodecError::ShortRead { code: 'q', .. })
    ));
}

#[test]
fn test_string_array_rejected() {
    let expr = Expr::new(ByteOrder::Native, vec![FormatCode::new(FormatKind::Str, 2)]);
    let mut source: &[u8] = b"";
    assert!(matches!(
        decode(&mut source, &expr),
        Err(CodecError::UnsupportedArray('s'))
    ));
}

#[test]
fn test_format_table() {
    let expected = [
        ('b', 1, true, "int8"),
        ('B', 1, false, "uint8"),
        ('h', 2, true, "int16"),
        ('H', 2, false, "uint16"),
        ('i', 4, true, "int32"),
        ('I', 4, false, "uint32"),
        ('q', 8, true, "int64"),
        ('Q', 8, false, "uint64"),
        ('s', 0, false, "string"),
    ];

    for (code, size, signed, type_name) in expected {
        let kind = FormatKind::from_code(code).unwrap();
        assert_eq!(kind.code(), code);
        assert_eq!(kind.size(), size, "size of {}", code);
        assert_eq!(kind.is_signed(), signed, "signedness of {}", code);
        assert_eq!(kind.type_name(), type_name);
    }
    assert_eq!(FormatKind::from_code('x'), None);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_null_terminated_string() {
    assert_eq!(
        decode_bytes("s", b"hi\0").unwrap(),
        vec![Value::String("hi".to_string())]
    );
}

#[test]
fn test_string_ended_by_eof() {
    assert_eq!(
        decode_bytes("s", b"hi").unwrap(),
        vec![Value::String("hi".to_string())]
    );
}

#[test]
fn test_string_allows_tab_newline_and_unicode() {
    let mut source: &[u8] = b"a\tb\nc\0";
    assert_eq!(read_string(&mut source).unwrap(), "a\tb\nc");

    let mut source: &[u8] = "你好\0".as_bytes();
    assert_eq!(read_string(&mut source).unwrap(), "你好");
}

#[test]
fn test_empty_string_is_error() {
    let mut source: &[u8] = b"\0rest";
    assert!(matches!(read_string(&mut source), Err(CodecError::EmptyString)));

    let mut source: &[u8] = b"";
    assert!(matches!(read_string(&mut source), Err(CodecError::EmptyString)));
}

#[test]
fn test_control_bytes_rejected() {
    let mut source: &[u8] = b"a\x01b\0";
    assert!(matches!(
        read_string(&mut source),
        Err(CodecError::NonPrintable { ch: '\u{1}', offset: 1 })
    ));

    let mut source: &[u8] = b"\x7f\0";
    assert!(matches!(
        read_string(&mut source),
        Err(CodecError::NonPrintable { ch: '\u{7f}', offset: 0 })
    ));

    let mut source: &[u8] = b"\r\0";
    assert!(matches!(
        read_string(&mut source),
        Err(CodecError::NonPrintable { ch: '\r', .. })
    ));
}

#[test]
fn test_unicode_control_rejected() {
    let mut source: &[u8] = "x\u{85}\0".as_bytes();
    assert!(matches!(
        read_string(&mut source),
        Err(CodecError::NonPrintable { ch: '\u{85}', offset: 1 })
    ));
}

#[test]
fn test_invalid_utf8_rejected() {
    let mut source: &[u8] = &[0xFF, 0xFE, 0x00];
    assert!(matches!(read_string(&mut source), Err(CodecError::InvalidUtf8)));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_scalars() {
    let test_cases = vec![
        (Value::I8(-1), ByteOrder::Little, vec![0xFF]),
        (Value::U8(7), ByteOrder::Big, vec![0x07]),
        (Value::U16(513), ByteOrder::Little, vec![0x01, 0x02]),
        (Value::U16(513), ByteOrder::Big, vec![0x02, 0x01]),
        (Value::I16(-2), ByteOrder::Big, vec![0xFF, 0xFE]),
        (Value::I32(1), ByteOrder::Little, vec![0x01, 0, 0, 0]),
        (Value::U32(1), ByteOrder::Big, vec![0, 0, 0, 0x01]),
        (Value::I64(-1), ByteOrder::Little, vec![0xFF; 8]),
        (Value::U64(1), ByteOrder::Big, vec![0, 0, 0, 0, 0, 0, 0, 1]),
    ];

    for (value, order, expected) in test_cases {
        assert_eq!(
            encode_to_vec(&value, order).unwrap(),
            expected,
            "Failed for {:?} {:?}",
            value,
            order
        );
    }
}

#[test]
fn test_encode_native_matches_platform() {
    assert_eq!(
        encode_to_vec(&Value::U32(0x01020304), ByteOrder::Native).unwrap(),
        0x01020304u32.to_ne_bytes().to_vec()
    );
}

#[test]
fn test_encode_string_appends_terminator() {
    assert_eq!(
        encode_to_vec(&Value::String("hi".to_string()), ByteOrder::Little).unwrap(),
        b"hi\0".to_vec()
    );
}

#[test]
fn test_encode_string_with_nul_rejected() {
    assert!(matches!(
        encode_to_vec(&Value::String("a\0b".to_string()), ByteOrder::Little),
        Err(CodecError::InteriorNul(_))
    ));
}

#[test]
fn test_encode_arrays() {
    assert_eq!(
        encode_to_vec(&Value::Array(Array::U16(vec![1, 0xFFFF])), ByteOrder::Big).unwrap(),
        vec![0x00, 0x01, 0xFF, 0xFF]
    );
    assert_eq!(
        encode_to_vec(&Value::Array(Array::I8(vec![-1, 1])), ByteOrder::Little).unwrap(),
        vec![0xFF, 0x01]
    );
}

#[test]
fn test_encode_object_in_field_order() {
    let mut inner = Object::new();
    inner.push("len", Value::U16(3));
    let mut obj = Object::new();
    obj.push("tag", Value::U8(9));
    obj.push("header", Value::Object(inner));
    obj.push("name", Value::String("ab".to_string()));

    let mut out = Vec::new();
    encode_output(&mut out, &Output::Object(obj), ByteOrder::Little).unwrap();
    assert_eq!(out, vec![0x09, 0x03, 0x00, b'a', b'b', 0x00]);
}

#[test]
fn test_encode_sequence() {
    let output = Output::Sequence(vec![Value::I8(-1), Value::U16(513)]);
    let mut out = Vec::new();
    encode_output(&mut out, &output, ByteOrder::Little).unwrap();
    assert_eq!(out, vec![0xFF, 0x01, 0x02]);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_fixed_width_decode_encode_preserves_bytes(
        bytes in proptest::collection::vec(any::<u8>(), 23),
        big in any::<bool>(),
    ) {
        let format = if big { ">bHiq4B2h" } else { "<bHiq4B2h" };
        let order = if big { ByteOrder::Big } else { ByteOrder::Little };

        let values = decode_bytes(format, &bytes).unwrap();
        let mut out = Vec::new();
        encode_output(&mut out, &Output::Sequence(values), order).unwrap();
        prop_assert_eq!(out, bytes);
    }

    #[test]
    fn prop_printable_strings_survive(s in "[a-zA-Z0-9 \t\n]{1,32}") {
        let encoded = encode_to_vec(&Value::String(s.clone()), ByteOrder::Native).unwrap();
        let mut source = encoded.as_slice();
        prop_assert_eq!(read_string(&mut source).unwrap(), s);
        prop_assert!(source.is_empty());
    }
}
