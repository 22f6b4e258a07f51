//! # bq Expression Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for bq expressions,
//! a small declarative language that describes how to decode a binary stream,
//! regroup the decoded values, and optionally write them back out.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[format]** - Format codes, byte order, and format expressions
//! - **[node]** - Tree nodes (format, pipe, object, write)
//!
//! ## Quick Start
//!
//! ```text
//! <bH | {0 -> key, 1 -> value}
//! ```
//!
//! Decodes a signed byte and a little-endian `u16`, then names them.
//!
//! ## Format Codes
//!
//! | code | bytes | type   |
//! |------|-------|--------|
//! | `b`  | 1     | int8   |
//! | `B`  | 1     | uint8  |
//! | `h`  | 2     | int16  |
//! | `H`  | 2     | uint16 |
//! | `i`  | 4     | int32  |
//! | `I`  | 4     | uint32 |
//! | `q`  | 8     | int64  |
//! | `Q`  | 8     | uint64 |
//! | `s`  | -     | null-terminated string |
//!
//! A leading count turns a code into an array (`4B`), and a leading `<`, `>`
//! or `@` picks the byte order for the whole expression.
//!
//! ## Pipeline Structure
//!
//! ```text
//! format | stage | stage | ...
//! ```
//!
//! A stage is either an object `{...}` or `write("path")`.
//!
//! ### Index Reuse
//!
//! Nested objects see the full upstream sequence, so the same decoded value
//! may appear under several names:
//!
//! ```text
//! <bH | {0 -> tag, raw: {0 -> tag, 1 -> len}}
//! ```
//!
//! ## Examples
//!
//! ```text
//! parse(>I)                            # same as >I
//! Bs | {0 -> version, 1 -> name}
//! <4B | write("copy.bin")
//! ```
pub mod format;
pub mod node;
pub mod tokens;

pub use format::{ByteOrder, Endianness, Expr, FormatCode, FormatKind};
pub use node::{FieldDef, Node, ObjectNode, WriteNode};
pub use tokens::Token;
