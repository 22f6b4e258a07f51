pub mod ast;
pub mod cli;
pub mod codec;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{
    ByteOrder, Expr, FieldDef, FormatCode, FormatKind, Node, ObjectNode, Token, WriteNode,
};
pub use codec::CodecError;
pub use evaluator::EvalError;
pub use lexer::{LexError, Lexer};
pub use output::{render_table, to_json, to_json_pretty};
pub use parser::{ParseError, Parser, parse};
pub use value::{Array, Object, ObjectField, Output, Value};
