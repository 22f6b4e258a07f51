use crate::ast::{ByteOrder, Expr};

/// A node of the expression tree.
///
/// The set of node kinds is closed; evaluation is a single match over it
/// (see [`Node::eval`](crate::ast::Node::eval)).
///
/// # Examples
/// ```text
/// <bH                                  Format
/// <bH | {0 -> key, 1 -> value}         Pipe(Format, Object)
/// <bH | {0 -> a} | write("out.bin")    Pipe(Pipe(Format, Object), Write)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Decodes values from the byte source
    Format(Expr),

    /// Feeds the output of `left` into `right`
    Pipe { left: Box<Node>, right: Box<Node> },

    /// Regroups a value sequence into named fields
    Object(ObjectNode),

    /// Serializes its upstream to a file and passes it through
    Write(WriteNode),
}

impl Node {
    pub fn pipe(left: Node, right: Node) -> Self {
        Node::Pipe {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The format expression at the head of the pipeline, if any.
    pub fn source_expr(&self) -> Option<&Expr> {
        match self {
            Node::Format(expr) => Some(expr),
            Node::Pipe { left, .. } => left.source_expr(),
            _ => None,
        }
    }
}

/// Object construction: `{0 -> key, nested: {1 -> value}}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode {
    pub fields: Vec<FieldDef>,
}

impl ObjectNode {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        ObjectNode { fields }
    }
}

/// One entry of an object definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDef {
    /// `index -> name`: takes the value at `index` of the upstream sequence
    Index { index: usize, name: String },

    /// `name: {...}`: builds a nested object from the same upstream sequence
    Nested { name: String, object: ObjectNode },
}

impl FieldDef {
    pub fn name(&self) -> &str {
        match self {
            FieldDef::Index { name, .. } | FieldDef::Nested { name, .. } => name,
        }
    }
}

/// `write("path")` stage.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteNode {
    pub path: String,
    /// Byte order of the format expression feeding this pipeline
    pub order: ByteOrder,
}
