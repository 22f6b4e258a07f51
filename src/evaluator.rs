use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
};

use crate::{
    ast::{FieldDef, Node, ObjectNode, WriteNode},
    codec::{self, CodecError},
    value::{Object, Output, Value},
};

/// Errors that can occur while evaluating an expression tree.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Decoding or encoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An object stage received something other than a flat sequence
    #[error("object stage expects a value sequence as input, got {found}")]
    NotASequence { found: &'static str },

    /// Field index outside the upstream sequence
    #[error("field '{field}': index {index} out of range (have {len} values)")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },

    /// Failure inside a nested object, tagged with the field that owns it
    #[error("nested field '{field}': {source}")]
    Nested {
        field: String,
        #[source]
        source: Box<EvalError>,
    },

    /// The target of `write(...)` could not be created or written
    #[error("write to '{path}' failed: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl Node {
    /// Evaluates the tree against a byte source with an empty upstream.
    ///
    /// # Examples
    ///
    /// ```
    /// use bq_lang::{parse, Output, Value};
    ///
    /// let node = parse("<bH").unwrap();
    /// let out = node.evaluate(&mut &[0xFF, 0x01, 0x02][..]).unwrap();
    /// assert_eq!(out, Output::Sequence(vec![Value::I8(-1), Value::U16(513)]));
    /// ```
    pub fn evaluate<R: Read + ?Sized>(&self, source: &mut R) -> Result<Output, EvalError> {
        self.eval(source, Output::Sequence(Vec::new()))
    }

    /// Evaluates this node given the output of the previous stage.
    ///
    /// Format nodes ignore `upstream` and read from `source`; object nodes
    /// ignore `source`; write nodes encode `upstream` and hand it back.
    pub fn eval<R: Read + ?Sized>(
        &self,
        source: &mut R,
        upstream: Output,
    ) -> Result<Output, EvalError> {
        match self {
            Node::Format(expr) => Ok(Output::Sequence(codec::decode(source, expr)?)),
            Node::Pipe { left, right } => {
                let left_output = left.eval(source, upstream)?;
                right.eval(source, left_output)
            }
            Node::Object(object) => match upstream {
                Output::Sequence(values) => Ok(Output::Object(object.build(&values)?)),
                other => Err(EvalError::NotASequence {
                    found: other.type_name(),
                }),
            },
            Node::Write(write) => {
                write.write_file(&upstream)?;
                Ok(upstream)
            }
        }
    }
}

impl ObjectNode {
    /// Builds an object from a decoded sequence.
    ///
    /// Nested objects see the same full sequence as their parent, so one
    /// index may be referenced by several fields.
    pub fn build(&self, values: &[Value]) -> Result<Object, EvalError> {
        let mut obj = Object::new();

        for field in &self.fields {
            match field {
                FieldDef::Index { index, name } => {
                    let value = values.get(*index).ok_or_else(|| EvalError::IndexOutOfRange {
                        field: name.clone(),
                        index: *index,
                        len: values.len(),
                    })?;
                    obj.push(name.clone(), value.clone());
                }
                FieldDef::Nested { name, object } => {
                    let nested = object.build(values).map_err(|e| EvalError::Nested {
                        field: name.clone(),
                        source: Box::new(e),
                    })?;
                    obj.push(name.clone(), Value::Object(nested));
                }
            }
        }

        Ok(obj)
    }
}

impl WriteNode {
    /// Creates or truncates the target file and encodes `output` into it.
    pub fn write_file(&self, output: &Output) -> Result<(), EvalError> {
        let io_error = |source: io::Error| EvalError::Write {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        codec::encode_output(&mut writer, output, self.order).map_err(|e| match e {
            CodecError::Io(source) => io_error(source),
            other => EvalError::Codec(other),
        })?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }
}
