use crate::{
    ast::{ByteOrder, Expr, FieldDef, FormatCode, FormatKind, Node, ObjectNode, Token, WriteNode},
    lexer::{LexError, Lexer},
};
use std::mem;

/// Errors raised while building the expression tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("unexpected {found} at position {position} after end of expression")]
    TrailingInput { found: String, position: usize },

    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("function '{name}' is not allowed at position {position}")]
    MisplacedFunction { name: String, position: usize },

    #[error("count must be at least 1 at position {position}")]
    ZeroCount { position: usize },

    #[error("expected format code after count at position {position}, found {found}")]
    CountWithoutFormat { found: String, position: usize },

    #[error("count prefix is not supported for string code 's' at position {position}")]
    StringCount { position: usize },

    #[error("expected format codes at position {position}, found {found}")]
    MissingFormat { found: String, position: usize },
}

/// Recursive-descent parser for bq expressions.
///
/// ```text
/// Expression  := Pipe
/// Pipe        := Primary ( '|' Stage )*
/// Stage       := Object | WriteCall
/// Primary     := FunctionCall | FormatExpr
/// FunctionCall:= IDENT '(' Arg ')'
/// FormatExpr  := Order? (Count? FormatCode)+
/// Object      := '{' FieldItem (',' FieldItem)* '}'
/// FieldItem   := IndexField | NestedField
/// IndexField  := NUMBER '->' NAME
/// NestedField := NAME ':' Object
/// ```
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(what));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current_token.describe(),
            position: self.current_position,
        }
    }

    /// Parses a complete expression; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_pipe()?;
        if !self.check(&Token::Eof) {
            return Err(ParseError::TrailingInput {
                found: self.current_token.describe(),
                position: self.current_position,
            });
        }
        Ok(node)
    }

    /// Pipes associate to the left: `a | b | c` is `(a | b) | c`.
    fn parse_pipe(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        let order = node.source_expr().map(|expr| expr.order).unwrap_or_default();

        while self.check(&Token::Pipe) {
            self.advance()?;
            let stage = self.parse_stage(order)?;
            node = Node::pipe(node, stage);
        }

        Ok(node)
    }

    fn parse_stage(&mut self, order: ByteOrder) -> Result<Node, ParseError> {
        match &self.current_token {
            Token::LBrace => Ok(Node::Object(self.parse_object()?)),
            Token::Ident(name) => {
                let name = name.clone();
                let position = self.current_position;
                if self.lexer.peek_token()? != Token::LParen {
                    return Err(self.unexpected("'{' or write(...)"));
                }
                match name.as_str() {
                    "write" => self.parse_write_call(order),
                    "parse" => Err(ParseError::MisplacedFunction { name, position }),
                    _ => Err(ParseError::UnknownFunction { name, position }),
                }
            }
            _ => Err(self.unexpected("'{' or write(...)")),
        }
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        if let Token::Ident(_) = self.current_token {
            if self.lexer.peek_token()? == Token::LParen {
                return self.parse_function_call();
            }
        }
        Ok(Node::Format(self.parse_format_expr()?))
    }

    /// `parse(<format>)` is the only function allowed at the head of a pipeline.
    fn parse_function_call(&mut self) -> Result<Node, ParseError> {
        let position = self.current_position;
        let name = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Ident(name) => name,
            _ => return Err(self.unexpected("function name")),
        };
        match name.as_str() {
            "parse" => {}
            "write" => return Err(ParseError::MisplacedFunction { name, position }),
            _ => return Err(ParseError::UnknownFunction { name, position }),
        }
        self.advance()?;

        self.expect(Token::LParen, "'(' after function name")?;
        let expr = self.parse_format_expr()?;
        self.expect(Token::RParen, "')' after function argument")?;

        Ok(Node::Format(expr))
    }

    fn parse_write_call(&mut self, order: ByteOrder) -> Result<Node, ParseError> {
        self.advance()?; // 'write'
        self.expect(Token::LParen, "'(' after function name")?;

        let path = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(path) => path,
            other => {
                self.current_token = other;
                return Err(self.unexpected("string literal path"));
            }
        };
        self.advance()?;

        self.expect(Token::RParen, "')' after function argument")?;

        Ok(Node::Write(WriteNode { path, order }))
    }

    fn parse_format_expr(&mut self) -> Result<Expr, ParseError> {
        let mut order = ByteOrder::Native;
        if let Token::Order(marker) = self.current_token {
            order = marker;
            self.advance()?;
        }

        let mut formats = Vec::new();
        loop {
            match self.current_token {
                Token::Number(count) => {
                    let count_position = self.current_position;
                    if count == 0 {
                        return Err(ParseError::ZeroCount {
                            position: count_position,
                        });
                    }
                    self.advance()?;

                    let Token::Format(code) = self.current_token else {
                        return Err(ParseError::CountWithoutFormat {
                            found: self.current_token.describe(),
                            position: self.current_position,
                        });
                    };
                    let kind = self.format_kind(code)?;
                    if kind == FormatKind::Str && count > 1 {
                        return Err(ParseError::StringCount {
                            position: count_position,
                        });
                    }
                    formats.push(FormatCode::new(kind, count));
                    self.advance()?;
                }
                Token::Format(code) => {
                    formats.push(FormatCode::single(self.format_kind(code)?));
                    self.advance()?;
                }
                _ => break,
            }
        }

        if formats.is_empty() {
            return Err(ParseError::MissingFormat {
                found: self.current_token.describe(),
                position: self.current_position,
            });
        }

        Ok(Expr::new(order, formats))
    }

    fn format_kind(&self, code: char) -> Result<FormatKind, ParseError> {
        FormatKind::from_code(code).ok_or_else(|| self.unexpected("format code"))
    }

    fn parse_object(&mut self) -> Result<ObjectNode, ParseError> {
        self.expect(Token::LBrace, "'{'")?;

        let mut fields = vec![self.parse_field_item()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            fields.push(self.parse_field_item()?);
        }

        self.expect(Token::RBrace, "'}'")?;

        Ok(ObjectNode::new(fields))
    }

    /// A name followed by ':' opens a nested object; anything else must be `index -> name`.
    fn parse_field_item(&mut self) -> Result<FieldDef, ParseError> {
        if matches!(self.current_token, Token::Ident(_) | Token::Format(_))
            && self.lexer.peek_token()? == Token::Colon
        {
            return self.parse_nested_field();
        }
        self.parse_index_field()
    }

    fn parse_index_field(&mut self) -> Result<FieldDef, ParseError> {
        let Token::Number(index) = self.current_token else {
            return Err(self.unexpected("field index"));
        };
        self.advance()?;

        self.expect(Token::Arrow, "'->'")?;
        let name = self.parse_name("field name")?;

        Ok(FieldDef::Index { index, name })
    }

    fn parse_nested_field(&mut self) -> Result<FieldDef, ParseError> {
        let name = self.parse_name("nested field name")?;
        self.expect(Token::Colon, "':'")?;
        let object = self.parse_object()?;

        Ok(FieldDef::Nested { name, object })
    }

    /// Field names may also be lone format-code letters such as `b` or `H`.
    fn parse_name(&mut self, what: &'static str) -> Result<String, ParseError> {
        let name = match &self.current_token {
            Token::Ident(name) => name.clone(),
            Token::Format(code) => code.to_string(),
            _ => return Err(self.unexpected(what)),
        };
        self.advance()?;
        Ok(name)
    }
}

/// Parses an expression string into its tree.
///
/// # Examples
///
/// ```
/// use bq_lang::{parse, Node};
///
/// let node = parse("<bH | {0 -> key, 1 -> value}").unwrap();
/// assert!(matches!(node, Node::Pipe { .. }));
/// ```
pub fn parse(expression: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(expression))?.parse()
}
