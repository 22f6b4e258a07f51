use crate::ast::ByteOrder;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Run of decimal digits, used as an array count or a field index
    ///
    /// # Examples
    /// ```text
    /// 4B
    /// {0 -> key}
    /// ```
    Number(usize),

    /// String literal enclosed in double quotes, escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// write("out.bin")
    /// "say \"hi\""
    /// ```
    String(String),

    // Names
    /// Field name or function name
    ///
    /// Must start with letter or underscore, followed by letters, digits, or underscores.
    /// A lone format-code letter is lexed as [`Token::Format`] instead.
    ///
    /// # Examples
    /// ```text
    /// parse
    /// header_len
    /// bar
    /// ```
    Ident(String),

    /// Single format-code letter (`b B h H i I q Q s`)
    ///
    /// # Examples
    /// ```text
    /// bH      -> Format('b'), Format('H')
    /// b4B     -> Format('b'), Number(4), Format('B')
    /// ```
    Format(char),

    /// Byte-order prefix (`<`, `>` or `@`)
    Order(ByteOrder),

    // Operators
    /// Pipeline operator
    ///
    /// # Examples
    /// ```text
    /// <bH | {0 -> key, 1 -> value} | write("out.bin")
    /// ```
    Pipe,

    /// Index-to-name mapping inside an object
    Arrow,

    // Delimiters
    /// Left brace opening an object
    LBrace,

    /// Right brace
    RBrace,

    /// Left parenthesis for function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Colon introducing a nested object
    Colon,

    /// Comma separating object fields
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string {:?}", s),
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::Format(c) => format!("format code '{}'", c),
            Token::Order(order) => format!("'{}'", order.marker()),
            Token::Pipe => "'|'".to_string(),
            Token::Arrow => "'->'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
