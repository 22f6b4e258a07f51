use crate::ast::{ByteOrder, FormatKind, Token};

/// Errors raised while splitting an expression into tokens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("unknown escape sequence '\\{ch}' at position {position}")]
    UnknownEscape { ch: char, position: usize },

    #[error("number '{text}' at position {position} is too large")]
    NumberTooLarge { text: String, position: usize },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Offset (in characters) where the most recently returned token starts.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(LexError::UnknownEscape {
                                ch,
                                position: escape_at,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
            .parse::<usize>()
            .map(Token::Number)
            .map_err(|_| LexError::NumberTooLarge {
                text: number,
                position: start,
            })
    }

    /// A format-code letter stands alone unless it begins a longer word:
    /// `bH` is two codes, `b4` is a code and a count, `bar` is an identifier.
    fn is_format_code_here(&self, ch: char) -> bool {
        if !FormatKind::is_code(ch) {
            return false;
        }
        match self.peek_char(1) {
            None => true,
            Some(next) => !is_word_char(next) || FormatKind::is_code(next) || next.is_ascii_digit(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        if let Some(order) = self.current_char().and_then(ByteOrder::from_marker) {
            self.advance();
            return Ok(Token::Order(order));
        }

        let token = match self.current_char() {
            None => Token::Eof,
            Some('|') => {
                self.advance();
                Token::Pipe
            }
            Some('{') => {
                self.advance();
                Token::LBrace
            }
            Some('}') => {
                self.advance();
                Token::RBrace
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some(':') => {
                self.advance();
                Token::Colon
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('-') => {
                if self.peek_char(1) == Some('>') {
                    self.advance();
                    self.advance();
                    Token::Arrow
                } else {
                    return Err(LexError::UnexpectedChar {
                        ch: '-',
                        position: self.position,
                    });
                }
            }
            Some('"') => Token::String(self.read_string()?),
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if self.is_format_code_here(ch) => {
                self.advance();
                Token::Format(ch)
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                Token::Ident(self.read_identifier())
            }
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: self.position,
                });
            }
        };

        Ok(token)
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token, LexError> {
        let saved_position = self.position;
        let saved_start = self.token_start;
        let token = self.next_token();
        self.position = saved_position;
        self.token_start = saved_start;
        token
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[test]
fn test_format_code_disambiguation() {
    let mut lexer = Lexer::new("bar bH b4B");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("bar".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('b'));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('H'));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('b'));
    assert_eq!(lexer.next_token().unwrap(), Token::Number(4));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('B'));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_pipe() {
    let mut lexer = Lexer::new("<bH | {0 -> key}");
    assert_eq!(lexer.next_token().unwrap(), Token::Order(ByteOrder::Little));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('b'));
    assert_eq!(lexer.next_token().unwrap(), Token::Format('H'));
    assert_eq!(lexer.next_token().unwrap(), Token::Pipe);
    assert_eq!(lexer.next_token().unwrap(), Token::LBrace);
    assert_eq!(lexer.next_token().unwrap(), Token::Number(0));
    assert_eq!(lexer.next_token().unwrap(), Token::Arrow);
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("key".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::RBrace);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
