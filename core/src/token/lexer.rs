use crate::token::{ParseError, Position, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;
    Assign,    // =
    Eq,        // ==
    Ne,        // !=
    Gt,        // >
    Lt,        // <
    Ge,        // >=
    Le,        // <=
    And,       // &&
    Or,        // ||
    Not,       // !
    Add,       // +
    Sub,       // -
    Mul,       // *
    Div,       // /
    Mod,       // %
    // Statement keywords
    If,       // if
    Else,     // else
    While,    // while
    Let,      // let
    Break,    // break
    Continue, // continue
    Raise,    // raise
    Nil,      // nil
    // Literals and identifiers
    Str(String),  // "abc"
    Int(i64),     // 1, 0x2a
    Float(f64),   // 1.1
    Bool(bool),   // true, false
    Id(String),   // identifier
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// [chars] and [idx] can be used for syntax error reporting.
pub struct Tokenizer {
    chars: Vec<char>,
    idx: usize,
    len: usize,
    tokens: Vec<Token>,
    spans: Vec<Span>,
    line: u32,
    column: u32,
}

impl Tokenizer {
    /// Tokenize and return tokens with spans aligned by index.
    pub fn tokenize(s: &str) -> Result<(Vec<Token>, Vec<Span>), ParseError> {
        let chars: Vec<char> = s.chars().collect();
        let mut t = Tokenizer {
            len: chars.len(),
            chars,
            idx: 0,
            tokens: Vec::with_capacity(s.len() / 4),
            spans: Vec::with_capacity(s.len() / 4),
            line: 1,
            column: 1,
        };
        t.run()?;
        Ok((t.tokens, t.spans))
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.idx)
    }

    fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError::with_position(msg.into(), self.position())
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    #[inline]
    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.idx + 1).copied()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.idx).copied()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, token: Token, start: Position) {
        self.tokens.push(token);
        self.spans.push(Span::new(start, self.position()));
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.idx < self.len {
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };

            if c.is_whitespace() {
                self.advance();
                continue;
            }

            // Line comments
            if c == '/' && self.peek_next() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            let start = self.position();

            if c == '"' {
                let s = self.read_string()?;
                self.push(Token::Str(s), start);
                continue;
            }

            if c.is_ascii_digit() {
                let token = self.read_number()?;
                self.push(token, start);
                continue;
            }

            if is_ident_start(c) {
                let word = self.read_ident();
                let token = match word.as_str() {
                    "if" => Token::If,
                    "else" => Token::Else,
                    "while" => Token::While,
                    "let" => Token::Let,
                    "break" => Token::Break,
                    "continue" => Token::Continue,
                    "raise" => Token::Raise,
                    "nil" => Token::Nil,
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    _ => Token::Id(word),
                };
                self.push(token, start);
                continue;
            }

            let token = self.read_operator()?;
            self.push(token, start);
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<String, ParseError> {
        self.advance(); // opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(out),
                Some('\\') => match self.advance() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some(other) => {
                        return Err(self.error(format!("Unknown escape '\\{}'", other)));
                    }
                    None => return Err(self.error("Unterminated string literal")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("Unterminated string literal")),
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, ParseError> {
        // Hex literals are common for addresses and thread ids
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x') | Some('X')) {
            self.advance();
            self.advance();
            let mut digits = String::new();
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() {
                    digits.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            if digits.is_empty() {
                return Err(self.error("Expected hex digits after '0x'"));
            }
            return i64::from_str_radix(&digits, 16)
                .map(Token::Int)
                .map_err(|_| self.error(format!("Hex literal '0x{}' out of range", digits)));
        }

        let mut text = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !is_float && matches!(self.peek_next(), Some(d) if d.is_ascii_digit()) {
                is_float = true;
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error(format!("Invalid float literal '{}'", text)))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| self.error(format!("Integer literal '{}' out of range", text)))
        }
    }

    fn read_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }
        out
    }

    fn read_operator(&mut self) -> Result<Token, ParseError> {
        let c = match self.advance() {
            Some(c) => c,
            None => return Err(self.error("Unexpected end of input")),
        };
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '+' => Token::Add,
            '-' => Token::Sub,
            '*' => Token::Mul,
            '/' => Token::Div,
            '%' => Token::Mod,
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Eq
                } else {
                    Token::Assign
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Ne
                } else {
                    Token::Not
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Token::And
                } else {
                    return Err(self.error("Expected '&&'"));
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Token::Or
                } else {
                    return Err(self.error("Expected '||'"));
                }
            }
            other => return Err(self.error(format!("Unexpected character '{}'", other))),
        };
        Ok(token)
    }
}
