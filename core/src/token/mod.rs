mod error;
mod lexer;


pub use error::{ParseError, Position, Span};
pub use lexer::{Token, Tokenizer};
