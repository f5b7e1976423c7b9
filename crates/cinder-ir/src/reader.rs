//! Tokenizer and recursive-descent reader.
//!
//! The reader turns source text into [`Expr`] trees one top-level form at a
//! time. Lexemes keep their original spelling: quoted literals are captured
//! with their delimiters and escapes so the code generator can classify them.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::atom::atomize;
use crate::{Expr, Position};

/// Syntax errors raised while reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("unterminated list opened at {pos}")]
    UnterminatedList { pos: Position },

    #[error("unexpected ')' at {pos}")]
    UnexpectedClose { pos: Position },

    #[error("unexpected end of input at {pos}")]
    UnexpectedEof { pos: Position },

    #[error("unterminated literal starting at {pos}")]
    UnterminatedLiteral { pos: Position },

    #[error("malformed atom {lexeme} at {pos}: {reason}")]
    MalformedAtom {
        lexeme: String,
        reason: String,
        pos: Position,
    },
}

impl ReadError {
    pub fn pos(&self) -> Position {
        match self {
            ReadError::UnterminatedList { pos }
            | ReadError::UnexpectedClose { pos }
            | ReadError::UnexpectedEof { pos }
            | ReadError::UnterminatedLiteral { pos }
            | ReadError::MalformedAtom { pos, .. } => *pos,
        }
    }
}

/// One lexeme with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open(Position),
    Close(Position),
    Atom(String, Position),
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == ';'
}

/// Streaming reader over a source string.
pub struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Reader {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Returns the next lexeme, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        self.skip_trivia();
        let pos = self.position();
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        match c {
            '(' => {
                self.bump();
                Ok(Some(Token::Open(pos)))
            }
            ')' => {
                self.bump();
                Ok(Some(Token::Close(pos)))
            }
            _ => {
                let mut lexeme = String::new();
                if c == '"' || c == '\'' {
                    self.read_quoted(c, &mut lexeme, pos)?;
                }
                // Anything glued to a closing quote stays part of the lexeme
                // so that atomize can reject it.
                while let Some(&c) = self.chars.peek() {
                    if is_delimiter(c) {
                        break;
                    }
                    if c == '"' || c == '\'' {
                        self.read_quoted(c, &mut lexeme, pos)?;
                        continue;
                    }
                    lexeme.push(c);
                    self.bump();
                }
                Ok(Some(Token::Atom(lexeme, pos)))
            }
        }
    }

    fn read_quoted(
        &mut self,
        delimiter: char,
        lexeme: &mut String,
        start: Position,
    ) -> Result<(), ReadError> {
        if let Some(open) = self.bump() {
            lexeme.push(open);
        }
        let mut escaped = false;
        loop {
            let Some(c) = self.bump() else {
                return Err(ReadError::UnterminatedLiteral { pos: start });
            };
            lexeme.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == delimiter {
                return Ok(());
            }
        }
    }

    /// Reads exactly one expression, or returns `None` at end of input.
    pub fn read(&mut self) -> Result<Option<Expr>, ReadError> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => self.read_from(token).map(Some),
        }
    }

    fn read_from(&mut self, token: Token) -> Result<Expr, ReadError> {
        match token {
            Token::Open(pos) => self.read_tail(pos),
            Token::Close(pos) => Err(ReadError::UnexpectedClose { pos }),
            Token::Atom(lexeme, pos) => {
                atomize(&lexeme, pos)?;
                Ok(Expr::atom(lexeme, pos))
            }
        }
    }

    /// Reads list elements up to the matching `)` and chains them.
    fn read_tail(&mut self, open: Position) -> Result<Expr, ReadError> {
        let mut items = Vec::new();
        let close = loop {
            match self.next_token()? {
                None => return Err(ReadError::UnterminatedList { pos: open }),
                Some(Token::Close(pos)) => break pos,
                Some(token) => items.push(self.read_from(token)?),
            }
        };

        let mut tail = Expr::nil(close);
        for item in items.into_iter().rev() {
            tail = Expr::cons(item, tail);
        }
        tail.pos = open;
        Ok(tail)
    }
}

/// Reads the first form of `source`.
pub fn read_str(source: &str) -> Result<Expr, ReadError> {
    let mut reader = Reader::new(source);
    match reader.read()? {
        Some(expr) => Ok(expr),
        None => Err(ReadError::UnexpectedEof {
            pos: reader.position(),
        }),
    }
}

/// Reads every top-level form of `source`.
pub fn read_all(source: &str) -> Result<Vec<Expr>, ReadError> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();
    while let Some(expr) = reader.read()? {
        forms.push(expr);
    }
    Ok(forms)
}
