//! Expression tree types.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A 1-based source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Positional access past the end of a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("index {index} out of range for list of length {len} at {pos}")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
    pub pos: Position,
}

/// The shape of an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// The empty list, also used as the terminator of every list chain.
    Nil,
    /// A leaf carrying its lexeme verbatim.
    Atom(String),
    /// A cons pair: head element and the rest of the chain.
    Cons(Box<Expr>, Box<Expr>),
}

/// An expression node.
///
/// Lists are cons chains: `(a b c)` is `Cons(a, Cons(b, Cons(c, Nil)))`.
/// Every node owns its children outright, so a tree can never share or
/// cycle, and dropping the root releases everything below it.
///
/// ```
/// use cinder_ir::{Expr, Position};
///
/// let pos = Position::new(1, 1);
/// let list = Expr::cons(
///     Expr::atom("+", pos),
///     Expr::cons(Expr::atom("1", pos), Expr::nil(pos)),
/// );
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.to_string(), "(+ 1)");
/// ```
///
/// Dropping, cloning and comparing walk the tail chain in a loop, so a long
/// flat list costs no more stack than a short one.
#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

impl Expr {
    /// Creates an atom.
    pub fn atom(lexeme: impl Into<String>, pos: Position) -> Self {
        Expr {
            kind: ExprKind::Atom(lexeme.into()),
            pos,
        }
    }

    /// Creates the empty list.
    pub fn nil(pos: Position) -> Self {
        Expr {
            kind: ExprKind::Nil,
            pos,
        }
    }

    /// Creates a list node with `first` as its head and `second` as its tail.
    /// The new node takes the position of its head.
    pub fn cons(first: Expr, second: Expr) -> Self {
        let pos = first.pos;
        Expr {
            kind: ExprKind::Cons(Box::new(first), Box::new(second)),
            pos,
        }
    }

    /// Builds a proper list from its elements.
    pub fn list(items: Vec<Expr>, pos: Position) -> Self {
        let mut tail = Expr::nil(pos);
        for item in items.into_iter().rev() {
            tail = Expr::cons(item, tail);
        }
        tail.pos = pos;
        tail
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ExprKind::Nil)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.kind, ExprKind::Atom(_))
    }

    /// Returns true for cons nodes. The empty list is not considered a list
    /// here because it has no head to dispatch on.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, ExprKind::Cons(..))
    }

    /// Returns the lexeme if this is an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Atom(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the head element if this is a cons node.
    pub fn head(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Cons(first, _) => Some(first.as_ref()),
            _ => None,
        }
    }

    /// Returns the rest of the chain if this is a cons node.
    pub fn tail(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Cons(_, rest) => Some(rest.as_ref()),
            _ => None,
        }
    }

    /// Iterates over the chained elements of a list. Atoms and nil yield
    /// nothing.
    pub fn iter(&self) -> Iter<'_> {
        Iter { cursor: self }
    }

    /// Number of chained list elements.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `index`-th chained element.
    pub fn nth(&self, index: usize) -> Result<&Expr, IndexError> {
        self.iter().nth(index).ok_or_else(|| IndexError {
            index,
            len: self.len(),
            pos: self.pos,
        })
    }

    /// Elements after the head.
    pub fn args(&self) -> Vec<&Expr> {
        self.iter().skip(1).collect()
    }

    /// Structural equality, ignoring positions.
    pub fn same_shape(&self, other: &Expr) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (&a.kind, &b.kind) {
                (ExprKind::Cons(a_head, a_rest), ExprKind::Cons(b_head, b_rest)) => {
                    if !a_head.same_shape(b_head) {
                        return false;
                    }
                    a = a_rest.as_ref();
                    b = b_rest.as_ref();
                }
                (ExprKind::Nil, ExprKind::Nil) => return true,
                (ExprKind::Atom(x), ExprKind::Atom(y)) => return x == y,
                _ => return false,
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        let mut heads = Vec::new();
        let mut cursor = self;
        while let ExprKind::Cons(head, rest) = &cursor.kind {
            heads.push((head.as_ref().clone(), cursor.pos));
            cursor = rest.as_ref();
        }
        // `cursor` is now nil or an atom, so this clone is shallow
        let mut out = Expr {
            kind: cursor.kind.clone(),
            pos: cursor.pos,
        };
        for (head, pos) in heads.into_iter().rev() {
            out = Expr {
                kind: ExprKind::Cons(Box::new(head), Box::new(out)),
                pos,
            };
        }
        out
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut rest = match std::mem::replace(&mut self.kind, ExprKind::Nil) {
            ExprKind::Cons(_, rest) => rest,
            _ => return,
        };
        // Unlink one cell at a time; each head drops with nesting-depth recursion
        while let ExprKind::Cons(_, next) = std::mem::replace(&mut rest.kind, ExprKind::Nil) {
            rest = next;
        }
    }
}

/// Iterator over the elements of a cons chain.
pub struct Iter<'a> {
    cursor: &'a Expr,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor;
        match &cursor.kind {
            ExprKind::Cons(first, rest) => {
                self.cursor = rest.as_ref();
                Some(first.as_ref())
            }
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Expr {
    type Item = &'a Expr;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Nil => write!(f, "()"),
            ExprKind::Atom(lexeme) => write!(f, "{}", lexeme),
            ExprKind::Cons(..) => {
                write!(f, "(")?;
                let mut cursor = self;
                let mut first = true;
                loop {
                    match &cursor.kind {
                        ExprKind::Cons(head, rest) => {
                            if !first {
                                write!(f, " ")?;
                            }
                            write!(f, "{}", head)?;
                            first = false;
                            cursor = rest.as_ref();
                        }
                        ExprKind::Nil => break,
                        // Improper tail, only reachable through `Expr::cons`
                        ExprKind::Atom(_) => {
                            write!(f, " . {}", cursor)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}

// Atoms serialize as strings and lists as arrays of their elements.
impl Serialize for Expr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.kind {
            ExprKind::Atom(lexeme) => serializer.serialize_str(lexeme),
            _ => serializer.collect_seq(self.iter()),
        }
    }
}
