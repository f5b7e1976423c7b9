//! Lexical classification of atoms.

use crate::{Position, ReadError};

/// What an atom's lexeme denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    True,
    False,
    Integer,
    Real,
    Character,
    String,
    Symbol,
}

/// Classify a lexeme. Assumes it already passed [`atomize`].
pub fn classify(lexeme: &str) -> AtomKind {
    match lexeme {
        "true" => return AtomKind::True,
        "false" => return AtomKind::False,
        _ => {}
    }
    if lexeme.len() >= 2 && lexeme.starts_with('"') && lexeme.ends_with('"') {
        return AtomKind::String;
    }
    if lexeme.len() >= 2 && lexeme.starts_with('\'') && lexeme.ends_with('\'') {
        return AtomKind::Character;
    }
    if is_integer(lexeme) {
        AtomKind::Integer
    } else if is_real(lexeme) {
        AtomKind::Real
    } else {
        AtomKind::Symbol
    }
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer(s: &str) -> bool {
    all_digits(strip_sign(s))
}

fn is_real(s: &str) -> bool {
    let body = strip_sign(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };
    if let Some(exp) = exponent {
        if !all_digits(strip_sign(exp)) {
            return false;
        }
    }
    match mantissa.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        // Digits with an exponent only, like `1e9`
        None => exponent.is_some() && all_digits(mantissa),
    }
}

/// Validate a raw lexeme: quoted literals must be closed and must not contain
/// an unescaped delimiter, and symbols must not contain quotes.
pub fn atomize(lexeme: &str, pos: Position) -> Result<(), ReadError> {
    let malformed = |reason: &str| ReadError::MalformedAtom {
        lexeme: lexeme.to_string(),
        reason: reason.to_string(),
        pos,
    };

    let Some(first) = lexeme.chars().next() else {
        return Err(malformed("empty lexeme"));
    };

    if first == '"' || first == '\'' {
        let body = &lexeme[1..];
        let mut escaped = false;
        let mut closed_at = None;
        for (idx, c) in body.char_indices() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == first {
                closed_at = Some(idx);
                break;
            }
        }
        match closed_at {
            None => return Err(malformed("missing closing quote")),
            Some(idx) if idx + 1 != body.len() => {
                return Err(malformed("unescaped delimiter inside literal"));
            }
            Some(_) => {}
        }
        if first == '\'' {
            let content = &body[..body.len() - 1];
            if unescape(content).len() != 1 {
                return Err(malformed("character literal must hold exactly one byte"));
            }
        }
        return Ok(());
    }

    if lexeme.contains(['"', '\'']) {
        return Err(malformed("quote inside symbol"));
    }
    Ok(())
}

/// Decode the escapes of a literal's content (without its delimiters) into
/// raw bytes.
pub fn unescape(content: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('0') => out.push(0),
            Some(other) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => out.push(b'\\'),
        }
    }
    out
}

/// The content of a quoted literal without its delimiters.
pub fn literal_content(lexeme: &str) -> &str {
    if lexeme.len() >= 2 {
        &lexeme[1..lexeme.len() - 1]
    } else {
        ""
    }
}
