//! Tests for cinder-ir.

use crate::{Expr, ExprKind, Position, ReadError, Reader, Token, print, read_all, read_str};

fn round_trip(source: &str) {
    let first = read_str(source).unwrap();
    let printed = print(&first);
    let second = read_str(&printed).unwrap();
    assert_eq!(first, second, "re-reading {:?} changed the tree", printed);
    assert_eq!(print(&second), printed);
}

#[test]
fn test_read_list() {
    let expr = read_str("(+ 1 2)").unwrap();
    assert!(expr.is_list());
    assert_eq!(expr.len(), 3);
    assert_eq!(expr.nth(0).unwrap().as_atom(), Some("+"));
    assert_eq!(expr.nth(1).unwrap().as_atom(), Some("1"));
    assert_eq!(expr.nth(2).unwrap().as_atom(), Some("2"));
}

#[test]
fn test_read_unterminated_list() {
    let err = read_str("(+ 1 2").unwrap_err();
    assert_eq!(
        err,
        ReadError::UnterminatedList {
            pos: Position::new(1, 1)
        }
    );
}

#[test]
fn test_read_unexpected_close() {
    let err = read_str(")").unwrap_err();
    assert!(matches!(err, ReadError::UnexpectedClose { .. }));
}

#[test]
fn test_read_empty_input() {
    assert!(matches!(
        read_str("  ; only a comment\n").unwrap_err(),
        ReadError::UnexpectedEof { .. }
    ));
}

#[test]
fn test_read_empty_list_is_nil() {
    let expr = read_str("()").unwrap();
    assert!(expr.is_nil());
    assert_eq!(expr.len(), 0);
    assert_eq!(print(&expr), "()");
}

#[test]
fn test_read_nested() {
    let expr = read_str("(def x (+ 1 (* 2 3)))").unwrap();
    assert_eq!(expr.len(), 3);
    let inner = expr.nth(2).unwrap();
    assert!(inner.is_list());
    assert_eq!(inner.nth(2).unwrap().len(), 3);
}

#[test]
fn test_read_list_in_head_position() {
    let expr = read_str("((f) x)").unwrap();
    assert!(expr.head().unwrap().is_list());
}

#[test]
fn test_positions() {
    let expr = read_str("(a\n  (b c))").unwrap();
    assert_eq!(expr.pos, Position::new(1, 1));
    assert_eq!(expr.nth(0).unwrap().pos, Position::new(1, 2));
    let inner = expr.nth(1).unwrap();
    assert_eq!(inner.pos, Position::new(2, 3));
    assert_eq!(inner.nth(1).unwrap().pos, Position::new(2, 6));
}

#[test]
fn test_comments_and_whitespace() {
    let expr = read_str("; header\n(  f\t; trailing\n  1 )").unwrap();
    assert_eq!(print(&expr), "(f 1)");
}

#[test]
fn test_string_literal_kept_verbatim() {
    let expr = read_str(r#"(print "a (b) ; c\"d")"#).unwrap();
    assert_eq!(expr.nth(1).unwrap().as_atom(), Some(r#""a (b) ; c\"d""#));
}

#[test]
fn test_character_literal() {
    let expr = read_str("(f '(' '\\n')").unwrap();
    assert_eq!(expr.nth(1).unwrap().as_atom(), Some("'('"));
    assert_eq!(expr.nth(2).unwrap().as_atom(), Some("'\\n'"));
}

#[test]
fn test_unterminated_string() {
    let err = read_str("(f \"abc)").unwrap_err();
    assert_eq!(
        err,
        ReadError::UnterminatedLiteral {
            pos: Position::new(1, 4)
        }
    );
}

#[test]
fn test_malformed_atoms() {
    assert!(matches!(
        read_str("\"ab\"cd").unwrap_err(),
        ReadError::MalformedAtom { .. }
    ));
    assert!(matches!(
        read_str("ab\"c\"").unwrap_err(),
        ReadError::MalformedAtom { .. }
    ));
    assert!(matches!(
        read_str("'ab'").unwrap_err(),
        ReadError::MalformedAtom { .. }
    ));
}

#[test]
fn test_round_trip() {
    round_trip("(+ 1 2)");
    round_trip("(def   x\n (let ((y 2.5)) (* y y)))");
    round_trip("(f \"str with (parens)\" 'c' () (()))");
    round_trip("atom");
    round_trip("(a (b (c (d (e)))))");
}

#[test]
fn test_round_trip_literal_edge_cases() {
    let cases = [
        r#"(f "a;b" "c)d" "(e")"#,
        r#"("esc\"aped" "back\\slash" "tab\there")"#,
        r#"('(' ')' '\'' ';' '\n')"#,
        "(() (()) (a ()) ((())))",
        "(x ; comment with ) and \"quote\n y)",
        "(a.b -1 +2 1e10 0.5 x->y)",
        r#""lone;string""#,
        "'z'",
    ];
    for source in cases {
        round_trip(source);
    }
}

#[test]
fn test_round_trip_generated_nesting() {
    let atoms = [r#""s;)""#, "'('", "()", "x", r#""q\"""#, "(())"];
    let depth = 60;
    let mut source = String::new();
    for i in 0..depth {
        source.push('(');
        source.push_str(atoms[i % atoms.len()]);
        source.push(' ');
    }
    source.push_str("end");
    source.push_str(&")".repeat(depth));
    round_trip(&source);
}

#[test]
fn test_read_all() {
    let forms = read_all("(a) b (c d)\n; done").unwrap();
    assert_eq!(forms.len(), 3);
    assert_eq!(print(&forms[1]), "b");
}

#[test]
fn test_tokens() {
    let mut reader = Reader::new("(x \"y\")");
    assert_eq!(
        reader.next_token().unwrap(),
        Some(Token::Open(Position::new(1, 1)))
    );
    assert_eq!(
        reader.next_token().unwrap(),
        Some(Token::Atom("x".into(), Position::new(1, 2)))
    );
    assert_eq!(
        reader.next_token().unwrap(),
        Some(Token::Atom("\"y\"".into(), Position::new(1, 4)))
    );
    assert_eq!(
        reader.next_token().unwrap(),
        Some(Token::Close(Position::new(1, 7)))
    );
    assert_eq!(reader.next_token().unwrap(), None);
}

#[test]
fn test_cons_and_nth() {
    let pos = Position::default();
    let list = Expr::list(
        vec![Expr::atom("a", pos), Expr::atom("b", pos)],
        pos,
    );
    assert_eq!(list.len(), 2);
    assert_eq!(list.nth(1).unwrap().as_atom(), Some("b"));

    let err = list.nth(2).unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.len, 2);
}

#[test]
fn test_improper_cons_prints_dotted() {
    let pos = Position::default();
    let pair = Expr::cons(Expr::atom("a", pos), Expr::atom("b", pos));
    assert_eq!(print(&pair), "(a . b)");
    assert!(matches!(pair.kind, ExprKind::Cons(..)));
    assert_eq!(pair.len(), 1);
}

#[test]
fn test_serialize_json() {
    let expr = read_str("(f 1 (g \"s\"))").unwrap();
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(json, serde_json::json!(["f", "1", ["g", "\"s\""]]));
}

#[test]
fn test_deep_nesting() {
    let depth = 200;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let expr = read_str(&source).unwrap();
    assert_eq!(print(&expr), source);
}

#[test]
fn test_long_flat_list() {
    let count = 300_000;
    let source = format!("(begin{})", " 1".repeat(count));
    let expr = read_str(&source).unwrap();
    assert_eq!(expr.len(), count + 1);

    let copy = expr.clone();
    assert!(copy == expr);
    assert!(print(&copy).starts_with("(begin 1 1 "));

    let built = Expr::list(vec![Expr::atom("1", Position::default()); count], Position::default());
    assert!(built != expr);
    drop(copy);
    drop(built);
    drop(expr);
}
