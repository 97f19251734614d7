use crate::ast::{BinOp, Expr, Parser, Program, Stmt};
use crate::token::{ParseError, Tokenizer};

fn parse(src: &str) -> Result<Program, ParseError> {
    let (tokens, spans) = Tokenizer::tokenize(src)?;
    Parser::new(&tokens, &spans).parse_program()
}

#[test]
fn test_assignment() {
    let program = parse("a = a + 1; b = 2;").expect("parse");
    assert_eq!(program.stmts.len(), 2);
    assert_eq!(
        program.stmts[0],
        Stmt::Assign {
            name: "a".into(),
            value: Expr::Binary {
                op: BinOp::Add,
                lhs: Box::new(Expr::Var("a".into())),
                rhs: Box::new(Expr::Int(1)),
            },
        }
    );
    assert_eq!(
        program.stmts[1],
        Stmt::Assign {
            name: "b".into(),
            value: Expr::Int(2),
        }
    );
}

#[test]
fn test_let_is_plain_assignment() {
    let with_let = parse("let x = 1;").expect("parse");
    let bare = parse("x = 1;").expect("parse");
    assert_eq!(with_let, bare);
}

#[test]
fn test_precedence() {
    let program = parse("x = 1 + 2 * 3;").expect("parse");
    assert_eq!(
        program.stmts[0],
        Stmt::Assign {
            name: "x".into(),
            value: Expr::Binary {
                op: BinOp::Add,
                lhs: Box::new(Expr::Int(1)),
                rhs: Box::new(Expr::Binary {
                    op: BinOp::Mul,
                    lhs: Box::new(Expr::Int(2)),
                    rhs: Box::new(Expr::Int(3)),
                }),
            },
        }
    );
}

#[test]
fn test_grouping_overrides_precedence() {
    let program = parse("x = (1 + 2) * 3;").expect("parse");
    assert_eq!(
        program.stmts[0],
        Stmt::Assign {
            name: "x".into(),
            value: Expr::Binary {
                op: BinOp::Mul,
                lhs: Box::new(Expr::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(Expr::Int(1)),
                    rhs: Box::new(Expr::Int(2)),
                }),
                rhs: Box::new(Expr::Int(3)),
            },
        }
    );
}

#[test]
fn test_if_else_chain() {
    let program = parse("if a > 1 { b = 1; } else if a > 0 { b = 2; } else { b = 3; }").expect("parse");
    match &program.stmts[0] {
        Stmt::If { else_body, .. } => {
            assert_eq!(else_body.len(), 1);
            assert!(matches!(&else_body[0], Stmt::If { .. }));
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_while_with_break() {
    let program = parse("while true { break; }").expect("parse");
    match &program.stmts[0] {
        Stmt::While { body, .. } => assert_eq!(body, &vec![Stmt::Break]),
        other => panic!("expected while, got {:?}", other),
    }
}

#[test]
fn test_raise_statement() {
    let program = parse("raise ValueError(\"x\");").expect("parse");
    assert_eq!(
        program.stmts[0],
        Stmt::Raise {
            kind: "ValueError".into(),
            message: Expr::Str("x".into()),
        }
    );
}

#[test]
fn test_call_and_list() {
    let program = parse("println(argv()[1], [1, 2]);").expect("parse");
    match &program.stmts[0] {
        Stmt::Expr(Expr::Call { callee, args }) => {
            assert_eq!(callee, "println");
            assert_eq!(args.len(), 2);
            assert!(matches!(&args[0], Expr::Index { .. }));
            assert_eq!(args[1], Expr::List(vec![Expr::Int(1), Expr::Int(2)]));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_missing_semicolon_reports_location() {
    let err = parse("a = 1\nb = 2;").unwrap_err();
    assert!(err.message.contains("';'"), "message: {}", err.message);
    let span = err.span.expect("span");
    assert_eq!(span.start.line, 2);
}

#[test]
fn test_unclosed_block() {
    let err = parse("while true { a = 1;").unwrap_err();
    assert!(err.message.contains("'}'"), "message: {}", err.message);
}

#[test]
fn test_serde_roundtrip() {
    let program = parse("a = a + 1; if a > 1 { println(a); }").expect("parse");
    let bytes = serde_json::to_vec(&program).expect("serialize");
    let back: Program = serde_json::from_slice(&bytes).expect("deserialize");
    assert_eq!(program, back);
}
