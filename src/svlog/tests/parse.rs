// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

use verilite_svlog::ast::*;

#[test]
fn empty() {
    let m = parse("module foo; endmodule");
    assert_eq!(m.name, "foo");
    assert!(m.ports.is_empty());
    assert!(m.items.is_empty());
}

#[test]
fn ansi_ports() {
    let src = "module m(input a, input b, output c);\nassign c = a & b;\nendmodule\n";
    let kinds: Vec<_> = tokenize(src)
        .iter()
        .map(|t| match t.kind {
            token::Ident => format!("IDENTIFIER \"{}\"", t.text),
            k => k.name().to_owned(),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "MODULE",
            "IDENTIFIER \"m\"",
            "LPAREN",
            "INPUT",
            "IDENTIFIER \"a\"",
            "COMMA",
            "INPUT",
            "IDENTIFIER \"b\"",
            "COMMA",
            "OUTPUT",
            "IDENTIFIER \"c\"",
            "RPAREN",
            "SEMICOLON",
            "ASSIGN",
            "IDENTIFIER \"c\"",
            "ASSIGN_OP",
            "IDENTIFIER \"a\"",
            "AND",
            "IDENTIFIER \"b\"",
            "SEMICOLON",
            "ENDMODULE",
            "EOF",
        ]
    );

    let m = parse(src);
    assert_eq!(m.name, "m");
    let ports: Vec<_> = m.ports.iter().map(|p| (p.name.as_str(), p.direction)).collect();
    assert_eq!(
        ports,
        vec![
            ("a", Some(PortDir::Input)),
            ("b", Some(PortDir::Input)),
            ("c", Some(PortDir::Output)),
        ]
    );
    assert_eq!(m.items.len(), 1);
    match &m.items[0] {
        Item::ContAssign(a) => {
            assert_eq!(a.target, Expr::ident("c"));
            assert_eq!(
                a.source,
                Expr::binary(Expr::ident("a"), BinaryOp::And, Expr::ident("b"))
            );
        }
        item => panic!("unexpected {:?}", item),
    }
}

#[test]
fn ports_without_direction() {
    let m = parse("module m(a,b); endmodule");
    assert_eq!(m.ports.len(), 2);
    assert!(m.ports.iter().all(|p| p.direction.is_none()));
}

#[test]
fn or_binds_weaker_than_and() {
    let m = parse("module m; assign y = a | b & c; endmodule");
    match &m.items[0] {
        Item::ContAssign(a) => assert_eq!(
            a.source,
            Expr::binary(
                Expr::ident("a"),
                BinaryOp::Or,
                Expr::binary(Expr::ident("b"), BinaryOp::And, Expr::ident("c")),
            )
        ),
        item => panic!("unexpected {:?}", item),
    }
}

#[test]
fn missing_paren() {
    let err = parse_err("module m(a; endmodule");
    assert_eq!(err.kind_name(), "SyntaxError");
    assert!(err.message().starts_with("Expected RPAREN, found SEMICOLON"));
    assert_eq!((err.line(), err.column()), (1, 11));
    match err {
        CompilerError::Syntax { ref token, .. } => assert_eq!(token, ";"),
        ref e => panic!("unexpected {:?}", e),
    }
}

#[test]
fn item_count_excludes_skipped_tokens() {
    let (m, warnings) = parse_with_warnings(
        "module m;
            wire a;
            ;
            assign a = 1;
            initial $finish;
        endmodule",
    );
    assert_eq!(m.items.len(), 3);
    assert_eq!(warnings.len(), 1);
    assert_eq!((warnings[0].line(), warnings[0].column()), (3, 13));
}

#[test]
fn counter() {
    let m = parse(COUNTER);
    assert_eq!(m.name, "counter");
    assert_eq!(m.ports.len(), 3);
    assert_eq!(m.items.len(), 3);
    let always = match &m.items[2] {
        Item::Always(a) => a,
        item => panic!("unexpected {:?}", item),
    };
    assert_eq!(always.sensitivity.len(), 2);
    assert!(always
        .sensitivity
        .iter()
        .all(|s| s.edge == Some(Edge::Posedge)));
    match &always.stmt {
        Stmt::If(x) => match x.else_stmt.as_deref() {
            Some(Stmt::Assign(a)) => {
                assert_eq!(a.op, AssignOp::NonBlocking);
                assert_eq!(a.source.to_string(), "(q + 1)");
            }
            s => panic!("unexpected {:?}", s),
        },
        s => panic!("unexpected {:?}", s),
    }
}

#[test]
fn testbench() {
    let m = parse(
        "module tb;
            reg clk;
            wire [3:0] q;
            counter dut (.clk(clk), .rst(1'b0), .q(q));
            initial begin
                clk = 0;
                forever #5 clk = ~clk;
            end
            initial begin
                #100 $display(\"q = %d\", q[3:0]);
                $finish;
            end
        endmodule",
    );
    assert_eq!(m.items.len(), 5);
    match &m.items[2] {
        Item::Inst(inst) => {
            assert_eq!(inst.module_type, "counter");
            assert_eq!(inst.instance_name, "dut");
            assert_eq!(inst.connections.len(), 3);
            match &inst.connections[1].expr {
                Expr::Number(n) => {
                    assert_eq!(n.base, Base::Binary);
                    assert_eq!(n.size(), Some(1));
                    assert_eq!(n.value(), Some(0));
                }
                e => panic!("unexpected {:?}", e),
            }
        }
        item => panic!("unexpected {:?}", item),
    }
    let printed = print::AstPrinter::print(&m);
    assert!(printed.contains("INSTANCE: counter dut"));
    assert!(printed.contains("FOREVER:"));
    assert!(printed.contains("$finish"));
}

#[test]
fn block_comment_spanning_lines_is_not_a_comment() {
    // The `/` and `*` are skipped, so the commented-out `wire a;` is a
    // declaration and the second one a duplicate.
    let err = parse_err("module m;\n/* wire a;\nwire a; */\nendmodule");
    assert_eq!(err.kind_name(), "SemanticError");
    assert_eq!(err.line(), 3);
    assert!(err.message().contains("previous declaration at line 2"));
}

#[test]
fn unary_minus_is_not_supported() {
    let err = parse_err("module m; assign y = -a; endmodule");
    assert!(err.message().starts_with("Expected expression, found MINUS"));
    parse("module m; assign y = b - a; endmodule");
}

#[test]
fn statement_errors_carry_location() {
    let err = parse_err("module m;\ninitial begin\n  if (a q = 1;\nend\nendmodule");
    assert_eq!(err.line(), 3);
    assert_eq!(err.column(), 9);
    assert!(err.message().starts_with("Expected RPAREN, found IDENTIFIER"));
}

#[test]
fn error_at_end_of_input() {
    // Without a trailing newline the `Eof` token sits on the last line, at
    // column 1.
    let err = parse_err("module m(a");
    assert_eq!(err.message(), "Expected RPAREN, found EOF");
    assert_eq!((err.line(), err.column()), (1, 1));

    let err = parse_err("module m(a\n");
    assert_eq!((err.line(), err.column()), (2, 1));
}
