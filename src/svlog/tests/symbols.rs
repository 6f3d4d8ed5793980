// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

use verilite_svlog::ast::PortDir;
use verilite_svlog::symtbl::SymbolKind;

#[test]
fn port_list_entry_merges_with_declaration() {
    let (_, symbols) = parse_with_symbols("module m(p); input p; endmodule");
    let syms = symbols.scope_symbols(Some("m"));
    assert_eq!(syms.len(), 1);
    assert_eq!(syms[0].name, "p");
    assert_eq!(syms[0].kind, SymbolKind::Port);
    assert_eq!(syms[0].direction, Some(PortDir::Input));
    assert_eq!(syms[0].scope, "m");
}

#[test]
fn duplicate_wire() {
    let err = parse_err("module m;\nwire x;\nwire x;\nendmodule");
    assert_eq!(err.kind_name(), "SemanticError");
    assert!(err.message().contains("line 2"));
    assert_eq!((err.line(), err.column()), (3, 6));
    match err {
        CompilerError::Semantic { ref identifier, .. } => assert_eq!(identifier, "x"),
        ref e => panic!("unexpected {:?}", e),
    }
}

#[test]
fn wire_then_port_declaration() {
    let err = parse_err("module m(a); wire a; endmodule");
    assert_eq!(err.kind_name(), "SemanticError");
    let err = parse_err("module m; reg a; output a; endmodule");
    assert!(err.message().contains("already declared as reg"));
}

#[test]
fn redeclared_direction_keeps_first() {
    init_logging();
    let mut p = Parser::new(tokenize("module m(input a); output a; endmodule"));
    p.parse().unwrap();
    assert_eq!(p.warnings().len(), 1);
    let sym = p.symbols().lookup_in_scope("a", "m").unwrap();
    assert_eq!(sym.direction, Some(PortDir::Input));
}

#[test]
fn net_type_attribute() {
    let (_, symbols) = parse_with_symbols("module m(output reg [3:0] q, input wire d); endmodule");
    let q = symbols.lookup_in_scope("q", "m").unwrap();
    assert_eq!(q.attributes.get("net_type").map(String::as_str), Some("reg"));
    let d = symbols.lookup_in_scope("d", "m").unwrap();
    assert_eq!(d.attributes.get("net_type").map(String::as_str), Some("wire"));
}

#[test]
fn counter_symbols() {
    let (_, symbols) = parse_with_symbols(COUNTER);
    let syms = symbols.scope_symbols(Some("counter"));
    let names: Vec<_> = syms.iter().map(|s| (s.name.as_str(), s.direction)).collect();
    assert_eq!(
        names,
        vec![
            ("clk", Some(PortDir::Input)),
            ("rst", Some(PortDir::Input)),
            ("q", Some(PortDir::Output)),
        ]
    );
    assert!(symbols.scope_symbols(Some("global")).is_empty());
    assert!(symbols.scope_symbols(Some("nonexistent")).is_empty());
    assert!(symbols.find_scope("counter").is_some());
}

#[test]
fn each_parse_starts_fresh() {
    let mut p = Parser::new(tokenize("module m; wire a; endmodule"));
    p.parse().unwrap();
    p.parse().unwrap();
    assert_eq!(p.symbols().scope_symbols(Some("m")).len(), 1);
}
