// Copyright (c) 2016-2021 Fabian Schuiki
#![allow(dead_code)]

//! Utilities for verilog tests.

pub use verilite_svlog::common::errors::CompilerError;
pub use verilite_svlog::*;

use verilite_svlog::symtbl::SymbolTable;

pub fn init_logging() {
    let _ = simple_logger::SimpleLogger::new().init();
}

pub fn parse(input: &str) -> ast::ModuleNode {
    init_logging();
    match parser::parse(tokenize(input)) {
        Ok(x) => x,
        Err(e) => panic!("parsing failed: {}", e),
    }
}

pub fn parse_err(input: &str) -> CompilerError {
    init_logging();
    match parser::parse(tokenize(input)) {
        Ok(x) => panic!("parsing should have failed, got {:?}", x),
        Err(e) => e,
    }
}

pub fn parse_with_symbols(input: &str) -> (ast::ModuleNode, SymbolTable) {
    init_logging();
    let mut p = Parser::new(tokenize(input));
    match p.parse() {
        Ok(x) => (x, p.into_symbols()),
        Err(e) => panic!("parsing failed: {}", e),
    }
}

pub fn parse_with_warnings(input: &str) -> (ast::ModuleNode, Vec<CompilerError>) {
    init_logging();
    let mut p = Parser::new(tokenize(input));
    match p.parse() {
        Ok(x) => (x, p.warnings().to_vec()),
        Err(e) => panic!("parsing failed: {}", e),
    }
}

/// The counter module used throughout the tests.
pub const COUNTER: &str = "module counter(clk, rst, q);
    input clk, rst;
    output [3:0] q;
    always @(posedge clk or posedge rst)
        if (rst) q <= 0;
        else q <= q + 1;
endmodule
";
