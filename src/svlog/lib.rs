// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate implements the Verilog front-end of the verilite compiler: a
//! lexer, a parser that builds the AST of a module, and the symbol table
//! populated along the way.

#[macro_use]
extern crate log;

pub use verilite_common as common;

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod print;
pub mod symtbl;
pub mod token;
pub mod visit;

pub use crate::lexer::tokenize;
pub use crate::parser::{parse, Parser};
