// Copyright (c) 2016-2021 Fabian Schuiki

//! Compilation of a single source file.

use crate::common::errors::{CompileResult, CompilerError, ErrorReporter};
use crate::common::source::SourceText;
use crate::common::util::{HasDesc, HasLocation};
use crate::common::Session;
use crate::svlog::ast::ModuleNode;
use crate::svlog::lexer::Token;
use crate::svlog::symtbl::SymbolTable;
use crate::svlog::{tokenize, Parser};

/// Everything produced by compiling one source file.
#[derive(Debug)]
pub struct Compilation {
    /// The token stream, including the trailing `Eof` token.
    pub tokens: Vec<Token>,
    pub module: ModuleNode,
    pub symbols: SymbolTable,
    /// Non-fatal problems encountered while parsing.
    pub warnings: Vec<CompilerError>,
}

impl Compilation {
    /// A one-line description of the parsed module, listing its items.
    pub fn summary(&self) -> String {
        let items: Vec<_> = self.module.items.iter().map(|i| i.desc_full()).collect();
        format!(
            "{} at {}: {} ports, {} items ({})",
            self.module.desc_full(),
            self.module.location(),
            self.module.ports.len(),
            items.len(),
            items.join(", ")
        )
    }
}

/// Lex and parse a source file.
///
/// Every call uses a fresh parser and symbol table. If the session treats
/// warnings as errors, the first warning fails the compilation.
pub fn compile(sess: &Session, source: &SourceText) -> CompileResult<Compilation> {
    debug!("Compiling `{}`", source.name());
    let tokens = tokenize(source.content());
    let mut parser = Parser::new(tokens.clone());
    let module = parser.parse()?;
    let warnings = parser.warnings().to_vec();
    if sess.opts.warnings_as_errors {
        if let Some(warning) = warnings.first() {
            return Err(warning.clone());
        }
    }
    for item in &module.items {
        trace!("Parsed {}", item.desc_full());
    }
    Ok(Compilation {
        tokens,
        module,
        symbols: parser.into_symbols(),
        warnings,
    })
}

/// Collect the outcome of a compilation in a reporter set up for `source`.
pub fn report(
    sess: &Session,
    source: &SourceText,
    result: &CompileResult<Compilation>,
) -> ErrorReporter {
    let mut reporter = ErrorReporter::new();
    reporter.set_source_code(source.content());
    reporter.set_context_lines(sess.opts.context_lines);
    match result {
        Ok(comp) => {
            for warning in &comp.warnings {
                reporter.add_warning(warning.message(), warning.line(), warning.column());
            }
        }
        Err(err) => reporter.add_error(err.clone()),
    }
    reporter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(content: &str) -> SourceText {
        SourceText::new("test.v", content)
    }

    #[test]
    fn compile_module() {
        let sess = Session::new();
        let comp = compile(&sess, &source("module m(a); input a; endmodule")).unwrap();
        assert_eq!(comp.module.name, "m");
        assert!(comp.tokens.last().unwrap().is_eof());
        assert!(comp.symbols.lookup_in_scope("a", "m").is_some());
        assert!(comp.warnings.is_empty());
    }

    #[test]
    fn summary_names_items() {
        let sess = Session::new();
        let src = source("\n  module top(a);\n    input a;\n    wire w;\n    sub u0 (.x(a));\n  endmodule");
        let comp = compile(&sess, &src).unwrap();
        assert_eq!(
            comp.summary(),
            "module `top` at 2:3: 1 ports, 3 items (port declaration, wire declaration, instance `u0` of `sub`)"
        );
    }

    #[test]
    fn warnings_as_errors() {
        let src = source("module m; ; endmodule");
        let mut sess = Session::new();
        let comp = compile(&sess, &src).unwrap();
        assert_eq!(comp.warnings.len(), 1);

        sess.opts.warnings_as_errors = true;
        let err = compile(&sess, &src).unwrap_err();
        assert_eq!(err.message(), "Skipping unknown token ';'");
    }

    #[test]
    fn report_errors_with_context() {
        let sess = Session::new();
        let src = source("module m;\nwire x;\nwire x;\nendmodule\n");
        let result = compile(&sess, &src);
        let reporter = report(&sess, &src, &result);
        assert_eq!(reporter.error_count(), 1);
        let text = reporter.generate_report(true);
        assert!(text.contains("ERROR: SemanticError"));
        assert!(text.contains("> 3: wire x;"));
        assert!(text.contains("Identifier: 'x'"));
    }

    #[test]
    fn report_warnings() {
        let sess = Session::new();
        let src = source("module m; ? endmodule");
        let result = compile(&sess, &src);
        let reporter = report(&sess, &src, &result);
        assert!(!reporter.has_errors());
        assert_eq!(
            reporter.warnings()[0].message(),
            "WARNING: Skipping unknown token '?'"
        );
    }
}
