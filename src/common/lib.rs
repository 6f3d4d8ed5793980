// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the
//! verilite compiler.

#[macro_use]
extern crate bitflags;

pub mod errors;
pub mod source;
pub mod util;

pub use crate::errors::DEFAULT_CONTEXT_LINES;

/// The state of one compiler invocation.
#[derive(Debug)]
pub struct Session {
    pub opts: SessionOptions,
}

impl Session {
    pub fn new() -> Session {
        Session {
            opts: SessionOptions {
                verbosity: Verbosity::empty(),
                context_lines: DEFAULT_CONTEXT_LINES,
                warnings_as_errors: false,
            },
        }
    }

    /// Check whether a verbosity option is set.
    pub fn has_verbosity(&self, verb: Verbosity) -> bool {
        self.opts.verbosity.contains(verb)
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub verbosity: Verbosity,
    /// Number of source lines shown around an error in detailed reports.
    pub context_lines: usize,
    /// Treat non-fatal parser warnings as a failed compilation.
    pub warnings_as_errors: bool,
}

bitflags! {
    /// Verbosity options.
    pub struct Verbosity: u8 {
        const TOKENS   = 1 << 0;
        const AST      = 1 << 1;
        const SYMBOLS  = 1 << 2;
        const WARNINGS = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session() {
        let sess = Session::new();
        assert_eq!(sess.opts.context_lines, 2);
        assert!(!sess.opts.warnings_as_errors);
        assert!(!sess.has_verbosity(Verbosity::AST));
    }

    #[test]
    fn verbosity_flags() {
        let mut sess = Session::new();
        sess.opts.verbosity |= Verbosity::AST | Verbosity::SYMBOLS;
        assert!(sess.has_verbosity(Verbosity::AST));
        assert!(sess.has_verbosity(Verbosity::SYMBOLS));
        assert!(!sess.has_verbosity(Verbosity::TOKENS));
    }
}
