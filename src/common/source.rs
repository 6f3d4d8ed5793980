// Copyright (c) 2016-2021 Fabian Schuiki

//! Source text handed to the compiler, and locations within it. Locations are
//! line/column pairs, both 1-based. A line of zero denotes an unknown
//! location.

use crate::errors::CompilerError;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

pub const INVALID_LOCATION: Location = Location { line: 0, column: 0 };

/// A position in the source text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Location {
        Location { line, column }
    }

    pub fn is_valid(self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Split `text` into its physical lines at `\n`, dropping one trailing `\r`
/// from each line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// A named chunk of source text, such as the contents of an input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    name: String,
    content: String,
}

impl SourceText {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, content: C) -> SourceText {
        SourceText {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a source file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SourceText, CompilerError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        match fs::read_to_string(path) {
            Ok(content) => Ok(SourceText::new(name, content)),
            Err(e) => Err(CompilerError::file(
                format!("Unable to read input file ({})", e),
                name,
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The physical lines of the text as numbered by the lexer. A trailing
    /// newline yields a final empty line.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.content).collect()
    }

    /// Obtain a single line by its 1-based number.
    pub fn line(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        split_lines(&self.content).nth(line - 1)
    }

    pub fn line_count(&self) -> usize {
        split_lines(&self.content).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_one_based() {
        let src = SourceText::new("test.v", "module m;\nendmodule\n");
        assert_eq!(src.line_count(), 3);
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(1), Some("module m;"));
        assert_eq!(src.line(2), Some("endmodule"));
        assert_eq!(src.line(3), Some(""));
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn crlf_lines() {
        let src = SourceText::new("test.v", "module m;\r\nwire\ra;\r\n");
        assert_eq!(src.lines(), vec!["module m;", "wire\ra;", ""]);
        assert_eq!(src.line(1), Some("module m;"));
        assert_eq!(src.line_count(), 3);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = SourceText::open("/nonexistent/dir/input.v").unwrap_err();
        match err {
            CompilerError::File { ref filename, .. } => {
                assert_eq!(filename, "/nonexistent/dir/input.v")
            }
            ref e => panic!("unexpected error {:?}", e),
        }
        assert_eq!(err.line(), 0);
        assert!(err.to_string().ends_with(": /nonexistent/dir/input.v"));
    }

    #[test]
    fn location_validity() {
        assert!(!INVALID_LOCATION.is_valid());
        assert!(Location::new(3, 0).is_valid());
        assert_eq!(Location::new(3, 7).to_string(), "3:7");
    }
}
