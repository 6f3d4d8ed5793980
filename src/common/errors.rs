// Copyright (c) 2016-2021 Fabian Schuiki

//! Utilities to implement diagnostics and error reporting facilities.

use crate::source::{split_lines, Location, SourceText};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The number of source lines shown before and after an offending line.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn to_str(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            Severity::Fatal | Severity::Error => "\x1B[31;1m",
            Severity::Warning => "\x1B[33;1m",
            Severity::Note => "\x1B[36;1m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A message together with the location it refers to. A line or column of
/// zero means the respective part of the location is unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(message: S, line: usize, column: usize) -> Diagnostic {
        Diagnostic {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line > 0 {
            if self.column > 0 {
                write!(f, "Line {}, Column {}: {}", self.line, self.column, self.message)
            } else {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// An error raised during compilation.
///
/// Every variant carries a [`Diagnostic`]. The specialized variants carry
/// one additional piece of context which their constructors splice into the
/// diagnostic's message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind")]
pub enum CompilerError {
    #[error("{diag}")]
    General {
        #[serde(flatten)]
        diag: Diagnostic,
    },
    #[error("{diag}")]
    Lexical {
        #[serde(flatten)]
        diag: Diagnostic,
        #[serde(rename = "char")]
        character: String,
    },
    #[error("{diag}")]
    Syntax {
        #[serde(flatten)]
        diag: Diagnostic,
        token: String,
    },
    #[error("{diag}")]
    Semantic {
        #[serde(flatten)]
        diag: Diagnostic,
        identifier: String,
    },
    #[error("{diag}")]
    CodeGeneration {
        #[serde(flatten)]
        diag: Diagnostic,
        node_type: String,
    },
    #[error("{diag}")]
    File {
        #[serde(flatten)]
        diag: Diagnostic,
        filename: String,
    },
}

/// A result carrying a [`CompilerError`] on failure.
pub type CompileResult<T> = Result<T, CompilerError>;

impl CompilerError {
    pub fn general<S: Into<String>>(message: S, line: usize, column: usize) -> CompilerError {
        CompilerError::General {
            diag: Diagnostic::new(message, line, column),
        }
    }

    /// An unrecognized character in the input.
    pub fn lexical<S, C>(message: S, line: usize, column: usize, character: C) -> CompilerError
    where
        S: Into<String>,
        C: Into<String>,
    {
        let character = character.into();
        let mut message = message.into();
        if !character.is_empty() {
            message = format!("{}: '{}'", message, character);
        }
        CompilerError::Lexical {
            diag: Diagnostic::new(message, line, column),
            character,
        }
    }

    /// A grammar violation at `token`.
    pub fn syntax<S, T>(message: S, line: usize, column: usize, token: T) -> CompilerError
    where
        S: Into<String>,
        T: Into<String>,
    {
        let token = token.into();
        let mut message = message.into();
        if !token.is_empty() {
            message = format!("{}, got '{}'", message, token);
        }
        CompilerError::Syntax {
            diag: Diagnostic::new(message, line, column),
            token,
        }
    }

    /// An invalid use of the named identifier.
    pub fn semantic<S, I>(message: S, line: usize, column: usize, identifier: I) -> CompilerError
    where
        S: Into<String>,
        I: Into<String>,
    {
        let identifier = identifier.into();
        let mut message = message.into();
        if !identifier.is_empty() {
            message = format!("{} (identifier: '{}')", message, identifier);
        }
        CompilerError::Semantic {
            diag: Diagnostic::new(message, line, column),
            identifier,
        }
    }

    pub fn codegen<S, N>(message: S, line: usize, column: usize, node_type: N) -> CompilerError
    where
        S: Into<String>,
        N: Into<String>,
    {
        let node_type = node_type.into();
        let mut message = message.into();
        if !node_type.is_empty() {
            message = format!("{} (node type: {})", message, node_type);
        }
        CompilerError::CodeGeneration {
            diag: Diagnostic::new(message, line, column),
            node_type,
        }
    }

    /// A failure to access a file. File errors carry no location.
    pub fn file<S: Into<String>, F: Into<String>>(message: S, filename: F) -> CompilerError {
        let filename = filename.into();
        let mut message = message.into();
        if !filename.is_empty() {
            message = format!("{}: {}", message, filename);
        }
        CompilerError::File {
            diag: Diagnostic::new(message, 0, 0),
            filename,
        }
    }

    pub fn diag(&self) -> &Diagnostic {
        match self {
            CompilerError::General { diag }
            | CompilerError::Lexical { diag, .. }
            | CompilerError::Syntax { diag, .. }
            | CompilerError::Semantic { diag, .. }
            | CompilerError::CodeGeneration { diag, .. }
            | CompilerError::File { diag, .. } => diag,
        }
    }

    pub fn message(&self) -> &str {
        &self.diag().message
    }

    pub fn line(&self) -> usize {
        self.diag().line
    }

    pub fn column(&self) -> usize {
        self.diag().column
    }

    pub fn location(&self) -> Location {
        self.diag().location()
    }

    /// The name of the error class, as shown in detailed reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CompilerError::General { .. } => "CompilerError",
            CompilerError::Lexical { .. } => "LexicalError",
            CompilerError::Syntax { .. } => "SyntaxError",
            CompilerError::Semantic { .. } => "SemanticError",
            CompilerError::CodeGeneration { .. } => "CodeGenerationError",
            CompilerError::File { .. } => "FileError",
        }
    }

    /// The trailing detail line of a detailed report, if any.
    fn detail(&self) -> Option<String> {
        match self {
            CompilerError::General { .. } => None,
            CompilerError::Lexical { character, .. } if !character.is_empty() => {
                Some(format!("Character: '{}'", character))
            }
            CompilerError::Syntax { token, .. } if !token.is_empty() => {
                Some(format!("Token: '{}'", token))
            }
            CompilerError::Semantic { identifier, .. } if !identifier.is_empty() => {
                Some(format!("Identifier: '{}'", identifier))
            }
            CompilerError::CodeGeneration { node_type, .. } if !node_type.is_empty() => {
                Some(format!("Node type: {}", node_type))
            }
            CompilerError::File { filename, .. } if !filename.is_empty() => {
                Some(format!("File: {}", filename))
            }
            _ => None,
        }
    }

    /// Render this error as a colored terminal diagnostic, quoting the
    /// offending line of `source` if one is given.
    pub fn rendered<'a>(
        &'a self,
        severity: Severity,
        source: Option<&'a SourceText>,
    ) -> Rendered<'a> {
        Rendered {
            error: self,
            severity,
            source,
        }
    }
}

/// A colored rendering of a [`CompilerError`].
pub struct Rendered<'a> {
    error: &'a CompilerError,
    severity: Severity,
    source: Option<&'a SourceText>,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let colorcode = self.severity.color_code();
        let diag = self.error.diag();
        writeln!(
            f,
            "{}{}:\x1B[m\x1B[1m {}\x1B[m",
            colorcode, self.severity, diag.message
        )?;
        let source = match self.source {
            Some(s) => s,
            None => return Ok(()),
        };
        if let Some(text) = source.line(diag.line) {
            if diag.column > 0 {
                writeln!(f, "  --> {}:{}:{}:", source.name(), diag.line, diag.column)?;
            } else {
                writeln!(f, "  --> {}:{}:", source.name(), diag.line)?;
            }
            writeln!(f, "   | ")?;
            writeln!(f, "   | {}", text)?;
            if diag.column > 0 {
                writeln!(
                    f,
                    "   | {}{}^\x1B[m",
                    " ".repeat(diag.column - 1),
                    colorcode
                )?;
            }
        } else if !matches!(self.error, CompilerError::File { .. }) {
            writeln!(f, "  --> {}", source.name())?;
        }
        Ok(())
    }
}

/// Render the source lines around `line`.
///
/// Shows `context_lines` lines before and after the offending line, each
/// prefixed with its right-aligned line number. The offending line is marked
/// with `> `, and if `column` is non-zero a caret is placed under it.
pub fn format_error_context(
    source_lines: &[&str],
    line: usize,
    column: usize,
    context_lines: usize,
) -> String {
    if source_lines.is_empty() || line < 1 {
        return String::new();
    }
    let error_idx = line - 1;
    let start = error_idx.saturating_sub(context_lines);
    let end = std::cmp::min(source_lines.len(), error_idx + context_lines + 1);
    if start >= end {
        return String::new();
    }
    let width = end.to_string().len();

    let mut output = Vec::new();
    for (i, text) in source_lines.iter().enumerate().take(end).skip(start) {
        let prefix = format!("{:>width$}: ", i + 1, width = width);
        if i == error_idx {
            output.push(format!("> {}{}", prefix, text));
            if column > 0 {
                output.push(format!("{}^", " ".repeat(2 + prefix.len() + column - 1)));
            }
        } else {
            output.push(format!("  {}{}", prefix, text));
        }
    }
    output.join("\n")
}

/// Render a multi-line report for `error`, including source context when
/// `source_code` is non-empty.
pub fn create_detailed_error_report(error: &CompilerError, source_code: &str) -> String {
    detailed_error_report(error, source_code, DEFAULT_CONTEXT_LINES)
}

/// Like [`create_detailed_error_report`], with a custom amount of context.
pub fn detailed_error_report(
    error: &CompilerError,
    source_code: &str,
    context_lines: usize,
) -> String {
    let diag = error.diag();
    let mut report = vec![
        format!("ERROR: {}", error.kind_name()),
        format!("Message: {}", diag.message),
    ];

    if diag.line > 0 {
        if diag.column > 0 {
            report.push(format!("Location: Line {}, Column {}", diag.line, diag.column));
        } else {
            report.push(format!("Location: Line {}", diag.line));
        }
    }

    if !source_code.is_empty() && diag.line > 0 {
        let lines: Vec<&str> = split_lines(source_code).collect();
        let context = format_error_context(&lines, diag.line, diag.column, context_lines);
        if !context.is_empty() {
            report.push(String::new());
            report.push("Source Context:".to_owned());
            report.push(context);
        }
    }

    if let Some(detail) = error.detail() {
        report.push(detail);
    }
    report.join("\n")
}

/// Collects the errors and warnings of one or more compilations.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    errors: Vec<CompilerError>,
    warnings: Vec<CompilerError>,
    source_code: String,
    context_lines: usize,
}

impl Default for ErrorReporter {
    fn default() -> ErrorReporter {
        ErrorReporter::new()
    }
}

impl ErrorReporter {
    pub fn new() -> ErrorReporter {
        ErrorReporter {
            errors: Vec::new(),
            warnings: Vec::new(),
            source_code: String::new(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Set the source text used to render error context.
    pub fn set_source_code<S: Into<String>>(&mut self, source_code: S) {
        self.source_code = source_code.into();
    }

    pub fn set_context_lines(&mut self, context_lines: usize) {
        self.context_lines = context_lines;
    }

    pub fn add_error(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    pub fn add_warning<S: Into<String>>(&mut self, message: S, line: usize, column: usize) {
        let warning = CompilerError::general(format!("WARNING: {}", message.into()), line, column);
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[CompilerError] {
        &self.warnings
    }

    /// Forget all collected errors and warnings. The source code is kept.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    /// Summarize everything collected so far.
    ///
    /// In detailed mode each error is rendered with its source context;
    /// otherwise only the counts and the warnings are listed.
    pub fn generate_report(&self, detailed: bool) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return "Compilation completed successfully with no errors or warnings.".to_owned();
        }

        let mut report = vec![
            "COMPILATION REPORT".to_owned(),
            "=".repeat(50),
            format!("Errors: {}", self.error_count()),
            format!("Warnings: {}", self.warning_count()),
            String::new(),
        ];

        if detailed && !self.errors.is_empty() {
            report.push("ERRORS:".to_owned());
            report.push("-".repeat(30));
            for (i, error) in self.errors.iter().enumerate() {
                report.push(format!("Error {}:", i + 1));
                report.push(detailed_error_report(
                    error,
                    &self.source_code,
                    self.context_lines,
                ));
                report.push(String::new());
            }
        }

        if !self.warnings.is_empty() {
            if detailed {
                report.push("WARNINGS:".to_owned());
                report.push("-".repeat(30));
            }
            for (i, warning) in self.warnings.iter().enumerate() {
                if detailed {
                    report.push(format!("Warning {}: {}", i + 1, warning));
                } else {
                    report.push(warning.to_string());
                }
            }
        }

        report.join("\n")
    }
}
