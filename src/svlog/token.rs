// Copyright (c) 2016-2021 Fabian Schuiki

//! Defines all tokens that may result from performing lexical analysis on a
//! Verilog source file.

pub use self::DelimToken::*;
pub use self::Lit::*;
pub use self::TokenKind::*;
use serde::{Serialize, Serializer};
use std::fmt;
use verilite_common::source::Location;

/// A token emitted by the lexer, together with its literal text and the
/// location of its first character.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Token {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, line: usize, column: usize) -> Token {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

fn serialize_kind<S: Serializer>(kind: &TokenKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.name())
}

/// The classification of a token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    /// A keyword such as `module` or `posedge`
    Keyword(Kw),
    /// An operator such as `&` or `<=`
    Operator(Op),
    /// An opening delimiter
    OpenDelim(DelimToken),
    /// A closing delimiter
    CloseDelim(DelimToken),
    /// A literal
    Literal(Lit),

    Semicolon,
    Comma,
    Period,
    Colon,
    At,
    Hashtag,
    /// The `$` introducing a system task or function name
    Dollar,

    /// An identifier
    Ident,
    /// A line break. Never emitted, since the lexer works line by line.
    Newline,
    /// The end of the input
    Eof,
    /// A character that starts no valid token
    Unknown,
}

impl TokenKind {
    /// The upper-case name of this kind, as it appears in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Keyword(kw) => kw.token_name(),
            Operator(op) => op.name(),
            OpenDelim(Paren) => "LPAREN",
            CloseDelim(Paren) => "RPAREN",
            OpenDelim(Brack) => "LBRACKET",
            CloseDelim(Brack) => "RBRACKET",
            OpenDelim(Brace) => "LBRACE",
            CloseDelim(Brace) => "RBRACE",
            Literal(Number) => "NUMBER",
            Literal(Binary) => "BINARY",
            Literal(Hex) => "HEX",
            Literal(Octal) => "OCTAL",
            Literal(Str) => "STRING",
            Semicolon => "SEMICOLON",
            Comma => "COMMA",
            Period => "DOT",
            Colon => "COLON",
            At => "AT",
            Hashtag => "HASH",
            Dollar => "DOLLAR",
            Ident => "IDENTIFIER",
            Newline => "NEWLINE",
            Eof => "EOF",
            Unknown => "UNKNOWN",
        }
    }

    pub fn is_keyword(self, kw: Kw) -> bool {
        self == Keyword(kw)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A delimiter token such as parentheses or brackets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DelimToken {
    /// A round paranthesis `(` or `)`
    Paren,
    /// A square bracket `[` or `]`
    Brack,
    /// A curly brace `{` or `}`
    Brace,
}

/// Literals. The sized forms carry their width and base in the token text,
/// e.g. `8'hff`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Lit {
    Number,
    Binary,
    Hex,
    Octal,
    Str,
}

/// Operator symbols.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Op {
    /// `=`
    Assign,
    /// `<=`
    NonBlocking,
    And,
    Or,
    Not,
    Xor,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Assign => "=",
            Op::NonBlocking => "<=",
            Op::And => "&",
            Op::Or => "|",
            Op::Not => "~",
            Op::Xor => "^",
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Assign => "ASSIGN_OP",
            Op::NonBlocking => "NON_BLOCKING",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
            Op::Xor => "XOR",
            Op::Plus => "PLUS",
            Op::Minus => "MINUS",
            Op::Mul => "MULTIPLY",
            Op::Div => "DIVIDE",
            Op::Mod => "MODULO",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! declare_keywords {(
    $( ($konst: ident, $string: expr, $name: expr) )*
) => {
    #[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Debug, Hash)]
    pub enum Kw {
        $($konst,)*
    }

    impl Kw {
        pub fn as_str(self) -> &'static str {
            match self {
                $(Kw::$konst => $string,)*
            }
        }

        pub fn token_name(self) -> &'static str {
            match self {
                $(Kw::$konst => $name,)*
            }
        }
    }

    impl fmt::Display for Kw {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", self.as_str())
        }
    }

    /// Look up a keyword, ignoring case.
    pub fn find_keyword<S: AsRef<str>>(name: S) -> Option<Kw> {
        use once_cell::sync::Lazy;
        use std::collections::HashMap;
        static TBL: Lazy<HashMap<&'static str, Kw>> = Lazy::new(|| {
            let mut tbl = HashMap::new();
            $(
                assert!($string.chars().all(|c| !c.is_uppercase()));
                tbl.insert($string, Kw::$konst);
            )*
            tbl
        });
        TBL.get(name.as_ref().to_lowercase().as_str()).copied()
    }
}}

declare_keywords! {
    (Module,    "module",    "MODULE")
    (Endmodule, "endmodule", "ENDMODULE")
    (Input,     "input",     "INPUT")
    (Output,    "output",    "OUTPUT")
    (Inout,     "inout",     "INOUT")
    (Wire,      "wire",      "WIRE")
    (Reg,       "reg",       "REG")
    (Assign,    "assign",    "ASSIGN")
    (Always,    "always",    "ALWAYS")
    (Initial,   "initial",   "INITIAL")
    (Begin,     "begin",     "BEGIN")
    (End,       "end",       "END")
    (If,        "if",        "IF")
    (Else,      "else",      "ELSE")
    (Forever,   "forever",   "FOREVER")
    (Posedge,   "posedge",   "POSEDGE")
    (Negedge,   "negedge",   "NEGEDGE")
    // The `or` separating the entries of a sensitivity list.
    (SensOr,    "or",        "SENS_OR")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(find_keyword("module"), Some(Kw::Module));
        assert_eq!(find_keyword("ENDMODULE"), Some(Kw::Endmodule));
        assert_eq!(find_keyword("Or"), Some(Kw::SensOr));
        assert_eq!(find_keyword("modules"), None);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Keyword(Kw::SensOr).name(), "SENS_OR");
        assert_eq!(Operator(Op::Assign).name(), "ASSIGN_OP");
        assert_eq!(CloseDelim(Paren).to_string(), "RPAREN");
        assert_eq!(Literal(Str).name(), "STRING");
        assert_eq!(Hashtag.name(), "HASH");
    }
}
