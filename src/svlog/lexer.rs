// Copyright (c) 2016-2021 Fabian Schuiki

//! A lexical analyzer for Verilog files.
//!
//! The input is processed one physical line at a time. Within a line the
//! lexer tries a fixed sequence of rules at the current position and takes
//! the first one that matches. Whitespace, comments, and compiler directives
//! are consumed without producing a token. A character that starts no valid
//! token becomes an `Unknown` token, so lexing never fails.
//!
//! Since lines are matched independently, a `/* ... */` comment that spans
//! multiple lines is not recognized as a comment.

pub use crate::token::*;
use verilite_common::source::split_lines;

/// A lexical analyzer for Verilog files.
pub struct Lexer<'a> {
    lines: Vec<&'a str>,
    /// Index of the line currently being scanned.
    line_idx: usize,
    /// Byte offset into the current line.
    pos: usize,
    column: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        let lines = split_lines(input).collect();
        Lexer {
            lines,
            line_idx: 0,
            pos: 0,
            column: 1,
            done: false,
        }
    }

    /// Produce the next token, or `None` once the end-of-stream token has
    /// been emitted.
    pub fn next_token(&mut self) -> Option<Token> {
        while self.line_idx < self.lines.len() {
            let line = self.lines[self.line_idx];
            if self.pos >= line.len() {
                self.line_idx += 1;
                self.pos = 0;
                self.column = 1;
                continue;
            }

            let rest = &line[self.pos..];
            let line_no = self.line_idx + 1;
            let column = self.column;
            let (len, kind) = match scan(rest) {
                Some(x) => x,
                None => {
                    let len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                    (len, Some(Unknown))
                }
            };
            let text = &rest[..len];
            self.pos += len;
            self.column += text.chars().count();

            if let Some(kind) = kind {
                let kind = match kind {
                    Ident => find_keyword(text).map(Keyword).unwrap_or(Ident),
                    k => k,
                };
                return Some(Token::new(kind, text, line_no, column));
            }
        }

        if self.done {
            None
        } else {
            self.done = true;
            Some(Token::new(Eof, "", self.lines.len(), 1))
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Convert source text into a sequence of tokens, terminated by a single
/// `Eof` token.
pub fn tokenize(input: &str) -> Vec<Token> {
    let tokens: Vec<Token> = Lexer::new(input).collect();
    debug!("Lexed {} tokens", tokens.len());
    tokens
}

/// Try the lexer rules in order at the start of `rest`. Returns the length in
/// bytes of the first match, and the kind of token to emit, or `None` as
/// kind for input that is consumed silently.
fn scan(rest: &str) -> Option<(usize, Option<TokenKind>)> {
    let bytes = rest.as_bytes();

    // Compiler directives.
    if bytes[0] == b'`' {
        if let Some(len) = scan_include(rest).or_else(|| scan_define(rest)) {
            return Some((len, None));
        }
        let len = ident_len(&rest[1..]);
        if len > 0 {
            return Some((1 + len, None));
        }
    }

    // Comments.
    if rest.starts_with("//") {
        return Some((rest.len(), None));
    }
    if rest.starts_with("/*") {
        if let Some(end) = rest[2..].find("*/") {
            return Some((end + 4, None));
        }
    }

    // Sized literals, strings, and numbers.
    let digits = digits_len(rest);
    if digits > 0 {
        if let Some(len) = scan_sized(rest, digits) {
            return Some(len);
        }
    }
    if bytes[0] == b'"' {
        if let Some(end) = rest[1..].find('"') {
            return Some((end + 2, Some(Literal(Str))));
        }
    }
    if digits > 0 {
        return Some((digits, Some(Literal(Number))));
    }

    if rest.starts_with("<=") {
        return Some((2, Some(Operator(Op::NonBlocking))));
    }

    let single = match bytes[0] {
        b'=' => Some(Operator(Op::Assign)),
        b'&' => Some(Operator(Op::And)),
        b'|' => Some(Operator(Op::Or)),
        b'~' => Some(Operator(Op::Not)),
        b'^' => Some(Operator(Op::Xor)),
        b'+' => Some(Operator(Op::Plus)),
        b'-' => Some(Operator(Op::Minus)),
        b'*' => Some(Operator(Op::Mul)),
        b'/' => Some(Operator(Op::Div)),
        b'%' => Some(Operator(Op::Mod)),
        b'(' => Some(OpenDelim(Paren)),
        b')' => Some(CloseDelim(Paren)),
        b'{' => Some(OpenDelim(Brace)),
        b'}' => Some(CloseDelim(Brace)),
        b'[' => Some(OpenDelim(Brack)),
        b']' => Some(CloseDelim(Brack)),
        b';' => Some(Semicolon),
        b',' => Some(Comma),
        b'.' => Some(Period),
        b':' => Some(Colon),
        b'@' => Some(At),
        b'#' => Some(Hashtag),
        b'$' => Some(Dollar),
        _ => None,
    };
    if single.is_some() {
        return Some((1, single));
    }

    let len = ident_len(rest);
    if len > 0 {
        return Some((len, Some(Ident)));
    }

    let blanks = rest.bytes().take_while(|&b| b == b' ' || b == b'\t').count();
    if blanks > 0 {
        return Some((blanks, None));
    }

    None
}

/// `` `include "file" ``
fn scan_include(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix("`include")?;
    let trimmed = after.trim_start();
    if trimmed.len() == after.len() {
        return None;
    }
    let name = trimmed.strip_prefix('"')?;
    let end = name.find('"')?;
    Some(rest.len() - name.len() + end + 1)
}

/// `` `define NAME ... `` up to the end of the line.
fn scan_define(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix("`define")?;
    let trimmed = after.trim_start();
    if trimmed.len() == after.len() {
        return None;
    }
    match trimmed.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => Some(rest.len()),
        _ => None,
    }
}

/// Match `<digits>'<base><digits>` given the length of the leading decimal
/// digits.
fn scan_sized(rest: &str, digits: usize) -> Option<(usize, Option<TokenKind>)> {
    let bytes = rest.as_bytes();
    if bytes.get(digits) != Some(&b'\'') {
        return None;
    }
    let (lit, valid): (Lit, fn(u8) -> bool) = match bytes.get(digits + 1)? {
        b'b' | b'B' => (Binary, is_binary_digit),
        b'h' | b'H' => (Hex, is_hex_digit),
        b'o' | b'O' => (Octal, is_octal_digit),
        _ => return None,
    };
    let value = bytes[digits + 2..].iter().take_while(|&&b| valid(b)).count();
    if value == 0 {
        return None;
    }
    Some((digits + 2 + value, Some(Literal(lit))))
}

fn is_binary_digit(b: u8) -> bool {
    b == b'0' || b == b'1' || b == b'_'
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit() || b == b'_'
}

fn is_octal_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b) || b == b'_'
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length of a `[a-zA-Z_][a-zA-Z0-9_]*` prefix, or zero.
fn ident_len(s: &str) -> usize {
    match s.bytes().next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => s
            .bytes()
            .take_while(|&b| b.is_ascii_alphanumeric() || b == b'_')
            .count(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![Token::new(Eof, "", 1, 1)]);
    }

    #[test]
    fn eof_line_follows_last_line() {
        let tokens = tokenize("module m;\nendmodule\n");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, Eof);
        assert_eq!((eof.line, eof.column), (3, 1));
    }

    #[test]
    fn columns_advance_by_match_length() {
        let tokens = tokenize("  assign\tx <= 8'hff;");
        let pos: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(pos, vec![(1, 3), (1, 10), (1, 12), (1, 15), (1, 20), (1, 1)]);
    }

    #[test]
    fn keywords_keep_their_text() {
        let tokens = tokenize("MODULE Or");
        assert_eq!(tokens[0].kind, Keyword(Kw::Module));
        assert_eq!(tokens[0].text, "MODULE");
        assert_eq!(tokens[1].kind, Keyword(Kw::SensOr));
    }

    #[test]
    fn sized_literals() {
        assert_eq!(
            kinds("4'b10_10 8'hFf 3'o17 12"),
            vec![
                Literal(Binary),
                Literal(Hex),
                Literal(Octal),
                Literal(Number),
                Eof
            ]
        );
        // A base without digits is not a sized literal.
        assert_eq!(kinds("4'b"), vec![Literal(Number), Unknown, Ident, Eof]);
    }

    #[test]
    fn strings() {
        assert_eq!(texts("\"a b\" x"), vec!["\"a b\"", "x", ""]);
        assert_eq!(kinds("\"open"), vec![Unknown, Ident, Eof]);
    }

    #[test]
    fn non_blocking_before_single_chars() {
        assert_eq!(
            kinds("q <= d;"),
            vec![Ident, Operator(Op::NonBlocking), Ident, Semicolon, Eof]
        );
    }

    #[test]
    fn system_names_split_after_dollar() {
        assert_eq!(texts("$display"), vec!["$", "display", ""]);
        assert_eq!(kinds("$display"), vec![Dollar, Ident, Eof]);
    }

    #[test]
    fn comments_and_directives_are_skipped() {
        assert_eq!(
            kinds("a // b c\n/* x */ d\n`timescale 1ns\n`define W 8\n`include \"f.v\" e"),
            vec![Ident, Ident, Literal(Number), Ident, Ident, Eof]
        );
    }

    #[test]
    fn block_comment_does_not_span_lines() {
        // Each line is matched on its own, so the text between `/*` and `*/`
        // on different lines is lexed as regular tokens.
        assert_eq!(
            kinds("/* a\nb */"),
            vec![
                Operator(Op::Div),
                Operator(Op::Mul),
                Ident,
                Ident,
                Operator(Op::Mul),
                Operator(Op::Div),
                Eof
            ]
        );
    }

    #[test]
    fn unknown_characters() {
        let tokens = tokenize("a ? é");
        assert_eq!(tokens[1].kind, Unknown);
        assert_eq!(tokens[1].text, "?");
        assert_eq!(tokens[2].kind, Unknown);
        assert_eq!(tokens[2].text, "é");
        assert_eq!(tokens[2].column, 5);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        assert_eq!(kinds("a\r\nb\r\n"), vec![Ident, Ident, Eof]);
    }

    #[test]
    fn tokens_relex_to_themselves() {
        let src = "module m(input [7:0] a, output reg b);\n\
                   always @(posedge clk or negedge rst) b <= a[3] ^ 4'b1_0;\n\
                   initial $display(\"hi\", 8'hff % 3'o7);\n\
                   endmodule";
        for tkn in tokenize(src).into_iter().filter(|t| !t.is_eof()) {
            let relexed = tokenize(&tkn.text);
            assert_eq!(relexed.len(), 2, "{}", tkn);
            assert_eq!(relexed[0].kind, tkn.kind);
            assert_eq!(relexed[0].text, tkn.text);
        }
    }
}
