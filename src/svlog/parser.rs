// Copyright (c) 2016-2021 Fabian Schuiki

//! A recursive descent parser for Verilog.
//!
//! The parser builds the AST of a single module and declares the ports and
//! nets it encounters in a [`SymbolTable`] as it goes. Parsing stops at the
//! first syntax or semantic error. Unrecognized module items are skipped
//! with a warning.

use crate::ast::*;
use crate::lexer::*;
use crate::symtbl::{SymbolKind, SymbolTable};
use verilite_common::errors::{CompileResult, CompilerError};

/// An abstraction around concrete parsers.
trait AbstractParser {
    fn peek(&self, offset: usize) -> &Token;
    fn bump(&mut self) -> Token;
    fn symtbl(&mut self) -> &mut SymbolTable;
    fn add_warning(&mut self, warning: CompilerError);
    /// The number of nested statements and parenthesized expressions
    /// currently being parsed.
    fn depth(&mut self) -> &mut usize;

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek(0).kind == kind
    }

    fn try_eat(&mut self, kind: TokenKind) -> bool {
        if self.matches(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn require(&mut self, expect: TokenKind) -> CompileResult<Token> {
        if self.matches(expect) {
            Ok(self.bump())
        } else {
            let found = self.peek(0);
            Err(syntax_error(
                format!("Expected {}, found {}", expect, found.kind),
                found,
            ))
        }
    }

    fn eat_ident(&mut self) -> CompileResult<Token> {
        self.require(Ident)
    }
}

/// Create a syntax error located at `at`.
fn syntax_error<S: Into<String>>(message: S, at: &Token) -> CompilerError {
    let err = CompilerError::syntax(message, at.line, at.column, at.text.as_str());
    if log_enabled!(log::Level::Trace) {
        trace!(
            "Syntax error `{}` raised here:\n{:?}",
            err,
            backtrace::Backtrace::new()
        );
    }
    err
}

/// The maximum nesting of statements and expressions.
const MAX_NESTING: usize = 256;

/// Run `inner` one nesting level deeper, failing once `MAX_NESTING` is
/// exceeded.
fn nested<R, F>(p: &mut dyn AbstractParser, what: &str, mut inner: F) -> CompileResult<R>
where
    F: FnMut(&mut dyn AbstractParser) -> CompileResult<R>,
{
    if *p.depth() >= MAX_NESTING {
        return Err(syntax_error(format!("{} nesting too deep", what), p.peek(0)));
    }
    *p.depth() += 1;
    let result = inner(p);
    *p.depth() -= 1;
    result
}

/// A parser for the tokens of one source file.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    symbols: SymbolTable,
    warnings: Vec<CompilerError>,
    depth: usize,
}

impl AbstractParser for Parser {
    fn peek(&self, offset: usize) -> &Token {
        let idx = std::cmp::min(self.pos + offset, self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn bump(&mut self) -> Token {
        let tkn = self.peek(0).clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tkn
    }

    fn symtbl(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    fn add_warning(&mut self, warning: CompilerError) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn depth(&mut self) -> &mut usize {
        &mut self.depth
    }
}

impl Parser {
    /// Create a parser for a token stream. Newline tokens are discarded, and
    /// an `Eof` token is appended if the stream lacks one.
    pub fn new(tokens: Vec<Token>) -> Parser {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| t.kind != Newline).collect();
        if tokens.last().map(|t| !t.is_eof()).unwrap_or(true) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(Eof, "", line, 1));
        }
        Parser {
            tokens,
            pos: 0,
            symbols: SymbolTable::new(),
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Parse the module in the token stream.
    ///
    /// Each call starts over at the first token with a fresh symbol table.
    pub fn parse(&mut self) -> CompileResult<ModuleNode> {
        self.pos = 0;
        self.symbols = SymbolTable::new();
        self.warnings.clear();
        self.depth = 0;

        let module = parse_module(self)?;
        if !self.peek(0).is_eof() {
            let tkn = self.peek(0).clone();
            self.add_warning(CompilerError::general(
                format!("Ignoring tokens after 'endmodule', starting at '{}'", tkn.text),
                tkn.line,
                tkn.column,
            ));
        }
        Ok(module)
    }

    /// The symbols declared during parsing.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    /// The non-fatal problems encountered during parsing.
    pub fn warnings(&self) -> &[CompilerError] {
        &self.warnings
    }
}

/// Parse a token stream into a module.
pub fn parse(tokens: Vec<Token>) -> CompileResult<ModuleNode> {
    Parser::new(tokens).parse()
}

fn parse_module(p: &mut dyn AbstractParser) -> CompileResult<ModuleNode> {
    let kw = p.require(Keyword(Kw::Module))?;
    let name = p.eat_ident()?;
    debug!("Parsing module `{}`", name.text);
    p.symtbl().enter_scope(name.text.as_str());

    let mut ports = Vec::new();
    if p.try_eat(OpenDelim(Paren)) {
        ports = parse_port_list(p)?;
        p.require(CloseDelim(Paren))?;
    }
    p.require(Semicolon)?;

    let mut items = Vec::new();
    while !p.matches(Keyword(Kw::Endmodule)) {
        if p.matches(Eof) {
            return Err(syntax_error("Expected 'endmodule'", p.peek(0)));
        }
        if let Some(item) = parse_module_item(p)? {
            items.push(item);
        }
    }
    p.require(Keyword(Kw::Endmodule))?;
    p.symtbl().exit_scope();

    Ok(ModuleNode {
        name: name.text,
        loc: kw.location(),
        ports,
        items,
    })
}

fn parse_port_list(p: &mut dyn AbstractParser) -> CompileResult<Vec<Port>> {
    let mut ports = Vec::new();
    if !p.matches(CloseDelim(Paren)) {
        ports.push(parse_port(p)?);
        while p.try_eat(Comma) {
            ports.push(parse_port(p)?);
        }
    }
    Ok(ports)
}

fn try_port_dir(p: &mut dyn AbstractParser) -> Option<PortDir> {
    let dir = match p.peek(0).kind {
        Keyword(Kw::Input) => PortDir::Input,
        Keyword(Kw::Output) => PortDir::Output,
        Keyword(Kw::Inout) => PortDir::Inout,
        _ => return None,
    };
    p.bump();
    Some(dir)
}

fn try_net_kind(p: &mut dyn AbstractParser) -> Option<NetKind> {
    let kind = match p.peek(0).kind {
        Keyword(Kw::Wire) => NetKind::Wire,
        Keyword(Kw::Reg) => NetKind::Reg,
        _ => return None,
    };
    p.bump();
    Some(kind)
}

fn try_range(p: &mut dyn AbstractParser) -> CompileResult<Option<Range>> {
    if p.matches(OpenDelim(Brack)) {
        parse_range(p).map(Some)
    } else {
        Ok(None)
    }
}

/// Parse an entry of a module's port list, e.g. `input reg [3:0] q`.
fn parse_port(p: &mut dyn AbstractParser) -> CompileResult<Port> {
    let direction = try_port_dir(p);
    let net_kind = try_net_kind(p);
    let range = try_range(p)?;
    let name = p.eat_ident()?;

    // Ports listed without a direction are completed by a later port
    // declaration, so the first occurrence of a name wins.
    if p.symtbl().lookup_local(&name.text).is_none() {
        let sym = p.symtbl().declare(
            name.text.as_str(),
            SymbolKind::Port,
            direction,
            name.location(),
        )?;
        if let Some(kind) = net_kind {
            sym.attributes
                .insert("net_type".to_owned(), kind.as_str().to_owned());
        }
    }

    Ok(Port {
        loc: name.location(),
        name: name.text,
        direction,
        range,
    })
}

fn parse_module_item(p: &mut dyn AbstractParser) -> CompileResult<Option<Item>> {
    let item = match p.peek(0).kind {
        Keyword(Kw::Input) | Keyword(Kw::Output) | Keyword(Kw::Inout) => {
            Item::PortDecl(parse_port_decl(p)?)
        }
        Keyword(Kw::Wire) | Keyword(Kw::Reg) => Item::NetDecl(parse_net_decl(p)?),
        Keyword(Kw::Assign) => Item::ContAssign(parse_cont_assign(p)?),
        Keyword(Kw::Always) => Item::Always(parse_always(p)?),
        Keyword(Kw::Initial) => Item::Initial(parse_initial(p)?),
        Ident => Item::Inst(parse_module_inst(p)?),
        _ => {
            let tkn = p.bump();
            p.add_warning(CompilerError::general(
                format!("Skipping unknown token '{}'", tkn.text),
                tkn.line,
                tkn.column,
            ));
            return Ok(None);
        }
    };
    Ok(Some(item))
}

fn parse_name_list(p: &mut dyn AbstractParser) -> CompileResult<Vec<Token>> {
    let mut names = vec![p.eat_ident()?];
    while p.try_eat(Comma) {
        names.push(p.eat_ident()?);
    }
    Ok(names)
}

/// Parse a port declaration such as `output [7:0] a, b;`.
fn parse_port_decl(p: &mut dyn AbstractParser) -> CompileResult<PortDecl> {
    let dir = match try_port_dir(p) {
        Some(dir) => dir,
        None => {
            let found = p.peek(0);
            return Err(syntax_error(
                format!("Expected port direction, found {}", found.kind),
                found,
            ));
        }
    };
    let range = try_range(p)?;
    let names = parse_name_list(p)?;
    p.require(Semicolon)?;

    for name in &names {
        let existing = p
            .symtbl()
            .lookup_local(&name.text)
            .map(|sym| (sym.kind, sym.direction, sym.line));
        match existing {
            None => {
                p.symtbl().declare(
                    name.text.as_str(),
                    SymbolKind::Port,
                    Some(dir),
                    name.location(),
                )?;
            }
            Some((SymbolKind::Port, None, _)) => {
                if let Some(sym) = p.symtbl().lookup_local_mut(&name.text) {
                    sym.direction = Some(dir);
                }
            }
            Some((SymbolKind::Port, Some(prev), _)) => {
                p.add_warning(CompilerError::general(
                    format!(
                        "Port '{}' already declared as {}, ignoring {} declaration",
                        name.text, prev, dir
                    ),
                    name.line,
                    name.column,
                ));
            }
            Some((kind, _, line)) => {
                let scope = p.symtbl().current_scope_name().to_owned();
                return Err(CompilerError::semantic(
                    format!(
                        "Symbol '{}' already declared as {} in scope '{}' (previous declaration at line {})",
                        name.text, kind, scope, line
                    ),
                    name.line,
                    name.column,
                    name.text.as_str(),
                ));
            }
        }
    }

    Ok(PortDecl {
        dir,
        range,
        names: names.into_iter().map(|t| t.text).collect(),
    })
}

/// Parse a net declaration such as `reg [3:0] q;`.
fn parse_net_decl(p: &mut dyn AbstractParser) -> CompileResult<NetDecl> {
    let kind = match try_net_kind(p) {
        Some(kind) => kind,
        None => {
            let found = p.peek(0);
            return Err(syntax_error(
                format!("Expected net type, found {}", found.kind),
                found,
            ));
        }
    };
    let range = try_range(p)?;
    let names = parse_name_list(p)?;
    p.require(Semicolon)?;

    let sym_kind = match kind {
        NetKind::Wire => SymbolKind::Wire,
        NetKind::Reg => SymbolKind::Reg,
    };
    for name in &names {
        p.symtbl()
            .declare(name.text.as_str(), sym_kind, None, name.location())?;
    }

    Ok(NetDecl {
        kind,
        range,
        names: names.into_iter().map(|t| t.text).collect(),
    })
}

fn parse_range(p: &mut dyn AbstractParser) -> CompileResult<Range> {
    p.require(OpenDelim(Brack))?;
    let msb = parse_expr(p)?;
    p.require(Colon)?;
    let lsb = parse_expr(p)?;
    p.require(CloseDelim(Brack))?;
    Ok(Range { msb, lsb })
}

fn parse_cont_assign(p: &mut dyn AbstractParser) -> CompileResult<ContAssign> {
    p.require(Keyword(Kw::Assign))?;
    let target = parse_expr(p)?;
    p.require(Operator(Op::Assign))?;
    let source = parse_expr(p)?;
    p.require(Semicolon)?;
    Ok(ContAssign { target, source })
}

fn parse_always(p: &mut dyn AbstractParser) -> CompileResult<AlwaysBlock> {
    p.require(Keyword(Kw::Always))?;
    let mut sensitivity = Vec::new();
    if p.try_eat(At) {
        // Both `@*` and `@(*)` denote implicit sensitivity.
        if !p.try_eat(Operator(Op::Mul)) && p.try_eat(OpenDelim(Paren)) {
            if !p.try_eat(Operator(Op::Mul)) {
                sensitivity = parse_sensitivity_list(p)?;
            }
            p.require(CloseDelim(Paren))?;
        }
    }
    let stmt = parse_stmt(p)?;
    Ok(AlwaysBlock { sensitivity, stmt })
}

/// Parse the entries of a sensitivity list, separated by `or`.
fn parse_sensitivity_list(p: &mut dyn AbstractParser) -> CompileResult<Vec<SensitivityItem>> {
    let mut items = Vec::new();
    if !p.matches(CloseDelim(Paren)) {
        items.push(parse_sensitivity_item(p)?);
        while p.try_eat(Keyword(Kw::SensOr)) {
            items.push(parse_sensitivity_item(p)?);
        }
    }
    Ok(items)
}

fn parse_sensitivity_item(p: &mut dyn AbstractParser) -> CompileResult<SensitivityItem> {
    let edge = if p.try_eat(Keyword(Kw::Posedge)) {
        Some(Edge::Posedge)
    } else if p.try_eat(Keyword(Kw::Negedge)) {
        Some(Edge::Negedge)
    } else {
        None
    };
    let signal = p.eat_ident()?.text;
    Ok(SensitivityItem { edge, signal })
}

fn parse_initial(p: &mut dyn AbstractParser) -> CompileResult<InitialBlock> {
    p.require(Keyword(Kw::Initial))?;
    let stmt = parse_stmt(p)?;
    Ok(InitialBlock { stmt })
}

/// Parse an instantiation such as `adder u0 (.a(x), .b(y));`.
fn parse_module_inst(p: &mut dyn AbstractParser) -> CompileResult<ModuleInst> {
    let ty = p.eat_ident()?;
    let inst = p.eat_ident()?;
    p.require(OpenDelim(Paren))?;
    let mut connections = Vec::new();
    if !p.matches(CloseDelim(Paren)) {
        connections.push(parse_port_conn(p)?);
        while p.try_eat(Comma) {
            connections.push(parse_port_conn(p)?);
        }
    }
    p.require(CloseDelim(Paren))?;
    p.require(Semicolon)?;
    Ok(ModuleInst {
        loc: ty.location(),
        module_type: ty.text,
        instance_name: inst.text,
        connections,
    })
}

fn parse_port_conn(p: &mut dyn AbstractParser) -> CompileResult<PortConn> {
    p.require(Period)?;
    let port = p.eat_ident()?.text;
    p.require(OpenDelim(Paren))?;
    let expr = parse_expr(p)?;
    p.require(CloseDelim(Paren))?;
    Ok(PortConn { port, expr })
}

fn parse_stmt(p: &mut dyn AbstractParser) -> CompileResult<Stmt> {
    nested(p, "Statement", |p| match p.peek(0).kind {
        Keyword(Kw::Begin) => parse_block(p).map(Stmt::Block),
        Keyword(Kw::If) => parse_if(p).map(Stmt::If),
        Hashtag => parse_delay(p).map(Stmt::Delay),
        Keyword(Kw::Forever) => parse_forever(p).map(Stmt::Forever),
        Dollar => parse_sys_task(p).map(Stmt::SysTask),
        _ => parse_proc_assign(p).map(Stmt::Assign),
    })
}

fn parse_block(p: &mut dyn AbstractParser) -> CompileResult<BlockStmt> {
    p.require(Keyword(Kw::Begin))?;
    let mut stmts = Vec::new();
    while !p.matches(Keyword(Kw::End)) {
        if p.matches(Eof) {
            return Err(syntax_error("Expected 'end'", p.peek(0)));
        }
        stmts.push(parse_stmt(p)?);
    }
    p.require(Keyword(Kw::End))?;
    Ok(BlockStmt { stmts })
}

fn parse_if(p: &mut dyn AbstractParser) -> CompileResult<IfStmt> {
    p.require(Keyword(Kw::If))?;
    p.require(OpenDelim(Paren))?;
    let cond = parse_expr(p)?;
    p.require(CloseDelim(Paren))?;
    let then_stmt = Box::new(parse_stmt(p)?);
    let else_stmt = if p.try_eat(Keyword(Kw::Else)) {
        Some(Box::new(parse_stmt(p)?))
    } else {
        None
    };
    Ok(IfStmt {
        cond,
        then_stmt,
        else_stmt,
    })
}

/// Parse a delayed statement such as `#10 a = b;`.
fn parse_delay(p: &mut dyn AbstractParser) -> CompileResult<DelayStmt> {
    p.require(Hashtag)?;
    let delay = p.require(Literal(Number))?.text;
    let stmt = Box::new(parse_stmt(p)?);
    Ok(DelayStmt { delay, stmt })
}

fn parse_forever(p: &mut dyn AbstractParser) -> CompileResult<ForeverStmt> {
    p.require(Keyword(Kw::Forever))?;
    let stmt = Box::new(parse_stmt(p)?);
    Ok(ForeverStmt { stmt })
}

/// Parse a system task call such as `$finish;` or `$display("%d", a);`.
fn parse_sys_task(p: &mut dyn AbstractParser) -> CompileResult<SysTaskCall> {
    p.require(Dollar)?;
    let name = format!("${}", p.eat_ident()?.text);
    let mut args = Vec::new();
    if p.try_eat(OpenDelim(Paren)) {
        if !p.matches(CloseDelim(Paren)) {
            args.push(parse_expr(p)?);
            while p.try_eat(Comma) {
                args.push(parse_expr(p)?);
            }
        }
        p.require(CloseDelim(Paren))?;
    }
    p.require(Semicolon)?;
    Ok(SysTaskCall { name, args })
}

fn parse_proc_assign(p: &mut dyn AbstractParser) -> CompileResult<ProcAssign> {
    let target = parse_expr(p)?;
    let op = if p.try_eat(Operator(Op::Assign)) {
        AssignOp::Blocking
    } else if p.try_eat(Operator(Op::NonBlocking)) {
        AssignOp::NonBlocking
    } else {
        return Err(syntax_error("Expected assignment operator", p.peek(0)));
    };
    let source = parse_expr(p)?;
    p.require(Semicolon)?;
    Ok(ProcAssign { target, op, source })
}

/// The binding strength of binary operators. Higher binds tighter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Precedence {
    Min,
    Or,
    And,
    Xor,
    Add,
    Mul,
}

fn as_binary_op(kind: TokenKind) -> Option<(BinaryOp, Precedence)> {
    Some(match kind {
        Operator(Op::Or) => (BinaryOp::Or, Precedence::Or),
        Operator(Op::And) => (BinaryOp::And, Precedence::And),
        Operator(Op::Xor) => (BinaryOp::Xor, Precedence::Xor),
        Operator(Op::Plus) => (BinaryOp::Add, Precedence::Add),
        Operator(Op::Minus) => (BinaryOp::Sub, Precedence::Add),
        Operator(Op::Mul) => (BinaryOp::Mul, Precedence::Mul),
        Operator(Op::Div) => (BinaryOp::Div, Precedence::Mul),
        Operator(Op::Mod) => (BinaryOp::Mod, Precedence::Mul),
        _ => return None,
    })
}

fn parse_expr(p: &mut dyn AbstractParser) -> CompileResult<Expr> {
    nested(p, "Expression", |p| parse_expr_prec(p, Precedence::Min))
}

/// Parse an expression whose binary operators all bind tighter than
/// `precedence`. Operators of equal strength associate to the left.
fn parse_expr_prec(p: &mut dyn AbstractParser, precedence: Precedence) -> CompileResult<Expr> {
    let mut expr = parse_unary_expr(p)?;
    while let Some((op, op_prec)) = as_binary_op(p.peek(0).kind) {
        if op_prec <= precedence {
            break;
        }
        p.bump();
        let rhs = parse_expr_prec(p, op_prec)?;
        expr = Expr::binary(expr, op, rhs);
    }
    Ok(expr)
}

/// Parse `~` applied to a primary expression, or a primary expression.
fn parse_unary_expr(p: &mut dyn AbstractParser) -> CompileResult<Expr> {
    if p.try_eat(Operator(Op::Not)) {
        let operand = parse_primary_expr(p)?;
        return Ok(Expr::Unary(UnaryExpr {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }));
    }
    parse_primary_expr(p)
}

fn parse_primary_expr(p: &mut dyn AbstractParser) -> CompileResult<Expr> {
    let tkn = p.peek(0).clone();
    match tkn.kind {
        Ident => {
            p.bump();
            if !p.try_eat(OpenDelim(Brack)) {
                return Ok(Expr::Ident(tkn.text));
            }
            let first = parse_expr(p)?;
            if p.try_eat(Colon) {
                let second = parse_expr(p)?;
                p.require(CloseDelim(Brack))?;
                Ok(Expr::RangeIndex(RangeIndexExpr {
                    target: tkn.text,
                    msb: Box::new(first),
                    lsb: Box::new(second),
                }))
            } else {
                p.require(CloseDelim(Brack))?;
                Ok(Expr::Index(IndexExpr {
                    target: tkn.text,
                    index: Box::new(first),
                }))
            }
        }
        Literal(Str) => {
            p.bump();
            Ok(Expr::Str(StringLit { text: tkn.text }))
        }
        Literal(lit) => {
            p.bump();
            let base = match lit {
                Binary => Base::Binary,
                Hex => Base::Hex,
                Octal => Base::Octal,
                _ => Base::Decimal,
            };
            Ok(Expr::Number(NumberLit {
                text: tkn.text,
                base,
            }))
        }
        // A system function used as a value, e.g. `$time`.
        Dollar => {
            p.bump();
            let name = p.eat_ident()?;
            Ok(Expr::Ident(format!("${}", name.text)))
        }
        OpenDelim(Paren) => {
            p.bump();
            let expr = parse_expr(p)?;
            p.require(CloseDelim(Paren))?;
            Ok(expr)
        }
        _ => Err(syntax_error(
            format!("Expected expression, found {}", tkn.kind),
            &tkn,
        )),
    }
}
