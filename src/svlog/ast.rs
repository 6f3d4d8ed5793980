// Copyright (c) 2016-2021 Fabian Schuiki

//! An abstract syntax tree for Verilog.
//!
//! Every node is owned by its parent. The [`ModuleNode`] is the root of the
//! tree and is handed to the caller of the parser.

use serde::Serialize;
use std::fmt;
use verilite_common::source::Location;
use verilite_common::util::{HasDesc, HasLocation};

/// A module declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNode {
    pub name: String,
    pub loc: Location,
    pub ports: Vec<Port>,
    pub items: Vec<Item>,
}

/// A port declared inline in the port list of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    pub name: String,
    pub loc: Location,
    pub direction: Option<PortDir>,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDir {
    Input,
    Output,
    Inout,
}

impl PortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            PortDir::Input => "input",
            PortDir::Output => "output",
            PortDir::Inout => "inout",
        }
    }
}

impl fmt::Display for PortDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetKind {
    Wire,
    Reg,
}

impl NetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NetKind::Wire => "wire",
            NetKind::Reg => "reg",
        }
    }
}

impl fmt::Display for NetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bit range `[msb:lsb]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub msb: Expr,
    pub lsb: Expr,
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

/// An item in the body of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Item {
    PortDecl(PortDecl),
    NetDecl(NetDecl),
    ContAssign(ContAssign),
    Always(AlwaysBlock),
    Initial(InitialBlock),
    Inst(ModuleInst),
}

/// A port direction declaration such as `input [7:0] a, b;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortDecl {
    pub dir: PortDir,
    pub range: Option<Range>,
    pub names: Vec<String>,
}

/// A net declaration such as `wire [3:0] x, y;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetDecl {
    pub kind: NetKind,
    pub range: Option<Range>,
    pub names: Vec<String>,
}

/// A continuous assignment `assign a = b;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContAssign {
    pub target: Expr,
    pub source: Expr,
}

/// An `always` block. An empty sensitivity list stands for implicit
/// sensitivity (`@*`) or no event control at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlwaysBlock {
    pub sensitivity: Vec<SensitivityItem>,
    pub stmt: Stmt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitivityItem {
    pub edge: Option<Edge>,
    pub signal: String,
}

impl fmt::Display for SensitivityItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.edge {
            Some(edge) => write!(f, "{} {}", edge, self.signal),
            None => write!(f, "{}", self.signal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Posedge,
    Negedge,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Edge::Posedge => write!(f, "posedge"),
            Edge::Negedge => write!(f, "negedge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitialBlock {
    pub stmt: Stmt,
}

/// An instantiation such as `adder u0 (.a(x), .b(y));`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInst {
    pub module_type: String,
    pub instance_name: String,
    pub loc: Location,
    pub connections: Vec<PortConn>,
}

/// A named port connection `.port(expr)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortConn {
    pub port: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Stmt {
    Block(BlockStmt),
    If(IfStmt),
    Delay(DelayStmt),
    Forever(ForeverStmt),
    SysTask(SysTaskCall),
    Assign(ProcAssign),
}

/// A `begin ... end` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_stmt: Box<Stmt>,
    pub else_stmt: Option<Box<Stmt>>,
}

/// A delayed statement `#10 stmt`. The delay is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayStmt {
    pub delay: String,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeverStmt {
    pub stmt: Box<Stmt>,
}

/// A system task call such as `$display("%d", a);`. The name includes the
/// leading `$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SysTaskCall {
    pub name: String,
    pub args: Vec<Expr>,
}

/// A blocking or non-blocking procedural assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcAssign {
    pub target: Expr,
    pub op: AssignOp,
    pub source: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignOp {
    /// `=`
    Blocking,
    /// `<=`
    NonBlocking,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Blocking => "=",
            AssignOp::NonBlocking => "<=",
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    /// A single bit select `a[i]`.
    Index(IndexExpr),
    /// A part select `a[msb:lsb]`.
    RangeIndex(RangeIndexExpr),
    /// A plain identifier, or a system function name such as `$time`.
    Ident(String),
    Number(NumberLit),
    Str(StringLit),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryExpr {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    Xor,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "|",
            BinaryOp::And => "&",
            BinaryOp::Xor => "^",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    /// `~`
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexExpr {
    pub target: String,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeIndexExpr {
    pub target: String,
    pub msb: Box<Expr>,
    pub lsb: Box<Expr>,
}

/// A numeric literal, either a plain decimal number or a sized literal
/// such as `8'hff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberLit {
    pub text: String,
    pub base: Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    Decimal,
    Binary,
    Hex,
    Octal,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Decimal => 10,
            Base::Binary => 2,
            Base::Hex => 16,
            Base::Octal => 8,
        }
    }
}

impl NumberLit {
    /// The declared width of a sized literal.
    pub fn size(&self) -> Option<u32> {
        let tick = self.text.find('\'')?;
        self.text[..tick].parse().ok()
    }

    /// The value of the literal, or `None` if it does not fit into 64 bits.
    pub fn value(&self) -> Option<u64> {
        let digits = match self.text.find('\'') {
            Some(tick) => self.text.get(tick + 2..)?,
            None => self.text.as_str(),
        };
        let digits: String = digits.chars().filter(|&c| c != '_').collect();
        u64::from_str_radix(&digits, self.base.radix()).ok()
    }
}

/// A string literal. The text includes the surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLit {
    pub text: String,
}

impl StringLit {
    /// The contents of the string without the quotes.
    pub fn value(&self) -> &str {
        self.text
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(&self.text)
    }
}

impl Expr {
    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn ident<S: Into<String>>(name: S) -> Expr {
        Expr::Ident(name.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Binary(x) => write!(f, "({} {} {})", x.lhs, x.op, x.rhs),
            Expr::Unary(x) => write!(f, "{}{}", x.op.as_str(), x.operand),
            Expr::Index(x) => write!(f, "{}[{}]", x.target, x.index),
            Expr::RangeIndex(x) => write!(f, "{}[{}:{}]", x.target, x.msb, x.lsb),
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Number(x) => write!(f, "{}", x.text),
            Expr::Str(x) => write!(f, "{}", x.text),
        }
    }
}

impl HasLocation for ModuleNode {
    fn location(&self) -> Location {
        self.loc
    }
}

impl HasDesc for ModuleNode {
    fn desc(&self) -> &'static str {
        "module"
    }

    fn desc_full(&self) -> String {
        format!("module `{}`", self.name)
    }
}

impl HasDesc for Item {
    fn desc(&self) -> &'static str {
        match self {
            Item::PortDecl(_) => "port declaration",
            Item::NetDecl(x) => match x.kind {
                NetKind::Wire => "wire declaration",
                NetKind::Reg => "reg declaration",
            },
            Item::ContAssign(_) => "continuous assignment",
            Item::Always(_) => "always block",
            Item::Initial(_) => "initial block",
            Item::Inst(_) => "module instantiation",
        }
    }

    fn desc_full(&self) -> String {
        match self {
            Item::Inst(x) => format!("instance `{}` of `{}`", x.instance_name, x.module_type),
            _ => self.desc().into(),
        }
    }
}
