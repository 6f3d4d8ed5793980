// Copyright (c) 2016-2021 Fabian Schuiki

//! An implementation of the visitor pattern for the AST.
//!
//! This module defines the [`Visitor`] trait that allows the AST to be
//! traversed. Each `visit_*` function defaults to the corresponding `walk_*`
//! function, which visits the children of the node. Implementors override
//! the functions for the nodes they are interested in and call the `walk_*`
//! function themselves to continue the traversal.

use crate::ast::*;

/// A visitor of the AST.
pub trait Visitor<'a>: Sized {
    fn visit_module(&mut self, module: &'a ModuleNode) {
        walk_module(self, module)
    }

    fn visit_port(&mut self, port: &'a Port) {
        walk_port(self, port)
    }

    fn visit_range(&mut self, range: &'a Range) {
        walk_range(self, range)
    }

    fn visit_item(&mut self, item: &'a Item) {
        walk_item(self, item)
    }

    fn visit_port_decl(&mut self, decl: &'a PortDecl) {
        walk_port_decl(self, decl)
    }

    fn visit_net_decl(&mut self, decl: &'a NetDecl) {
        walk_net_decl(self, decl)
    }

    fn visit_cont_assign(&mut self, assign: &'a ContAssign) {
        walk_cont_assign(self, assign)
    }

    fn visit_always(&mut self, always: &'a AlwaysBlock) {
        walk_always(self, always)
    }

    fn visit_sensitivity_item(&mut self, _item: &'a SensitivityItem) {}

    fn visit_initial(&mut self, initial: &'a InitialBlock) {
        walk_initial(self, initial)
    }

    fn visit_module_inst(&mut self, inst: &'a ModuleInst) {
        walk_module_inst(self, inst)
    }

    fn visit_port_conn(&mut self, conn: &'a PortConn) {
        walk_port_conn(self, conn)
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt)
    }

    fn visit_block(&mut self, block: &'a BlockStmt) {
        walk_block(self, block)
    }

    fn visit_if(&mut self, stmt: &'a IfStmt) {
        walk_if(self, stmt)
    }

    fn visit_delay(&mut self, stmt: &'a DelayStmt) {
        walk_delay(self, stmt)
    }

    fn visit_forever(&mut self, stmt: &'a ForeverStmt) {
        walk_forever(self, stmt)
    }

    fn visit_sys_task(&mut self, call: &'a SysTaskCall) {
        walk_sys_task(self, call)
    }

    fn visit_proc_assign(&mut self, assign: &'a ProcAssign) {
        walk_proc_assign(self, assign)
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr)
    }

    fn visit_binary(&mut self, expr: &'a BinaryExpr) {
        walk_binary(self, expr)
    }

    fn visit_unary(&mut self, expr: &'a UnaryExpr) {
        walk_unary(self, expr)
    }

    fn visit_index(&mut self, expr: &'a IndexExpr) {
        walk_index(self, expr)
    }

    fn visit_range_index(&mut self, expr: &'a RangeIndexExpr) {
        walk_range_index(self, expr)
    }

    fn visit_ident(&mut self, _name: &'a str) {}
    fn visit_number(&mut self, _lit: &'a NumberLit) {}
    fn visit_string(&mut self, _lit: &'a StringLit) {}
}

/// A node that can dispatch a visitor to the matching `visit_*` function.
pub trait AcceptVisitor<'a> {
    /// Call the visitor function for `self`.
    fn accept<V: Visitor<'a>>(&'a self, visitor: &mut V);
}

macro_rules! impl_accept {
    ($($ty:ty => $visit:ident,)*) => {
        $(
            impl<'a> AcceptVisitor<'a> for $ty {
                fn accept<V: Visitor<'a>>(&'a self, visitor: &mut V) {
                    visitor.$visit(self)
                }
            }
        )*
    };
}

impl_accept! {
    ModuleNode => visit_module,
    Port => visit_port,
    Range => visit_range,
    Item => visit_item,
    PortDecl => visit_port_decl,
    NetDecl => visit_net_decl,
    ContAssign => visit_cont_assign,
    AlwaysBlock => visit_always,
    SensitivityItem => visit_sensitivity_item,
    InitialBlock => visit_initial,
    ModuleInst => visit_module_inst,
    PortConn => visit_port_conn,
    Stmt => visit_stmt,
    BlockStmt => visit_block,
    IfStmt => visit_if,
    DelayStmt => visit_delay,
    ForeverStmt => visit_forever,
    SysTaskCall => visit_sys_task,
    ProcAssign => visit_proc_assign,
    Expr => visit_expr,
    BinaryExpr => visit_binary,
    UnaryExpr => visit_unary,
    IndexExpr => visit_index,
    RangeIndexExpr => visit_range_index,
    NumberLit => visit_number,
    StringLit => visit_string,
}

pub fn walk_module<'a>(visitor: &mut impl Visitor<'a>, module: &'a ModuleNode) {
    for port in &module.ports {
        visitor.visit_port(port);
    }
    for item in &module.items {
        visitor.visit_item(item);
    }
}

pub fn walk_port<'a>(visitor: &mut impl Visitor<'a>, port: &'a Port) {
    if let Some(ref range) = port.range {
        visitor.visit_range(range);
    }
}

pub fn walk_range<'a>(visitor: &mut impl Visitor<'a>, range: &'a Range) {
    visitor.visit_expr(&range.msb);
    visitor.visit_expr(&range.lsb);
}

pub fn walk_item<'a>(visitor: &mut impl Visitor<'a>, item: &'a Item) {
    match item {
        Item::PortDecl(x) => visitor.visit_port_decl(x),
        Item::NetDecl(x) => visitor.visit_net_decl(x),
        Item::ContAssign(x) => visitor.visit_cont_assign(x),
        Item::Always(x) => visitor.visit_always(x),
        Item::Initial(x) => visitor.visit_initial(x),
        Item::Inst(x) => visitor.visit_module_inst(x),
    }
}

pub fn walk_port_decl<'a>(visitor: &mut impl Visitor<'a>, decl: &'a PortDecl) {
    if let Some(ref range) = decl.range {
        visitor.visit_range(range);
    }
}

pub fn walk_net_decl<'a>(visitor: &mut impl Visitor<'a>, decl: &'a NetDecl) {
    if let Some(ref range) = decl.range {
        visitor.visit_range(range);
    }
}

pub fn walk_cont_assign<'a>(visitor: &mut impl Visitor<'a>, assign: &'a ContAssign) {
    visitor.visit_expr(&assign.target);
    visitor.visit_expr(&assign.source);
}

pub fn walk_always<'a>(visitor: &mut impl Visitor<'a>, always: &'a AlwaysBlock) {
    for item in &always.sensitivity {
        visitor.visit_sensitivity_item(item);
    }
    visitor.visit_stmt(&always.stmt);
}

pub fn walk_initial<'a>(visitor: &mut impl Visitor<'a>, initial: &'a InitialBlock) {
    visitor.visit_stmt(&initial.stmt);
}

pub fn walk_module_inst<'a>(visitor: &mut impl Visitor<'a>, inst: &'a ModuleInst) {
    for conn in &inst.connections {
        visitor.visit_port_conn(conn);
    }
}

pub fn walk_port_conn<'a>(visitor: &mut impl Visitor<'a>, conn: &'a PortConn) {
    visitor.visit_expr(&conn.expr);
}

pub fn walk_stmt<'a>(visitor: &mut impl Visitor<'a>, stmt: &'a Stmt) {
    match stmt {
        Stmt::Block(x) => visitor.visit_block(x),
        Stmt::If(x) => visitor.visit_if(x),
        Stmt::Delay(x) => visitor.visit_delay(x),
        Stmt::Forever(x) => visitor.visit_forever(x),
        Stmt::SysTask(x) => visitor.visit_sys_task(x),
        Stmt::Assign(x) => visitor.visit_proc_assign(x),
    }
}

pub fn walk_block<'a>(visitor: &mut impl Visitor<'a>, block: &'a BlockStmt) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_if<'a>(visitor: &mut impl Visitor<'a>, stmt: &'a IfStmt) {
    visitor.visit_expr(&stmt.cond);
    visitor.visit_stmt(&stmt.then_stmt);
    if let Some(ref else_stmt) = stmt.else_stmt {
        visitor.visit_stmt(else_stmt);
    }
}

pub fn walk_delay<'a>(visitor: &mut impl Visitor<'a>, stmt: &'a DelayStmt) {
    visitor.visit_stmt(&stmt.stmt);
}

pub fn walk_forever<'a>(visitor: &mut impl Visitor<'a>, stmt: &'a ForeverStmt) {
    visitor.visit_stmt(&stmt.stmt);
}

pub fn walk_sys_task<'a>(visitor: &mut impl Visitor<'a>, call: &'a SysTaskCall) {
    for arg in &call.args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_proc_assign<'a>(visitor: &mut impl Visitor<'a>, assign: &'a ProcAssign) {
    visitor.visit_expr(&assign.target);
    visitor.visit_expr(&assign.source);
}

pub fn walk_expr<'a>(visitor: &mut impl Visitor<'a>, expr: &'a Expr) {
    match expr {
        Expr::Binary(x) => visitor.visit_binary(x),
        Expr::Unary(x) => visitor.visit_unary(x),
        Expr::Index(x) => visitor.visit_index(x),
        Expr::RangeIndex(x) => visitor.visit_range_index(x),
        Expr::Ident(name) => visitor.visit_ident(name),
        Expr::Number(x) => visitor.visit_number(x),
        Expr::Str(x) => visitor.visit_string(x),
    }
}

pub fn walk_binary<'a>(visitor: &mut impl Visitor<'a>, expr: &'a BinaryExpr) {
    visitor.visit_expr(&expr.lhs);
    visitor.visit_expr(&expr.rhs);
}

pub fn walk_unary<'a>(visitor: &mut impl Visitor<'a>, expr: &'a UnaryExpr) {
    visitor.visit_expr(&expr.operand);
}

pub fn walk_index<'a>(visitor: &mut impl Visitor<'a>, expr: &'a IndexExpr) {
    visitor.visit_ident(&expr.target);
    visitor.visit_expr(&expr.index);
}

pub fn walk_range_index<'a>(visitor: &mut impl Visitor<'a>, expr: &'a RangeIndexExpr) {
    visitor.visit_ident(&expr.target);
    visitor.visit_expr(&expr.msb);
    visitor.visit_expr(&expr.lsb);
}
