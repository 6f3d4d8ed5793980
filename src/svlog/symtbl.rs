// Copyright (c) 2016-2021 Fabian Schuiki

//! A scoped symbol table.
//!
//! Scopes are kept in an arena and refer to their parent and children by
//! [`ScopeId`]. The path of currently open scopes is a stack of ids whose
//! bottom is always the global scope.

use crate::ast::PortDir;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use verilite_common::errors::{CompileResult, CompilerError};
use verilite_common::source::Location;

/// The index of a scope in a [`SymbolTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SymbolKind {
    Port,
    Wire,
    Reg,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Port => "port",
            SymbolKind::Wire => "wire",
            SymbolKind::Reg => "reg",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The direction of a port, if known.
    pub direction: Option<PortDir>,
    /// The name of the scope the symbol is declared in.
    pub scope: String,
    /// The line of the declaration, or zero if unknown.
    pub line: usize,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Scope {
    name: String,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl Scope {
    fn new(name: String, parent: Option<ScopeId>) -> Scope {
        Scope {
            name,
            parent,
            children: Vec::new(),
            symbols: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// The symbols of this scope, in declaration order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.symbols[i]),
            None => None,
        }
    }
}

/// A tree of scopes together with the stack of currently open scopes.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

impl SymbolTable {
    /// Create a table with only the global scope open.
    pub fn new() -> SymbolTable {
        SymbolTable {
            scopes: vec![Scope::new("global".to_owned(), None)],
            stack: vec![ScopeId(0)],
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    pub fn current_scope_name(&self) -> &str {
        self.scope(self.current_scope()).name()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Open a new scope nested in the current one.
    pub fn enter_scope<S: Into<String>>(&mut self, name: S) -> ScopeId {
        let parent = self.current_scope();
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name.into(), Some(parent)));
        self.scopes[parent.0].children.push(id);
        self.stack.push(id);
        trace!("Entered scope `{}`", self.current_scope_name());
        id
    }

    /// Close the current scope. The global scope is never closed, in which
    /// case `None` is returned.
    pub fn exit_scope(&mut self) -> Option<ScopeId> {
        if self.stack.len() <= 1 {
            return None;
        }
        let id = self.stack.pop();
        trace!("Returned to scope `{}`", self.current_scope_name());
        id
    }

    /// Declare a symbol in the current scope.
    ///
    /// Fails with a semantic error if the current scope already contains a
    /// symbol of the same name.
    pub fn declare<S: Into<String>>(
        &mut self,
        name: S,
        kind: SymbolKind,
        direction: Option<PortDir>,
        loc: Location,
    ) -> CompileResult<&mut Symbol> {
        let name = name.into();
        let id = self.current_scope();
        let scope = &mut self.scopes[id.0];
        if let Some(existing) = scope.lookup(&name) {
            let previous = if existing.line > 0 {
                existing.line.to_string()
            } else {
                "unknown".to_owned()
            };
            return Err(CompilerError::semantic(
                format!(
                    "Symbol '{}' already declared in scope '{}' (previous declaration at line {})",
                    name, scope.name, previous
                ),
                loc.line,
                loc.column,
                name,
            ));
        }
        trace!("Declared {} `{}` in scope `{}`", kind, name, scope.name);
        let index = scope.symbols.len();
        scope.index.insert(name.clone(), index);
        scope.symbols.push(Symbol {
            name,
            kind,
            direction,
            scope: scope.name.clone(),
            line: loc.line,
            attributes: BTreeMap::new(),
        });
        Ok(&mut scope.symbols[index])
    }

    /// Find the scope which declares `name`, starting at the current scope
    /// and moving outwards.
    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut next = Some(self.current_scope());
        while let Some(id) = next {
            let scope = self.scope(id);
            if scope.index.contains_key(name) {
                return Some(id);
            }
            next = scope.parent;
        }
        None
    }

    /// Look up a name in the current scope and its parents.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.resolve(name).and_then(|id| self.scope(id).lookup(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let id = self.resolve(name)?;
        self.scopes[id.0].lookup_mut(name)
    }

    /// Look up a name in the current scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scope(self.current_scope()).lookup(name)
    }

    pub fn lookup_local_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let id = self.current_scope();
        self.scopes[id.0].lookup_mut(name)
    }

    /// Look up a name in the first scope called `scope_name`.
    pub fn lookup_in_scope(&self, name: &str, scope_name: &str) -> Option<&Symbol> {
        self.find_scope(scope_name)
            .and_then(|id| self.scope(id).lookup(name))
    }

    /// Find a scope by name, searching depth-first from the global scope.
    pub fn find_scope(&self, name: &str) -> Option<ScopeId> {
        let mut todo = vec![self.global_scope()];
        while let Some(id) = todo.pop() {
            let scope = self.scope(id);
            if scope.name == name {
                return Some(id);
            }
            todo.extend(scope.children.iter().rev().copied());
        }
        None
    }

    /// The symbols of the named scope, or of the current scope if no name is
    /// given. Unknown scopes yield no symbols.
    pub fn scope_symbols(&self, scope_name: Option<&str>) -> &[Symbol] {
        let id = match scope_name {
            Some(name) => match self.find_scope(name) {
                Some(id) => id,
                None => return &[],
            },
            None => self.current_scope(),
        };
        self.scope(id).symbols()
    }

    fn fmt_scope(&self, f: &mut fmt::Formatter, id: ScopeId, indent: usize) -> fmt::Result {
        let scope = self.scope(id);
        writeln!(f, "{:indent$}Scope: {}", "", scope.name, indent = indent * 2)?;
        for sym in &scope.symbols {
            write!(f, "{:indent$}- {}: {}", "", sym.name, sym.kind, indent = indent * 2 + 2)?;
            if let Some(dir) = sym.direction {
                write!(f, ":{}", dir)?;
            }
            if !sym.attributes.is_empty() {
                let attrs: Vec<_> = sym
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                write!(f, " ({})", attrs.join(", "))?;
            }
            if sym.line > 0 {
                write!(f, " @{}", sym.line)?;
            }
            writeln!(f)?;
        }
        for &child in &scope.children {
            self.fmt_scope(f, child, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_scope(f, self.global_scope(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize) -> Location {
        Location::new(line, 1)
    }

    #[test]
    fn global_scope_cannot_be_exited() {
        let mut tbl = SymbolTable::new();
        assert_eq!(tbl.current_scope_name(), "global");
        assert_eq!(tbl.exit_scope(), None);
        let m = tbl.enter_scope("m");
        assert_eq!(tbl.current_scope_name(), "m");
        assert_eq!(tbl.exit_scope(), Some(m));
        assert_eq!(tbl.exit_scope(), None);
        assert_eq!(tbl.current_scope(), tbl.global_scope());
    }

    #[test]
    fn lookup_walks_outwards() {
        let mut tbl = SymbolTable::new();
        tbl.declare("g", SymbolKind::Wire, None, loc(1)).unwrap();
        tbl.enter_scope("m");
        tbl.declare("a", SymbolKind::Reg, None, loc(2)).unwrap();
        assert_eq!(tbl.lookup("g").map(|s| s.scope.as_str()), Some("global"));
        assert!(tbl.lookup_local("g").is_none());
        assert_eq!(tbl.lookup_local("a").map(|s| s.kind), Some(SymbolKind::Reg));
        tbl.exit_scope();
        assert!(tbl.lookup("a").is_none());
        assert!(tbl.lookup_in_scope("a", "m").is_some());
        assert!(tbl.lookup_in_scope("a", "nope").is_none());
    }

    #[test]
    fn shadowing_in_nested_scope() {
        let mut tbl = SymbolTable::new();
        tbl.declare("x", SymbolKind::Wire, None, loc(1)).unwrap();
        tbl.enter_scope("m");
        tbl.declare("x", SymbolKind::Reg, None, loc(2)).unwrap();
        assert_eq!(tbl.lookup("x").map(|s| s.kind), Some(SymbolKind::Reg));
        tbl.lookup_mut("x").unwrap().direction = Some(PortDir::Input);
        assert_eq!(
            tbl.lookup_in_scope("x", "global").map(|s| s.direction),
            Some(None)
        );
    }

    #[test]
    fn duplicate_declaration() {
        let mut tbl = SymbolTable::new();
        tbl.enter_scope("m");
        tbl.declare("x", SymbolKind::Wire, None, loc(3)).unwrap();
        let err = tbl
            .declare("x", SymbolKind::Wire, None, Location::new(5, 6))
            .unwrap_err();
        assert_eq!(err.kind_name(), "SemanticError");
        assert_eq!(
            err.message(),
            "Symbol 'x' already declared in scope 'm' (previous declaration at line 3) (identifier: 'x')"
        );
        assert_eq!((err.line(), err.column()), (5, 6));
        assert_eq!(tbl.scope_symbols(None).len(), 1);
    }

    #[test]
    fn find_scope_is_depth_first() {
        let mut tbl = SymbolTable::new();
        let a = tbl.enter_scope("a");
        let inner = tbl.enter_scope("inner");
        tbl.exit_scope();
        tbl.exit_scope();
        tbl.enter_scope("inner");
        assert_eq!(tbl.find_scope("a"), Some(a));
        assert_eq!(tbl.find_scope("inner"), Some(inner));
        assert_eq!(tbl.scope(a).children(), &[inner]);
        assert_eq!(tbl.scope(inner).parent(), Some(a));
        assert!(tbl.scope_symbols(Some("missing")).is_empty());
    }

    #[test]
    fn display() {
        let mut tbl = SymbolTable::new();
        tbl.enter_scope("m");
        tbl.declare("clk", SymbolKind::Port, Some(PortDir::Input), loc(1))
            .unwrap();
        tbl.declare("q", SymbolKind::Port, Some(PortDir::Output), loc(1))
            .unwrap()
            .attributes
            .insert("net_type".to_owned(), "reg".to_owned());
        tbl.declare("n", SymbolKind::Wire, None, Location::default())
            .unwrap();
        assert_eq!(
            tbl.to_string(),
            "Scope: global\n  Scope: m\n    - clk: port:input @1\n    - q: port:output (net_type=reg) @1\n    - n: wire\n"
        );
    }
}
