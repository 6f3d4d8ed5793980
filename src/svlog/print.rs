// Copyright (c) 2016-2021 Fabian Schuiki

//! Indented dumps of the AST.

use crate::ast::*;
use crate::visit::*;

/// A visitor that renders the AST as an indented outline.
///
/// ```
/// # use verilite_svlog::{lexer::tokenize, parser::parse, print::AstPrinter};
/// let module = parse(tokenize("module m; assign a = b; endmodule")).unwrap();
/// assert_eq!(
///     AstPrinter::print(&module),
///     "Module: m\n  Body:\n    ASSIGN: a = b\n"
/// );
/// ```
#[derive(Default)]
pub struct AstPrinter {
    output: String,
    indent: usize,
}

impl AstPrinter {
    pub fn new() -> AstPrinter {
        Default::default()
    }

    /// Render a module.
    pub fn print(module: &ModuleNode) -> String {
        let mut printer = AstPrinter::new();
        printer.visit_module(module);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn nested(&mut self, stmt: &Stmt) {
        self.indent += 1;
        self.visit_stmt(stmt);
        self.indent -= 1;
    }
}

fn range_suffix(range: &Option<Range>) -> String {
    match range {
        Some(r) => format!(" {}", r),
        None => String::new(),
    }
}

impl<'a> Visitor<'a> for AstPrinter {
    fn visit_module(&mut self, module: &'a ModuleNode) {
        self.line(&format!("Module: {}", module.name));
        self.indent += 1;
        if !module.ports.is_empty() {
            self.line("Ports:");
            self.indent += 1;
            for port in &module.ports {
                self.visit_port(port);
            }
            self.indent -= 1;
        }
        if !module.items.is_empty() {
            self.line("Body:");
            self.indent += 1;
            for item in &module.items {
                self.visit_item(item);
            }
            self.indent -= 1;
        }
        self.indent -= 1;
    }

    fn visit_port(&mut self, port: &'a Port) {
        match port.direction {
            Some(dir) => self.line(&format!("- {} ({})", port.name, dir)),
            None => self.line(&format!("- {}", port.name)),
        }
    }

    fn visit_port_decl(&mut self, decl: &'a PortDecl) {
        self.line(&format!(
            "{}{}: {}",
            decl.dir.as_str().to_uppercase(),
            range_suffix(&decl.range),
            decl.names.join(", ")
        ));
    }

    fn visit_net_decl(&mut self, decl: &'a NetDecl) {
        self.line(&format!(
            "{}{}: {}",
            decl.kind.as_str().to_uppercase(),
            range_suffix(&decl.range),
            decl.names.join(", ")
        ));
    }

    fn visit_cont_assign(&mut self, assign: &'a ContAssign) {
        self.line(&format!("ASSIGN: {} = {}", assign.target, assign.source));
    }

    fn visit_always(&mut self, always: &'a AlwaysBlock) {
        let sens = if always.sensitivity.is_empty() {
            "*".to_owned()
        } else {
            always
                .sensitivity
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.line(&format!("ALWAYS @({}):", sens));
        self.nested(&always.stmt);
    }

    fn visit_initial(&mut self, initial: &'a InitialBlock) {
        self.line("INITIAL:");
        self.nested(&initial.stmt);
    }

    fn visit_module_inst(&mut self, inst: &'a ModuleInst) {
        let conns: Vec<_> = inst
            .connections
            .iter()
            .map(|c| format!(".{}({})", c.port, c.expr))
            .collect();
        self.line(&format!(
            "INSTANCE: {} {} ({})",
            inst.module_type,
            inst.instance_name,
            conns.join(", ")
        ));
    }

    fn visit_block(&mut self, block: &'a BlockStmt) {
        self.line("BEGIN");
        self.indent += 1;
        walk_block(self, block);
        self.indent -= 1;
        self.line("END");
    }

    fn visit_if(&mut self, stmt: &'a IfStmt) {
        self.line(&format!("IF ({}):", stmt.cond));
        self.nested(&stmt.then_stmt);
        if let Some(ref else_stmt) = stmt.else_stmt {
            self.line("ELSE:");
            self.nested(else_stmt);
        }
    }

    fn visit_delay(&mut self, stmt: &'a DelayStmt) {
        self.line(&format!("#{}", stmt.delay));
        self.nested(&stmt.stmt);
    }

    fn visit_forever(&mut self, stmt: &'a ForeverStmt) {
        self.line("FOREVER:");
        self.nested(&stmt.stmt);
    }

    fn visit_sys_task(&mut self, call: &'a SysTaskCall) {
        if call.args.is_empty() {
            self.line(&call.name);
        } else {
            let args: Vec<_> = call.args.iter().map(|a| a.to_string()).collect();
            self.line(&format!("{}({})", call.name, args.join(", ")));
        }
    }

    fn visit_proc_assign(&mut self, assign: &'a ProcAssign) {
        self.line(&format!("{} {} {}", assign.target, assign.op, assign.source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn print_module() {
        let module = parse(tokenize(
            "module counter(input clk, output reg [3:0] q);
                wire [3:0] n;
                assign n = q + 1;
                always @(posedge clk) begin
                    if (n) q <= n; else q <= 0;
                end
                initial #5 $finish;
            endmodule",
        ))
        .unwrap();
        assert_eq!(
            AstPrinter::print(&module),
            "Module: counter
  Ports:
    - clk (input)
    - q (output)
  Body:
    WIRE [3:0]: n
    ASSIGN: n = (q + 1)
    ALWAYS @(posedge clk):
      BEGIN
        IF (n):
          q <= n
        ELSE:
          q <= 0
      END
    INITIAL:
      #5
        $finish
"
        );
    }
}
