//! Module nodes: a name, port declaration text, and a statement body.

use crate::stmt::Stmt;

/// A generated Verilog module.
#[derive(Debug)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Ordered port declarations, already formatted (e.g. `output [31:0] out`).
    pub ports: Vec<String>,
    /// Body statements in emission order.
    pub body: Vec<Stmt>,
}

impl Module {
    /// Creates an empty module with the given name and port list.
    pub fn new(name: impl Into<String>, ports: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ports,
            body: Vec::new(),
        }
    }

    /// Appends a statement to the body.
    pub fn push(&mut self, stmt: Stmt) {
        self.body.push(stmt);
    }

    /// Renders the complete module text, header through `endmodule`.
    pub fn emit(&self) -> String {
        let header = if self.ports.is_empty() {
            format!("module {};\n", self.name)
        } else {
            format!("module {}({});\n", self.name, self.ports.join(", "))
        };
        let mut out = header;
        for stmt in &self.body {
            out.push_str(&stmt.emit(1));
        }
        out.push_str("endmodule\n");
        out
    }
}
