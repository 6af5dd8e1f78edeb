//! Statement nodes and their Verilog emission.
//!
//! Statements only emit; the oracle works on expressions. Constructs the
//! oracle has no business evaluating (declarations, generate scaffolding,
//! defparam) go through [`Stmt::Custom`], whose closure is invoked solely
//! during emission.

use std::fmt;

use crate::expr::Expr;

/// Escape-hatch statement body: a closure from indent depth to source text.
///
/// The rendered text must not include a trailing newline; emission appends
/// one. Multi-line custom statements manage their own internal newlines.
pub struct CustomText(Box<dyn Fn(usize) -> String>);

impl CustomText {
    /// Wraps a rendering closure.
    pub fn new(render: impl Fn(usize) -> String + 'static) -> Self {
        Self(Box::new(render))
    }

    /// Renders the statement at the given indent depth.
    pub fn render(&self, indent: usize) -> String {
        (self.0)(indent)
    }
}

impl fmt::Debug for CustomText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomText(..)")
    }
}

/// Returns the indent prefix for a depth (two spaces per level).
pub fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

/// A statement in a generated module body.
#[derive(Debug)]
pub enum Stmt {
    /// `assign <lhs> = <rhs>;`
    Assign {
        /// Target net, possibly an indexed slot like `t0[i - 2]`.
        lhs: String,
        /// Driven expression.
        rhs: Expr,
    },
    /// A module instantiation with ordered parameter overrides and named
    /// port connections.
    Instance {
        /// Instantiated module name.
        module: String,
        /// Instance name.
        instance: String,
        /// Parameter override text, e.g. `.VALUE(CONSTS0[31:0])`.
        params: Vec<String>,
        /// `(port, net)` connections.
        ports: Vec<(String, String)>,
    },
    /// A `for`-generate loop.
    ForGen {
        /// Induction variable (a genvar declared separately).
        var: String,
        /// Generate block label.
        label: String,
        /// Initial induction value.
        init: i64,
        /// Termination condition text, e.g. `v0 < 4`.
        cond: String,
        /// Update clause text, e.g. `v0 = v0 + 1`.
        update: String,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// An `if`-generate block.
    IfGen {
        /// Condition expression.
        cond: Expr,
        /// Taken branch.
        then_body: Vec<Stmt>,
        /// Optional else branch.
        else_body: Option<Vec<Stmt>>,
    },
    /// A `case`-generate block.
    CaseGen {
        /// Selector text (typically an induction variable).
        selector: String,
        /// `(label, body)` arms in emission order.
        arms: Vec<(Expr, Vec<Stmt>)>,
        /// Optional default arm.
        default: Option<Vec<Stmt>>,
    },
    /// Arbitrary source text the oracle never inspects.
    Custom(CustomText),
}

impl Stmt {
    /// Shorthand for a custom statement over a rendering closure.
    pub fn custom(render: impl Fn(usize) -> String + 'static) -> Self {
        Stmt::Custom(CustomText::new(render))
    }

    /// A custom statement that emits a fixed line at the given indent.
    pub fn line(text: impl Into<String>) -> Self {
        let text = text.into();
        Stmt::custom(move |indent| format!("{}{}", pad(indent), text))
    }

    /// Renders the statement (and any nested bodies) at `indent`, trailing
    /// newline included.
    pub fn emit(&self, indent: usize) -> String {
        let p = pad(indent);
        match self {
            Stmt::Assign { lhs, rhs } => {
                format!("{p}assign {lhs} = {};\n", rhs.emit())
            }
            Stmt::Instance {
                module,
                instance,
                params,
                ports,
            } => {
                let param_text = if params.is_empty() {
                    String::new()
                } else {
                    format!(" #({})", params.join(", "))
                };
                let port_text = ports
                    .iter()
                    .map(|(port, net)| format!(".{port}({net})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{p}{module}{param_text} {instance}({port_text});\n")
            }
            Stmt::ForGen {
                var,
                label,
                init,
                cond,
                update,
                body,
            } => {
                let mut out = format!("{p}for ({var} = {init}; {cond}; {update}) begin : {label}\n");
                for stmt in body {
                    out.push_str(&stmt.emit(indent + 1));
                }
                out.push_str(&format!("{p}end\n"));
                out
            }
            Stmt::IfGen {
                cond,
                then_body,
                else_body,
            } => {
                let mut out = format!("{p}if ({}) begin\n", cond.emit());
                for stmt in then_body {
                    out.push_str(&stmt.emit(indent + 1));
                }
                out.push_str(&format!("{p}end\n"));
                if let Some(else_body) = else_body {
                    out.push_str(&format!("{p}else begin\n"));
                    for stmt in else_body {
                        out.push_str(&stmt.emit(indent + 1));
                    }
                    out.push_str(&format!("{p}end\n"));
                }
                out
            }
            Stmt::CaseGen {
                selector,
                arms,
                default,
            } => {
                let inner = pad(indent + 1);
                let mut out = format!("{p}case ({selector})\n");
                for (label, body) in arms {
                    out.push_str(&format!("{inner}{}: begin\n", label.emit()));
                    for stmt in body {
                        out.push_str(&stmt.emit(indent + 2));
                    }
                    out.push_str(&format!("{inner}end\n"));
                }
                if let Some(body) = default {
                    out.push_str(&format!("{inner}default: begin\n"));
                    for stmt in body {
                        out.push_str(&stmt.emit(indent + 2));
                    }
                    out.push_str(&format!("{inner}end\n"));
                }
                out.push_str(&format!("{p}endcase\n"));
                out
            }
            Stmt::Custom(custom) => format!("{}\n", custom.render(indent)),
        }
    }
}
