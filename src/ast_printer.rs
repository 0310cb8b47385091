use crate::ast::{Expr, LiteralValue};
use crate::stack::ensure_sufficient_stack;

/// Renders an expression in parenthesised prefix form, e.g.
/// `(* (- 123.0) (group 45.67))`.  Used by the `parse` command and tests.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut out = String::new();
        Self::write_expr(&mut out, expr);
        out
    }

    fn write_expr(out: &mut String, expr: &Expr) {
        ensure_sufficient_stack(|| Self::write_node(out, expr))
    }

    fn write_node(out: &mut String, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => Self::write_literal(out, lit),

            Expr::Grouping(inner) => Self::parenthesize(out, "group", &[inner.as_ref()]),

            Expr::Unary { operator, right } => {
                Self::parenthesize(out, &operator.lexeme, &[right.as_ref()])
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => Self::parenthesize(out, &operator.lexeme, &[left.as_ref(), right.as_ref()]),

            Expr::Variable { name, .. } => out.push_str(&name.lexeme),

            Expr::Assign { name, value, .. } => {
                let head = format!("= {}", name.lexeme);
                Self::parenthesize(out, &head, &[value.as_ref()])
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let parts: Vec<&Expr> = std::iter::once(callee.as_ref())
                    .chain(arguments.iter())
                    .collect();
                Self::parenthesize(out, "call", &parts)
            }
        }
    }

    fn write_literal(out: &mut String, lit: &LiteralValue) {
        match lit {
            LiteralValue::True => out.push_str("true"),
            LiteralValue::False => out.push_str("false"),
            LiteralValue::Nil => out.push_str("nil"),
            LiteralValue::Str(s) => out.push_str(s),
            // Keep a decimal point on integral numbers: 3 → 3.0
            LiteralValue::Number(n) if n.fract() == 0.0 => out.push_str(&format!("{:.1}", n)),
            LiteralValue::Number(n) => out.push_str(&n.to_string()),
        }
    }

    fn parenthesize(out: &mut String, head: &str, parts: &[&Expr]) {
        out.push('(');
        out.push_str(head);

        for part in parts {
            out.push(' ');
            Self::write_expr(out, part);
        }

        out.push(')');
    }
}
