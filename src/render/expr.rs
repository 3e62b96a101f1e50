// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame arithmetic expressions.
//!
//! Filter expressions are built as a small tree and only turned into the
//! encoder's textual syntax at the very end. Every binary operation is
//! parenthesized when written out, so the text never depends on operator
//! precedence. [`Expr::eval`] mirrors what the encoder computes, which
//! lets the generated expressions be checked without running it.

/// Values of the variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalContext {
    /// Output frame number (`n`).
    pub frame: f64,
    /// Input width (`iw`).
    pub input_width: f64,
    /// Input height (`ih`).
    pub input_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A coefficient, written with the configured precision.
    Num(f64),
    /// An exact integer such as a frame number or target dimension.
    Int(i64),
    FrameNumber,
    InputWidth,
    InputHeight,
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// `if(lt(lhs, rhs), then, otherwise)`
    IfLess {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    pub fn num(value: f64) -> Expr {
        Expr::Num(value)
    }

    pub fn int(value: i64) -> Expr {
        Expr::Int(value)
    }

    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::Binary(BinOp::Add, Box::new(a), Box::new(b))
    }

    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::Binary(BinOp::Sub, Box::new(a), Box::new(b))
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::Binary(BinOp::Mul, Box::new(a), Box::new(b))
    }

    pub fn div(a: Expr, b: Expr) -> Expr {
        Expr::Binary(BinOp::Div, Box::new(a), Box::new(b))
    }

    /// Cascading branch: `then` when `lhs < rhs`, else `otherwise`.
    pub fn if_less(lhs: Expr, rhs: Expr, then: Expr, otherwise: Expr) -> Expr {
        Expr::IfLess {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Evaluate with exact coefficients.
    pub fn eval(&self, ctx: &EvalContext) -> f64 {
        self.eval_with(ctx, None)
    }

    /// Evaluate with coefficients rounded to `precision` decimals, as the
    /// encoder would see them after [`Expr::render`].
    pub fn eval_rounded(&self, ctx: &EvalContext, precision: usize) -> f64 {
        self.eval_with(ctx, Some(precision))
    }

    fn eval_with(&self, ctx: &EvalContext, precision: Option<usize>) -> f64 {
        match self {
            Expr::Num(v) => match precision {
                Some(p) => round_to(*v, p),
                None => *v,
            },
            Expr::Int(v) => *v as f64,
            Expr::FrameNumber => ctx.frame,
            Expr::InputWidth => ctx.input_width,
            Expr::InputHeight => ctx.input_height,
            Expr::Binary(op, a, b) => op.apply(a.eval_with(ctx, precision), b.eval_with(ctx, precision)),
            Expr::IfLess {
                lhs,
                rhs,
                then,
                otherwise,
            } => {
                if lhs.eval_with(ctx, precision) < rhs.eval_with(ctx, precision) {
                    then.eval_with(ctx, precision)
                } else {
                    otherwise.eval_with(ctx, precision)
                }
            }
        }
    }

    /// Write the expression in the encoder's syntax.
    pub fn render(&self, precision: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, precision);
        out
    }

    fn write(&self, out: &mut String, precision: usize) {
        match self {
            Expr::Num(v) => out.push_str(&format_num(*v, precision)),
            Expr::Int(v) => out.push_str(&v.to_string()),
            Expr::FrameNumber => out.push('n'),
            Expr::InputWidth => out.push_str("iw"),
            Expr::InputHeight => out.push_str("ih"),
            Expr::Binary(op, a, b) => {
                out.push('(');
                a.write(out, precision);
                out.push(op.symbol());
                b.write(out, precision);
                out.push(')');
            }
            Expr::IfLess {
                lhs,
                rhs,
                then,
                otherwise,
            } => {
                out.push_str("if(lt(");
                lhs.write(out, precision);
                out.push(',');
                rhs.write(out, precision);
                out.push_str("),");
                then.write(out, precision);
                out.push(',');
                otherwise.write(out, precision);
                out.push(')');
            }
        }
    }
}

fn round_to(value: f64, precision: usize) -> f64 {
    format_num(value, precision).parse().unwrap_or(value)
}

/// Fixed-precision literal; negative zero is written as zero.
fn format_num(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

#[cfg(test)]
impl Expr {
    /// Whether the expression references no variables.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Num(_) | Expr::Int(_) => true,
            Expr::FrameNumber | Expr::InputWidth | Expr::InputHeight => false,
            Expr::Binary(_, a, b) => a.is_constant() && b.is_constant(),
            Expr::IfLess {
                lhs,
                rhs,
                then,
                otherwise,
            } => lhs.is_constant() && rhs.is_constant() && then.is_constant() && otherwise.is_constant(),
        }
    }

    /// Nesting depth of conditionals.
    pub fn branch_depth(&self) -> usize {
        match self {
            Expr::Binary(_, a, b) => a.branch_depth().max(b.branch_depth()),
            Expr::IfLess { then, otherwise, .. } => 1 + then.branch_depth().max(otherwise.branch_depth()),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(frame: f64) -> EvalContext {
        EvalContext {
            frame,
            input_width: 640.0,
            input_height: 480.0,
        }
    }

    #[test]
    fn test_render_parenthesizes_binary_ops() {
        let e = Expr::mul(Expr::add(Expr::num(1.5), Expr::FrameNumber), Expr::InputWidth);
        assert_eq!(e.render(2), "((1.50+n)*iw)");
    }

    #[test]
    fn test_render_conditional() {
        let e = Expr::if_less(Expr::FrameNumber, Expr::int(10), Expr::num(3.14159), Expr::num(-2.0));
        assert_eq!(e.render(2), "if(lt(n,10),3.14,-2.00)");
        assert_eq!(e.render(4), "if(lt(n,10),3.1416,-2.0000)");
    }

    #[test]
    fn test_negative_zero_is_written_as_zero() {
        assert_eq!(Expr::num(-0.001).render(2), "0.00");
        assert_eq!(Expr::num(-0.0).render(0), "0");
    }

    #[test]
    fn test_eval_conditional_uses_strict_less() {
        let e = Expr::if_less(Expr::FrameNumber, Expr::int(10), Expr::int(1), Expr::int(2));
        assert_eq!(e.eval(&ctx(9.0)), 1.0);
        assert_eq!(e.eval(&ctx(10.0)), 2.0);
        assert_eq!(e.branch_depth(), 1);
    }

    #[test]
    fn test_eval_rounded_matches_rendered_literals() {
        let e = Expr::mul(Expr::num(0.126), Expr::InputWidth);
        assert!((e.eval(&ctx(0.0)) - 80.64).abs() < 1e-9);
        assert!((e.eval_rounded(&ctx(0.0), 2) - 83.2).abs() < 1e-9);
    }

    #[test]
    fn test_is_constant() {
        assert!(Expr::add(Expr::num(1.0), Expr::int(2)).is_constant());
        assert!(!Expr::div(Expr::int(200), Expr::FrameNumber).is_constant());
    }
}
