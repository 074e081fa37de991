//! Floating-point evaluation of closed expressions.

use crate::expr::{Expr, Rational};
use num_traits::ToPrimitive;

/// Evaluate `expr` to an `f64`. Returns `None` when a free variable remains or the result is
/// not finite.
pub fn evaluate(expr: &Expr) -> Option<f64> {
    let value = eval(expr)?;
    value.is_finite().then_some(value)
}

fn eval(expr: &Expr) -> Option<f64> {
    Some(match expr {
        Expr::Variable(_) => return None,
        Expr::Constant(r) => rational_to_f64(r)?,
        Expr::Add(a, b) => eval(a)? + eval(b)?,
        Expr::Sub(a, b) => eval(a)? - eval(b)?,
        Expr::Mul(a, b) => eval(a)? * eval(b)?,
        Expr::Div(a, b) => eval(a)? / eval(b)?,
        Expr::Pow(a, b) => match b.as_constant().and_then(|k| k.to_i32().filter(|_| k.is_integer())) {
            Some(k) => eval(a)?.powi(k),
            None => eval(a)?.powf(eval(b)?),
        },
        Expr::Neg(a) => -eval(a)?,
        Expr::Sin(a) => eval(a)?.sin(),
        Expr::Cos(a) => eval(a)?.cos(),
        Expr::Tan(a) => eval(a)?.tan(),
        Expr::Exp(a) => eval(a)?.exp(),
        Expr::Log(a) => eval(a)?.ln(),
    })
}

/// Divide in big integers first so huge numerators and denominators still land near the value.
pub(crate) fn rational_to_f64(r: &Rational) -> Option<f64> {
    r.to_f64().or_else(|| Some(r.numer().to_f64()? / r.denom().to_f64()?))
}
