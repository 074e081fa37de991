//! Rational-function normal form: one numerator over one denominator.

use super::rules::{simplify_add, simplify_fully, simplify_mul, simplify_neg, simplify_pow, simplify_sub};
use crate::expr::{Expr, one};
use num_traits::ToPrimitive;

/// Rewrite `expr` as `(numerator, denominator)`, both expanded and free of quotients.
/// Functions and non-integer powers are kept as opaque factors.
pub fn together(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Add(a, b) => combine(a, b, simplify_add),
        Expr::Sub(a, b) => combine(a, b, simplify_sub),
        Expr::Mul(a, b) => {
            let (na, da) = together(a);
            let (nb, db) = together(b);
            (simplify_mul(na, nb), simplify_mul(da, db))
        }
        Expr::Div(a, b) => {
            let (na, da) = together(a);
            let (nb, db) = together(b);
            (simplify_mul(na, db), simplify_mul(da, nb))
        }
        Expr::Neg(a) => {
            let (n, d) = together(a);
            (simplify_neg(n), d)
        }
        Expr::Pow(base, exp) => match integer_exponent(exp) {
            Some(k) => {
                let (n, d) = together(base);
                let power = Expr::integer(k.unsigned_abs());
                if k < 0 {
                    (simplify_pow(d, power.clone()), simplify_pow(n, power))
                } else {
                    (simplify_pow(n, power.clone()), simplify_pow(d, power))
                }
            }
            None => (expr.clone(), one()),
        },
        other => (other.clone(), one()),
    }
}

/// True when `expr` vanishes identically once every quotient is cleared.
pub fn is_identically_zero(expr: &Expr) -> bool {
    if expr.is_zero() {
        return true;
    }
    let (numerator, denominator) = together(expr);
    simplify_fully(numerator).is_zero() && !simplify_fully(denominator).is_zero()
}

fn combine(a: &Expr, b: &Expr, join: fn(Expr, Expr) -> Expr) -> (Expr, Expr) {
    let (na, da) = together(a);
    let (nb, db) = together(b);
    if da == db {
        return (join(na, nb), da);
    }
    (
        join(simplify_mul(na, db.clone()), simplify_mul(nb, da.clone())),
        simplify_mul(da, db),
    )
}

fn integer_exponent(exp: &Expr) -> Option<i64> {
    exp.as_constant()
        .filter(|k| k.is_integer())
        .and_then(|k| k.to_integer().to_i64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn zero_after_clearing(input: &str) -> bool {
        is_identically_zero(&simplify_fully(parse_expr(input).expect("parse input")))
    }

    #[test]
    fn shared_denominators_cancel() {
        assert!(zero_after_clearing("x/(x + 1) + 1/(x + 1) - 1"));
        assert!(zero_after_clearing("1/(x + 1)*(x + 1) - 1"));
    }

    #[test]
    fn different_denominators_cross_multiply() {
        assert!(zero_after_clearing("1/(x - 1) - 1/(x + 1) - 2/(x^2 - 1)"));
        assert!(!zero_after_clearing("1/(x - 1) - 1/(x + 1)"));
    }

    #[test]
    fn together_splits_numerator_and_denominator() {
        let (n, d) = together(&parse_expr("a/b + c/d").expect("parse input"));
        assert_eq!(simplify_fully(n), simplify_fully(parse_expr("a*d + b*c").expect("parse")));
        assert_eq!(simplify_fully(d), simplify_fully(parse_expr("b*d").expect("parse")));
    }

    #[test]
    fn zero_over_zero_is_not_zero() {
        assert!(!zero_after_clearing("0/0"));
    }
}
