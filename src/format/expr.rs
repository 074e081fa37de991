use crate::eval::rational_to_f64;
use crate::expr::Expr;
use num_rational::BigRational;
use num_traits::{One, Signed};

fn collect_mul_factors(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            collect_mul_factors(a, out);
            collect_mul_factors(b, out);
        }
        other => out.push(other.clone()),
    }
}

fn rebuild_mul_factors(factors: Vec<Expr>) -> Expr {
    let mut iter = factors.into_iter();
    let Some(first) = iter.next() else {
        return Expr::Constant(BigRational::one());
    };
    iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed()))
}

/// Split product factors into numerator and denominator, moving negative constant powers down.
pub(crate) fn split_fraction(factors: Vec<Expr>) -> (Vec<Expr>, Vec<Expr>) {
    let mut num = Vec::new();
    let mut den = Vec::new();
    for factor in factors {
        match factor {
            Expr::Pow(base, exp) => match *exp {
                Expr::Constant(k) if k.is_negative() => {
                    let k = -k;
                    if k.is_one() {
                        den.push(*base);
                    } else {
                        den.push(Expr::Pow(base, Expr::Constant(k).boxed()));
                    }
                }
                exp => num.push(Expr::Pow(base, exp.boxed())),
            },
            other => num.push(other),
        }
    }
    (num, den)
}

/// How rational constants are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Numerals {
    Exact,
    /// Decimal approximations, for values that could only be evaluated partially.
    Decimal,
}

pub fn pretty(expr: &Expr) -> String {
    render(expr, Numerals::Exact)
}

/// Like [`pretty`], with every rational constant written as a decimal.
pub fn pretty_decimal(expr: &Expr) -> String {
    render(expr, Numerals::Decimal)
}

fn render(expr: &Expr, style: Numerals) -> String {
    fn product(style: Numerals, ctx: u8, factors: Vec<Expr>) -> String {
        let mut neg = false;
        let mut cleaned = Vec::with_capacity(factors.len());
        for factor in factors {
            let (is_neg, inner) = split_neg(&factor);
            neg ^= is_neg;
            cleaned.push(inner);
        }
        let (num, den) = split_fraction(cleaned);
        let num_parts: Vec<String> = num.iter().map(|f| pp(style, 2, f)).collect();
        let num_body = if num_parts.is_empty() {
            "1".to_string()
        } else {
            num_parts.join("*")
        };
        let body = match den.len() {
            0 => num_body,
            1 => format!("{num_body} / {}", pp(style, 3, &den[0])),
            _ => {
                let den_parts: Vec<String> = den.iter().map(|f| pp(style, 2, f)).collect();
                format!("{num_body} / ({})", den_parts.join("*"))
            }
        };
        if neg {
            bracket(ctx, 2, format!("-({body})"))
        } else {
            bracket(ctx, 2, body)
        }
    }

    fn pp(style: Numerals, ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Constant(r) => show_rational(style, ctx, r),

            Expr::Add(a, b) => {
                let s_a = pp(style, 1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(style, 2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "-" } else { "+" });
                bracket(ctx, 1, body)
            }

            Expr::Sub(a, b) => {
                let s_a = pp(style, 1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(style, 2, &b_inner);
                let body = format!("{s_a} {} {s_b}", if neg_b { "+" } else { "-" });
                bracket(ctx, 1, body)
            }

            Expr::Mul(_, _) => {
                let mut factors = Vec::new();
                collect_mul_factors(expr, &mut factors);
                product(style, ctx, factors)
            }

            Expr::Pow(_, e) if matches!(e.as_ref(), Expr::Constant(k) if k.is_negative()) => {
                product(style, ctx, vec![expr.clone()])
            }

            Expr::Div(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = format!("{} / {}", pp(style, 2, &a_inner), pp(style, 3, &b_inner));
                if na ^ nb {
                    bracket(ctx, 2, format!("-({body})"))
                } else {
                    bracket(ctx, 2, body)
                }
            }

            Expr::Pow(a, b) => bracket(ctx, 3, format!("{}^{}", pp(style, 4, a), pp(style, 4, b))),

            Expr::Neg(a) => {
                let (is_neg, inner) = split_neg(a);
                if is_neg {
                    pp(style, ctx, &inner)
                } else {
                    bracket(ctx, 2, format!("-{}", pp(style, 3, &inner)))
                }
            }

            Expr::Sin(a) => format!("sin({})", pp(style, 0, a)),
            Expr::Cos(a) => format!("cos({})", pp(style, 0, a)),
            Expr::Tan(a) => format!("tan({})", pp(style, 0, a)),
            Expr::Exp(a) => format!("exp({})", pp(style, 0, a)),
            Expr::Log(a) => format!("log({})", pp(style, 0, a)),
        }
    }

    pp(style, 0, expr)
}

pub(crate) fn split_neg(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Neg(inner) => {
            let (is_neg, inner) = split_neg(inner);
            (!is_neg, inner)
        }
        Expr::Constant(r) if r.is_negative() => (true, Expr::Constant(-r)),
        Expr::Mul(_, _) => {
            let mut factors = Vec::new();
            collect_mul_factors(expr, &mut factors);
            let mut neg = false;
            let mut cleaned = Vec::with_capacity(factors.len());
            for factor in factors {
                let (is_neg, inner) = split_neg(&factor);
                neg ^= is_neg;
                cleaned.push(inner);
            }
            if neg {
                (true, rebuild_mul_factors(cleaned))
            } else {
                (false, expr.clone())
            }
        }
        other => (false, other.clone()),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn show_rational(style: Numerals, ctx: u8, r: &BigRational) -> String {
    if style == Numerals::Decimal && !r.is_integer() {
        if let Some(value) = rational_to_f64(r) {
            let body = value.to_string();
            return if r.is_negative() { bracket(ctx, 2, body) } else { body };
        }
    }
    if r.is_integer() {
        if r.is_negative() {
            bracket(ctx, 2, r.numer().to_string())
        } else {
            r.numer().to_string()
        }
    } else {
        bracket(ctx, 2, format!("{}/{}", r.numer(), r.denom()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use crate::simplify::simplify_fully;

    fn simp(input: &str) -> String {
        pretty(&simplify_fully(parse_expr(input).unwrap()))
    }

    #[test]
    fn rationals_print_as_fractions() {
        assert_eq!(simp("8/10"), "4/5");
        assert_eq!(simp("-7/5"), "-7/5");
    }

    #[test]
    fn sums_show_subtraction() {
        assert_eq!(simp("a*d - b*c"), "a*d - b*c");
    }

    #[test]
    fn negative_powers_print_as_quotients() {
        assert_eq!(simp("a*b/c"), "a*b / c");
        assert_eq!(simp("a/(b*c)"), "a / (b*c)");
    }

    #[test]
    fn decimal_style_writes_fractions_as_decimals() {
        let expr = simplify_fully(parse_expr("1/(4*a) + 3/2").unwrap());
        assert_eq!(pretty_decimal(&expr), "0.25 / a + 1.5");
        assert_eq!(pretty(&expr), "1/4 / a + 3/2");
    }

    #[test]
    fn fraction_bases_are_bracketed() {
        assert_eq!(simp("(1/2)^x"), "(1/2)^x");
    }
}
