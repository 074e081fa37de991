//! LaTeX rendering of expressions and matrices.

use crate::eval::rational_to_f64;
use crate::expr::{Expr, Rational};
use crate::format::expr::{Numerals, split_fraction, split_neg};
use crate::matrix::Matrix;
use num_traits::{One, Signed};

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "theta", "kappa", "lambda", "mu", "nu", "xi",
    "pi", "rho", "sigma", "tau", "phi", "chi", "psi", "omega",
];

/// Magnitudes outside this range are written as `m \times 10^{k}`.
const PLAIN_FLOAT_RANGE: std::ops::Range<f64> = 1e-15..1e15;

/// Render `expr` as LaTeX math markup.
pub fn latex(expr: &Expr) -> String {
    tex(Numerals::Exact, 0, expr)
}

/// Like [`latex`], with every rational constant written as a decimal.
pub fn latex_decimal(expr: &Expr) -> String {
    tex(Numerals::Decimal, 0, expr)
}

/// Render a float the way it is shown in derivations.
pub fn latex_float(value: f64) -> String {
    if value.is_nan() {
        return r"\mathrm{NaN}".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { r"\infty" } else { r"-\infty" }.to_string();
    }
    if value != 0.0 && !PLAIN_FLOAT_RANGE.contains(&value.abs()) {
        let formatted = format!("{value:e}");
        if let Some((mantissa, exponent)) = formatted.split_once('e') {
            return format!(r"{mantissa} \times 10^{{{exponent}}}");
        }
    }
    format!("{value}")
}

pub fn matrix_latex(matrix: &Matrix) -> String {
    let rows: Vec<String> = (0..matrix.rows())
        .map(|r| {
            matrix
                .row(r)
                .iter()
                .map(latex)
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .collect();
    format!(r"\begin{{pmatrix}}{}\end{{pmatrix}}", rows.join(r" \\ "))
}

fn tex(style: Numerals, ctx: u8, expr: &Expr) -> String {
    match expr {
        Expr::Variable(v) => variable(v),
        Expr::Constant(r) => rational(style, ctx, r),

        Expr::Add(a, b) | Expr::Sub(a, b) => {
            let subtract = matches!(expr, Expr::Sub(..));
            let s_a = tex(style, 1, a);
            let (neg_b, b_inner) = split_neg(b);
            let sign = if neg_b ^ subtract { "-" } else { "+" };
            paren(ctx, 1, format!("{s_a} {sign} {}", tex(style, 2, &b_inner)))
        }

        Expr::Mul(..) => product(style, ctx, expr),
        Expr::Pow(_, e) if matches!(e.as_ref(), Expr::Constant(k) if k.is_negative()) => {
            product(style, ctx, expr)
        }

        Expr::Div(a, b) => {
            let (na, a_inner) = split_neg(a);
            let (nb, b_inner) = split_neg(b);
            let body = format!(
                r"\frac{{{}}}{{{}}}",
                tex(style, 0, &a_inner),
                tex(style, 0, &b_inner)
            );
            signed(ctx, na ^ nb, body)
        }

        Expr::Pow(base, exp) => power(style, ctx, base, exp),

        Expr::Neg(a) => {
            let (is_neg, inner) = split_neg(a);
            if is_neg {
                tex(style, ctx, &inner)
            } else {
                paren(ctx, 2, format!("-{}", tex(style, 3, &inner)))
            }
        }

        Expr::Sin(a) => function(style, r"\sin", a),
        Expr::Cos(a) => function(style, r"\cos", a),
        Expr::Tan(a) => function(style, r"\tan", a),
        Expr::Log(a) => function(style, r"\log", a),
        Expr::Exp(a) => format!("e^{{{}}}", tex(style, 0, a)),
    }
}

/// A product as one `\frac`: the rational coefficient, negative powers and quotient factors
/// all contribute to a single numerator and denominator.
fn product(style: Numerals, ctx: u8, expr: &Expr) -> String {
    let (mut neg, inner) = split_neg(expr);
    let mut factors = Vec::new();
    flatten(&inner, &mut factors);

    let mut coeff = Rational::one();
    let mut rest = Vec::with_capacity(factors.len());
    let mut below = Vec::new();
    for factor in factors {
        match factor {
            Expr::Constant(c) => coeff *= c,
            Expr::Div(n, d) => {
                let (neg_n, n) = split_neg(&n);
                let (neg_d, d) = split_neg(&d);
                neg ^= neg_n ^ neg_d;
                let mut upper = Vec::new();
                flatten(&n, &mut upper);
                for f in upper {
                    match f {
                        Expr::Constant(c) => coeff *= c,
                        other => rest.push(other),
                    }
                }
                below.push(d);
            }
            other => rest.push(other),
        }
    }
    if coeff.is_negative() {
        neg = !neg;
        coeff = -coeff;
    }

    let (num, mut den) = split_fraction(rest);
    den.extend(below);

    let mut num_lead = Vec::new();
    let mut den_lead = Vec::new();
    match style {
        Numerals::Exact => {
            if !coeff.numer().is_one() || num.is_empty() {
                num_lead.push(coeff.numer().to_string());
            }
            if !coeff.denom().is_one() {
                den_lead.push(coeff.denom().to_string());
            }
        }
        Numerals::Decimal => {
            if !coeff.is_one() || num.is_empty() {
                num_lead.push(rational(style, 0, &coeff));
            }
        }
    }

    let fraction = !den_lead.is_empty() || !den.is_empty();
    let numerator = join_factors(&render_factors(style, num_lead, &num, fraction));
    let body = if fraction {
        let denominator = join_factors(&render_factors(style, den_lead, &den, true));
        format!(r"\frac{{{numerator}}}{{{denominator}}}")
    } else {
        numerator
    };
    signed(ctx, neg, body)
}

/// A lone factor inside `\frac{}{}` needs no brackets; juxtaposed factors do.
fn render_factors(
    style: Numerals,
    mut parts: Vec<String>,
    factors: &[Expr],
    in_frac: bool,
) -> Vec<String> {
    let ctx = if in_frac && parts.len() + factors.len() == 1 { 0 } else { 3 };
    parts.extend(factors.iter().map(|f| tex(style, ctx, f)));
    parts
}

fn flatten(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            flatten(a, out);
            flatten(b, out);
        }
        other => out.push(other.clone()),
    }
}

/// Juxtapose factors, inserting `\cdot` where two numerals would run together.
fn join_factors(parts: &[String]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let starts_numeric = part.starts_with(|c: char| c.is_ascii_digit());
            out.push_str(if starts_numeric { r" \cdot " } else { " " });
        }
        out.push_str(part);
    }
    out
}

fn power(style: Numerals, ctx: u8, base: &Expr, exp: &Expr) -> String {
    if let Expr::Constant(k) = exp {
        if k == &Rational::new(1.into(), 2.into()) {
            return format!(r"\sqrt{{{}}}", tex(style, 0, base));
        }
        if k.is_integer() && k.is_positive() {
            let name = match base {
                Expr::Sin(_) => Some(r"\sin"),
                Expr::Cos(_) => Some(r"\cos"),
                Expr::Tan(_) => Some(r"\tan"),
                _ => None,
            };
            if let (Some(name), Expr::Sin(arg) | Expr::Cos(arg) | Expr::Tan(arg)) = (name, base) {
                return format!(r"{name}^{{{}}}\left({}\right)", k.numer(), tex(style, 0, arg));
            }
        }
        // exponents stay exact
        return paren(ctx, 3, format!("{}^{{{}}}", tex(style, 4, base), latex(exp)));
    }
    paren(ctx, 3, format!("{}^{{{}}}", tex(style, 4, base), tex(style, 0, exp)))
}

fn function(style: Numerals, name: &str, arg: &Expr) -> String {
    format!(r"{name}\left({}\right)", tex(style, 0, arg))
}

fn variable(name: &str) -> String {
    let (stem, subscript) = match name.split_once('_') {
        Some((stem, sub)) if !sub.is_empty() => (stem, Some(sub)),
        _ => (name, None),
    };
    let stem = if GREEK.contains(&stem) {
        format!(r"\{stem}")
    } else {
        stem.to_string()
    };
    match subscript {
        Some(sub) => format!("{stem}_{{{sub}}}"),
        None => stem,
    }
}

fn rational(style: Numerals, ctx: u8, r: &Rational) -> String {
    let neg = r.is_negative();
    let abs = r.abs();
    let decimal = match style {
        Numerals::Decimal if !abs.is_integer() => rational_to_f64(&abs).map(latex_float),
        _ => None,
    };
    let body = match decimal {
        Some(body) => body,
        None if abs.is_integer() => abs.numer().to_string(),
        None => format!(r"\frac{{{}}}{{{}}}", abs.numer(), abs.denom()),
    };
    signed(ctx, neg, body)
}

fn signed(ctx: u8, neg: bool, body: String) -> String {
    if neg {
        paren(ctx, 2, format!("-{body}"))
    } else {
        body
    }
}

fn paren(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!(r"\left({body}\right)")
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_expr, parse_matrix};
    use crate::simplify::simplify_fully;

    fn tex_of(input: &str) -> String {
        latex(&simplify_fully(parse_expr(input).unwrap()))
    }

    #[test]
    fn fractions_use_frac() {
        assert_eq!(tex_of("4/5"), r"\frac{4}{5}");
        assert_eq!(tex_of("-7/5"), r"-\frac{7}{5}");
    }

    #[test]
    fn rational_coefficients_join_the_fraction() {
        assert_eq!(tex_of("a/2"), r"\frac{a}{2}");
        assert_eq!(tex_of("3*a/(2*b)"), r"\frac{3 a}{2 b}");
    }

    #[test]
    fn differences_of_products() {
        assert_eq!(tex_of("a*d - b*c"), "a d - b c");
    }

    #[test]
    fn negative_coefficients_lead_the_product() {
        assert_eq!(tex_of("-2*a"), "-2 a");
        assert_eq!(tex_of("x - 2*a"), "-2 a + x");
    }

    #[test]
    fn numerals_are_separated_by_cdot() {
        assert_eq!(join_factors(&["2".to_string(), "3".to_string()]), r"2 \cdot 3");
    }

    #[test]
    fn subscripts_and_greek_names() {
        assert_eq!(tex_of("a_11"), "a_{11}");
        assert_eq!(tex_of("theta"), r"\theta");
    }

    #[test]
    fn trig_powers_and_roots() {
        assert_eq!(tex_of("sin(t)^2"), r"\sin^{2}\left(t\right)");
        assert_eq!(tex_of("x^(1/2)"), r"\sqrt{x}");
        assert_eq!(tex_of("exp(x)"), "e^{x}");
    }

    #[test]
    fn matrices_render_as_pmatrix() {
        let a = parse_matrix("[[2, 1], [1, 3]]").unwrap();
        assert_eq!(
            matrix_latex(&a),
            r"\begin{pmatrix}2 & 1 \\ 1 & 3\end{pmatrix}"
        );
    }

    #[test]
    fn floats_render_with_shortest_representation() {
        assert_eq!(latex_float(0.8), "0.8");
        assert_eq!(latex_float(123456.5), "123456.5");
        assert_eq!(latex_float(f64::INFINITY), r"\infty");
    }

    #[test]
    fn extreme_floats_use_scientific_notation() {
        assert_eq!(latex_float(1e-23), r"1 \times 10^{-23}");
        assert_eq!(latex_float(-2.5e20), r"-2.5 \times 10^{20}");
        assert_eq!(latex_float(0.0), "0");
    }

    #[test]
    fn quotients_inside_products_share_one_fraction() {
        assert_eq!(tex_of("x*(1/(x + 1))"), r"\frac{x}{x + 1}");
        assert_eq!(tex_of("3*a/(2*(x + 1))"), r"\frac{3 a}{2 \left(x + 1\right)}");
    }

    #[test]
    fn decimal_style_for_partial_evaluation() {
        let expr = simplify_fully(parse_expr("1/(4*a)").unwrap());
        assert_eq!(latex(&expr), r"\frac{1}{4 a}");
        assert_eq!(latex_decimal(&expr), r"\frac{0.25}{a}");
        let shifted = simplify_fully(parse_expr("a/2 + 1/3").unwrap());
        assert!(latex_decimal(&shifted).starts_with(r"0.5 a + 0.333"));
    }
}
