//! `nom` parsers for expressions and bracketed matrix literals.

use crate::error::{CramerError, Result};
use crate::expr::{Expr, Rational};
use crate::matrix::Matrix;
use crate::simplify::simplify_fully;
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{alpha1, char, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::error::{VerboseError, convert_error};
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, pair, preceded};
use num_bigint::{BigInt, ParseBigIntError};
use num_traits::Num;

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

pub fn parse_expr(input: &str) -> Result<Expr> {
    run(input, parse_add_sub)
}

/// Parse a matrix literal such as `[[2, 1], [1, 3]]`. Entries are arbitrary expressions.
pub fn parse_matrix(input: &str) -> Result<Matrix> {
    let rows = run(input, parse_rows)?;
    Ok(Matrix::from_rows(rows)?.map(simplify_fully))
}

/// Parse a right-hand side. A flat list `[3, 5]` becomes a column vector; a nested literal is
/// taken as written, so `[[3], [5]]` is accepted as well.
pub fn parse_vector(input: &str) -> Result<Matrix> {
    if let Ok(entries) = run(input, parse_row) {
        return Ok(Matrix::column_vector(entries).map(simplify_fully));
    }
    parse_matrix(input)
}

fn run<'a, O, F>(input: &'a str, parser: F) -> Result<O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    match all_consuming(ws(parser))(input) {
        Ok((_, out)) => Ok(out),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(CramerError::Parse(convert_error(input, e)))
        }
        Err(nom::Err::Incomplete(_)) => Err(CramerError::Parse("incomplete input".to_string())),
    }
}

fn parse_rows(input: &str) -> PResult<'_, Vec<Vec<Expr>>> {
    delimited(
        ws(char('[')),
        separated_list1(ws(char(',')), parse_row),
        ws(char(']')),
    )(input)
}

fn parse_row(input: &str) -> PResult<'_, Vec<Expr>> {
    delimited(
        ws(char('[')),
        separated_list1(ws(char(',')), parse_add_sub),
        ws(char(']')),
    )(input)
}

fn parse_add_sub(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            _ => Expr::Sub(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_unary(input)?;
    fold_many0(
        pair(ws(alt((char('*'), char('/')))), parse_unary),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            _ => Expr::Div(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

/// Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`.
fn parse_unary(input: &str) -> PResult<'_, Expr> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else {
        parse_pow(input)
    }
}

/// Right-associative; the exponent may carry its own sign (`2^-1`).
fn parse_pow(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = parse_primary(input)?;
    if let Ok((next, exp)) = preceded(ws(char('^')), parse_unary)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_primary(input: &str) -> PResult<'_, Expr> {
    alt((
        parse_parens,
        parse_function,
        parse_number,
        parse_identifier,
    ))(input)
}

fn parse_parens(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

/// Integer or decimal literal. Decimals are read exactly, so `0.25` is `1/4`.
fn parse_number(input: &str) -> PResult<'_, Expr> {
    map_res(
        ws(recognize(pair(digit1, opt(pair(char('.'), digit1))))),
        |s: &str| decimal_to_rational(s).map(Expr::Constant),
    )(input)
}

fn decimal_to_rational(literal: &str) -> std::result::Result<Rational, ParseBigIntError> {
    let (whole, fraction) = literal.split_once('.').unwrap_or((literal, ""));
    let numer = BigInt::from_str_radix(&format!("{whole}{fraction}"), 10)?;
    let denom = num_traits::pow(BigInt::from(10), fraction.len());
    Ok(Rational::new(numer, denom))
}

fn parse_identifier(input: &str) -> PResult<'_, Expr> {
    map(
        ws(recognize(pair(
            alpha1,
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        ))),
        |s: &str| Expr::Variable(s.to_string()),
    )(input)
}

fn parse_function(input: &str) -> PResult<'_, Expr> {
    let (rest, (name, arg)) = pair(
        ws(alt((tag("sin"), tag("cos"), tag("tan"), tag("exp"), tag("log")))),
        parse_parens,
    )(input)?;

    let expr = match name {
        "sin" => Expr::Sin(arg.boxed()),
        "cos" => Expr::Cos(arg.boxed()),
        "tan" => Expr::Tan(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        _ => Expr::Log(arg.boxed()),
    };

    Ok((rest, expr))
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{add, mul, neg, pow};

    fn simp(input: &str) -> Expr {
        simplify_fully(parse_expr(input).unwrap())
    }

    #[test]
    fn fractions_fold_to_exact_constants() {
        assert_eq!(simp("4/5"), Expr::constant(4, 5));
        assert_eq!(simp("1/2^2"), Expr::constant(1, 4));
    }

    #[test]
    fn division_by_zero_stays_a_quotient() {
        assert_eq!(simp("1/0"), Expr::Div(Expr::integer(1).boxed(), Expr::integer(0).boxed()));
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        assert_eq!(simp("-2^2"), Expr::integer(-4));
        assert_eq!(parse_expr("-t^2").unwrap(), neg(pow(Expr::var("t"), Expr::integer(2))));
        assert_eq!(simp("2^-1"), Expr::constant(1, 2));
        assert_eq!(simp("2^3^2"), Expr::integer(512));
    }

    #[test]
    fn power_binds_tighter_than_division() {
        assert_eq!(simp("2^3/4"), Expr::integer(2));
        assert_eq!(simp("(1/2)^2"), Expr::constant(1, 4));
    }

    #[test]
    fn decimals_are_read_exactly() {
        assert_eq!(simp("0.25"), Expr::constant(1, 4));
        assert_eq!(simp("-1.5"), Expr::constant(-3, 2));
        assert_eq!(simp("2.50*x"), simp("5/2*x"));
        assert!(matches!(parse_expr("1."), Err(CramerError::Parse(_))));
    }

    #[test]
    fn identifiers_accept_underscores() {
        let expr = parse_expr("a_11*x + b").unwrap();
        assert_eq!(expr, add(mul(Expr::var("a_11"), Expr::var("x")), Expr::var("b")));
    }

    #[test]
    fn function_names_need_parentheses() {
        assert_eq!(parse_expr("exponent").unwrap(), Expr::var("exponent"));
        assert_eq!(parse_expr("cos(t)").unwrap(), Expr::Cos(Expr::var("t").boxed()));
    }

    #[test]
    fn garbage_reports_parse_error() {
        assert!(matches!(parse_expr("2 +"), Err(CramerError::Parse(_))));
        assert!(matches!(parse_matrix("[[1, 2], [3"), Err(CramerError::Parse(_))));
    }
}
