use std::collections::{BTreeMap, HashMap};

use crate::expr::{Expr, Rational, one, zero};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;

#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct CanonKey(Vec<Expr>);

pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),

        Expr::Sin(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => zero(),
            Expr::Neg(inner) => simplify_neg(Expr::Sin(inner)),
            x => Expr::Sin(x.boxed()),
        },

        Expr::Cos(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => one(),
            Expr::Neg(inner) => Expr::Cos(inner),
            x => Expr::Cos(x.boxed()),
        },

        Expr::Tan(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => zero(),
            Expr::Neg(inner) => simplify_neg(Expr::Tan(inner)),
            x => Expr::Tan(x.boxed()),
        },

        Expr::Exp(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => one(),
            Expr::Log(inner) => *inner,
            x => Expr::Exp(x.boxed()),
        },

        Expr::Log(a) => match simplify_cached(*a, cache) {
            x if is_one(&x) => zero(),
            Expr::Exp(inner) => *inner,
            x => Expr::Log(x.boxed()),
        },

        e => e,
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, 64)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_trig_once(&simplify_cached(current.clone(), &mut cache), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    rebuild_sum(collect_sum(flatten_sum(&x).into_iter().chain(flatten_sum(&y))))
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(simplify_neg));
            out
        }
        Expr::Neg(a) => flatten_sum(a).into_iter().map(simplify_neg).collect(),
        other => vec![other.clone()],
    }
}

fn count_sum_terms(expr: &Expr) -> usize {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) => count_sum_terms(a) + count_sum_terms(b),
        Expr::Neg(inner) => count_sum_terms(inner),
        _ => 1,
    }
}

/// Split a product into its rational coefficient and the remaining (power-merged) core.
fn split_coeff(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Constant(c) => (c.clone(), one()),
        Expr::Neg(e) => {
            let (c, b) = split_coeff(e);
            (-c, b)
        }
        Expr::Mul(a, b) => {
            let (ca, ba) = split_coeff(a);
            let (cb, bb) = split_coeff(b);
            (ca * cb, mul_norm(ba, bb))
        }
        Expr::Div(a, b) => match b.as_constant() {
            Some(d) if !d.is_zero() => {
                let (ca, ba) = split_coeff(a);
                (ca / d, ba)
            }
            _ => (Rational::one(), expr.clone()),
        },
        other => (Rational::one(), other.clone()),
    }
}

fn mul_from_sorted_factors(factors: &[Expr]) -> Expr {
    let mut iter = factors.iter().cloned();
    let Some(first) = iter.next() else {
        return one();
    };
    iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed()))
}

fn mul_norm(a: Expr, b: Expr) -> Expr {
    mk_mul_list(factors(&a).into_iter().chain(factors(&b)).collect())
}

fn factors(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(a, b) => {
            let mut out = factors(a);
            out.extend(factors(b));
            out
        }
        t if is_one(t) => vec![],
        t => vec![t.clone()],
    }
}

/// Group equal bases and add their integer or rational exponents. Output is sorted by base.
fn merge_factors(items: Vec<Expr>) -> Vec<Expr> {
    let mut powers: BTreeMap<Expr, Rational> = BTreeMap::new();
    for item in items {
        let (base, exp) = match item {
            Expr::Pow(base, e) => match *e {
                Expr::Constant(k) => (*base, k),
                other => (Expr::Pow(base, other.boxed()), Rational::one()),
            },
            other => (other, Rational::one()),
        };
        *powers.entry(base).or_insert_with(Rational::zero) += exp;
    }

    powers
        .into_iter()
        .filter_map(|(base, exp)| {
            if exp.is_zero() {
                None
            } else if exp.is_one() {
                Some(base)
            } else {
                Some(Expr::Pow(base.boxed(), Expr::Constant(exp).boxed()))
            }
        })
        .collect()
}

fn collect_sum<I>(terms: I) -> HashMap<CanonKey, Rational>
where
    I: IntoIterator<Item = Expr>,
{
    let mut map = HashMap::new();
    for term in terms {
        let (c, b) = split_coeff(&term);
        if c.is_zero() {
            continue;
        }
        let key = CanonKey(merge_factors(factors(&b)));
        map.entry(key).and_modify(|acc| *acc += &c).or_insert(c);
    }
    map
}

fn rebuild_sum(mut map: HashMap<CanonKey, Rational>) -> Expr {
    let const_term = map
        .remove(&CanonKey(Vec::new()))
        .unwrap_or_else(Rational::zero);
    let mut items: Vec<(CanonKey, Rational)> = map.into_iter().collect();
    items.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut terms: Vec<Expr> = items
        .into_iter()
        .filter_map(|(CanonKey(factors), coef)| {
            if coef.is_zero() {
                None
            } else {
                Some(term_from(&coef, mul_from_sorted_factors(&factors)))
            }
        })
        .collect();

    if !const_term.is_zero() {
        terms.push(Expr::Constant(const_term));
    }

    match terms.len() {
        0 => zero(),
        1 => terms.remove(0),
        _ => mk_add_list(terms),
    }
}

fn term_from(coef: &Rational, base: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }

    if is_one(&base) {
        return Expr::Constant(coef.clone());
    }

    if coef.is_one() {
        return base;
    }

    if coef == &-Rational::one() {
        return simplify_neg(base);
    }

    Expr::Mul(Expr::Constant(coef.clone()).boxed(), base.boxed())
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Add(a, b), t) => {
            let term_count = (count_sum_terms(&a) + count_sum_terms(&b)) * count_sum_terms(&t);
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_add(simplify_mul(*a, t.clone()), simplify_mul(*b, t))
            } else {
                Expr::Mul(Expr::Add(a, b).boxed(), t.boxed())
            }
        }
        (Expr::Sub(a, b), t) => {
            let term_count = (count_sum_terms(&a) + count_sum_terms(&b)) * count_sum_terms(&t);
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_sub(simplify_mul(*a, t.clone()), simplify_mul(*b, t))
            } else {
                Expr::Mul(Expr::Sub(a, b).boxed(), t.boxed())
            }
        }
        (t, Expr::Add(a, b)) => {
            let term_count = count_sum_terms(&t) * (count_sum_terms(&a) + count_sum_terms(&b));
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_add(simplify_mul(t.clone(), *a), simplify_mul(t, *b))
            } else {
                Expr::Mul(t.boxed(), Expr::Add(a, b).boxed())
            }
        }
        (t, Expr::Sub(a, b)) => {
            let term_count = count_sum_terms(&t) * (count_sum_terms(&a) + count_sum_terms(&b));
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_sub(simplify_mul(t.clone(), *a), simplify_mul(t, *b))
            } else {
                Expr::Mul(t.boxed(), Expr::Sub(a, b).boxed())
            }
        }
        (Expr::Constant(xc), Expr::Constant(yc)) => Expr::Constant(xc * yc),
        (x, y) if is_zero(&x) || is_zero(&y) => zero(),
        (x, y) if is_one(&x) => y,
        (x, y) if is_one(&y) => x,
        (x, y) => {
            let (c, b) = split_coeff(&Expr::Mul(x.boxed(), y.boxed()));
            term_from(&c, b)
        }
    }
}

/// Divide exactly. Constant divisors distribute; identical cores cancel to their coefficient
/// ratio; products of powers cancel factor by factor. Anything else stays a quotient.
pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Constant(n), Expr::Constant(d)) => {
            if d.is_zero() {
                Expr::Div(Expr::Constant(n).boxed(), Expr::Constant(d).boxed())
            } else {
                Expr::Constant(n / d)
            }
        }
        (x, _) if is_zero(&x) => zero(),
        (x, y) if is_one(&y) => x,
        (x, Expr::Constant(d)) if !d.is_zero() => simplify_mul(Expr::Constant(d.recip()), x),
        (x, y) => {
            let (cx, bx) = sum_content(&x);
            let (cy, by) = sum_content(&y);
            let c = cx / cy;
            if bx == by {
                return Expr::Constant(c);
            }
            if is_monomial(&bx) && is_monomial(&by) {
                let inverted = factors(&by)
                    .into_iter()
                    .map(|f| simplify_pow(f, Expr::integer(-1)));
                let core = mk_mul_list(factors(&bx).into_iter().chain(inverted).collect());
                return term_from(&c, core);
            }
            let core = if is_one(&by) {
                bx
            } else {
                Expr::Div(bx.boxed(), by.boxed())
            };
            term_from(&c, core)
        }
    }
}

/// Rational content of a sum: the signed gcd of the term coefficients, and the sum divided by it.
/// The sign follows the first term so that `a - b` and `b - a` share a core.
fn sum_content(expr: &Expr) -> (Rational, Expr) {
    let terms = flatten_sum(expr);
    if terms.len() == 1 {
        return split_coeff(&terms[0]);
    }

    let split: Vec<(Rational, Expr)> = terms.iter().map(split_coeff).collect();
    let mut numer = BigInt::zero();
    let mut denom = BigInt::one();
    for (c, _) in &split {
        numer = numer.gcd(c.numer());
        denom = denom.lcm(c.denom());
    }
    if numer.is_zero() {
        return (Rational::one(), expr.clone());
    }
    let mut content = Rational::new(numer, denom);
    if split.first().is_some_and(|(c, _)| c.is_negative()) {
        content = -content;
    }

    let scaled = split
        .into_iter()
        .map(|(c, core)| term_from(&(c / &content), core))
        .collect::<Vec<_>>();
    (content, rebuild_sum(collect_sum(scaled)))
}

fn is_monomial(expr: &Expr) -> bool {
    !matches!(expr, Expr::Add(..) | Expr::Sub(..) | Expr::Div(..))
}

pub fn simplify_pow(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (_, Expr::Constant(e)) if e.is_zero() => one(),
        (base, Expr::Constant(e)) if e.is_one() => base,
        (Expr::Constant(b), Expr::Constant(e)) => {
            if e.is_integer() {
                let k: BigInt = e.to_integer();
                if let Some(power) = k.abs().to_u32() {
                    if k >= BigInt::zero() {
                        let num = b.numer().pow(power);
                        let den = b.denom().pow(power);
                        return Expr::Constant(Rational::new(num, den));
                    } else if b.is_zero() {
                        return Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed());
                    } else {
                        let num = b.denom().pow(power);
                        let den = b.numer().pow(power);
                        return Expr::Constant(Rational::new(num, den));
                    }
                }
            }
            Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed())
        }
        (Expr::Pow(base, inner), Expr::Constant(k)) if k.is_integer() => match *inner {
            Expr::Constant(m) => simplify_pow(*base, Expr::Constant(m * k)),
            other => Expr::Pow(Expr::Pow(base, other.boxed()).boxed(), Expr::Constant(k).boxed()),
        },
        (base @ (Expr::Add(..) | Expr::Sub(..)), Expr::Constant(k)) if k.is_integer() => {
            match expansion_power(&base, &k) {
                Some(power) => (1..power).fold(base.clone(), |acc, _| simplify_mul(acc, base.clone())),
                None => Expr::Pow(base.boxed(), Expr::Constant(k).boxed()),
            }
        }
        (x, y) => Expr::Pow(x.boxed(), y.boxed()),
    }
}

/// Exponent for expanding `sum^k` by repeated multiplication, if the product stays under the
/// distribution limit.
fn expansion_power(base: &Expr, k: &Rational) -> Option<u32> {
    if !k.is_positive() {
        return None;
    }
    let power = k.to_integer().to_u32()?;
    let terms = count_sum_terms(base).checked_pow(power)?;
    (terms <= DISTRIBUTE_TERM_LIMIT).then_some(power)
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(x) => Expr::Constant(-x),
        Expr::Neg(x) => *x,
        other => Expr::Neg(other.boxed()),
    }
}

fn is_zero(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r.is_zero())
}

fn is_one(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r.is_one())
}

struct TermMeta {
    coeff: Rational,
    squared_sin: Option<Expr>,
    squared_cos: Option<Expr>,
    others: Vec<Expr>,
}

fn term_meta(expr: &Expr) -> TermMeta {
    let (coeff, core) = split_coeff(expr);
    let mut squared_sin = None;
    let mut squared_cos = None;
    let mut others = Vec::new();
    for factor in merge_factors(factors(&core)) {
        let squared = match &factor {
            Expr::Pow(base, e) if is_two(e) => match base.as_ref() {
                Expr::Sin(arg) => Some((true, arg.as_ref().clone())),
                Expr::Cos(arg) => Some((false, arg.as_ref().clone())),
                _ => None,
            },
            _ => None,
        };
        match squared {
            Some((true, arg)) if squared_sin.is_none() => squared_sin = Some(arg),
            Some((false, arg)) if squared_cos.is_none() => squared_cos = Some(arg),
            _ => others.push(factor),
        }
    }

    TermMeta {
        coeff,
        squared_sin,
        squared_cos,
        others,
    }
}

fn is_two(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r == &Rational::from_integer(2.into()))
}

// c*sin(u)^2*k + c*cos(u)^2*k => c*k
fn combine_pythagorean_pair(terms: &[Expr]) -> Option<(Expr, (usize, usize))> {
    let metas: Vec<TermMeta> = terms.iter().map(term_meta).collect();
    for (i, lhs) in metas.iter().enumerate() {
        let Some(arg) = &lhs.squared_sin else {
            continue;
        };
        if lhs.squared_cos.is_some() {
            continue;
        }
        for (j, rhs) in metas.iter().enumerate() {
            if i == j || rhs.squared_sin.is_some() {
                continue;
            }
            if rhs.squared_cos.as_ref() == Some(arg)
                && rhs.coeff == lhs.coeff
                && rhs.others == lhs.others
            {
                let core = mul_from_sorted_factors(&lhs.others);
                return Some((term_from(&lhs.coeff, core), (i, j)));
            }
        }
    }
    None
}

fn simplify_trig_once(expr: &Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    let terms = flatten_sum(expr);
    if let Some((new_term, (i, j))) = combine_pythagorean_pair(&terms) {
        let rest: Vec<Expr> = terms
            .into_iter()
            .enumerate()
            .filter_map(|(idx, t)| if idx == i || idx == j { None } else { Some(t) })
            .collect();
        simplify_cached(
            mk_add_list(std::iter::once(new_term).chain(rest).collect()),
            cache,
        )
    } else {
        expr.clone()
    }
}

fn mk_add_list(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter();
    let Some(first) = iter.next() else {
        return zero();
    };
    iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed()))
}

fn mk_mul_list(mut items: Vec<Expr>) -> Expr {
    items.retain(|e| !is_one(e));
    mul_from_sorted_factors(&merge_factors(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn simp(input: &str) -> Expr {
        simplify_fully(parse_expr(input).expect("parse input"))
    }

    #[test]
    fn like_terms_cancel_to_zero() {
        assert_eq!(simp("a*d - b*c - (d*a - c*b)"), zero());
        assert_eq!(simp("a*2*b - b*2*a"), zero());
    }

    #[test]
    fn equal_factors_merge_into_powers() {
        assert_eq!(simp("a*a*b"), simp("a^2*b"));
        assert_eq!(simp("a^3/a"), simp("a^2"));
    }

    #[test]
    fn division_by_constant_distributes() {
        assert_eq!(simp("(2*a + 4)/2"), simp("a + 2"));
    }

    #[test]
    fn identical_cores_cancel() {
        assert_eq!(simp("(2*a - 2*b)/(a - b)"), Expr::integer(2));
        assert_eq!(simp("(a - b)/(b - a)"), Expr::integer(-1));
    }

    #[test]
    fn content_is_signed_by_leading_term() {
        let (c, core) = sum_content(&simp("-2*a + 4*b"));
        assert_eq!(c, Rational::from_integer((-2).into()));
        assert_eq!(core, simp("a - 2*b"));
    }

    #[test]
    fn small_powers_of_sums_expand() {
        assert_eq!(simp("(x + 1)^2 - x^2 - 2*x - 1"), zero());
        assert_eq!(simp("(a - b)^3"), simp("a^3 - 3*a^2*b + 3*a*b^2 - b^3"));
    }

    #[test]
    fn large_powers_of_sums_stay_folded() {
        let expr = simp("(a + b + c)^4");
        assert!(matches!(expr, Expr::Pow(..)));
    }

    #[test]
    fn pythagorean_identity_collapses() {
        assert_eq!(simp("cos(t)*cos(t) + sin(t)*sin(t)"), one());
        assert_eq!(simp("3*k*sin(t)^2 + 3*k*cos(t)^2"), simp("3*k"));
    }
}
