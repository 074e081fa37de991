use crate::expr::Expr;

/// Substitute variable `var` with `replacement` throughout `expr`.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    let sub = |inner: &Expr| substitute(inner, var, replacement).boxed();
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(a, b) => Expr::Add(sub(a), sub(b)),
        Expr::Sub(a, b) => Expr::Sub(sub(a), sub(b)),
        Expr::Mul(a, b) => Expr::Mul(sub(a), sub(b)),
        Expr::Div(a, b) => Expr::Div(sub(a), sub(b)),
        Expr::Pow(a, b) => Expr::Pow(sub(a), sub(b)),
        Expr::Neg(a) => Expr::Neg(sub(a)),
        Expr::Sin(a) => Expr::Sin(sub(a)),
        Expr::Cos(a) => Expr::Cos(sub(a)),
        Expr::Tan(a) => Expr::Tan(sub(a)),
        Expr::Exp(a) => Expr::Exp(sub(a)),
        Expr::Log(a) => Expr::Log(sub(a)),
    }
}
