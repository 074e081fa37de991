//! Cramer's rule over exact matrices.
//!
//! Each unknown is the ratio `det(A_i) / det(A)`, where `A_i` is `A` with column `i` replaced by
//! the right-hand side. Determinants are exact; floating point only enters when the caller asks
//! for it.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::ShapeError;
use crate::eval::evaluate;
use crate::expr::{Expr, zero};
use crate::format::{
    cramer_derivation, cramer_derivation_detailed, latex, latex_decimal, latex_float, pretty,
    pretty_decimal,
};
use crate::matrix::Matrix;
use crate::simplify::{is_identically_zero, simplify_div, simplify_fully, simplify_mul};

pub const SINGULAR_NOTICE: &str = r"\text{The system has no unique solution because } \det(A) = 0";

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionValue {
    Exact(Expr),
    Float(f64),
    /// A value with free variables under `symbolic = false`: the exact form, shown with
    /// decimal coefficients.
    Approximate(Expr),
}

impl SolutionValue {
    pub fn as_exact(&self) -> Option<&Expr> {
        match self {
            SolutionValue::Exact(expr) => Some(expr),
            SolutionValue::Float(_) | SolutionValue::Approximate(_) => None,
        }
    }

    /// Numeric value, evaluating exact entries when they are closed.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            SolutionValue::Exact(expr) | SolutionValue::Approximate(expr) => evaluate(expr),
            SolutionValue::Float(v) => Some(*v),
        }
    }

    pub fn to_latex(&self) -> String {
        match self {
            SolutionValue::Exact(expr) => latex(expr),
            SolutionValue::Float(v) => latex_float(*v),
            SolutionValue::Approximate(expr) => latex_decimal(expr),
        }
    }
}

impl fmt::Display for SolutionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionValue::Exact(expr) => write!(f, "{}", pretty(expr)),
            SolutionValue::Float(v) => write!(f, "{v}"),
            SolutionValue::Approximate(expr) => write!(f, "{}", pretty_decimal(expr)),
        }
    }
}

/// One unknown of the derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct CramerStep {
    /// Zero-based column index.
    pub index: usize,
    /// `det(A_i)`.
    pub determinant: Expr,
    /// `det(A_i) / det(A)`, simplified.
    pub ratio: Expr,
    pub value: SolutionValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CramerSolution {
    /// `det(A)`, never zero.
    pub determinant: Expr,
    pub steps: Vec<CramerStep>,
    pub symbolic: bool,
}

impl CramerSolution {
    pub fn values(&self) -> Vec<SolutionValue> {
        self.steps.iter().map(|step| step.value.clone()).collect()
    }

    /// The exact ratios regardless of the `symbolic` flag.
    pub fn exact_values(&self) -> Vec<Expr> {
        self.steps.iter().map(|step| step.ratio.clone()).collect()
    }

    pub fn to_latex(&self) -> String {
        cramer_derivation(self)
    }

    /// Like [`CramerSolution::to_latex`], but also prints each `A_i` before its ratio.
    pub fn to_latex_detailed(&self, a: &Matrix, b: &Matrix) -> Result<String, ShapeError> {
        let modified = (0..self.steps.len())
            .map(|i| a.with_column_replaced(i, b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cramer_derivation_detailed(self, a, &modified))
    }

    /// Check `A · x = b` exactly. Multiplied through by `det(A)` this is the polynomial identity
    /// `A · (det(A_1), …, det(A_n)) = det(A) · b`, which holds for symbolic entries too.
    pub fn verify(&self, a: &Matrix, b: &Matrix) -> Result<bool, ShapeError> {
        let numerators = Matrix::column_vector(
            self.steps.iter().map(|step| step.determinant.clone()).collect(),
        );
        let lhs = a.mul(&numerators)?;
        if lhs.rows() != b.rows() {
            return Err(ShapeError::RowMismatch {
                a_rows: lhs.rows(),
                b_rows: b.rows(),
            });
        }
        Ok(lhs.entries().iter().zip(b.entries()).all(|(l, r)| {
            let scaled = simplify_mul(self.determinant.clone(), r.clone());
            is_identically_zero(&simplify_fully(Expr::Sub(l.clone().boxed(), scaled.boxed())))
        }))
    }
}

/// `det(A) = 0`: the system has no solution or infinitely many.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularSystem {
    pub determinant: Expr,
}

impl SingularSystem {
    pub fn notice(&self) -> &'static str {
        SINGULAR_NOTICE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CramerOutcome {
    Unique(CramerSolution),
    Singular(SingularSystem),
}

impl CramerOutcome {
    pub fn is_singular(&self) -> bool {
        matches!(self, CramerOutcome::Singular(_))
    }

    pub fn solution(&self) -> Option<&CramerSolution> {
        match self {
            CramerOutcome::Unique(solution) => Some(solution),
            CramerOutcome::Singular(_) => None,
        }
    }

    pub fn into_values(self) -> Option<Vec<SolutionValue>> {
        match self {
            CramerOutcome::Unique(solution) => Some(solution.values()),
            CramerOutcome::Singular(_) => None,
        }
    }

    /// The singular notice or the aligned derivation block.
    pub fn to_latex(&self) -> String {
        match self {
            CramerOutcome::Unique(solution) => solution.to_latex(),
            CramerOutcome::Singular(singular) => singular.notice().to_string(),
        }
    }
}

/// Solve `A · x = b` by Cramer's rule.
///
/// Shape problems are reported before any determinant is computed. `det(A)` counts as zero when
/// it vanishes after clearing denominators. With `symbolic` unset, each value is evaluated to
/// `f64`; values that still contain variables keep their form with decimal coefficients.
pub fn solve(a: &Matrix, b: &Matrix, symbolic: bool) -> Result<CramerOutcome, ShapeError> {
    if !a.is_square() {
        return Err(ShapeError::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    if a.rows() != b.rows() {
        return Err(ShapeError::RowMismatch {
            a_rows: a.rows(),
            b_rows: b.rows(),
        });
    }
    if b.cols() != 1 {
        return Err(ShapeError::NotColumnVector { cols: b.cols() });
    }

    let det_a = a.determinant()?;
    debug!(n = a.rows(), det = %det_a, "computed det(A)");
    if is_identically_zero(&det_a) {
        info!(n = a.rows(), "det(A) = 0, no unique solution");
        return Ok(CramerOutcome::Singular(SingularSystem {
            determinant: zero(),
        }));
    }

    let mut steps = Vec::with_capacity(a.cols());
    for index in 0..a.cols() {
        let det_i = a.with_column_replaced(index, b)?.determinant()?;
        let ratio = simplify_fully(simplify_div(det_i.clone(), det_a.clone()));
        let value = if symbolic {
            SolutionValue::Exact(ratio.clone())
        } else {
            match evaluate(&ratio) {
                Some(v) => SolutionValue::Float(v),
                None => {
                    warn!(
                        index,
                        value = %ratio,
                        "value has free variables, evaluating coefficients only"
                    );
                    SolutionValue::Approximate(ratio.clone())
                }
            }
        };
        debug!(index, det = %det_i, value = %value, "solved unknown");
        steps.push(CramerStep {
            index,
            determinant: det_i,
            ratio,
            value,
        });
    }

    Ok(CramerOutcome::Unique(CramerSolution {
        determinant: det_a,
        steps,
        symbolic,
    }))
}
