//! Cramer's rule over exact rationals, with step-by-step LaTeX derivations.
//!
//! Each unknown of `A·x = b` is computed as `det(A_i) / det(A)`. Entries may be rationals or
//! symbolic expressions; determinants are taken by cofactor expansion and kept exact.

pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod matrix;
pub mod parser;
pub mod prelude;
pub mod simplify;
pub mod solver;
pub mod ui;

pub use config::{Capabilities, DisplayMode};
pub use error::{CramerError, Result, ShapeError};
pub use eval::evaluate;
pub use expr::{Expr, Rational, add, div, mul, neg, one, pow, rational, sub, zero};
pub use format::{latex, latex_decimal, pretty, pretty_cramer_outcome, pretty_decimal};
pub use matrix::Matrix;
pub use parser::{parse_expr, parse_matrix, parse_vector};
pub use simplify::{is_identically_zero, simplify, simplify_fully, substitute, together};
pub use solver::{
    CramerOutcome, CramerSolution, CramerStep, SINGULAR_NOTICE, SingularSystem, SolutionValue,
    solve,
};
pub use ui::{OutputSink, RichMathSink, TextSink, default_sink, present};
