//! Formatting helpers for rendering expressions, matrices and derivations.

pub mod cramer;
pub mod expr;
pub mod latex;

pub use cramer::{cramer_derivation, cramer_derivation_detailed, pretty_cramer_outcome};
pub use expr::{pretty, pretty_decimal};
pub use latex::{latex, latex_decimal, latex_float, matrix_latex};
