//! String-based helpers and the presentation entry point.

mod sink;

use crate::config::Capabilities;
use crate::error::Result;
use crate::format::pretty_cramer_outcome;
use crate::matrix::Matrix;
use crate::parser::{parse_matrix, parse_vector};
use crate::solver::{CramerOutcome, SolutionValue, solve};

pub use sink::{OutputSink, RichMathSink, TextSink, default_sink};

const TEXT_LABEL: &str = "LaTeX solution:";

/// Solve and write the result to `sink`.
///
/// Returns `None` for a singular system and the solution values otherwise. Shape errors are
/// returned before anything is written.
pub fn present(
    a: &Matrix,
    b: &Matrix,
    symbolic: bool,
    sink: &mut dyn OutputSink,
) -> Result<Option<Vec<SolutionValue>>> {
    match solve(a, b, symbolic)? {
        CramerOutcome::Singular(singular) => {
            sink.emit(singular.notice())?;
            Ok(None)
        }
        CramerOutcome::Unique(solution) => {
            sink.emit_labelled(TEXT_LABEL, &solution.to_latex())?;
            Ok(Some(solution.values()))
        }
    }
}

pub fn cramer(a: &str, b: &str, symbolic: bool) -> Result<CramerOutcome> {
    let a = parse_matrix(a)?;
    let b = parse_vector(b)?;
    Ok(solve(&a, &b, symbolic)?)
}

pub fn cramer_latex(a: &str, b: &str, symbolic: bool) -> Result<String> {
    Ok(cramer(a, b, symbolic)?.to_latex())
}

pub fn cramer_summary(a: &str, b: &str, symbolic: bool) -> Result<Vec<String>> {
    Ok(pretty_cramer_outcome(&cramer(a, b, symbolic)?))
}

/// Parse, solve and present through the process-wide display surface.
pub fn show(a: &str, b: &str, symbolic: bool) -> Result<Option<Vec<SolutionValue>>> {
    let a = parse_matrix(a)?;
    let b = parse_vector(b)?;
    let mut sink = default_sink(Capabilities::get());
    present(&a, &b, symbolic, sink.as_mut())
}
