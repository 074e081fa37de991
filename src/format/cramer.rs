use crate::format::expr::pretty;
use crate::format::latex::{latex, matrix_latex};
use crate::matrix::Matrix;
use crate::solver::{CramerOutcome, CramerSolution, CramerStep};

/// Render the aligned `\begin{aligned} … \end{aligned}` block, one line per unknown.
pub fn cramer_derivation(solution: &CramerSolution) -> String {
    let mut lines = vec![r"\begin{aligned}".to_string()];
    lines.extend(solution.steps.iter().map(|step| step_line(solution, step)));
    lines.push(r"\end{aligned}".to_string());
    lines.join("\n")
}

/// Same block, preceded by `A` and interleaved with each modified matrix `A_i`.
pub fn cramer_derivation_detailed(
    solution: &CramerSolution,
    a: &Matrix,
    modified: &[Matrix],
) -> String {
    let mut lines = vec![r"\begin{aligned}".to_string()];
    lines.push(format!(
        r"A &= {}, \quad \det(A) = {} \\",
        matrix_latex(a),
        latex(&solution.determinant)
    ));
    for (step, a_i) in solution.steps.iter().zip(modified) {
        lines.push(format!(
            r"A_{{{}}} &= {} \\",
            step.index + 1,
            matrix_latex(a_i)
        ));
        lines.push(step_line(solution, step));
    }
    lines.push(r"\end{aligned}".to_string());
    lines.join("\n")
}

fn step_line(solution: &CramerSolution, step: &CramerStep) -> String {
    let i = step.index + 1;
    format!(
        r"x_{{{i}}} &= \frac{{\det(A_{{{i}}})}}{{\det(A)}} = \frac{{{}}}{{{}}} = {} \\",
        latex(&step.determinant),
        latex(&solution.determinant),
        step.value.to_latex()
    )
}

/// Render a `CramerOutcome` into human-readable lines for CLI/examples.
pub fn pretty_cramer_outcome(outcome: &CramerOutcome) -> Vec<String> {
    match outcome {
        CramerOutcome::Unique(solution) => {
            let mut lines = vec![format!(
                "Unique solution (det(A) = {}):",
                pretty(&solution.determinant)
            )];
            for step in &solution.steps {
                lines.push(format!("x{} = {}", step.index + 1, step.value));
            }
            lines
        }
        CramerOutcome::Singular(singular) => vec![format!(
            "No unique solution: det(A) = {}",
            pretty(&singular.determinant)
        )],
    }
}
