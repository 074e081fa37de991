use cramer::{TextSink, parse_matrix, parse_vector, solve};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let a = parse_matrix("[[cos(t), -sin(t)], [sin(t), cos(t)]]").unwrap_or_else(|e| panic!("{e}"));
    let b = parse_vector("[u, v]").unwrap_or_else(|e| panic!("{e}"));

    let outcome = solve(&a, &b, true).unwrap_or_else(|e| panic!("{e}"));
    let Some(solution) = outcome.solution() else {
        println!("{}", outcome.to_latex());
        return;
    };

    match solution.to_latex_detailed(&a, &b) {
        Ok(latex) => println!("{latex}"),
        Err(err) => eprintln!("error: {err}"),
    }
    println!("verified: {:?}", solution.verify(&a, &b));

    let mut sink = TextSink::stdout();
    if let Err(err) = cramer::present(&a, &b, false, &mut sink) {
        eprintln!("error: {err}");
    }
}
