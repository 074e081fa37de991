use cramer::prelude::{cramer_summary, show};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let a = "[[2, 1, -1], [-3, -1, 2], [-2, 1, 2]]";
    let b = "[8, -11, -3]";

    match cramer_summary(a, b, true) {
        Ok(lines) => println!("{}", lines.join("\n")),
        Err(err) => eprintln!("error: {err}"),
    }

    if let Err(err) = show(a, b, false) {
        eprintln!("error: {err}");
    }
}
