use cramer::prelude::show;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match show("[[1, 2], [2, 4]]", "[3, 6]", true) {
        Ok(Some(values)) => println!("unexpected solution: {values:?}"),
        Ok(None) => println!("no unique solution"),
        Err(err) => eprintln!("error: {err}"),
    }

    if let Err(err) = show("[[1, 2, 3], [4, 5, 6]]", "[1, 2]", true) {
        eprintln!("error: {err}");
    }
}
