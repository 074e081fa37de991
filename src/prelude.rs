//! String-based convenience API for quick experimentation.

pub use crate::ui::{cramer, cramer_latex, cramer_summary, present, show};
