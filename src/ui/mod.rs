//! User interface components

mod progress;

pub use progress::{format_summary, Reporter};
