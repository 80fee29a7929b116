// Document layout: projection of a CV into a styled tree, then pagination
// of that tree onto A4 pages using static Helvetica metrics.

pub mod flow;
pub mod font_metrics;
pub mod projector;
pub mod tree;

pub use font_metrics::{default_page_config, PageConfig};
