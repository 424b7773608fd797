pub mod card;
pub mod chart;
pub mod table;

pub use card::{CardBody, SummaryCard};
pub use chart::{ChartRenderer, ExcludedEntry, RoiBar, RoiChart, TextBarChart};
pub use table::{ComparisonRow, render_table};
