pub mod recommendations;
pub mod segments;

pub use recommendations::{recommend, RankerParams};
pub use segments::resolve_segment;
