//! Services used by the comparator: tree traversal, text diffs and reporting

pub mod report;
pub mod text_diff;
pub mod walk;

pub use report::{CompareSummary, Outcome};
pub use text_diff::TextDiffer;
pub use walk::{ComparisonTask, ReferenceWalker};
