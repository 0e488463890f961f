//! Breakpoints panel data: which sources to list and which breakpoints under each.

mod aggregate;
mod filename;
mod location;
mod memo;
mod ordering;

pub use aggregate::{aggregate, BreakpointSource, BreakpointSourceAggregator};
pub use filename::{display_filename, Collation, DisplayName, Lexicographic, UrlFilename};
pub use location::{LocationResolver, SelectedLocation};
pub use memo::{MemoizedBreakpointSources, SnapshotKey};
pub use ordering::{BreakpointOrdering, InsertionOrder, SelectedLineOrder};
