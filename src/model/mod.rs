mod registry;
mod types;

pub use registry::{BreakpointRegistry, SourceRegistry};
pub use types::{Breakpoint, BreakpointOptions, Location, Source, SourceId, SourcesMap};
