mod context;

pub use context::DebugContext;
