use super::aggregate::{BreakpointSource, BreakpointSourceAggregator};
use super::filename::{Collation, DisplayName, Lexicographic, UrlFilename};
use super::location::{LocationResolver, SelectedLocation};
use super::ordering::{BreakpointOrdering, SelectedLineOrder};
use crate::model::{Breakpoint, Source, SourceId, SourcesMap};
use std::sync::Arc;
use tracing::trace;

/// Identifies one input snapshot by registry versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotKey {
    pub sources_version: u64,
    pub breakpoints_version: u64,
    pub selected: Option<SourceId>,
}

/// Caches the last aggregation and reuses it while the key is unchanged.
#[derive(Debug, Default)]
pub struct MemoizedBreakpointSources<
    R = SelectedLocation,
    O = SelectedLineOrder,
    N = UrlFilename,
    C = Lexicographic,
> {
    aggregator: BreakpointSourceAggregator<R, O, N, C>,
    cached: Option<(SnapshotKey, Arc<Vec<BreakpointSource>>)>,
    recomputed: u64,
}

impl MemoizedBreakpointSources {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R, O, N, C> MemoizedBreakpointSources<R, O, N, C>
where
    R: LocationResolver,
    O: BreakpointOrdering,
    N: DisplayName,
    C: Collation,
{
    pub fn with_aggregator(aggregator: BreakpointSourceAggregator<R, O, N, C>) -> Self {
        Self {
            aggregator,
            cached: None,
            recomputed: 0,
        }
    }

    /// Number of times the groups were actually rebuilt.
    pub fn recomputed(&self) -> u64 {
        self.recomputed
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Returns the groups for `key`, rebuilding them only when `key` differs
    /// from the previous call. The caller guarantees the inputs match `key`.
    pub fn get(
        &mut self,
        key: SnapshotKey,
        sources: &SourcesMap,
        breakpoints: &[Breakpoint],
        selected: Option<&Source>,
    ) -> Arc<Vec<BreakpointSource>> {
        if let Some((cached_key, groups)) = &self.cached {
            if *cached_key == key {
                trace!(?key, "breakpoint sources cache hit");
                return Arc::clone(groups);
            }
        }

        let groups = Arc::new(self.aggregator.aggregate(sources, breakpoints, selected));
        self.recomputed += 1;
        self.cached = Some((key, Arc::clone(&groups)));
        groups
    }
}
