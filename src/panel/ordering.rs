use super::location::LocationResolver;
use crate::model::{Breakpoint, Source};

/// Orders a breakpoint list relative to the selected source.
///
/// `resolver` is the one the aggregator groups with, so both agree on
/// where a breakpoint lives.
pub trait BreakpointOrdering {
    fn order<'a>(
        &self,
        breakpoints: &'a [Breakpoint],
        selected: Option<&Source>,
        resolver: &dyn LocationResolver,
    ) -> Vec<&'a Breakpoint>;
}

/// Stable sort by the resolved `(line, column)`. Breakpoints without a
/// column come after those with one on the same line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedLineOrder;

impl BreakpointOrdering for SelectedLineOrder {
    fn order<'a>(
        &self,
        breakpoints: &'a [Breakpoint],
        selected: Option<&Source>,
        resolver: &dyn LocationResolver,
    ) -> Vec<&'a Breakpoint> {
        let mut keyed: Vec<_> = breakpoints
            .iter()
            .map(|bp| {
                let location = resolver.resolve(bp, selected);
                ((location.line, location.column.is_none(), location.column), bp)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, bp)| bp).collect()
    }
}

/// Keeps the input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOrder;

impl BreakpointOrdering for InsertionOrder {
    fn order<'a>(
        &self,
        breakpoints: &'a [Breakpoint],
        _selected: Option<&Source>,
        _resolver: &dyn LocationResolver,
    ) -> Vec<&'a Breakpoint> {
        breakpoints.iter().collect()
    }
}
