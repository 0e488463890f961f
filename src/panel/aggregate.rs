use super::filename::{Collation, DisplayName, Lexicographic, UrlFilename};
use super::location::{LocationResolver, SelectedLocation};
use super::ordering::{BreakpointOrdering, SelectedLineOrder};
use crate::model::{Breakpoint, Source, SourceId, SourcesMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// One group of the breakpoints panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointSource {
    pub source: Source,
    pub breakpoints: Vec<Breakpoint>,
}

/// Groups breakpoints under the sources they are shown in.
///
/// Each collaborator can be swapped out with the `with_*` builders; the
/// defaults reproduce the debugger's own behaviour.
#[derive(Debug, Clone, Default)]
pub struct BreakpointSourceAggregator<
    R = SelectedLocation,
    O = SelectedLineOrder,
    N = UrlFilename,
    C = Lexicographic,
> {
    resolver: R,
    ordering: O,
    names: N,
    collation: C,
}

impl BreakpointSourceAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R, O, N, C> BreakpointSourceAggregator<R, O, N, C>
where
    R: LocationResolver,
    O: BreakpointOrdering,
    N: DisplayName,
    C: Collation,
{
    pub fn with_resolver<R2: LocationResolver>(self, resolver: R2) -> BreakpointSourceAggregator<R2, O, N, C> {
        BreakpointSourceAggregator {
            resolver,
            ordering: self.ordering,
            names: self.names,
            collation: self.collation,
        }
    }

    pub fn with_ordering<O2: BreakpointOrdering>(self, ordering: O2) -> BreakpointSourceAggregator<R, O2, N, C> {
        BreakpointSourceAggregator {
            resolver: self.resolver,
            ordering,
            names: self.names,
            collation: self.collation,
        }
    }

    pub fn with_names<N2: DisplayName>(self, names: N2) -> BreakpointSourceAggregator<R, O, N2, C> {
        BreakpointSourceAggregator {
            resolver: self.resolver,
            ordering: self.ordering,
            names,
            collation: self.collation,
        }
    }

    pub fn with_collation<C2: Collation>(self, collation: C2) -> BreakpointSourceAggregator<R, O, N, C2> {
        BreakpointSourceAggregator {
            resolver: self.resolver,
            ordering: self.ordering,
            names: self.names,
            collation,
        }
    }

    /// Builds the panel groups for one snapshot of sources and breakpoints.
    ///
    /// Sources that are unknown, black-boxed or left without a listed
    /// breakpoint are omitted. Inputs are only read.
    pub fn aggregate(
        &self,
        sources: &SourcesMap,
        breakpoints: &[Breakpoint],
        selected: Option<&Source>,
    ) -> Vec<BreakpointSource> {
        let listed = self.sorted_sources(sources, breakpoints, selected);

        let ordered: Vec<(&Breakpoint, SourceId)> = self
            .ordering
            .order(breakpoints, selected, &self.resolver)
            .into_iter()
            .filter(|bp| bp.is_listed())
            .map(|bp| (bp, self.resolver.resolve(bp, selected).source_id.clone()))
            .collect();

        let groups: Vec<BreakpointSource> = listed
            .into_iter()
            .filter_map(|source| {
                let breakpoints: Vec<Breakpoint> = ordered
                    .iter()
                    .filter(|(_, id)| *id == source.id)
                    .map(|(bp, _)| (*bp).clone())
                    .collect();
                if breakpoints.is_empty() {
                    return None;
                }
                Some(BreakpointSource {
                    source: source.clone(),
                    breakpoints,
                })
            })
            .collect();

        trace!(
            sources = sources.len(),
            breakpoints = breakpoints.len(),
            groups = groups.len(),
            "aggregated breakpoint sources"
        );
        groups
    }

    /// Distinct, known, non-black-boxed sources referenced by `breakpoints`,
    /// sorted by display name. Equal names fall back to the source id.
    fn sorted_sources<'s>(
        &self,
        sources: &'s SourcesMap,
        breakpoints: &[Breakpoint],
        selected: Option<&Source>,
    ) -> Vec<&'s Source> {
        let mut seen = HashSet::new();
        let mut named: Vec<_> = breakpoints
            .iter()
            .map(|bp| self.resolver.resolve(bp, selected).source_id.clone())
            .filter(|id| seen.insert(id.clone()))
            .filter_map(|id| sources.get(&id))
            .filter(|source| !source.is_black_boxed)
            .map(|source| (self.names.display_name(source), source))
            .collect();

        named.sort_by(|(a_name, a), (b_name, b)| {
            self.collation
                .compare(a_name, b_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        named.into_iter().map(|(_, source)| source).collect()
    }
}

/// Builds the panel groups with the default collaborators.
pub fn aggregate(
    sources: &SourcesMap,
    breakpoints: &[Breakpoint],
    selected: Option<&Source>,
) -> Vec<BreakpointSource> {
    BreakpointSourceAggregator::new().aggregate(sources, breakpoints, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use crate::panel::ordering::InsertionOrder;

    fn sources(list: &[Source]) -> SourcesMap {
        list.iter().map(|s| (s.id.clone(), s.clone())).collect()
    }

    fn group_ids(groups: &[BreakpointSource]) -> Vec<&str> {
        groups.iter().map(|g| g.source.id.as_str()).collect()
    }

    #[test]
    fn hidden_only_source_is_dropped() {
        let map = sources(&[
            Source::new("A", "http://example.com/b.js"),
            Source::new("B", "http://example.com/a.js"),
        ]);
        let bp1 = Breakpoint::at("A", 1).with_text("x");
        let bps = vec![bp1.clone(), Breakpoint::at("B", 1).hidden()];

        let groups = aggregate(&map, &bps, None);
        assert_eq!(
            groups,
            vec![BreakpointSource {
                source: map[&SourceId::from("A")].clone(),
                breakpoints: vec![bp1],
            }]
        );
    }

    #[test]
    fn black_boxed_source_is_excluded() {
        let map = sources(&[
            Source::new("A", "a.js").black_boxed(),
            Source::new("B", "b.js"),
        ]);
        let bps = vec![
            Breakpoint::at("A", 1).with_text("visible"),
            Breakpoint::at("B", 2).with_condition("n == 3"),
        ];

        let groups = aggregate(&map, &bps, None);
        assert_eq!(group_ids(&groups), vec!["B"]);
    }

    #[test]
    fn unknown_sources_are_dropped() {
        let map = sources(&[Source::new("A", "a.js")]);
        let bps = vec![
            Breakpoint::at("ghost", 1).with_text("x"),
            Breakpoint::at("A", 1).with_text("y"),
        ];
        assert_eq!(group_ids(&aggregate(&map, &bps, None)), vec!["A"]);
    }

    #[test]
    fn sources_sorted_by_filename_not_id() {
        let map = sources(&[
            Source::new("1", "http://example.com/zeta.js"),
            Source::new("2", "http://example.com/lib/alpha.js"),
            Source::new("3", "http://example.com/Main.js"),
        ]);
        let bps = vec![
            Breakpoint::at("1", 1).disabled(),
            Breakpoint::at("2", 1).disabled(),
            Breakpoint::at("3", 1).disabled(),
        ];
        assert_eq!(group_ids(&aggregate(&map, &bps, None)), vec!["3", "2", "1"]);
    }

    #[test]
    fn duplicate_filenames_tie_break_on_id() {
        let map = sources(&[
            Source::new("b", "http://one.example/app.js"),
            Source::new("a", "http://two.example/app.js"),
        ]);
        let bps = vec![
            Breakpoint::at("b", 1).disabled(),
            Breakpoint::at("a", 1).disabled(),
        ];
        assert_eq!(group_ids(&aggregate(&map, &bps, None)), vec!["a", "b"]);
    }

    #[test]
    fn breakpoints_without_content_are_filtered() {
        let map = sources(&[Source::new("A", "a.js")]);
        let bps = vec![
            Breakpoint::at("A", 1),
            Breakpoint::at("A", 2).with_original_text("orig"),
        ];
        let groups = aggregate(&map, &bps, None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].breakpoints.len(), 1);
        assert_eq!(groups[0].breakpoints[0].location.line, 2);
    }

    #[test]
    fn breakpoints_ordered_by_line_within_group() {
        let map = sources(&[Source::new("A", "a.js")]);
        let bps = vec![
            Breakpoint::at("A", 30).with_text("c"),
            Breakpoint::at("A", 10).with_text("a"),
            Breakpoint::at("A", 20).with_text("b"),
        ];
        let groups = aggregate(&map, &bps, None);
        let texts: Vec<_> = groups[0]
            .breakpoints
            .iter()
            .map(|bp| bp.text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn mapped_breakpoints_follow_generated_selection() {
        let original = Source::new("app/originalSource-1", "webpack:///src/app.js");
        let bundle = Source::new("bundle", "http://example.com/bundle.js");
        let map = sources(&[original.clone(), bundle.clone()]);
        let bps = vec![Breakpoint::at("app/originalSource-1", 5)
            .with_text("run()")
            .with_generated_location(Location::new("bundle", 900, None))];

        assert_eq!(
            group_ids(&aggregate(&map, &bps, None)),
            vec!["app/originalSource-1"]
        );
        assert_eq!(
            group_ids(&aggregate(&map, &bps, Some(&original))),
            vec!["app/originalSource-1"]
        );
        assert_eq!(group_ids(&aggregate(&map, &bps, Some(&bundle))), vec!["bundle"]);
    }

    #[test]
    fn injected_resolver_drives_breakpoint_order() {
        let map = sources(&[Source::new("A", "a.js")]);
        let bps = vec![
            Breakpoint::at("A", 10).with_text("ten"),
            Breakpoint::at("A", 20).with_text("twenty"),
        ];
        let remap = |bp: &Breakpoint, _: Option<&Source>| {
            let line = if bp.location.line == 10 { 90 } else { 80 };
            Location::new(bp.location.source_id.clone(), line, None)
        };
        let aggregator = BreakpointSourceAggregator::new().with_resolver(remap);

        let groups = aggregator.aggregate(&map, &bps, None);
        let lines: Vec<u32> = groups[0]
            .breakpoints
            .iter()
            .map(|bp| remap(bp, None).line)
            .collect();
        assert_eq!(lines, vec![80, 90]);
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        assert!(aggregate(&SourcesMap::new(), &[], None).is_empty());
    }

    #[test]
    fn injected_collation_changes_source_order() {
        let map = sources(&[Source::new("1", "a.js"), Source::new("2", "b.js")]);
        let bps = vec![
            Breakpoint::at("1", 1).disabled(),
            Breakpoint::at("2", 1).disabled(),
        ];
        let aggregator = BreakpointSourceAggregator::new()
            .with_collation(|a: &str, b: &str| b.cmp(a))
            .with_ordering(InsertionOrder);
        assert_eq!(group_ids(&aggregator.aggregate(&map, &bps, None)), vec!["2", "1"]);
    }

    #[test]
    fn injected_display_names_drive_sorting() {
        let map = sources(&[Source::new("x", "z.js"), Source::new("y", "a.js")]);
        let bps = vec![
            Breakpoint::at("x", 1).disabled(),
            Breakpoint::at("y", 1).disabled(),
        ];
        let aggregator =
            BreakpointSourceAggregator::new().with_names(|s: &Source| s.id.to_string());
        assert_eq!(group_ids(&aggregator.aggregate(&map, &bps, None)), vec!["x", "y"]);
    }
}
