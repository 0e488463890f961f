use crate::error::{Error, Result};
use crate::model::{Breakpoint, BreakpointRegistry, Location, Source, SourceId, SourceRegistry};
use crate::panel::{BreakpointSource, MemoizedBreakpointSources, SnapshotKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Live debugger state behind the breakpoints panel.
#[derive(Debug, Default)]
pub struct DebugContext {
    sources: SourceRegistry,
    breakpoints: BreakpointRegistry,
    selected: Option<SourceId>,
    panel: MemoizedBreakpointSources,
}

impl DebugContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn breakpoints(&self) -> &BreakpointRegistry {
        &self.breakpoints
    }

    /// The selected source, if it is still loaded.
    pub fn selected_source(&self) -> Option<&Source> {
        self.selected.as_ref().and_then(|id| self.sources.get(id))
    }

    pub fn load_source(&mut self, source: Source) {
        self.sources.insert(source);
    }

    pub fn unload_source(&mut self, id: &SourceId) -> Result<Source> {
        let removed = self.sources.remove(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }

    pub fn set_black_boxed(&mut self, id: &SourceId, black_boxed: bool) -> Result<()> {
        self.sources.set_black_boxed(id, black_boxed)
    }

    pub fn toggle_black_box(&mut self, id: &SourceId) -> Result<bool> {
        self.sources.toggle_black_box(id)
    }

    /// Selects a loaded source, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<SourceId>) -> Result<()> {
        if let Some(id) = &id {
            if self.sources.get(id).is_none() {
                return Err(Error::UnknownSource(id.clone()));
            }
        }
        debug!(selected = ?id, "selection changed");
        self.selected = id;
        Ok(())
    }

    pub fn add_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoints.add(breakpoint);
    }

    pub fn remove_breakpoint(&mut self, location: &Location) -> Result<Breakpoint> {
        self.breakpoints.remove(location)
    }

    pub fn set_breakpoints(&mut self, source_id: &SourceId, breakpoints: Vec<Breakpoint>) {
        info!(source = %source_id, count = breakpoints.len(), "setting breakpoints");
        self.breakpoints.set_for_source(source_id, breakpoints);
    }

    pub fn set_breakpoint_disabled(&mut self, location: &Location, disabled: bool) -> Result<()> {
        self.breakpoints.set_disabled(location, disabled)
    }

    pub fn set_breakpoint_condition(&mut self, location: &Location, condition: Option<String>) -> Result<()> {
        self.breakpoints.set_condition(location, condition)
    }

    pub fn set_breakpoint_hidden(&mut self, location: &Location, hidden: bool) -> Result<()> {
        self.breakpoints.set_hidden(location, hidden)
    }

    fn snapshot_key(&self) -> SnapshotKey {
        SnapshotKey {
            sources_version: self.sources.version(),
            breakpoints_version: self.breakpoints.version(),
            selected: self.selected_source().map(|s| s.id.clone()),
        }
    }

    /// Panel groups for the current state; cached until something changes.
    pub fn breakpoint_sources(&mut self) -> Arc<Vec<BreakpointSource>> {
        let key = self.snapshot_key();
        let selected = self.selected.as_ref().and_then(|id| self.sources.get(id));
        self.panel.get(
            key,
            self.sources.sources(),
            self.breakpoints.list(),
            selected,
        )
    }
}
