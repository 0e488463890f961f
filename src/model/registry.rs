use super::types::{Breakpoint, Location, Source, SourceId, SourcesMap};
use crate::error::{Error, Result};
use tracing::debug;

/// Loaded sources, keyed by id. Every mutation bumps `version`.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: SourcesMap,
    version: u64,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn sources(&self) -> &SourcesMap {
        &self.sources
    }

    pub fn get(&self, id: &SourceId) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Inserts or replaces a source, returning the previous record.
    pub fn insert(&mut self, source: Source) -> Option<Source> {
        debug!(id = %source.id, url = %source.url, "source loaded");
        self.version += 1;
        self.sources.insert(source.id.clone(), source)
    }

    pub fn remove(&mut self, id: &SourceId) -> Result<Source> {
        let removed = self
            .sources
            .remove(id)
            .ok_or_else(|| Error::UnknownSource(id.clone()))?;
        self.version += 1;
        debug!(id = %id, "source removed");
        Ok(removed)
    }

    pub fn set_black_boxed(&mut self, id: &SourceId, black_boxed: bool) -> Result<()> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| Error::UnknownSource(id.clone()))?;
        source.is_black_boxed = black_boxed;
        self.version += 1;
        debug!(id = %id, black_boxed, "black box state changed");
        Ok(())
    }

    /// Flips the black box flag and returns the new state.
    pub fn toggle_black_box(&mut self, id: &SourceId) -> Result<bool> {
        let current = self
            .get(id)
            .map(|s| s.is_black_boxed)
            .ok_or_else(|| Error::UnknownSource(id.clone()))?;
        self.set_black_boxed(id, !current)?;
        Ok(!current)
    }
}

/// Breakpoints in insertion order; at most one per original location.
#[derive(Debug, Default)]
pub struct BreakpointRegistry {
    breakpoints: Vec<Breakpoint>,
    version: u64,
}

impl BreakpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn list(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn get(&self, location: &Location) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| &bp.location == location)
    }

    /// Adds a breakpoint, replacing any existing one at the same location in place.
    pub fn add(&mut self, breakpoint: Breakpoint) {
        debug!(location = %breakpoint.location, "breakpoint set");
        self.version += 1;
        match self
            .breakpoints
            .iter_mut()
            .find(|bp| bp.location == breakpoint.location)
        {
            Some(existing) => *existing = breakpoint,
            None => self.breakpoints.push(breakpoint),
        }
    }

    pub fn remove(&mut self, location: &Location) -> Result<Breakpoint> {
        let index = self.position(location)?;
        self.version += 1;
        debug!(location = %location, "breakpoint removed");
        Ok(self.breakpoints.remove(index))
    }

    /// Removes every breakpoint whose original location is in `source_id`.
    pub fn remove_for_source(&mut self, source_id: &SourceId) -> usize {
        let before = self.breakpoints.len();
        self.breakpoints
            .retain(|bp| &bp.location.source_id != source_id);
        let removed = before - self.breakpoints.len();
        if removed > 0 {
            self.version += 1;
            debug!(source = %source_id, removed, "breakpoints cleared for source");
        }
        removed
    }

    /// Replaces all breakpoints of `source_id` with `breakpoints`.
    ///
    /// Entries whose location points elsewhere are rebased onto `source_id`.
    pub fn set_for_source(&mut self, source_id: &SourceId, breakpoints: Vec<Breakpoint>) {
        self.breakpoints
            .retain(|bp| &bp.location.source_id != source_id);
        for mut bp in breakpoints {
            if &bp.location.source_id != source_id {
                bp.location.source_id = source_id.clone();
            }
            match self
                .breakpoints
                .iter_mut()
                .find(|existing| existing.location == bp.location)
            {
                Some(existing) => *existing = bp,
                None => self.breakpoints.push(bp),
            }
        }
        self.version += 1;
        debug!(source = %source_id, "breakpoints replaced for source");
    }

    pub fn set_disabled(&mut self, location: &Location, disabled: bool) -> Result<()> {
        self.update(location, |bp| bp.disabled = disabled)
    }

    pub fn set_condition(&mut self, location: &Location, condition: Option<String>) -> Result<()> {
        self.update(location, |bp| bp.options.condition = condition)
    }

    pub fn set_hidden(&mut self, location: &Location, hidden: bool) -> Result<()> {
        self.update(location, |bp| bp.options.hidden = hidden)
    }

    fn update(&mut self, location: &Location, f: impl FnOnce(&mut Breakpoint)) -> Result<()> {
        let index = self.position(location)?;
        f(&mut self.breakpoints[index]);
        self.version += 1;
        debug!(location = %location, "breakpoint updated");
        Ok(())
    }

    fn position(&self, location: &Location) -> Result<usize> {
        self.breakpoints
            .iter()
            .position(|bp| &bp.location == location)
            .ok_or_else(|| Error::UnknownBreakpoint(location.clone()))
    }
}
