//! Offline input for the `aggregate` command: a JSON file holding sources,
//! breakpoints and an optional selected source id.

use crate::error::Result;
use crate::model::{Breakpoint, Source, SourceId, SourcesMap};
use crate::panel::{aggregate, BreakpointSource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub breakpoints: Vec<Breakpoint>,
    #[serde(default)]
    pub selected: Option<SourceId>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let snapshot = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            sources = snapshot.sources.len(),
            breakpoints = snapshot.breakpoints.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn sources_map(&self) -> SourcesMap {
        self.sources
            .iter()
            .map(|source| (source.id.clone(), source.clone()))
            .collect()
    }

    /// Groups the snapshot with the default collaborators. A selected id
    /// that names no source is ignored.
    pub fn aggregate(&self) -> Vec<BreakpointSource> {
        let sources = self.sources_map();
        let selected = self.selected.as_ref().and_then(|id| {
            let found = sources.get(id);
            if found.is_none() {
                warn!(id = %id, "selected source is not in the snapshot");
            }
            found
        });
        aggregate(&sources, &self.breakpoints, selected)
    }
}
