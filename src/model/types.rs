use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Marker that distinguishes source-mapped (original) ids from generated ones.
const ORIGINAL_ID_MARKER: &str = "/originalSource";

/// Unique identifier of a loaded source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id names a source reached through a source map.
    pub fn is_original(&self) -> bool {
        self.0.contains(ORIGINAL_ID_MARKER)
    }

    pub fn is_generated(&self) -> bool {
        !self.is_original()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A loaded file as the debugger knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: SourceId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_black_boxed: bool,
}

impl Source {
    pub fn new(id: impl Into<SourceId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            is_black_boxed: false,
        }
    }

    pub fn black_boxed(mut self) -> Self {
        self.is_black_boxed = true;
        self
    }
}

/// Sources keyed by id, as handed to the aggregator.
pub type SourcesMap = HashMap<SourceId, Source>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub source_id: SourceId,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn new(source_id: impl Into<SourceId>, line: u32, column: Option<u32>) -> Self {
        Self {
            source_id: source_id.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.source_id, self.line, column),
            None => write!(f, "{}:{}", self.source_id, self.line),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointOptions {
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A user-set pause location.
///
/// `location` is the (possibly source-mapped) original position;
/// `generated_location` is where the engine actually pauses. When no
/// generated location is known the original one is used for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_location: Option<Location>,
    #[serde(default)]
    pub options: BreakpointOptions,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl Breakpoint {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            generated_location: None,
            options: BreakpointOptions::default(),
            disabled: false,
            text: None,
            original_text: None,
        }
    }

    pub fn at(source_id: impl Into<SourceId>, line: u32) -> Self {
        Self::new(Location::new(source_id, line, None))
    }

    pub fn with_generated_location(mut self, location: Location) -> Self {
        self.generated_location = Some(location);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_original_text(mut self, text: impl Into<String>) -> Self {
        self.original_text = Some(text.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.options.condition = Some(condition.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.options.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn generated_or_original(&self) -> &Location {
        self.generated_location.as_ref().unwrap_or(&self.location)
    }

    /// Whether the breakpoint has anything the panel can show for it.
    ///
    /// Empty strings count as absent.
    pub fn is_listed(&self) -> bool {
        if self.options.hidden {
            return false;
        }
        non_empty(&self.text)
            || non_empty(&self.original_text)
            || non_empty(&self.options.condition)
            || self.disabled
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}
