use crate::model::{Breakpoint, BreakpointOptions, Location, Source, SourceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct DapMessage {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: DapMessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DapMessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub id: SourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedSourceArguments {
    pub source: Source,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackBoxArguments {
    pub source: SourceRef,
    #[serde(default = "default_true")]
    pub black_box: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSourceArguments {
    #[serde(default)]
    pub source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBreakpointsArguments {
    pub source: SourceRef,
    #[serde(default)]
    pub breakpoints: Vec<SourceBreakpoint>,
}

/// One entry of a `setBreakpoints` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakpoint {
    pub line: u32,
    pub column: Option<u32>,
    pub condition: Option<String>,
    pub text: Option<String>,
    pub original_text: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    pub generated_source_id: Option<SourceId>,
    pub generated_line: Option<u32>,
    pub generated_column: Option<u32>,
}

impl SourceBreakpoint {
    pub fn into_breakpoint(self, source_id: &SourceId) -> Breakpoint {
        let generated_location = self.generated_line.map(|line| {
            Location::new(
                self.generated_source_id.unwrap_or_else(|| source_id.clone()),
                line,
                self.generated_column,
            )
        });
        Breakpoint {
            location: Location::new(source_id.clone(), self.line, self.column),
            generated_location,
            options: BreakpointOptions {
                hidden: self.hidden,
                condition: self.condition,
            },
            disabled: self.disabled,
            text: self.text,
            original_text: self.original_text,
        }
    }
}

fn default_true() -> bool {
    true
}
