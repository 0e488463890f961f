use super::protocol::{
    BlackBoxArguments, DapMessage, DapMessageContent, LoadedSourceArguments, SelectSourceArguments,
    SetBreakpointsArguments,
};
use crate::debugger::DebugContext;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::{BufRead, Read, Write};
use tracing::{debug, trace, warn};

const CONTENT_LENGTH: &str = "Content-Length:";
/// Largest message body accepted from the client.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

pub struct DapServer<R, W> {
    seq: u64,
    reader: R,
    writer: W,
    context: DebugContext,
}

impl<R: BufRead, W: Write> DapServer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_context(reader, writer, DebugContext::new())
    }

    pub fn with_context(reader: R, writer: W, context: DebugContext) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
            context,
        }
    }

    pub fn context(&self) -> &DebugContext {
        &self.context
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        body: Option<Value>,
    ) -> Result<()> {
        self.respond(request_seq, command, success, None, body)
    }

    pub fn send_error(&mut self, request_seq: u64, command: String, error: &Error) -> Result<()> {
        warn!(%command, %error, "request failed");
        self.respond(request_seq, command, false, Some(error.to_string()), None)
    }

    fn respond(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> Result<()> {
        let msg = DapMessage {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: DapMessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: String, body: Option<Value>) -> Result<()> {
        let msg = DapMessage {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: DapMessageContent::Event { event, body },
        };
        self.send_message(&msg)
    }

    fn send_message(&mut self, msg: &DapMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "{} {}\r\n\r\n{}", CONTENT_LENGTH, json.len(), json)?;
        self.writer.flush()?;
        trace!(bytes = json.len(), "sent message");
        Ok(())
    }

    /// Reads one framed message; `None` once the stream is exhausted.
    ///
    /// Frames whose body is not a valid message are logged and skipped.
    pub fn read_message(&mut self) -> Result<Option<DapMessage>> {
        loop {
            let Some(buffer) = self.read_frame()? else {
                return Ok(None);
            };
            match serde_json::from_slice::<DapMessage>(&buffer) {
                Ok(msg) => {
                    trace!(?msg, "received message");
                    return Ok(Some(msg));
                }
                Err(error) => {
                    warn!(%error, bytes = buffer.len(), "skipping undecodable message");
                }
            }
        }
    }

    fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut content_length = None;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if content_length.is_some() {
                    break;
                }
                continue;
            }
            if let Some(value) = line.strip_prefix(CONTENT_LENGTH) {
                let length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::Protocol(format!("bad content length: {}", value.trim())))?;
                if length > MAX_MESSAGE_BYTES {
                    return Err(Error::Protocol(format!(
                        "message of {} bytes exceeds the {} byte limit",
                        length, MAX_MESSAGE_BYTES
                    )));
                }
                content_length = Some(length);
            }
        }

        let mut buffer = vec![0u8; content_length.unwrap_or(0)];
        self.reader.read_exact(&mut buffer)?;
        Ok(Some(buffer))
    }

    pub fn handle_initialize(&mut self, seq: u64, command: String) -> Result<()> {
        let body = json!({
            "supportsConfigurationDoneRequest": true,
            "supportsConditionalBreakpoints": true,
            "supportsLoadedSourcesRequest": true,
            "supportsBreakpointSourcesRequest": true,
        });
        self.send_response(seq, command, true, Some(body))?;
        self.send_event("initialized".to_string(), None)
    }

    pub fn handle_loaded_source(&mut self, seq: u64, command: String, args: Option<Value>) -> Result<()> {
        let args: LoadedSourceArguments = match parse_arguments(args) {
            Ok(args) => args,
            Err(e) => return self.send_error(seq, command, &e),
        };
        debug!(id = %args.source.id, "loaded source");
        self.context.load_source(args.source);
        self.send_response(seq, command, true, None)?;
        self.notify_changed()
    }

    pub fn handle_set_breakpoints(&mut self, seq: u64, command: String, args: Option<Value>) -> Result<()> {
        let args: SetBreakpointsArguments = match parse_arguments(args) {
            Ok(args) => args,
            Err(e) => return self.send_error(seq, command, &e),
        };
        let source_id = args.source.id;
        let verified = self.context.sources().get(&source_id).is_some();

        let mut reported = Vec::with_capacity(args.breakpoints.len());
        let mut breakpoints = Vec::with_capacity(args.breakpoints.len());
        for entry in args.breakpoints {
            reported.push(json!({
                "verified": verified,
                "line": entry.line,
                "column": entry.column,
            }));
            breakpoints.push(entry.into_breakpoint(&source_id));
        }

        self.context.set_breakpoints(&source_id, breakpoints);
        self.send_response(seq, command, true, Some(json!({ "breakpoints": reported })))?;
        self.notify_changed()
    }

    pub fn handle_black_box(&mut self, seq: u64, command: String, args: Option<Value>) -> Result<()> {
        let result = parse_arguments::<BlackBoxArguments>(args).and_then(|args| {
            self.context
                .set_black_boxed(&args.source.id, args.black_box)
                .map(|()| args.black_box)
        });
        match result {
            Ok(black_boxed) => {
                self.send_response(seq, command, true, Some(json!({ "isBlackBoxed": black_boxed })))?;
                self.notify_changed()
            }
            Err(e) => self.send_error(seq, command, &e),
        }
    }

    pub fn handle_select_source(&mut self, seq: u64, command: String, args: Option<Value>) -> Result<()> {
        let result = parse_arguments::<SelectSourceArguments>(args)
            .and_then(|args| self.context.select(args.source.map(|s| s.id)));
        match result {
            Ok(()) => {
                self.send_response(seq, command, true, None)?;
                self.notify_changed()
            }
            Err(e) => self.send_error(seq, command, &e),
        }
    }

    pub fn handle_breakpoint_sources(&mut self, seq: u64, command: String) -> Result<()> {
        let groups = self.context.breakpoint_sources();
        let groups = serde_json::to_value(&*groups)?;
        self.send_response(seq, command, true, Some(json!({ "groups": groups })))
    }

    fn notify_changed(&mut self) -> Result<()> {
        let groups = self.context.breakpoint_sources().len();
        self.send_event(
            "breakpointSourcesChanged".to_string(),
            Some(json!({ "groups": groups })),
        )
    }
}

fn parse_arguments<T: DeserializeOwned>(args: Option<Value>) -> Result<T> {
    let args = args.ok_or_else(|| Error::Protocol("missing arguments".to_string()))?;
    Ok(serde_json::from_value(args)?)
}
