mod protocol;
mod server;

use crate::error::Result;
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

pub use protocol::{DapMessage, DapMessageContent, SourceBreakpoint};
pub use server::DapServer;

/// Serves requests until `disconnect` or end of input.
pub fn serve<R: BufRead, W: Write>(server: &mut DapServer<R, W>) -> Result<()> {
    let mut msg_count = 0u64;

    while let Some(msg) = server.read_message()? {
        msg_count += 1;
        debug!(msg_count, seq = msg.seq, "received message");

        if msg.msg_type != "request" {
            debug!(msg_type = %msg.msg_type, "ignoring non-request message");
            continue;
        }

        match msg.content {
            DapMessageContent::Request { command, arguments } => match command.as_str() {
                "initialize" => server.handle_initialize(msg.seq, command)?,
                "loadedSource" => server.handle_loaded_source(msg.seq, command, arguments)?,
                "setBreakpoints" => server.handle_set_breakpoints(msg.seq, command, arguments)?,
                "blackBox" => server.handle_black_box(msg.seq, command, arguments)?,
                "selectSource" => server.handle_select_source(msg.seq, command, arguments)?,
                "breakpointSources" => server.handle_breakpoint_sources(msg.seq, command)?,
                "configurationDone" => server.send_response(msg.seq, command, true, None)?,
                "disconnect" => {
                    server.send_response(msg.seq, command, true, None)?;
                    break;
                }
                _ => {
                    warn!(%command, "unhandled request");
                    server.send_response(msg.seq, command, false, None)?;
                }
            },
            _ => warn!(seq = msg.seq, "request without a command"),
        }
    }

    info!(messages = msg_count, "server loop finished");
    Ok(())
}

pub fn run_dap_mode() -> Result<()> {
    info!("DAP server starting on stdio");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = DapServer::new(stdin.lock(), stdout.lock());
    serve(&mut server)
}
