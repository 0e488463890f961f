mod commands;

use crate::debugger::DebugContext;
use crate::error::Result;
use crate::model::Source;
use crate::panel::{display_filename, BreakpointSource};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub use commands::{parse_command, ConsoleCommand, HELP};

const PROMPT: &str = "> ";

/// Line-oriented front end over a [`DebugContext`].
pub struct Console<R, W> {
    input: R,
    output: W,
    context: DebugContext,
    prompt: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            context: DebugContext::new(),
            prompt: true,
        }
    }

    /// Suppresses the prompt, for scripted input.
    pub fn without_prompt(mut self) -> Self {
        self.prompt = false;
        self
    }

    pub fn context(&self) -> &DebugContext {
        &self.context
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `quit` or end of input. Bad commands are reported and skipped.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if self.prompt {
                write!(self.output, "{}", PROMPT)?;
                self.output.flush()?;
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(self.output, "error: {}", e)?;
                    continue;
                }
            };
            debug!(?command, "console command");

            if command == ConsoleCommand::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                warn!(error = %e, "console command failed");
                writeln!(self.output, "error: {}", e)?;
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: ConsoleCommand) -> Result<()> {
        match command {
            ConsoleCommand::Source {
                id,
                url,
                black_boxed,
            } => {
                let mut source = Source::new(id, url);
                source.is_black_boxed = black_boxed;
                writeln!(self.output, "loaded {} as {}", source.id, display_filename(&source))?;
                self.context.load_source(source);
            }
            ConsoleCommand::Break(bp) => {
                writeln!(self.output, "breakpoint set at {}", bp.location)?;
                self.context.add_breakpoint(bp);
            }
            ConsoleCommand::Delete(location) => {
                self.context.remove_breakpoint(&location)?;
                writeln!(self.output, "breakpoint removed from {}", location)?;
            }
            ConsoleCommand::Disable(location) => {
                self.context.set_breakpoint_disabled(&location, true)?;
                writeln!(self.output, "breakpoint at {} disabled", location)?;
            }
            ConsoleCommand::Enable(location) => {
                self.context.set_breakpoint_disabled(&location, false)?;
                writeln!(self.output, "breakpoint at {} enabled", location)?;
            }
            ConsoleCommand::BlackBox(id) => {
                let black_boxed = self.context.toggle_black_box(&id)?;
                let state = if black_boxed { "black-boxed" } else { "unblack-boxed" };
                writeln!(self.output, "{} {}", id, state)?;
            }
            ConsoleCommand::Select(id) => {
                self.context.select(id)?;
                match self.context.selected_source() {
                    Some(source) => writeln!(self.output, "selected {}", source.id)?,
                    None => writeln!(self.output, "selection cleared")?,
                }
            }
            ConsoleCommand::List => {
                let groups = self.context.breakpoint_sources();
                print_groups(&mut self.output, &groups)?;
            }
            ConsoleCommand::Help => writeln!(self.output, "{}", HELP)?,
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }
}

/// Writes the panel groups the way the breakpoints pane lists them.
pub fn print_groups<W: Write>(out: &mut W, groups: &[BreakpointSource]) -> Result<()> {
    if groups.is_empty() {
        writeln!(out, "(no breakpoints)")?;
        return Ok(());
    }
    for group in groups {
        writeln!(out, "{} [{}]", display_filename(&group.source), group.source.id)?;
        for bp in &group.breakpoints {
            let position = match bp.location.column {
                Some(column) => format!("{}:{}", bp.location.line, column),
                None => bp.location.line.to_string(),
            };
            let label = bp
                .text
                .as_deref()
                .filter(|t| !t.is_empty())
                .or(bp.original_text.as_deref())
                .unwrap_or("");
            write!(out, "  {:>6}  {}", position, label)?;
            if let Some(condition) = bp.options.condition.as_deref().filter(|c| !c.is_empty()) {
                write!(out, "  if ({})", condition)?;
            }
            if bp.disabled {
                write!(out, "  [disabled]")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
