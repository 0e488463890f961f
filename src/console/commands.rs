use crate::error::{Error, Result};
use crate::model::{Breakpoint, Location, SourceId};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Source {
        id: SourceId,
        url: String,
        black_boxed: bool,
    },
    Break(Breakpoint),
    Delete(Location),
    Disable(Location),
    Enable(Location),
    BlackBox(SourceId),
    Select(Option<SourceId>),
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  source <id> <url> [--blackboxed]
  break <source> <line>[:<col>] [--condition C] [--text T] [--original-text T] [--disabled] [--hidden]
  delete|disable|enable <source> <line>[:<col>]
  blackbox <id>
  select <id>|none
  list
  help
  quit";

/// Parses one console line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = shlex::split(trimmed)
        .ok_or_else(|| Error::Command(format!("unbalanced quotes in: {}", trimmed)))?;
    let (name, rest) = match tokens.split_first() {
        Some((name, rest)) => (name.to_lowercase(), rest),
        None => return Ok(None),
    };

    let command = match name.as_str() {
        "source" | "src" => parse_source(rest)?,
        "break" | "b" => ConsoleCommand::Break(parse_break(rest)?),
        "delete" | "d" => ConsoleCommand::Delete(parse_location(rest)?),
        "disable" => ConsoleCommand::Disable(parse_location(rest)?),
        "enable" => ConsoleCommand::Enable(parse_location(rest)?),
        "blackbox" => ConsoleCommand::BlackBox(single_id(rest, "blackbox <id>")?),
        "select" => match rest {
            [id] if id == "none" => ConsoleCommand::Select(None),
            [id] => ConsoleCommand::Select(Some(SourceId::new(id.as_str()))),
            _ => return Err(usage("select <id>|none")),
        },
        "list" | "l" => ConsoleCommand::List,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => return Err(Error::Command(format!("unknown command: {}", other))),
    };
    Ok(Some(command))
}

fn parse_source(args: &[String]) -> Result<ConsoleCommand> {
    let mut positional = Vec::new();
    let mut black_boxed = false;
    for arg in args {
        match arg.as_str() {
            "--blackboxed" => black_boxed = true,
            flag if flag.starts_with("--") => {
                return Err(Error::Command(format!("unknown flag: {}", flag)))
            }
            _ => positional.push(arg.as_str()),
        }
    }
    match positional.as_slice() {
        [id, url] => Ok(ConsoleCommand::Source {
            id: SourceId::new(*id),
            url: url.to_string(),
            black_boxed,
        }),
        _ => Err(usage("source <id> <url> [--blackboxed]")),
    }
}

fn parse_break(args: &[String]) -> Result<Breakpoint> {
    let (target, flags) = args
        .split_at_checked(2)
        .ok_or_else(|| usage("break <source> <line>[:<col>] [flags]"))?;
    let mut bp = Breakpoint::new(parse_location(target)?);

    let mut flags = flags.iter();
    while let Some(flag) = flags.next() {
        match flag.as_str() {
            "--disabled" => bp.disabled = true,
            "--hidden" => bp.options.hidden = true,
            "--condition" => bp.options.condition = Some(flag_value(&mut flags, flag)?),
            "--text" => bp.text = Some(flag_value(&mut flags, flag)?),
            "--original-text" => bp.original_text = Some(flag_value(&mut flags, flag)?),
            other => return Err(Error::Command(format!("unknown flag: {}", other))),
        }
    }
    Ok(bp)
}

fn flag_value<'a>(flags: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String> {
    flags
        .next()
        .cloned()
        .ok_or_else(|| Error::Command(format!("{} needs a value", flag)))
}

/// `<source> <line>[:<col>]`
fn parse_location(args: &[String]) -> Result<Location> {
    let [source, position] = args else {
        return Err(usage("<source> <line>[:<col>]"));
    };
    let (line, column) = match position.split_once(':') {
        Some((line, column)) => (line, Some(parse_number(column)?)),
        None => (position.as_str(), None),
    };
    Ok(Location::new(source.as_str(), parse_number(line)?, column))
}

fn parse_number(text: &str) -> Result<u32> {
    text.parse()
        .map_err(|_| Error::Command(format!("not a number: {}", text)))
}

fn single_id(args: &[String], usage_text: &str) -> Result<SourceId> {
    match args {
        [id] => Ok(SourceId::new(id.as_str())),
        _ => Err(usage(usage_text)),
    }
}

fn usage(text: &str) -> Error {
    Error::Command(format!("usage: {}", text))
}
