//! Reply grammar: turning raw completion text into typed commands.
//!
//! The contract with the model is two logical lines: free-text reasoning,
//! then `Command: <expr>` where `<expr>` is one or more `;`-separated
//! commands. Only the three whitelisted operations exist — nothing else is
//! reachable from parsed text, and a script is validated in full before any
//! of it executes.

use serde::Serialize;

/// A transient instruction decoded from text and applied exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Command {
    /// Rotate by a delta in degrees, clockwise positive.
    Turn(f64),
    /// Displace along the heading; negative moves backward.
    Move(f64),
    /// Goal reached: end the agent loop.
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandParseError {
    /// The reply had no second line to carry the command.
    MissingCommandLine,
    /// The command line had no `label: expr` colon.
    MissingColon,
    /// The command line's label was not `Command`.
    BadLabel(String),
    /// Not one of `turn(..)`, `move(..)`, `done()`.
    UnknownCommand(String),
    /// Argument missing, non-numeric, or not finite.
    InvalidArgument(String),
    /// The expression after the label was empty.
    EmptyScript,
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandParseError::MissingCommandLine => write!(f, "missing command line"),
            CommandParseError::MissingColon => write!(f, "command line has no colon"),
            CommandParseError::BadLabel(label) => write!(f, "expected Command label, got {label}"),
            CommandParseError::UnknownCommand(expr) => write!(f, "unknown command: {expr}"),
            CommandParseError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            CommandParseError::EmptyScript => write!(f, "empty command expression"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// A successfully decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Line 0, verbatim after trimming.
    pub reasoning: String,
    /// The expression after the `Command:` label, verbatim. This is what the
    /// transcript records.
    pub command_text: String,
    /// The validated script, in execution order.
    pub commands: Vec<Command>,
}

/// Parse a raw completion reply.
///
/// Line 0 is reasoning; line 1 must be `Command: <expr>` with the label
/// matched case-insensitively and the line split on its first colon.
pub fn parse_reply(raw: &str) -> Result<Reply, CommandParseError> {
    let text = crate::agent::prompt::trim_lines(raw);
    let mut lines = text.lines();

    let reasoning = lines
        .next()
        .ok_or(CommandParseError::MissingCommandLine)?
        .to_string();
    let command_line = lines.next().ok_or(CommandParseError::MissingCommandLine)?;

    let (label, expr) = command_line
        .split_once(':')
        .ok_or(CommandParseError::MissingColon)?;
    if !label.trim().eq_ignore_ascii_case("command") {
        return Err(CommandParseError::BadLabel(label.trim().to_string()));
    }

    let command_text = expr.trim().to_string();
    let commands = parse_script(&command_text)?;

    Ok(Reply {
        reasoning,
        command_text,
        commands,
    })
}

/// Parse a `;`-separated command script. Every command must be valid for the
/// script to be accepted; there is no partial result.
pub fn parse_script(expr: &str) -> Result<Vec<Command>, CommandParseError> {
    let commands: Vec<Command> = expr
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_command)
        .collect::<Result<_, _>>()?;
    if commands.is_empty() {
        return Err(CommandParseError::EmptyScript);
    }
    Ok(commands)
}

/// Parse a single `name(arg)` command expression.
pub fn parse_command(expr: &str) -> Result<Command, CommandParseError> {
    let expr = expr.trim();
    let open = expr
        .find('(')
        .ok_or_else(|| CommandParseError::UnknownCommand(expr.to_string()))?;
    if !expr.ends_with(')') {
        return Err(CommandParseError::UnknownCommand(expr.to_string()));
    }
    let name = expr[..open].trim();
    let arg = expr[open + 1..expr.len() - 1].trim();

    match name {
        "turn" => Ok(Command::Turn(parse_number(name, arg)?)),
        "move" => Ok(Command::Move(parse_number(name, arg)?)),
        "done" => {
            if arg.is_empty() {
                Ok(Command::Done)
            } else {
                Err(CommandParseError::InvalidArgument(format!(
                    "done takes no argument, got {arg}"
                )))
            }
        }
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_number(name: &str, arg: &str) -> Result<f64, CommandParseError> {
    let value: f64 = arg
        .parse()
        .map_err(|_| CommandParseError::InvalidArgument(format!("{name}: {arg:?}")))?;
    if !value.is_finite() {
        return Err(CommandParseError::InvalidArgument(format!(
            "{name}: {arg:?} is not finite"
        )));
    }
    Ok(value)
}
