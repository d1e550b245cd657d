//! Agent framework: command grammar, prompt protocol, conversation log, and
//! the control-loop harness.
//!
//! The contract with the completion service is locked down here: a reply is
//! two logical lines (reasoning, then `Command: <expr>`) and only the three
//! whitelisted commands can reach the simulation.

pub mod harness;
pub mod r#loop;
pub mod memory;
pub mod prompt;
pub mod wire;

pub use harness::{tick, LlmClient, TickOutcome};
pub use r#loop::AgentLoop;
pub use wire::{parse_command, parse_reply, parse_script, Command, CommandParseError, Reply};
