//! One deterministic "tick" of the agent loop.
//!
//! The tick is intentionally small and pure: it owns no timers, threads, or
//! network clients. The runner owns pacing (a fixed minimum inter-step
//! interval) and decides what to do with transport errors; this module only
//! sequences perceive -> prompt -> complete -> parse -> execute.

use std::future::Future;
use std::pin::Pin;

use crate::agent::r#loop::AgentLoop;
use crate::agent::memory::ConversationEntry;
use crate::agent::prompt::{state_sentence, trim_lines};
use crate::agent::wire::{parse_reply, Command, CommandParseError};
use crate::sensor::{perceive, SensorConfig};
use crate::world::sim::SimState;

/// Boundary to the completion service.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The loop is disabled; nothing was perceived or executed.
    Stopped,
    /// A reply parsed and its commands ran. `halted` is set when the script
    /// reached `done()` (any commands after it are discarded).
    Acted {
        commands: Vec<Command>,
        halted: bool,
    },
    /// The reply failed the command grammar. Nothing was executed; the
    /// error is recorded in `AgentLoop::last_error`.
    Rejected { error: CommandParseError },
}

/// Run one agent cycle against the simulation.
///
/// Transport failures (service unreachable, non-2xx, bad JSON) surface as
/// `Err`; they mutate nothing and the caller is expected to log and keep
/// ticking. Parse failures are `Ok(Rejected { .. })` for the same reason.
pub async fn tick(
    agent: &mut AgentLoop,
    sim: &mut SimState,
    llm: &dyn LlmClient,
    sensor_cfg: &SensorConfig,
) -> anyhow::Result<TickOutcome> {
    // Cooperative cancellation: checked at the top of every cycle.
    if !sim.run_enabled {
        return Ok(TickOutcome::Stopped);
    }

    let perception = perceive(sim, sensor_cfg);
    let state_text = state_sentence(&perception);
    let prompt = agent.build_prompt(&state_text);

    let raw = match llm.complete(prompt).await {
        Ok(raw) => trim_lines(&raw),
        Err(err) => {
            agent.last_error = Some(format!("{err:#}"));
            return Err(err);
        }
    };

    // A reply that lands after an external stop is discarded, not executed.
    if !sim.run_enabled {
        return Ok(TickOutcome::Stopped);
    }

    let reply = match parse_reply(&raw) {
        Ok(reply) => reply,
        Err(error) => {
            agent.last_error = Some(error.to_string());
            return Ok(TickOutcome::Rejected { error });
        }
    };
    agent.last_error = None;

    // Audit first, then act: the full log records the turn even when the
    // script halts the loop.
    agent.log.push(ConversationEntry {
        goal: agent.goal.clone(),
        state: state_text,
        reasoning: Some(reply.reasoning.clone()),
        command: Some(reply.command_text.clone()),
    });

    let mut executed = Vec::new();
    let mut halted = false;
    for command in &reply.commands {
        sim.apply(command);
        executed.push(*command);
        if matches!(command, Command::Done) {
            halted = true;
            break;
        }
    }

    Ok(TickOutcome::Acted {
        commands: executed,
        halted,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeLlm {
        responses: Mutex<VecDeque<anyhow::Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn push_response(&self, raw: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(raw.into()));
        }

        fn push_failure(&self, msg: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(anyhow::anyhow!("{msg}")));
        }

        fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn prompt(&self, i: usize) -> String {
            self.prompts.lock().unwrap()[i].clone()
        }
    }

    impl LlmClient for FakeLlm {
        fn complete<'a>(
            &'a self,
            prompt: String,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
            Box::pin(async move {
                self.prompts.lock().unwrap().push(prompt);
                self.responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| anyhow::bail!("no response queued"))
            })
        }
    }

    fn setup() -> (AgentLoop, SimState, FakeLlm) {
        (
            AgentLoop::new("Get within 20 units of the north wall."),
            SimState::default(),
            FakeLlm::default(),
        )
    }

    #[tokio::test]
    async fn full_cycle_executes_the_parsed_command() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        llm.push_response("Moving toward the wall.\nCommand: move(10);");

        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(
            out,
            TickOutcome::Acted {
                commands: vec![Command::Move(10.0)],
                halted: false
            }
        );

        // Facing north from the center: y decreased by 10.
        assert!((sim.pose.y - 240.0).abs() < 1e-9);
        assert_eq!(agent.log.len(), 1);
        let entry = &agent.log.entries()[0];
        assert_eq!(entry.reasoning.as_deref(), Some("Moving toward the wall."));
        assert_eq!(entry.command.as_deref(), Some("move(10);"));
        assert!(agent.last_error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn parse_failure_mutates_nothing() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        let before = sim.pose;
        llm.push_response("only one rambling line");

        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(
            out,
            TickOutcome::Rejected {
                error: CommandParseError::MissingCommandLine
            }
        );
        assert_eq!(sim.pose, before);
        assert!(agent.log.is_empty());
        assert!(agent.last_error.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_mutates_nothing_and_bubbles_up() {
        let (mut agent, mut sim, llm) = setup();
        let before = sim.pose;
        llm.push_failure("connection refused");

        let err = tick(&mut agent, &mut sim, &llm, &SensorConfig::default())
            .await
            .unwrap_err();
        assert!(format!("{err}").contains("connection refused"));
        assert_eq!(sim.pose, before);
        assert!(agent.log.is_empty());
        assert!(agent.last_error.is_some());
    }

    #[tokio::test]
    async fn done_stops_the_loop_and_later_ticks_are_inert() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        llm.push_response("Goal reached.\nCommand: done();");

        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(
            out,
            TickOutcome::Acted {
                commands: vec![Command::Done],
                halted: true
            }
        );
        assert!(!sim.run_enabled);

        // Next cycle: stopped before perceiving or polling the service.
        let pose = sim.pose;
        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(out, TickOutcome::Stopped);
        assert_eq!(sim.pose, pose);
        assert_eq!(llm.prompt_count(), 1);
        assert_eq!(agent.log.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn commands_after_done_are_discarded() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        let before = sim.pose;
        llm.push_response("Finishing.\nCommand: done(); move(50);");

        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(
            out,
            TickOutcome::Acted {
                commands: vec![Command::Done],
                halted: true
            }
        );
        assert_eq!(sim.pose, before);
        Ok(())
    }

    #[tokio::test]
    async fn externally_stopped_loop_never_polls_the_service() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        llm.push_response("Should never be requested.\nCommand: move(50);");

        sim.run_enabled = false;
        let before = sim.pose;
        let out = tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        assert_eq!(out, TickOutcome::Stopped);
        assert_eq!(sim.pose, before);
        assert_eq!(llm.prompt_count(), 0);
        assert!(agent.log.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn prompt_window_is_bounded_to_two_entries() -> anyhow::Result<()> {
        let (mut agent, mut sim, llm) = setup();
        for i in 0..4 {
            llm.push_response(format!("step {i}.\nCommand: turn(5);"));
            tick(&mut agent, &mut sim, &llm, &SensorConfig::default()).await?;
        }
        assert_eq!(agent.log.len(), 4);

        // The 4th prompt was built from entries 1 and 2 plus the open entry.
        let prompt = llm.prompt(3);
        assert!(prompt.contains("step 1."));
        assert!(prompt.contains("step 2."));
        assert!(!prompt.contains("step 0."));
        assert!(prompt.contains("Entry: 2"));
        assert!(!prompt.contains("Entry: 3"));
        Ok(())
    }
}
