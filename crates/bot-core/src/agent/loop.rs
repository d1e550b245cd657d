use crate::agent::memory::{ConversationEntry, ConversationLog};
use crate::agent::prompt::{render_transcript, PromptConfig};

/// The agent's conversational state: goal, prompt configuration, the full
/// audit log, and the most recent recoverable error.
///
/// The loop-enable flag lives in `SimState` — `done()` is actuation, so it
/// flows through the same mutation path as `turn`/`move`.
#[derive(Debug)]
pub struct AgentLoop {
    pub goal: String,
    pub prompt_cfg: PromptConfig,
    pub log: ConversationLog,
    /// Last transport/parse diagnostic; never shown in the transcript.
    pub last_error: Option<String>,
}

impl AgentLoop {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            prompt_cfg: PromptConfig::default(),
            log: ConversationLog::default(),
            last_error: None,
        }
    }

    fn open_entry(&self, state_text: &str) -> ConversationEntry {
        ConversationEntry {
            goal: self.goal.clone(),
            state: state_text.to_string(),
            reasoning: None,
            command: None,
        }
    }

    /// The prompt sent to the completion service: preamble, the bounded
    /// context window, and the open entry for this turn.
    pub fn build_prompt(&self, state_text: &str) -> String {
        let mut entries: Vec<ConversationEntry> =
            self.log.tail(self.prompt_cfg.context_window).to_vec();
        entries.push(self.open_entry(state_text));
        render_transcript(&self.prompt_cfg.preamble, &entries)
    }

    /// The display transcript: preamble and the *full* log, optionally with
    /// the open entry for the turn in progress.
    pub fn render_full(&self, open_state_text: Option<&str>) -> String {
        let mut entries: Vec<ConversationEntry> = self.log.entries().to_vec();
        if let Some(state_text) = open_state_text {
            entries.push(self.open_entry(state_text));
        }
        render_transcript(&self.prompt_cfg.preamble, &entries)
    }
}
