//! Prompt protocol: rendering state + history into the completion prompt.
//!
//! The prompt is one linear transcript: a fixed preamble describing the room
//! and the command grammar, then one `Entry: N` block per history item, then
//! an open entry for the current turn that ends on a bare `Reasoning:` label
//! to cue the model. Formatting is canonical — every line trimmed, entries
//! separated by a single blank line — so transcripts reproduce exactly.

use crate::agent::memory::ConversationEntry;
use crate::sensor::Perception;

/// The bot's persona name inside prompts and state sentences.
pub const BOT_NAME: &str = "Scout";

/// World rules and command grammar, with worked examples. Ends right before
/// the rendered conversation.
pub const DEFAULT_PREAMBLE: &str = r#"This is an interaction between Scout and its Goal, with State and Entries.
Scout is a bot that moves and turns in a room with specific commands.
The room is a square with a side length of 500.
Scout cannot leave the room.
State is the current state of Scout, including its position, heading, and what it sees.
The heading is the direction Scout is facing, in degrees, with 0 being north, 90 being east, 180 being south, and -90 being west.
Scout is precise and never fails to provide a command immediately.
Scout is an expert at navigating the room.
Scout is logical and reasons well.
Scout is very good at spatial reasoning.
Scout is very good at planning.
Scout is very good at explaining its reasoning.
Scout moves slowly and deliberately.
Scout turns slowly and deliberately.
Scout is very good at understanding the Goal.
Scout is very good at knowing when it has completed the Goal.
Scout uses the shortest set of commands to complete the Goal.
Scout can move in any increment, for example 10 steps, 17 steps, or 33 steps.
Scout can turn in any increment, for example 15 degrees, -8 degrees, or 24 degrees.
Before Scout claims to complete the Goal, Scout reasons about the Goal and its State.
Before Scout claims to complete the Goal, Scout ensures that it has completed the Goal.
When Scout is stuck, or repeating itself, it tries new commands with new parameters.
Scout must separate multiple commands with a semicolon.
Scout must not respond with markdown.
Scout's response absolutely must not contain triple backticks (```).
Scout's command must start with the function name, including parentheses, and parameters.
Scout's command must be lower-case.

Scout can move forward in the direction of its heading with the command move(<steps>);.
For example, move(14); will move Scout forward by 14 steps.
For example, move(-11); will move Scout backward by 11 steps.

Scout can turn with the command turn(<degrees>);.
For example, turn(36); will turn Scout 36 degrees clockwise.
For example, turn(-12); will turn Scout 12 degrees counter-clockwise.

Scout can complete the goal with the command done();.
When Scout is done, Scout must respond with the command done();.

Scout must provide a short explanation of its reasoning before providing the commands on a new line.

<example>
Entry: 0
Goal: Get within 20 units of the east wall.
State: Scout is at (450, 30). Scout's heading is 0 degrees. Scout is facing the north wall. The north wall is 30 units away.
Reasoning: Scout is 50 units away from the east wall. Scout will turn clockwise to face the east wall.
Command: turn(90);

Entry: 1
Goal: Get within 20 units of the east wall.
State: Scout is at (450, 30). Scout's heading is 90 degrees. Scout is facing the east wall. The east wall is 50 units away.
Reasoning: Scout is 50 units away from the east wall. Scout will move 35 units forward.
Command: move(35);
</example>

The task begins with the following conversation:"#;

#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub preamble: String,
    /// How many closed history entries feed the next prompt. Display always
    /// gets the whole log; this only bounds the model's context.
    pub context_window: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            context_window: 2,
        }
    }
}

/// Canonicalize whitespace: trim the whole string, trim every line, keep
/// interior blank lines.
pub fn trim_lines(s: &str) -> String {
    s.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fixed human-readable state sentence. Deterministic given a perception.
pub fn state_sentence(p: &Perception) -> String {
    match &p.wall_in_sight {
        Some(wall) => format!(
            "{BOT_NAME} is at ({}, {}). {BOT_NAME}'s heading is {} degrees. {BOT_NAME} is facing the {} wall. The {} wall is {} units away.",
            p.x, p.y, p.heading, wall.name, wall.name, wall.distance
        ),
        None => format!(
            "{BOT_NAME} is at ({}, {}). {BOT_NAME}'s heading is {} degrees. {BOT_NAME} does not see a wall.",
            p.x, p.y, p.heading
        ),
    }
}

/// Render one entry block. `index` is relative to the rendered window.
fn render_entry(index: usize, entry: &ConversationEntry) -> String {
    let mut lines = vec![
        format!("Entry: {index}"),
        format!("Goal: {}", entry.goal),
        format!("State: {}", entry.state),
        format!("Reasoning: {}", entry.reasoning.as_deref().unwrap_or("")),
    ];
    if let Some(command) = &entry.command {
        lines.push(format!("Command: {command}"));
    }
    lines.join("\n")
}

/// Render the preamble plus the given entries into one prompt/transcript.
pub fn render_transcript(preamble: &str, entries: &[ConversationEntry]) -> String {
    let blocks: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| render_entry(i, entry))
        .collect();
    trim_lines(&format!("{preamble}\n\n{}", blocks.join("\n\n")))
}
