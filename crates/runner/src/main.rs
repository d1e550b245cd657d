use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use roombot_core::agent::{tick, AgentLoop, LlmClient, TickOutcome};
use roombot_core::llm::{default_stop_sequences, query_completion, CompletionConfig};
use roombot_core::sensor::{perceive, SensorConfig};
use roombot_core::world::SimState;

mod config;

use config::RunnerConfig;

struct ServiceLlm {
    cfg: CompletionConfig,
}

impl LlmClient for ServiceLlm {
    fn complete<'a>(
        &'a self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move { query_completion(&prompt, &self.cfg).await })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = RunnerConfig::load()?;
    println!(
        "runner.start endpoint={} pace_ms={} things={} seed={}",
        cfg.endpoint,
        cfg.pace_ms,
        cfg.num_things,
        cfg.seed.map(|s| s.to_string()).unwrap_or_default(),
    );

    let mut sim = SimState::default();
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    sim.spawn_things(&mut rng, cfg.num_things);

    let mut agent = AgentLoop::new(cfg.goal.clone());
    let llm = ServiceLlm {
        cfg: CompletionConfig {
            endpoint: cfg.endpoint.clone(),
            stop: default_stop_sequences(),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
        },
    };
    let sensor_cfg = SensorConfig::default();

    // The interval is the loop's minimum inter-step delay; it also keeps the
    // transcript readable and the service unhammered on fast failures.
    let mut pace = tokio::time::interval(Duration::from_millis(cfg.pace_ms));
    loop {
        pace.tick().await;

        let perception = perceive(&mut sim, &sensor_cfg);
        println!("bot.state {}", serde_json::to_string(&perception)?);

        match tick(&mut agent, &mut sim, &llm, &sensor_cfg).await {
            Ok(TickOutcome::Stopped) => {
                println!("agent.loop.stopped entries={}", agent.log.len());
                break;
            }
            Ok(TickOutcome::Acted { commands, halted }) => {
                println!(
                    "agent.tick outcome=acted commands={} halted={halted}",
                    commands.len()
                );
                // The audit display always shows the whole conversation, not
                // just the bounded window the model sees.
                println!("{}\n", agent.render_full(None));
            }
            // Recoverable per-tick failures: log and keep pacing.
            Ok(TickOutcome::Rejected { error }) => {
                eprintln!("agent.tick.rejected error={error}");
            }
            Err(err) => {
                eprintln!("agent.tick.error {err:#}");
            }
        }
    }

    println!("{}", agent.render_full(None));
    Ok(())
}
