//! Command execution layer.
//!
//! Translates high-level application effects ([`Effect`]) into imperative
//! commands ([`Cmd`]) and executes them. This is the boundary where the pure
//! state machine meets side effects: writing to the system clipboard and
//! spawning the delayed mock executions. State updates stay pure; commands
//! carry the effects.

use mocktty_engine::{MockRequest, SIMULATED_LATENCY};
use mocktty_types::ExecOutcome;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, CopyTarget, Effect};

/// Side-effectful system commands executed outside of pure state updates.
#[derive(Debug)]
pub enum Cmd {
    /// Write text into the system clipboard and acknowledge on success.
    ClipboardSet { text: String, target: CopyTarget },
    /// Simulate one request after the fixed artificial latency.
    ExecuteMock { request: Box<MockRequest>, seq: u64 },
}

/// Convert application effects into commands.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::CopyRequested { text, target } => Cmd::ClipboardSet { text, target },
            Effect::ExecuteRequested { request, seq } => Cmd::ExecuteMock {
                request: Box::new(request),
                seq,
            },
        })
        .collect()
}

/// Execute a batch of commands.
///
/// Finished executions come back through `results`; the event loop feeds
/// them to the state machine as `Msg::ExecCompleted`.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>, results: &UnboundedSender<ExecOutcome>) {
    for command in commands {
        match command {
            Cmd::ClipboardSet { text, target } => execute_clipboard_set(app, text, target),
            Cmd::ExecuteMock { request, seq } => execute_mock(results, *request, seq),
        }
    }
}

/// Write to the clipboard; the acknowledgment flips only after the write
/// resolved successfully.
fn execute_clipboard_set(app: &mut App, text: String, target: CopyTarget) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => app.result.mark_copied(target),
        Err(error) => tracing::warn!(error = %error, "Clipboard error"),
    }
}

/// Spawn the delayed mock execution.
///
/// There is no cancellation: a superseded task still runs to completion and
/// sends its outcome; the state machine discards it by sequence number.
fn execute_mock(results: &UnboundedSender<ExecOutcome>, request: MockRequest, seq: u64) {
    let results = results.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SIMULATED_LATENCY).await;
        let raw = mocktty_engine::execute(&request);
        let _ = results.send(ExecOutcome { seq, raw });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn effects_translate_one_to_one() {
        let request = MockRequest {
            service_id: "user".into(),
            service_name: "用户服务".into(),
            function_name: "用户登录".into(),
            server_address: "http://dev-api.example.com/user".into(),
            params: Map::new(),
        };
        let effects = vec![
            Effect::ExecuteRequested { request, seq: 7 },
            Effect::CopyRequested {
                text: "cell".into(),
                target: CopyTarget::Cell { row: 1, col: 2 },
            },
        ];

        let commands = from_effects(effects);
        assert!(matches!(&commands[0], Cmd::ExecuteMock { seq: 7, .. }));
        assert!(matches!(
            &commands[1],
            Cmd::ClipboardSet {
                target: CopyTarget::Cell { row: 1, col: 2 },
                ..
            }
        ));
    }
}
