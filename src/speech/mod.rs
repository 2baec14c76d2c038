//! Text-to-speech playback through an external command
//!
//! Only one utterance plays at a time. Starting a new one always cancels the
//! one in flight; there is no queue. Every utterance ends with exactly one
//! [`SpeechEvent::Finished`], whether it completed, failed or was cancelled,
//! so whoever started it can clear its "speaking" indicator.

use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Language (and pace) of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    /// Portuguese explanations
    PtBr,
    /// English examples and reading passages, a little slower
    EnUs,
}

impl Voice {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }

    /// Rate as a percentage of the engine's base rate
    pub fn rate_percent(&self) -> u32 {
        match self {
            Self::PtBr => 110,
            Self::EnUs => 90,
        }
    }
}

/// Speech settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Program to run, e.g. `espeak-ng` or `say`
    pub command: String,
    /// Arguments; `{voice}`, `{rate}` and `{text}` are substituted
    pub args: Vec<String>,
    /// Words per minute at 100%
    pub base_rate_wpm: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak-ng".to_string(),
            args: ["-v", "{voice}", "-s", "{rate}", "--", "{text}"].map(String::from).to_vec(),
            base_rate_wpm: 175,
        }
    }
}

impl SpeechConfig {
    /// Expand the argument template for one utterance
    pub fn expand_args(&self, text: &str, voice: Voice) -> Vec<String> {
        let wpm = self.base_rate_wpm * voice.rate_percent() / 100;
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{voice}", &voice.tag().to_lowercase())
                    .replace("{rate}", &wpm.to_string())
                    .replace("{text}", text)
            })
            .collect()
    }
}

/// Handle for one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(u64);

#[cfg(test)]
impl UtteranceId {
    pub(crate) fn for_tests(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    Finished(UtteranceId),
}

/// Single-slot speech player
pub struct Speaker {
    config: SpeechConfig,
    current: Option<(UtteranceId, CancellationToken)>,
    /// Task of the most recent utterance, awaited before the next one spawns
    last_task: Option<JoinHandle<()>>,
    next_id: u64,
    tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl Speaker {
    /// Create a speaker and the channel its events arrive on
    pub fn new(config: SpeechConfig) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { config, current: None, last_task: None, next_id: 0, tx }, rx)
    }

    /// Utterance currently playing, if any
    pub fn current(&self) -> Option<UtteranceId> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    /// Start speaking `text`, stopping whatever was playing
    ///
    /// Must be called from within a tokio runtime. Returns `None` when
    /// speech is disabled.
    pub fn speak(&mut self, text: &str, voice: Voice) -> Option<UtteranceId> {
        self.stop();
        if !self.config.enabled || text.trim().is_empty() {
            return None;
        }

        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        let token = CancellationToken::new();
        self.current = Some((id, token.clone()));

        let program = self.config.command.clone();
        let args = self.config.expand_args(text, voice);
        let tx = self.tx.clone();
        let previous = self.last_task.take();
        tracing::debug!(utterance = id.0, voice = voice.tag(), "Speaking");

        self.last_task = Some(tokio::spawn(async move {
            // The previous process is killed and reaped before this one starts
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            if !token.is_cancelled() {
                play(&program, &args, token).await;
            }
            // Receiver gone means the app is shutting down
            let _ = tx.send(SpeechEvent::Finished(id));
        }));

        Some(id)
    }

    /// Stop the current utterance, if any
    pub fn stop(&mut self) {
        if let Some((id, token)) = self.current.take() {
            tracing::debug!(utterance = id.0, "Stopping speech");
            token.cancel();
        }
    }

    /// Forget the current utterance once its event arrives
    pub fn handle_event(&mut self, event: SpeechEvent) {
        let SpeechEvent::Finished(id) = event;
        if self.current() == Some(id) {
            self.current = None;
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run the speech command until it exits or is cancelled
///
/// Failures are logged and otherwise ignored.
async fn play(program: &str, args: &[String], token: CancellationToken) {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(program, error = %e, "Speech command failed to start");
            return;
        }
    };

    let cancelled = tokio::select! {
        _ = token.cancelled() => true,
        status = child.wait() => {
            match status {
                Ok(status) if !status.success() => {
                    tracing::debug!(%status, "Speech command exited with failure");
                }
                Err(e) => tracing::debug!(error = %e, "Speech command failed"),
                Ok(_) => {}
            }
            false
        }
    };

    if cancelled {
        if let Err(e) = child.kill().await {
            tracing::debug!(error = %e, "Failed to kill speech command");
        }
    }
}
