//! Runs a generation ticket in the background

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::GenerationTicket;
use crate::content::{ContentGenerator, ExerciseSet, GenerationError};

/// A finished generation, tagged with the ticket that started it
#[derive(Debug)]
pub struct GenerationOutcome {
    pub ticket: GenerationTicket,
    pub result: Result<ExerciseSet, GenerationError>,
}

/// Run one generation on the runtime and report it on `tx`
///
/// The task is never cancelled. If the user navigates away, the outcome
/// still arrives and the session discards it.
pub fn spawn_generation<G>(
    generator: Arc<G>,
    ticket: GenerationTicket,
    tx: mpsc::Sender<GenerationOutcome>,
) -> JoinHandle<()>
where
    G: ContentGenerator + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let request = ticket.request();
        let result = generator.generate(&request).await;
        if let Err(e) = &result {
            tracing::warn!(ticket = ticket.id, error = %e, "Generation request failed");
        }

        // Receiver gone means the app is shutting down
        if tx.send(GenerationOutcome { ticket, result }).await.is_err() {
            tracing::debug!("Generation finished after the app closed");
        }
    })
}
