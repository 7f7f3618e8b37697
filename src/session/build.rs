use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use crate::assets::font::LabelFont;
use crate::config::AnimationConfig;
use crate::encode::sink::{AnimationEncoder, CancelToken};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::session::pipeline::{Animation, build_animation, label_painter};

/// Inputs of one build request.
#[derive(Clone, Debug)]
pub struct BuildRequest {
    pub bitmaps: Vec<Bitmap>,
    pub names: Vec<String>,
    pub config: AnimationConfig,
}

/// Last encoded animation and the request generation that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildArtifact {
    pub generation: u64,
    pub animation: Arc<Animation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildStatus {
    /// Nothing submitted yet.
    Idle,
    Building { generation: u64 },
    Ready { generation: u64 },
    /// The latest request failed; any earlier artifact is still available.
    Failed { generation: u64, message: String },
}

struct BuildOutcome {
    generation: u64,
    result: LoopgifResult<Animation>,
}

/// Runs builds on background threads. Only the most recent request can update the artifact.
///
/// Submitting a new request cancels the one in flight; outcomes from older generations are
/// discarded when they arrive.
pub struct BuildSession {
    encoder: Arc<dyn AnimationEncoder>,
    font: Option<LabelFont>,
    latest_generation: u64,
    in_flight: Option<CancelToken>,
    status: BuildStatus,
    artifact: Option<BuildArtifact>,
    tx: Sender<BuildOutcome>,
    rx: Receiver<BuildOutcome>,
}

impl BuildSession {
    pub fn new(encoder: Arc<dyn AnimationEncoder>, font: Option<LabelFont>) -> Self {
        let (tx, rx) = channel();
        Self {
            encoder,
            font,
            latest_generation: 0,
            in_flight: None,
            status: BuildStatus::Idle,
            artifact: None,
            tx,
            rx,
        }
    }

    pub fn status(&self) -> &BuildStatus {
        &self.status
    }

    /// The most recent successful build, if any.
    pub fn artifact(&self) -> Option<&BuildArtifact> {
        self.artifact.as_ref()
    }

    /// Start a build and return its generation.
    pub fn submit(&mut self, request: BuildRequest) -> u64 {
        self.latest_generation += 1;
        let generation = self.latest_generation;
        let cancel = CancelToken::new();
        if let Some(previous) = self.in_flight.replace(cancel.clone()) {
            previous.cancel();
        }

        let encoder = Arc::clone(&self.encoder);
        let font = self.font.clone();
        let tx = self.tx.clone();
        tracing::debug!(generation, slides = request.bitmaps.len(), "submit build");
        std::thread::spawn(move || {
            let result = run_build(&request, font.as_ref(), encoder.as_ref(), &cancel);
            // Fails only once the session is dropped.
            let _ = tx.send(BuildOutcome { generation, result });
        });

        self.status = BuildStatus::Building { generation };
        generation
    }

    /// Apply every outcome that has already arrived, without blocking.
    pub fn poll(&mut self) -> &BuildStatus {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
        &self.status
    }

    /// Block until the latest submitted build settles, or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> LoopgifResult<&BuildStatus> {
        let deadline = std::time::Instant::now() + timeout;
        while matches!(self.status, BuildStatus::Building { .. }) {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let outcome = self.rx.recv_timeout(remaining).map_err(|_| {
                LoopgifError::encoding(format!(
                    "build {} did not finish within {timeout:?}",
                    self.latest_generation
                ))
            })?;
            self.apply(outcome);
        }
        Ok(&self.status)
    }

    fn apply(&mut self, outcome: BuildOutcome) {
        let BuildOutcome { generation, result } = outcome;
        if generation != self.latest_generation {
            tracing::debug!(
                generation,
                latest = self.latest_generation,
                "discarding stale build outcome"
            );
            return;
        }
        self.in_flight = None;
        match result {
            Ok(animation) => {
                tracing::info!(
                    generation,
                    bytes = animation.bytes.len(),
                    frames = animation.frame_count,
                    "build ready"
                );
                self.artifact = Some(BuildArtifact {
                    generation,
                    animation: Arc::new(animation),
                });
                self.status = BuildStatus::Ready { generation };
            }
            Err(err) => {
                tracing::warn!(generation, %err, "build failed");
                self.status = BuildStatus::Failed {
                    generation,
                    message: err.to_string(),
                };
            }
        }
    }
}

fn run_build(
    request: &BuildRequest,
    font: Option<&LabelFont>,
    encoder: &dyn AnimationEncoder,
    cancel: &CancelToken,
) -> LoopgifResult<Animation> {
    let mut labels = label_painter(&request.config, font)?;
    build_animation(
        &request.bitmaps,
        &request.names,
        &request.config,
        &mut labels,
        encoder,
        cancel,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/session/build.rs"]
mod tests;
