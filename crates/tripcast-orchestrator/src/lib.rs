// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The room state machine: turns a raw utterance into a stream of frames,
//! serialized per room behind a mutex, broadcasting every frame it produces
//! to the room's bus as it goes.
//!
//! [`dispatch`] and [`guards`] hold the actual turn logic; [`planners`] and
//! [`vote`] are the stateless building blocks they call into. None of the
//! parsing itself lives here -- that's `tripcast-router`'s job.

mod dispatch;
mod event;
mod guards;
mod planners;
mod reply;
mod room;
mod vote;

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, Mutex};

use tripcast_bus::RoomBus;
use tripcast_core::{Frame, LlmGateway, ParticipantId, Persistence};

pub use room::{MediationState, RoomState};
pub use vote::{classify_vote_reading, pending_voters, tally_passes};

const TURN_FRAME_BUFFER: usize = 64;

/// Text-truncation knobs threaded through prompt construction, mirroring
/// `tripcast-config`'s `[limits]` section. Kept as the orchestrator's own
/// type (rather than depending on `tripcast-config` directly) the same way
/// `tripcast_bus::BusConfig` mirrors `tripcast-config`'s `BusConfig` --
/// callers map the config crate's section onto this at startup.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Max characters of a previous plan fed back into a revision prompt.
    pub plan_context_truncate_chars: usize,
    /// Max characters of a previous plan summarized for the supervisor.
    pub summary_truncate_chars: usize,
    /// Chunk size used when streaming a budget audit's reason text.
    pub audit_reason_chunk_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            plan_context_truncate_chars: 3000,
            summary_truncate_chars: 500,
            audit_reason_chunk_chars: 50,
        }
    }
}

/// Borrowed handles a turn needs: the LLM backend, persistence, the room's
/// broadcast bus, and the text-truncation limits. Bundled so the
/// dispatch/guard modules don't carry four separate parameters through
/// every call.
pub(crate) struct Services<'a> {
    pub gateway: &'a dyn LlmGateway,
    pub storage: &'a dyn Persistence,
    pub bus: &'a RoomBus,
    pub limits: Limits,
}

/// Owns the single shared room and drives every turn through it.
pub struct Orchestrator {
    gateway: Arc<dyn LlmGateway>,
    storage: Arc<dyn Persistence>,
    bus: Arc<RoomBus>,
    limits: Limits,
    room: Mutex<RoomState>,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        storage: Arc<dyn Persistence>,
        bus: Arc<RoomBus>,
        limits: Limits,
        session_id: impl Into<String>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            storage,
            bus,
            limits,
            room: Mutex::new(RoomState::new(session_id, default_currency)),
        }
    }

    pub fn bus(&self) -> &Arc<RoomBus> {
        &self.bus
    }

    /// Whether the underlying LLM gateway has a working backend. Mirrors
    /// the check `run_supervisor_dispatch` runs at the top of phase 3.
    pub async fn gateway_configured(&self) -> bool {
        self.gateway.health_check().await.is_ok()
    }

    /// Runs one utterance through the three-phase turn pipeline, returning a
    /// stream of frames for the caller. Turns are strictly sequential per
    /// room: the room mutex is held for the whole turn, not just the final
    /// commit.
    pub async fn handle_utterance(
        self: &Arc<Self>,
        participant: ParticipantId,
        username: String,
        text: String,
    ) -> Pin<Box<dyn Stream<Item = Frame> + Send>> {
        let (tx, rx) = mpsc::channel(TURN_FRAME_BUFFER);
        let this = Arc::clone(self);

        tokio::spawn(async move {
            let _ = tx.send(Frame::Start).await;
            this.bus.publish(event::user_event(&participant.0, &username, &text));

            {
                let mut room = this.room.lock().await;
                room.note_participant(&username);
                let svc = Services {
                    gateway: this.gateway.as_ref(),
                    storage: this.storage.as_ref(),
                    bus: &this.bus,
                    limits: this.limits,
                };

                if matches!(
                    guards::mediation_guard(&svc, &tx, &mut room, &participant, &username, &text).await,
                    guards::GuardOutcome::FallThrough
                ) && matches!(
                    guards::confirmation_guard(&svc, &tx, &mut room, &participant, &username, &text).await,
                    guards::GuardOutcome::FallThrough
                ) {
                    dispatch::run_supervisor_dispatch(&svc, &tx, &mut room, &participant, &username, &text).await;
                }
            }

            let _ = tx.send(Frame::Complete).await;
        });

        Box::pin(futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|frame| (frame, rx)) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tripcast_bus::BusConfig;
    use tripcast_core::TemplateId;
    use tripcast_storage::SqliteStorage;
    use tripcast_test_utils::MockGateway;

    async fn test_orchestrator() -> (Arc<Orchestrator>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db").to_str().unwrap());
        storage.initialize().await.unwrap();
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(MockGateway::new()),
            Arc::new(storage),
            Arc::new(RoomBus::new(BusConfig::default())),
            Limits::default(),
            "shared-chatroom",
            "USD",
        ));
        (orchestrator, dir)
    }

    #[tokio::test]
    async fn handle_utterance_starts_and_completes() {
        let (orchestrator, _dir) = test_orchestrator().await;
        let mut stream =
            orchestrator.handle_utterance(ParticipantId("alice".into()), "alice".into(), "plan a trip to Tokyo".into()).await;

        let mut frames = Vec::new();
        while let Some(frame) = stream.next().await {
            frames.push(frame);
        }
        assert!(matches!(frames.first(), Some(Frame::Start)));
        assert!(matches!(frames.last(), Some(Frame::Complete)));
    }

    #[tokio::test]
    async fn gateway_unconfigured_short_circuits_with_single_error_frame() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db").to_str().unwrap());
        storage.initialize().await.unwrap();
        let gateway = Arc::new(FailingGateway);
        let orchestrator = Arc::new(Orchestrator::new(
            gateway,
            Arc::new(storage),
            Arc::new(RoomBus::new(BusConfig::default())),
            Limits::default(),
            "shared-chatroom",
            "USD",
        ));

        let mut stream =
            orchestrator.handle_utterance(ParticipantId("alice".into()), "alice".into(), "plan a trip".into()).await;
        let mut frames = Vec::new();
        while let Some(frame) = stream.next().await {
            frames.push(frame);
        }
        let error_frames = frames.iter().filter(|f| matches!(f, Frame::Error { .. })).count();
        assert_eq!(error_frames, 1);
    }

    struct FailingGateway;

    #[async_trait::async_trait]
    impl tripcast_core::ServiceAdapter for FailingGateway {
        fn name(&self) -> &str {
            "failing-gateway"
        }
        async fn health_check(&self) -> Result<(), tripcast_core::TripcastError> {
            Err(tripcast_core::TripcastError::GatewayUnconfigured("no backend configured".into()))
        }
        async fn shutdown(&self) -> Result<(), tripcast_core::TripcastError> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl LlmGateway for FailingGateway {
        async fn stream(
            &self,
            _template_id: TemplateId,
            _bindings: tripcast_core::TemplateBindings,
        ) -> Result<tripcast_core::GatewayStream, tripcast_core::TripcastError> {
            Err(tripcast_core::TripcastError::GatewayUnconfigured("no backend configured".into()))
        }
    }
}
