// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The room-wide broadcast bus: a bounded replay ring plus one bounded
//! outbound queue per active subscriber.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tripcast_core::{ParticipantId, RoomEvent};

/// Bus sizing, mirrored from the `bus` configuration section.
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Capacity of the replay ring; oldest events are evicted on overflow.
    pub ring_capacity: usize,
    /// How many of the most recent ring events a new subscriber replays.
    pub replay_count: usize,
    /// Capacity of each subscriber's outbound queue.
    pub subscriber_queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ring_capacity: 1000,
            replay_count: 50,
            subscriber_queue_capacity: 100,
        }
    }
}

/// A process-local fan-out bus for one shared room.
///
/// `publish` never blocks on a slow subscriber: a subscriber whose queue is
/// full is unregistered silently rather than backpressuring the publisher or
/// cancelling whatever produced the event.
pub struct RoomBus {
    config: BusConfig,
    ring: Mutex<VecDeque<RoomEvent>>,
    subscribers: DashMap<ParticipantId, mpsc::Sender<RoomEvent>>,
}

impl RoomBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            config,
            ring: Mutex::new(VecDeque::with_capacity(config.ring_capacity)),
            subscribers: DashMap::new(),
        }
    }

    /// Registers `participant` as an active subscriber, returning a replay of
    /// up to `replay_count` of the most recent retained events followed by a
    /// receiver for live delivery. Re-subscribing the same participant
    /// replaces their previous queue.
    pub fn subscribe(&self, participant: ParticipantId) -> (Vec<RoomEvent>, mpsc::Receiver<RoomEvent>) {
        let replay = {
            let ring = self.ring.lock().unwrap();
            let skip = ring.len().saturating_sub(self.config.replay_count);
            ring.iter().skip(skip).cloned().collect()
        };
        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);
        self.subscribers.insert(participant, tx);
        (replay, rx)
    }

    /// Removes `participant`'s subscription, if present. Used both for an
    /// explicit client disconnect and for the silent-unregister path below.
    pub fn unsubscribe(&self, participant: &ParticipantId) {
        self.subscribers.remove(participant);
    }

    /// Appends `event` to the ring (evicting the oldest on overflow) and
    /// attempts delivery to every subscriber. A subscriber whose queue is
    /// full or whose receiver has dropped is removed after the fan-out pass.
    ///
    /// If an entry with the same `event.id` is already in the ring, it is
    /// replaced in place rather than appended, so a streaming message's
    /// incremental frames collapse to one ring entry holding the latest
    /// content instead of accumulating one entry per chunk.
    pub fn publish(&self, event: RoomEvent) {
        {
            let mut ring = self.ring.lock().unwrap();
            if let Some(existing) = ring.iter_mut().find(|e| e.id == event.id) {
                *existing = event.clone();
            } else {
                if ring.len() >= self.config.ring_capacity {
                    ring.pop_front();
                }
                ring.push_back(event.clone());
            }
        }

        let mut disconnected = Vec::new();
        for entry in self.subscribers.iter() {
            if entry.value().try_send(event.clone()).is_err() {
                disconnected.push(entry.key().clone());
            }
        }
        for participant in disconnected {
            tracing::debug!(%participant, "subscriber queue full or closed, unregistering");
            self.subscribers.remove(&participant);
        }
    }

    /// Count of currently active subscribers, used by the orchestrator's
    /// active-participant-count check for mediation dispatch.
    pub fn active_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_active(&self, participant: &ParticipantId) -> bool {
        self.subscribers.contains_key(participant)
    }

    /// Snapshot of currently active participant ids.
    pub fn active_participants(&self) -> Vec<ParticipantId> {
        self.subscribers.iter().map(|e| e.key().clone()).collect()
    }
}
