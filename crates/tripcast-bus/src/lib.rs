// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local broadcast bus for the shared travel-planning room.
//!
//! One [`RoomBus`] fans every published [`tripcast_core::RoomEvent`] out to
//! each active subscriber's bounded queue, replaying recent history to new
//! subscribers and silently dropping ones that fall behind. No cross-process
//! distribution is implemented -- this is a single-process, single-room bus.

pub mod bus;
pub mod heartbeat;

pub use bus::{BusConfig, RoomBus};
pub use heartbeat::{with_heartbeat, BusMessage};
