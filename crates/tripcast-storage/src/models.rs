// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `tripcast-core` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use tripcast_core::{Bill, BillRecord, NewTravelPlan, TravelPlan};
