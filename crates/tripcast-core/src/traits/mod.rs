// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for tripcast's two pluggable backends.
//!
//! Both extend the [`ServiceAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;
pub mod storage;

pub use adapter::ServiceAdapter;
pub use provider::{GatewayStream, LlmGateway};
pub use storage::Persistence;
