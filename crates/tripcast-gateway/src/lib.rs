// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/SSE surface for the tripcast chatroom.
//!
//! Binds `POST /chat`, `GET /events`, `GET`/`POST /user`, `GET /health`,
//! the bill CRUD routes, and the travel plan query routes onto the
//! orchestrator, bus, and storage backends.

pub mod handlers;
pub mod server;
pub mod sse;
pub mod users;

pub use server::{start_server, GatewayState, ServerConfig};
