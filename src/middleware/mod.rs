// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (user and scheduler authentication).

pub mod auth;
pub mod scheduler_auth;

pub use auth::require_auth;
pub use scheduler_auth::require_scheduler_auth;
