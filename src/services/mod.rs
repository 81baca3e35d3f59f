// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod push;
pub mod sweep;

pub use push::{DispatchError, NotificationDispatcher, PushClient};
pub use sweep::{InactivitySweep, SweepReport};
