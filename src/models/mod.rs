// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod counter;
pub mod flight;
pub mod history;
pub mod user;

pub use counter::Counter;
pub use flight::{Flight, FlightDetails};
pub use user::{Friend, User};
