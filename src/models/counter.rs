// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Named sequence counter.

use serde::{Deserialize, Serialize};

/// Counter document: one per sequence domain (e.g. "flights").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    /// Sequence name (also used as document ID)
    pub name: String,
    /// Last value handed out
    pub current: u64,
}

impl Counter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            current: 0,
        }
    }
}
