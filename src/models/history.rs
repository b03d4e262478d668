// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Most-recent-first search history lists.

/// Weather searches are stored lowercase.
pub fn normalize_location_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Flight searches are stored uppercase with all whitespace removed
/// ("sq 944" and "SQ944" are the same flight).
pub fn normalize_flight_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Move `entry` to the front of `history`, dropping any earlier occurrence.
/// The full list is kept.
pub fn push_recent(history: &mut Vec<String>, entry: String) {
    history.retain(|existing| *existing != entry);
    history.insert(0, entry);
}
