// SPDX-License-Identifier: MIT

//! Layered topological sort over a dependency map

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Raised when the dependency map contains a cycle.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dependency cycle detected among: {}", remaining.join(", "))]
pub struct CycleError {
    /// Keys that could not be scheduled into any level.
    pub remaining: Vec<String>,
}

/// Layered topological sort.
///
/// `deps` maps each key to the set of keys it depends on. Returns levels
/// of keys that are ready together: every key's dependencies live in
/// earlier levels. Upstream keys absent from the map are treated as
/// already satisfied. Within a level, keys come out in the map's sorted
/// order, so the layering is deterministic for a given input.
pub fn toposort(deps: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<Vec<String>>, CycleError> {
    let mut done: BTreeSet<&str> = BTreeSet::new();
    let mut levels: Vec<Vec<String>> = Vec::new();

    while done.len() < deps.len() {
        let level: Vec<String> = deps
            .iter()
            .filter(|(key, _)| !done.contains(key.as_str()))
            .filter(|(_, upstream)| {
                upstream
                    .iter()
                    .all(|dep| done.contains(dep.as_str()) || !deps.contains_key(dep))
            })
            .map(|(key, _)| key.clone())
            .collect();

        if level.is_empty() {
            return Err(CycleError {
                remaining: deps
                    .keys()
                    .filter(|key| !done.contains(key.as_str()))
                    .cloned()
                    .collect(),
            });
        }

        for key in &level {
            // Borrow from the map key, not the level, to outlive this iteration.
            if let Some((stored, _)) = deps.get_key_value(key) {
                done.insert(stored.as_str());
            }
        }
        levels.push(level);
    }

    Ok(levels)
}

#[cfg(test)]
#[path = "toposort_tests.rs"]
mod tests;
