#![deny(missing_docs)]

//! # Normalization Options
//!
//! Explicit configuration passed into each normalization run.
//! Nothing in the engine reads process-wide or ambient state.

use serde::{Deserialize, Serialize};

/// How recoverable resolution failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Abort the run on the first unresolved reference or rejected conflict.
    #[default]
    Strict,
    /// Substitute an `any` node, record a diagnostic and continue.
    BestEffort,
}

/// Policy applied when two `allOf` members disagree on a scalar field (type, format, bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// The later member's value replaces the earlier one.
    #[default]
    LastWins,
    /// The first declared value is kept.
    FirstWins,
    /// Conflicts are errors in strict mode (last-wins with a note in best-effort mode).
    Reject,
}

/// Options for a single normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Strict or best-effort handling of recoverable failures.
    pub mode: ResolutionMode,
    /// Merge policy for conflicting `allOf` members.
    pub all_of_conflicts: MergePolicy,
    /// Maximum schema nesting / reference depth before traversal stops.
    pub max_depth: usize,
    /// Maximum depth explored when synthesizing example values.
    pub example_depth: usize,
    /// Base URL used by guides when the document declares no servers.
    pub default_server_url: String,
}

/// Default recursion cap for schema resolution.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default recursion cap for example synthesis.
pub const DEFAULT_EXAMPLE_DEPTH: usize = 6;

/// Server URL assumed when a document declares none.
pub const DEFAULT_SERVER_URL: &str = "https://api.example.com";

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            mode: ResolutionMode::Strict,
            all_of_conflicts: MergePolicy::LastWins,
            max_depth: DEFAULT_MAX_DEPTH,
            example_depth: DEFAULT_EXAMPLE_DEPTH,
            default_server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl NormalizeOptions {
    /// Options with best-effort resolution enabled.
    pub fn best_effort() -> Self {
        Self {
            mode: ResolutionMode::BestEffort,
            ..Self::default()
        }
    }

    /// True when recoverable failures should be downgraded.
    pub fn is_best_effort(&self) -> bool {
        self.mode == ResolutionMode::BestEffort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict_last_wins() {
        let opts = NormalizeOptions::default();
        assert_eq!(opts.mode, ResolutionMode::Strict);
        assert_eq!(opts.all_of_conflicts, MergePolicy::LastWins);
        assert!(!opts.is_best_effort());
        assert_eq!(opts.default_server_url, "https://api.example.com");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let yaml = "mode: best-effort\nallOfConflicts: reject\n";
        let opts: NormalizeOptions = serde_yaml::from_str(yaml).unwrap();
        assert!(opts.is_best_effort());
        assert_eq!(opts.all_of_conflicts, MergePolicy::Reject);
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(opts.example_depth, DEFAULT_EXAMPLE_DEPTH);
    }
}
