//! No-op render guard.
//!
//! Replacing the surface content can itself raise a change notification
//! from the host. If that notification re-renders the same markup, the
//! replacement must be skipped, otherwise input → render → input loops
//! forever. The guard remembers a hash of the markup last applied.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Simple hash function for markup comparison.
pub fn hash_source(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Tracks the markup currently shown on the surface.
#[derive(Debug, Clone, Default)]
pub struct RenderGuard {
    applied: Option<u64>,
}

impl RenderGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `markup` differs from what was last applied.
    pub fn needs_render(&self, markup: &str) -> bool {
        self.applied != Some(hash_source(markup))
    }

    /// Record that `markup` is now on the surface.
    pub fn mark_applied(&mut self, markup: &str) {
        self.applied = Some(hash_source(markup));
    }

    /// Forget the applied markup, forcing the next render through.
    ///
    /// Use when the host has replaced its content by other means.
    pub fn invalidate(&mut self) {
        self.applied = None;
    }
}
