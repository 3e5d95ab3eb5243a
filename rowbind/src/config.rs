//! Adapter configuration.

use crate::row::DuplicatePolicy;

/// Per-list configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Vertical gap between rendered rows.
    pub row_spacing: f32,

    /// What to do with emissions containing repeated ids.
    pub duplicate_policy: DuplicatePolicy,

    /// Redraw visible rows after every dispatched tap, so tap-driven state
    /// (selection highlighting and the like) shows up.
    pub refresh_on_tap: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            row_spacing: 0.0,
            duplicate_policy: DuplicatePolicy::KeepLast,
            refresh_on_tap: true,
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row spacing. Negative values are treated as zero.
    pub fn row_spacing(mut self, spacing: f32) -> Self {
        self.row_spacing = spacing.max(0.0);
        self
    }

    /// Set the duplicate id policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Reject emissions with repeated ids instead of keeping the last.
    pub fn strict(self) -> Self {
        self.duplicate_policy(DuplicatePolicy::Reject)
    }

    /// Skip the visible-row redraw after taps.
    pub fn without_tap_refresh(mut self) -> Self {
        self.refresh_on_tap = false;
        self
    }
}
