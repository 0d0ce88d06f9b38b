//! Registry and panel configuration.
//!
//! # Example
//!
//! ```ignore
//! use livetune_core::{Registry, SyncConfig};
//!
//! static CONFIG: SyncConfig = SyncConfig::new()
//!     .with_label_separator("/")
//!     .with_diagnostic_capacity(256);
//!
//! let registry = Registry::with_config(CONFIG);
//! ```

/// Configuration shared by a registry and the sessions built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Separator between panel name and parameter name in control labels.
    pub label_separator: &'static str,

    /// Maximum number of diagnostics kept for
    /// [`Registry::take_diagnostics`](crate::Registry::take_diagnostics).
    /// The oldest entry is dropped when the ring is full.
    pub diagnostic_capacity: usize,
}

impl SyncConfig {
    /// Default configuration: `"."` separator, 64 diagnostics.
    pub const DEFAULT: SyncConfig = SyncConfig::new();

    /// Create a configuration with default values.
    pub const fn new() -> Self {
        Self {
            label_separator: ".",
            diagnostic_capacity: 64,
        }
    }

    /// Set the label separator.
    pub const fn with_label_separator(mut self, separator: &'static str) -> Self {
        self.label_separator = separator;
        self
    }

    /// Set the diagnostic ring capacity.
    pub const fn with_diagnostic_capacity(mut self, capacity: usize) -> Self {
        self.diagnostic_capacity = capacity;
        self
    }

    /// Build the control label for a parameter on a panel.
    pub fn label(&self, panel: &str, name: &str) -> String {
        format!("{}{}{}", panel, self.label_separator, name)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
