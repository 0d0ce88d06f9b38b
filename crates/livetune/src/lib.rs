//! # livetune
//!
//! Live-tunable runtime parameters for Rust.
//!
//! livetune lets a program declare named, typed, bounded values wherever they
//! are used and edit them while it runs, through any control surface that can
//! show a switch, a slider or a text box.
//!
//! ## Architecture
//!
//! ```text
//! Parameter<T> handles (declared anywhere)
//!        ↓
//! Registry (group, name) → slot
//!        ↓
//! Session: BindingTable + SyncEngine, ticked once per frame
//!        ↕
//! ControlSurface (debug panel, GUI, MemorySurface)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use livetune::prelude::*;
//!
//! let registry = Registry::global();
//! let threshold = Parameter::range(&registry, Group::Tracking, "threshold", 0.5, 0.0..=1.0)
//!     .with_on_update(|| log::info!("threshold changed"));
//!
//! let mut session = Session::new(registry, MyPanel::new());
//! session.materialize("Tracking", Group::Tracking);
//!
//! loop {
//!     session.tick();
//!     if threshold.check_and_reset_if_changed() {
//!         // Value edited on the panel
//!     }
//! }
//! ```

// Re-export sub-crates
pub use livetune_core as core;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use livetune::prelude::*;
/// ```
pub mod prelude {
    pub use livetune_core::{
        // Declaration and lookup
        Category, Group, Parameter, ParameterRef, Registry,
        // Values
        ParameterValue, Value, ValueKind,
        // Control surface
        ControlId, ControlSurface, ControlValue, MemorySurface,
        // Sync
        Session, SyncConfig, SyncEngine, TickReport,
        // Errors
        ConversionError, Diagnostic, RegistryError, RegistryResult,
    };
}
