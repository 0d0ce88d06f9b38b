//! # livetune-core
//!
//! Core of the livetune runtime parameter registry.
//!
//! Parameters are declared anywhere in a program, registered by group and
//! name, and mirrored onto an interactive control surface such as a debug
//! panel. Changes flow both ways: a value set from code reaches its control on
//! the next tick, and a value edited on the control is pulled into the
//! parameter. Each change is applied once and never echoed back.
//!
//! The only dependency is the `log` facade.
//!
//! ## Main Types
//!
//! - [`Parameter`] - Owning typed handle created by one of three declaration forms
//! - [`Registry`] - Directory of parameters, with typed [`lookup`](Registry::lookup)
//! - [`ControlSurface`] - Capability required from the external control surface
//! - [`Session`] - Surface, bindings and sync engine bundled for a panel
//! - [`SyncEngine`] - Runs the per-tick reconciliation pass
//!
//! ## Supporting Types
//!
//! - [`Value`] / [`ValueKind`] - Closed set of value types (bool, i32, f32, f64)
//! - [`Group`] / [`Category`] - Namespaces and declaration forms
//! - [`ParameterInfo`] - Snapshot of a parameter's state
//! - [`MemorySurface`] - Headless in-memory control surface
//! - [`SyncConfig`] - Label separator and diagnostic capacity
//! - [`RegistryError`], [`ConversionError`], [`Diagnostic`] - Error types

pub mod binding;
pub mod config;
pub mod error;
pub mod group;
pub mod info;
pub mod parameter;
pub mod registry;
pub mod session;
pub mod surface;
pub mod sync;
pub mod text;
pub mod value;

// Re-exports for convenience
pub use binding::{Binding, BindingTable};
pub use config::SyncConfig;
pub use error::{ConversionError, Diagnostic, RegistryError, RegistryResult};
pub use group::{Category, Group};
pub use info::ParameterInfo;
pub use parameter::{Parameter, ParameterRef};
pub use registry::{ParameterKey, Registry};
pub use session::Session;
pub use surface::{ControlId, ControlShape, ControlSurface, ControlValue, MemoryControl, MemorySurface};
pub use sync::{reconcile, InternalState, Reconciliation, SyncEngine, TickReport};
pub use value::{ParameterValue, Value, ValueKind};
