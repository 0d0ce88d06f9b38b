//! Bidirectional parameter synchronization.
//!
//! Once per tick (typically once per rendered UI frame) the [`SyncEngine`]
//! walks a [`BindingTable`] and reconciles each parameter with its control.
//!
//! # Reconciliation Rules
//!
//! For each binding, in order:
//!
//! 1. A dropped parameter is skipped.
//! 2. If the parameter was changed from code since the last tick, its value
//!    is pushed to the control (internal wins).
//! 3. Otherwise, if the control shows a different value, that value is pulled
//!    into the parameter and the parameter is marked as changed externally.
//! 4. Otherwise nothing happens.
//!
//! Only one of push and pull can apply to a parameter in a tick, and the
//! update callback runs exactly once when either does. A pushed value reads
//! back as equal on the next tick, so nothing echoes.
//!
//! # Bounds
//!
//! Values pulled into a range parameter are clamped to `[min, max]`. When
//! clamping changes the value, the control is rewritten with the clamped
//! value in the same tick so the next tick is steady. NaN is never pulled;
//! the control is reset to the parameter's value instead.
//!
//! # Free Text
//!
//! Text controls are parsed into the parameter's type. Text that does not
//! parse is rejected: both sides stay unchanged, a diagnostic is recorded
//! once per distinct input, and the rest of the pass carries on.
//!
//! The decision step is the pure [`reconcile`] function; [`SyncEngine::tick`]
//! applies its result.

use log::{debug, trace};

use crate::binding::{Binding, BindingTable};
use crate::error::{ConversionError, Diagnostic};
use crate::group::Category;
use crate::registry::{Registry, Slot};
use crate::surface::{ControlSurface, ControlValue};
use crate::text;
use crate::value::Value;

/// Internal side of a parameter, as seen by [`reconcile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalState {
    pub category: Category,
    pub value: Value,
    pub min: Value,
    pub max: Value,
    pub changed_internally: bool,
}

impl InternalState {
    fn of(slot: &Slot) -> Self {
        Self {
            category: slot.category,
            value: slot.value,
            min: slot.min,
            max: slot.max,
            changed_internally: slot.changed_internally,
        }
    }
}

/// Outcome of reconciling one parameter with its control.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Both sides agree.
    Steady,
    /// Write the parameter's value to the control and clear the internal flag.
    Push(ControlValue),
    /// Store `value` in the parameter and mark it as changed externally.
    /// `correct_control` carries the clamped value when the control showed an
    /// out-of-range one.
    Pull {
        value: Value,
        correct_control: Option<ControlValue>,
    },
    /// Rewrite the control only. The parameter does not change.
    Correct(ControlValue),
    /// The control's content could not be read as the parameter's type.
    Rejected(ConversionError),
}

impl Reconciliation {
    /// Returns `true` if applying this result changes the parameter's state
    /// and runs its callback.
    pub fn fires_callback(&self) -> bool {
        matches!(self, Reconciliation::Push(_) | Reconciliation::Pull { .. })
    }
}

/// Decide how to reconcile a parameter with the content of its control.
///
/// This function has no side effects.
pub fn reconcile(internal: &InternalState, external: &ControlValue) -> Reconciliation {
    if internal.changed_internally {
        return Reconciliation::Push(control_value(internal.category, internal.value));
    }

    let external_value = match read_control(internal, external) {
        Ok(value) => value,
        Err(error) => return Reconciliation::Rejected(error),
    };

    match internal.category {
        Category::BoundedRange => {
            let Some(clamped) = external_value.clamp(internal.min, internal.max) else {
                return Reconciliation::Correct(control_value(internal.category, internal.value));
            };
            let correction = (clamped != external_value).then_some(ControlValue::Scalar(clamped));

            if clamped == internal.value {
                correction.map_or(Reconciliation::Steady, Reconciliation::Correct)
            } else {
                Reconciliation::Pull {
                    value: clamped,
                    correct_control: correction,
                }
            }
        }
        Category::Toggle | Category::FreeText => {
            if external_value == internal.value {
                Reconciliation::Steady
            } else {
                Reconciliation::Pull {
                    value: external_value,
                    correct_control: None,
                }
            }
        }
    }
}

/// Representation of `value` in a control of the given category.
pub fn control_value(category: Category, value: Value) -> ControlValue {
    match category {
        Category::FreeText => ControlValue::Text(text::format(value)),
        Category::Toggle | Category::BoundedRange => ControlValue::Scalar(value),
    }
}

fn read_control(internal: &InternalState, external: &ControlValue) -> Result<Value, ConversionError> {
    let kind = internal.value.kind();
    match (internal.category, external) {
        (Category::FreeText, ControlValue::Text(text)) => text::parse(kind, text),
        (Category::Toggle | Category::BoundedRange, ControlValue::Scalar(value))
            if value.kind() == kind =>
        {
            Ok(*value)
        }
        (_, other) => Err(ConversionError::KindMismatch {
            expected: kind,
            found: other.describe(),
        }),
    }
}

/// Counts of what a tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Parameters whose value was pushed to the control.
    pub pushed: usize,
    /// Parameters that took a new value from the control.
    pub pulled: usize,
    /// Controls rewritten without changing the parameter.
    pub corrected: usize,
    /// Controls whose content was rejected.
    pub rejected: usize,
    /// Bindings skipped because the parameter or the control is gone.
    pub skipped: usize,
    /// Bindings already in agreement.
    pub steady: usize,
    /// Update callbacks run.
    pub callbacks: usize,
}

impl TickReport {
    /// Number of parameters that changed in either direction.
    pub fn changed(&self) -> usize {
        self.pushed + self.pulled
    }

    /// Returns `true` if the tick wrote nothing to either side.
    pub fn is_idle(&self) -> bool {
        self.pushed == 0 && self.pulled == 0 && self.corrected == 0
    }
}

/// Drives reconciliation passes against one registry.
#[derive(Debug)]
pub struct SyncEngine {
    registry: Registry,
    ticks: u64,
}

impl SyncEngine {
    /// Create an engine reconciling parameters of `registry`.
    pub fn new(registry: Registry) -> Self {
        Self { registry, ticks: 0 }
    }

    /// Registry the engine reads from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one reconciliation pass over all bindings.
    ///
    /// Update callbacks run as their parameter is reconciled, with the
    /// registry unlocked, so they may read or set any parameter. A parameter
    /// set from a callback is pushed later in this pass if its binding comes
    /// after the current one, otherwise on the next tick.
    pub fn tick<S: ControlSurface + ?Sized>(
        &mut self,
        bindings: &mut BindingTable,
        surface: &mut S,
    ) -> TickReport {
        let mut report = TickReport::default();

        for binding in bindings.iter_mut() {
            self.sync_binding(binding, &mut *surface, &mut report);
        }

        self.ticks += 1;
        trace!("Sync tick {}: {:?}", self.ticks, report);
        report
    }

    fn sync_binding<S: ControlSurface + ?Sized>(
        &self,
        binding: &mut Binding,
        surface: &mut S,
        report: &mut TickReport,
    ) {
        let Some(internal) = self.registry.with_slot(binding.key, InternalState::of) else {
            report.skipped += 1;
            return;
        };

        let Some(external) = surface.read(binding.control) else {
            if !binding.control_missing {
                binding.control_missing = true;
                self.registry.report(Diagnostic::ControlMissing {
                    group: binding.group,
                    name: binding.name.clone(),
                });
            }
            report.skipped += 1;
            return;
        };
        binding.control_missing = false;

        let callback = match reconcile(&internal, &external) {
            Reconciliation::Steady => {
                binding.rejected = None;
                report.steady += 1;
                None
            }
            Reconciliation::Push(value) => {
                binding.rejected = None;
                surface.write(binding.control, value);
                report.pushed += 1;
                debug!(
                    "Parameter value of {}/{} is: {}",
                    binding.group, binding.name, internal.value
                );
                self.registry
                    .with_slot_mut(binding.key, |slot| {
                        slot.changed_internally = false;
                        slot.on_update.clone()
                    })
                    .flatten()
            }
            Reconciliation::Pull {
                value,
                correct_control,
            } => {
                binding.rejected = None;
                if let Some(corrected) = correct_control {
                    surface.write(binding.control, corrected);
                }
                report.pulled += 1;
                debug!(
                    "Parameter value of {}/{} is: {}",
                    binding.group, binding.name, value
                );
                self.registry
                    .with_slot_mut(binding.key, |slot| {
                        slot.value = value;
                        slot.changed_externally = true;
                        slot.on_update.clone()
                    })
                    .flatten()
            }
            Reconciliation::Correct(value) => {
                binding.rejected = None;
                surface.write(binding.control, value);
                report.corrected += 1;
                None
            }
            Reconciliation::Rejected(error) => {
                let content = external.describe();
                if binding.rejected.as_deref() != Some(content.as_str()) {
                    self.registry.report(Diagnostic::ConversionRejected {
                        group: binding.group,
                        name: binding.name.clone(),
                        error,
                    });
                    binding.rejected = Some(content);
                }
                report.rejected += 1;
                None
            }
        };

        if let Some(on_update) = callback {
            on_update();
            report.callbacks += 1;
        }
    }
}
