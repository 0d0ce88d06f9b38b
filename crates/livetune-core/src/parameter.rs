//! Typed parameter handles.
//!
//! This module provides the two ways of holding a parameter:
//!
//! - [`Parameter`] - the owning handle, created by one of the three
//!   declaration forms. Dropping it removes the parameter from its registry.
//! - [`ParameterRef`] - a non-owning view returned by
//!   [`Registry::lookup`](crate::Registry::lookup). Every access reports
//!   [`RegistryError::Destroyed`] once the owner is gone.
//!
//! # Declaration Forms
//!
//! - [`Parameter::toggle`] - boolean switch
//! - [`Parameter::range`] - value bounded to `[min, max]`
//! - [`Parameter::text`] - value edited as text
//!
//! # Change Tracking
//!
//! Two flags track where a change came from:
//!
//! - [`Parameter::set`] marks the parameter as *changed internally*. The next
//!   sync tick pushes the value to its control and fires the update callback.
//! - A sync tick that pulls a new value from the control marks it as *changed
//!   externally*. [`Parameter::check_and_reset_if_changed`] reports that once.
//!
//! Neither `set` nor a lookup ever runs the callback; only a sync tick does.
//!
//! # Example
//!
//! ```ignore
//! use livetune_core::{Group, Parameter, Registry};
//!
//! let registry = Registry::new();
//! let threshold = Parameter::range(&registry, Group::Tracking, "threshold", 0.5, 0.0..=1.0)
//!     .with_on_update(|| log::info!("threshold changed"));
//!
//! threshold.set(0.75);
//! assert_eq!(threshold.get(), 0.75);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::rc::Rc;

use log::warn;

use crate::error::{RegistryError, RegistryResult};
use crate::group::{Category, Group};
use crate::registry::{ParameterKey, Registry, Slot};
use crate::value::{ParameterValue, Value};

impl Slot {
    /// Programmatic write: clamp to the range and flag for the next push.
    ///
    /// NaN is ignored for every category.
    pub(crate) fn set_internal(&mut self, value: Value) {
        if value.is_nan() {
            warn!("Ignoring NaN set on {}/{}", self.group, self.name);
            return;
        }
        self.value = match self.category {
            Category::BoundedRange => value.clamp(self.min, self.max).unwrap_or(self.value),
            Category::Toggle | Category::FreeText => value,
        };
        self.changed_internally = true;
    }

    pub(crate) fn take_changed_externally(&mut self) -> bool {
        std::mem::replace(&mut self.changed_externally, false)
    }
}

/// Owning handle to a named, typed parameter.
///
/// The handle registers the parameter on creation and tombstones it on drop.
/// Its metadata (name, group, category, bounds) never changes.
pub struct Parameter<T: ParameterValue> {
    registry: Registry,
    key: ParameterKey,
    name: String,
    group: Group,
    category: Category,
    min: T,
    max: T,
}

impl Parameter<bool> {
    /// Declare a boolean switch.
    ///
    /// If `toggle` is `true` the control latches like a checkbox, otherwise it
    /// acts as a momentary button. The flag is stored as the parameter's max.
    pub fn toggle(registry: &Registry, group: Group, name: &str, value: bool, toggle: bool) -> Self {
        Self::declare(registry, group, name, Category::Toggle, value, false, toggle)
    }
}

impl<T: ParameterValue> Parameter<T> {
    /// Declare a parameter bounded to `range`.
    ///
    /// The initial value is clamped into the range. Reversed bounds are
    /// swapped with a warning.
    pub fn range(
        registry: &Registry,
        group: Group,
        name: &str,
        value: T,
        range: RangeInclusive<T>,
    ) -> Self {
        let (mut min, mut max) = range.into_inner();
        if min.into_value().as_f64() > max.into_value().as_f64() {
            warn!("Reversed bounds for {}/{}: {}..={}", group, name, min, max);
            std::mem::swap(&mut min, &mut max);
        }

        let value = value
            .into_value()
            .clamp(min.into_value(), max.into_value())
            .map(T::from_value)
            .unwrap_or(min);
        Self::declare(registry, group, name, Category::BoundedRange, value, min, max)
    }

    /// Declare a parameter edited as free text.
    pub fn text(registry: &Registry, group: Group, name: &str, value: T) -> Self {
        let zero = T::from_value(Value::Int(0));
        Self::declare(registry, group, name, Category::FreeText, value, zero, zero)
    }

    fn declare(
        registry: &Registry,
        group: Group,
        name: &str,
        category: Category,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        let slot = Slot::new(
            name,
            group,
            category,
            value.into_value(),
            min.into_value(),
            max.into_value(),
        );
        let key = registry.register(slot);

        Self {
            registry: registry.clone(),
            key,
            name: name.to_string(),
            group,
            category,
            min,
            max,
        }
    }

    /// Attach the callback run by the sync engine when a change is applied.
    pub fn with_on_update(self, on_update: impl Fn() + 'static) -> Self {
        self.set_on_update(on_update);
        self
    }

    /// Replace the update callback.
    pub fn set_on_update(&self, on_update: impl Fn() + 'static) {
        let callback: Rc<dyn Fn()> = Rc::new(on_update);
        self.slot_mut(|slot| slot.on_update = Some(callback));
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.slot(|slot| T::from_value(slot.value))
    }

    /// Set the value from code.
    ///
    /// Range parameters clamp the value to `[min, max]`. The change reaches the
    /// control, and the update callback, on the next sync tick.
    pub fn set(&self, value: T) {
        self.slot_mut(|slot| slot.set_internal(value.into_value()));
    }

    /// Returns `true` once for each change pulled in from the control.
    ///
    /// Changes made with [`set`](Self::set) never trip this detector.
    pub fn check_and_reset_if_changed(&self) -> bool {
        self.slot_mut(Slot::take_changed_externally)
    }

    /// Current value as a [`Value`].
    pub fn value_variant(&self) -> Value {
        self.slot(|slot| slot.value)
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning group.
    pub fn group(&self) -> Group {
        self.group
    }

    /// Declaration form.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Lower bound (zero unless declared with [`range`](Self::range)).
    pub fn min(&self) -> T {
        self.min
    }

    /// Upper bound, or the toggle flag for toggles.
    pub fn max(&self) -> T {
        self.max
    }

    /// Arena key of this parameter.
    pub fn key(&self) -> ParameterKey {
        self.key
    }

    /// Registry this parameter lives in.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn slot<R>(&self, f: impl FnOnce(&Slot) -> R) -> R {
        self.registry
            .with_slot(self.key, f)
            .expect("parameter slot is only vacated by its owning handle")
    }

    fn slot_mut<R>(&self, f: impl FnOnce(&mut Slot) -> R) -> R {
        self.registry
            .with_slot_mut(self.key, f)
            .expect("parameter slot is only vacated by its owning handle")
    }
}

impl<T: ParameterValue> Drop for Parameter<T> {
    fn drop(&mut self) {
        self.registry.release(self.key);
    }
}

impl<T: ParameterValue> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("category", &self.category)
            .field("key", &self.key)
            .field("value", &self.get())
            .finish()
    }
}

/// Non-owning, typed view of a parameter.
///
/// Obtained from [`Registry::lookup`](crate::Registry::lookup). The view never
/// keeps the parameter alive; once the owning [`Parameter`] is dropped every
/// method returns [`RegistryError::Destroyed`].
#[derive(Clone)]
pub struct ParameterRef<T: ParameterValue> {
    registry: Registry,
    key: ParameterKey,
    group: Group,
    name: String,
    _marker: PhantomData<T>,
}

impl<T: ParameterValue> ParameterRef<T> {
    pub(crate) fn new(registry: Registry, key: ParameterKey, group: Group, name: &str) -> Self {
        Self {
            registry,
            key,
            group,
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    /// Current value.
    pub fn get(&self) -> RegistryResult<T> {
        self.registry
            .with_slot(self.key, |slot| T::from_value(slot.value))
            .ok_or_else(|| self.destroyed())
    }

    /// Set the value from code, as [`Parameter::set`] does.
    pub fn set(&self, value: T) -> RegistryResult<()> {
        self.registry
            .with_slot_mut(self.key, |slot| slot.set_internal(value.into_value()))
            .ok_or_else(|| self.destroyed())
    }

    /// Edge detector for changes pulled in from the control.
    pub fn check_and_reset_if_changed(&self) -> RegistryResult<bool> {
        self.registry
            .with_slot_mut(self.key, Slot::take_changed_externally)
            .ok_or_else(|| self.destroyed())
    }

    /// Returns `true` while the owning handle exists.
    pub fn is_alive(&self) -> bool {
        self.registry.with_slot(self.key, |_| ()).is_some()
    }

    /// Arena key of the referenced parameter.
    pub fn key(&self) -> ParameterKey {
        self.key
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning group.
    pub fn group(&self) -> Group {
        self.group
    }

    fn destroyed(&self) -> RegistryError {
        RegistryError::Destroyed {
            group: self.group,
            name: self.name.clone(),
        }
    }
}

impl<T: ParameterValue> fmt::Debug for ParameterRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterRef")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_range_declaration() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        assert_eq!(gain.get(), 1.0);
        assert_eq!(gain.min(), 0.0);
        assert_eq!(gain.max(), 10.0);
        assert_eq!(gain.category(), Category::BoundedRange);
        assert_eq!(gain.name(), "gain");
        assert_eq!(gain.group(), Group::Main);
        assert_eq!(gain.value_variant(), Value::Double(1.0));
    }

    #[test]
    fn test_range_clamps_initial_value() {
        let registry = Registry::new();
        let p = Parameter::range(&registry, Group::Main, "p", 42, 0..=10);
        assert_eq!(p.get(), 10);
    }

    #[test]
    fn test_range_swaps_reversed_bounds() {
        let registry = Registry::new();
        let p = Parameter::range(&registry, Group::Main, "p", 5.0f32, 10.0..=0.0);
        assert_eq!((p.min(), p.max()), (0.0, 10.0));
        assert_eq!(p.get(), 5.0);
    }

    #[test]
    fn test_toggle_stores_flag_as_max() {
        let registry = Registry::new();
        let button = Parameter::toggle(&registry, Group::Main, "reset", false, false);
        let switch = Parameter::toggle(&registry, Group::Main, "enabled", true, true);

        assert!(!button.max());
        assert!(switch.max());
        assert!(switch.get());
        assert_eq!(switch.category(), Category::Toggle);
    }

    #[test]
    fn test_text_declaration() {
        let registry = Registry::new();
        let frames = Parameter::text(&registry, Group::Tracking, "max_frames", 30i32);
        assert_eq!(frames.get(), 30);
        assert_eq!(frames.category(), Category::FreeText);
        assert_eq!((frames.min(), frames.max()), (0, 0));
    }

    #[test]
    fn test_set_marks_internal_change_only() {
        let registry = Registry::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0)
            .with_on_update(move || counter.set(counter.get() + 1));

        gain.set(7.5);
        assert_eq!(gain.get(), 7.5);
        assert!(!gain.check_and_reset_if_changed());
        assert!(registry.with_slot(gain.key(), |s| s.changed_internally).unwrap());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_set_clamps_range() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        gain.set(12.0);
        assert_eq!(gain.get(), 10.0);
        gain.set(-3.0);
        assert_eq!(gain.get(), 0.0);
        gain.set(f64::NAN);
        assert_eq!(gain.get(), 0.0);
    }

    #[test]
    fn test_set_ignores_nan_for_text() {
        let registry = Registry::new();
        let p = Parameter::text(&registry, Group::Main, "p", 1.5);
        p.set(f64::NAN);

        assert_eq!(p.get(), 1.5);
        assert!(!registry.with_slot(p.key(), |s| s.changed_internally).unwrap());

        let f = Parameter::text(&registry, Group::Main, "f", 0.5f32);
        f.set(f32::NAN);
        assert_eq!(f.get(), 0.5);
    }

    #[test]
    fn test_set_does_not_clamp_text() {
        let registry = Registry::new();
        let p = Parameter::text(&registry, Group::Main, "p", 1.0);
        p.set(-1000.0);
        assert_eq!(p.get(), -1000.0);
    }

    #[test]
    fn test_edge_detector_fires_once() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);
        registry.with_slot_mut(gain.key(), |s| s.changed_externally = true);

        assert!(gain.check_and_reset_if_changed());
        assert!(!gain.check_and_reset_if_changed());
    }

    #[test]
    fn test_parameter_ref_follows_owner() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);
        let view = registry.lookup::<f64>(Group::Main, "gain").unwrap();

        view.set(3.0).unwrap();
        assert_eq!(gain.get(), 3.0);
        assert!(view.is_alive());

        drop(gain);
        assert!(!view.is_alive());
        assert_eq!(
            view.get(),
            Err(RegistryError::Destroyed {
                group: Group::Main,
                name: "gain".to_string(),
            })
        );
        assert!(view.set(1.0).is_err());
        assert!(view.check_and_reset_if_changed().is_err());
    }
}
