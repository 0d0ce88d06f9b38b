//! Control surface interface.
//!
//! A control surface is whatever shows parameters to a user and lets them be
//! edited: a debug panel, an immediate-mode GUI, a terminal form. livetune only
//! needs to create one control per parameter, read it, and overwrite it. The
//! rendering and input handling stay on the surface's side.
//!
//! # Controls
//!
//! | Category       | Constructor                              | Holds           |
//! |----------------|------------------------------------------|-----------------|
//! | `Toggle`       | [`ControlSurface::create_toggle`]        | `Scalar(Bool)`  |
//! | `BoundedRange` | [`ControlSurface::create_range`]         | `Scalar(_)`     |
//! | `FreeText`     | [`ControlSurface::create_text`]          | `Text(_)`       |
//!
//! Labels have the form `"<panel>.<name>"`. Parameter names are not escaped;
//! callers keep characters that the surface's label parser treats specially
//! out of their names.
//!
//! [`MemorySurface`] is a headless implementation that keeps control values in
//! memory. It is used by tests and by hosts that drive parameters from code.

use std::fmt;

use crate::value::Value;

/// Handle to a control created by a [`ControlSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control {}", self.0)
    }
}

/// Content of a control: a typed scalar or a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Scalar(Value),
    Text(String),
}

impl ControlValue {
    /// Short description for diagnostics (e.g., "f64 3.5", "text \"abc\"").
    pub fn describe(&self) -> String {
        match self {
            ControlValue::Scalar(value) => format!("{} {}", value.kind(), value),
            ControlValue::Text(text) => format!("text {:?}", text),
        }
    }
}

impl From<Value> for ControlValue {
    fn from(value: Value) -> Self {
        ControlValue::Scalar(value)
    }
}

impl From<&str> for ControlValue {
    fn from(text: &str) -> Self {
        ControlValue::Text(text.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(text: String) -> Self {
        ControlValue::Text(text)
    }
}

/// Capability required from an external control surface.
pub trait ControlSurface {
    /// Create a boolean switch. `toggle` selects a latching switch (`true`)
    /// or a momentary button (`false`).
    fn create_toggle(&mut self, label: &str, value: bool, toggle: bool) -> ControlId;

    /// Create a control bounded to `[min, max]`. All three values share a kind.
    fn create_range(&mut self, label: &str, value: Value, min: Value, max: Value) -> ControlId;

    /// Create a text entry.
    fn create_text(&mut self, label: &str, text: &str) -> ControlId;

    /// Current content of a control, or `None` if it no longer exists.
    fn read(&self, id: ControlId) -> Option<ControlValue>;

    /// Overwrite the content of a control.
    fn write(&mut self, id: ControlId, value: ControlValue);
}

/// Shape of a control held by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControlShape {
    Toggle { latching: bool },
    Range { min: Value, max: Value },
    Text,
}

/// A control held by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryControl {
    pub label: String,
    pub shape: ControlShape,
    pub value: ControlValue,
    /// Number of [`ControlSurface::write`] calls received.
    pub writes: usize,
}

/// Headless control surface storing control values in memory.
///
/// Edits made through [`set_value`](Self::set_value) stand in for user input
/// and are not counted as writes. Values are stored as given, without
/// clamping, so out-of-range input can be exercised.
#[derive(Debug, Default)]
pub struct MemorySurface {
    controls: Vec<Option<MemoryControl>>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, label: &str, shape: ControlShape, value: ControlValue) -> ControlId {
        let id = ControlId(self.controls.len() as u32);
        self.controls.push(Some(MemoryControl {
            label: label.to_string(),
            shape,
            value,
            writes: 0,
        }));
        id
    }

    /// Number of live controls.
    pub fn len(&self) -> usize {
        self.controls.iter().flatten().count()
    }

    /// Returns `true` if the surface holds no controls.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Control by handle.
    pub fn control(&self, id: ControlId) -> Option<&MemoryControl> {
        self.controls.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Handle of the control with this label.
    pub fn find(&self, label: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.as_ref().is_some_and(|c| c.label == label))
            .map(|i| ControlId(i as u32))
    }

    /// Labels of the live controls in creation order.
    pub fn labels(&self) -> Vec<&str> {
        self.controls
            .iter()
            .flatten()
            .map(|c| c.label.as_str())
            .collect()
    }

    /// Current content of a control.
    pub fn value(&self, id: ControlId) -> Option<&ControlValue> {
        self.control(id).map(|c| &c.value)
    }

    /// Simulate a user edit. Returns `false` if the control does not exist.
    pub fn set_value(&mut self, id: ControlId, value: impl Into<ControlValue>) -> bool {
        match self.controls.get_mut(id.0 as usize).and_then(Option::as_mut) {
            Some(control) => {
                control.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Simulate a user edit on the control with this label.
    pub fn set_by_label(&mut self, label: &str, value: impl Into<ControlValue>) -> bool {
        match self.find(label) {
            Some(id) => self.set_value(id, value),
            None => false,
        }
    }

    /// Destroy a control, as a surface does when its panel is closed.
    pub fn remove(&mut self, id: ControlId) -> Option<MemoryControl> {
        self.controls.get_mut(id.0 as usize).and_then(Option::take)
    }

    /// Writes received by a control.
    pub fn writes(&self, id: ControlId) -> usize {
        self.control(id).map_or(0, |c| c.writes)
    }

    /// Writes received by all controls.
    pub fn total_writes(&self) -> usize {
        self.controls.iter().flatten().map(|c| c.writes).sum()
    }
}

impl ControlSurface for MemorySurface {
    fn create_toggle(&mut self, label: &str, value: bool, toggle: bool) -> ControlId {
        self.push(
            label,
            ControlShape::Toggle { latching: toggle },
            ControlValue::Scalar(Value::Bool(value)),
        )
    }

    fn create_range(&mut self, label: &str, value: Value, min: Value, max: Value) -> ControlId {
        self.push(label, ControlShape::Range { min, max }, ControlValue::Scalar(value))
    }

    fn create_text(&mut self, label: &str, text: &str) -> ControlId {
        self.push(label, ControlShape::Text, ControlValue::Text(text.to_string()))
    }

    fn read(&self, id: ControlId) -> Option<ControlValue> {
        self.value(id).cloned()
    }

    fn write(&mut self, id: ControlId, value: ControlValue) {
        if let Some(control) = self.controls.get_mut(id.0 as usize).and_then(Option::as_mut) {
            control.value = value;
            control.writes += 1;
        }
    }
}
