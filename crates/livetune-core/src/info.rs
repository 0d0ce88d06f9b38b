//! Parameter metadata snapshots.

use crate::group::{Category, Group};
use crate::registry::ParameterKey;
use crate::value::{Value, ValueKind};

/// Snapshot describing a single live parameter.
///
/// Returned by [`Registry::parameters`](crate::Registry::parameters). The
/// snapshot does not follow later changes to the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Arena key of the parameter.
    pub key: ParameterKey,
    /// Name, unique within the group.
    pub name: String,
    /// Owning group.
    pub group: Group,
    /// Declaration form.
    pub category: Category,
    /// Current value.
    pub value: Value,
    /// Lower bound. Only meaningful for [`Category::BoundedRange`].
    pub min: Value,
    /// Upper bound, or the toggle flag for [`Category::Toggle`].
    pub max: Value,
}

impl ParameterInfo {
    /// Value type of the parameter.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// For toggles, whether the switch latches (`true`) or acts as a button.
    pub fn is_latching(&self) -> bool {
        matches!((self.category, self.max), (Category::Toggle, Value::Bool(true)))
    }
}
