//! Parameter-to-control bindings.
//!
//! A [`BindingTable`] records which control on a surface mirrors which
//! parameter. Controls are created once, by [`BindingTable::materialize`], one
//! group at a time; the sync engine then walks the table every tick.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::group::{Category, Group};
use crate::info::ParameterInfo;
use crate::registry::{ParameterKey, Registry};
use crate::surface::{ControlId, ControlSurface};
use crate::sync::control_value;
use crate::text;
use crate::value::{ParameterValue, ValueKind};

/// A parameter paired with the control that mirrors it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Arena key of the parameter. The parameter may have been dropped since.
    pub key: ParameterKey,
    pub group: Group,
    pub name: String,
    pub category: Category,
    pub kind: ValueKind,
    pub control: ControlId,
    /// Last control content rejected by reconciliation, so the same bad input
    /// is only reported once.
    pub(crate) rejected: Option<String>,
    /// Set once a missing control has been reported.
    pub(crate) control_missing: bool,
}

/// Bindings keyed by group and name, in materialization order.
#[derive(Debug, Default)]
pub struct BindingTable {
    groups: BTreeMap<Group, Vec<Binding>>,
}

impl BindingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a control for every live parameter of `group`.
    ///
    /// Controls are created in declaration order and labelled
    /// `"<panel><separator><name>"`. The control kind follows the parameter's
    /// category.
    ///
    /// A name that is already bound to the same parameter is skipped with a
    /// warning. A name whose binding points at another parameter (dropped and
    /// declared again, or shadowed by a duplicate) is rebound to the current
    /// one. The control is kept and rewritten if it shows the same category
    /// and value type, otherwise a new control is created. A kept range
    /// control keeps the bounds it was created with; pulled values are still
    /// clamped to the new parameter's bounds.
    ///
    /// Returns the number of bindings added or rebound.
    pub fn materialize<S: ControlSurface + ?Sized>(
        &mut self,
        registry: &Registry,
        surface: &mut S,
        panel: &str,
        group: Group,
    ) -> usize {
        let config = registry.config();
        let bindings = self.groups.entry(group).or_default();
        let mut added = 0;

        for info in registry.parameters(group) {
            let existing = bindings.iter_mut().find(|b| b.name == info.name);
            if let Some(binding) = existing {
                if binding.key == info.key {
                    warn!("Parameter {}/{} is already bound, skipping", group, info.name);
                    continue;
                }

                if binding.category == info.category && binding.kind == info.kind() {
                    surface.write(binding.control, control_value(info.category, info.value));
                } else {
                    let label = config.label(panel, &info.name);
                    binding.control = create_control(surface, &label, &info);
                }
                debug!("Rebound {}/{} from {} to {}", group, info.name, binding.key, info.key);
                binding.key = info.key;
                binding.category = info.category;
                binding.kind = info.kind();
                binding.rejected = None;
                binding.control_missing = false;
                added += 1;
                continue;
            }

            let label = config.label(panel, &info.name);
            let control = create_control(surface, &label, &info);
            debug!("Bound {} ({}) to {}", label, info.category, control);

            bindings.push(Binding {
                key: info.key,
                group,
                kind: info.kind(),
                name: info.name,
                category: info.category,
                control,
                rejected: None,
                control_missing: false,
            });
            added += 1;
        }
        added
    }

    /// Binding for a parameter name.
    pub fn get(&self, group: Group, name: &str) -> Option<&Binding> {
        self.groups.get(&group)?.iter().find(|b| b.name == name)
    }

    /// All bindings, by group then materialization order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.groups.values().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
        self.groups.values_mut().flatten()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn create_control<S: ControlSurface + ?Sized>(
    surface: &mut S,
    label: &str,
    info: &ParameterInfo,
) -> ControlId {
    match info.category {
        Category::Toggle => {
            surface.create_toggle(label, bool::from_value(info.value), info.is_latching())
        }
        Category::BoundedRange => surface.create_range(label, info.value, info.min, info.max),
        Category::FreeText => surface.create_text(label, &text::format(info.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::surface::{ControlShape, ControlValue, MemorySurface};
    use crate::value::Value;

    #[test]
    fn test_materialize_by_category() {
        let registry = Registry::new();
        let _gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);
        let _enabled = Parameter::toggle(&registry, Group::Main, "enabled", true, true);
        let _pi = Parameter::text(&registry, Group::Main, "pi", 3.14);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 3);

        assert_eq!(surface.labels(), vec!["Main.gain", "Main.enabled", "Main.pi"]);

        let gain = table.get(Group::Main, "gain").unwrap();
        let control = surface.control(gain.control).unwrap();
        assert_eq!(
            control.shape,
            ControlShape::Range {
                min: Value::Double(0.0),
                max: Value::Double(10.0),
            }
        );
        assert_eq!(control.value, ControlValue::Scalar(Value::Double(1.0)));

        let enabled = table.get(Group::Main, "enabled").unwrap();
        assert_eq!(
            surface.control(enabled.control).unwrap().shape,
            ControlShape::Toggle { latching: true }
        );

        let pi = table.get(Group::Main, "pi").unwrap();
        assert_eq!(pi.kind, ValueKind::Double);
        assert_eq!(
            surface.value(pi.control),
            Some(&ControlValue::Text("3.14".to_string()))
        );
    }

    #[test]
    fn test_materialize_only_target_group() {
        let registry = Registry::new();
        let _a = Parameter::text(&registry, Group::Main, "a", 1);
        let _b = Parameter::text(&registry, Group::Tracking, "b", 1);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        table.materialize(&registry, &mut surface, "Tracking", Group::Tracking);

        assert_eq!(table.len(), 1);
        assert!(table.get(Group::Main, "a").is_none());
        assert_eq!(surface.labels(), vec!["Tracking.b"]);
    }

    #[test]
    fn test_materialize_twice_skips_bound() {
        let registry = Registry::new();
        let _a = Parameter::text(&registry, Group::Main, "a", 1);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 1);

        let _b = Parameter::text(&registry, Group::Main, "b", 2);
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 1);
        assert_eq!(surface.len(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_materialize_rebinds_redeclared_name() {
        let registry = Registry::new();
        let first = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        table.materialize(&registry, &mut surface, "Main", Group::Main);
        let control = table.get(Group::Main, "gain").unwrap().control;

        drop(first);
        let second = Parameter::range(&registry, Group::Main, "gain", 2.0, 0.0..=10.0);
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 1);

        let binding = table.get(Group::Main, "gain").unwrap();
        assert_eq!(binding.key, second.key());
        assert_eq!(binding.control, control);
        assert_eq!(table.len(), 1);
        assert_eq!(surface.len(), 1);
        assert_eq!(surface.value(control), Some(&ControlValue::Scalar(Value::Double(2.0))));
    }

    #[test]
    fn test_materialize_rebinds_shadowing_duplicate() {
        let registry = Registry::new();
        let _first = Parameter::toggle(&registry, Group::Main, "enabled", false, true);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        table.materialize(&registry, &mut surface, "Main", Group::Main);

        let second = Parameter::toggle(&registry, Group::Main, "enabled", true, true);
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 1);

        let binding = table.get(Group::Main, "enabled").unwrap();
        assert_eq!(binding.key, second.key());
        assert_eq!(
            surface.value(binding.control),
            Some(&ControlValue::Scalar(Value::Bool(true)))
        );
    }

    #[test]
    fn test_materialize_rebuilds_control_on_category_change() {
        let registry = Registry::new();
        let first = Parameter::range(&registry, Group::Main, "frames", 5, 0..=10);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        table.materialize(&registry, &mut surface, "Main", Group::Main);
        let old_control = table.get(Group::Main, "frames").unwrap().control;

        drop(first);
        let _second = Parameter::text(&registry, Group::Main, "frames", 7.5);
        table.materialize(&registry, &mut surface, "Main", Group::Main);

        let binding = table.get(Group::Main, "frames").unwrap();
        assert_ne!(binding.control, old_control);
        assert_eq!(binding.category, Category::FreeText);
        assert_eq!(binding.kind, ValueKind::Double);
        assert_eq!(surface.control(binding.control).unwrap().shape, ControlShape::Text);
        assert_eq!(
            surface.value(binding.control),
            Some(&ControlValue::Text("7.5".to_string()))
        );
    }

    #[test]
    fn test_toggle_latching_follows_declaration() {
        let registry = Registry::new();
        let _button = Parameter::toggle(&registry, Group::Main, "reset", false, false);

        let info = &registry.parameters(Group::Main)[0];
        assert!(!info.is_latching());

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        table.materialize(&registry, &mut surface, "Main", Group::Main);
        let control = table.get(Group::Main, "reset").unwrap().control;
        assert_eq!(
            surface.control(control).unwrap().shape,
            ControlShape::Toggle { latching: false }
        );
    }

    #[test]
    fn test_materialize_skips_tombstones() {
        let registry = Registry::new();
        let a = Parameter::text(&registry, Group::Main, "a", 1);
        let _b = Parameter::text(&registry, Group::Main, "b", 1);
        drop(a);

        let mut surface = MemorySurface::new();
        let mut table = BindingTable::new();
        assert_eq!(table.materialize(&registry, &mut surface, "Main", Group::Main), 1);
        assert_eq!(surface.labels(), vec!["Main.b"]);
    }

    #[test]
    fn test_label_separator_from_config() {
        let registry =
            Registry::with_config(crate::config::SyncConfig::new().with_label_separator("/"));
        let _a = Parameter::text(&registry, Group::Main, "a", 1);

        let mut surface = MemorySurface::new();
        BindingTable::new().materialize(&registry, &mut surface, "Panel", Group::Main);
        assert_eq!(surface.labels(), vec!["Panel/a"]);
    }
}
