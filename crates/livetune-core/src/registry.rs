//! Parameter registry.
//!
//! The [`Registry`] is the directory every [`Parameter`](crate::Parameter)
//! registers itself into. It has two parts:
//!
//! - an **arena** of slots holding each parameter's state, addressed by a
//!   stable [`ParameterKey`]. Keys are never reused, so a stale key can only
//!   ever see an empty slot.
//! - a **directory** mapping `(group, name)` to a key, in declaration order.
//!
//! The parameter handle owns its slot: dropping the handle vacates the slot
//! (a tombstone) but keeps the directory entry, so the iteration order of a
//! group never shifts under a running panel.
//!
//! The arena only grows. Every declaration takes a fresh slot and a vacated
//! slot is never compacted, so a program that keeps declaring and dropping
//! parameters pays one empty `Option<Slot>` per dropped parameter. Parameters
//! are expected to be declared a bounded number of times.
//!
//! # Threading
//!
//! The registry is built on `Rc<RefCell<..>>` and is not `Send`. All
//! declaration, mutation and reconciliation happen on one thread, usually the
//! thread driving the UI loop. [`Registry::global`] returns the shared
//! registry of the current thread.
//!
//! # Example
//!
//! ```ignore
//! use livetune_core::{Group, Parameter, Registry};
//!
//! let registry = Registry::new();
//! let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);
//!
//! let same = registry.lookup::<f64>(Group::Main, "gain")?;
//! assert_eq!(same.get()?, 1.0);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use crate::config::SyncConfig;
use crate::error::{Diagnostic, RegistryError, RegistryResult};
use crate::group::{Category, Group};
use crate::info::ParameterInfo;
use crate::parameter::ParameterRef;
use crate::value::{ParameterValue, Value};

/// Stable address of a parameter slot in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterKey(usize);

impl ParameterKey {
    /// Position of the slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Update callback attached to a parameter.
pub(crate) type Callback = Rc<dyn Fn()>;

/// State of one parameter.
pub(crate) struct Slot {
    pub(crate) name: String,
    pub(crate) group: Group,
    pub(crate) category: Category,
    pub(crate) value: Value,
    pub(crate) min: Value,
    pub(crate) max: Value,
    pub(crate) on_update: Option<Callback>,
    pub(crate) changed_externally: bool,
    pub(crate) changed_internally: bool,
}

impl Slot {
    pub(crate) fn new(
        name: &str,
        group: Group,
        category: Category,
        value: Value,
        min: Value,
        max: Value,
    ) -> Self {
        Self {
            name: name.to_string(),
            group,
            category,
            value,
            min,
            max,
            on_update: None,
            changed_externally: false,
            changed_internally: false,
        }
    }

    pub(crate) fn info(&self, key: ParameterKey) -> ParameterInfo {
        ParameterInfo {
            key,
            name: self.name.clone(),
            group: self.group,
            category: self.category,
            value: self.value,
            min: self.min,
            max: self.max,
        }
    }
}

/// Names of one group in declaration order.
#[derive(Default)]
struct GroupEntries {
    order: Vec<String>,
    keys: HashMap<String, ParameterKey>,
}

struct Directory {
    config: SyncConfig,
    slots: Vec<Option<Slot>>,
    groups: BTreeMap<Group, GroupEntries>,
    diagnostics: VecDeque<Diagnostic>,
}

impl Directory {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        if self.config.diagnostic_capacity == 0 {
            return;
        }
        while self.diagnostics.len() >= self.config.diagnostic_capacity {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(diagnostic);
    }

    fn resolve(&self, group: Group, name: &str) -> RegistryResult<ParameterKey> {
        let key = self
            .groups
            .get(&group)
            .and_then(|entries| entries.keys.get(name))
            .copied()
            .ok_or_else(|| RegistryError::NotFound {
                group,
                name: name.to_string(),
            })?;

        match self.slots.get(key.0) {
            Some(Some(_)) => Ok(key),
            _ => Err(RegistryError::Destroyed {
                group,
                name: name.to_string(),
            }),
        }
    }
}

/// Directory of all declared parameters.
///
/// Cloning a `Registry` is cheap and yields another handle to the same
/// directory.
#[derive(Clone)]
pub struct Registry {
    inner: Rc<RefCell<Directory>>,
}

thread_local! {
    static GLOBAL: Registry = Registry::new();
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::DEFAULT)
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Directory {
                config,
                slots: Vec::new(),
                groups: BTreeMap::new(),
                diagnostics: VecDeque::new(),
            })),
        }
    }

    /// The shared registry of the current thread.
    ///
    /// Code that declares parameters without passing a registry around can
    /// use this one; every call on the same thread returns the same directory.
    pub fn global() -> Self {
        GLOBAL.with(Registry::clone)
    }

    /// Configuration this registry was created with.
    pub fn config(&self) -> SyncConfig {
        self.inner.borrow().config
    }

    /// Returns `true` if both handles point to the same directory.
    pub fn ptr_eq(&self, other: &Registry) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Store a new slot and point `(group, name)` at it.
    ///
    /// An existing live entry under the same name is overwritten with a
    /// [`Diagnostic::DuplicateName`] warning. The earlier parameter keeps its
    /// slot until its handle is dropped. A name whose parameter was dropped is
    /// taken over silently.
    pub(crate) fn register(&self, slot: Slot) -> ParameterKey {
        let mut guard = self.inner.borrow_mut();
        let dir = &mut *guard;
        let key = ParameterKey(dir.slots.len());
        let group = slot.group;
        let name = slot.name.clone();

        let entries = dir.groups.entry(group).or_default();
        let previous = entries.keys.insert(name.clone(), key);
        if previous.is_none() {
            entries.order.push(name.clone());
        }
        let shadowed = previous.is_some_and(|k| matches!(dir.slots.get(k.0), Some(Some(_))));
        dir.slots.push(Some(slot));

        if shadowed {
            dir.report(Diagnostic::DuplicateName { group, name });
        } else {
            debug!("Registered parameter {}/{} as {}", group, name, key);
        }
        key
    }

    /// Vacate a slot, leaving a tombstone behind.
    pub(crate) fn release(&self, key: ParameterKey) {
        let mut dir = self.inner.borrow_mut();
        if let Some(slot) = dir.slots.get_mut(key.0).and_then(Option::take) {
            warn!("Parameter being deleted: {}/{}", slot.group, slot.name);
        }
    }

    pub(crate) fn with_slot<R>(&self, key: ParameterKey, f: impl FnOnce(&Slot) -> R) -> Option<R> {
        let dir = self.inner.borrow();
        dir.slots.get(key.0).and_then(Option::as_ref).map(f)
    }

    pub(crate) fn with_slot_mut<R>(
        &self,
        key: ParameterKey,
        f: impl FnOnce(&mut Slot) -> R,
    ) -> Option<R> {
        let mut dir = self.inner.borrow_mut();
        dir.slots.get_mut(key.0).and_then(Option::as_mut).map(f)
    }

    /// Record a warning-level event.
    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.inner.borrow_mut().report(diagnostic);
    }

    /// Look up a live parameter by group and name.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if nothing was declared under this name
    /// - [`RegistryError::Destroyed`] if the parameter has been dropped
    /// - [`RegistryError::TypeMismatch`] if `T` is not the parameter's type
    ///
    /// Each error is also recorded as a diagnostic.
    pub fn lookup<T: ParameterValue>(
        &self,
        group: Group,
        name: &str,
    ) -> RegistryResult<ParameterRef<T>> {
        let result = self.resolve_typed::<T>(group, name);
        if let Err(error) = &result {
            self.report(Diagnostic::from_lookup_error(error));
        }
        result.map(|key| ParameterRef::new(self.clone(), key, group, name))
    }

    fn resolve_typed<T: ParameterValue>(
        &self,
        group: Group,
        name: &str,
    ) -> RegistryResult<ParameterKey> {
        let dir = self.inner.borrow();
        let key = dir.resolve(group, name)?;
        let found = dir
            .slots
            .get(key.0)
            .and_then(Option::as_ref)
            .map(|slot| slot.value.kind())
            .ok_or_else(|| RegistryError::Destroyed {
                group,
                name: name.to_string(),
            })?;

        if found != T::KIND {
            return Err(RegistryError::TypeMismatch {
                group,
                name: name.to_string(),
                expected: T::KIND,
                found,
            });
        }
        Ok(key)
    }

    /// Returns `true` if a live parameter is registered under this name.
    pub fn contains(&self, group: Group, name: &str) -> bool {
        self.inner.borrow().resolve(group, name).is_ok()
    }

    /// Snapshots of the live parameters of a group, in declaration order.
    pub fn parameters(&self, group: Group) -> Vec<ParameterInfo> {
        let dir = self.inner.borrow();
        let Some(entries) = dir.groups.get(&group) else {
            return Vec::new();
        };

        entries
            .order
            .iter()
            .filter_map(|name| entries.keys.get(name))
            .filter_map(|&key| {
                dir.slots
                    .get(key.0)
                    .and_then(Option::as_ref)
                    .map(|slot| slot.info(key))
            })
            .collect()
    }

    /// Groups holding at least one live parameter, in group order.
    pub fn groups(&self) -> Vec<Group> {
        let dir = self.inner.borrow();
        dir.groups
            .iter()
            .filter(|(_, entries)| {
                entries
                    .keys
                    .values()
                    .any(|key| matches!(dir.slots.get(key.0), Some(Some(_))))
            })
            .map(|(&group, _)| group)
            .collect()
    }

    /// Number of live parameters, including ones shadowed by a duplicate name.
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.iter().flatten().count()
    }

    /// Returns `true` if no live parameter exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the recorded diagnostics, oldest first.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.borrow_mut().diagnostics.drain(..).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.inner.borrow();
        f.debug_struct("Registry")
            .field("slots", &dir.slots.len())
            .field("live", &dir.slots.iter().flatten().count())
            .field("groups", &dir.groups.len())
            .finish()
    }
}
