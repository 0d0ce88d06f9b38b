//! A panel session: one surface, its bindings and the engine that syncs them.

use log::info;

use crate::binding::BindingTable;
use crate::group::Group;
use crate::registry::Registry;
use crate::surface::ControlSurface;
use crate::sync::{SyncEngine, TickReport};

/// Mirrors parameters of a registry onto one control surface.
///
/// Bindings live as long as the session. Dropping the session leaves the
/// parameters untouched.
///
/// # Example
///
/// ```ignore
/// use livetune_core::{Group, MemorySurface, Parameter, Registry, Session};
///
/// let registry = Registry::new();
/// let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);
///
/// let mut session = Session::new(registry.clone(), MemorySurface::new());
/// session.materialize("Main", Group::Main);
///
/// // Once per frame:
/// session.tick();
/// ```
#[derive(Debug)]
pub struct Session<S: ControlSurface> {
    surface: S,
    bindings: BindingTable,
    engine: SyncEngine,
}

impl<S: ControlSurface> Session<S> {
    /// Create a session with no bindings.
    pub fn new(registry: Registry, surface: S) -> Self {
        Self {
            surface,
            bindings: BindingTable::new(),
            engine: SyncEngine::new(registry),
        }
    }

    /// Create controls for the live parameters of `group` under `panel`.
    ///
    /// Returns the number of bindings added or rebound.
    pub fn materialize(&mut self, panel: &str, group: Group) -> usize {
        let added = self
            .bindings
            .materialize(self.engine.registry(), &mut self.surface, panel, group);
        info!("Panel {}: bound {} parameters of {}", panel, added, group);
        added
    }

    /// Create controls for every group that has live parameters.
    pub fn materialize_all(&mut self, panel: &str) -> usize {
        let groups = self.engine.registry().groups();
        groups
            .into_iter()
            .map(|group| self.materialize(panel, group))
            .sum()
    }

    /// Run one reconciliation pass.
    pub fn tick(&mut self) -> TickReport {
        self.engine.tick(&mut self.bindings, &mut self.surface)
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.engine.ticks()
    }

    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// End the session and hand back the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::surface::{ControlValue, MemorySurface};
    use crate::value::Value;

    #[test]
    fn test_materialize_all_groups() {
        let registry = Registry::new();
        let _a = Parameter::text(&registry, Group::Tracking, "a", 1);
        let _b = Parameter::toggle(&registry, Group::Main, "b", false, true);
        let _c = Parameter::range(&registry, Group::OrbExtractor, "c", 0.5, 0.0..=1.0);

        let mut session = Session::new(registry, MemorySurface::new());
        assert_eq!(session.materialize_all("Debug"), 3);
        assert_eq!(session.bindings().len(), 3);
        assert_eq!(
            session.surface().labels(),
            vec!["Debug.b", "Debug.c", "Debug.a"]
        );
    }

    #[test]
    fn test_tick_round_trip() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        let mut session = Session::new(registry.clone(), MemorySurface::new());
        session.materialize("Main", Group::Main);

        session.surface_mut().set_by_label("Main.gain", Value::Double(3.0));
        assert_eq!(session.tick().pulled, 1);
        assert_eq!(gain.get(), 3.0);

        gain.set(4.0);
        assert_eq!(session.tick().pushed, 1);
        let id = session.surface().find("Main.gain").unwrap();
        assert_eq!(
            session.surface().value(id),
            Some(&ControlValue::Scalar(Value::Double(4.0)))
        );
        assert_eq!(session.ticks(), 2);
        assert!(session.registry().ptr_eq(&registry));
    }

    #[test]
    fn test_redeclared_parameter_syncs_after_rematerialize() {
        let registry = Registry::new();
        let first = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        let mut session = Session::new(registry.clone(), MemorySurface::new());
        session.materialize("Main", Group::Main);

        drop(first);
        let second = Parameter::range(&registry, Group::Main, "gain", 2.0, 0.0..=10.0);
        assert_eq!(session.materialize("Main", Group::Main), 1);

        session.surface_mut().set_by_label("Main.gain", Value::Double(5.0));
        let report = session.tick();

        assert_eq!(report.pulled, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(second.get(), 5.0);
        assert!(second.check_and_reset_if_changed());
    }

    #[test]
    fn test_dropping_session_keeps_parameters() {
        let registry = Registry::new();
        let gain = Parameter::range(&registry, Group::Main, "gain", 1.0, 0.0..=10.0);

        let mut session = Session::new(registry.clone(), MemorySurface::new());
        session.materialize("Main", Group::Main);
        let surface = session.into_surface();
        assert_eq!(surface.len(), 1);

        gain.set(2.0);
        assert_eq!(gain.get(), 2.0);
        assert!(registry.contains(Group::Main, "gain"));
    }
}
