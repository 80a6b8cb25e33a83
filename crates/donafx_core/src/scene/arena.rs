//! # Scene Arena
//!
//! In-process scene graph: a name-keyed arena of objects, each carrying a
//! transform, visibility, a settings bag and an ordered filter list.
//!
//! The simulator renders nothing; it uses the arena so that every effect
//! can be observed exactly as a host would see it. Tests use the refusal
//! switches to model a host that declines to create objects or filters.

use super::gateway::SceneGateway;
use super::object::{
    FilterDescriptor, FilterKind, FilterRef, ObjectDescriptor, ObjectRef, SettingValue, Settings,
    SourceKind,
};
use crate::error::{SceneError, SceneResult};
use donafx_shared::{Transform, Vec2};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A filter attached to an object.
#[derive(Clone, Debug)]
struct SceneFilter {
    /// Handle (name)
    handle: FilterRef,
    /// Filter kind
    kind: FilterKind,
    /// Settings bag
    settings: Settings,
}

/// A live object in the arena.
#[derive(Clone, Debug)]
struct SceneObject {
    /// Object kind
    kind: SourceKind,
    /// Settings bag
    settings: Settings,
    /// Placement
    transform: Transform,
    /// Visible?
    visible: bool,
    /// Filters in attachment order
    filters: Vec<SceneFilter>,
}

/// Counters for arena activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Objects created
    pub objects_created: u64,
    /// Objects removed
    pub objects_removed: u64,
    /// Filters attached
    pub filters_added: u64,
    /// Filters detached
    pub filters_removed: u64,
    /// Creations refused
    pub refusals: u64,
    /// Mutations that targeted a missing object
    pub missed_mutations: u64,
}

/// In-process scene graph keyed by object name.
#[derive(Debug, Default)]
pub struct SceneArena {
    /// Objects by name
    objects: HashMap<Arc<str>, SceneObject>,
    /// Creation order (enumeration is deterministic)
    order: Vec<ObjectRef>,
    /// Object kinds the host refuses to create
    refused_objects: HashSet<SourceKind>,
    /// Filter kinds the host refuses to create
    refused_filters: HashSet<FilterKind>,
    /// Activity counters
    stats: ArenaStats,
}

impl SceneArena {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene holding one video object, the usual main source.
    ///
    /// # Errors
    ///
    /// Never fails on an empty arena; the `Result` mirrors `add_object`.
    pub fn with_main_source(name: &str, transform: Transform) -> SceneResult<Self> {
        let mut arena = Self::new();
        let mut desc = ObjectDescriptor::new(name, SourceKind::Video);
        desc.transform = transform;
        arena.add_object(desc)?;
        Ok(arena)
    }

    /// Makes the host refuse (or accept again) objects of `kind`.
    pub fn refuse_objects(&mut self, kind: SourceKind, refuse: bool) {
        if refuse {
            self.refused_objects.insert(kind);
        } else {
            self.refused_objects.remove(&kind);
        }
    }

    /// Makes the host refuse (or accept again) filters of `kind`.
    pub fn refuse_filters(&mut self, kind: FilterKind, refuse: bool) {
        if refuse {
            self.refused_filters.insert(kind);
        } else {
            self.refused_filters.remove(&kind);
        }
    }

    /// Number of live objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Is the scene empty?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Kind of an object.
    #[must_use]
    pub fn kind_of(&self, obj: &ObjectRef) -> Option<SourceKind> {
        self.objects.get(obj.name()).map(|o| o.kind)
    }

    /// Kind of a filter attached to `obj`.
    #[must_use]
    pub fn filter_kind(&self, obj: &ObjectRef, filter: &FilterRef) -> Option<FilterKind> {
        self.objects
            .get(obj.name())?
            .filters
            .iter()
            .find(|f| &f.handle == filter)
            .map(|f| f.kind)
    }

    /// Activity counters.
    #[must_use]
    pub const fn stats(&self) -> ArenaStats {
        self.stats
    }

    /// Counts objects whose name starts with `prefix`.
    #[must_use]
    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.order.iter().filter(|o| o.name().starts_with(prefix)).count()
    }

    /// Mutable access to a live object; counts a miss otherwise.
    fn object_mut(&mut self, obj: &ObjectRef) -> Option<&mut SceneObject> {
        let found = self.objects.get_mut(obj.name());
        if found.is_none() {
            self.stats.missed_mutations += 1;
            tracing::debug!("scene: '{}' not found, mutation skipped", obj.name());
        }
        found
    }
}

impl SceneGateway for SceneArena {
    fn find_by_name(&self, name: &str) -> Option<ObjectRef> {
        self.objects
            .get_key_value(name)
            .map(|(key, _)| ObjectRef::named(key))
    }

    fn transform(&self, obj: &ObjectRef) -> Option<Transform> {
        self.objects.get(obj.name()).map(|o| o.transform)
    }

    fn is_visible(&self, obj: &ObjectRef) -> Option<bool> {
        self.objects.get(obj.name()).map(|o| o.visible)
    }

    fn set_position(&mut self, obj: &ObjectRef, position: Vec2) {
        if let Some(o) = self.object_mut(obj) {
            o.transform.position = position;
        }
    }

    fn set_scale(&mut self, obj: &ObjectRef, scale: Vec2) {
        if let Some(o) = self.object_mut(obj) {
            o.transform.scale = scale;
        }
    }

    fn set_rotation(&mut self, obj: &ObjectRef, degrees: f32) {
        if let Some(o) = self.object_mut(obj) {
            o.transform.rotation = degrees;
        }
    }

    fn set_visible(&mut self, obj: &ObjectRef, visible: bool) {
        if let Some(o) = self.object_mut(obj) {
            o.visible = visible;
        }
    }

    fn setting(&self, obj: &ObjectRef, key: &str) -> Option<SettingValue> {
        self.objects.get(obj.name())?.settings.get(key).cloned()
    }

    fn update_setting(&mut self, obj: &ObjectRef, key: &str, value: SettingValue) {
        if let Some(o) = self.object_mut(obj) {
            o.settings.insert(key.to_owned(), value);
        }
    }

    fn add_object(&mut self, descriptor: ObjectDescriptor) -> SceneResult<ObjectRef> {
        if self.objects.contains_key(descriptor.name.as_str()) {
            return Err(SceneError::NameTaken(descriptor.name));
        }
        if self.refused_objects.contains(&descriptor.kind) {
            self.stats.refusals += 1;
            return Err(SceneError::CreationRefused {
                name: descriptor.name,
                kind: descriptor.kind.label().to_owned(),
            });
        }

        let handle = ObjectRef::named(&descriptor.name);
        self.objects.insert(
            Arc::from(descriptor.name.as_str()),
            SceneObject {
                kind: descriptor.kind,
                settings: descriptor.settings,
                transform: descriptor.transform,
                visible: descriptor.visible,
                filters: Vec::new(),
            },
        );
        self.order.push(handle.clone());
        self.stats.objects_created += 1;
        Ok(handle)
    }

    fn remove_object(&mut self, obj: &ObjectRef) -> bool {
        if self.objects.remove(obj.name()).is_none() {
            return false;
        }
        self.order.retain(|o| o != obj);
        self.stats.objects_removed += 1;
        true
    }

    fn add_filter(&mut self, obj: &ObjectRef, descriptor: FilterDescriptor) -> SceneResult<FilterRef> {
        if self.refused_filters.contains(&descriptor.kind) {
            self.stats.refusals += 1;
            return Err(SceneError::CreationRefused {
                name: descriptor.name,
                kind: descriptor.kind.label().to_owned(),
            });
        }
        let Some(target) = self.objects.get_mut(obj.name()) else {
            return Err(SceneError::ObjectNotFound(obj.name().to_owned()));
        };
        if target.filters.iter().any(|f| f.handle.name() == descriptor.name) {
            return Err(SceneError::NameTaken(descriptor.name));
        }

        let handle = FilterRef::named(&descriptor.name);
        target.filters.push(SceneFilter {
            handle: handle.clone(),
            kind: descriptor.kind,
            settings: descriptor.settings,
        });
        self.stats.filters_added += 1;
        Ok(handle)
    }

    fn update_filter_setting(
        &mut self,
        obj: &ObjectRef,
        filter: &FilterRef,
        key: &str,
        value: SettingValue,
    ) {
        let Some(target) = self.object_mut(obj) else {
            return;
        };
        if let Some(f) = target.filters.iter_mut().find(|f| &f.handle == filter) {
            f.settings.insert(key.to_owned(), value);
        }
    }

    fn filter_setting(&self, obj: &ObjectRef, filter: &FilterRef, key: &str) -> Option<SettingValue> {
        self.objects
            .get(obj.name())?
            .filters
            .iter()
            .find(|f| &f.handle == filter)?
            .settings
            .get(key)
            .cloned()
    }

    fn remove_filter(&mut self, obj: &ObjectRef, filter: &FilterRef) -> bool {
        let Some(target) = self.objects.get_mut(obj.name()) else {
            return false;
        };
        let before = target.filters.len();
        target.filters.retain(|f| &f.handle != filter);
        let removed = target.filters.len() < before;
        if removed {
            self.stats.filters_removed += 1;
        }
        removed
    }

    fn filters(&self, obj: &ObjectRef) -> Vec<FilterRef> {
        self.objects
            .get(obj.name())
            .map(|o| o.filters.iter().map(|f| f.handle.clone()).collect())
            .unwrap_or_default()
    }

    fn enumerate(&self, predicate: &mut dyn FnMut(&ObjectRef) -> bool) -> Vec<ObjectRef> {
        self.order.iter().filter(|o| predicate(o)).cloned().collect()
    }
}
