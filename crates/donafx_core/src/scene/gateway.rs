//! The gateway trait.

use super::object::{FilterDescriptor, FilterRef, ObjectDescriptor, ObjectRef, SettingValue};
use crate::error::SceneResult;
use donafx_shared::{Transform, Vec2};

/// Name-keyed access to the host scene.
///
/// Every mutation is a no-op when the referenced object no longer exists:
/// the host user may edit the scene while effects run. Lookups return
/// `None` in that case. Only creation can fail, and only because the host
/// refused it.
pub trait SceneGateway {
    /// Looks an object up by name.
    fn find_by_name(&self, name: &str) -> Option<ObjectRef>;

    /// Returns the object's transform.
    fn transform(&self, obj: &ObjectRef) -> Option<Transform>;

    /// Returns whether the object is visible.
    fn is_visible(&self, obj: &ObjectRef) -> Option<bool>;

    /// Moves the object.
    fn set_position(&mut self, obj: &ObjectRef, position: Vec2);

    /// Rescales the object.
    fn set_scale(&mut self, obj: &ObjectRef, scale: Vec2);

    /// Rotates the object (degrees).
    fn set_rotation(&mut self, obj: &ObjectRef, degrees: f32);

    /// Shows or hides the object.
    fn set_visible(&mut self, obj: &ObjectRef, visible: bool);

    /// Reads one setting of the object.
    fn setting(&self, obj: &ObjectRef, key: &str) -> Option<SettingValue>;

    /// Writes one setting of the object.
    fn update_setting(&mut self, obj: &ObjectRef, key: &str, value: SettingValue);

    /// Creates an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the host refuses the kind.
    fn add_object(&mut self, descriptor: ObjectDescriptor) -> SceneResult<ObjectRef>;

    /// Removes an object. Returns `false` if it did not exist.
    fn remove_object(&mut self, obj: &ObjectRef) -> bool;

    /// Attaches a filter to an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing, the filter name is taken
    /// on that object, or the host refuses the kind.
    fn add_filter(&mut self, obj: &ObjectRef, descriptor: FilterDescriptor) -> SceneResult<FilterRef>;

    /// Writes one setting of a filter.
    fn update_filter_setting(
        &mut self,
        obj: &ObjectRef,
        filter: &FilterRef,
        key: &str,
        value: SettingValue,
    );

    /// Reads one setting of a filter.
    fn filter_setting(&self, obj: &ObjectRef, filter: &FilterRef, key: &str) -> Option<SettingValue>;

    /// Detaches a filter. Returns `false` if it was not attached.
    fn remove_filter(&mut self, obj: &ObjectRef, filter: &FilterRef) -> bool;

    /// Lists the filters attached to an object, in attachment order.
    fn filters(&self, obj: &ObjectRef) -> Vec<FilterRef>;

    /// Lists every object accepted by `predicate`, in creation order.
    fn enumerate(&self, predicate: &mut dyn FnMut(&ObjectRef) -> bool) -> Vec<ObjectRef>;

    /// Does the object exist?
    #[inline]
    fn contains(&self, obj: &ObjectRef) -> bool {
        self.transform(obj).is_some()
    }
}
