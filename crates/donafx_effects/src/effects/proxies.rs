//! Scene proxies for simulated entities (shapes, particles).

use donafx_core::{ObjectDescriptor, ObjectRef, SceneGateway, SceneResult};

/// Upper bound on proxies per instance.
pub(crate) const MAX_PROXIES: usize = 1_000;

/// The objects one instance created, in entity order.
#[derive(Debug, Default)]
pub(crate) struct ProxySet {
    handles: Vec<ObjectRef>,
}

impl ProxySet {
    /// Creates every descriptor. All-or-nothing: on the first refusal the
    /// objects created so far are removed again and the error is returned.
    pub fn spawn(
        &mut self,
        scene: &mut dyn SceneGateway,
        descriptors: impl IntoIterator<Item = ObjectDescriptor>,
    ) -> SceneResult<()> {
        for desc in descriptors {
            match scene.add_object(desc) {
                Ok(handle) => self.handles.push(handle),
                Err(err) => {
                    self.clear(scene);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Handle of the `i`-th entity's proxy.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&ObjectRef> {
        self.handles.get(i)
    }

    /// Removes every proxy. Returns how many were still in the scene.
    pub fn clear(&mut self, scene: &mut dyn SceneGateway) -> usize {
        self.handles
            .drain(..)
            .filter(|h| scene.remove_object(h))
            .count()
    }
}
