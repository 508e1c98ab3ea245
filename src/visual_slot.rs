use std::cell::OnceCell;

use anyhow::bail;
use tokio::sync::watch;

use crate::scene_graph::ObjectId;

/// The object the page animates: either the loaded asset or the fallback
/// shape. Written once by the scene manager, read by the render loop and
/// polled once per frame by the choreographer.
pub struct VisualSlot {
    object: OnceCell<ObjectId>,
    ready: watch::Sender<Option<ObjectId>>,
}

impl VisualSlot {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(None);

        Self {
            object: OnceCell::new(),
            ready,
        }
    }

    pub fn get(&self) -> Option<ObjectId> {
        self.object.get().copied()
    }

    pub fn is_resolved(&self) -> bool {
        self.object.get().is_some()
    }

    pub fn resolve(&self, object_id: ObjectId) -> anyhow::Result<()> {
        if self.object.set(object_id).is_err() {
            bail!("Visual object already resolved");
        }

        self.ready.send_replace(Some(object_id));
        Ok(())
    }

    pub fn subscribe(&self) -> VisualReady {
        VisualReady {
            receiver: self.ready.subscribe(),
        }
    }
}

impl Default for VisualSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot notification that the visual slot has been resolved.
pub struct VisualReady {
    receiver: watch::Receiver<Option<ObjectId>>,
}

impl VisualReady {
    /// Returns the resolved object, without blocking.
    pub fn try_take(&mut self) -> Option<ObjectId> {
        *self.receiver.borrow_and_update()
    }
}

#[cfg(test)]
mod tests {
    use id_arena::Arena;

    use super::*;
    use crate::scene_graph::Object3D;

    fn ids() -> (ObjectId, ObjectId) {
        let mut arena: Arena<Object3D> = Arena::new();
        (
            arena.alloc(Object3D::named("a")),
            arena.alloc(Object3D::named("b")),
        )
    }

    #[test]
    fn resolves_exactly_once() {
        let (first, second) = ids();
        let slot = VisualSlot::new();
        assert_eq!(slot.get(), None);

        slot.resolve(first).unwrap();
        assert!(slot.resolve(second).is_err());

        assert_eq!(slot.get(), Some(first));
    }

    #[test]
    fn subscribers_see_resolution() {
        let (first, _) = ids();
        let slot = VisualSlot::new();
        let mut early = slot.subscribe();
        assert_eq!(early.try_take(), None);

        slot.resolve(first).unwrap();

        assert_eq!(early.try_take(), Some(first));
        assert_eq!(slot.subscribe().try_take(), Some(first));
    }
}
