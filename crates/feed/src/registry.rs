use std::collections::BTreeMap;

use engine::{Photo, SourceId};

#[derive(Debug, Default)]
struct SourceSlot {
    enabled: bool,
    photos: Vec<Photo>,
}

/// Merges per-source snapshots into one candidate set.
///
/// Each source owns its slot: a snapshot replaces exactly that source's
/// photos, atomically. Merging concatenates enabled sources in source-id
/// order so the merged set is deterministic regardless of snapshot
/// arrival order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    slots: BTreeMap<SourceId, SourceSlot>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one source's photo list. The source is created enabled on
    /// first contact.
    pub fn apply_snapshot(&mut self, source: SourceId, photos: Vec<Photo>) {
        let slot = self.slots.entry(source).or_insert_with(|| SourceSlot {
            enabled: true,
            photos: Vec::new(),
        });
        slot.photos = photos;
    }

    /// Enables or disables a source without discarding its photos.
    ///
    /// Returns `true` if the flag changed. Toggling an unknown source
    /// registers it empty, so a toggle and its snapshot can arrive in
    /// either order.
    pub fn set_enabled(&mut self, source: SourceId, enabled: bool) -> bool {
        let slot = self
            .slots
            .entry(source)
            .or_insert_with(SourceSlot::default);
        let changed = slot.enabled != enabled;
        slot.enabled = enabled;
        changed
    }

    pub fn is_enabled(&self, source: &SourceId) -> bool {
        self.slots.get(source).is_some_and(|s| s.enabled)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.slots.keys()
    }

    /// The merged candidate set across enabled sources, in source-id
    /// order.
    pub fn merged(&self) -> Vec<Photo> {
        let mut out = Vec::new();
        for slot in self.slots.values().filter(|s| s.enabled) {
            out.extend(slot.photos.iter().cloned());
        }
        out
    }
}
