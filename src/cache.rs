//! In-memory store of finished preview bitmaps, keyed by slot id.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::events::SlotId;

/// Direct id to bitmap map with no eviction and no capacity bound; entries
/// live for the process lifetime. Owned by a single task, so no interior
/// locking is needed.
#[derive(Debug, Default)]
pub struct SlotCache {
    entries: HashMap<SlotId, Arc<RgbaImage>>,
}

impl SlotCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the bitmap for `id`. An empty bitmap is dropped
    /// with a warning rather than surfaced as an error.
    pub fn put(&mut self, id: SlotId, image: Arc<RgbaImage>) {
        if image.width() == 0 || image.height() == 0 {
            warn!(id, "refusing to cache an empty bitmap");
            return;
        }
        self.entries.insert(id, image);
        debug!(id, entries = self.entries.len(), "bitmap cached");
    }

    /// The cached bitmap for `id`, or `None` when nothing is stored yet.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<Arc<RgbaImage>> {
        self.entries.get(&id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop the entry for `id`; absent ids are a quiet no-op.
    pub fn remove(&mut self, id: SlotId) {
        if self.entries.remove(&id).is_some() {
            debug!(id, entries = self.entries.len(), "bitmap removed");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        debug!("slot cache cleared");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
