use std::sync::Arc;

use image::RgbaImage;

use crate::error::ResolveError;

/// Integer key addressing one picture position in the gallery. Ids in
/// `[0, count)` are valid; ids past the discovered files show synthesized
/// placeholder tiles.
pub type SlotId = i64;

/// Ask the loader to produce the preview bitmap for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveSlot(pub SlotId);

/// Loader answer. Exactly one of these is delivered per accepted request.
#[derive(Debug, Clone)]
pub enum SlotEvent {
    Loaded { id: SlotId, image: Arc<RgbaImage> },
    Failed { id: SlotId, reason: ResolveError },
}

/// Sent to navigator subscribers whenever the current slot changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChanged(pub SlotId);

/// One step of user navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
}

/// Confirmation that a bitmap passed the stale-result guard and was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displayed(pub SlotId);
