use thiserror::Error;

/// Reasons a slot resolution can fail, delivered with
/// [`SlotEvent::Failed`](crate::events::SlotEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The requested id lies outside `[0, count)`.
    #[error("image id out of bounds")]
    OutOfBounds,

    /// Decoding and placeholder synthesis both came up empty.
    #[error("failed to load or generate image")]
    EmptyResult,
}
