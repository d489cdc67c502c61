//! Slot resolution: cache lookups, staged decodes, placeholder synthesis.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use image::RgbaImage;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::SlotCache;
use crate::config::{Configuration, PreviewSize};
use crate::discovery::discover_images;
use crate::error::ResolveError;
use crate::events::{ResolveSlot, SlotEvent, SlotId};
use crate::placeholder::PlaceholderPainter;
use crate::scale::fit_within;

/// Resolves slot ids to preview bitmaps. Owns the discovered-file table and
/// the slot cache; the id to path mapping is fixed at construction and never
/// rescanned.
pub struct SlotLoader {
    min_slot_count: u32,
    preview: PreviewSize,
    load_delay: Duration,
    paths: Vec<PathBuf>,
    painter: PlaceholderPainter,
    cache: Option<SlotCache>,
}

impl SlotLoader {
    /// Scan the configured directory and prepare the painter. A `None` cache
    /// is tolerated: resolution then decodes or synthesizes on every call.
    #[must_use]
    pub fn new(cfg: &Configuration, cache: Option<SlotCache>) -> Self {
        if cache.is_none() {
            warn!("no slot cache attached; every resolution will decode or synthesize anew");
        }
        let paths = discover_images(&cfg.photo_library_path);
        let painter = PlaceholderPainter::new(
            cfg.max_preview_size.width,
            cfg.max_preview_size.height,
            cfg.placeholder_font.as_deref(),
        );
        info!(
            discovered = paths.len(),
            min_slots = cfg.min_slot_count,
            "slot loader ready"
        );
        Self {
            min_slot_count: cfg.min_slot_count,
            preview: cfg.max_preview_size,
            load_delay: cfg.load_delay,
            paths,
            painter,
            cache,
        }
    }

    /// Total number of addressable slots: every discovered file, padded up
    /// to the configured minimum with placeholder slots.
    #[must_use]
    pub fn count(&self) -> SlotId {
        (self.paths.len() as SlotId).max(SlotId::from(self.min_slot_count))
    }

    /// Borrow the cache for inspection.
    #[must_use]
    pub fn cache(&self) -> Option<&SlotCache> {
        self.cache.as_ref()
    }

    /// Service one resolution request, delivering exactly one answer on
    /// `events`: `Loaded` with the preview bitmap or `Failed` with a reason.
    ///
    /// Out-of-bounds ids fail without touching the cache or pausing. Cache
    /// hits answer immediately. Everything else pays the configured delay,
    /// decodes (or synthesizes a placeholder), scales, and caches.
    pub async fn resolve(&mut self, id: SlotId, events: &Sender<SlotEvent>) {
        if id < 0 || id >= self.count() {
            debug!(id, count = self.count(), "resolve rejected: id out of bounds");
            let _ = events
                .send(SlotEvent::Failed {
                    id,
                    reason: ResolveError::OutOfBounds,
                })
                .await;
            return;
        }

        if let Some(image) = self.cache.as_ref().and_then(|cache| cache.get(id)) {
            debug!(id, "resolve served from cache");
            let _ = events.send(SlotEvent::Loaded { id, image }).await;
            return;
        }

        // Uncached resolutions are staged behind a short pause.
        sleep(self.load_delay).await;

        let source = self.paths.get(id as usize).cloned();
        let painter = self.painter.clone();
        let PreviewSize { width, height } = self.preview;
        let produced = tokio::task::spawn_blocking(move || -> Result<RgbaImage> {
            let base = match source {
                Some(path) => decode_or_placeholder(&path, id, &painter),
                None => painter.synthesize(id),
            };
            fit_within(&base, width, height)
        })
        .await;

        match produced {
            Ok(Ok(image)) if image.width() > 0 && image.height() > 0 => {
                let image = Arc::new(image);
                if let Some(cache) = &mut self.cache {
                    cache.put(id, Arc::clone(&image));
                }
                debug!(
                    id,
                    width = image.width(),
                    height = image.height(),
                    "slot resolved"
                );
                let _ = events.send(SlotEvent::Loaded { id, image }).await;
            }
            Ok(Ok(_)) => {
                warn!(id, "preview pipeline produced an empty bitmap");
                let _ = events
                    .send(SlotEvent::Failed {
                        id,
                        reason: ResolveError::EmptyResult,
                    })
                    .await;
            }
            Ok(Err(err)) => {
                warn!(id, error = %err, "preview pipeline failed");
                let _ = events
                    .send(SlotEvent::Failed {
                        id,
                        reason: ResolveError::EmptyResult,
                    })
                    .await;
            }
            Err(err) => {
                warn!(id, error = %err, "decode worker aborted");
                let _ = events
                    .send(SlotEvent::Failed {
                        id,
                        reason: ResolveError::EmptyResult,
                    })
                    .await;
            }
        }
    }
}

/// Drive the loader from a request channel until cancellation. Requests are
/// serviced strictly in arrival order, one at a time.
pub async fn run(
    mut loader: SlotLoader,
    mut requests: Receiver<ResolveSlot>,
    events: Sender<SlotEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => {
                debug!("cancel received; exiting loader task");
                break;
            }
            request = requests.recv() => match request {
                Some(ResolveSlot(id)) => loader.resolve(id, &events).await,
                None => break,
            },
        }
    }
    Ok(())
}

fn decode_or_placeholder(path: &Path, id: SlotId, painter: &PlaceholderPainter) -> RgbaImage {
    usable_or_placeholder(decode_rgba8_apply_exif(path), path, id, painter)
}

// A decode that succeeds but yields zero-sized pixels counts as failed;
// both cases fall back to the synthesized tile.
fn usable_or_placeholder(
    decoded: Result<RgbaImage>,
    path: &Path,
    id: SlotId,
    painter: &PlaceholderPainter,
) -> RgbaImage {
    match decoded {
        Ok(image) if image.width() > 0 && image.height() > 0 => image,
        Ok(_) => {
            debug!(
                id,
                path = %path.display(),
                "decoded image is empty; substituting a placeholder"
            );
            painter.synthesize(id)
        }
        Err(err) => {
            debug!(
                id,
                path = %path.display(),
                error = %err,
                "decode failed; substituting a placeholder"
            );
            painter.synthesize(id)
        }
    }
}

// Decodes an image to RGBA8 and applies EXIF orientation if available.
// Orientation handling is best-effort; missing metadata leaves the pixels
// as decoded.
fn decode_rgba8_apply_exif(path: &Path) -> Result<RgbaImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    let img = img.to_rgba8();
    let orientation = read_orientation(path).unwrap_or(1);
    Ok(apply_orientation(img, orientation))
}

fn apply_orientation(img: RgbaImage, orientation: u16) -> RgbaImage {
    use image::imageops::{flip_horizontal, flip_vertical, rotate180, rotate270, rotate90};
    match orientation {
        2 => flip_horizontal(&img),
        3 => rotate180(&img),
        4 => flip_vertical(&img),
        // transpose (flip diag): rotate90 + flip_horizontal
        5 => flip_horizontal(&rotate90(&img)),
        6 => rotate90(&img),
        // transverse: rotate270 + flip_horizontal
        7 => flip_horizontal(&rotate270(&img)),
        8 => rotate270(&img),
        _ => img,
    }
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    debug!("exif orientation {} for {}", value, path.display());
    Some(value as u16)
}
