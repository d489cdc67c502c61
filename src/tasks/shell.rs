//! Headless presentation shell: turns navigation commands into resolution
//! requests and applies the stale-result guard before accepting bitmaps.

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{Displayed, NavCommand, ResolveSlot, SlotChanged, SlotEvent};
use crate::navigator::Navigator;

/// Run the shell until cancellation. Navigator changes feed a single
/// newest-wins request slot whose send is driven as its own select branch,
/// keeping the loop responsive while the resolve queue is full. Answers for
/// a slot the user has already moved away from are discarded instead of
/// shown.
pub async fn run(
    mut navigator: Navigator,
    mut commands: Receiver<NavCommand>,
    resolve_tx: Sender<ResolveSlot>,
    mut events: Receiver<SlotEvent>,
    displayed_tx: Sender<Displayed>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut changes = navigator.subscribe();

    // The slot we start on is the first request out.
    let mut pending = Some(ResolveSlot(navigator.current_id()));

    loop {
        select! {
            _ = cancel.cancelled() => {
                debug!("cancel received; exiting shell task");
                break;
            }
            // Await the request send inside the select, so the loop keeps
            // draining events and commands while the resolve queue is full.
            res = {
                let request = pending;
                let resolve_tx = resolve_tx.clone();
                async move {
                    if let Some(request) = request {
                        resolve_tx.send(request).await.map_err(|_| ())
                    } else {
                        Err(())
                    }
                }
            }, if pending.is_some() => {
                match res {
                    Ok(()) => pending = None,
                    Err(()) => {
                        warn!("resolve channel closed");
                        break;
                    }
                }
            }
            Some(command) = commands.recv() => {
                let moved = match command {
                    NavCommand::Next => navigator.next(),
                    NavCommand::Previous => navigator.previous(),
                };
                if !moved {
                    debug!(?command, "navigation ignored; the gallery is empty");
                }
            }
            Some(SlotChanged(id)) = changes.recv() => {
                // Newest change wins; answers for older ids would be
                // discarded as stale anyway.
                pending = Some(ResolveSlot(id));
            }
            Some(event) = events.recv() => match event {
                SlotEvent::Loaded { id, image } => {
                    if id == navigator.current_id() {
                        info!(
                            id,
                            width = image.width(),
                            height = image.height(),
                            "displaying slot"
                        );
                        let _ = displayed_tx.send(Displayed(id)).await;
                    } else {
                        debug!(
                            id,
                            current = navigator.current_id(),
                            "discarding stale result"
                        );
                    }
                }
                SlotEvent::Failed { id, reason } => {
                    warn!(id, %reason, "slot failed to resolve");
                }
            },
        }
    }
    Ok(())
}
