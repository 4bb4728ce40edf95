//! Address lookup backend: fire-and-forget reverse geocoding.
//! All network work runs off the viewer loop; results come back via mpsc.

use std::sync::Arc;

use pinmap_core::{Coordinate, MarkerEvent, MarkerId, ResolveFailure};
use pinmap_geocode::GeocodeClient;
use tokio::sync::mpsc::UnboundedSender;

/// Request an address for `id` asynchronously.
///
/// Spawns an independent task per call; each in-flight click is isolated
/// and the reconciliation message carries the id captured here, so
/// completions may arrive in any order. Sends `AddressResolved` on the
/// channel when the single attempt settles, success or failure.
pub fn request_resolve(
    tx: &UnboundedSender<MarkerEvent>,
    client: Arc<GeocodeClient>,
    id: MarkerId,
    position: Coordinate,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client
            .reverse(position)
            .await
            .map_err(|e| ResolveFailure(e.to_string()));
        let _ = tx.send(MarkerEvent::AddressResolved { id, outcome });
    });
}
