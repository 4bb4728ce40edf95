//! The marker controller: optimistic insert on click, identifier-keyed
//! reconciliation when the address lookup settles.

use std::sync::Arc;

use crate::marker::{Coordinate, Marker, MarkerId};
use crate::store::MarkerStore;

/// Failure detail carried by a reconciliation message. All failures collapse
/// to the same fixed popup label; the detail only feeds the logs.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ResolveFailure(pub String);

/// Messages sent from async address lookups back to the owning controller.
#[derive(Debug)]
pub enum MarkerEvent {
    /// Result of the reverse-geocode attempt issued when the marker was
    /// created. Tagged with the id captured at request-issue time.
    AddressResolved {
        id: MarkerId,
        outcome: Result<String, ResolveFailure>,
    },
}

/// Owns the marker collection and applies the optimistic-update workflow.
///
/// A click inserts a pending marker synchronously; the address arrives later
/// as a [`MarkerEvent`] and touches only the marker it was issued for, so
/// out-of-order completion across clicks is safe.
#[derive(Debug, Default)]
pub struct MarkerController {
    store: MarkerStore,
    next_id: u64,
}

impl MarkerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a map click: assign a fresh id and insert a pending marker.
    ///
    /// The marker is visible in snapshots before any network activity, and
    /// the returned id is what the eventual reconciliation must carry.
    pub fn handle_map_click(&mut self, position: Coordinate) -> MarkerId {
        let id = self.fresh_id();
        self.store.insert(Marker::pending(id, position));
        tracing::info!(%id, %position, "marker placed, address pending");
        id
    }

    /// Insert a marker that already has its label, e.g. the starting-point
    /// marker shown before any click. No lookup is issued for it.
    pub fn seed_marker(&mut self, position: Coordinate, label: &str) -> MarkerId {
        let id = self.fresh_id();
        self.store.insert(Marker::resolved(id, position, label));
        id
    }

    /// Apply a reconciliation message.
    ///
    /// Only the marker created for the originating request is touched;
    /// unknown ids and already-settled markers are left alone.
    pub fn apply(&mut self, event: MarkerEvent) {
        match event {
            MarkerEvent::AddressResolved { id, outcome } => match outcome {
                Ok(address) => self.store.resolve(id, address),
                Err(failure) => {
                    tracing::warn!(%id, error = %failure, "reverse geocode failed");
                    self.store.fail(id);
                }
            },
        }
    }

    /// Record that a marker's introductory popup-open action has fired, so
    /// re-renders never open it again.
    pub fn confirm_popup_opened(&mut self, id: MarkerId) {
        self.store.mark_popup_opened(id);
    }

    /// Read-only snapshot of the marker collection.
    pub fn markers(&self) -> Arc<Vec<Marker>> {
        self.store.snapshot()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.store.get(id)
    }

    fn fresh_id(&mut self) -> MarkerId {
        let id = MarkerId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{AddressState, FAILED_LABEL, RESOLVING_LABEL};

    fn resolved(id: MarkerId, address: &str) -> MarkerEvent {
        MarkerEvent::AddressResolved {
            id,
            outcome: Ok(address.to_string()),
        }
    }

    fn failed(id: MarkerId) -> MarkerEvent {
        MarkerEvent::AddressResolved {
            id,
            outcome: Err(ResolveFailure("connection refused".into())),
        }
    }

    #[test]
    fn click_inserts_pending_marker_before_any_response() {
        let mut controller = MarkerController::new();
        let position = Coordinate::new(35.0, 139.0);

        let id = controller.handle_map_click(position);

        let markers = controller.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id(), id);
        assert_eq!(markers[0].position(), position);
        assert_eq!(markers[0].label(), RESOLVING_LABEL);
    }

    #[test]
    fn ids_are_unique_across_clicks() {
        let mut controller = MarkerController::new();
        let first = controller.handle_map_click(Coordinate::new(1.0, 1.0));
        let second = controller.handle_map_click(Coordinate::new(1.0, 1.0));
        assert_ne!(first, second);
    }

    #[test]
    fn out_of_order_completion_updates_only_its_own_marker() {
        let mut controller = MarkerController::new();
        let first = controller.handle_map_click(Coordinate::new(35.0, 139.0));
        let second = controller.handle_map_click(Coordinate::new(36.0, 140.0));

        // The second request settles before the first.
        controller.apply(resolved(second, "Second Address"));

        assert_eq!(
            *controller.get(first).unwrap().address(),
            AddressState::Pending
        );
        assert_eq!(controller.get(second).unwrap().label(), "Second Address");

        controller.apply(resolved(first, "First Address"));
        assert_eq!(controller.get(first).unwrap().label(), "First Address");
    }

    #[test]
    fn failure_degrades_only_the_label() {
        let mut controller = MarkerController::new();
        let lost = controller.handle_map_click(Coordinate::new(0.0, 0.0));
        let other = controller.handle_map_click(Coordinate::new(35.0, 139.0));

        controller.apply(failed(lost));

        let marker = controller.get(lost).unwrap();
        assert_eq!(marker.label(), FAILED_LABEL);
        assert_eq!(marker.position(), Coordinate::new(0.0, 0.0));

        // The other marker is untouched and the session continues.
        assert_eq!(
            *controller.get(other).unwrap().address(),
            AddressState::Pending
        );
        controller.apply(resolved(other, "Still fine"));
        assert_eq!(controller.get(other).unwrap().label(), "Still fine");
    }

    #[test]
    fn labels_transition_at_most_once() {
        let mut controller = MarkerController::new();
        let id = controller.handle_map_click(Coordinate::new(35.0, 139.0));

        controller.apply(resolved(id, "Terminal"));
        controller.apply(failed(id));
        controller.apply(resolved(id, "Third state"));

        assert_eq!(controller.get(id).unwrap().label(), "Terminal");
    }

    #[test]
    fn reconciliation_for_unknown_id_is_a_noop() {
        let mut controller = MarkerController::new();
        controller.handle_map_click(Coordinate::new(35.0, 139.0));

        controller.apply(resolved(MarkerId::new(42), "Nowhere"));

        assert_eq!(controller.markers().len(), 1);
        assert_eq!(controller.markers()[0].label(), RESOLVING_LABEL);
    }

    #[test]
    fn seeded_marker_is_terminal_from_the_start() {
        let mut controller = MarkerController::new();
        let id = controller.seed_marker(Coordinate::new(35.6586, 139.7454), "Starting point");

        assert_eq!(controller.get(id).unwrap().label(), "Starting point");

        // A stray reconciliation cannot relabel it.
        controller.apply(resolved(id, "Hijacked"));
        assert_eq!(controller.get(id).unwrap().label(), "Starting point");
    }

    #[test]
    fn popup_confirmation_round_trips() {
        let mut controller = MarkerController::new();
        let id = controller.handle_map_click(Coordinate::new(35.0, 139.0));

        assert!(!controller.get(id).unwrap().popup_opened());
        controller.confirm_popup_opened(id);
        assert!(controller.get(id).unwrap().popup_opened());
    }
}
