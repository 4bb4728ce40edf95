//! Marker collection behind an immutable-update discipline.
//!
//! Every mutation builds a fresh vector and swaps the shared handle, so a
//! snapshot handed to a renderer is never observed partially updated.

use std::sync::Arc;

use crate::marker::{AddressState, Marker, MarkerId};

/// Ordered marker collection. The collection only grows; markers are never
/// deleted for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Arc<Vec<Marker>>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot of the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Marker>> {
        Arc::clone(&self.markers)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.id() == id)
    }

    pub(crate) fn insert(&mut self, marker: Marker) {
        let mut next = Vec::with_capacity(self.markers.len() + 1);
        next.extend(self.markers.iter().cloned());
        next.push(marker);
        self.markers = Arc::new(next);
    }

    pub(crate) fn resolve(&mut self, id: MarkerId, address: String) {
        self.transition(id, AddressState::Resolved(address));
    }

    pub(crate) fn fail(&mut self, id: MarkerId) {
        self.transition(id, AddressState::Failed);
    }

    /// Record that a marker's introductory popup-open action fired.
    pub(crate) fn mark_popup_opened(&mut self, id: MarkerId) {
        let unspent = matches!(self.get(id), Some(marker) if !marker.popup_opened());
        if unspent {
            self.rebuild(id, |marker| marker.set_popup_opened());
        }
    }

    /// Apply the one allowed label transition. Unknown ids and markers that
    /// already reached a terminal state are left alone.
    fn transition(&mut self, id: MarkerId, next: AddressState) {
        let Some(current) = self.get(id) else {
            tracing::debug!(%id, "reconciliation for unknown marker ignored");
            return;
        };
        if current.address().is_terminal() {
            tracing::debug!(%id, "marker already settled, ignoring late update");
            return;
        }
        self.rebuild(id, |marker| marker.set_address(next.clone()));
    }

    fn rebuild(&mut self, id: MarkerId, mutate: impl Fn(&mut Marker)) {
        let next = self
            .markers
            .iter()
            .cloned()
            .map(|mut marker| {
                if marker.id() == id {
                    mutate(&mut marker);
                }
                marker
            })
            .collect();
        self.markers = Arc::new(next);
    }
}
