//! Map click listener: a stateless pass-through from the surface's pointer
//! clicks to the viewer.

use pinmap_core::Coordinate;
use tokio::sync::mpsc::UnboundedSender;

/// Forwards click coordinates to a single callback. No filtering, no
/// debouncing, no bounds validation.
pub struct ClickListener {
    on_click: Box<dyn Fn(Coordinate) + Send + Sync>,
}

impl ClickListener {
    pub fn new(on_click: impl Fn(Coordinate) + Send + Sync + 'static) -> Self {
        Self {
            on_click: Box::new(on_click),
        }
    }

    /// Listener that feeds clicks into the viewer's click channel.
    /// Dropped-receiver sends are ignored; the viewer is shutting down.
    pub fn channeled(clicks: UnboundedSender<Coordinate>) -> Self {
        Self::new(move |position| {
            let _ = clicks.send(position);
        })
    }

    /// Called by the map surface for every pointer click.
    pub fn notify(&self, position: Coordinate) {
        (self.on_click)(position);
    }
}
