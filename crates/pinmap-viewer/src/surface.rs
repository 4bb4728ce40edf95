//! Seam to the external map widget.
//!
//! The widget owns tile loading, panning/zooming and coordinate projection;
//! the viewer only configures it and pushes pin operations at it.

use pinmap_core::{Coordinate, MapConfig, MarkerId};

use crate::render::RenderOp;

/// Operations the viewer needs from the embedding map widget.
pub trait MapSurface {
    /// Apply the initial widget configuration (center, zoom, tile source,
    /// attribution).
    fn configure(&mut self, config: &MapConfig);

    /// Create a pin at a fixed position.
    fn mount_pin(&mut self, id: MarkerId, position: Coordinate);

    /// Replace the text of a pin's popup.
    fn set_popup_text(&mut self, id: MarkerId, text: &str);

    /// Open a pin's popup without user interaction.
    fn open_popup(&mut self, id: MarkerId);
}

/// Surface that logs every operation; the host binary uses this in place of
/// a real widget.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl MapSurface for TracingSurface {
    fn configure(&mut self, config: &MapConfig) {
        tracing::info!(
            "map configured: center {}, zoom {}, tiles {}",
            config.center(),
            config.zoom,
            config.tile_url_template
        );
    }

    fn mount_pin(&mut self, id: MarkerId, position: Coordinate) {
        tracing::info!("{} mounted at {}", id, position);
    }

    fn set_popup_text(&mut self, id: MarkerId, text: &str) {
        tracing::info!("{} popup: {}", id, text.replace('\n', " | "));
    }

    fn open_popup(&mut self, id: MarkerId) {
        tracing::info!("{} popup opened", id);
    }
}

/// Surface that records operations instead of drawing them. Useful for
/// tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub configured: Vec<MapConfig>,
    pub ops: Vec<RenderOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids whose popups were opened, in order.
    pub fn opened(&self) -> Vec<MarkerId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::OpenPopup { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Popup texts set for `id`, in order.
    pub fn popup_texts(&self, id: MarkerId) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::SetPopupText { id: op_id, text } if *op_id == id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn configure(&mut self, config: &MapConfig) {
        self.configured.push(config.clone());
    }

    fn mount_pin(&mut self, id: MarkerId, position: Coordinate) {
        self.ops.push(RenderOp::MountPin { id, position });
    }

    fn set_popup_text(&mut self, id: MarkerId, text: &str) {
        self.ops.push(RenderOp::SetPopupText {
            id,
            text: text.to_string(),
        });
    }

    fn open_popup(&mut self, id: MarkerId) {
        self.ops.push(RenderOp::OpenPopup { id });
    }
}
