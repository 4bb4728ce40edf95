//! Marker renderer: plans surface operations from marker snapshots.
//!
//! Popup auto-open is a one-time-per-pin effect tied to first mount; label
//! updates re-emit text but never re-open a popup.

use std::collections::HashMap;

use pinmap_core::{Coordinate, Marker, MarkerId};

use crate::surface::MapSurface;

/// A single operation against the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    MountPin { id: MarkerId, position: Coordinate },
    SetPopupText { id: MarkerId, text: String },
    OpenPopup { id: MarkerId },
}

/// Plans surface updates by diffing snapshots against what is already
/// shown. Holds only its own bookkeeping; marker state is read-only here.
#[derive(Debug, Default)]
pub struct Renderer {
    shown: HashMap<MarkerId, String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Popup text: the label plus the coordinate in fixed 4-decimal form.
    pub fn popup_text(marker: &Marker) -> String {
        format!("{}\n{}", marker.label(), marker.position().display_fixed())
    }

    /// Plan the operations needed to bring the surface up to date.
    pub fn plan(&mut self, markers: &[Marker]) -> Vec<RenderOp> {
        let mut ops = Vec::new();
        for marker in markers {
            let id = marker.id();
            let text = Self::popup_text(marker);
            if !self.shown.contains_key(&id) {
                ops.push(RenderOp::MountPin {
                    id,
                    position: marker.position(),
                });
                ops.push(RenderOp::SetPopupText {
                    id,
                    text: text.clone(),
                });
                // One-shot: only markers whose introductory action has not
                // fired yet get an auto-open.
                if !marker.popup_opened() {
                    ops.push(RenderOp::OpenPopup { id });
                }
                self.shown.insert(id, text);
            } else if self.shown.get(&id) != Some(&text) {
                ops.push(RenderOp::SetPopupText {
                    id,
                    text: text.clone(),
                });
                self.shown.insert(id, text);
            }
        }
        ops
    }

    /// Plan and apply in one pass. Returns the ids whose popups were opened
    /// so the controller can record the one-shot on the marker itself.
    pub fn sync(&mut self, markers: &[Marker], surface: &mut dyn MapSurface) -> Vec<MarkerId> {
        let mut opened = Vec::new();
        for op in self.plan(markers) {
            match op {
                RenderOp::MountPin { id, position } => surface.mount_pin(id, position),
                RenderOp::SetPopupText { id, text } => surface.set_popup_text(id, &text),
                RenderOp::OpenPopup { id } => {
                    surface.open_popup(id);
                    opened.push(id);
                }
            }
        }
        opened
    }
}
