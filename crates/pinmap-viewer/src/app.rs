//! The viewer loop.
//!
//! A click inserts a marker synchronously and fires its address lookup; the
//! lookup settles later as a reconciliation message. Rendering happens after
//! every state change, so the surface never waits on the network.

use std::sync::Arc;

use pinmap_core::{Config, Coordinate, Marker, MarkerController, MarkerEvent};
use pinmap_geocode::GeocodeClient;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::render::Renderer;
use crate::services;
use crate::surface::MapSurface;

/// Label for the marker seeded at the configured start position.
pub const STARTING_POINT_LABEL: &str = "Starting point";

/// Event-driven viewer: owns the controller, the renderer and the surface,
/// and multiplexes clicks against reconciliation messages.
pub struct ViewerApp<S: MapSurface> {
    controller: MarkerController,
    renderer: Renderer,
    surface: S,
    geocoder: Arc<GeocodeClient>,
    clicks: UnboundedReceiver<Coordinate>,
    events_tx: UnboundedSender<MarkerEvent>,
    events_rx: UnboundedReceiver<MarkerEvent>,
    outstanding: usize,
}

impl<S: MapSurface> ViewerApp<S> {
    /// Wire the viewer: configure the surface and seed the starting marker.
    pub fn new(
        config: &Config,
        geocoder: GeocodeClient,
        mut surface: S,
        clicks: UnboundedReceiver<Coordinate>,
    ) -> Self {
        surface.configure(&config.map);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut controller = MarkerController::new();
        controller.seed_marker(config.map.center(), STARTING_POINT_LABEL);

        Self {
            controller,
            renderer: Renderer::new(),
            surface,
            geocoder: Arc::new(geocoder),
            clicks,
            events_tx,
            events_rx,
            outstanding: 0,
        }
    }

    /// Place a marker optimistically and start its address lookup.
    /// The pin and its placeholder popup hit the surface before the request
    /// is even sent.
    pub fn handle_click(&mut self, position: Coordinate) {
        let id = self.controller.handle_map_click(position);
        services::request_resolve(&self.events_tx, Arc::clone(&self.geocoder), id, position);
        self.outstanding += 1;
        self.sync_surface();
    }

    /// Wait for the next outstanding lookup to settle and apply it.
    /// Returns false when nothing is outstanding.
    pub async fn await_reconciliation(&mut self) -> bool {
        if self.outstanding == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    /// Run until the click channel closes and every lookup has settled.
    pub async fn run(&mut self) {
        self.sync_surface();

        let mut clicks_open = true;
        while clicks_open || self.outstanding > 0 {
            tokio::select! {
                click = self.clicks.recv(), if clicks_open => match click {
                    Some(position) => self.handle_click(position),
                    None => clicks_open = false,
                },
                Some(event) = self.events_rx.recv(), if self.outstanding > 0 => {
                    self.apply_event(event);
                }
            }
        }
    }

    /// Read-only snapshot of the marker collection.
    pub fn markers(&self) -> Arc<Vec<Marker>> {
        self.controller.markers()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Lookups issued but not yet reconciled.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    fn apply_event(&mut self, event: MarkerEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.controller.apply(event);
        self.sync_surface();
    }

    fn sync_surface(&mut self) {
        let markers = self.controller.markers();
        for id in self.renderer.sync(&markers, &mut self.surface) {
            self.controller.confirm_popup_opened(id);
        }
    }
}
