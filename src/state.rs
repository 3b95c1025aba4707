use crate::geo::GeoPoint;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub point: GeoPoint,
    /// Model rate at `point`. The model is not contractually bounded to
    /// return non-negative values and no clamping is applied here.
    pub rate: f64,
}

/// One complete prediction overlay: the grid dimensions it was computed at
/// and one entry per grid point, in grid order. Replaced wholesale on each
/// successful refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub lat_resolution: u32,
    pub lon_resolution: u32,
    pub entries: Vec<OverlayEntry>,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityPoint {
    pub point: GeoPoint,
    pub productivity: f64,
}

/// Session state owned by the refresh controller: the current overlay (None
/// while unavailable), the loaded shark locations, the simulated
/// productivity surface, and the overlay generation counter.
///
/// All three data fields are replaced together through `commit_refresh` so a
/// reader can never observe an overlay from one refresh next to locations
/// from another.
#[derive(Debug)]
pub struct AppState {
    overlay: Option<Overlay>,
    overlay_tx: watch::Sender<Option<Overlay>>,
    locations: Vec<GeoPoint>,
    locations_tx: watch::Sender<Vec<GeoPoint>>,
    productivity: Vec<ProductivityPoint>,
    productivity_tx: watch::Sender<Vec<ProductivityPoint>>,
    generation: u64,
}

impl AppState {
    pub fn new() -> Self {
        let (overlay_tx, _overlay_rx) = watch::channel(None);
        let (locations_tx, _locations_rx) = watch::channel(Vec::new());
        let (productivity_tx, _productivity_rx) = watch::channel(Vec::new());
        Self {
            overlay: None,
            overlay_tx,
            locations: Vec::new(),
            locations_tx,
            productivity: Vec::new(),
            productivity_tx,
            generation: 0,
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn subscribe_overlay(&self) -> watch::Receiver<Option<Overlay>> {
        self.overlay_tx.subscribe()
    }

    pub fn locations(&self) -> &[GeoPoint] {
        &self.locations
    }

    pub fn subscribe_locations(&self) -> watch::Receiver<Vec<GeoPoint>> {
        self.locations_tx.subscribe()
    }

    pub fn productivity(&self) -> &[ProductivityPoint] {
        &self.productivity
    }

    pub fn subscribe_productivity(&self) -> watch::Receiver<Vec<ProductivityPoint>> {
        self.productivity_tx.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the whole refresh outcome as one unit.
    ///
    /// `overlay = None` records an unavailable overlay (failed or absent
    /// recompute) and leaves the generation counter unchanged; a Some overlay
    /// carries its own generation stamp, which becomes the current one.
    pub fn commit_refresh(
        &mut self,
        overlay: Option<Overlay>,
        locations: Vec<GeoPoint>,
        productivity: Vec<ProductivityPoint>,
    ) {
        if let Some(overlay) = &overlay {
            self.generation = overlay.generation;
        }
        self.overlay = overlay.clone();
        self.overlay_tx.send_replace(overlay);
        self.locations = locations.clone();
        self.locations_tx.send_replace(locations);
        self.productivity = productivity.clone();
        self.productivity_tx.send_replace(productivity);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
