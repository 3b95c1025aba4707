use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub mod handlers;
pub mod responses;

/// Default grid/sample parameters applied when a refresh request omits a
/// field, sourced from configuration at startup.
#[derive(Debug, Clone, Copy)]
pub struct MapDefaults {
    lat_resolution: u32,
    lon_resolution: u32,
    num_samples: u32,
}

impl MapDefaults {
    pub fn new(lat_resolution: u32, lon_resolution: u32, num_samples: u32) -> Self {
        Self {
            lat_resolution,
            lon_resolution,
            num_samples,
        }
    }

    pub fn lat_resolution(&self) -> u32 {
        self.lat_resolution
    }

    pub fn lon_resolution(&self) -> u32 {
        self.lon_resolution
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }
}

/// Everything the handlers need: the shared session state plus the
/// collaborator paths and parameter defaults resolved from configuration.
pub struct ApiContext {
    pub state: Arc<RwLock<AppState>>,
    pub model_path: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
    pub defaults: MapDefaults,
}

pub fn router(context: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/api/overlay", get(handlers::get_overlay))
        .route("/api/locations", get(handlers::get_locations))
        .route("/api/productivity", get(handlers::get_productivity))
        .route("/api/refresh", post(handlers::post_refresh))
        .route("/api/health", get(handlers::get_health))
        .with_state(context)
}
