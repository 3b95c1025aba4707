use crate::api::ApiContext;
use crate::api::responses::{
    HealthErrorCode, HealthErrorResponse, HealthStatus, HealthSuccessResponse, LocationResponse,
    LocationsErrorCode, LocationsErrorResponse, LocationsSuccessResponse, OverlayEntryResponse,
    OverlayErrorCode, OverlayErrorResponse, OverlaySuccessResponse, ProductivityErrorCode,
    ProductivityErrorResponse, ProductivityPointResponse, ProductivitySuccessResponse,
    RefreshErrorCode, RefreshErrorResponse, RefreshSuccessResponse, WarningCode, WarningResponse,
};
use crate::dataset::CsvDataset;
use crate::predictor::ArtifactSource;
use crate::refresh::{RefreshError, RefreshParams, RefreshWarning, run_refresh};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// How many of the most recent shark locations the map renders as markers.
pub const MARKER_LIMIT: usize = 100;

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}

fn fallback_timestamp(context: &'static str) -> String {
    format_timestamp(SystemTime::now()).unwrap_or_else(|err| {
        error!(error = %err, context, "Failed to format error timestamp");
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
    })
}

// Overlay

pub enum OverlayResponse {
    Success(OverlaySuccessResponse),
    Error {
        status: StatusCode,
        body: OverlayErrorResponse,
    },
}

impl IntoResponse for OverlayResponse {
    fn into_response(self) -> Response {
        match self {
            OverlayResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            OverlayResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_overlay(State(context): State<Arc<ApiContext>>) -> impl IntoResponse {
    build_overlay_response(&context, SystemTime::now())
}

fn build_overlay_response(context: &ApiContext, now: SystemTime) -> OverlayResponse {
    let guard = match context.state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return overlay_internal_error("state lock poisoned while reading overlay");
        }
    };
    let overlay = guard.overlay().cloned();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return overlay_internal_error("timestamp formatting failure");
        }
    };

    match overlay {
        Some(overlay) => OverlayResponse::Success(OverlaySuccessResponse {
            generation: overlay.generation,
            lat_resolution: overlay.lat_resolution,
            lon_resolution: overlay.lon_resolution,
            entries: overlay
                .entries
                .iter()
                .map(|entry| OverlayEntryResponse {
                    latitude: entry.point.latitude,
                    longitude: entry.point.longitude,
                    rate: entry.rate,
                })
                .collect(),
            timestamp,
        }),
        None => OverlayResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: OverlayErrorResponse {
                error_code: OverlayErrorCode::NoOverlay,
                error_message: "No overlay available".to_string(),
                timestamp,
            },
        },
    }
}

fn overlay_internal_error(message: &str) -> OverlayResponse {
    error!(message = message, "Internal error while handling /api/overlay");
    OverlayResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: OverlayErrorResponse {
            error_code: OverlayErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp("overlay"),
        },
    }
}

// Locations

pub enum LocationsResponse {
    Success(LocationsSuccessResponse),
    Error {
        status: StatusCode,
        body: LocationsErrorResponse,
    },
}

impl IntoResponse for LocationsResponse {
    fn into_response(self) -> Response {
        match self {
            LocationsResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            LocationsResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_locations(State(context): State<Arc<ApiContext>>) -> impl IntoResponse {
    build_locations_response(&context, SystemTime::now())
}

fn build_locations_response(context: &ApiContext, now: SystemTime) -> LocationsResponse {
    let guard = match context.state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return locations_internal_error("state lock poisoned while reading locations");
        }
    };
    let total_count = guard.locations().len();
    // Most recent subset: markers render the tail of the dataset.
    let start = total_count.saturating_sub(MARKER_LIMIT);
    let locations: Vec<LocationResponse> = guard.locations()[start..]
        .iter()
        .map(|point| LocationResponse {
            latitude: point.latitude,
            longitude: point.longitude,
        })
        .collect();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return locations_internal_error("timestamp formatting failure");
        }
    };

    if locations.is_empty() {
        return LocationsResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: LocationsErrorResponse {
                error_code: LocationsErrorCode::NoLocations,
                error_message: "No shark locations to display".to_string(),
                timestamp,
            },
        };
    }

    LocationsResponse::Success(LocationsSuccessResponse {
        locations,
        total_count,
        timestamp,
    })
}

fn locations_internal_error(message: &str) -> LocationsResponse {
    error!(
        message = message,
        "Internal error while handling /api/locations"
    );
    LocationsResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: LocationsErrorResponse {
            error_code: LocationsErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp("locations"),
        },
    }
}

// Productivity

pub enum ProductivityResponse {
    Success(ProductivitySuccessResponse),
    Error {
        status: StatusCode,
        body: ProductivityErrorResponse,
    },
}

impl IntoResponse for ProductivityResponse {
    fn into_response(self) -> Response {
        match self {
            ProductivityResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ProductivityResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_productivity(State(context): State<Arc<ApiContext>>) -> impl IntoResponse {
    build_productivity_response(&context, SystemTime::now())
}

fn build_productivity_response(context: &ApiContext, now: SystemTime) -> ProductivityResponse {
    let guard = match context.state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return productivity_internal_error("state lock poisoned while reading productivity");
        }
    };
    let points: Vec<ProductivityPointResponse> = guard
        .productivity()
        .iter()
        .map(|entry| ProductivityPointResponse {
            latitude: entry.point.latitude,
            longitude: entry.point.longitude,
            productivity: entry.productivity,
        })
        .collect();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return productivity_internal_error("timestamp formatting failure");
        }
    };

    if points.is_empty() {
        return ProductivityResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: ProductivityErrorResponse {
                error_code: ProductivityErrorCode::NoData,
                error_message: "No productivity surface available".to_string(),
                timestamp,
            },
        };
    }

    ProductivityResponse::Success(ProductivitySuccessResponse { points, timestamp })
}

fn productivity_internal_error(message: &str) -> ProductivityResponse {
    error!(
        message = message,
        "Internal error while handling /api/productivity"
    );
    ProductivityResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ProductivityErrorResponse {
            error_code: ProductivityErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp("productivity"),
        },
    }
}

// Refresh

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub lat_resolution: Option<u32>,
    pub lon_resolution: Option<u32>,
    pub num_samples: Option<u32>,
}

pub enum RefreshResponse {
    Success(RefreshSuccessResponse),
    Error {
        status: StatusCode,
        body: RefreshErrorResponse,
    },
}

impl IntoResponse for RefreshResponse {
    fn into_response(self) -> Response {
        match self {
            RefreshResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            RefreshResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn post_refresh(
    State(context): State<Arc<ApiContext>>,
    request: Option<Json<RefreshRequest>>,
) -> impl IntoResponse {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    build_refresh_response(&context, &request, SystemTime::now())
}

fn build_refresh_response(
    context: &ApiContext,
    request: &RefreshRequest,
    now: SystemTime,
) -> RefreshResponse {
    let params = match RefreshParams::new(
        request.lat_resolution.unwrap_or(context.defaults.lat_resolution()),
        request.lon_resolution.unwrap_or(context.defaults.lon_resolution()),
        request.num_samples.unwrap_or(context.defaults.num_samples()),
    ) {
        Ok(params) => params,
        Err(err) => return refresh_rejection(RefreshErrorCode::InvalidParams, &err, now),
    };

    let predictor_source = match &context.model_path {
        Some(path) => ArtifactSource::new(path),
        None => ArtifactSource::unconfigured(),
    };
    let dataset_source = match &context.dataset_path {
        Some(path) => CsvDataset::new(path),
        None => CsvDataset::unconfigured(),
    };

    match run_refresh(&context.state, &params, &predictor_source, &dataset_source) {
        Ok(outcome) => {
            let timestamp = match format_timestamp(now) {
                Ok(formatted) => formatted,
                Err(_) => {
                    return refresh_internal_error("timestamp formatting failure");
                }
            };
            RefreshResponse::Success(RefreshSuccessResponse {
                generation: outcome.generation,
                overlay_ready: outcome.overlay_ready,
                dataset_points: outcome.dataset_points,
                warnings: outcome.warnings.iter().map(map_warning).collect(),
                timestamp,
            })
        }
        Err(err @ RefreshError::Grid(_)) => {
            refresh_rejection(RefreshErrorCode::InvalidGrid, &err, now)
        }
        Err(err @ RefreshError::ParamOutOfRange { .. }) => {
            refresh_rejection(RefreshErrorCode::InvalidParams, &err, now)
        }
        Err(RefreshError::State(err)) => {
            error!(error = %err, "Refresh failed on state access");
            refresh_internal_error("state access failure during refresh")
        }
    }
}

fn map_warning(warning: &RefreshWarning) -> WarningResponse {
    let code = match warning {
        RefreshWarning::PredictionUnavailable { .. } => WarningCode::PredictionUnavailable,
        RefreshWarning::DatasetUnavailable { .. } => WarningCode::DatasetUnavailable,
        RefreshWarning::DatasetTruncated { .. } => WarningCode::DatasetTruncated,
    };
    WarningResponse {
        code,
        message: warning.to_string(),
    }
}

fn refresh_rejection(code: RefreshErrorCode, err: &RefreshError, now: SystemTime) -> RefreshResponse {
    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return refresh_internal_error("timestamp formatting failure");
        }
    };
    RefreshResponse::Error {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        body: RefreshErrorResponse {
            error_code: code,
            error_message: err.to_string(),
            timestamp,
        },
    }
}

fn refresh_internal_error(message: &str) -> RefreshResponse {
    error!(message = message, "Internal error while handling /api/refresh");
    RefreshResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: RefreshErrorResponse {
            error_code: RefreshErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp("refresh"),
        },
    }
}

// Health

pub enum HealthResponse {
    Success {
        status: StatusCode,
        body: HealthSuccessResponse,
    },
    Error {
        status: StatusCode,
        body: HealthErrorResponse,
    },
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        match self {
            HealthResponse::Success { status, body } => (status, Json(body)).into_response(),
            HealthResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_health(State(context): State<Arc<ApiContext>>) -> impl IntoResponse {
    build_health_response(&context, SystemTime::now())
}

fn build_health_response(context: &ApiContext, now: SystemTime) -> HealthResponse {
    let guard = match context.state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return health_internal_error("state lock poisoned while reading state");
        }
    };
    let has_overlay = guard.overlay().is_some();
    let has_locations = !guard.locations().is_empty();
    drop(guard);

    let status = match (has_overlay, has_locations) {
        (true, _) => HealthStatus::Ok,
        (false, true) => HealthStatus::Degraded,
        (false, false) => HealthStatus::Ko,
    };

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return health_internal_error("timestamp formatting failure");
        }
    };

    let status_code = match status {
        HealthStatus::Ko => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Ok | HealthStatus::Degraded => StatusCode::OK,
    };

    HealthResponse::Success {
        status: status_code,
        body: HealthSuccessResponse { status, timestamp },
    }
}

fn health_internal_error(message: &str) -> HealthResponse {
    error!(message = message, "Internal error while handling /api/health");
    HealthResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: HealthErrorResponse {
            error_code: HealthErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp("health"),
        },
    }
}
