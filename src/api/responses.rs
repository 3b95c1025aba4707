use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct OverlayEntryResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OverlaySuccessResponse {
    pub generation: u64,
    pub lat_resolution: u32,
    pub lon_resolution: u32,
    pub entries: Vec<OverlayEntryResponse>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OverlayErrorResponse {
    pub error_code: OverlayErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayErrorCode {
    NoOverlay,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocationsSuccessResponse {
    pub locations: Vec<LocationResponse>,
    pub total_count: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocationsErrorResponse {
    pub error_code: LocationsErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationsErrorCode {
    NoLocations,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ProductivityPointResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub productivity: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductivitySuccessResponse {
    pub points: Vec<ProductivityPointResponse>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductivityErrorResponse {
    pub error_code: ProductivityErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductivityErrorCode {
    NoData,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    PredictionUnavailable,
    DatasetUnavailable,
    DatasetTruncated,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WarningResponse {
    pub code: WarningCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshSuccessResponse {
    pub generation: u64,
    pub overlay_ready: bool,
    pub dataset_points: usize,
    pub warnings: Vec<WarningResponse>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshErrorResponse {
    pub error_code: RefreshErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshErrorCode {
    InvalidParams,
    InvalidGrid,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Ko,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthSuccessResponse {
    pub status: HealthStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthErrorResponse {
    pub error_code: HealthErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthErrorCode {
    InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_success_response_serializes_entries_in_order() {
        let response = OverlaySuccessResponse {
            generation: 3,
            lat_resolution: 2,
            lon_resolution: 2,
            entries: vec![
                OverlayEntryResponse {
                    latitude: 8.0,
                    longitude: -98.0,
                    rate: 1.0,
                },
                OverlayEntryResponse {
                    latitude: 8.0,
                    longitude: -25.0,
                    rate: 0.5,
                },
            ],
            timestamp: "2026-01-11T12:30:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize overlay response");
        assert_eq!(
            value,
            json!({
                "generation": 3,
                "lat_resolution": 2,
                "lon_resolution": 2,
                "entries": [
                    {"latitude": 8.0, "longitude": -98.0, "rate": 1.0},
                    {"latitude": 8.0, "longitude": -25.0, "rate": 0.5}
                ],
                "timestamp": "2026-01-11T12:30:00Z"
            })
        );
    }

    #[test]
    fn overlay_error_response_uses_screaming_snake_case_code() {
        let response = OverlayErrorResponse {
            error_code: OverlayErrorCode::NoOverlay,
            error_message: "No overlay available".to_string(),
            timestamp: "2026-01-11T12:31:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize overlay error response");
        assert_eq!(
            value,
            json!({
                "error_code": "NO_OVERLAY",
                "error_message": "No overlay available",
                "timestamp": "2026-01-11T12:31:00Z"
            })
        );
    }

    #[test]
    fn refresh_success_response_serializes_warnings() {
        let response = RefreshSuccessResponse {
            generation: 2,
            overlay_ready: false,
            dataset_points: 1000,
            warnings: vec![
                WarningResponse {
                    code: WarningCode::PredictionUnavailable,
                    message: "model prediction not available: boom".to_string(),
                },
                WarningResponse {
                    code: WarningCode::DatasetTruncated,
                    message: "dataset has 1500 shark locations, showing the first 1000"
                        .to_string(),
                },
            ],
            timestamp: "2026-01-11T12:32:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize refresh response");
        assert_eq!(
            value,
            json!({
                "generation": 2,
                "overlay_ready": false,
                "dataset_points": 1000,
                "warnings": [
                    {
                        "code": "PREDICTION_UNAVAILABLE",
                        "message": "model prediction not available: boom"
                    },
                    {
                        "code": "DATASET_TRUNCATED",
                        "message": "dataset has 1500 shark locations, showing the first 1000"
                    }
                ],
                "timestamp": "2026-01-11T12:32:00Z"
            })
        );
    }

    #[test]
    fn health_success_response_serializes_status() {
        let response = HealthSuccessResponse {
            status: HealthStatus::Degraded,
            timestamp: "2026-01-11T12:33:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize health response");
        assert_eq!(
            value,
            json!({
                "status": "degraded",
                "timestamp": "2026-01-11T12:33:00Z"
            })
        );
    }

    #[test]
    fn locations_response_reports_full_count_alongside_subset() {
        let response = LocationsSuccessResponse {
            locations: vec![LocationResponse {
                latitude: 20.0,
                longitude: -60.0,
            }],
            total_count: 1000,
            timestamp: "2026-01-11T12:34:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize locations response");
        assert_eq!(
            value,
            json!({
                "locations": [{"latitude": 20.0, "longitude": -60.0}],
                "total_count": 1000,
                "timestamp": "2026-01-11T12:34:00Z"
            })
        );
    }
}
