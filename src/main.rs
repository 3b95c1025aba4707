use forage_map::api::{self, ApiContext, MapDefaults};
use forage_map::config;
use forage_map::dataset::CsvDataset;
use forage_map::predictor::ArtifactSource;
use forage_map::refresh::{RefreshParams, run_refresh};
use forage_map::state::AppState;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, RwLock};

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        "forage-map starting"
    );
    let config = config::load_default()?;

    let state = Arc::new(RwLock::new(AppState::new()));
    let context = Arc::new(ApiContext {
        state: Arc::clone(&state),
        model_path: config.model_path().map(Path::to_path_buf),
        dataset_path: config.dataset_path().map(Path::to_path_buf),
        defaults: MapDefaults::new(
            config.lat_resolution(),
            config.lon_resolution(),
            config.num_samples(),
        ),
    });

    // First view computes everything once; later recomputes happen only on
    // explicit refresh requests.
    run_initial_refresh(&config, &state);

    let app = api::router(Arc::clone(&context));
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_initial_refresh(config: &config::Config, state: &Arc<RwLock<AppState>>) {
    let params = match RefreshParams::new(
        config.lat_resolution(),
        config.lon_resolution(),
        config.num_samples(),
    ) {
        Ok(params) => params,
        Err(err) => {
            tracing::warn!(error = %err, "Configured map defaults invalid, skipping initial refresh");
            return;
        }
    };

    let predictor_source = match config.model_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using model artifact");
            ArtifactSource::new(path)
        }
        None => {
            tracing::warn!("No model artifact configured, overlay will be unavailable");
            ArtifactSource::unconfigured()
        }
    };
    let dataset_source = match config.dataset_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using location dataset");
            CsvDataset::new(path)
        }
        None => {
            tracing::warn!("No dataset file configured, locations will be empty");
            CsvDataset::unconfigured()
        }
    };

    match run_refresh(state, &params, &predictor_source, &dataset_source) {
        Ok(outcome) => {
            tracing::info!(
                generation = outcome.generation,
                overlay_ready = outcome.overlay_ready,
                dataset_points = outcome.dataset_points,
                "Initial refresh complete"
            );
            for warning in &outcome.warnings {
                tracing::warn!(%warning, "Initial refresh warning");
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Initial refresh failed");
        }
    }
}
