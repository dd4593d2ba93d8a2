//! ==============================================================================
//! server.rs - shared simulation handle and the http api
//! ==============================================================================
//!
//! purpose:
//!     wires the reading generator to axum. every GET /latest-readings runs one
//!     generation pass and answers with the resulting json array.
//!
//! relationships:
//!     - uses: generator.rs (one pass per request), store.rs (owned state)
//!     - used by: main.rs (builds the simulation, runs the server)
//!
//! concurrency:
//!     the store and the rng live behind one tokio mutex. a whole pass runs
//!     under the lock, so concurrent requests never interleave their
//!     read-modify-write on the same sensor.
//!
//! ==============================================================================

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::domain::{Reading, SensorDescriptor};
use crate::generator;
use crate::store::{StateStore, StoreError};

// ==============================================================================
// simulation - store + rng owned by the server
// ==============================================================================

struct Inner {
    roster: &'static [SensorDescriptor],
    store: StateStore,
    rng: ChaCha8Rng,
}

/// Clone-able handle to the simulated warehouse
#[derive(Clone)]
pub struct Simulation {
    inner: Arc<Mutex<Inner>>,
    show_sensor_data: bool,
}

impl Simulation {
    /// `seed: None` draws the rng seed from the os
    pub fn new(
        roster: &'static [SensorDescriptor],
        store: StateStore,
        seed: Option<u64>,
        show_sensor_data: bool,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            inner: Arc::new(Mutex::new(Inner { roster, store, rng })),
            show_sensor_data,
        }
    }

    /// advance every sensor by one tick
    pub async fn tick(&self) -> Result<Vec<Reading>, StoreError> {
        let mut guard = self.inner.lock().await;
        let Inner { roster, store, rng } = &mut *guard;
        let readings = generator::generate(*roster, store, rng, Utc::now())?;
        drop(guard);

        if self.show_sensor_data {
            for r in &readings {
                tracing::debug!(
                    "[{}] Temp: {:.1}°C | Humidity: {:.1}%",
                    r.sensor_id,
                    r.temperature_celsius,
                    r.humidity_percent
                );
            }
        }
        Ok(readings)
    }
}

// ==============================================================================
// error mapping
// ==============================================================================

/// anything that escapes a handler becomes a 500
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to generate readings: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"status": "error", "message": self.0.to_string()})),
        )
            .into_response()
    }
}

// ==============================================================================
// web server
// ==============================================================================

pub fn router(simulation: Simulation) -> Router {
    Router::new()
        .route("/latest-readings", get(latest_readings_handler))
        .layer(CorsLayer::permissive())
        .with_state(simulation)
}

/// serve until `shutdown` resolves
pub async fn run_server<F>(listener: TcpListener, simulation: Simulation, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(simulation))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// GET /latest-readings
/// returns one fresh reading per roster sensor
async fn latest_readings_handler(
    State(simulation): State<Simulation>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = simulation.tick().await?;
    tracing::info!("Serving data for {} sensors.", readings.len());
    Ok(Json(readings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BASELINE_HUMIDITIES, BASELINE_TEMPERATURES, ROSTER};
    use tokio::sync::oneshot;

    fn simulation(seed: u64) -> Simulation {
        let store =
            StateStore::with_roster(&ROSTER, BASELINE_TEMPERATURES, BASELINE_HUMIDITIES).unwrap();
        Simulation::new(&ROSTER, store, Some(seed), true)
    }

    /// bind an ephemeral port and return its base url plus a shutdown trigger
    async fn spawn(simulation: Simulation) -> (String, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(run_server(listener, simulation, async {
            rx.await.ok();
        }));
        (format!("http://{}", addr), tx)
    }

    #[tokio::test]
    async fn tick_walks_shared_state() {
        let sim = simulation(1);
        let handle = sim.clone();
        let first = sim.tick().await.unwrap();
        let second = handle.tick().await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn seeded_simulations_agree() {
        let a = simulation(21).tick().await.unwrap();
        let b = simulation(21).tick().await.unwrap();
        let values = |rs: &[Reading]| {
            rs.iter()
                .map(|r| (r.temperature_celsius, r.humidity_percent))
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&a), values(&b));
    }

    #[tokio::test]
    async fn latest_readings_returns_roster_json_with_cors() {
        let (base, shutdown) = spawn(simulation(2)).await;

        let response = reqwest::Client::new()
            .get(format!("{}/latest-readings", base))
            .header("Origin", "http://localhost:8000")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json"));

        let body: serde_json::Value = response.json().await.unwrap();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 5);
        let ids: Vec<_> = items.iter().map(|i| i["sensorId"].as_str().unwrap()).collect();
        assert_eq!(
            ids,
            ["WH-TEMP-001", "WH-HUM-002", "WH-FRZ-003", "WH-DRY-004", "WH-OFF-005"]
        );
        for item in items {
            assert!(item["location"].is_string());
            assert!(item["timestamp"].as_str().unwrap().ends_with('Z'));
            assert!(item["temperature_celsius"].is_f64());
            assert!(item["humidity_percent"].is_f64());
        }

        shutdown.send(()).ok();
    }

    #[tokio::test]
    async fn concurrent_requests_all_stay_in_range() {
        let (base, shutdown) = spawn(simulation(3)).await;
        let client = reqwest::Client::new();

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let client = client.clone();
            let url = format!("{}/latest-readings", base);
            tasks.push(tokio::spawn(async move {
                client
                    .get(url)
                    .send()
                    .await
                    .unwrap()
                    .json::<Vec<Reading>>()
                    .await
                    .unwrap()
            }));
        }

        for task in tasks {
            let readings = task.await.unwrap();
            assert_eq!(readings.len(), ROSTER.len());
            for (reading, sensor) in readings.iter().zip(ROSTER.iter()) {
                assert_eq!(reading.sensor_id, sensor.id);
                let range = sensor.class.clamp_range();
                assert!(range.temperature.contains(reading.temperature_celsius));
                assert!(range.humidity.contains(reading.humidity_percent));
            }
        }

        shutdown.send(()).ok();
    }

    #[tokio::test]
    async fn uninitialized_store_is_a_500() {
        let sim = Simulation::new(&ROSTER, StateStore::new(), Some(4), false);
        let (base, shutdown) = spawn(sim).await;

        let response = reqwest::get(format!("{}/latest-readings", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "error");

        shutdown.send(()).ok();
    }

    #[tokio::test]
    async fn other_routes_and_methods_are_rejected() {
        let (base, shutdown) = spawn(simulation(5)).await;
        let client = reqwest::Client::new();

        let missing = client.get(format!("{}/readings", base)).send().await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let post = client
            .post(format!("{}/latest-readings", base))
            .send()
            .await
            .unwrap();
        assert_eq!(post.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

        shutdown.send(()).ok();
    }
}
