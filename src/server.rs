use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::insight::{generate_insights, ContextualInsight, GenerateOptions, RuleRegistry};
use crate::instrument::{instrument_for_metric, InstrumentSpec};
use crate::registry::{MetricId, MetricRegistry, MetricRegistryEntry, StatusTone};
use crate::snapshot::{build_eval_context, DataQualityReport, MetricSnapshot};
use crate::status::derive_status;

#[derive(Clone)]
struct ApiState {
    config: Config,
    registry: MetricRegistry,
    rules: RuleRegistry,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct InsightsRequest {
    snapshot: MetricSnapshot,
    #[serde(default)]
    data_quality: Option<DataQualityReport>,
    #[serde(default)]
    dedupe_categories: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstrumentsRequest {
    snapshot: MetricSnapshot,
    /// Previous snapshot used to derive deltas.
    #[serde(default)]
    baseline: Option<MetricSnapshot>,
    /// When the snapshot was computed, for freshness derivation.
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusRequest {
    snapshot: MetricSnapshot,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct RegistryResponse {
    entries: Vec<MetricRegistryEntry>,
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    insights: Vec<ContextualInsight>,
}

#[derive(Debug, Serialize)]
struct InstrumentsResponse {
    instruments: Vec<InstrumentSpec>,
}

#[derive(Debug, Serialize)]
struct StatusRow {
    metric: MetricId,
    label: String,
    value: f64,
    tone: StatusTone,
    status_label: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    rows: Vec<StatusRow>,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let registry = MetricRegistry::with_defaults().with_overrides(&config.threshold_overrides());
    let state = ApiState {
        config,
        registry,
        rules: RuleRegistry::with_defaults(),
    };

    let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any);
    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/registry", get(registry_entries))
        .route("/v1/status", post(status))
        .route("/v1/insights", post(insights))
        .route("/v1/instruments", post(instruments))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn registry_entries(State(state): State<ApiState>) -> Json<ApiResponse<RegistryResponse>> {
    ok(RegistryResponse {
        entries: state.registry.iter().cloned().collect(),
    })
}

async fn status(
    State(state): State<ApiState>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<StatusResponse> {
    if request.snapshot.values.is_empty() {
        return Err(ApiError::bad_request("snapshot is empty"));
    }
    let mut rows = Vec::new();
    for entry in state.registry.iter() {
        let key = entry.metric.to_string();
        if !request.snapshot.contains(&key) {
            continue;
        }
        let value = request.snapshot.numeric(&key);
        let tone = derive_status(value, &entry.thresholds);
        rows.push(StatusRow {
            metric: entry.metric.clone(),
            label: entry.label.clone(),
            value,
            tone,
            status_label: entry.status_labels.for_tone(tone).to_string(),
        });
    }
    Ok(ok(StatusResponse { rows }))
}

async fn insights(
    State(state): State<ApiState>,
    Json(request): Json<InsightsRequest>,
) -> ApiResult<InsightsResponse> {
    let ctx = build_eval_context(&request.snapshot, request.data_quality.as_ref());
    let options = GenerateOptions {
        dedupe_categories: request
            .dedupe_categories
            .unwrap_or(state.config.engine.dedupe_categories),
    };
    let mut insights = generate_insights(&state.rules, &state.registry, &ctx, &options);
    let max = state.config.engine.max_insights;
    if max > 0 {
        insights.truncate(max);
    }
    Ok(ok(InsightsResponse { insights }))
}

async fn instruments(
    State(state): State<ApiState>,
    Json(request): Json<InstrumentsRequest>,
) -> ApiResult<InstrumentsResponse> {
    if request.snapshot.values.is_empty() {
        return Err(ApiError::bad_request("snapshot is empty"));
    }
    let now = Utc::now();
    let mut specs = Vec::new();
    for metric in MetricId::ALL {
        let key = metric.to_string();
        if !request.snapshot.contains(&key) {
            continue;
        }
        let baseline = request
            .baseline
            .as_ref()
            .filter(|b| b.contains(&key))
            .map(|b| b.numeric(&key));
        if let Some(spec) = instrument_for_metric(
            &state.registry,
            &metric,
            request.snapshot.numeric(&key),
            baseline,
            request.as_of,
            now,
        ) {
            specs.push(spec);
        }
    }
    Ok(ok(InstrumentsResponse { instruments: specs }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruments_skip_metrics_absent_from_the_snapshot() {
        let registry = MetricRegistry::with_defaults();
        let snapshot = MetricSnapshot::from_pairs(&[("liquidityMonths", "4")]);
        let mut present = 0;
        for metric in MetricId::ALL {
            let key = metric.to_string();
            if snapshot.contains(&key) {
                present += 1;
                assert!(instrument_for_metric(
                    &registry,
                    &metric,
                    snapshot.numeric(&key),
                    None,
                    None,
                    Utc::now()
                )
                .is_some());
            }
        }
        assert_eq!(present, 1);
    }
}
