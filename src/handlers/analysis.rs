use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use validator::Validate;

use crate::errors::AppError;
use crate::models::analysis::{AlertLogResponse, AnalysisSnapshot, WindowQuery, WindowResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/analysis",
    responses(
        (status = 200, description = "Latest price series and alerts", body = AnalysisSnapshot)
    )
)]
pub async fn get_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisSnapshot>, AppError> {
    let snapshot = state.analysis_state.snapshot.read().await.clone();
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/analysis/window",
    params(WindowQuery),
    responses(
        (status = 200, description = "Most recent samples, oldest first", body = WindowResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_window(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowResponse>, AppError> {
    query.validate()?;

    let window = state.analysis_state.window.read().await;
    let skip = window.len().saturating_sub(query.limit);

    Ok(Json(WindowResponse {
        product: state.analysis_state.product.clone(),
        samples: window[skip..].to_vec(),
    }))
}

#[utoipa::path(
    get,
    path = "/analysis/alerts",
    responses(
        (status = 200, description = "Alerts raised this session", body = AlertLogResponse)
    )
)]
pub async fn get_alerts(
    State(state): State<AppState>,
) -> Result<Json<AlertLogResponse>, AppError> {
    let alerts = state.analysis_state.alert_log.read().await.clone();
    Ok(Json(AlertLogResponse {
        product: state.analysis_state.product.clone(),
        alerts,
    }))
}

#[utoipa::path(
    get,
    path = "/analysis/stream",
    responses(
        (status = 200, description = "SSE stream of analysis snapshots", content_type = "text/event-stream")
    )
)]
pub async fn get_analysis_stream(
    State(state): State<AppState>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let initial_snapshot = state.analysis_state.snapshot.read().await.clone();
    let initial_event: Result<Event, Infallible> = Ok(snapshot_event(&initial_snapshot)?);
    let initial_stream = tokio_stream::iter(vec![initial_event]);

    let rx = state.analysis_state.broadcaster.subscribe();
    let broadcast_stream = BroadcastStream::new(rx).filter_map(|message| match message {
        Ok(snapshot) => snapshot_event(&snapshot).ok().map(Ok),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::debug!("analysis stream lagged, skipped {} snapshots", skipped);
            None
        }
    });

    let stream = initial_stream.chain(broadcast_stream);

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

fn snapshot_event(snapshot: &AnalysisSnapshot) -> Result<Event, AppError> {
    let data = serde_json::to_string(snapshot)?;
    Ok(Event::default()
        .event("snapshot")
        .id(snapshot.as_of_ms.to_string())
        .data(data))
}
