use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::{
    error::DashboardError,
    state::DashboardState,
    views::{View, ViewKind, ViewRequest},
};

pub mod metrics;

pub fn router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/views/:kind", get(get_view))
        .route("/cache/invalidate", post(invalidate_cache))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// JSON error body; the message names the offending key or argument.
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DashboardError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DashboardError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn get_view(
    State(state): State<Arc<DashboardState>>,
    Path(kind): Path<String>,
    Query(request): Query<ViewRequest>,
) -> Result<Json<View>, ApiError> {
    let kind: ViewKind = kind.parse()?;
    let view = state.render(kind, &request)?;
    Ok(Json(view))
}

async fn invalidate_cache(State(state): State<Arc<DashboardState>>) -> StatusCode {
    state.invalidate();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::io::Write;

    fn state_for(table_path: &str) -> Arc<DashboardState> {
        let cfg = AppConfig::from_toml(&format!(
            "[data]\ntable_path = \"{table_path}\"\n[http]\nbind_addr = \"127.0.0.1:0\"\n"
        ))
        .unwrap();
        Arc::new(DashboardState::from_config(&cfg))
    }

    fn sample_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            b"m,EA+[kWh],EA-[kWh],ER+[kVArh],ER-[kVArh]\n\
              l,S1,S1,S1,S1\n\
              2024-11-04 00:00:00,10,1,6,1\n\
              2024-11-04 01:00:00,20,2,3,1\n",
        )
        .unwrap();
        f
    }

    #[tokio::test]
    async fn missing_file_renders_placeholder() {
        let state = state_for("/nonexistent/readings.csv");
        let Json(view) = get_view(
            State(state),
            Path("overview".to_string()),
            Query(ViewRequest::default()),
        )
        .await
        .unwrap_or_else(|_| panic!("placeholder expected"));

        assert!(matches!(view, View::Placeholder { .. }));
    }

    #[tokio::test]
    async fn station_view_over_http() {
        let file = sample_file();
        let state = state_for(&file.path().display().to_string());
        let request = ViewRequest {
            station: Some("S1".into()),
            ..Default::default()
        };

        let Json(view) = get_view(State(state), Path("station".to_string()), Query(request))
            .await
            .unwrap_or_else(|_| panic!("station view expected"));

        let View::Station(station) = view else {
            panic!("unexpected view kind");
        };
        let ea: Vec<f64> = station.series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(ea, vec![9.0, 18.0]);
    }

    #[tokio::test]
    async fn unknown_station_maps_to_404() {
        let file = sample_file();
        let state = state_for(&file.path().display().to_string());
        let request = ViewRequest {
            station: Some("S9".into()),
            ..Default::default()
        };

        let res = get_view(State(state), Path("reactive".to_string()), Query(request)).await;
        let status = match res {
            Ok(_) => panic!("error expected"),
            Err(e) => e.into_response().status(),
        };

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_view_maps_to_400() {
        let state = state_for("/nonexistent/readings.csv");
        let res = get_view(State(state), Path("pie".to_string()), Query(ViewRequest::default())).await;
        let status = match res {
            Ok(_) => panic!("error expected"),
            Err(e) => e.into_response().status(),
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
