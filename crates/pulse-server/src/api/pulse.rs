use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use pulse_engine::{compute_insights, diagnose, InsightSource, PulseError, SignalDiagnostics};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pulse_error, ApiError, AppState};

pub(super) const DEGRADED_HEADER: &str = "x-pulse-degraded";

/// `seed` only applies to `source=mock`; pairing it with `social` is a
/// validation error. Both parameters arrive as raw strings so malformed
/// values map to the API error envelope instead of axum's plain-text
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PulseQuery {
    pub source: Option<String>,
    pub seed: Option<String>,
}

impl PulseQuery {
    fn parse(&self) -> Result<(InsightSource, Option<u64>), PulseError> {
        let source = match self.source.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => InsightSource::default(),
        };
        let seed = match self.seed.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                Some(raw.parse::<u64>().map_err(|e| PulseError::Validation {
                    field: "seed".to_string(),
                    reason: format!("'{raw}' is not an unsigned integer ({e})"),
                })?)
            }
            _ => None,
        };
        Ok((source, source.check_seed(seed)?))
    }
}

pub(super) async fn get_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PulseQuery>,
) -> Result<Response, ApiError> {
    let (source, seed) = query
        .parse()
        .map_err(|e| map_pulse_error(req_id.0.clone(), &e))?;

    let report = compute_insights(&state.ctx, source, seed)
        .await
        .map_err(|e| map_pulse_error(req_id.0.clone(), &e))?;

    let degraded = report.is_degraded();
    if degraded {
        tracing::warn!(
            request_id = %req_id.0,
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            rejected = report.rejected_records,
            "serving degraded pulse"
        );
    }

    let mut response = Json(report.insights).into_response();
    if degraded {
        response.headers_mut().insert(
            HeaderName::from_static(DEGRADED_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    Ok(response)
}

pub(super) async fn get_debug(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PulseQuery>,
) -> Result<Json<SignalDiagnostics>, ApiError> {
    let (source, seed) = query.parse().map_err(|e| map_pulse_error(req_id.0, &e))?;
    Ok(Json(diagnose(&state.ctx, source, seed).await))
}
