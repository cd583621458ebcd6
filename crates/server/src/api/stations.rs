use std::{collections::HashMap, sync::Arc};

use crate::{
    dto::{SelectionDto, StationDto},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ridership::shared::{Granularity, Line};
use tracing::warn;

pub async fn lines(State(state): State<Arc<AppState>>) -> Response {
    let lines: Vec<_> = state
        .engine
        .lines()
        .iter()
        .map(|line| line.to_string())
        .collect();
    Json(lines).into_response()
}

pub async fn stations(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let Some(line) = params.get("line") else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let line: Line = line.parse().map_err(|line| {
        warn!("Unknown line: {line}");
        StatusCode::BAD_REQUEST
    })?;
    let stations: Vec<_> = state
        .engine
        .get_stations(line)
        .iter()
        .map(StationDto::from)
        .collect();
    Ok(Json(stations).into_response())
}

/// Resolves a line change: the station set of the line and the station that
/// ends up selected.
pub async fn selection(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let mut selection = state.engine.selection_state();
    if let Some(line) = params.get("line") {
        selection
            .select_line(line, params.get("station").map(String::as_str))
            .map_err(|err| {
                warn!("{err}");
                StatusCode::BAD_REQUEST
            })?;
    }
    if let Some(granularity) = params.get("granularity") {
        let granularity: Granularity = granularity
            .parse()
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        selection.select_granularity(granularity);
    }

    let current = selection.selection();
    let dto = SelectionDto::from(current, state.engine.get_stations(current.line));
    Ok(Json(dto).into_response())
}
