use std::{collections::HashMap, sync::Arc};

use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use ridership::engine::{Selection, TrendSelector, View};
use serde::Serialize;
use tracing::debug;

/// Reads `line`, `station` and `granularity`. Missing granularity means the
/// configured default; anything unparsable means there is nothing to draw.
fn selection_from(params: &HashMap<String, String>, state: &AppState) -> Option<Selection> {
    let config = state.engine.config();
    let line = match params.get("line") {
        Some(line) => line.parse().ok()?,
        None => config.default_line,
    };
    let granularity = match params.get("granularity") {
        Some(granularity) => granularity.parse().ok()?,
        None => config.default_granularity,
    };
    Some(Selection::new(
        line,
        params.get("station").map(String::as_str),
        granularity,
    ))
}

fn empty() -> Response {
    Json(View::<()>::Empty).into_response()
}

fn respond<T: Serialize>(view: View<T>) -> Response {
    Json(view).into_response()
}

pub async fn bar(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match selection_from(&params, &state) {
        Some(selection) => respond(state.engine.get_bar_view(&selection)),
        None => {
            debug!("Unusable bar selection: {params:?}");
            empty()
        }
    }
}

pub async fn heatmap(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match selection_from(&params, &state) {
        Some(selection) => respond(state.engine.get_heatmap_view(&selection)),
        None => {
            debug!("Unusable heatmap selection: {params:?}");
            empty()
        }
    }
}

pub async fn trend(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selector = match params.get("line") {
        Some(line) => line.parse::<TrendSelector>().ok(),
        None => Some(TrendSelector::All),
    };
    match selector {
        Some(selector) => respond(state.engine.get_trend_view(selector)),
        None => empty(),
    }
}

pub async fn map(State(state): State<Arc<AppState>>) -> Response {
    Json(state.engine.get_map_view()).into_response()
}
