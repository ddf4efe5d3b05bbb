// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use auspex::{QueryAnalyzer, ReasonerClient};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
}

pub fn build_router<C: ReasonerClient + 'static>(analyzer: Arc<QueryAnalyzer<C>>) -> Router {
    Router::new()
        .route("/api/analyze-query", post(analyze_query::<C>))
        .route("/health", get(health))
        .with_state(analyzer)
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze_query<C: ReasonerClient + 'static>(
    State(analyzer): State<Arc<QueryAnalyzer<C>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match analyzer.analyze(&request.query).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            // Internal error kinds stay in the logs; clients get a
            // generic envelope.
            error!(error = %e, "query analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to analyze query"})),
            )
                .into_response()
        }
    }
}
