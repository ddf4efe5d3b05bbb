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

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use reasoner_contracts::{ReasonerReply, ReasonerRequest};
use std::time::Duration;
use tracing::{debug, info};

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| Client::builder().build().expect("HTTP client"));

/// Seam between the analyzer and the reasoning-service transport. The
/// analyzer only sees reply envelopes; transport failures surface as
/// `AnalysisError`.
#[async_trait]
pub trait ReasonerClient: Send + Sync {
    async fn send(&self, request: &ReasonerRequest) -> Result<ReasonerReply, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct HttpReasonerClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    timeout: Duration,
}

impl HttpReasonerClient {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl ReasonerClient for HttpReasonerClient {
    async fn send(&self, request: &ReasonerRequest) -> Result<ReasonerReply, AnalysisError> {
        let response = tokio::time::timeout(
            self.timeout,
            HTTP_CLIENT
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", &self.api_version)
                .header("content-type", "application/json")
                .json(request)
                .send(),
        )
        .await
        .map_err(|_| AnalysisError::Timeout)?
        .map_err(|e| AnalysisError::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        info!(%status, model = %request.model, "received reasoner response");

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network(format!("Failed to read response body: {e}")))?;
        debug!(body = %body, "raw reasoner response");

        // Error envelopes arrive with non-2xx statuses but still parse as
        // replies, which is what the fallback policy keys on.
        serde_json::from_str::<ReasonerReply>(&body).map_err(|e| {
            if status.is_success() {
                AnalysisError::MalformedResponse(format!("Unparseable reply envelope: {e}"))
            } else {
                AnalysisError::Network(format!("Reasoner API error {status}: {body}"))
            }
        })
    }
}
