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

use crate::error::AnalysisError;
use dotenvy::dotenv;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self, AnalysisError> {
        dotenv().ok();
        let api_key = std::env::var("ATLAS_REASONER_API_KEY").map_err(|_| {
            AnalysisError::Configuration(
                "ATLAS_REASONER_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(Self {
            endpoint: std::env::var("ATLAS_REASONER_ENDPOINT")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".to_string()),
            api_key,
            api_version: std::env::var("ATLAS_REASONER_API_VERSION")
                .unwrap_or_else(|_| "2023-06-01".to_string()),
            primary_model: std::env::var("ATLAS_REASONER_MODEL")
                .unwrap_or_else(|_| "claude-3-7-sonnet-latest".to_string()),
            fallback_model: std::env::var("ATLAS_REASONER_FALLBACK_MODEL")
                .unwrap_or_else(|_| "claude-3-5-haiku-latest".to_string()),
            max_tokens: std::env::var("ATLAS_REASONER_MAX_TOKENS")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .unwrap_or(1024),
            timeout: Duration::from_secs(
                std::env::var("ATLAS_REASONER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "90".to_string())
                    .parse()
                    .unwrap_or(90),
            ),
        })
    }
}
