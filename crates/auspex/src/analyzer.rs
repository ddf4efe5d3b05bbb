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

use crate::client::ReasonerClient;
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::extract::extract_json_object;
use reasoner_contracts::{is_retriable_error_kind, ReasonerReply, ReasonerRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vizier::{
    map_intent, IntentKind, QueryIntent, VisualizationKind, VisualizationSuggestion,
};

const SYSTEM_INSTRUCTION: &str = "You are a geospatial analysis assistant. Classify the user's \
analytical question and respond with a single JSON object, nothing else, of the shape: \
{\"intent\": string, \"relevantLayers\": [string], \"relevantFields\": [string], \
\"queryType\": string, \"visualizationType\": string, \"confidence\": number}. \
queryType must be one of: correlation, distribution, ranking, temporal, spatial, \
composite, joint_high, difference, single_layer.";

/// Confidence reported when the mapper unexpectedly returns no suggestions.
const EMPTY_MAPPING_CONFIDENCE: f64 = 0.5;

/// Untrusted reasoning-service payload. Parsed strictly: a payload that
/// does not deserialise is a hard `MalformedResponse`, never repaired.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResult {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub relevant_layers: Vec<String>,
    #[serde(default)]
    pub relevant_fields: Vec<String>,
    pub query_type: String,
    #[serde(default)]
    pub visualization_type: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

/// Combined payload returned to the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub intent: String,
    pub relevant_layers: Vec<String>,
    pub relevant_fields: Vec<String>,
    pub query_type: IntentKind,
    pub visualization_type: VisualizationKind,
    pub confidence: f64,
    pub alternative_visualizations: Vec<VisualizationSuggestion>,
}

/// Escalation state: primary first, fallback at most once, and only for
/// the named retriable reply error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Primary,
    Fallback,
}

pub struct QueryAnalyzer<C: ReasonerClient> {
    client: C,
    config: AnalyzerConfig,
}

impl<C: ReasonerClient> QueryAnalyzer<C> {
    pub fn new(client: C, config: AnalyzerConfig) -> Self {
        Self { client, config }
    }

    /// Analyzes a free-text query: at most two sequential reasoning calls
    /// (primary, then optional fallback), strict payload validation, then
    /// deterministic recommendation mapping.
    pub async fn analyze(&self, query: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let mut attempt = Attempt::Primary;
        let reply = loop {
            let model = match attempt {
                Attempt::Primary => &self.config.primary_model,
                Attempt::Fallback => &self.config.fallback_model,
            };
            let request = ReasonerRequest::single_turn(
                model,
                self.config.max_tokens,
                SYSTEM_INSTRUCTION,
                query,
            );
            match self.client.send(&request).await? {
                reply @ ReasonerReply::Message { .. } => break reply,
                ReasonerReply::Error { error } => match attempt {
                    Attempt::Primary if is_retriable_error_kind(&error.kind) => {
                        warn!(kind = %error.kind, model = %model, "primary model rejected, escalating to fallback");
                        attempt = Attempt::Fallback;
                    }
                    _ => return Err(AnalysisError::Failed(error.message)),
                },
            }
        };

        let text = reply.first_text().ok_or_else(|| {
            AnalysisError::MalformedResponse("reply contained no text block".to_string())
        })?;
        let json = extract_json_object(text).ok_or_else(|| {
            AnalysisError::MalformedResponse("no JSON object found in reply text".to_string())
        })?;
        let raw: RawAnalysisResult = serde_json::from_str(json)
            .map_err(|e| AnalysisError::MalformedResponse(format!("invalid payload: {e}")))?;
        debug!(query_type = %raw.query_type, fields = ?raw.relevant_fields, "parsed analysis payload");

        self.build_outcome(query, raw)
    }

    fn build_outcome(
        &self,
        query: &str,
        raw: RawAnalysisResult,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let kind: IntentKind = raw.query_type.parse()?;
        // Geometry inference from the reasoning output is not supported
        // yet; polygon is the fixed default.
        let intent = QueryIntent::new(kind, raw.relevant_fields.clone());

        let suggestions = map_intent(&intent)?;
        let (primary, alternatives) = match suggestions.split_first() {
            Some((first, rest)) => (first.clone(), rest.to_vec()),
            None => (
                VisualizationSuggestion {
                    kind: VisualizationKind::SingleLayer,
                    confidence: EMPTY_MAPPING_CONFIDENCE,
                    reason: "Default rendering when no strategy qualified".to_string(),
                },
                Vec::new(),
            ),
        };

        Ok(AnalysisOutcome {
            intent: if raw.intent.is_empty() {
                query.to_string()
            } else {
                raw.intent
            },
            relevant_layers: raw.relevant_layers,
            relevant_fields: raw.relevant_fields,
            query_type: kind,
            visualization_type: primary.kind,
            confidence: primary.confidence,
            alternative_visualizations: alternatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reasoner_contracts::{ContentBlock, ReplyError};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubReasoner {
        replies: Mutex<Vec<Result<ReasonerReply, AnalysisError>>>,
        models_called: Mutex<Vec<String>>,
    }

    impl StubReasoner {
        fn new(replies: Vec<Result<ReasonerReply, AnalysisError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                models_called: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.models_called.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReasonerClient for StubReasoner {
        async fn send(&self, request: &ReasonerRequest) -> Result<ReasonerReply, AnalysisError> {
            self.models_called
                .lock()
                .unwrap()
                .push(request.model.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            endpoint: "http://localhost/v1/messages".to_string(),
            api_key: "test-key".to_string(),
            api_version: "2023-06-01".to_string(),
            primary_model: "primary-model".to_string(),
            fallback_model: "fallback-model".to_string(),
            max_tokens: 1024,
            timeout: Duration::from_secs(5),
        }
    }

    fn message(text: &str) -> ReasonerReply {
        ReasonerReply::Message {
            content: vec![ContentBlock::Text {
                text: text.to_string(),
            }],
        }
    }

    fn error(kind: &str, message: &str) -> ReasonerReply {
        ReasonerReply::Error {
            error: ReplyError {
                kind: kind.to_string(),
                message: message.to_string(),
            },
        }
    }

    const CORRELATION_PAYLOAD: &str = r#"Here you go:
{"queryType": "correlation", "relevantFields": ["income", "education_level"], "confidence": 0.9}"#;

    #[tokio::test]
    async fn successful_primary_analysis_maps_to_correlation() {
        let stub = StubReasoner::new(vec![Ok(message(CORRELATION_PAYLOAD))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let outcome = analyzer
            .analyze("How does income level correlate with education?")
            .await
            .unwrap();

        assert_eq!(outcome.query_type, IntentKind::Correlation);
        assert_eq!(outcome.visualization_type, VisualizationKind::Correlation);
        assert!(outcome.confidence > 0.7);
        assert_eq!(outcome.alternative_visualizations.len(), 3);
        assert_eq!(outcome.relevant_fields, vec!["income", "education_level"]);
        // The service returned no free-text intent, so the query stands in.
        assert_eq!(outcome.intent, "How does income level correlate with education?");
        assert_eq!(analyzer.client.calls(), vec!["primary-model"]);
    }

    #[tokio::test]
    async fn model_not_found_escalates_to_fallback_exactly_once() {
        let stub = StubReasoner::new(vec![
            Ok(error("model_not_found", "no such model")),
            Ok(message(CORRELATION_PAYLOAD)),
        ]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let outcome = analyzer.analyze("income vs education").await.unwrap();

        assert_eq!(outcome.visualization_type, VisualizationKind::Correlation);
        assert_eq!(
            analyzer.client.calls(),
            vec!["primary-model", "fallback-model"]
        );
    }

    #[tokio::test]
    async fn invalid_request_error_also_escalates() {
        let stub = StubReasoner::new(vec![
            Ok(error("invalid_request_error", "bad request")),
            Ok(message(CORRELATION_PAYLOAD)),
        ]);
        let analyzer = QueryAnalyzer::new(stub, config());

        analyzer.analyze("income vs education").await.unwrap();
        assert_eq!(analyzer.client.calls().len(), 2);
    }

    #[tokio::test]
    async fn non_retriable_error_is_fatal_with_no_fallback() {
        let stub = StubReasoner::new(vec![Ok(error("overloaded_error", "try later"))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Failed(m) if m == "try later"));
        assert_eq!(analyzer.client.calls(), vec!["primary-model"]);
    }

    #[tokio::test]
    async fn fallback_failure_carries_the_fallback_message() {
        let stub = StubReasoner::new(vec![
            Ok(error("model_not_found", "primary gone")),
            Ok(error("overloaded_error", "fallback saturated")),
        ]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Failed(m) if m == "fallback saturated"));
        assert_eq!(analyzer.client.calls().len(), 2);
    }

    #[tokio::test]
    async fn textual_reply_without_json_is_malformed_and_never_falls_back() {
        let stub = StubReasoner::new(vec![Ok(message(
            "I could not produce a structured answer, sorry.",
        ))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        assert_eq!(analyzer.client.calls(), vec!["primary-model"]);
    }

    #[tokio::test]
    async fn invalid_json_payload_is_malformed_not_repaired() {
        let stub = StubReasoner::new(vec![Ok(message(r#"{"queryType": 42}"#))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn out_of_enum_query_type_surfaces_loudly() {
        let stub = StubReasoner::new(vec![Ok(message(r#"{"queryType": "sentiment"}"#))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedIntent(_)));
    }

    #[tokio::test]
    async fn network_failure_propagates_without_fallback() {
        let stub = StubReasoner::new(vec![Err(AnalysisError::Timeout)]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let err = analyzer.analyze("anything").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout));
        assert_eq!(analyzer.client.calls(), vec!["primary-model"]);
    }

    #[tokio::test]
    async fn service_intent_text_is_preserved_when_present() {
        let stub = StubReasoner::new(vec![Ok(message(
            r#"{"intent": "compare income with education", "queryType": "correlation",
                "relevantLayers": ["census_tracts"], "relevantFields": ["income"], "confidence": 0.8}"#,
        ))]);
        let analyzer = QueryAnalyzer::new(stub, config());

        let outcome = analyzer.analyze("whatever").await.unwrap();
        assert_eq!(outcome.intent, "compare income with education");
        assert_eq!(outcome.relevant_layers, vec!["census_tracts"]);
    }
}
