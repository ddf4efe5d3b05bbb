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

//! Local rule-based query classifier. Keyword and regex driven, never
//! touches the network, never fails: anything unmatched degrades to
//! `Standard` at the floor confidence.

use crate::extraction::{extract_location, extract_radius_meters};
use crate::geometry::GeoShape;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use vizier::TimeRange;

/// Competition keywords win over market keywords when both appear.
const COMPETITION_KEYWORDS: [&str; 6] = [
    "competitor",
    "competition",
    "similar",
    "nearby",
    "other",
    "existing",
];

const MARKET_KEYWORDS: [&str; 6] = [
    "market",
    "potential",
    "opportunity",
    "demographic",
    "population",
    "income",
];

const KEYWORD_CONFIDENCE: f64 = 0.8;
const LOCATION_CONFIDENCE: f64 = 0.7;
const STANDARD_CONFIDENCE: f64 = 0.5;
const CONTEXT_BOOST: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalIntentKind {
    Competition,
    Market,
    Location,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualityFilter {
    pub field: String,
    pub value: serde_json::Value,
    pub operator: FilterOperator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParameters {
    pub location: Option<String>,
    pub radius_meters: Option<f64>,
    #[serde(default)]
    pub filters: Vec<EqualityFilter>,
    pub time_range: Option<TimeRange>,
}

/// Created fresh per query, consumed immediately by the caller that
/// resolves geometry. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalClassification {
    #[serde(rename = "type")]
    pub kind: LocalIntentKind,
    pub confidence: f64,
    pub parameters: QueryParameters,
}

/// Optional caller-held state. Passed explicitly, never stored globally.
#[derive(Debug, Clone, Default)]
pub struct ClassificationContext {
    pub previous_intent: Option<LocalIntentKind>,
    pub selected_area: Option<GeoShape>,
    pub active_filters: HashMap<String, serde_json::Value>,
}

/// Classifies a raw query into a geospatial intent with extracted
/// location/radius parameters. Best-effort by contract: this never fails.
pub fn classify(query: &str, context: Option<&ClassificationContext>) -> LocalClassification {
    let normalised = query.to_lowercase();

    let location = extract_location(&normalised);
    let radius_meters = extract_radius_meters(&normalised);

    let (kind, mut confidence) = base_kind(&normalised, location.is_some());
    debug!(kind = kind_str(kind), confidence, "base classification");

    let mut parameters = QueryParameters {
        location,
        radius_meters,
        filters: Vec::new(),
        time_range: None,
    };

    if let Some(context) = context {
        if context.previous_intent == Some(kind) {
            confidence = (confidence + CONTEXT_BOOST).min(1.0);
        }
        if parameters.location.is_none() {
            parameters.location = context.selected_area.as_ref().map(describe_area);
        }
        if !context.active_filters.is_empty() {
            let mut filters: Vec<EqualityFilter> = context
                .active_filters
                .iter()
                .map(|(field, value)| EqualityFilter {
                    field: field.clone(),
                    value: value.clone(),
                    operator: FilterOperator::Equals,
                })
                .collect();
            filters.sort_by(|a, b| a.field.cmp(&b.field));
            parameters.filters = filters;
        }
    }

    LocalClassification {
        kind,
        confidence,
        parameters,
    }
}

fn base_kind(normalised: &str, has_location: bool) -> (LocalIntentKind, f64) {
    if contains_any(normalised, &COMPETITION_KEYWORDS) {
        (LocalIntentKind::Competition, KEYWORD_CONFIDENCE)
    } else if contains_any(normalised, &MARKET_KEYWORDS) {
        (LocalIntentKind::Market, KEYWORD_CONFIDENCE)
    } else if has_location {
        (LocalIntentKind::Location, LOCATION_CONFIDENCE)
    } else {
        (LocalIntentKind::Standard, STANDARD_CONFIDENCE)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn describe_area(area: &GeoShape) -> String {
    match area {
        GeoShape::Polygon { .. } => "selected map area".to_string(),
        GeoShape::Point { lat, lon } => format!("{lat:.5}, {lon:.5}"),
    }
}

fn kind_str(kind: LocalIntentKind) -> &'static str {
    match kind {
        LocalIntentKind::Competition => "COMPETITION",
        LocalIntentKind::Market => "MARKET",
        LocalIntentKind::Location => "LOCATION",
        LocalIntentKind::Standard => "STANDARD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_query_with_radius_and_location() {
        let result = classify("competitor analysis near Main Street within 5 miles", None);
        assert_eq!(result.kind, LocalIntentKind::Competition);
        assert_eq!(result.confidence, 0.8);
        let radius = result.parameters.radius_meters.unwrap();
        assert!((radius - 8046.7).abs() < 0.01);
        assert!(result
            .parameters
            .location
            .unwrap()
            .contains("main street"));
    }

    #[test]
    fn competition_keywords_beat_market_keywords() {
        let result = classify("competitor income", None);
        assert_eq!(result.kind, LocalIntentKind::Competition);
    }

    #[test]
    fn market_keywords_classify_as_market() {
        let result = classify("what is the market potential here", None);
        assert_eq!(result.kind, LocalIntentKind::Market);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn location_only_query_classifies_as_location() {
        let result = classify("restaurants near riverside park", None);
        assert_eq!(result.kind, LocalIntentKind::Location);
        assert_eq!(result.confidence, 0.7);
    }

    #[test]
    fn unmatched_query_degrades_to_standard() {
        let result = classify("show me something", None);
        assert_eq!(result.kind, LocalIntentKind::Standard);
        assert_eq!(result.confidence, 0.5);
        assert!(result.parameters.location.is_none());
        assert!(result.parameters.radius_meters.is_none());
    }

    #[test]
    fn matching_previous_intent_boosts_confidence() {
        let context = ClassificationContext {
            previous_intent: Some(LocalIntentKind::Competition),
            ..Default::default()
        };
        let result = classify("find existing competitors", Some(&context));
        assert_eq!(result.kind, LocalIntentKind::Competition);
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn confidence_boost_is_capped_at_one() {
        let context = ClassificationContext {
            previous_intent: Some(LocalIntentKind::Competition),
            ..Default::default()
        };
        // Apply the boost repeatedly through reclassification; a single
        // call can never exceed 1.0 by construction.
        let result = classify("competitors", Some(&context));
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn selected_area_backfills_missing_location() {
        let context = ClassificationContext {
            selected_area: Some(GeoShape::Point {
                lat: 45.52345,
                lon: -122.67621,
            }),
            ..Default::default()
        };
        let result = classify("competitor analysis", Some(&context));
        assert_eq!(
            result.parameters.location.as_deref(),
            Some("45.52345, -122.67621")
        );

        let polygon_context = ClassificationContext {
            selected_area: Some(GeoShape::Polygon {
                exterior: vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (0.0, 0.0)],
            }),
            ..Default::default()
        };
        let result = classify("competitor analysis", Some(&polygon_context));
        assert_eq!(
            result.parameters.location.as_deref(),
            Some("selected map area")
        );
    }

    #[test]
    fn extracted_location_is_not_overridden_by_context() {
        let context = ClassificationContext {
            selected_area: Some(GeoShape::Point { lat: 1.0, lon: 2.0 }),
            ..Default::default()
        };
        let result = classify("competitors near main street", Some(&context));
        assert_eq!(result.parameters.location.as_deref(), Some("main street"));
    }

    #[test]
    fn active_filters_become_equality_filters() {
        let mut active_filters = HashMap::new();
        active_filters.insert("category".to_string(), serde_json::json!("grocery"));
        active_filters.insert("rating".to_string(), serde_json::json!(4));
        let context = ClassificationContext {
            active_filters,
            ..Default::default()
        };
        let result = classify("market opportunity", Some(&context));
        assert_eq!(result.parameters.filters.len(), 2);
        assert_eq!(result.parameters.filters[0].field, "category");
        assert_eq!(result.parameters.filters[0].operator, FilterOperator::Equals);
        assert_eq!(
            result.parameters.filters[1].value,
            serde_json::json!(4)
        );
    }
}
