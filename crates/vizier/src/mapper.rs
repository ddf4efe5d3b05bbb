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

use crate::error::MapperError;
use crate::intent::{IntentKind, QueryIntent, VisualizationKind, VisualizationSuggestion};
use crate::policy;

/// Maps a structured intent to an ordered list of visualization
/// suggestions. Pure and deterministic: the same intent always yields the
/// same list, in the same fixed order, with non-increasing confidences.
pub fn map_intent(intent: &QueryIntent) -> Result<Vec<VisualizationSuggestion>, MapperError> {
    let suggestions = match intent.kind {
        IntentKind::Correlation => correlation_suggestions(),
        IntentKind::Distribution => distribution_suggestions(),
        IntentKind::Ranking => ranking_suggestions(),
        IntentKind::Temporal => temporal_suggestions(intent),
        IntentKind::Spatial => spatial_suggestions(),
        IntentKind::Composite => composite_suggestions(intent),
        IntentKind::JointHigh => joint_high_suggestions(),
        IntentKind::Difference => difference_suggestions(),
        IntentKind::SingleLayer => single_layer_suggestions(),
    };
    debug_assert!(suggestions
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
    Ok(suggestions)
}

fn suggest(kind: VisualizationKind, confidence: f64, reason: &str) -> VisualizationSuggestion {
    VisualizationSuggestion {
        kind,
        confidence,
        reason: reason.to_string(),
    }
}

fn correlation_suggestions() -> Vec<VisualizationSuggestion> {
    let alt = policy::CORRELATION_ALTERNATIVES;
    vec![
        suggest(
            VisualizationKind::Correlation,
            policy::BASE_PRIMARY,
            "Directly quantifies the strength of the relationship between the referenced fields",
        ),
        suggest(
            VisualizationKind::Bivariate,
            alt[0],
            "Shows how two fields vary together across areas on a single map",
        ),
        suggest(
            VisualizationKind::Multivariate,
            alt[1],
            "Extends the comparison beyond two fields when more are referenced",
        ),
        suggest(
            VisualizationKind::CrossGeography,
            alt[2],
            "Compares the same relationship across different geographic extents",
        ),
    ]
}

fn distribution_suggestions() -> Vec<VisualizationSuggestion> {
    let alt = policy::DISTRIBUTION_ALTERNATIVES;
    vec![
        suggest(
            VisualizationKind::Choropleth,
            policy::BASE_PRIMARY,
            "Shades each area by value, the clearest view of how a field is distributed",
        ),
        suggest(
            VisualizationKind::Heatmap,
            alt[0],
            "Highlights concentration gradients independent of area boundaries",
        ),
        suggest(
            VisualizationKind::Hexbin,
            alt[1],
            "Aggregates values into uniform cells to remove area-size bias",
        ),
        suggest(
            VisualizationKind::Density,
            alt[2],
            "Emphasises where observations cluster most densely",
        ),
        suggest(
            VisualizationKind::Cluster,
            alt[3],
            "Groups nearby observations when individual points are too numerous",
        ),
    ]
}

fn ranking_suggestions() -> Vec<VisualizationSuggestion> {
    vec![
        suggest(
            VisualizationKind::Ranking,
            policy::BASE_PRIMARY,
            "Highlights relative magnitude across areas in rank order",
        ),
        suggest(
            VisualizationKind::Comparison,
            policy::SECONDARY,
            "Places the top and bottom areas side by side for direct contrast",
        ),
    ]
}

fn temporal_suggestions(intent: &QueryIntent) -> Vec<VisualizationSuggestion> {
    // An explicit time range narrows the question, so certainty rises.
    let (primary_confidence, primary_reason) = if intent.time_range.is_some() {
        (
            policy::BOOSTED_PRIMARY,
            "Shows change over the requested time window",
        )
    } else {
        (
            policy::BASE_PRIMARY,
            "Shows how the referenced fields change over time",
        )
    };
    vec![
        suggest(VisualizationKind::Trends, primary_confidence, primary_reason),
        suggest(
            VisualizationKind::TimeSeries,
            policy::SECONDARY,
            "Plots raw values per period for finer-grained inspection",
        ),
    ]
}

fn spatial_suggestions() -> Vec<VisualizationSuggestion> {
    vec![
        suggest(
            VisualizationKind::Choropleth,
            policy::BASE_PRIMARY,
            "Maps the field onto the implied spatial units directly",
        ),
        suggest(
            VisualizationKind::ProportionalSymbol,
            policy::SECONDARY,
            "Sizes a symbol per area, useful when unit sizes vary widely",
        ),
    ]
}

fn composite_suggestions(intent: &QueryIntent) -> Vec<VisualizationSuggestion> {
    // Explicit constraints signal the user already knows what to combine.
    let (primary_confidence, primary_reason) = if intent.filters.is_empty() {
        (
            policy::BASE_PRIMARY,
            "Combines the referenced fields into a single blended index",
        )
    } else {
        (
            policy::BOOSTED_PRIMARY,
            "Combines the referenced fields under the supplied constraints",
        )
    };
    let alt = policy::COMPOSITE_ALTERNATIVES;
    vec![
        suggest(
            VisualizationKind::Composite,
            primary_confidence,
            primary_reason,
        ),
        suggest(
            VisualizationKind::Overlay,
            alt[0],
            "Layers each field separately so their interaction stays visible",
        ),
        suggest(
            VisualizationKind::Aggregation,
            alt[1],
            "Rolls the fields up to coarser units for an overview first",
        ),
    ]
}

fn joint_high_suggestions() -> Vec<VisualizationSuggestion> {
    vec![
        suggest(
            VisualizationKind::JointHigh,
            policy::BASE_PRIMARY,
            "Isolates areas where all referenced fields are simultaneously high",
        ),
        suggest(
            VisualizationKind::Bivariate,
            policy::SECONDARY,
            "Shows the full joint distribution, not only the high-high corner",
        ),
    ]
}

fn difference_suggestions() -> Vec<VisualizationSuggestion> {
    vec![
        suggest(
            VisualizationKind::Difference,
            policy::BASE_PRIMARY,
            "Maps the signed gap between the two referenced fields per area",
        ),
        suggest(
            VisualizationKind::Comparison,
            policy::SECONDARY,
            "Presents both fields side by side instead of their difference",
        ),
    ]
}

fn single_layer_suggestions() -> Vec<VisualizationSuggestion> {
    vec![suggest(
        VisualizationKind::SingleLayer,
        policy::BASE_PRIMARY,
        "Renders the single referenced field as one thematic layer",
    )]
}
