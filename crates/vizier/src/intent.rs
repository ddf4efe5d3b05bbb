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
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of analytical intent categories the mapper understands.
/// Anything outside this set must surface as an error, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Correlation,
    Distribution,
    Ranking,
    Temporal,
    Spatial,
    Composite,
    JointHigh,
    Difference,
    SingleLayer,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Correlation => "correlation",
            IntentKind::Distribution => "distribution",
            IntentKind::Ranking => "ranking",
            IntentKind::Temporal => "temporal",
            IntentKind::Spatial => "spatial",
            IntentKind::Composite => "composite",
            IntentKind::JointHigh => "joint_high",
            IntentKind::Difference => "difference",
            IntentKind::SingleLayer => "single_layer",
        }
    }
}

impl FromStr for IntentKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correlation" => Ok(IntentKind::Correlation),
            "distribution" => Ok(IntentKind::Distribution),
            "ranking" => Ok(IntentKind::Ranking),
            "temporal" => Ok(IntentKind::Temporal),
            "spatial" => Ok(IntentKind::Spatial),
            "composite" => Ok(IntentKind::Composite),
            "joint_high" => Ok(IntentKind::JointHigh),
            "difference" => Ok(IntentKind::Difference),
            "single_layer" => Ok(IntentKind::SingleLayer),
            other => Err(MapperError::UnsupportedIntentType(other.to_string())),
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spatial unit implied by the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    #[default]
    Polygon,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldConstraint {
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    Equals(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Structured representation of what a free-text analytical question is
/// asking for. Immutable, created per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryIntent {
    pub kind: IntentKind,
    pub fields: Vec<String>,
    #[serde(default)]
    pub geometry: GeometryKind,
    #[serde(default)]
    pub filters: HashMap<String, FieldConstraint>,
    #[serde(default)]
    pub time_range: Option<TimeRange>,
}

impl QueryIntent {
    pub fn new(kind: IntentKind, fields: Vec<String>) -> Self {
        Self {
            kind,
            fields,
            geometry: GeometryKind::default(),
            filters: HashMap::new(),
            time_range: None,
        }
    }
}

/// Renderable analysis strategies the mapper can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationKind {
    Correlation,
    Bivariate,
    Multivariate,
    CrossGeography,
    Choropleth,
    Heatmap,
    Hexbin,
    Density,
    Cluster,
    Trends,
    TimeSeries,
    Composite,
    Overlay,
    Aggregation,
    Ranking,
    Comparison,
    JointHigh,
    Difference,
    ProportionalSymbol,
    SingleLayer,
}

/// A ranked, scored recommendation. Index 0 of a suggestion list is the
/// primary recommendation; the remainder are alternatives in non-increasing
/// confidence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationSuggestion {
    #[serde(rename = "type")]
    pub kind: VisualizationKind,
    pub confidence: f64,
    pub reason: String,
}
