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

//! Confidence scoring policy for the recommendation mapper.
//!
//! Every confidence constant the mapper emits lives here so the scoring
//! rules stay auditable in one place. Confidences order suggestions; they
//! are not calibrated probabilities.

/// Base confidence for the primary suggestion of any intent kind.
pub const BASE_PRIMARY: f64 = 0.75;

/// Primary confidence when the intent carries extra specificity: a time
/// range for temporal intents, non-empty filters for composite intents.
pub const BOOSTED_PRIMARY: f64 = 0.85;

/// Alternative ladder for `correlation`: bivariate, multivariate,
/// cross-geography.
pub const CORRELATION_ALTERNATIVES: [f64; 3] = [0.65, 0.60, 0.55];

/// Alternative ladder for `distribution`: heatmap, hexbin, density, cluster.
pub const DISTRIBUTION_ALTERNATIVES: [f64; 4] = [0.70, 0.65, 0.60, 0.55];

/// Alternative ladder for `composite`: overlay, aggregation.
pub const COMPOSITE_ALTERNATIVES: [f64; 2] = [0.70, 0.60];

/// Single-alternative confidence for the two-entry intent kinds
/// (temporal, ranking, spatial, joint_high, difference).
pub const SECONDARY: f64 = 0.65;
