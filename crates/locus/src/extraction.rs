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

//! Location-phrase and search-radius extraction shared by the local
//! classifier. Operates on already-lowercased text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Locative prefixes checked in fixed priority order.
const LOCATIVE_PREFIXES: [&str; 6] = ["near", "around", "in", "at", "close to", "within"];

const MILE_TO_METERS: f64 = 1609.34;
const KM_TO_METERS: f64 = 1000.0;

static PREFIX_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    LOCATIVE_PREFIXES
        .iter()
        .map(|prefix| {
            let pattern = format!(r"\b{}\s+", regex::escape(prefix));
            (*prefix, Regex::new(&pattern).expect("valid prefix pattern"))
        })
        .collect()
});

static RADIUS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"within\s+(\d+)\s*(miles?|kilometers?|km|meters?)\b").expect("valid radius pattern")
});

// Distinguishes "within 5 miles" (a radius) from "within downtown" (a place).
static BARE_RADIUS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*(miles?|kilometers?|km|meters?)\b").expect("valid pattern"));

/// Extracts a location phrase: the text after the first matching locative
/// prefix, up to the next ` within ` clause or end of string.
pub fn extract_location(normalised: &str) -> Option<String> {
    for (prefix, pattern) in PREFIX_PATTERNS.iter() {
        let Some(found) = pattern.find(normalised) else {
            continue;
        };
        let rest = &normalised[found.end()..];
        if *prefix == "within" && BARE_RADIUS_PATTERN.is_match(rest) {
            continue;
        }
        let phrase = match rest.find(" within ") {
            Some(idx) => &rest[..idx],
            None => rest,
        };
        let phrase = phrase.trim().trim_end_matches(['?', '.', ',', '!']);
        if phrase.is_empty() {
            continue;
        }
        debug!(prefix, phrase, "location phrase extracted");
        return Some(phrase.to_string());
    }
    None
}

/// Extracts a `within <n> <unit>` radius and converts it to meters.
pub fn extract_radius_meters(normalised: &str) -> Option<f64> {
    let captures = RADIUS_PATTERN.captures(normalised)?;
    let value: f64 = captures[1].parse().ok()?;
    let unit = &captures[2];
    let meters = value * unit_factor(unit);
    debug!(value, unit, meters, "radius extracted");
    Some(meters)
}

fn unit_factor(unit: &str) -> f64 {
    if unit.starts_with("mile") {
        MILE_TO_METERS
    } else if unit == "km" || unit.starts_with("kilometer") {
        KM_TO_METERS
    } else if unit.starts_with("meter") {
        1.0
    } else {
        // Unrecognised unit passes the value through unscaled.
        1.0
    }
}
