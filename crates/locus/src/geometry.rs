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

use serde::{Deserialize, Serialize};

/// Radius applied when a point must be buffered and the query supplied none.
pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

const BUFFER_SEGMENTS: usize = 64;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Geometry used for search areas. Coordinates are WGS84 degrees,
/// `(lat, lon)` pairs for polygon vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeoShape {
    Point { lat: f64, lon: f64 },
    Polygon { exterior: Vec<(f64, f64)> },
}

impl GeoShape {
    /// Converts this shape to a polygon. A polygon is returned unchanged;
    /// a point becomes a circular buffer of `radius_meters`.
    pub fn to_polygon(&self, radius_meters: f64) -> GeoShape {
        match self {
            GeoShape::Polygon { .. } => self.clone(),
            GeoShape::Point { lat, lon } => {
                let lat_step = radius_meters / METERS_PER_DEGREE_LAT;
                let lon_step = radius_meters / (METERS_PER_DEGREE_LAT * lat.to_radians().cos());
                let mut exterior = Vec::with_capacity(BUFFER_SEGMENTS + 1);
                for i in 0..=BUFFER_SEGMENTS {
                    let theta = (i as f64 / BUFFER_SEGMENTS as f64) * std::f64::consts::TAU;
                    exterior.push((lat + lat_step * theta.sin(), lon + lon_step * theta.cos()));
                }
                GeoShape::Polygon { exterior }
            }
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, GeoShape::Polygon { .. })
    }
}

/// Builds the polygon bounding a spatial query. Polygons pass through
/// unchanged; points are buffered with the given or default radius.
pub fn create_search_area(shape: &GeoShape, radius_meters: Option<f64>) -> GeoShape {
    shape.to_polygon(radius_meters.unwrap_or(DEFAULT_RADIUS_METERS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_input_is_returned_unchanged() {
        let polygon = GeoShape::Polygon {
            exterior: vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)],
        };
        assert_eq!(create_search_area(&polygon, Some(123.0)), polygon);
    }

    #[test]
    fn point_input_becomes_closed_ring() {
        let point = GeoShape::Point {
            lat: 45.5,
            lon: -122.6,
        };
        let GeoShape::Polygon { exterior } = create_search_area(&point, None) else {
            panic!("expected polygon");
        };
        assert_eq!(exterior.len(), BUFFER_SEGMENTS + 1);
        let first = exterior.first().unwrap();
        let last = exterior.last().unwrap();
        assert!((first.0 - last.0).abs() < 1e-9);
        assert!((first.1 - last.1).abs() < 1e-9);
    }

    #[test]
    fn default_radius_is_five_kilometers() {
        let point = GeoShape::Point { lat: 0.0, lon: 0.0 };
        let GeoShape::Polygon { exterior } = create_search_area(&point, None) else {
            panic!("expected polygon");
        };
        // At the equator a 5000 m radius is roughly 0.0449 degrees.
        let max_lat = exterior
            .iter()
            .map(|(lat, _)| lat.abs())
            .fold(0.0_f64, f64::max);
        assert!((max_lat - DEFAULT_RADIUS_METERS / 111_320.0).abs() < 1e-6);
    }
}
