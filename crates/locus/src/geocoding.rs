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

use crate::error::ClassifierError;
use crate::geometry::GeoShape;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Geocoding network error: {0}")]
    Network(String),
    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

/// Best match returned by the geocoding backend: a point location, an
/// extent, or both, optionally with a normalised address string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub point: Option<(f64, f64)>,
    pub extent: Option<BoundingBox>,
    pub normalised_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn to_polygon(&self) -> GeoShape {
        GeoShape::Polygon {
            exterior: vec![
                (self.min_lat, self.min_lon),
                (self.min_lat, self.max_lon),
                (self.max_lat, self.max_lon),
                (self.max_lat, self.min_lon),
                (self.min_lat, self.min_lon),
            ],
        }
    }
}

/// Collaborator seam for the external geocoding backend. One call per
/// resolution, no retry; callers needing resilience wrap it themselves.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeMatch>, GeocodeError>;
}

#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub shape: GeoShape,
    pub address: Option<String>,
}

/// Resolves a location phrase to geometry via the geocoding service.
/// Fails with `LocationNotFound` when the service returns no match or a
/// match with no usable geometry.
pub async fn resolve_location(
    service: &dyn GeocodingService,
    location: &str,
) -> Result<ResolvedLocation, ClassifierError> {
    let Some(found) = service.geocode(location).await? else {
        return Err(ClassifierError::LocationNotFound(location.to_string()));
    };
    debug!(location, address = ?found.normalised_address, "geocode match received");
    let shape = if let Some((lat, lon)) = found.point {
        GeoShape::Point { lat, lon }
    } else if let Some(extent) = found.extent {
        extent.to_polygon()
    } else {
        return Err(ClassifierError::LocationNotFound(location.to_string()));
    };
    Ok(ResolvedLocation {
        shape,
        address: found.normalised_address,
    })
}
