use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::LatLng;

/// Service-area category a polygon describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// B2C home delivery zone
    Home,
    /// B2B institutional delivery zone
    Institutional,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 2] = [ZoneKind::Home, ZoneKind::Institutional];

    /// Key under which the serialized polygon lives in the settings store
    pub fn settings_key(self) -> &'static str {
        match self {
            ZoneKind::Home => "delivery_zone_b2c",
            ZoneKind::Institutional => "delivery_zone_b2b",
        }
    }

    pub fn from_settings_key(key: &str) -> Option<ZoneKind> {
        Self::ALL.into_iter().find(|k| k.settings_key() == key)
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ZoneKind::Home => "home",
            ZoneKind::Institutional => "institutional",
        })
    }
}

impl FromStr for ZoneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" | "b2c" => Ok(ZoneKind::Home),
            "institutional" | "b2b" => Ok(ZoneKind::Institutional),
            other => Err(format!(
                "unknown zone '{}': expected home (b2c) or institutional (b2b)",
                other
            )),
        }
    }
}

/// Axis-aligned extent of a polygon, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// A service-area polygon: an implicitly closed loop of vertices.
///
/// The first vertex is not repeated at the end. Fewer than three vertices
/// describe no region at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZonePolygon {
    pub vertices: Vec<LatLng>,
}

impl ZonePolygon {
    pub fn new(vertices: Vec<LatLng>) -> Self {
        Self { vertices }
    }

    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Same loop traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        Self::new(self.vertices.iter().rev().copied().collect())
    }

    /// Bounding rectangle, `None` for an empty polygon
    pub fn bounds(&self) -> Option<ZoneBounds> {
        let line: geo::LineString<f64> = self.vertices.iter().map(|&p| geo::Coord::from(p)).collect();
        line.bounding_rect().map(|rect| ZoneBounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }

    /// Convert to a `geo` polygon (x = longitude, y = latitude)
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: geo::LineString<f64> =
            self.vertices.iter().map(|&p| geo::Coord::from(p)).collect();
        // geo closes the ring itself
        geo::Polygon::new(exterior, Vec::new())
    }
}

impl From<Vec<(f64, f64)>> for ZonePolygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(LatLng::from).collect())
    }
}
