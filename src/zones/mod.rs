//! Service-zone snapshots loaded from the settings store
//!
//! Each zone polygon is persisted as a JSON-serialized vertex array under a
//! fixed settings key. A [`ZoneSet`] is a by-value snapshot of those entries:
//! it is built right before evaluation and never observes later edits.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::domain::{LatLng, ZoneKind, ZonePolygon};
use crate::error::{GeofenceError, Result};
use crate::evaluator::{GraceMargin, Membership, classify};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSet {
    zones: BTreeMap<ZoneKind, ZonePolygon>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, kind: ZoneKind, polygon: ZonePolygon) -> Self {
        self.insert(kind, polygon);
        self
    }

    pub fn insert(&mut self, kind: ZoneKind, polygon: ZonePolygon) {
        self.zones.insert(kind, polygon);
    }

    /// Build from raw key/value settings, where zone values are JSON strings.
    ///
    /// Unrelated keys are ignored. Missing zone keys leave that zone unset.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        let mut set = Self::new();
        for kind in ZoneKind::ALL {
            let key = kind.settings_key();
            let Some(raw) = settings.get(key) else {
                tracing::debug!(zone = %kind, key, "zone not present in settings");
                continue;
            };
            set.insert(kind, parse_polygon(key, raw)?);
        }
        Ok(set)
    }

    /// Build from a settings document.
    ///
    /// Zone values may be either a JSON-encoded string (as stored by the
    /// settings table) or an inline vertex array.
    pub fn from_settings_json(json: &str) -> Result<Self> {
        let doc: HashMap<String, Value> =
            serde_json::from_str(json).map_err(|e| GeofenceError::InvalidZone {
                key: "<settings>".to_string(),
                reason: e.to_string(),
            })?;

        let mut set = Self::new();
        for kind in ZoneKind::ALL {
            let key = kind.settings_key();
            let polygon = match doc.get(key) {
                None | Some(Value::Null) => continue,
                Some(Value::String(raw)) => parse_polygon(key, raw)?,
                Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                    GeofenceError::InvalidZone {
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                })?,
            };
            set.insert(kind, polygon);
        }
        Ok(set)
    }

    /// Read a settings document from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read settings file: {:?}", path))?;
        let set = Self::from_settings_json(&contents)
            .context(format!("Failed to parse settings file: {:?}", path))?;
        tracing::info!(path = %path.display(), zones = set.len(), "loaded zone settings");
        Ok(set)
    }

    pub fn zone(&self, kind: ZoneKind) -> Option<&ZonePolygon> {
        self.zones.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneKind, &ZonePolygon)> {
        self.zones.iter().map(|(k, p)| (*k, p))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Validate `point` and classify it against one zone
    pub fn check(&self, kind: ZoneKind, point: LatLng, margin: GraceMargin) -> Result<Membership> {
        let point = point.validate()?;
        let polygon = self
            .zone(kind)
            .ok_or(GeofenceError::ZoneNotConfigured(kind))?;
        let membership = classify(point, polygon, margin);
        tracing::debug!(zone = %kind, lat = point.lat, lng = point.lng, ?membership, "zone check");
        Ok(membership)
    }

    /// Every configured zone that serves `point`
    pub fn served_by(&self, point: LatLng, margin: GraceMargin) -> Result<Vec<ZoneKind>> {
        let point = point.validate()?;
        Ok(self
            .iter()
            .filter(|(_, polygon)| classify(point, polygon, margin).is_served())
            .map(|(kind, _)| kind)
            .collect())
    }

    /// Serialize back to the settings representation (JSON strings per key)
    pub fn to_settings(&self) -> Result<HashMap<String, String>> {
        self.iter()
            .map(|(kind, polygon)| {
                let raw = serialize_polygon(polygon).map_err(|e| GeofenceError::InvalidZone {
                    key: kind.settings_key().to_string(),
                    reason: e.to_string(),
                })?;
                Ok((kind.settings_key().to_string(), raw))
            })
            .collect()
    }
}

fn parse_polygon(key: &str, raw: &str) -> Result<ZonePolygon> {
    let polygon: ZonePolygon =
        serde_json::from_str(raw).map_err(|e| GeofenceError::InvalidZone {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    if !polygon.is_valid() {
        tracing::warn!(
            key,
            vertices = polygon.len(),
            "zone has fewer than 3 vertices and will match nothing"
        );
    }

    Ok(polygon)
}

/// JSON array of `{lat, lng}` objects, as written to the settings store
pub fn serialize_polygon(polygon: &ZonePolygon) -> serde_json::Result<String> {
    serde_json::to_string(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"[{"lat":4.68,"lng":-74.07},{"lat":4.68,"lng":-74.02},{"lat":4.76,"lng":-74.02},{"lat":4.76,"lng":-74.07}]"#;

    fn settings() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("delivery_zone_b2c".to_string(), HOME.to_string());
        m.insert("company_name".to_string(), "Acme".to_string());
        m
    }

    #[test]
    fn test_from_settings_reads_known_keys() {
        let set = ZoneSet::from_settings(&settings()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.zone(ZoneKind::Home).unwrap().len(), 4);
        assert!(set.zone(ZoneKind::Institutional).is_none());
    }

    #[test]
    fn test_from_settings_rejects_malformed_json() {
        let mut m = HashMap::new();
        m.insert("delivery_zone_b2b".to_string(), "[{\"lat\":1".to_string());
        let err = ZoneSet::from_settings(&m).unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidZone { ref key, .. } if key == "delivery_zone_b2b"));
    }

    #[test]
    fn test_from_settings_json_accepts_string_or_array() {
        let doc = format!(
            r#"{{"delivery_zone_b2c": {:?}, "delivery_zone_b2b": [{{"lat":4.55,"lng":-74.2}},{{"lat":4.55,"lng":-74.12}},{{"lat":4.62,"lng":-74.12}}], "other": 1}}"#,
            HOME
        );
        let set = ZoneSet::from_settings_json(&doc).unwrap();
        assert_eq!(set.zone(ZoneKind::Home).unwrap().len(), 4);
        assert_eq!(set.zone(ZoneKind::Institutional).unwrap().len(), 3);
    }

    #[test]
    fn test_check_validates_point_and_zone() {
        let set = ZoneSet::from_settings(&settings()).unwrap();
        let margin = GraceMargin::default();

        assert_eq!(
            set.check(ZoneKind::Home, LatLng::new(4.72, -74.05), margin),
            Ok(Membership::Inside)
        );
        assert!(matches!(
            set.check(ZoneKind::Home, LatLng::new(f64::NAN, -74.05), margin),
            Err(GeofenceError::NonFiniteCoordinate { .. })
        ));
        assert_eq!(
            set.check(ZoneKind::Institutional, LatLng::new(4.72, -74.05), margin),
            Err(GeofenceError::ZoneNotConfigured(ZoneKind::Institutional))
        );
    }

    #[test]
    fn test_settings_round_trip_preserves_vertices() {
        let set = ZoneSet::from_settings(&settings()).unwrap();
        let again = ZoneSet::from_settings(&set.to_settings().unwrap()).unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, format!(r#"{{"delivery_zone_b2c": {:?}}}"#, HOME)).unwrap();

        let set = ZoneSet::load(&path).unwrap();
        assert!(set.zone(ZoneKind::Home).is_some());
        assert!(ZoneSet::load(&dir.path().join("missing.json")).is_err());
    }
}
