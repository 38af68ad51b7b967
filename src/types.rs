use geo::Point;
use serde::Serialize;
use std::collections::BTreeMap;

/// Latitude/longitude pair in the order Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<Point<f64>> for LatLon {
    fn from(point: Point<f64>) -> Self {
        // geo stores x = longitude, y = latitude
        LatLon {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Completeness {
    Complete,
    Incomplete,
}

impl Completeness {
    pub fn from_flag(is_complete: bool) -> Self {
        if is_complete {
            Completeness::Complete
        } else {
            Completeness::Incomplete
        }
    }

    /// Marker color understood by Leaflet.awesome-markers.
    pub fn marker_color(self) -> &'static str {
        match self {
            Completeness::Complete => "green",
            Completeness::Incomplete => "gray",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub location: Point<f64>,
    pub description: String,
    pub is_complete: bool,
}

impl PlaceRecord {
    pub fn completeness(&self) -> Completeness {
        Completeness::from_flag(self.is_complete)
    }
}

/// Place name -> record. Ordered so that rendered pages are stable.
pub type Catalog = BTreeMap<String, PlaceRecord>;
