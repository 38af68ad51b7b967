use crate::boundary::BoundaryDocument;
use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::types::{Catalog, Completeness, LatLon};
use geo::{Coord, LineString};
use geojson::Value;
use serde::Serialize;
use tracing::debug;

const MARKER_ICON: &str = "info-sign";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
}

pub const BOUNDARY_STYLE: BoundaryStyle = BoundaryStyle {
    fill_color: "lightorange",
    color: "lightorange",
    weight: 0.5,
};

#[derive(Debug, Clone, Serialize)]
pub struct BoundaryLayer<'a> {
    pub document: &'a BoundaryDocument,
    pub style: BoundaryStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub text: String,
    pub max_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: LatLon,
    pub tooltip: String,
    pub popup: Popup,
    pub completeness: Completeness,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Everything needed to draw one page view. Rebuilt per request.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedMap<'a> {
    pub center: LatLon,
    pub zoom: f64,
    pub boundary: BoundaryLayer<'a>,
    pub markers: Vec<Marker>,
}

/// Unweighted mean of the first ring of the first polygon feature.
pub fn boundary_centroid(document: &BoundaryDocument) -> MapResult<LatLon> {
    let ring = outer_ring(document)?;
    ring_centroid(&ring)
}

/// Plain vertex average. Every listed vertex counts, including a closing
/// vertex that repeats the first one.
pub fn ring_centroid(ring: &LineString<f64>) -> MapResult<LatLon> {
    let count = ring.0.len();
    if count == 0 {
        return Err(MapError::Geometry("boundary ring has no vertices".to_string()));
    }
    let (sum_lon, sum_lat) = ring
        .coords()
        .fold((0.0, 0.0), |(lon, lat), c| (lon + c.x, lat + c.y));
    Ok(LatLon {
        lat: sum_lat / count as f64,
        lon: sum_lon / count as f64,
    })
}

fn outer_ring(document: &BoundaryDocument) -> MapResult<LineString<f64>> {
    let feature = document
        .features
        .first()
        .ok_or_else(|| MapError::Geometry("boundary has no features".to_string()))?;
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| MapError::Geometry("first boundary feature has no geometry".to_string()))?;

    let rings = match &geometry.value {
        Value::Polygon(rings) => rings,
        Value::MultiPolygon(polygons) => polygons
            .first()
            .ok_or_else(|| MapError::Geometry("multipolygon has no polygons".to_string()))?,
        _ => {
            return Err(MapError::Geometry(
                "first boundary feature is not a polygon".to_string(),
            ))
        }
    };
    let ring = rings
        .first()
        .ok_or_else(|| MapError::Geometry("polygon has no rings".to_string()))?;

    // GeoJSON positions are [lon, lat, ...]
    let coords = ring
        .iter()
        .enumerate()
        .map(|(i, position)| match position.as_slice() {
            [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
            _ => Err(MapError::Geometry(format!(
                "vertex {} has fewer than two ordinates",
                i
            ))),
        })
        .collect::<MapResult<Vec<_>>>()?;

    Ok(LineString::new(coords))
}

pub fn compose_map<'a>(
    catalog: &Catalog,
    boundary: &'a BoundaryDocument,
    settings: &MapConfig,
) -> MapResult<ComposedMap<'a>> {
    let center = boundary_centroid(boundary)?;
    debug!(lat = center.lat, lon = center.lon, "boundary centroid");
    Ok(compose_map_at(catalog, boundary, center, settings))
}

/// Same as [`compose_map`] with the center already known.
pub fn compose_map_at<'a>(
    catalog: &Catalog,
    boundary: &'a BoundaryDocument,
    center: LatLon,
    settings: &MapConfig,
) -> ComposedMap<'a> {
    let markers = catalog
        .values()
        .map(|record| {
            let completeness = record.completeness();
            Marker {
                location: record.location.into(),
                tooltip: record.name.clone(),
                popup: Popup {
                    text: record.description.clone(),
                    max_width: settings.popup_max_width,
                },
                completeness,
                color: completeness.marker_color(),
                icon: MARKER_ICON,
            }
        })
        .collect();

    ComposedMap {
        center,
        zoom: settings.zoom,
        boundary: BoundaryLayer {
            document: boundary,
            style: BOUNDARY_STYLE,
        },
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{boundary_with_ring, catalog_of, place, square_boundary};
    use crate::types::Catalog;

    #[test]
    fn square_centroid_is_vertex_mean() {
        let center = boundary_centroid(&square_boundary()).unwrap();
        assert_eq!(center, LatLon { lat: 1.0, lon: 1.0 });
    }

    #[test]
    fn latitude_and_longitude_are_averaged_independently() {
        let center = boundary_centroid(&boundary_with_ring("[[-0.5,51.0],[0.1,52.0],[-0.2,51.6]]")).unwrap();
        assert!((center.lon - (-0.2)).abs() < 1e-12);
        assert!((center.lat - 51.533333333333333).abs() < 1e-12);
    }

    #[test]
    fn closing_vertex_is_counted() {
        let center = boundary_centroid(&boundary_with_ring("[[0,0],[3,0],[3,3],[0,0]]")).unwrap();
        assert_eq!(center, LatLon { lat: 0.75, lon: 1.5 });
    }

    #[test]
    fn empty_ring_is_a_geometry_error() {
        let err = boundary_centroid(&boundary_with_ring("[]")).unwrap_err();
        assert!(matches!(err, MapError::Geometry(_)));
    }

    #[test]
    fn no_features_is_a_geometry_error() {
        let empty = crate::boundary::parse_boundary(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(matches!(boundary_centroid(&empty), Err(MapError::Geometry(_))));
    }

    #[test]
    fn point_feature_is_a_geometry_error() {
        let doc = crate::boundary::parse_boundary(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(boundary_centroid(&doc), Err(MapError::Geometry(_))));
    }

    #[test]
    fn multipolygon_uses_first_outer_ring() {
        let doc = crate::boundary::parse_boundary(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[
                    [[[0,0],[4,0],[4,4],[0,4]]],
                    [[[10,10],[11,10],[11,11]]]
                ]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(boundary_centroid(&doc).unwrap(), LatLon { lat: 2.0, lon: 2.0 });
    }

    #[test]
    fn one_complete_place_gives_one_green_marker() {
        let boundary = square_boundary();
        let catalog = catalog_of(vec![place("Centre A", 51.5, -0.1, "desc", true)]);

        let map = compose_map(&catalog, &boundary, &MapConfig::default()).unwrap();

        assert_eq!(map.center, LatLon { lat: 1.0, lon: 1.0 });
        assert_eq!(map.zoom, 10.5);
        assert_eq!(map.boundary.document.features.len(), 1);
        assert_eq!(map.boundary.style, BOUNDARY_STYLE);
        assert_eq!(map.markers.len(), 1);

        let marker = &map.markers[0];
        assert_eq!(marker.location, LatLon { lat: 51.5, lon: -0.1 });
        assert_eq!(marker.completeness, Completeness::Complete);
        assert_eq!(marker.color, "green");
        assert_eq!(marker.tooltip, "Centre A");
        assert_eq!(marker.popup, Popup { text: "desc".to_string(), max_width: 300 });
    }

    #[test]
    fn incomplete_place_is_gray() {
        let boundary = square_boundary();
        let catalog = catalog_of(vec![
            place("Done", 51.5, -0.1, "desc", true),
            place("Pending", 51.4, -0.2, "", false),
        ]);

        let map = compose_map(&catalog, &boundary, &MapConfig::default()).unwrap();
        let colors: Vec<_> = map.markers.iter().map(|m| (m.tooltip.as_str(), m.color)).collect();

        assert_eq!(colors, vec![("Done", "green"), ("Pending", "gray")]);
    }

    #[test]
    fn empty_catalog_is_a_boundary_only_map() {
        let boundary = square_boundary();
        let map = compose_map(&Catalog::new(), &boundary, &MapConfig::default()).unwrap();
        assert!(map.markers.is_empty());
        assert_eq!(map.boundary.document.features.len(), 1);
    }

    #[test]
    fn precomputed_center_is_used_as_is() {
        let boundary = square_boundary();
        let center = LatLon { lat: 51.5, lon: -0.12 };
        let map = compose_map_at(&Catalog::new(), &boundary, center, &MapConfig::default());
        assert_eq!(map.center, center);
    }

    #[test]
    fn degenerate_boundary_fails_composition() {
        let boundary = boundary_with_ring("[]");
        let catalog = catalog_of(vec![place("Centre A", 51.5, -0.1, "desc", true)]);
        assert!(matches!(
            compose_map(&catalog, &boundary, &MapConfig::default()),
            Err(MapError::Geometry(_))
        ));
    }
}
