use crate::boundary::{parse_boundary, BoundaryDocument, BoundarySource, BoxFuture};
use crate::error::{MapError, MapResult};
use crate::types::{Catalog, PlaceRecord};
use geo::Point;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One feature, one ring: (0,0) (2,0) (2,2) (0,2) as (lon, lat).
pub fn square_boundary() -> BoundaryDocument {
    boundary_with_ring("[[0,0],[2,0],[2,2],[0,2]]")
}

pub fn boundary_with_ring(ring: &str) -> BoundaryDocument {
    parse_boundary(&format!(
        r#"{{
            "type": "FeatureCollection",
            "features": [{{
                "type": "Feature",
                "properties": {{"name": "Square"}},
                "geometry": {{"type": "Polygon", "coordinates": [{ring}]}}
            }}]
        }}"#
    ))
    .expect("fixture boundary must parse")
}

pub fn place(name: &str, lat: f64, lon: f64, description: &str, is_complete: bool) -> PlaceRecord {
    PlaceRecord {
        name: name.to_string(),
        location: Point::new(lon, lat),
        description: description.to_string(),
        is_complete,
    }
}

pub fn catalog_of(records: Vec<PlaceRecord>) -> Catalog {
    records.into_iter().map(|r| (r.name.clone(), r)).collect()
}

/// Boundary source that replays a fixed list of outcomes and counts calls.
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<MapResult<BoundaryDocument>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(outcomes: Vec<MapResult<BoundaryDocument>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BoundarySource for ScriptedSource {
    fn fetch(&self) -> BoxFuture<'_, MapResult<BoundaryDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MapError::Fetch("no scripted outcome left".to_string())));
        Box::pin(async move { outcome })
    }
}
