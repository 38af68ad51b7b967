use crate::error::{MapError, MapResult};
use crate::types::{Catalog, PlaceRecord};
use csv::{ReaderBuilder, StringRecord};
use geo::Point;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PLACE: &str = "Place";
const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const INFO: &str = "Info";

/// Anything that can produce the place catalog.
pub trait RecordSource {
    fn load(&self) -> MapResult<Catalog>;
}

/// Catalog backed by a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvRecordSource {
    fn load(&self) -> MapResult<Catalog> {
        load_places(&self.path)
    }
}

pub fn load_places(path: &Path) -> MapResult<Catalog> {
    info!(path = ?path, "loading places");
    let file = File::open(path).map_err(|e| {
        MapError::Configuration(format!("failed to open places file {:?}: {}", path, e))
    })?;
    let catalog = load_places_from_reader(file)?;
    info!(count = catalog.len(), "loaded places");
    Ok(catalog)
}

struct Columns {
    place: usize,
    latitude: usize,
    longitude: usize,
    info: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> MapResult<Self> {
        let find = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                MapError::Configuration(format!("column '{}' not found in places file", name))
            })
        };
        Ok(Columns {
            place: find(PLACE)?,
            latitude: find(LATITUDE)?,
            longitude: find(LONGITUDE)?,
            info: find(INFO)?,
        })
    }
}

/// Parses the whole input before returning; a bad row means no catalog at all.
pub fn load_places_from_reader<R: Read>(reader: R) -> MapResult<Catalog> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| MapError::Configuration(format!("failed to read places header: {}", e)))?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut catalog = Catalog::new();

    for (index, result) in rdr.records().enumerate() {
        let row = index + 1;
        let record = result
            .map_err(|e| MapError::Configuration(format!("malformed places row {}: {}", row, e)))?;

        let place = record.get(columns.place).unwrap_or("");
        let latitude = record.get(columns.latitude).unwrap_or("");
        let longitude = record.get(columns.longitude).unwrap_or("");
        let info = record.get(columns.info).unwrap_or("");

        let lat = parse_coordinate(row, LATITUDE, latitude)?;
        let lon = parse_coordinate(row, LONGITUDE, longitude)?;

        let is_complete = [place, latitude, longitude, info]
            .iter()
            .all(|field| !field.is_empty());

        let previous = catalog.insert(
            place.to_string(),
            PlaceRecord {
                name: place.to_string(),
                location: Point::new(lon, lat),
                description: info.to_string(),
                is_complete,
            },
        );
        if previous.is_some() {
            warn!(place, row, "duplicate place name, keeping the later row");
        }
    }

    Ok(catalog)
}

fn parse_coordinate(row: usize, column: &'static str, value: &str) -> MapResult<f64> {
    let error = || MapError::Parse {
        row,
        column,
        value: value.to_string(),
    };
    // f64 parsing accepts NaN and inf, which Leaflet cannot place
    let parsed = value.trim().parse::<f64>().map_err(|_| error())?;
    if !parsed.is_finite() {
        return Err(error());
    }
    Ok(parsed)
}
