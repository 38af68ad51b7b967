use thiserror::Error;

/// Everything that can abort a page render.
#[derive(Debug, Error)]
pub enum MapError {
    /// Missing or malformed local input (file, header, CSV structure).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A coordinate cell that is not a number. `row` is the 1-based data row.
    #[error("parse error: row {row}, column '{column}': {value:?} is not a number")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Network or remote-data failure while fetching the boundary.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Boundary geometry that has no usable vertices.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Page template failure. Templates are compiled in, so this is a bug.
    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),
}

pub type MapResult<T> = Result<T, MapError>;
