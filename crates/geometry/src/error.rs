use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("convex hull requires at least 3 points, got {got}")]
    DegenerateHull { got: usize },
}

pub type Result<T> = std::result::Result<T, GeometryError>;
