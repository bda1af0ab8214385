use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("grid {width}x{height} is too small: both dimensions must be at least {min}")]
    GridTooSmall { width: u32, height: u32, min: u32 },

    #[error("seed spacing {spacing} on the {axis} axis must lie in 1..={max}")]
    InvalidSeedSpacing {
        axis: &'static str,
        spacing: u32,
        max: u32,
    },

    #[error("frame is {frame_width}x{frame_height} but the tracker was built for {width}x{height}")]
    FrameSizeMismatch {
        frame_width: u32,
        frame_height: u32,
        width: u32,
        height: u32,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackingError>;
