use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Geometry mismatch: no sector covers angle {angle}")]
    GeometryMismatch { angle: f64 },

    #[error("Spin {spin_id} still moving after {ticks} ticks")]
    SpinStalled { spin_id: u64, ticks: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WheelError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }
}

pub type WheelResult<T> = Result<T, WheelError>;
