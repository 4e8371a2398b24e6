// core/src/error.rs
use thiserror::Error;

/// Alle feil biblioteket kan returnere. Feil er lokale for ett kall:
/// enten får man en komplett `RideSummary`, eller en av disse.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RideSimError {
    /// For få fixes, eller ikke-finitt lat/lon/høyde.
    #[error("malformed track: {0}")]
    MalformedTrack(String),

    /// Ugyldig rytter-/sykkelparameter eller ukjent strategi.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Segmentet konvergerer ikke innen maks antall delsteg.
    /// Negative radikander klampes og telles, de havner aldri her.
    #[error("numeric domain error in segment {segment}: {detail}")]
    NumericDomain { segment: usize, detail: String },

    #[error("GPX parse error: {0}")]
    Gpx(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, RideSimError>;

impl From<gpx::errors::GpxError> for RideSimError {
    fn from(e: gpx::errors::GpxError) -> Self {
        RideSimError::Gpx(e.to_string())
    }
}
