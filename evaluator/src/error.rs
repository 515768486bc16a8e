use std::{error::Error, fmt, io};

use ml_core::{DataError, MlError};

/// The evaluator's result type.
pub type Result<T> = std::result::Result<T, EvalErr>;

/// Failures while loading inputs or running an evaluation.
#[derive(Debug)]
pub enum EvalErr {
    Io(io::Error),
    Json(serde_json::Error),
    Data(DataError),
    Ml(MlError),
    InvalidConfig { var: &'static str, value: String },
}

impl fmt::Display for EvalErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErr::Io(e) => write!(f, "io error: {e}"),
            EvalErr::Json(e) => write!(f, "malformed input: {e}"),
            EvalErr::Data(e) => write!(f, "dataset error: {e}"),
            EvalErr::Ml(e) => write!(f, "metric error: {e}"),
            EvalErr::InvalidConfig { var, value } => {
                write!(f, "invalid value for {var}: {value:?}")
            }
        }
    }
}

impl Error for EvalErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalErr::Io(e) => Some(e),
            EvalErr::Json(e) => Some(e),
            EvalErr::Data(e) => Some(e),
            EvalErr::Ml(e) => Some(e),
            EvalErr::InvalidConfig { .. } => None,
        }
    }
}

impl From<io::Error> for EvalErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for EvalErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DataError> for EvalErr {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

impl From<MlError> for EvalErr {
    fn from(value: MlError) -> Self {
        Self::Ml(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<EvalErr> for io::Error {
    fn from(value: EvalErr) -> Self {
        match value {
            EvalErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
