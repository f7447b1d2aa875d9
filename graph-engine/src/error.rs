use graph_core::AppError;
use graph_data::DataError;

/// Domain-logic error taxonomy. Thin wrapper over [`graph_data::DataError`]
/// plus the request-shape failures the engine itself detects (missing
/// required edge endpoints, unknown snapshot version). Grounded on
/// `r2e-core::error::AppError`'s flat-enum-with-`From`-impls idiom.
#[derive(Debug)]
pub enum EngineError {
    NotFound(String),
    BadRequest(String),
    Data(DataError),
}

impl From<DataError> for EngineError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => EngineError::NotFound(msg),
            other => EngineError::Data(other),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(msg) => AppError::NotFound(msg),
            EngineError::BadRequest(msg) => AppError::BadRequest(msg),
            EngineError::Data(e) => AppError::from(e),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(msg) => write!(f, "not found: {msg}"),
            EngineError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            EngineError::Data(e) => write!(f, "data error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
