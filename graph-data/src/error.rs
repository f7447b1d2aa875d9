use graph_core::AppError;

/// Durable-store error taxonomy. Grounded on `r2e-data::DataError` /
/// `r2e-data-sqlx::SqlxErrorExt`'s `RowNotFound` mapping.
#[derive(Debug)]
pub enum DataError {
    NotFound(String),
    Database(sqlx::Error),
}

impl DataError {
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("record not found".to_string()),
            other => DataError::Database(other),
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "not found: {msg}"),
            DataError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        DataError::from_sqlx(err)
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => AppError::NotFound(msg),
            DataError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = DataError::from_sqlx(sqlx::Error::RowNotFound);
        assert!(matches!(err, DataError::NotFound(_)));
    }
}
