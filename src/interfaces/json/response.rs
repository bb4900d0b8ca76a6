use crate::domain::points::Points;
use crate::domain::receipt::ReceiptId;
use crate::error::ReceiptError;
use serde::Serialize;

/// Body returned after a receipt is stored.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IdResponse {
    pub id: String,
}

impl From<ReceiptId> for IdResponse {
    fn from(id: ReceiptId) -> Self {
        Self { id: id.to_string() }
    }
}

/// Body returned by a points lookup.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PointsResponse {
    pub points: Points,
}

impl From<Points> for PointsResponse {
    fn from(points: Points) -> Self {
        Self { points }
    }
}

/// Body returned for a failed request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl From<&ReceiptError> for ErrorResponse {
    fn from(err: &ReceiptError) -> Self {
        let error = match err {
            // storage details stay in the logs
            ReceiptError::PersistenceFailed(_) | ReceiptError::ComputationFailed(_) => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        Self {
            status: err.status_code(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let id = ReceiptId::generate();
        let body = serde_json::to_value(IdResponse::from(id)).unwrap();
        assert_eq!(body, serde_json::json!({ "id": id.to_string() }));

        let body = serde_json::to_value(PointsResponse::from(28)).unwrap();
        assert_eq!(body, serde_json::json!({ "points": 28 }));
    }

    #[test]
    fn test_error_response_hides_storage_details() {
        let err = ReceiptError::persistence("RocksDB error: IO error: disk full");
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, 500);
        assert_eq!(body.error, "Internal Server Error");

        let err = ReceiptError::NotFound("abc".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, 404);
        assert!(body.error.contains("abc"));
    }
}
