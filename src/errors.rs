use actix_web::error::{BlockingError, UrlGenerationError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::promo::PromoError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Product not found")]
    ProductNotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Promo(#[from] PromoError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
    #[error(transparent)]
    Url(#[from] UrlGenerationError),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ProductNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Promo(PromoError::UnknownDiscountType(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Promo(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Blocking(_) | ApiError::Url(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = if status.is_server_error() {
            log::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorBody { error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(PromoError::NotFound).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PromoError::MinimumNotMet {
                minimum: BigDecimal::from(500)
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("dup".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::Internal("discount NaN is not representable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_promo_messages_pass_through() {
        assert_eq!(ApiError::from(PromoError::NotFound).to_string(), "Invalid promo code");
        assert_eq!(
            ApiError::from(PromoError::ExpiredOrInactive).to_string(),
            "Promo code is expired or inactive"
        );
    }
}
