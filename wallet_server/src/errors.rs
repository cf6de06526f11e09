use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use gws_common::Money;
use thiserror::Error;
use wallet_engine::{ReconciliationError, WalletApiError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance. The wallet holds {current} but {required} is required.")]
    InsufficientBalance { current: Money, required: Money },
    #[error("The payment gateway could not be reached. {0}")]
    GatewayUnavailable(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // Declined payments carry both amounts so the client can tell the user how short
            // they are.
            Self::InsufficientBalance { current, required } => serde_json::json!({
                "error": self.to_string(),
                "currentBalance": current,
                "requiredAmount": required,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<WalletApiError> for ServerError {
    fn from(e: WalletApiError) -> Self {
        match e {
            WalletApiError::InsufficientBalance { current, required } => {
                Self::InsufficientBalance { current, required }
            },
            WalletApiError::InvalidAmount(s) => Self::InvalidAmount(s),
            WalletApiError::WalletNotFound(_) |
            WalletApiError::TopupNotFound(_) |
            WalletApiError::EntryNotFound(_) => Self::NoRecordFound(e.to_string()),
            WalletApiError::DatabaseError(_) |
            WalletApiError::DuplicateEntry(_) |
            WalletApiError::TopupAlreadyExists(_) |
            WalletApiError::IllegalTopupTransition { .. } => Self::BackendError(e.to_string()),
        }
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::Wallet(e) => e.into(),
            ReconciliationError::Gateway(e) => Self::GatewayUnavailable(e.to_string()),
        }
    }
}
