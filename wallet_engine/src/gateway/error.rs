use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("Could not initialize the gateway client. {0}")]
    Initialization(String),
    #[error("Gateway request failed. {0}")]
    RequestError(String),
    #[error("Gateway returned an error response. Status {status}: {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not interpret the gateway response. {0}")]
    JsonError(String),
}
