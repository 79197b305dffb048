use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidtransApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The Midtrans server key has not been configured")]
    MissingServerKey,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Midtrans sent a response without a usable status code. HTTP {http_status}. {body}")]
    InvalidResponse { http_status: u16, body: String },
    #[error("Charge was rejected. Status {status_code}. {message}")]
    ChargeRejected { status_code: String, message: String },
}
