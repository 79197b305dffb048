use actix_web::{
    error::ResponseError,
    http::{
        header::{ContentType, WWW_AUTHENTICATE},
        StatusCode,
    },
    HttpResponse,
};
use log::*;
use resto_engine::{GatewayError, TransactionError, VoucherError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

pub const BASIC_AUTH_REALM: &str = "Basic realm=\"resto\"";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Validation failed")]
    ValidationFailed(Vec<ValidationDetail>),
    #[error("{message}")]
    NotFound { message: String, code: &'static str },
    #[error("{message}")]
    BusinessRuleViolation { message: String, code: &'static str },
    #[error("{message}")]
    UpstreamGatewayError { status_code: String, message: String },
    #[error("Authentication required")]
    Unauthorized,
}

/// A single failed check in a request body or path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl ValidationDetail {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl ServerError {
    pub fn not_found(message: &str, code: &'static str) -> Self {
        Self::NotFound { message: message.to_string(), code }
    }

    pub fn rule_violation(message: &str, code: &'static str) -> Self {
        Self::BusinessRuleViolation { message: message.to_string(), code }
    }

    pub fn invalid_field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::ValidationFailed(vec![ValidationDetail::new(field, message)])
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) | Self::ConfigurationError(_)
        )
    }

    /// The machine-readable code sent in the `error` field of the response envelope.
    fn error_body(&self) -> serde_json::Value {
        match self {
            Self::ValidationFailed(details) => json!({ "code": "VALIDATION_FAILED", "details": details }),
            Self::NotFound { code, .. } | Self::BusinessRuleViolation { code, .. } => json!(code),
            Self::UpstreamGatewayError { .. } => json!("PAYMENT_GATEWAY_ERROR"),
            Self::Unauthorized => json!("UNAUTHORIZED"),
            _ => json!("INTERNAL_SERVER_ERROR"),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BusinessRuleViolation { .. } => StatusCode::BAD_REQUEST,
            Self::UpstreamGatewayError { status_code, .. } => gateway_status(status_code),
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("💻️ Request failed. {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(ContentType::json());
        if matches!(self, Self::Unauthorized) {
            response.insert_header((WWW_AUTHENTICATE, BASIC_AUTH_REALM));
        }
        response.body(json!({ "message": message, "error": self.error_body() }).to_string())
    }
}

/// The gateway's own status code, as long as it is an HTTP error status. Anything else is a bad gateway.
fn gateway_status(code: &str) -> StatusCode {
    code.parse::<u16>()
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<VoucherError> for ServerError {
    fn from(e: VoucherError) -> Self {
        match e {
            VoucherError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            VoucherError::VoucherNotFound(_) => {
                Self::not_found("Invalid voucher code. Please check and try again.", "VOUCHER_NOT_FOUND")
            },
            VoucherError::VoucherIdNotFound(_) => Self::not_found("Voucher not found", "VOUCHER_NOT_FOUND"),
            VoucherError::VoucherAlreadyUsedToday(_) => {
                Self::rule_violation("This employee voucher has been used for today.", "VOUCHER_ALREADY_USED_TODAY")
            },
            VoucherError::VoucherUsageLimitExceeded(_) => {
                Self::rule_violation("This voucher has reached its usage limit.", "VOUCHER_USAGE_LIMIT_EXCEEDED")
            },
            VoucherError::VoucherExpired(_) => {
                Self::rule_violation("This voucher has expired. Please try another one.", "VOUCHER_EXPIRED")
            },
            VoucherError::VoucherAlreadyExists(_) => {
                Self::rule_violation("Voucher already exists", "VOUCHER_ALREADY_EXISTS")
            },
        }
    }
}

impl From<TransactionError> for ServerError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            TransactionError::VoucherError(e) => e.into(),
            TransactionError::TransactionNotFound(_) | TransactionError::TransactionIdNotFound(_) => {
                Self::not_found("Transaction not found", "TRANSACTION_NOT_FOUND")
            },
            TransactionError::DuplicateReference(_) => Self::BackendError(e.to_string()),
            TransactionError::UnsupportedPaymentType(_) => {
                Self::rule_violation("Payment type is not allowed", "PAYMENT_TYPE_NOT_ALLOWED")
            },
            TransactionError::InvalidAmount(_) => Self::BackendError(e.to_string()),
            TransactionError::AmountOutOfRange(reason) => {
                warn!("🧾️ Refusing transaction. {reason}");
                Self::rule_violation("Transaction amount is too large", "AMOUNT_OUT_OF_RANGE")
            },
            TransactionError::GatewayError(e) => e.into(),
        }
    }
}

impl From<GatewayError> for ServerError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::NotConfigured(_) => Self::BackendError(e.to_string()),
            GatewayError::Unavailable(reason) => {
                warn!("💳️ Payment gateway unreachable. {reason}");
                Self::UpstreamGatewayError {
                    status_code: StatusCode::BAD_GATEWAY.as_u16().to_string(),
                    message: "The payment gateway could not be reached".to_string(),
                }
            },
            GatewayError::Rejected { status_code, message } => Self::UpstreamGatewayError { status_code, message },
            GatewayError::InvalidResponse(body) => {
                warn!("💳️ Unusable payment gateway response: {body}");
                Self::rule_violation("Invalid response from the payment gateway", "INVALID_GATEWAY_RESPONSE")
            },
        }
    }
}
