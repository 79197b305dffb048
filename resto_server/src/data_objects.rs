use actix_web::HttpResponse;
use resto_engine::{
    db_types::NewVoucher,
    payment_objects::ChargeTransactionRequest,
    transaction_objects::TransactionRequest,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ServerError, ValidationDetail};

/// The envelope every successful response is wrapped in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new<S: Into<String>>(message: S, data: T) -> Self {
        Self { message: message.into(), data }
    }

    pub fn ok<S: Into<String>>(message: S, data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(message, data))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoucherSearchParams {
    pub search: Option<String>,
}

/// Request body checks that go beyond what deserialization already guarantees.
pub trait Validate {
    fn validation_errors(&self) -> Vec<ValidationDetail>;

    fn validate(&self) -> Result<(), ServerError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServerError::ValidationFailed(errors))
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl Validate for TransactionRequest {
    fn validation_errors(&self) -> Vec<ValidationDetail> {
        let mut errors = Vec::new();
        if is_blank(&self.payment_method.to_string()) {
            errors.push(ValidationDetail::new("paymentMethod", "Payment method is required"));
        }
        if is_blank(&self.customer_name) {
            errors.push(ValidationDetail::new("customerName", "Customer name is required"));
        }
        if self.cart.is_empty() {
            errors.push(ValidationDetail::new("cart", "Cart must be a non-empty array"));
        }
        for (i, item) in self.cart.iter().enumerate() {
            if is_blank(&item.item_name) {
                errors.push(ValidationDetail::new(format!("cart[{i}].itemName"), "itemName is required"));
            }
            if item.quantity <= 0 {
                errors.push(ValidationDetail::new(format!("cart[{i}].quantity"), "quantity must be a positive integer"));
            }
            if item.price.value().is_sign_negative() || item.price.is_zero() {
                errors.push(ValidationDetail::new(format!("cart[{i}].price"), "price must be a positive number"));
            }
            if item.sub_total.value().is_sign_negative() || item.sub_total.is_zero() {
                errors.push(ValidationDetail::new(format!("cart[{i}].subTotal"), "subTotal must be a positive number"));
            }
        }
        errors
    }
}

impl Validate for ChargeTransactionRequest {
    fn validation_errors(&self) -> Vec<ValidationDetail> {
        let mut errors = Vec::new();
        if is_blank(&self.payment_type) {
            errors.push(ValidationDetail::new("paymentType", "Payment type is required"));
        }
        if is_blank(self.transaction_details.order_id.as_str()) {
            errors.push(ValidationDetail::new("transactionDetails.orderId", "Order ID is required"));
        }
        errors
    }
}

impl Validate for NewVoucher {
    fn validation_errors(&self) -> Vec<ValidationDetail> {
        let mut errors = Vec::new();
        if is_blank(&self.name) {
            errors.push(ValidationDetail::new("name", "Name is required"));
        }
        if self.discount < 0 {
            errors.push(ValidationDetail::new("discount", "Discount must not be negative"));
        }
        if self.max_amount < 0 {
            errors.push(ValidationDetail::new("maxAmount", "Max amount must not be negative"));
        }
        errors
    }
}
