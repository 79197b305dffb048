//! Adapts the Midtrans Core API client to the engine's [`PaymentGateway`] trait.
use log::*;
use midtrans_tools::{ChargeRequest, CustomerDetails, ItemDetail, MidtransApi, MidtransApiError, MidtransConfig};
use resto_engine::{ChargeOrder, ChargeReceipt, GatewayError, PaymentGateway};

#[derive(Clone)]
pub struct MidtransGateway {
    api: MidtransApi,
}

impl MidtransGateway {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let api = MidtransApi::new(config)?;
        info!("💳️ Midtrans charges will be sent to {}", api.config().base_url());
        Ok(Self { api })
    }
}

/// Midtrans wants the customer's name split in two. We only have the one name, so it goes in both fields.
pub fn charge_request_from_order(order: ChargeOrder) -> ChargeRequest {
    let customer = CustomerDetails { first_name: order.customer_name.clone(), last_name: order.customer_name };
    let items = order
        .lines
        .into_iter()
        .map(|line| ItemDetail { id: line.id, price: line.price, quantity: 1, name: line.name })
        .collect();
    ChargeRequest::new(&order.payment_type, &order.order_id, customer, items)
}

/// Both error types live in other crates, so this can't be a `From` impl.
pub fn gateway_error(e: MidtransApiError) -> GatewayError {
    match e {
        MidtransApiError::MissingServerKey | MidtransApiError::Initialization(_) => {
            GatewayError::NotConfigured(e.to_string())
        },
        MidtransApiError::RestRequestError(_) | MidtransApiError::RestResponseError(_) => {
            GatewayError::Unavailable(e.to_string())
        },
        MidtransApiError::JsonError(_) | MidtransApiError::InvalidResponse { .. } => {
            GatewayError::InvalidResponse(e.to_string())
        },
        MidtransApiError::ChargeRejected { status_code, message } => GatewayError::Rejected { status_code, message },
    }
}

impl PaymentGateway for MidtransGateway {
    async fn submit_charge(&self, order: ChargeOrder) -> Result<ChargeReceipt, GatewayError> {
        let request = charge_request_from_order(order);
        let response = self.api.charge(&request).await.map_err(gateway_error)?;
        Ok(ChargeReceipt {
            status_code: response.status_code,
            status_message: response.status_message,
            body: response.raw,
        })
    }
}
