use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;

use crate::{config::MidtransConfig, ChargeRequest, ChargeResponse, MidtransApiError};

#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MidtransConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Submits a single charge. There are no retries: a second attempt with the same order id would be rejected by
    /// Midtrans as a duplicate anyway.
    ///
    /// Midtrans reports most failures with a `status_code` inside the JSON body, sometimes with an HTTP 200. Anything
    /// other than `"201"` comes back as [`MidtransApiError::ChargeRejected`] with the gateway's code and message.
    pub async fn charge(&self, request: &ChargeRequest) -> Result<ChargeResponse, MidtransApiError> {
        if self.config.server_key.is_empty() {
            return Err(MidtransApiError::MissingServerKey);
        }
        let url = self.url("/v2/charge");
        debug!("💳️ Sending charge for order {} to {url}", request.transaction_details.order_id);
        let response = self
            .client
            .post(url)
            .basic_auth(self.config.server_key.reveal(), None::<&str>)
            .json(request)
            .send()
            .await
            .map_err(|e| MidtransApiError::RestRequestError(e.to_string()))?;
        let http_status = response.status().as_u16();
        let text = response.text().await.map_err(|e| MidtransApiError::RestResponseError(e.to_string()))?;
        trace!("💳️ Charge response ({http_status}): {text}");
        let body = serde_json::from_str::<Value>(&text)
            .map_err(|_| MidtransApiError::InvalidResponse { http_status, body: text.clone() })?;
        let result = ChargeResponse::try_from_value(http_status, body)?;
        if result.is_created() {
            info!(
                "💳️ Charge for order {} accepted. Midtrans id: {}",
                request.transaction_details.order_id,
                result.transaction_id.as_deref().unwrap_or("n/a")
            );
            Ok(result)
        } else {
            warn!(
                "💳️ Charge for order {} rejected. {} {}",
                request.transaction_details.order_id, result.status_code, result.status_message
            );
            Err(MidtransApiError::ChargeRejected { status_code: result.status_code, message: result.status_message })
        }
    }
}
