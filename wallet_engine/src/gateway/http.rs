use std::{env, sync::Arc, time::Duration};

use gws_common::{Money, Secret};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{GatewayStatus, PaymentGateway, PaymentGatewayError};

const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, e.g. "https://pay.example.com/v1".
    pub base_url: String,
    pub api_key: Secret<String>,
    /// Upper bound on any single gateway call. A status query that exceeds this is treated as
    /// indeterminate, never as success.
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env_or_default() -> Self {
        let base_url = env::var("GWS_GATEWAY_URL").unwrap_or_else(|_| {
            warn!("🌐️ GWS_GATEWAY_URL is not set. Topups will fail until it is configured.");
            String::default()
        });
        let api_key = Secret::new(env::var("GWS_GATEWAY_API_KEY").unwrap_or_default());
        let timeout = env::var("GWS_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT);
        Self { base_url, api_key, timeout }
    }
}

#[derive(Debug, Serialize)]
struct CreateTransactionRequest {
    amount: Money,
    currency: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreateTransactionResponse {
    transaction_id: String,
}

#[derive(Debug, Deserialize)]
struct TransactionStatusResponse {
    status: GatewayStatus,
}

/// HTTP implementation of the [`PaymentGateway`] contract.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    config: GatewayConfig,
    client: Arc<Client>,
}

impl HttpPaymentGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, PaymentGatewayError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentGatewayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaymentGatewayError> {
        let url = format!("{}{path}", self.config.base_url);
        trace!("🌐️ Sending gateway query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaymentGatewayError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🌐️ Gateway query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PaymentGatewayError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaymentGatewayError::RequestError(e.to_string()))?;
            Err(PaymentGatewayError::QueryError { status, message })
        }
    }
}

impl PaymentGateway for HttpPaymentGateway {
    async fn create_transaction(&self, amount: Money) -> Result<String, PaymentGatewayError> {
        let body = CreateTransactionRequest { amount, currency: gws_common::CURRENCY_CODE };
        let result: CreateTransactionResponse =
            self.rest_query(Method::POST, "/transactions", Some(body)).await?;
        debug!("🌐️ Gateway opened transaction [{}] for {amount}", result.transaction_id);
        Ok(result.transaction_id)
    }

    async fn query_status(&self, gateway_tx_id: &str) -> Result<GatewayStatus, PaymentGatewayError> {
        let path = format!("/transactions/{gateway_tx_id}");
        let result: TransactionStatusResponse = self.rest_query(Method::GET, &path, None::<()>).await?;
        debug!("🌐️ Gateway reports [{gateway_tx_id}] as {}", result.status);
        Ok(result.status)
    }
}
