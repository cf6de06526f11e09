use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use gws_common::Money;
use wallet_engine::{GatewayStatus, PaymentGateway, PaymentGatewayError};

#[derive(Default)]
struct StubGatewayInner {
    statuses: HashMap<String, GatewayStatus>,
    unreachable: bool,
    next_id: u64,
}

/// A scriptable stand-in for the payment gateway. New transactions start out `Pending`; tests
/// move them along with [`StubGateway::set_status`].
#[derive(Clone, Default)]
pub struct StubGateway {
    inner: Arc<Mutex<StubGatewayInner>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, gateway_tx_id: &str, status: GatewayStatus) {
        self.inner.lock().unwrap().statuses.insert(gateway_tx_id.to_string(), status);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unwrap().unreachable = unreachable;
    }
}

impl PaymentGateway for StubGateway {
    async fn create_transaction(&self, _amount: Money) -> Result<String, PaymentGatewayError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.unreachable {
            return Err(PaymentGatewayError::RequestError("connection refused".to_string()));
        }
        inner.next_id += 1;
        let txid = format!("gwtx-{:04}", inner.next_id);
        inner.statuses.insert(txid.clone(), GatewayStatus::Pending);
        Ok(txid)
    }

    async fn query_status(&self, gateway_tx_id: &str) -> Result<GatewayStatus, PaymentGatewayError> {
        let inner = self.inner.lock().unwrap();
        if inner.unreachable {
            return Err(PaymentGatewayError::RequestError("connection refused".to_string()));
        }
        inner.statuses.get(gateway_tx_id).copied().ok_or(PaymentGatewayError::QueryError {
            status: 404,
            message: format!("unknown transaction {gateway_tx_id}"),
        })
    }
}
