//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, gateway calls, etc.) should be expressed as futures or asynchronous functions. Async handlers
//! get executed concurrently by worker threads and thus don’t block execution.

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use wallet_engine::{
    traits::WalletBackend,
    ConfirmOutcome,
    PaymentGateway,
    ReconciliationApi,
    WalletApi,
};

use crate::{
    data_objects::{
        JsonResponse,
        PaymentParams,
        TopupConfirmParams,
        TopupInitiateParams,
        TopupInitiateResult,
        WalletUpdateResult,
    },
    errors::ServerError,
};

/// The most ledger entries a single statement request will return.
pub const MAX_HISTORY_LIMIT: u32 = 50;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Wallet  ----------------------------------------------------
route!(wallet => Get "/wallet/{user_id}" impl WalletBackend);
/// Route handler for the wallet balance endpoint
///
/// Returns the wallet for the given user, creating an empty one on first access. The balance is
/// always the signed sum of the wallet's completed ledger entries.
pub async fn wallet<B: WalletBackend>(
    path: web::Path<i64>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET wallet for user #{user_id}");
    let wallet = api.wallet_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(wallet))
}

route!(wallet_history => Get "/wallet/{user_id}/history" impl WalletBackend);
/// Route handler for account statements: the wallet plus its most recent ledger entries, newest
/// first, capped at [`MAX_HISTORY_LIMIT`].
pub async fn wallet_history<B: WalletBackend>(
    path: web::Path<i64>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET history for user #{user_id}");
    let history = api.wallet_with_history(user_id, MAX_HISTORY_LIMIT).await?;
    Ok(HttpResponse::Ok().json(history))
}

//----------------------------------------------   Topups  ----------------------------------------------------
route!(topup_initiate => Post "/wallet/topup/initiate" impl WalletBackend, PaymentGateway);
/// Route handler for starting a topup.
///
/// Opens a transaction with the payment gateway and records the attempt (user, amount, gateway
/// transaction id) server-side. The ledger is not touched; the wallet is only credited once the
/// gateway confirms the payment via the topup confirmation endpoint.
pub async fn topup_initiate<B, G>(
    body: web::Json<TopupInitiateParams>,
    api: web::Data<ReconciliationApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: WalletBackend,
    G: PaymentGateway,
{
    let params = body.into_inner();
    debug!("💻️ POST topup/initiate for user #{}: {}", params.user_id, params.amount);
    let gateway_transaction_id = api.initiate(params.user_id, params.amount).await?;
    Ok(HttpResponse::Ok().json(TopupInitiateResult { gateway_transaction_id }))
}

route!(topup => Post "/wallet/topup" impl WalletBackend, PaymentGateway);
/// Route handler for topup confirmations.
///
/// The external transaction id is the only field of the request that is trusted; it selects the
/// topup attempt that was recorded at initiation. Amount and user id are re-derived from that
/// record and from the gateway's own status answer, so a tampered confirmation can at worst
/// deliver the topup that was actually paid for. Replays are answered from the ledger without
/// crediting again.
///
/// Responds 200 with the updated wallet when the payment settled, 202 while the gateway still
/// reports it pending (or cannot be reached), and 422 when the gateway reports it failed.
pub async fn topup<B, G>(
    body: web::Json<TopupConfirmParams>,
    api: web::Data<ReconciliationApi<B, G>>,
    wallets: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: WalletBackend,
    G: PaymentGateway,
{
    let params = body.into_inner();
    let txid = params.external_transaction_id;
    debug!("💻️ POST topup confirmation for gateway transaction [{txid}]");
    let request = api
        .topup_request(&txid)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No topup has been initiated for transaction {txid}")))?;
    if let Some(amount) = params.amount {
        if amount != request.amount {
            warn!("💻️ Topup [{txid}] client claims {amount}, but {} was initiated. Ignoring the claim", request.amount);
        }
    }
    if let Some(user_id) = params.user_id {
        if user_id != request.user_id {
            warn!(
                "💻️ Topup [{txid}] client claims user #{user_id}, but user #{} initiated it. Ignoring the claim",
                request.user_id
            );
        }
    }
    match api.confirm(&txid).await? {
        ConfirmOutcome::Completed(entry) => {
            let wallet = wallets
                .wallet_by_id(entry.wallet_id)
                .await?
                .ok_or_else(|| ServerError::BackendError(format!("Wallet {} vanished after credit", entry.wallet_id)))?;
            Ok(HttpResponse::Ok().json(WalletUpdateResult { wallet, entry }))
        },
        ConfirmOutcome::Pending => Ok(HttpResponse::Accepted()
            .json(JsonResponse::success(format!("Topup {txid} is still pending. Try again later.")))),
        ConfirmOutcome::Failed => Ok(HttpResponse::UnprocessableEntity()
            .json(JsonResponse::failure(format!("Topup {txid} failed at the payment gateway. No credit was made.")))),
    }
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(payment => Post "/wallet/pay" impl WalletBackend);
/// Route handler for paying for an order out of the wallet.
///
/// The debit and its ledger entry commit together, or not at all. An overdraw is rejected with a
/// 402 response carrying the current balance and the required amount.
pub async fn payment<B: WalletBackend>(
    body: web::Json<PaymentParams>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST payment of {} for order {} by user #{}", params.amount, params.order_id, params.user_id);
    let (wallet, entry) =
        api.pay_for_order(params.user_id, params.amount, &params.order_id, params.description).await?;
    Ok(HttpResponse::Ok().json(WalletUpdateResult { wallet, entry }))
}
