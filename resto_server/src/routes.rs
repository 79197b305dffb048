//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution.
//!
//! Routes declared with `where requires basic_auth` are wrapped in the basic auth middleware. Everything else is open.
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use resto_engine::{
    db_types::{NewVoucher, PaymentNumber},
    payment_objects::{ChargeTransactionRequest, PaymentNotification},
    transaction_objects::TransactionRequest,
    PaymentApi,
    PaymentGateway,
    PaymentStatusApi,
    TransactionFlowApi,
    TransactionManagement,
    VoucherApi,
    VoucherError,
    VoucherManagement,
};
use serde_json::Value;

use crate::{
    data_objects::{JsonResponse, Validate, VoucherSearchParams},
    errors::ServerError,
    helpers::local_day_bounds,
};

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

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires basic_auth) => {
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
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::BasicAuthMiddlewareFactory::new());
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

#[get("/main/health")]
pub async fn transactions_health() -> impl Responder {
    trace!("💻️ Received transactions health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/vouchers/health")]
pub async fn vouchers_health() -> impl Responder {
    trace!("💻️ Received vouchers health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Transactions  ----------------------------------------------------
route!(create_transaction => Post "/main" impl TransactionManagement where requires basic_auth);
/// Route handler for recording a new point-of-sale transaction.
///
/// If the request names a voucher, it is checked and redeemed as part of the same operation. The stored transaction,
/// including its order and payment numbers, is returned.
pub async fn create_transaction<B: TransactionManagement>(
    body: web::Json<TransactionRequest>,
    api: web::Data<TransactionFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST new {} transaction for {}", request.payment_method, request.customer_name);
    request.validate()?;
    let transaction = api.create_transaction(request, Utc::now()).await.map_err(|e| {
        debug!("💻️ Could not create transaction. {e}");
        ServerError::from(e)
    })?;
    Ok(JsonResponse::ok("Transaction created successfully", transaction))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(charge => Post "/payments" impl TransactionManagement, PaymentGateway where requires basic_auth);
/// Route handler for charging a stored transaction through the payment gateway.
///
/// Only `qris` charges are accepted. On success the gateway's response is passed back untouched, since it carries the
/// QR code the customer has to scan.
pub async fn charge<B, G>(
    body: web::Json<ChargeTransactionRequest>,
    api: web::Data<PaymentApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: TransactionManagement,
    G: PaymentGateway,
{
    let request = body.into_inner();
    debug!("💻️ POST {} charge for {}", request.payment_type, request.transaction_details.order_id);
    request.validate()?;
    let receipt = api.charge(request).await.map_err(|e| {
        debug!("💻️ Charge failed. {e}");
        ServerError::from(e)
    })?;
    Ok(JsonResponse::ok("Transaction payment successful", receipt.body))
}

route!(payment_notification => Post "/payments/notification" impl TransactionManagement);
/// Route handler for the payment gateway's notification webhook.
///
/// This always answers with a 200, even if the notification could not be applied. The gateway retries anything else,
/// and retrying will not fix an unknown order or a malformed body. Failures are logged instead.
pub async fn payment_notification<B: TransactionManagement>(
    body: web::Bytes,
    api: web::Data<PaymentStatusApi<B>>,
) -> HttpResponse {
    trace!("💻️ Received payment notification");
    let notification = match parse_notification(&body) {
        Ok(n) => n,
        Err(e) => {
            warn!("💻️ Ignoring malformed payment notification. {e}. Body: {}", String::from_utf8_lossy(&body));
            return JsonResponse::ok("Notification received", Value::Null);
        },
    };
    info!(
        "💻️ Payment notification for {}: {} (fraud status: {})",
        notification.order_id,
        notification.transaction_status,
        notification.fraud_status.as_deref().unwrap_or("none")
    );
    match api.process_notification(notification).await {
        Ok(_) => JsonResponse::ok("Notification processed successfully", Value::Null),
        Err(e) => {
            error!("💻️ Could not process payment notification. {e}");
            JsonResponse::ok("Notification received", Value::Null)
        },
    }
}

fn parse_notification(body: &[u8]) -> Result<PaymentNotification, String> {
    let notification = serde_json::from_slice::<PaymentNotification>(body).map_err(|e| e.to_string())?;
    if notification.order_id.as_str().trim().is_empty() {
        return Err("Order ID is required".into());
    }
    if notification.transaction_status.trim().is_empty() {
        return Err("Transaction status is required".into());
    }
    Ok(notification)
}

route!(payment_status => Get "/payments/status/{payment_number}" impl TransactionManagement where requires basic_auth);
pub async fn payment_status<B: TransactionManagement>(
    path: web::Path<PaymentNumber>,
    api: web::Data<PaymentStatusApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let payment_number = path.into_inner();
    debug!("💻️ GET payment status for {payment_number}");
    let report = api.payment_status(&payment_number).await?;
    Ok(JsonResponse::ok("Payment status retrieved successfully", report))
}

//----------------------------------------------   Vouchers  ----------------------------------------------------
route!(vouchers => Get "/vouchers" impl VoucherManagement where requires basic_auth);
/// Route handler for listing vouchers, oldest first. The optional `search` query parameter filters by name, ignoring
/// case.
pub async fn vouchers<B: VoucherManagement>(
    query: web::Query<VoucherSearchParams>,
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let search = query.into_inner().search;
    debug!("💻️ GET vouchers. Search: {}", search.as_deref().unwrap_or("(none)"));
    let vouchers = api.search(search).await?;
    Ok(JsonResponse::ok("Vouchers retrieved successfully", vouchers))
}

route!(vouchers_used_today => Get "/vouchers/today/used" impl VoucherManagement where requires basic_auth);
/// Route handler for today's voucher activity: the number of vouchers on record, and how many redemptions were made
/// since midnight, server time.
pub async fn vouchers_used_today<B: VoucherManagement>(
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET today's voucher usage");
    let (since, until) = local_day_bounds(Utc::now())
        .ok_or_else(|| ServerError::BackendError("Could not determine the start of the local day".into()))?;
    let summary = api.usage_summary(since, until).await?;
    Ok(JsonResponse::ok("Vouchers retrieved successfully", summary))
}

route!(voucher_detail => Get "/vouchers/{code}/detail" impl VoucherManagement);
pub async fn voucher_detail<B: VoucherManagement>(
    path: web::Path<String>,
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let code = path.into_inner();
    debug!("💻️ GET voucher {code}");
    let voucher = api.voucher_by_code(&code).await.map_err(|e| match e {
        VoucherError::VoucherNotFound(_) => ServerError::not_found("Voucher not found", "VOUCHER_NOT_FOUND"),
        e => e.into(),
    })?;
    Ok(JsonResponse::ok("Voucher retrieved successfully", voucher))
}

route!(create_voucher => Post "/vouchers" impl VoucherManagement where requires basic_auth);
pub async fn create_voucher<B: VoucherManagement>(
    body: web::Json<NewVoucher>,
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let voucher = body.into_inner();
    debug!("💻️ POST new voucher {}", voucher.name);
    voucher.validate()?;
    let voucher = api.create_voucher(voucher).await?;
    Ok(JsonResponse::ok("Voucher created successfully", voucher))
}

route!(update_voucher => Put "/vouchers/{id}" impl VoucherManagement where requires basic_auth);
pub async fn update_voucher<B: VoucherManagement>(
    path: web::Path<i64>,
    body: web::Json<NewVoucher>,
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let voucher = body.into_inner();
    debug!("💻️ PUT voucher #{id}");
    voucher.validate()?;
    let voucher = api.update_voucher(id, voucher).await?;
    Ok(JsonResponse::ok("Voucher updated successfully", voucher))
}

route!(delete_voucher => Delete "/vouchers/{id}" impl VoucherManagement where requires basic_auth);
pub async fn delete_voucher<B: VoucherManagement>(
    path: web::Path<i64>,
    api: web::Data<VoucherApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE voucher #{id}");
    let voucher = api.delete_voucher(id).await?;
    Ok(JsonResponse::ok("Voucher deleted successfully", voucher))
}
