//! HTTP Basic authentication middleware for Actix Web.
//!
//! Wrap a scope or resource with [`BasicAuthMiddlewareFactory`] to require the configured username and password in
//! the `Authorization` header. Requests without valid credentials are answered with a `401` and a
//! `WWW-Authenticate` challenge, and never reach the handler.
//!
//! The credentials are taken from the [`BasicAuthConfig`] registered as app data. If there is none, or it is empty,
//! every request is refused.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{error, trace, warn};

use crate::{config::BasicAuthConfig, errors::ServerError};

pub struct BasicAuthMiddlewareFactory;

impl BasicAuthMiddlewareFactory {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        BasicAuthMiddlewareFactory
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = BasicAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddlewareService { service: Rc::new(service) }))
    }
}

pub struct BasicAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let supplied = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()).and_then(decode_basic_auth);
        let credentials = req.app_data::<web::Data<BasicAuthConfig>>();
        if credentials.is_none() {
            error!("🔐️ No basic auth configuration has been registered with the app. Denying access.");
        }
        let authorised = match (credentials, &supplied) {
            (Some(credentials), Some((user, password))) => credentials.matches(user, password),
            _ => false,
        };
        Box::pin(async move {
            if authorised {
                trace!("🔐️ Basic auth check for {} ✅️", req.path());
                return service.call(req).await;
            }
            match supplied {
                Some((user, _)) => warn!("🔐️ Invalid credentials for user '{user}' on {}. Denying access.", req.path()),
                None => warn!("🔐️ No basic auth credentials supplied for {}. Denying access.", req.path()),
            }
            Err(ServerError::Unauthorized.into())
        })
    }
}

/// Extracts `(username, password)` from a `Basic <base64>` authorization header value.
pub fn decode_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
