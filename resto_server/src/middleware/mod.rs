mod basic_auth;

pub use basic_auth::{decode_basic_auth, BasicAuthMiddlewareFactory, BasicAuthMiddlewareService};
