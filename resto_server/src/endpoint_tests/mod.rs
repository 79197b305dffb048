mod auth;
mod payments;
mod vouchers;
