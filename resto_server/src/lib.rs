//! # Restaurant payment server
//! This module hosts the HTTP server for the restaurant point-of-sale backend. It is responsible for:
//! * Recording new transactions, including voucher redemption and pricing.
//! * Charging stored transactions through the Midtrans payment gateway (QRIS only).
//! * Receiving Midtrans payment notifications and updating transaction statuses.
//! * Voucher management and reporting.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`, `/main/health`, `/vouchers/health`: Health checks that return a 200 OK response.
//! * `POST /main`: Create a transaction.
//! * `POST /payments`: Charge a transaction through the gateway.
//! * `POST /payments/notification`: The Midtrans notification webhook. Not authenticated.
//! * `GET /payments/status/{payment_number}`: Fetch the payment status of a transaction.
//! * `GET /vouchers`, `POST /vouchers`, `PUT /vouchers/{id}`, `DELETE /vouchers/{id}`: Voucher management.
//! * `GET /vouchers/today/used`: Today's voucher usage.
//! * `GET /vouchers/{code}/detail`: Look up a voucher by its code. Not authenticated.
//!
//! Unless noted otherwise, routes require HTTP basic authentication.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
