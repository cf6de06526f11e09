//! # GWS server
//! This module hosts the HTTP front-end for the grocery wallet service. It is responsible for:
//! Serving wallet balance and statement queries.
//! Accepting topup initiations and reconciling returning topup confirmations against the gateway.
//! Taking synchronous wallet payments for orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/wallet/{user_id}`: The wallet balance and statement routes.
//! * `/api/wallet/topup`, `/api/wallet/pay`: The money-movement routes.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
