//! Edge Gateway - cookie sessions, token refresh and payment reconciliation
//! in front of a backend of record.
//!
//! The gateway keeps access and refresh tokens in `HttpOnly` cookies, forwards
//! `/api/*` to the backend with transparent refresh-and-retry, and reconciles
//! provider payments with backend activation from both the payment webhook and
//! success-page polling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
