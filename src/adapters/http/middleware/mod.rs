//! HTTP extractors shared by gateway endpoints.
//!
//! - `client_ip` - Client address behind CDNs and proxies

pub mod client_ip;

pub use client_ip::{extract_client_ip, ClientIp, ForwardedHeaders, UNKNOWN_CLIENT_IP};
