//! Backend-of-record client adapters.

mod mock_backend_client;
mod reqwest_client;

pub use mock_backend_client::{MockBackendClient, RecordedRequest};
pub use reqwest_client::ReqwestBackendClient;
