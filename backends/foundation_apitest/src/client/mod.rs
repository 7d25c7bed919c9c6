//! API test client and the request, response and transport types it works
//! with.
//!
//! ```text
//! ApiTestClient::execute
//!     -> ApiUriBuilder::build        (entry point + path + query)
//!     -> default Accept / Content-Type
//!     -> HeadersManager::configure_request
//!     -> Transport::send
//!     -> ApiTestResponse
//! ```

mod body;
mod client;
mod config;
mod errors;
mod http;
mod recording;
mod request;
mod reqwest_transport;
mod response;
mod transport;
mod uri;

pub use body::*;
pub use client::*;
pub use config::*;
pub use errors::*;
pub use http::*;
pub use recording::*;
pub use request::*;
pub use reqwest_transport::*;
pub use response::*;
pub use transport::*;
pub use uri::*;
