//! Header operations and their resolution into request headers.

mod basic_auth;
mod compute;
mod configuration;
mod entry;
mod locator;
mod manager;
mod resolve;
mod timestamp;

pub use basic_auth::*;
pub use compute::*;
pub use configuration::*;
pub use entry::*;
pub use locator::*;
pub use manager::*;
pub use resolve::*;
pub use timestamp::*;
