//! Public types for the bifrost API.

mod request;
mod response;

pub use request::{ProviderId, Request};
pub use response::Response;
