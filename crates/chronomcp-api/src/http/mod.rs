//! HTTP plumbing shared by the SSE transport

pub mod middleware;

pub use middleware::{credential_from_headers, credential_middleware};
