//! HTTP middleware for the MCP transport

mod credentials;

pub use credentials::{
    credential_from_headers, credential_middleware, parse_disabled_tools, strip_bearer,
};
