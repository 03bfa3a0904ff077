//! Error conversion helpers for tool handlers

use chronomcp_core::Error;

/// Extension trait tagging upstream failures with the operation that failed
pub trait UpstreamResultExt<T> {
    /// Convert to an upstream error reading `failed to <operation>: <cause>`
    fn upstream(self, operation: &str) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> UpstreamResultExt<T> for Result<T, E> {
    fn upstream(self, operation: &str) -> Result<T, Error> {
        self.map_err(|e| Error::upstream(operation, e))
    }
}

/// Extension trait for converting Options to argument errors
pub trait OptionArgumentExt<T> {
    /// Convert `None` to an invalid-argument error for `name`
    fn or_invalid(self, name: &str, reason: &str) -> Result<T, Error>;
}

impl<T> OptionArgumentExt<T> for Option<T> {
    fn or_invalid(self, name: &str, reason: &str) -> Result<T, Error> {
        self.ok_or_else(|| Error::invalid_argument(name, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_ok() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(result.upstream("list events").unwrap(), 42);
    }

    #[test]
    fn test_upstream_err_is_tagged() {
        let result: Result<i32, &str> = Err("connection reset");
        let err = result.upstream("list events").unwrap_err();
        assert_eq!(err.to_string(), "failed to list events: connection reset");
    }

    #[test]
    fn test_option_or_invalid() {
        let none: Option<i32> = None;
        let err = none.or_invalid("step", "must be positive").unwrap_err();
        assert_eq!(err.to_string(), "invalid argument \"step\": must be positive");
        assert_eq!(Some(1).or_invalid("step", "x").unwrap(), 1);
    }
}
