//! Shared proptest configuration.
//!
//! Set `PROPTEST_CASES` to trade speed for thoroughness:
//! - PR/fast: `PROPTEST_CASES=64`
//! - Nightly: `PROPTEST_CASES=5000`

use proptest::prelude::*;

/// Fast config for PR checks.
pub fn ci_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    }
}

/// Case count from `PROPTEST_CASES`, 64 when unset.
pub fn auto_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ci_config()
    }
}
