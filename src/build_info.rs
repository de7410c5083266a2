//! Build metadata embedded by `build.rs`

use serde::Serialize;

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version, build counter and compile time of the running binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_env(
            option_env!("ENDURITHM_BUILD_NUMBER"),
            option_env!("ENDURITHM_BUILD_TIMESTAMP"),
        )
    }

    /// Missing or malformed values fall back to build 0 at an unknown time
    fn from_env(build_number: Option<&str>, build_timestamp: Option<&'static str>) -> Self {
        Self {
            version: VERSION,
            build_number: build_number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: build_timestamp.unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "v{} build {} ({})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}
