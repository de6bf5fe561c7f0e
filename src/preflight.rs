//! Preflight checks for external tools.
//!
//! Resolves host tools on `PATH` before a run starts, so a missing tool
//! fails with its name instead of a bare spawn error halfway through.
//!
//! # Example
//!
//! ```rust
//! use sdk_packaging::preflight::resolve_tool;
//!
//! if let Err(e) = resolve_tool("doxygen") {
//!     println!("{e}");
//! }
//! ```

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Locate `cmd` on `PATH` (or accept it as a path to an executable).
pub fn resolve_tool(cmd: &str) -> Result<PathBuf> {
    which::which(cmd).map_err(|e| anyhow!("required tool '{}' not found: {}", cmd, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_resolve_tool_found() {
        // 'sh' should exist on any Unix system
        let path = resolve_tool("sh").unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_resolve_tool_missing() {
        let err = resolve_tool("definitely_not_a_real_command_12345").unwrap_err();
        assert!(err.to_string().contains("definitely_not_a_real_command_12345"));
    }
}
