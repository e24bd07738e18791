//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Environment variable pointing at the root of the software tree.
pub const NAV_SW_ROOT_VAR: &str = "NAV_SW_ROOT";

/// Get the root directory of the software, as given by the `NAV_SW_ROOT` environment variable.
pub fn get_nav_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(NAV_SW_ROOT_VAR).map(PathBuf::from)
}
