//! Environment-based runtime tuning.
//!
//! `CONTACTD_STACK_SIZE` sets the coroutine stack size in bytes, in decimal
//! (`16384`) or hex (`0x4000`). Handlers render templates on their own
//! stacks, so the default is deliberately generous for the call depth
//! minijinja needs.

use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for handler coroutines in bytes (default 0x4000).
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults on missing or unparseable values.
    pub fn from_env() -> Self {
        let stack_size = match env::var("CONTACTD_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(0x4000)
                } else {
                    val.parse().unwrap_or(0x4000)
                }
            }
            Err(_) => 0x4000,
        };
        RuntimeConfig { stack_size }
    }
}
