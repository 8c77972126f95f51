//! Tracing subscriber setup for hosts embedding the scoring core

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed, so calling
/// this more than once is harmless.
pub fn init() -> bool {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init()
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_init_is_idempotent() {
    init();
    // Second install always reports the existing subscriber
    assert!(!init());
  }
}
