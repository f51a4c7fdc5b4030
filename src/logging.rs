// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use thanos_core::{Result, ThanosError};

use crate::config::Config;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &Config) -> Result<()> {
    let filter = build_filter(config);

    let result = if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .try_init()
    };

    result.map_err(|e| ThanosError::Config(format!("Failed to initialise logging: {e}")))
}

fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level;
        EnvFilter::new(format!(
            "thanos={level},thanos_core={level},thanos_rpc={level}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let config = Config::default();
        let _ = init_logging(&config);
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, ThanosError::Config(_)));
    }
}
