//! Candidate device discovery.
//!
//! Probes `<prefix><n>` for every configured prefix and `n` in
//! `0..=max_suffix`, keeping the names that exist. The result is returned
//! to the caller; nothing is remembered between scans.

use crate::config::DiscoveryConfig;
use std::path::Path;
use tracing::debug;

/// Existing device names, in prefix order then suffix order.
pub fn scan_ports(config: &DiscoveryConfig) -> Vec<String> {
    let ports: Vec<String> = config
        .prefixes
        .iter()
        .flat_map(|prefix| (0..=config.max_suffix).map(move |n| format!("{}{}", prefix, n)))
        .filter(|name| Path::new(name).exists())
        .collect();

    debug!("Discovered {} candidate port(s)", ports.len());
    ports
}
