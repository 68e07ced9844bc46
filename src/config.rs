//! Configuration management for RosterChain

use crate::block::NodeId;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    pub network: NetworkConfig,
    #[serde(default)]
    pub miner: MinerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// This node's identifier, doubling as the loopback port its API serves
    /// on.
    pub id: NodeId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// The full ordered roster, own id included. Order matters: it is the
    /// mining rotation.
    pub peers: Vec<NodeId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinerConfig {
    #[serde(default = "default_block_interval_secs")]
    pub block_interval_secs: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            block_interval_secs: default_block_interval_secs(),
        }
    }
}

fn default_block_interval_secs() -> u64 {
    5
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    load_config_from(Path::new("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Provide single-node defaults when the config file is absent
        Config {
            node: NodeConfig { id: 8001 },
            network: NetworkConfig { peers: vec![8001] },
            miner: MinerConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.network.peers.is_empty() {
        return Err("network.peers must list at least one node".into());
    }

    if !config.network.peers.contains(&config.node.id) {
        return Err(format!(
            "node.id {} must appear in network.peers",
            config.node.id
        )
        .into());
    }

    let mut deduped = config.network.peers.clone();
    deduped.sort_unstable();
    deduped.dedup();
    if deduped.len() != config.network.peers.len() {
        return Err("network.peers must not contain duplicates".into());
    }

    if config.miner.block_interval_secs == 0 {
        return Err("miner.block_interval_secs must be at least 1".into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn test_loads_a_full_config() {
        let file = write_config(
            "[node]\n\
             id = 8002\n\n\
             [network]\n\
             peers = [8001, 8002, 8003]\n\n\
             [miner]\n\
             block_interval_secs = 2\n",
        );
        let config = load_config_from(file.path()).expect("Failed to load config");
        assert_eq!(config.node.id, 8002);
        assert_eq!(config.network.peers, vec![8001, 8002, 8003]);
        assert_eq!(config.miner.block_interval_secs, 2);
    }

    #[test]
    fn test_interval_defaults_when_miner_section_is_absent() {
        let file = write_config("[node]\nid = 9000\n\n[network]\npeers = [9000]\n");
        let config = load_config_from(file.path()).expect("Failed to load config");
        assert_eq!(config.miner.block_interval_secs, 5);
    }

    #[test]
    fn test_rejects_roster_without_self() {
        let file = write_config("[node]\nid = 9000\n\n[network]\npeers = [8001]\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("must appear in network.peers"));
    }

    #[test]
    fn test_rejects_duplicate_roster_entries() {
        let file = write_config("[node]\nid = 8001\n\n[network]\npeers = [8001, 8001]\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicates"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let file = write_config(
            "[node]\nid = 8001\n\n[network]\npeers = [8001]\n\n[miner]\nblock_interval_secs = 0\n",
        );
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_missing_file_falls_back_to_single_node_defaults() {
        let config = load_config_from(Path::new("/nonexistent/rosterchain.toml"))
            .expect("Failed to apply defaults");
        assert_eq!(config.node.id, 8001);
        assert_eq!(config.network.peers, vec![config.node.id]);
        assert_eq!(config.miner.block_interval_secs, 5);
    }
}
