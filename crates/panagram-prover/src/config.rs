//! Runtime configuration. The command line carries circuit inputs only,
//! so tool locations and log filters come from the environment.

use std::{env, path::PathBuf};

pub const ENV_CIRCUIT: &str = "PANAGRAM_CIRCUIT";
pub const ENV_NOIR_EXECUTE: &str = "PANAGRAM_NOIR_EXECUTE";
pub const ENV_BB: &str = "PANAGRAM_BB";
pub const ENV_LOG: &str = "PANAGRAM_LOG";

pub const DEFAULT_NOIR_EXECUTE: &str = "noir-execute";
pub const DEFAULT_BB: &str = "bb";
pub const DEFAULT_LOG: &str = "warn";

/// Where the circuit and tools live, and which log directives apply.
#[derive(Clone, Debug)]
pub struct Config {
    /// Overrides the install-relative artifact location when set.
    pub circuit_path: Option<PathBuf>,
    pub noir_execute_bin: PathBuf,
    pub bb_bin: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            circuit_path: None,
            noir_execute_bin: PathBuf::from(DEFAULT_NOIR_EXECUTE),
            bb_bin: PathBuf::from(DEFAULT_BB),
            log_filter: DEFAULT_LOG.to_string(),
        }
    }
}

impl Config {
    /// Reads every `PANAGRAM_*` variable, falling back to defaults for unset or empty ones.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            circuit_path: get(ENV_CIRCUIT).map(PathBuf::from),
            noir_execute_bin: get(ENV_NOIR_EXECUTE)
                .map(PathBuf::from)
                .unwrap_or(defaults.noir_execute_bin),
            bb_bin: get(ENV_BB).map(PathBuf::from).unwrap_or(defaults.bb_bin),
            log_filter: get(ENV_LOG).unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = Config::from_lookup(|_| None);
        assert!(cfg.circuit_path.is_none());
        assert_eq!(cfg.noir_execute_bin, PathBuf::from("noir-execute"));
        assert_eq!(cfg.bb_bin, PathBuf::from("bb"));
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn variables_override_and_blank_values_are_ignored() {
        let vars: HashMap<&str, &str> = [
            (ENV_CIRCUIT, "/opt/circuits/zk_panagram.json"),
            (ENV_BB, "/usr/local/bin/bb"),
            (ENV_LOG, "  "),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.circuit_path, Some(PathBuf::from("/opt/circuits/zk_panagram.json")));
        assert_eq!(cfg.bb_bin, PathBuf::from("/usr/local/bin/bb"));
        assert_eq!(cfg.noir_execute_bin, PathBuf::from("noir-execute"));
        assert_eq!(cfg.log_filter, "warn");
    }
}
