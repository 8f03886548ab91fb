//! Compiled circuit artifact (`nargo compile` JSON) and its install-relative location.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{config::Config, error::AdapterError};

/// Location of the artifact relative to the directory holding the executable
/// (`target/<profile>/` back up to the project root).
pub const RELATIVE_CIRCUIT_PATH: &str = "../../circuits/target/zk_panagram.json";

/// Parameter visibility as declared in the circuit ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    DataBus,
}

/// One named circuit parameter; its type is kept as raw JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: Value,
    pub visibility: Visibility,
}

/// Input interface of the circuit. Fields we do not interpret are carried through untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Abi {
    pub parameters: Vec<AbiParameter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Abi {
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }
}

/// Bytecode plus ABI, loaded once per run and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitArtifact {
    /// base64 of the gzip-compressed ACIR program
    pub bytecode: String,
    pub abi: Abi,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CircuitArtifact {
    pub fn load(path: &Path) -> Result<Self, AdapterError> {
        let text = fs::read_to_string(path).map_err(|e| AdapterError::artifact(path, e))?;
        let artifact = Self::parse(&text).map_err(|reason| AdapterError::artifact(path, reason))?;
        tracing::info!(
            path = %path.display(),
            parameters = artifact.abi.parameters.len(),
            bytecode_len = artifact.bytecode.len(),
            "loaded circuit artifact"
        );
        Ok(artifact)
    }

    fn parse(text: &str) -> Result<Self, String> {
        let artifact: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        if artifact.bytecode.trim().is_empty() {
            return Err("artifact has an empty bytecode field".into());
        }
        Ok(artifact)
    }
}

/// Picks the artifact path: the configured override, or the location next to the install.
pub fn resolve_artifact_path(config: &Config) -> Result<PathBuf, AdapterError> {
    if let Some(path) = &config.circuit_path {
        return Ok(path.clone());
    }
    let exe = env::current_exe()
        .map_err(|e| AdapterError::artifact(RELATIVE_CIRCUIT_PATH, format!("cannot locate executable: {e}")))?;
    let install_dir = exe
        .parent()
        .ok_or_else(|| AdapterError::artifact(RELATIVE_CIRCUIT_PATH, "executable has no parent directory"))?;
    Ok(install_dir.join(RELATIVE_CIRCUIT_PATH))
}
