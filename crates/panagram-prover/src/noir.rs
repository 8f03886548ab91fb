//! Circuit execution through the Noir artifact CLI (`noir-execute`).

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use base64::{engine::general_purpose::STANDARD, Engine};
use tempfile::TempDir;

use crate::{
    artifact::{Abi, CircuitArtifact},
    error::AdapterError,
    inputs::InputRecord,
    pipeline::{CircuitEngine, Witness},
    tool,
};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const WITNESS_NAME: &str = "witness";

/// Checks that artifact bytecode is base64 of a gzip stream and returns the decoded bytes.
pub fn decode_bytecode(bytecode: &str) -> Result<Vec<u8>, AdapterError> {
    let raw = STANDARD
        .decode(bytecode.trim())
        .map_err(|e| AdapterError::Initialization(format!("bytecode is not base64: {e}")))?;
    if !raw.starts_with(&GZIP_MAGIC) {
        return Err(AdapterError::Initialization(
            "bytecode is not a gzip-compressed ACIR program".into(),
        ));
    }
    Ok(raw)
}

/// Runs a compiled circuit with `noir-execute`. The artifact is staged once in a
/// private working directory that is removed when the executor is dropped.
pub struct NoirExecutor {
    bin: PathBuf,
    abi: Abi,
    workdir: TempDir,
    artifact_path: PathBuf,
}

impl NoirExecutor {
    pub fn new(artifact: &CircuitArtifact, bin: impl Into<PathBuf>) -> Result<Self, AdapterError> {
        let program = decode_bytecode(&artifact.bytecode)?;
        let workdir = tempfile::Builder::new()
            .prefix("panagram-execute-")
            .tempdir()
            .map_err(|e| AdapterError::Initialization(format!("cannot create working directory: {e}")))?;
        let artifact_path = workdir.path().join("circuit.json");
        let json = serde_json::to_vec(artifact)
            .map_err(|e| AdapterError::Initialization(format!("cannot serialize artifact: {e}")))?;
        fs::write(&artifact_path, json)
            .map_err(|e| AdapterError::Initialization(format!("cannot stage artifact: {e}")))?;
        tracing::debug!(program_len = program.len(), dir = %workdir.path().display(), "execution engine ready");
        Ok(Self { bin: bin.into(), abi: artifact.abi.clone(), workdir, artifact_path })
    }

    fn output_dir(&self) -> PathBuf {
        self.workdir.path().join("target")
    }

    fn command(&self, prover_file: &Path) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("--artifact-path")
            .arg(&self.artifact_path)
            .arg("--prover-file")
            .arg(prover_file)
            .arg("--output-dir")
            .arg(self.output_dir())
            .arg("--witness-name")
            .arg(WITNESS_NAME);
        cmd
    }
}

impl CircuitEngine for NoirExecutor {
    fn execute(&self, inputs: &InputRecord) -> Result<Witness, AdapterError> {
        inputs.check_schema(&self.abi)?;

        let prover_file = self.workdir.path().join("Prover.json");
        let json = serde_json::to_vec_pretty(&inputs.to_prover_json())
            .map_err(|e| AdapterError::Execution(format!("cannot serialize inputs: {e}")))?;
        fs::write(&prover_file, json)
            .map_err(|e| AdapterError::Execution(format!("cannot write prover file: {e}")))?;

        let output = tool::run("noir-execute", &mut self.command(&prover_file))
            .map_err(|e| AdapterError::Execution(e.to_string()))?;
        tool::relay("noir-execute", &output.stdout);

        let witness_path = self.output_dir().join(format!("{WITNESS_NAME}.gz"));
        let witness = fs::read(&witness_path).map_err(|e| {
            AdapterError::Execution(format!("no witness at {}: {e}", witness_path.display()))
        })?;
        Ok(Witness(witness))
    }
}
