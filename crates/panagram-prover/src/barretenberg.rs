//! UltraHonk proving and verification through the Barretenberg CLI (`bb`).

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::json;
use tempfile::TempDir;

use crate::{
    error::AdapterError,
    pipeline::{Proof, ProofBackend, ProveOptions, Witness},
    tool::{self, ToolError},
};

/// bb sizes its thread pool from this variable.
const THREADS_ENV: &str = "HARDWARE_CONCURRENCY";
const SCHEME: &str = "ultra_honk";

/// How `bb` is invoked: which binary, and how many worker threads it may use.
#[derive(Clone, Debug)]
pub struct BackendOptions {
    pub bin: PathBuf,
    pub threads: usize,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self { bin: PathBuf::from(crate::config::DEFAULT_BB), threads: 1 }
    }
}

/// UltraHonk prover over one circuit's bytecode, staged in a private working directory.
pub struct UltraHonkBackend {
    options: BackendOptions,
    workdir: TempDir,
    bytecode_path: PathBuf,
}

impl UltraHonkBackend {
    /// Stages the circuit bytecode where `bb` can read it.
    pub fn new(bytecode: &str, options: BackendOptions) -> Result<Self, AdapterError> {
        let workdir = tempfile::Builder::new()
            .prefix("panagram-bb-")
            .tempdir()
            .map_err(|e| AdapterError::Initialization(format!("cannot create backend directory: {e}")))?;
        let bytecode_path = workdir.path().join("circuit.json");
        fs::write(&bytecode_path, json!({ "bytecode": bytecode }).to_string())
            .map_err(|e| AdapterError::Initialization(format!("cannot stage bytecode: {e}")))?;
        tracing::debug!(threads = options.threads, dir = %workdir.path().display(), "backend ready");
        Ok(Self { options, workdir, bytecode_path })
    }

    fn command(&self, subcommand: &str, options: &ProveOptions) -> Command {
        let mut cmd = Command::new(&self.options.bin);
        cmd.arg(subcommand)
            .args(["--scheme", SCHEME])
            .args(["--oracle_hash", options.oracle_hash.as_str()])
            .env(THREADS_ENV, self.options.threads.to_string());
        cmd
    }

    fn run(&self, cmd: &mut Command) -> Result<(), AdapterError> {
        let output = tool::run("bb", cmd).map_err(|e| AdapterError::ProofGeneration(e.to_string()))?;
        tool::relay("bb", &output.stdout);
        Ok(())
    }

    fn fresh_dir(&self, name: &str) -> Result<PathBuf, AdapterError> {
        let dir = self.workdir.path().join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|e| AdapterError::ProofGeneration(format!("cannot clear {}: {e}", dir.display())))?;
        }
        fs::create_dir_all(&dir)
            .map_err(|e| AdapterError::ProofGeneration(format!("cannot create {}: {e}", dir.display())))?;
        Ok(dir)
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), AdapterError> {
    fs::write(path, bytes)
        .map_err(|e| AdapterError::ProofGeneration(format!("cannot write {}: {e}", path.display())))
}

impl ProofBackend for UltraHonkBackend {
    fn prove(&self, witness: &Witness, options: &ProveOptions) -> Result<Proof, AdapterError> {
        let witness_path = self.workdir.path().join("witness.gz");
        write(&witness_path, &witness.0)?;
        let out = self.fresh_dir("proof")?;

        let mut cmd = self.command("prove", options);
        cmd.arg("-b").arg(&self.bytecode_path).arg("-w").arg(&witness_path).arg("-o").arg(&out);
        self.run(&mut cmd)?;

        let bytes = fs::read(out.join("proof"))
            .map_err(|e| AdapterError::ProofGeneration(format!("bb wrote no proof: {e}")))?;
        // older bb releases fold public inputs into the proof file
        let public_inputs = match fs::read(out.join("public_inputs")) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AdapterError::ProofGeneration(format!("cannot read public inputs: {e}")))
            }
        };
        Ok(Proof { bytes, public_inputs })
    }

    fn verify(&self, proof: &Proof, options: &ProveOptions) -> Result<bool, AdapterError> {
        let vk_dir = self.fresh_dir("vk")?;
        let mut write_vk = self.command("write_vk", options);
        write_vk.arg("-b").arg(&self.bytecode_path).arg("-o").arg(&vk_dir);
        self.run(&mut write_vk)?;

        let dir = self.fresh_dir("verify")?;
        let proof_path = dir.join("proof");
        let inputs_path = dir.join("public_inputs");
        write(&proof_path, &proof.bytes)?;
        write(&inputs_path, &proof.public_inputs)?;

        let mut verify = self.command("verify", options);
        verify
            .arg("-k")
            .arg(vk_dir.join("vk"))
            .arg("-p")
            .arg(&proof_path)
            .arg("-i")
            .arg(&inputs_path);
        match tool::run("bb", &mut verify) {
            Ok(output) => {
                tool::relay("bb", &output.stdout);
                Ok(true)
            }
            Err(ToolError::Exited { detail, .. }) => {
                tracing::warn!(%detail, "proof rejected");
                Ok(false)
            }
            Err(e @ ToolError::Spawn { .. }) => Err(AdapterError::ProofGeneration(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::OracleHash;

    #[test]
    fn prove_command_is_single_threaded_keccak_ultra_honk() {
        let backend = UltraHonkBackend::new("H4sI", BackendOptions::default()).unwrap();
        let cmd = backend.command("prove", &ProveOptions::EVM);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["prove", "--scheme", "ultra_honk", "--oracle_hash", "keccak"]);
        let threads = cmd
            .get_envs()
            .find(|(k, _)| *k == THREADS_ENV)
            .and_then(|(_, v)| v)
            .map(|v| v.to_string_lossy().into_owned());
        assert_eq!(threads.as_deref(), Some("1"));

        let poseidon = ProveOptions { oracle_hash: OracleHash::Poseidon2 };
        let args: Vec<_> = backend.command("verify", &poseidon).get_args().map(|a| a.to_os_string()).collect();
        assert_eq!(args[4], "poseidon2");
    }

    #[test]
    fn stages_bytecode_as_json() {
        let backend = UltraHonkBackend::new("H4sIAAAA", BackendOptions::default()).unwrap();
        let staged: serde_json::Value =
            serde_json::from_slice(&fs::read(&backend.bytecode_path).unwrap()).unwrap();
        assert_eq!(staged, json!({ "bytecode": "H4sIAAAA" }));
    }

    #[cfg(unix)]
    #[test]
    fn backend_failure_is_a_proof_generation_error() {
        let options = BackendOptions { bin: PathBuf::from("false"), threads: 1 };
        let backend = UltraHonkBackend::new("H4sI", options).unwrap();
        let err = backend.prove(&Witness(vec![1, 2, 3]), &ProveOptions::EVM).unwrap_err();
        assert!(matches!(err, AdapterError::ProofGeneration(_)));
        assert!(!backend.verify(&Proof { bytes: vec![0; 32], public_inputs: vec![] }, &ProveOptions::EVM).is_ok_and(|ok| ok));
    }

    #[test]
    fn verify_without_a_bb_binary_is_an_error_not_a_rejection() {
        let options = BackendOptions { bin: PathBuf::from("/nonexistent/bb"), threads: 1 };
        let backend = UltraHonkBackend::new("H4sI", options).unwrap();
        let proof = Proof { bytes: vec![0; 32], public_inputs: vec![] };
        match backend.verify(&proof, &ProveOptions::EVM) {
            Err(AdapterError::ProofGeneration(msg)) => assert!(msg.contains("failed to run bb"), "{msg}"),
            other => panic!("expected ProofGeneration, got {other:?}"),
        }
    }
}
