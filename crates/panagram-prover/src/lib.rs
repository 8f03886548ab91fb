//! Proof generator for the panagram verifier, called from contract tests over FFI.
//! Maps three CLI values onto the circuit inputs, executes the compiled Noir circuit,
//! proves the witness with UltraHonk over a Keccak transcript, and returns the proof
//! ABI-encoded as `bytes`. Nothing here writes to stdout; that is left to the binary.

pub mod artifact;
pub mod barretenberg;
pub mod config;
pub mod encode;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod noir;
pub mod pipeline;
mod tool;

pub use artifact::{resolve_artifact_path, CircuitArtifact};
pub use barretenberg::{BackendOptions, UltraHonkBackend};
pub use config::Config;
pub use encode::{decode_proof, encode_proof, EncodedOutput};
pub use error::AdapterError;
pub use inputs::InputRecord;
pub use noir::NoirExecutor;
pub use pipeline::{generate_proof, CircuitEngine, Proof, ProofBackend, ProveOptions, Witness};

/// One full invocation: load, map, initialize, execute, prove, encode.
pub fn run<S: AsRef<str>>(args: &[S], config: &Config) -> Result<EncodedOutput, AdapterError> {
    let path = resolve_artifact_path(config)?;
    let artifact = CircuitArtifact::load(&path)?;
    let inputs = InputRecord::from_args(args)?;

    let engine = NoirExecutor::new(&artifact, &config.noir_execute_bin)?;
    let backend = UltraHonkBackend::new(
        &artifact.bytecode,
        BackendOptions { bin: config.bb_bin.clone(), threads: 1 },
    )?;

    let proof = generate_proof(&engine, &backend, &inputs)?;
    encode_proof(&proof)
}
