//! Proof pipeline: execute the circuit for a witness, then prove it with backend logging silenced.
//!
//! The engine and backend sit behind traits so the ordering and failure
//! handling here do not depend on which toolchain produces witnesses and proofs.

use crate::{error::AdapterError, inputs::InputRecord, logging::SuppressedLogging};

/// Solved witness as produced by the execution engine (gzip-compressed witness stack).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness(pub Vec<u8>);

/// Backend output. Only `bytes` leaves the process; `public_inputs` are kept for verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub bytes: Vec<u8>,
    pub public_inputs: Vec<u8>,
}

/// Fiat-Shamir transcript hash the proof is generated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleHash {
    /// Matches the on-chain Solidity verifier.
    Keccak,
    Poseidon2,
}

impl OracleHash {
    pub fn as_str(self) -> &'static str {
        match self {
            OracleHash::Keccak => "keccak",
            OracleHash::Poseidon2 => "poseidon2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProveOptions {
    pub oracle_hash: OracleHash,
}

impl ProveOptions {
    /// Options for proofs checked by an EVM verifier contract.
    pub const EVM: Self = Self { oracle_hash: OracleHash::Keccak };
}

/// Executes a circuit against named inputs.
pub trait CircuitEngine {
    fn execute(&self, inputs: &InputRecord) -> Result<Witness, AdapterError>;
}

/// Turns a witness into a proof.
pub trait ProofBackend {
    fn prove(&self, witness: &Witness, options: &ProveOptions) -> Result<Proof, AdapterError>;

    /// Checks a proof against the verification key derived from the same bytecode.
    fn verify(&self, proof: &Proof, options: &ProveOptions) -> Result<bool, AdapterError>;
}

/// Executes then proves. Backend logging is off for the duration of `prove`
/// and is back on before this returns, whatever the outcome.
pub fn generate_proof<E, B>(engine: &E, backend: &B, inputs: &InputRecord) -> Result<Proof, AdapterError>
where
    E: CircuitEngine + ?Sized,
    B: ProofBackend + ?Sized,
{
    let witness = engine.execute(inputs)?;
    tracing::info!(witness_len = witness.0.len(), "witness generated");

    let proof = {
        let _quiet = SuppressedLogging::acquire()?;
        backend.prove(&witness, &ProveOptions::EVM)
    }?;
    tracing::info!(
        proof_len = proof.bytes.len(),
        public_inputs_len = proof.public_inputs.len(),
        "proof generated"
    );
    Ok(proof)
}
