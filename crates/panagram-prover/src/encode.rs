//! ABI encoding of the proof as a single Solidity `bytes` parameter.

use std::fmt;

use alloy_primitives::Bytes;
use alloy_sol_types::SolValue;

use crate::{error::AdapterError, pipeline::Proof};

/// Backend proofs are a sequence of 32-byte field elements.
pub const PROOF_WORD: usize = 32;

/// `0x`-prefixed hex of `abi.encode(bytes proof)`; the only thing written to stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedOutput(String);

impl EncodedOutput {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks the proof is whole 32-byte words and ABI-encodes it as a single `bytes` value.
pub fn encode_proof(proof: &Proof) -> Result<EncodedOutput, AdapterError> {
    let len = proof.bytes.len();
    if len == 0 {
        return Err(AdapterError::Encoding("backend returned an empty proof".into()));
    }
    if len % PROOF_WORD != 0 {
        return Err(AdapterError::Encoding(format!(
            "proof length {len} is not a multiple of {PROOF_WORD} bytes"
        )));
    }
    let abi = Bytes::copy_from_slice(&proof.bytes).abi_encode();
    Ok(EncodedOutput(format!("0x{}", hex::encode(abi))))
}

/// Inverse of [`encode_proof`]: recovers the raw proof bytes from the hex payload.
pub fn decode_proof(encoded: &str) -> Result<Vec<u8>, AdapterError> {
    let raw = hex::decode(encoded.strip_prefix("0x").unwrap_or(encoded))
        .map_err(|e| AdapterError::Encoding(format!("output is not hex: {e}")))?;
    let bytes = Bytes::abi_decode(&raw)
        .map_err(|e| AdapterError::Encoding(format!("output is not an ABI bytes value: {e}")))?;
    Ok(bytes.to_vec())
}
