//! Positional command-line values to named circuit inputs.

use serde_json::{Map, Value};

use crate::{artifact::Abi, error::AdapterError};

/// Circuit input names, in the order the command line supplies them.
pub const FIELD_NAMES: [&str; 3] = ["guess_hash", "answer_double_hash", "user_address"];

pub const USAGE: &str = "usage: generate-proof <guess_hash> <answer_double_hash> <user_address>";

/// Values are passed through as given; the execution engine rejects malformed encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputRecord {
    pub guess_hash: String,
    pub answer_double_hash: String,
    pub user_address: String,
}

impl InputRecord {
    /// Builds the record from the arguments after the program name. Exactly three are required.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, AdapterError> {
        match args {
            [guess, answer, user] => Ok(Self {
                guess_hash: guess.as_ref().to_owned(),
                answer_double_hash: answer.as_ref().to_owned(),
                user_address: user.as_ref().to_owned(),
            }),
            _ => Err(AdapterError::InputMapping(format!(
                "expected 3 arguments, got {}; {USAGE}",
                args.len()
            ))),
        }
    }

    /// Name/value pairs in command-line order.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (FIELD_NAMES[0], self.guess_hash.as_str()),
            (FIELD_NAMES[1], self.answer_double_hash.as_str()),
            (FIELD_NAMES[2], self.user_address.as_str()),
        ]
    }

    /// The circuit's parameters must be exactly the three supplied fields, since
    /// the prover file always carries all of them.
    pub fn check_schema(&self, abi: &Abi) -> Result<(), AdapterError> {
        let declared: Vec<&str> = abi.parameter_names().collect();
        let unsupplied: Vec<&str> =
            declared.iter().copied().filter(|name| !FIELD_NAMES.contains(name)).collect();
        let unexpected: Vec<&str> =
            FIELD_NAMES.iter().copied().filter(|name| !declared.contains(name)).collect();

        let mut problems = Vec::new();
        if !unsupplied.is_empty() {
            problems.push(format!(
                "circuit expects inputs not supplied on the command line: {}",
                unsupplied.join(", ")
            ));
        }
        if !unexpected.is_empty() {
            problems.push(format!("circuit does not declare inputs: {}", unexpected.join(", ")));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AdapterError::InputMapping(problems.join("; ")))
        }
    }

    /// Prover file contents understood by the execution engine.
    pub fn to_prover_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
            .collect();
        Value::Object(map)
    }
}
