use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum ABKEError {
    /// An attribute vector or ciphertext disagrees with the configured
    /// attribute count
    AttributeCountMismatch(usize, usize),
    /// Plaintext must carry exactly two slots per attribute
    PlaintextLengthMismatch(usize, usize),
    /// A ciphertext slot needed for decryption or serialization was left
    /// unpopulated by attribute-selective encryption
    IncompleteCiphertext(usize),
    /// A manual decoder hit a truncation, length mismatch or trailing
    /// bytes
    InvalidEncoding(&'static str),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for ABKEError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
