use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum HibeError {
    /// More components than the configured maximum depth
    PatternExceedsMaxDepth,
    /// A pattern must have exactly `max_depth` slots
    PatternInvalidDepth,
    /// The child pattern is not matched by the parent's pattern
    PatternDoesNotMatch,
    /// An identity has more components than the configured maximum depth
    IdExceedsMaxDepth,
    /// Key derivation requires the child to extend the parent by exactly
    /// one component
    NotAChildId,
    /// Signing requires the signer pattern's last slot to be free
    SignatureSlotOccupied,
    InvalidSignature,
    /// A manual decoder hit a truncation or length mismatch
    InvalidEncoding(&'static str),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for HibeError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
