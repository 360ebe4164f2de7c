use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum MultisigError {
    InvalidSignature,
    /// BGLS03 aggregates over the same message reduce to a forgery
    /// opportunity and are rejected wholesale
    NotAllMessagesDistinct,
    /// BGOY07 rejects an aggregate listing the same signer twice
    PublicKeysNotDistinct,
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for MultisigError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
