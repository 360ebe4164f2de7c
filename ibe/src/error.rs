use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use crypto_utils::{hashing::MaskTooLong, serde_utils::ArkSerializationError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum IBEError {
    /// The message is longer than the KDF can derive a mask for
    MessageTooLong,
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<MaskTooLong> for IBEError {
    fn from(_: MaskTooLong) -> Self {
        Self::MessageTooLong
    }
}

impl From<SerializationError> for IBEError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
