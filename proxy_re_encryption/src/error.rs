use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum PREError {
    /// The one-time signature on a CCA ciphertext did not verify
    InvalidSignature,
    /// A pairing consistency check on a CH07 ciphertext failed
    InvalidCiphertext,
    /// A pairing consistency check on an LV08 first-level ciphertext failed
    InvalidFirstLevelCiphertext,
    /// A pairing consistency check on an LV08 second-level ciphertext failed
    InvalidSecondLevelCiphertext,
    /// The plaintext point does not lie on the configured curve
    MessageNotOnCurve,
    CannotInvertZero,
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for PREError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
