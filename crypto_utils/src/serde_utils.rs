//! serde adapters for arkworks types: serialize any canonical-serializable
//! object as its compressed byte string.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{fmt, io, marker::PhantomData, string::ToString, vec, vec::Vec};
use serde::{
    de::{SeqAccess, Visitor},
    Deserializer, Serialize, Serializer,
};
use serde_with::{DeserializeAs, SerializeAs};

/// Adapter turning any `CanonicalSerialize` type into compressed bytes for
/// serde. Use as `#[serde_as(as = "ArkObjectBytes")]`.
pub struct ArkObjectBytes;

impl<T: CanonicalSerialize> SerializeAs<T> for ArkObjectBytes {
    fn serialize_as<S>(elem: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bytes = vec![];
        elem.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_bytes(&bytes)
    }
}

impl<'de, T: CanonicalDeserialize> DeserializeAs<'de, T> for ArkObjectBytes {
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BytesVisitor<T>(PhantomData<T>);

        impl<'a, T: CanonicalDeserialize> Visitor<'a> for BytesVisitor<T> {
            type Value = T;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("expected the compressed serialization of an object")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'a>,
            {
                let mut bytes: Vec<u8> = Vec::with_capacity(seq.size_hint().unwrap_or(48));
                while let Some(b) = seq.next_element()? {
                    bytes.push(b);
                }
                T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                T::deserialize_compressed(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(BytesVisitor::<T>(PhantomData))
    }
}

/// Remote derive for `ark_serialize::SerializationError` so error enums
/// holding it can `#[derive(Serialize)]`.
#[derive(Serialize)]
#[serde(remote = "SerializationError")]
pub enum ArkSerializationError {
    NotEnoughSpace,
    InvalidData,
    UnexpectedFlags,
    #[serde(serialize_with = "io_error_string")]
    IoError(io::Error),
}

fn io_error_string<S>(error: &io::Error, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&error.to_string())
}
