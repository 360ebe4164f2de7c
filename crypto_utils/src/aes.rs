//! AES-ECB and AES-CTR helpers over [`Block128`], and the deterministic
//! block generator used by the garbled-circuit engine.

use aes::{
    cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit, KeyIvInit, StreamCipher},
    Aes256,
};
pub use aes::Aes128;

use crate::block::Block128;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Build an AES-128 instance from a block-sized key.
pub fn aes128_from_block(key: &Block128) -> Aes128 {
    Aes128::new(GenericArray::from_slice(&key.to_bytes()))
}

/// ECB-encrypt a single block.
pub fn encrypt_block(cipher: &Aes128, block: Block128) -> Block128 {
    let mut buf = GenericArray::clone_from_slice(&block.to_bytes());
    cipher.encrypt_block(&mut buf);
    let mut bytes = [0u8; Block128::BYTES];
    bytes.copy_from_slice(&buf);
    Block128::from_bytes(&bytes)
}

/// ECB-encrypt a slice of blocks in place.
pub fn encrypt_blocks(cipher: &Aes128, blocks: &mut [Block128]) {
    for block in blocks.iter_mut() {
        *block = encrypt_block(cipher, *block);
    }
}

/// One-shot AES-128-CTR keystream application (big-endian counter). The
/// same call encrypts and decrypts.
pub fn aes128_ctr_apply(key: &[u8; 16], iv: &[u8; 16], data: &mut [u8]) {
    let mut ctr = Aes128Ctr::new(key.into(), iv.into());
    ctr.apply_keystream(data);
}

/// One-shot AES-256-CTR keystream application (big-endian counter).
pub fn aes256_ctr_apply(key: &[u8; 32], iv: &[u8; 16], data: &mut [u8]) {
    let mut ctr = Aes256Ctr::new(key.into(), iv.into());
    ctr.apply_keystream(data);
}

/// Deterministic block generator: AES-128-ECB encryption of a
/// monotonically increasing 128-bit little-endian counter under a seed
/// key. The counter persists for the lifetime of the generator, so a
/// generator never repeats a block.
pub struct BlockPrg {
    cipher: Aes128,
    counter: u128,
}

impl BlockPrg {
    pub fn new(seed: &Block128) -> Self {
        Self {
            cipher: aes128_from_block(seed),
            counter: 0,
        }
    }

    pub fn from_key_bytes(seed: [u8; 16]) -> Self {
        Self::new(&Block128::from_bytes(&seed))
    }

    pub fn next_block(&mut self) -> Block128 {
        let input = Block128::new((self.counter >> 64) as u64, self.counter as u64);
        self.counter += 1;
        encrypt_block(&self.cipher, input)
    }
}
