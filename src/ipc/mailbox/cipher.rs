/*!
 * Block Cipher
 *
 * Symmetric XOR transform over 4-byte big-endian blocks. Each block is packed
 * as `a<<24 | b<<16 | c<<8 | d`, XORed with the key and unpacked in place.
 * A trailing partial block is zero-padded for the XOR and only its existing
 * bytes are written back, so the buffer never grows.
 *
 * Applying the transform twice with the same key restores the input, which
 * is how send (encrypt) and receive (decrypt) share one routine.
 */

use crate::core::limits::CIPHER_BLOCK_SIZE;
use crate::core::types::CipherKey;

/// Transform `buf` in place with `key`
pub fn xor_blocks(buf: &mut [u8], key: CipherKey) {
    for block in buf.chunks_mut(CIPHER_BLOCK_SIZE) {
        let valid = block.len();
        let mut word = [0u8; CIPHER_BLOCK_SIZE];
        word[..valid].copy_from_slice(block);

        let transformed = u32::from_be_bytes(word) ^ key;
        block.copy_from_slice(&transformed.to_be_bytes()[..valid]);
    }
}

/// Cipher bound to one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCipher {
    key: CipherKey,
}

impl BlockCipher {
    #[inline]
    pub const fn new(key: CipherKey) -> Self {
        Self { key }
    }

    /// Encrypt or decrypt; the transform is its own inverse
    #[inline]
    pub fn apply(&self, buf: &mut [u8]) {
        xor_blocks(buf, self.key);
    }
}
