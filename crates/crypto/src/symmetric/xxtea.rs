//! The XXTEA block cipher (corrected block TEA).
//!
//! XXTEA is the facade's built-in fallback: a 128-bit-key cipher over 4-byte
//! words that treats the whole buffer as a single variable-length block, so a
//! session for it can always be constructed no matter which back-ends are
//! compiled in. It takes no IV and provides no authentication.
//!
//! The primitive is also usable directly, without a session:
//!
//! ```
//! use gamekit_crypto::symmetric::xxtea;
//!
//! let key = xxtea::XxteaKey::new(b"0123456789abcdef");
//! let mut ciphertext = [0u8; 8];
//! let clen = xxtea::encrypt(&key, b"8 bytes!", &mut ciphertext);
//! let mut plaintext = [0u8; 8];
//! let plen = xxtea::decrypt(&key, &ciphertext[..clen], &mut plaintext);
//! assert_eq!(&plaintext[..plen], b"8 bytes!");
//! ```

use zeroize::Zeroize;

const DELTA: u32 = 0x9E37_79B9;

/// The number of mixing rounds for an `n`-word buffer.
fn rounds(n: usize) -> u32 {
    6 + 52 / (n as u32)
}

/// A 128-bit XXTEA key schedule (four 32-bit words, little-endian).
///
/// Zeroed on drop.
#[derive(Clone, Default)]
pub struct XxteaKey {
    words: [u32; 4],
}

impl XxteaKey {
    /// Builds a key schedule from 16 secret bytes.
    pub fn new(secret: &[u8; 16]) -> Self {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(secret.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { words }
    }
}

impl Drop for XxteaKey {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

fn mx(key: &[u32; 4], y: u32, z: u32, sum: u32, p: usize, e: u32) -> u32 {
    (((z >> 5) ^ (y << 2)).wrapping_add((y >> 3) ^ (z << 4)))
        ^ ((sum ^ y).wrapping_add(key[(p & 3) ^ (e as usize)] ^ z))
}

fn btea_encrypt(v: &mut [u32], key: &[u32; 4]) {
    let n = v.len();
    let mut sum = 0u32;
    let mut z = v[n - 1];
    for _ in 0..rounds(n) {
        sum = sum.wrapping_add(DELTA);
        let e = (sum >> 2) & 3;
        for p in 0..n - 1 {
            let y = v[p + 1];
            v[p] = v[p].wrapping_add(mx(key, y, z, sum, p, e));
            z = v[p];
        }
        let y = v[0];
        v[n - 1] = v[n - 1].wrapping_add(mx(key, y, z, sum, n - 1, e));
        z = v[n - 1];
    }
}

fn btea_decrypt(v: &mut [u32], key: &[u32; 4]) {
    let n = v.len();
    let mut sum = rounds(n).wrapping_mul(DELTA);
    let mut y = v[0];
    while sum != 0 {
        let e = (sum >> 2) & 3;
        for p in (1..n).rev() {
            let z = v[p - 1];
            v[p] = v[p].wrapping_sub(mx(key, y, z, sum, p, e));
            y = v[p];
        }
        let z = v[n - 1];
        v[0] = v[0].wrapping_sub(mx(key, y, z, sum, 0, e));
        y = v[0];
        sum = sum.wrapping_sub(DELTA);
    }
}

fn load_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn store_words(words: &[u32], bytes: &mut [u8]) {
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// Encrypts `input` in one call, writing the ciphertext into `output` and
/// returning its length.
///
/// The input is zero-padded up to the next 4-byte boundary and the padded
/// length is returned; `output` must hold at least that much. Buffers shorter
/// than two words pass through unchanged (the XXTEA rounds are defined for
/// two or more words).
pub fn encrypt(key: &XxteaKey, input: &[u8], output: &mut [u8]) -> usize {
    let padded = input.len().div_ceil(4) * 4;
    output[..input.len()].copy_from_slice(input);
    output[input.len()..padded].fill(0);
    if padded >= 8 {
        let mut words = load_words(&output[..padded]);
        btea_encrypt(&mut words, &key.words);
        store_words(&words, &mut output[..padded]);
    }
    padded
}

/// Decrypts `input` in one call, writing the plaintext into `output` and
/// returning its length (always the input length).
///
/// Trailing bytes past the last whole 4-byte word, like sub-two-word buffers,
/// are copied through unchanged.
pub fn decrypt(key: &XxteaKey, input: &[u8], output: &mut [u8]) -> usize {
    let aligned = input.len() / 4 * 4;
    output[..input.len()].copy_from_slice(input);
    if aligned >= 8 {
        let mut words = load_words(&output[..aligned]);
        btea_decrypt(&mut words, &key.words);
        store_words(&words, &mut output[..aligned]);
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> XxteaKey {
        XxteaKey::new(&[
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ])
    }

    #[test]
    fn roundtrips_aligned_buffers() {
        for len in [8usize, 12, 64, 1024] {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut ciphertext = vec![0u8; len];
            assert_eq!(len, encrypt(&key(), &plaintext, &mut ciphertext));
            assert_ne!(plaintext, ciphertext);
            let mut decrypted = vec![0u8; len];
            assert_eq!(len, decrypt(&key(), &ciphertext, &mut decrypted));
            assert_eq!(plaintext, decrypted);
        }
    }

    #[test]
    fn pads_unaligned_input_to_word_boundary() {
        let mut ciphertext = [0u8; 8];
        assert_eq!(8, encrypt(&key(), b"hello", &mut ciphertext));
        let mut decrypted = [0u8; 8];
        assert_eq!(8, decrypt(&key(), &ciphertext, &mut decrypted));
        assert_eq!(b"hello\0\0\0", &decrypted);
    }

    #[test]
    fn single_word_passes_through() {
        let mut ciphertext = [0u8; 4];
        assert_eq!(4, encrypt(&key(), b"abcd", &mut ciphertext));
        assert_eq!(b"abcd", &ciphertext);
    }

    #[test]
    fn different_keys_disagree() {
        let other = XxteaKey::new(b"yellow submarine");
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        encrypt(&key(), &[0u8; 16], &mut first);
        encrypt(&other, &[0u8; 16], &mut second);
        assert_ne!(first, second);
    }
}
