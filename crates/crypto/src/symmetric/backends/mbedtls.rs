//! The mbedTLS generic back-end.
//!
//! Selected by building with `--features mbedtls` and without the `openssl`
//! feature; it serves the same `CIPHER`-method registry entries through
//! `mbedtls::cipher::raw`. Unlike the EVP back-end, mbedTLS carries no
//! runtime name table, so resolution maps canonical names onto
//! `(CipherId, CipherMode, key bits)` triples plus static IV/block geometry.

use mbedtls::cipher::raw::{Cipher as RawCipher, CipherId, CipherMode, CipherPadding, Operation};

use super::super::error::CipherError;
use super::super::registry::{CipherDescriptor, CipherFlags};
use super::{BackendFailure, Direction};

/// The largest IV mbedTLS accepts.
pub const MAX_IV_LENGTH: usize = 16;

/// Resolved cipher geometry for one registry entry.
#[derive(Clone, Copy)]
pub struct Handle {
    id: CipherId,
    mode: CipherMode,
    key_bits: usize,
    iv_len: usize,
    block_len: usize,
}

/// Resolves a descriptor to mbedTLS cipher parameters.
pub fn resolve(descriptor: &CipherDescriptor) -> Option<Handle> {
    let entry = |id, mode, key_bits, iv_len, block_len| {
        Some(Handle {
            id,
            mode,
            key_bits,
            iv_len,
            block_len,
        })
    };
    match descriptor.alt_name.unwrap_or(descriptor.name) {
        "rc4" => entry(CipherId::Arc4, CipherMode::STREAM, 128, 0, 1),
        "aes-128-cfb" => entry(CipherId::Aes, CipherMode::CFB, 128, 16, 16),
        "aes-192-cfb" => entry(CipherId::Aes, CipherMode::CFB, 192, 16, 16),
        "aes-256-cfb" => entry(CipherId::Aes, CipherMode::CFB, 256, 16, 16),
        "aes-128-ctr" => entry(CipherId::Aes, CipherMode::CTR, 128, 16, 16),
        "aes-192-ctr" => entry(CipherId::Aes, CipherMode::CTR, 192, 16, 16),
        "aes-256-ctr" => entry(CipherId::Aes, CipherMode::CTR, 256, 16, 16),
        "aes-128-ecb" => entry(CipherId::Aes, CipherMode::ECB, 128, 0, 16),
        "aes-192-ecb" => entry(CipherId::Aes, CipherMode::ECB, 192, 0, 16),
        "aes-256-ecb" => entry(CipherId::Aes, CipherMode::ECB, 256, 0, 16),
        "aes-128-cbc" => entry(CipherId::Aes, CipherMode::CBC, 128, 16, 16),
        "aes-192-cbc" => entry(CipherId::Aes, CipherMode::CBC, 192, 16, 16),
        "aes-256-cbc" => entry(CipherId::Aes, CipherMode::CBC, 256, 16, 16),
        "aes-128-gcm" => entry(CipherId::Aes, CipherMode::GCM, 128, 12, 16),
        "aes-192-gcm" => entry(CipherId::Aes, CipherMode::GCM, 192, 12, 16),
        "aes-256-gcm" => entry(CipherId::Aes, CipherMode::GCM, 256, 12, 16),
        "des-ecb" => entry(CipherId::Des, CipherMode::ECB, 64, 0, 8),
        "des-cbc" => entry(CipherId::Des, CipherMode::CBC, 64, 8, 8),
        "des-ede" => entry(CipherId::Des3, CipherMode::ECB, 128, 0, 8),
        "des-ede-cbc" => entry(CipherId::Des3, CipherMode::CBC, 128, 8, 8),
        "des-ede3" => entry(CipherId::Des3, CipherMode::ECB, 192, 0, 8),
        "des-ede3-cbc" => entry(CipherId::Des3, CipherMode::CBC, 192, 8, 8),
        "bf-cbc" => entry(CipherId::Blowfish, CipherMode::CBC, 128, 8, 8),
        "bf-cfb" => entry(CipherId::Blowfish, CipherMode::CFB, 128, 8, 8),
        "camellia-128-cfb" => entry(CipherId::Camellia, CipherMode::CFB, 128, 16, 16),
        "camellia-192-cfb" => entry(CipherId::Camellia, CipherMode::CFB, 192, 16, 16),
        "camellia-256-cfb" => entry(CipherId::Camellia, CipherMode::CFB, 256, 16, 16),
        _ => None,
    }
}

fn native_errno(error: &mbedtls::Error) -> i64 {
    error.to_int() as i64
}

fn operation(error: mbedtls::Error) -> BackendFailure {
    BackendFailure::new(native_errno(&error), CipherError::CipherOperation)
}

fn set_iv_failure(error: mbedtls::Error) -> BackendFailure {
    BackendFailure::new(native_errno(&error), CipherError::CipherOperationSetIv)
}

/// A persistent one-direction mbedTLS cipher context.
pub struct Context {
    cipher: RawCipher,
    handle: Handle,
    operation: Operation,
}

impl Context {
    /// Allocates and sets up a context for the given direction.
    pub fn create(handle: &Handle, direction: Direction) -> Result<Context, BackendFailure> {
        let cipher = RawCipher::setup(handle.id, handle.mode, handle.key_bits as u32)
            .map_err(operation)?;
        Ok(Context {
            cipher,
            handle: *handle,
            operation: match direction {
                Direction::Encrypt => Operation::Encrypt,
                Direction::Decrypt => Operation::Decrypt,
            },
        })
    }

    /// Binds `key`; longer keys are truncated to the cipher's size, shorter
    /// ones are rejected.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), BackendFailure> {
        let required = self.key_length();
        if key.len() < required {
            return Err(BackendFailure::new(-1, CipherError::InvalidParam));
        }
        self.cipher
            .set_key(self.operation, &key[..required])
            .map_err(operation)
    }

    pub fn iv_length(&self) -> usize {
        self.handle.iv_len
    }

    pub fn key_length(&self) -> usize {
        self.handle.key_bits / 8
    }

    pub fn block_size(&self) -> usize {
        self.handle.block_len
    }

    fn disable_padding_if(&mut self, flags: CipherFlags) -> Result<(), BackendFailure> {
        let no_padding = match self.operation {
            Operation::Encrypt => CipherFlags::ENCRYPT_NO_PADDING,
            Operation::Decrypt => CipherFlags::DECRYPT_NO_PADDING,
        };
        // mbedTLS only knows padding for CBC; other modes reject the call
        if flags.contains(no_padding) && self.handle.mode == CipherMode::CBC {
            self.cipher
                .set_padding(CipherPadding::None)
                .map_err(operation)?;
        }
        Ok(())
    }

    fn start(&mut self, iv: &[u8]) -> Result<(), BackendFailure> {
        self.cipher.set_iv(iv).map_err(set_iv_failure)?;
        self.cipher.reset().map_err(operation)
    }

    fn update_and_finish(
        &mut self,
        flags: CipherFlags,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        let written = self.cipher.update(input, output).map_err(operation)?;
        let finished = if flags.contains(CipherFlags::NO_FINISH) {
            0
        } else {
            self.cipher
                .finish(&mut output[written..])
                .map_err(operation)?
        };
        Ok(written + finished)
    }

    /// One-shot non-AEAD encrypt or decrypt.
    pub fn crypt(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        self.disable_padding_if(flags)?;
        self.start(iv)?;
        self.update_and_finish(flags, input, output)
    }

    /// One-shot AEAD encrypt with detached tag.
    pub fn encrypt_aead(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        self.start(iv)?;
        self.cipher.update_ad(ad).map_err(operation)?;
        let total = self.update_and_finish(flags, input, output)?;
        self.cipher.write_tag(tag).map_err(operation)?;
        Ok(total)
    }

    /// One-shot AEAD decrypt with detached tag verification.
    pub fn decrypt_aead(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &[u8],
    ) -> Result<usize, BackendFailure> {
        self.start(iv)?;
        self.cipher.update_ad(ad).map_err(operation)?;
        let total = self.update_and_finish(flags, input, output)?;
        self.cipher.check_tag(tag).map_err(operation)?;
        Ok(total)
    }
}
