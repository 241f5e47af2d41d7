//! The EVP-style generic back-end, built on OpenSSL.
//!
//! Each session direction owns a persistent `CipherCtx`. The key is bound
//! into the context by `set_key` and stays there; every one-shot operation
//! re-initializes the IV, runs update/finalize, and leaves the context ready
//! for the next call. This is the fastest generic back-end and uses hardware
//! acceleration (AES-NI) when available.

use openssl::cipher::{Cipher, CipherRef};
use openssl::cipher_ctx::CipherCtx;
use openssl::error::ErrorStack;

use super::super::error::CipherError;
use super::super::registry::{CipherDescriptor, CipherFlags};
use super::{BackendFailure, Direction};

/// The native cipher handle this back-end resolves names to.
pub type Handle = &'static CipherRef;

/// Resolves a descriptor to OpenSSL's cipher table.
///
/// Names OpenSSL 3 only serves from the legacy provider (rc4, blowfish,
/// single-DES, two-key DES-EDE) resolve to `None` here, as do the camellia
/// CFB modes the `openssl` crate does not expose. Unresolved names stay in
/// the registry but initialize as unsupported.
pub fn resolve(descriptor: &CipherDescriptor) -> Option<Handle> {
    let name = descriptor.alt_name.unwrap_or(descriptor.name);
    Some(match name {
        "aes-128-cfb" => Cipher::aes_128_cfb128(),
        "aes-192-cfb" => Cipher::aes_192_cfb128(),
        "aes-256-cfb" => Cipher::aes_256_cfb128(),
        "aes-128-ctr" => Cipher::aes_128_ctr(),
        "aes-192-ctr" => Cipher::aes_192_ctr(),
        "aes-256-ctr" => Cipher::aes_256_ctr(),
        "aes-128-ecb" => Cipher::aes_128_ecb(),
        "aes-192-ecb" => Cipher::aes_192_ecb(),
        "aes-256-ecb" => Cipher::aes_256_ecb(),
        "aes-128-cbc" => Cipher::aes_128_cbc(),
        "aes-192-cbc" => Cipher::aes_192_cbc(),
        "aes-256-cbc" => Cipher::aes_256_cbc(),
        "aes-128-gcm" => Cipher::aes_128_gcm(),
        "aes-192-gcm" => Cipher::aes_192_gcm(),
        "aes-256-gcm" => Cipher::aes_256_gcm(),
        "des-ede3" => Cipher::des_ede3(),
        "des-ede3-cbc" => Cipher::des_ede3_cbc(),
        "chacha20" => Cipher::chacha20(),
        "chacha20-poly1305" => Cipher::chacha20_poly1305(),
        _ => return None,
    })
}

fn stack_errno(stack: &ErrorStack) -> i64 {
    stack
        .errors()
        .first()
        .map(|error| error.code() as i64)
        .unwrap_or(-1)
}

fn operation(stack: ErrorStack) -> BackendFailure {
    BackendFailure::new(stack_errno(&stack), CipherError::CipherOperation)
}

fn set_iv_failure(stack: ErrorStack) -> BackendFailure {
    BackendFailure::new(stack_errno(&stack), CipherError::CipherOperationSetIv)
}

/// A persistent one-direction EVP context.
pub struct Context {
    ctx: CipherCtx,
    direction: Direction,
}

impl Context {
    /// Allocates a context and binds the cipher for the given direction.
    pub fn create(handle: &Handle, direction: Direction) -> Result<Context, BackendFailure> {
        let mut ctx = CipherCtx::new()
            .map_err(|stack| BackendFailure::new(stack_errno(&stack), CipherError::Malloc))?;
        match direction {
            Direction::Encrypt => ctx.encrypt_init(Some(*handle), None, None),
            Direction::Decrypt => ctx.decrypt_init(Some(*handle), None, None),
        }
        .map_err(operation)?;
        Ok(Context { ctx, direction })
    }

    /// Binds `key` into the context. Keys longer than the cipher requires are
    /// truncated; shorter ones are rejected.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), BackendFailure> {
        let required = self.ctx.key_length();
        if key.len() < required {
            return Err(BackendFailure::new(-1, CipherError::InvalidParam));
        }
        self.reinit(Some(&key[..required]), None).map_err(operation)
    }

    pub fn iv_length(&self) -> usize {
        self.ctx.iv_length()
    }

    pub fn key_length(&self) -> usize {
        self.ctx.key_length()
    }

    pub fn block_size(&self) -> usize {
        self.ctx.block_size()
    }

    fn reinit(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<(), ErrorStack> {
        match self.direction {
            Direction::Encrypt => self.ctx.encrypt_init(None, key, iv),
            Direction::Decrypt => self.ctx.decrypt_init(None, key, iv),
        }
    }

    fn disable_padding_if(&mut self, flags: CipherFlags) {
        let no_padding = match self.direction {
            Direction::Encrypt => CipherFlags::ENCRYPT_NO_PADDING,
            Direction::Decrypt => CipherFlags::DECRYPT_NO_PADDING,
        };
        if flags.contains(no_padding) {
            self.ctx.set_padding(false);
        }
    }

    fn update_and_finish(
        &mut self,
        flags: CipherFlags,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        let written = self
            .ctx
            .cipher_update(input, Some(output))
            .map_err(operation)?;
        let finished = if flags.contains(CipherFlags::NO_FINISH) {
            0
        } else {
            self.ctx
                .cipher_final(&mut output[written..])
                .map_err(operation)?
        };
        Ok(written + finished)
    }

    /// One-shot non-AEAD encrypt or decrypt, direction per the context.
    pub fn crypt(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        if !iv.is_empty() {
            self.reinit(None, Some(iv)).map_err(set_iv_failure)?;
        }
        self.disable_padding_if(flags);
        self.update_and_finish(flags, input, output)
    }

    fn bind_aead_iv(&mut self, flags: CipherFlags, iv: &[u8]) -> Result<(), BackendFailure> {
        if iv.is_empty() {
            return Ok(());
        }
        if flags.contains(CipherFlags::VARIABLE_IV_LEN) {
            self.ctx.set_iv_length(iv.len()).map_err(set_iv_failure)?;
        }
        self.reinit(None, Some(iv)).map_err(set_iv_failure)
    }

    fn feed_ad(
        &mut self,
        flags: CipherFlags,
        data_len: usize,
        ad: &[u8],
    ) -> Result<(), BackendFailure> {
        if flags.contains(CipherFlags::AEAD_SET_LENGTH_BEFORE) {
            self.ctx.set_data_len(data_len).map_err(operation)?;
        }
        if !ad.is_empty() {
            self.ctx.cipher_update(ad, None).map_err(operation)?;
        }
        Ok(())
    }

    /// One-shot AEAD encrypt; the tag is emitted after finalization into the
    /// caller's buffer at the caller's length.
    pub fn encrypt_aead(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        self.bind_aead_iv(flags, iv)?;
        self.feed_ad(flags, input.len(), ad)?;
        self.disable_padding_if(flags);
        let total = self.update_and_finish(flags, input, output)?;
        if !tag.is_empty() {
            self.ctx.tag(tag).map_err(operation)?;
        }
        Ok(total)
    }

    /// One-shot AEAD decrypt; the expected tag is set before any update so
    /// that finalization verifies it.
    pub fn decrypt_aead(
        &mut self,
        flags: CipherFlags,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &[u8],
    ) -> Result<usize, BackendFailure> {
        self.bind_aead_iv(flags, iv)?;
        if !tag.is_empty() {
            self.ctx.set_tag(tag).map_err(operation)?;
        }
        self.feed_ad(flags, input.len(), ad)?;
        self.disable_padding_if(flags);
        self.update_and_finish(flags, input, output)
    }
}
