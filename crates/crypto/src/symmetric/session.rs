//! The cipher session: the user-facing object of the facade.
//!
//! A session is created empty, bound to one algorithm by
//! [`CipherSession::init`], fed key and IV material any number of times, used
//! for any number of one-shot operations, and returned to the empty state by
//! [`close`](CipherSession::close) or by dropping it. Whatever the algorithm,
//! the session applies the descriptor's flags uniformly and dispatches to the
//! back-end that serves it.
//!
//! Sessions are single-owner and not internally synchronized; distinct
//! sessions are independent.

use std::ops::BitOr;

use zeroize::Zeroize;

#[cfg(feature = "sodium")]
use super::backends;
use super::error::CipherError;
use super::registry::{self, CipherDescriptor, CipherFlags, CipherMethod};
use super::xxtea;

#[cfg(any(feature = "openssl", feature = "mbedtls"))]
use super::backends::{generic, Direction};

/// Which directions a session is initialized for; a bit set of
/// [`Mode::ENCRYPT`] and [`Mode::DECRYPT`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Mode(u32);

impl Mode {
    /// Enable the encrypt direction.
    pub const ENCRYPT: Mode = Mode(0x01);
    /// Enable the decrypt direction.
    pub const DECRYPT: Mode = Mode(0x02);

    /// True iff every direction bit of `other` is set in `self`.
    pub const fn contains(self, other: Mode) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

/// Sum-typed back-end state; each variant owns exactly the context its
/// back-end needs.
enum Backend {
    None,
    Xxtea(xxtea::XxteaKey),
    #[cfg(any(feature = "openssl", feature = "mbedtls"))]
    Generic {
        enc: Option<generic::Context>,
        dec: Option<generic::Context>,
    },
    #[cfg(feature = "sodium")]
    Sodium(backends::sodium::Context),
}

fn setup_errno(last_errno: &mut i64, errno: i64, error: CipherError) -> CipherError {
    *last_errno = errno;
    error
}

/// A symmetric cipher session.
///
/// See the [module docs](self) for the lifecycle and the
/// [crate docs](crate) for an end-to-end example. All operations are
/// synchronous and CPU-bound; every failure is reported through
/// [`CipherError`] with the back-end's native code available from
/// [`last_errno`](CipherSession::last_errno), and no error poisons the
/// session.
pub struct CipherSession {
    descriptor: Option<&'static CipherDescriptor>,
    backend: Backend,
    iv: Vec<u8>,
    last_errno: i64,
}

impl CipherSession {
    /// Creates an empty session.
    pub fn new() -> CipherSession {
        CipherSession {
            descriptor: None,
            backend: Backend::None,
            iv: Vec::new(),
            last_errno: 0,
        }
    }

    /// Binds the session to the named algorithm, creating back-end contexts
    /// for the requested directions.
    ///
    /// Name matching is case-insensitive against the registry. Fails with
    /// `AlreadyInited` on a bound session, `InvalidParam` on an empty name,
    /// and `CipherNotSupport` when the name is unknown or no compiled-in
    /// back-end resolves it. For generic-cipher algorithms only the contexts
    /// for directions in `mode` are created; calling the other direction
    /// later reports `CipherDisabled`.
    pub fn init(&mut self, name: &str, mode: Mode) -> Result<(), CipherError> {
        if self.descriptor.is_some() {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::AlreadyInited,
            ));
        }
        if name.is_empty() {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::InvalidParam,
            ));
        }
        let Some(descriptor) = registry::lookup(name) else {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::CipherNotSupport,
            ));
        };

        let backend = match descriptor.method {
            CipherMethod::Xxtea => Backend::Xxtea(xxtea::XxteaKey::default()),
            CipherMethod::Cipher => self.create_generic(descriptor, mode)?,
            _ => self.create_sodium()?,
        };

        self.descriptor = Some(descriptor);
        self.backend = backend;
        Ok(())
    }

    #[cfg(any(feature = "openssl", feature = "mbedtls"))]
    fn create_generic(
        &mut self,
        descriptor: &CipherDescriptor,
        mode: Mode,
    ) -> Result<Backend, CipherError> {
        let Some(handle) = generic::resolve(descriptor) else {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::CipherNotSupport,
            ));
        };
        let enc = if mode.contains(Mode::ENCRYPT) {
            Some(
                generic::Context::create(&handle, Direction::Encrypt).map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                })?,
            )
        } else {
            None
        };
        let dec = if mode.contains(Mode::DECRYPT) {
            Some(
                generic::Context::create(&handle, Direction::Decrypt).map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                })?,
            )
        } else {
            None
        };
        Ok(Backend::Generic { enc, dec })
    }

    #[cfg(not(any(feature = "openssl", feature = "mbedtls")))]
    fn create_generic(
        &mut self,
        _descriptor: &CipherDescriptor,
        _mode: Mode,
    ) -> Result<Backend, CipherError> {
        Err(setup_errno(
            &mut self.last_errno,
            -1,
            CipherError::CipherNotSupport,
        ))
    }

    #[cfg(feature = "sodium")]
    fn create_sodium(&mut self) -> Result<Backend, CipherError> {
        Ok(Backend::Sodium(backends::sodium::Context::new()))
    }

    #[cfg(not(feature = "sodium"))]
    fn create_sodium(&mut self) -> Result<Backend, CipherError> {
        Err(setup_errno(
            &mut self.last_errno,
            -1,
            CipherError::CipherNotSupport,
        ))
    }

    /// Releases the back-end contexts and returns the session to the empty
    /// state; the IV buffer is reset, `last_errno` stays readable.
    ///
    /// Closing an already-empty session reports `NotInited` and is otherwise
    /// harmless.
    pub fn close(&mut self) -> Result<(), CipherError> {
        if self.descriptor.is_none() {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        }
        self.descriptor = None;
        self.backend = Backend::None;
        self.iv.zeroize();
        self.iv.clear();
        Ok(())
    }

    /// The registry entry this session is bound to, if initialized.
    pub fn descriptor(&self) -> Option<&'static CipherDescriptor> {
        self.descriptor
    }

    /// The back-end-native code of the most recent error (opaque; 0 after
    /// successful operations that reset it).
    pub fn last_errno(&self) -> i64 {
        self.last_errno
    }

    /// True iff the bound algorithm is an AEAD.
    pub fn is_aead(&self) -> bool {
        self.descriptor
            .is_some_and(|descriptor| descriptor.flags.contains(CipherFlags::AEAD))
    }

    /// The IV size in bytes the bound algorithm expects; 0 when the session
    /// is empty or the algorithm takes no IV.
    ///
    /// For sodium-style stream ciphers this includes the 8-byte counter
    /// prefix; for sodium-style AEAD it is the bare nonce size.
    pub fn iv_size(&self) -> usize {
        match &self.backend {
            Backend::None | Backend::Xxtea(_) => 0,
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, dec } => enc
                .as_ref()
                .or(dec.as_ref())
                .map_or(0, |context| context.iv_length()),
            #[cfg(feature = "sodium")]
            Backend::Sodium(_) => self
                .descriptor
                .map_or(0, |descriptor| backends::sodium::iv_size(descriptor.method)),
        }
    }

    /// The key size in bits the bound algorithm expects; 0 when empty.
    pub fn key_bits(&self) -> usize {
        match &self.backend {
            Backend::None => 0,
            Backend::Xxtea(_) => 128,
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, dec } => enc
                .as_ref()
                .or(dec.as_ref())
                .map_or(0, |context| context.key_length() * 8),
            #[cfg(feature = "sodium")]
            Backend::Sodium(_) => self
                .descriptor
                .map_or(0, |descriptor| backends::sodium::key_bits(descriptor.method)),
        }
    }

    /// The block size in bytes; 1 for stream and AEAD flavours, 4 for XXTEA,
    /// 0 when the session is empty.
    pub fn block_size(&self) -> usize {
        match &self.backend {
            Backend::None => 0,
            Backend::Xxtea(_) => 4,
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, dec } => enc
                .as_ref()
                .or(dec.as_ref())
                .map_or(0, |context| context.block_size()),
            #[cfg(feature = "sodium")]
            Backend::Sodium(_) => 1,
        }
    }

    /// Stores key material.
    ///
    /// Generic-cipher algorithms require at least `key_bits()/8` bytes
    /// (`InvalidParam` otherwise) and use exactly that many; XXTEA and the
    /// sodium-style methods copy up to their key size, ignore any excess, and
    /// always succeed.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        if self.descriptor.is_none() {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        }
        match &mut self.backend {
            Backend::None => Err(setup_errno(&mut self.last_errno, -1, CipherError::NotInited)),
            Backend::Xxtea(schedule) => {
                let mut secret = [0u8; 16];
                let used = key.len().min(secret.len());
                secret[..used].copy_from_slice(&key[..used]);
                *schedule = xxtea::XxteaKey::new(&secret);
                secret.zeroize();
                self.last_errno = 0;
                Ok(())
            }
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, dec } => {
                for context in enc.iter_mut().chain(dec.iter_mut()) {
                    context.set_key(key).map_err(|failure| {
                        setup_errno(&mut self.last_errno, failure.errno, failure.error)
                    })?;
                }
                self.last_errno = 0;
                Ok(())
            }
            #[cfg(feature = "sodium")]
            Backend::Sodium(context) => {
                context.set_key(key);
                self.last_errno = 0;
                Ok(())
            }
        }
    }

    /// Stores the IV verbatim.
    ///
    /// Unless the descriptor allows variable IV lengths, the length must
    /// equal [`iv_size`](CipherSession::iv_size); that covers IV-less
    /// algorithms too, which only accept an empty IV.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<(), CipherError> {
        let Some(descriptor) = self.descriptor else {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        };
        #[cfg(all(feature = "mbedtls", not(feature = "openssl")))]
        if descriptor.method == CipherMethod::Cipher && iv.len() > generic::MAX_IV_LENGTH {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::InvalidParam,
            ));
        }
        if !descriptor.flags.contains(CipherFlags::VARIABLE_IV_LEN) && self.iv_size() != iv.len() {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::InvalidParam,
            ));
        }
        self.store_iv(iv);
        Ok(())
    }

    fn store_iv(&mut self, iv: &[u8]) {
        self.iv.clear();
        self.iv.extend_from_slice(iv);
        self.last_errno = 0;
    }

    /// Empties the IV buffer.
    pub fn clear_iv(&mut self) {
        self.iv.clear();
    }

    /// An unset or short IV behaves as zero-padded up to the required size
    /// for every fixed-IV-length method that takes an IV.
    fn pad_short_iv(&mut self, descriptor: &CipherDescriptor) {
        if descriptor.method == CipherMethod::Xxtea
            || descriptor.flags.contains(CipherFlags::VARIABLE_IV_LEN)
        {
            return;
        }
        let required = self.iv_size();
        if self.iv.len() < required {
            self.iv.resize(required, 0);
        }
    }

    fn check_buffers(
        &mut self,
        input: &[u8],
        output_len: usize,
    ) -> Result<(), CipherError> {
        if input.is_empty() || output_len < input.len() + self.block_size() {
            return Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::InvalidParam,
            ));
        }
        Ok(())
    }

    /// One-shot encryption through the non-AEAD interface.
    ///
    /// `output` must hold at least `input.len() + block_size()` bytes; the
    /// number of bytes written is returned. AEAD algorithms reject this entry
    /// point with `MustCallAeadApi`.
    pub fn encrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
        let Some(descriptor) = self.descriptor else {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        };
        if self.is_aead() {
            return Err(CipherError::MustCallAeadApi);
        }
        self.check_buffers(input, output.len())?;
        self.pad_short_iv(descriptor);
        match &mut self.backend {
            Backend::None => Err(setup_errno(&mut self.last_errno, -1, CipherError::NotInited)),
            Backend::Xxtea(schedule) => {
                let written = xxtea::encrypt(schedule, input, output);
                self.last_errno = 0;
                Ok(written)
            }
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, .. } => {
                let Some(context) = enc else {
                    return Err(setup_errno(
                        &mut self.last_errno,
                        0,
                        CipherError::CipherDisabled,
                    ));
                };
                context
                    .crypt(descriptor.flags, &self.iv, input, output)
                    .map_err(|failure| {
                        setup_errno(&mut self.last_errno, failure.errno, failure.error)
                    })
            }
            #[cfg(feature = "sodium")]
            Backend::Sodium(context) => context
                .stream_xor(descriptor.method, &self.iv, input, output)
                .map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                }),
        }
    }

    /// One-shot decryption through the non-AEAD interface; the mirror of
    /// [`encrypt`](CipherSession::encrypt).
    pub fn decrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
        let Some(descriptor) = self.descriptor else {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        };
        if self.is_aead() {
            return Err(CipherError::MustCallAeadApi);
        }
        self.check_buffers(input, output.len())?;
        self.pad_short_iv(descriptor);
        match &mut self.backend {
            Backend::None => Err(setup_errno(&mut self.last_errno, -1, CipherError::NotInited)),
            Backend::Xxtea(schedule) => {
                let written = xxtea::decrypt(schedule, input, output);
                self.last_errno = 0;
                Ok(written)
            }
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { dec, .. } => {
                let Some(context) = dec else {
                    return Err(setup_errno(
                        &mut self.last_errno,
                        0,
                        CipherError::CipherDisabled,
                    ));
                };
                context
                    .crypt(descriptor.flags, &self.iv, input, output)
                    .map_err(|failure| {
                        setup_errno(&mut self.last_errno, failure.errno, failure.error)
                    })
            }
            #[cfg(feature = "sodium")]
            Backend::Sodium(context) => context
                .stream_xor(descriptor.method, &self.iv, input, output)
                .map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                }),
        }
    }

    /// One-shot AEAD encryption with detached tag.
    ///
    /// `ad` may be empty. On success the tag is written into `tag`; for
    /// sodium-style AEAD the buffer must hold at least the algorithm's tag
    /// size (`SodiumOperationTagLen` otherwise). Non-AEAD algorithms reject
    /// this entry point with `MustNotCallAeadApi`.
    pub fn encrypt_aead(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &mut [u8],
    ) -> Result<usize, CipherError> {
        let Some(descriptor) = self.descriptor else {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        };
        if !self.is_aead() {
            return Err(CipherError::MustNotCallAeadApi);
        }
        self.check_buffers(input, output.len())?;
        self.pad_short_iv(descriptor);
        match &mut self.backend {
            Backend::None | Backend::Xxtea(_) => Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::NotInited,
            )),
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { enc, .. } => {
                let Some(context) = enc else {
                    return Err(setup_errno(
                        &mut self.last_errno,
                        0,
                        CipherError::CipherDisabled,
                    ));
                };
                context
                    .encrypt_aead(descriptor.flags, &self.iv, input, output, ad, tag)
                    .map_err(|failure| {
                        setup_errno(&mut self.last_errno, failure.errno, failure.error)
                    })
            }
            #[cfg(feature = "sodium")]
            Backend::Sodium(context) => context
                .aead_encrypt(descriptor.method, &self.iv, input, output, ad, tag)
                .map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                }),
        }
    }

    /// One-shot AEAD decryption with detached tag verification.
    ///
    /// Fails with `CipherOperation` (generic back-end) or `SodiumOperation`
    /// (sodium back-end) when the ciphertext, associated data, or tag have
    /// been tampered with; nothing is reported as written in that case.
    pub fn decrypt_aead(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &[u8],
    ) -> Result<usize, CipherError> {
        let Some(descriptor) = self.descriptor else {
            return Err(setup_errno(&mut self.last_errno, 0, CipherError::NotInited));
        };
        if !self.is_aead() {
            return Err(CipherError::MustNotCallAeadApi);
        }
        self.check_buffers(input, output.len())?;
        self.pad_short_iv(descriptor);
        match &mut self.backend {
            Backend::None | Backend::Xxtea(_) => Err(setup_errno(
                &mut self.last_errno,
                -1,
                CipherError::NotInited,
            )),
            #[cfg(any(feature = "openssl", feature = "mbedtls"))]
            Backend::Generic { dec, .. } => {
                let Some(context) = dec else {
                    return Err(setup_errno(
                        &mut self.last_errno,
                        0,
                        CipherError::CipherDisabled,
                    ));
                };
                context
                    .decrypt_aead(descriptor.flags, &self.iv, input, output, ad, tag)
                    .map_err(|failure| {
                        setup_errno(&mut self.last_errno, failure.errno, failure.error)
                    })
            }
            #[cfg(feature = "sodium")]
            Backend::Sodium(context) => context
                .aead_decrypt(descriptor.method, &self.iv, input, output, ad, tag)
                .map_err(|failure| {
                    setup_errno(&mut self.last_errno, failure.errno, failure.error)
                }),
        }
    }
}

impl Default for CipherSession {
    fn default() -> CipherSession {
        CipherSession::new()
    }
}

impl Drop for CipherSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
