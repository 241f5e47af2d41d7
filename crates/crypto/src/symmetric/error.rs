use derive_more::{Display, Error};

/// Error taxonomy of the cipher facade.
///
/// Every failing operation returns one of these kinds and records the
/// back-end-native error code in the session's
/// [`last_errno`](super::CipherSession::last_errno). None of them poison the
/// session: after any error the session stays usable, and `close` followed by
/// `init` is the way back to a clean slate after a back-end rejection.
#[derive(Error, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// The session has not been initialized (or was already closed).
    #[display("cipher session is not initialized")]
    NotInited,
    /// `init` was called on a session that is already initialized.
    #[display("cipher session is already initialized")]
    AlreadyInited,
    /// A parameter violated the operation's contract (empty name, wrong IV
    /// length, undersized key or output buffer, ...).
    #[display("invalid parameter")]
    InvalidParam,
    /// The algorithm name is unknown, or no compiled-in back-end resolves it.
    #[display("cipher is not supported by any compiled-in back-end")]
    CipherNotSupport,
    /// The requested direction was not part of the `Mode` given to `init`.
    #[display("cipher direction was not enabled at init")]
    CipherDisabled,
    /// The generic back-end rejected an operation.
    #[display("cipher back-end operation failed")]
    CipherOperation,
    /// The generic back-end rejected the IV while binding it.
    #[display("cipher back-end rejected the IV")]
    CipherOperationSetIv,
    /// Allocating a back-end context failed.
    #[display("cipher context allocation failed")]
    Malloc,
    /// The algorithm is an AEAD; use `encrypt_aead`/`decrypt_aead`.
    #[display("algorithm is an AEAD, use the AEAD API")]
    MustCallAeadApi,
    /// The algorithm is not an AEAD; use `encrypt`/`decrypt`.
    #[display("algorithm is not an AEAD, use the non-AEAD API")]
    MustNotCallAeadApi,
    /// A sodium-style primitive failed (for AEAD decryption this means the
    /// tag did not verify).
    #[display("sodium back-end operation failed")]
    SodiumOperation,
    /// The tag buffer is shorter than the algorithm's tag size.
    #[display("tag buffer is shorter than the algorithm tag size")]
    SodiumOperationTagLen,
}
