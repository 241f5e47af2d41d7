//! The algorithm registry: an ordered catalogue of every cipher the facade
//! knows about, plus name resolution and enumeration.
//!
//! The catalogue is scanned linearly and the first case-insensitive name
//! match wins. That ordering is part of the public contract: `chacha20` and
//! `chacha20-poly1305-ietf` exist both as generic-cipher entries and as
//! sodium entries, and in builds with both back-ends the generic entry is
//! listed first and therefore services the name.

use std::ops::BitOr;
use std::sync::OnceLock;

/// How a registry entry is dispatched to a back-end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CipherMethod {
    /// Built-in XXTEA block cipher, no back-end dependency.
    Xxtea,
    /// Generic cipher back-end (OpenSSL-compatible EVP, or mbedTLS).
    Cipher,
    /// ChaCha20 with the original 8-byte nonce (sodium-style).
    SodiumChaCha20,
    /// ChaCha20 with the IETF 12-byte nonce (sodium-style).
    SodiumChaCha20Ietf,
    /// XChaCha20 with a 24-byte nonce (sodium-style).
    SodiumXChaCha20,
    /// Salsa20 with an 8-byte nonce (sodium-style).
    SodiumSalsa20,
    /// XSalsa20 with a 24-byte nonce (sodium-style).
    SodiumXSalsa20,
    /// ChaCha20-Poly1305 with the original 8-byte nonce (sodium-style AEAD).
    SodiumChaCha20Poly1305,
    /// ChaCha20-Poly1305 with the IETF 12-byte nonce (sodium-style AEAD).
    SodiumChaCha20Poly1305Ietf,
    /// XChaCha20-Poly1305 with a 24-byte nonce (sodium-style AEAD).
    SodiumXChaCha20Poly1305Ietf,
}

/// Per-algorithm behavior flags, a plain bit set.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CipherFlags(u32);

impl CipherFlags {
    /// No special behavior.
    pub const NONE: CipherFlags = CipherFlags(0);
    /// Skip the back-end's finalization step after the data update.
    pub const NO_FINISH: CipherFlags = CipherFlags(0x0001);
    /// Authenticated encryption; only the AEAD entry points are valid.
    pub const AEAD: CipherFlags = CipherFlags(0x0010);
    /// The IV length is caller-chosen and must be announced to the back-end.
    pub const VARIABLE_IV_LEN: CipherFlags = CipherFlags(0x0020);
    /// The plaintext length must be announced before the first data update.
    pub const AEAD_SET_LENGTH_BEFORE: CipherFlags = CipherFlags(0x0040);
    /// Disable the back-end's automatic padding when decrypting.
    pub const DECRYPT_NO_PADDING: CipherFlags = CipherFlags(0x0100);
    /// Disable the back-end's automatic padding when encrypting.
    pub const ENCRYPT_NO_PADDING: CipherFlags = CipherFlags(0x0200);

    /// True iff every bit of `other` is set in `self`.
    pub const fn contains(self, other: CipherFlags) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for CipherFlags {
    type Output = CipherFlags;

    fn bitor(self, rhs: CipherFlags) -> CipherFlags {
        CipherFlags(self.0 | rhs.0)
    }
}

/// One immutable registry entry binding a canonical algorithm name to its
/// dispatch method and behavior flags.
#[derive(Debug)]
pub struct CipherDescriptor {
    /// Canonical, case-insensitive algorithm name (e.g. `aes-256-gcm`).
    pub name: &'static str,
    /// Dispatch method.
    pub method: CipherMethod,
    /// Back-end-specific name, when it differs from the canonical one.
    pub alt_name: Option<&'static str>,
    /// Behavior flags applied uniformly by the session.
    pub flags: CipherFlags,
}

#[cfg(any(feature = "openssl", feature = "mbedtls"))]
fn row(
    name: &'static str,
    method: CipherMethod,
    alt_name: Option<&'static str>,
    flags: CipherFlags,
) -> CipherDescriptor {
    CipherDescriptor {
        name,
        method,
        alt_name,
        flags,
    }
}

fn build_catalogue() -> Vec<CipherDescriptor> {
    let mut table = vec![CipherDescriptor {
        name: "xxtea",
        method: CipherMethod::Xxtea,
        alt_name: None,
        flags: CipherFlags::NONE,
    }];

    #[cfg(any(feature = "openssl", feature = "mbedtls"))]
    {
        let no_padding = CipherFlags::ENCRYPT_NO_PADDING | CipherFlags::DECRYPT_NO_PADDING;
        table.push(row("rc4", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-128-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-192-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-256-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-128-ctr", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-192-ctr", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-256-ctr", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("aes-128-ecb", CipherMethod::Cipher, None, no_padding));
        table.push(row("aes-192-ecb", CipherMethod::Cipher, None, no_padding));
        table.push(row("aes-256-ecb", CipherMethod::Cipher, None, no_padding));
        table.push(row("aes-128-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("aes-192-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("aes-256-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-ecb", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-ede", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-ede-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-ede3", CipherMethod::Cipher, None, no_padding));
        table.push(row("des-ede3-cbc", CipherMethod::Cipher, None, no_padding));
        // bf-ecb is left out: no two back-ends agree on its output
        table.push(row("bf-cbc", CipherMethod::Cipher, None, no_padding));
        table.push(row("bf-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("camellia-128-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("camellia-192-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
        table.push(row("camellia-256-cfb", CipherMethod::Cipher, None, CipherFlags::NONE));
    }

    // chacha20 through the EVP interface needs openssl 1.1.0 or later; the
    // entry must stay ahead of the sodium one so that dual-back-end builds
    // keep servicing the name through the generic back-end.
    #[cfg(feature = "openssl")]
    table.push(row("chacha20", CipherMethod::Cipher, None, CipherFlags::NONE));

    #[cfg(feature = "sodium")]
    {
        let stream = |name, method| CipherDescriptor {
            name,
            method,
            alt_name: None,
            flags: CipherFlags::NONE,
        };
        table.push(stream("chacha20", CipherMethod::SodiumChaCha20));
        table.push(stream("chacha20-ietf", CipherMethod::SodiumChaCha20Ietf));
        table.push(stream("xchacha20", CipherMethod::SodiumXChaCha20));
        table.push(stream("salsa20", CipherMethod::SodiumSalsa20));
        table.push(stream("xsalsa20", CipherMethod::SodiumXSalsa20));
    }

    #[cfg(any(feature = "openssl", feature = "mbedtls"))]
    {
        let aead = CipherFlags::AEAD | CipherFlags::VARIABLE_IV_LEN;
        table.push(row("aes-128-gcm", CipherMethod::Cipher, None, aead));
        table.push(row("aes-192-gcm", CipherMethod::Cipher, None, aead));
        table.push(row("aes-256-gcm", CipherMethod::Cipher, None, aead));
        #[cfg(feature = "openssl")]
        table.push(row(
            "chacha20-poly1305-ietf",
            CipherMethod::Cipher,
            Some("chacha20-poly1305"),
            aead,
        ));
    }

    #[cfg(feature = "sodium")]
    {
        let aead = |name, method| CipherDescriptor {
            name,
            method,
            alt_name: None,
            flags: CipherFlags::AEAD,
        };
        table.push(aead("chacha20-poly1305", CipherMethod::SodiumChaCha20Poly1305));
        table.push(aead(
            "chacha20-poly1305-ietf",
            CipherMethod::SodiumChaCha20Poly1305Ietf,
        ));
        table.push(aead(
            "xchacha20-poly1305-ietf",
            CipherMethod::SodiumXChaCha20Poly1305Ietf,
        ));
    }

    table
}

pub(crate) fn catalogue() -> &'static [CipherDescriptor] {
    static TABLE: OnceLock<Vec<CipherDescriptor>> = OnceLock::new();
    TABLE.get_or_init(build_catalogue)
}

/// Looks up a registry entry by canonical name, case-insensitively.
///
/// Returns the first matching entry in registry order; `None` for unknown
/// names. A returned descriptor is not a promise that the back-end resolves
/// the algorithm at runtime, only that the name is in the catalogue.
pub fn lookup(name: &str) -> Option<&'static CipherDescriptor> {
    catalogue()
        .iter()
        .find(|descriptor| descriptor.name.eq_ignore_ascii_case(name))
}

#[cfg(any(feature = "openssl", feature = "mbedtls"))]
fn generic_resolves(descriptor: &CipherDescriptor) -> bool {
    super::backends::generic::resolve(descriptor).is_some()
}

#[cfg(not(any(feature = "openssl", feature = "mbedtls")))]
fn generic_resolves(_descriptor: &CipherDescriptor) -> bool {
    false
}

/// Enumerates the canonical names whose back-end resolves in this build, in
/// registry order.
///
/// The list is computed once and cached. A name registered by two back-ends
/// appears once per resolvable entry, matching the registry's dispatch order.
pub fn list_available() -> &'static [&'static str] {
    static NAMES: OnceLock<Vec<&'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        catalogue()
            .iter()
            .filter(|descriptor| match descriptor.method {
                CipherMethod::Xxtea => true,
                CipherMethod::Cipher => generic_resolves(descriptor),
                _ => true,
            })
            .map(|descriptor| descriptor.name)
            .collect()
    })
}

const NAME_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', ';', ',', ':'];

/// Splits the next cipher name off a delimited configuration string.
///
/// Skips leading delimiters (space, tab, CR, LF, comma, semicolon, colon) and
/// returns the next token together with the unparsed remainder, or `None`
/// once only delimiters are left. No allocation takes place.
pub fn ciphertok(input: &str) -> Option<(&str, &str)> {
    let rest = input.trim_start_matches(NAME_DELIMITERS);
    if rest.is_empty() {
        return None;
    }
    let end = rest.find(NAME_DELIMITERS).unwrap_or(rest.len());
    Some((&rest[..end], &rest[end..]))
}

/// Iterates over every cipher name in a delimited configuration string, e.g.
/// `"aes-256-gcm, chacha20-poly1305-ietf"`.
pub fn split_cipher_names(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = input;
    std::iter::from_fn(move || {
        let (token, remainder) = ciphertok(rest)?;
        rest = remainder;
        Some(token)
    })
}
