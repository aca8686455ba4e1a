//! Remember tokens: the raw value lives in the client's cookie, only its
//! HMAC-SHA256 is stored.

use base64ct::{Base64Url, Encoding};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes per remember token.
pub const REMEMBER_TOKEN_BYTES: usize = 32;

pub fn generate_remember_token() -> String {
    let mut buf = [0u8; REMEMBER_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    Base64Url::encode_string(&buf)
}

/// Number of bytes a token decodes to, or `None` when it is not valid
/// URL-safe base64.
pub fn token_len(token: &str) -> Option<usize> {
    Base64Url::decode_vec(token).ok().map(|bytes| bytes.len())
}

#[derive(Clone)]
pub struct TokenHasher {
    key: Vec<u8>,
}

impl TokenHasher {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.as_bytes().to_vec(),
        }
    }

    pub fn hash(&self, token: &str) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.key)
            .expect("HMAC can take key of any size");
        mac.update(token.as_bytes());
        Base64Url::encode_string(&mac.finalize().into_bytes())
    }
}
