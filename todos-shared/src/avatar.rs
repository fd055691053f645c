//! Avatar URLs
//!
//! Avatars are Gravatar URLs keyed by the MD5 of the lowercased email, with
//! Gravatar's identicon as the fallback image. MD5 is what Gravatar keys on;
//! this is not a security boundary.
//!
//! Deriving an avatar never fails. When there is no usable email the digest
//! step returns an error and [`avatar_for`] recovers with
//! [`FALLBACK_AVATAR_URL`].
//!
//! # Example
//!
//! ```
//! use todos_shared::avatar::{avatar_for, FALLBACK_AVATAR_URL};
//!
//! let url = avatar_for(Some("Fry@PlanetExpress.com"));
//! assert!(url.ends_with("?d=identicon"));
//! assert_eq!(url, avatar_for(Some("fry@planetexpress.com")));
//!
//! assert_eq!(avatar_for(None), FALLBACK_AVATAR_URL);
//! ```

use md5::{Digest, Md5};
use thiserror::Error;
use tracing::debug;

/// Base of every derived avatar URL
pub const AVATAR_BASE_URL: &str = "https://gravatar.com/avatar/";

/// Generic avatar used when no hash can be computed
pub const FALLBACK_AVATAR_URL: &str = "https://gravatar.com/avatar/?d=mp";

/// Why an email could not be digested
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarError {
    #[error("no email to hash")]
    MissingEmail,

    #[error("email is blank")]
    BlankEmail,
}

/// Lowercase hex MD5 of the normalized email
pub fn email_digest(email: Option<&str>) -> Result<String, AvatarError> {
    let email = email.ok_or(AvatarError::MissingEmail)?.trim();
    if email.is_empty() {
        return Err(AvatarError::BlankEmail);
    }

    let digest = Md5::digest(email.to_lowercase().as_bytes());
    Ok(hex::encode(digest))
}

/// Avatar URL for an email, falling back to [`FALLBACK_AVATAR_URL`]
pub fn avatar_for(email: Option<&str>) -> String {
    match email_digest(email) {
        Ok(hash) => format!("{}{}?d=identicon", AVATAR_BASE_URL, hash),
        Err(e) => {
            debug!(error = %e, "Using fallback avatar");
            FALLBACK_AVATAR_URL.to_string()
        }
    }
}
