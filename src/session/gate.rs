use sha2::{Digest, Sha256};

/// Unsalted digest shipped with the site's edit script
pub const DEFAULT_DIGEST: &str = "64fdd8b8fa16baaf65e380d1ab90e373bd567811ca37b22ed66afab7ebe3f11e";

/// Salted SHA-256 check in front of edit mode.
///
/// The digest ships with the site, so this only keeps casual visitors out
/// of edit mode. It is not an authentication boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordGate {
    salt: String,
    digest: String,
}

impl PasswordGate {
    pub fn new(salt: impl Into<String>, digest: &str) -> Self {
        PasswordGate {
            salt: salt.into(),
            digest: digest.trim().to_ascii_lowercase(),
        }
    }

    /// Lowercase hex of `sha256(salt + password)`
    pub fn digest_of(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn check(&self, password: &str) -> bool {
        Self::digest_of(&self.salt, password) == self.digest
    }
}

impl Default for PasswordGate {
    fn default() -> Self {
        PasswordGate::new("", DEFAULT_DIGEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gate_uses_shipped_digest() {
        let gate = PasswordGate::default();
        assert_eq!(gate, PasswordGate::new("", &DEFAULT_DIGEST.to_uppercase()));
        assert_ne!(PasswordGate::digest_of("", "author"), DEFAULT_DIGEST);
        assert!(!gate.check("author"));
        assert!(!gate.check(""));
    }

    #[test]
    fn test_gate_for_known_password() {
        let gate = PasswordGate::new("", &PasswordGate::digest_of("", "author"));
        assert!(gate.check("author"));
        assert!(!gate.check("Author"));
        assert!(!gate.check(""));
    }

    #[test]
    fn test_salted_digest() {
        let digest = PasswordGate::digest_of("pepper:", "hunter2");
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, PasswordGate::digest_of("", "hunter2"));

        let gate = PasswordGate::new("pepper:", &digest.to_uppercase());
        assert!(gate.check("hunter2"));
        assert!(!PasswordGate::new("", &digest).check("hunter2"));
    }
}
