use crate::error::Result;
use crate::playfair::PlayfairCipher;
use crate::railfence::RailFenceCipher;

/// The pair of keys for the two cipher stages.
///
/// Wraps a Playfair grid built from a passphrase and a rail fence with a
/// fixed rail count. Both ciphers are built once and reused for every
/// message.
#[derive(Clone)]
pub struct CipherKey {
    substitution: PlayfairCipher,
    transposition: RailFenceCipher,
}

impl CipherKey {
    /// Build both ciphers. Fails with [`crate::Error::InvalidKey`] when the
    /// passphrase has no letters or `rails` is zero.
    pub fn new(passphrase: &str, rails: usize) -> Result<Self> {
        Ok(Self {
            substitution: PlayfairCipher::new(passphrase)?,
            transposition: RailFenceCipher::new(rails)?,
        })
    }

    pub fn substitution(&self) -> &PlayfairCipher {
        &self.substitution
    }

    pub fn transposition(&self) -> &RailFenceCipher {
        &self.transposition
    }

    /// Playfair, then rail fence.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let stage1 = self.substitution.encrypt(plaintext);
        self.transposition.encrypt(&stage1)
    }

    /// Rail fence, then Playfair.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let stage1 = self.transposition.decrypt(ciphertext);
        self.substitution.decrypt(&stage1)
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("grid", &"[REDACTED]")
            .field("rails", &self.transposition.rails())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn new_valid_key() {
        let key = CipherKey::new("MONARCHY", 3).unwrap();
        assert_eq!(key.transposition().rails(), 3);
        assert_eq!(key.substitution().matrix().rows()[0], "MONAR");
    }

    #[test]
    fn invalid_parts_rejected() {
        assert!(matches!(CipherKey::new("", 3), Err(Error::InvalidKey(_))));
        assert!(matches!(CipherKey::new("KEY", 0), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn stages_compose_in_order() {
        let key = CipherKey::new("MONARCHY", 2).unwrap();
        // Playfair gives GATLMZCLRQXA; two rails then interleave it.
        assert_eq!(key.encrypt("INSTRUMENTS"), "GTMCRXALZLQA");
        assert_eq!(key.decrypt("GTMCRXALZLQA").unwrap(), "INSTRUMENTSX");
    }

    #[test]
    fn round_trip_across_rail_counts() {
        for rails in 1..=12 {
            let key = CipherKey::new("steganography", rails).unwrap();
            let ct = key.encrypt("meet me at the old mill");
            assert_eq!(key.decrypt(&ct).unwrap(), "MEETMEATTHEOLDMILXLX");
        }
    }

    #[test]
    fn debug_redacts_grid() {
        let key = CipherKey::new("secret", 4).unwrap();
        let shown = format!("{key:?}");
        assert!(!shown.contains("SECRT"));
        assert!(shown.contains("REDACTED"));
    }
}
