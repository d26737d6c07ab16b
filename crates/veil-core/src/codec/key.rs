//! Password keys and the digests derived from them.

use serde::{Deserialize, Serialize};

use super::digest::sha256_hex;
use super::permutation::PermutationTable;

/// How a user-supplied password becomes the codec key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyDerivation {
    /// Use the password text as-is
    #[default]
    Raw,
    /// Use the SHA-256 hex digest of the password as the key
    Sha256,
}

impl KeyDerivation {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "sha256" | "sha-256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// A password used to key one transform.
///
/// The secret is never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordKey {
    secret: String,
}

/// The pair of tables a key produces for one image size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTables {
    /// Permutes pixel columns (x axis, `width` entries)
    pub columns: PermutationTable,
    /// Permutes pixel rows (y axis, `height` entries)
    pub rows: PermutationTable,
}

impl PasswordKey {
    /// Key from the raw password text. An empty password is valid.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Key from a password under the given derivation.
    pub fn derive(password: &str, derivation: KeyDerivation) -> Self {
        match derivation {
            KeyDerivation::Raw => Self::new(password),
            KeyDerivation::Sha256 => Self::new(sha256_hex(password)),
        }
    }

    /// SHA-256 of the key text: the digest stream behind the column
    /// (x axis) table. Its hex text is also the key of the row table.
    pub fn column_digest(&self) -> String {
        sha256_hex(&self.secret)
    }

    /// SHA-256 of [`column_digest`](Self::column_digest): the digest stream
    /// behind the row (y axis) table.
    pub fn row_digest(&self) -> String {
        sha256_hex(&self.column_digest())
    }

    /// Build both tables for a `width` x `height` image.
    pub fn axis_tables(&self, width: usize, height: usize) -> AxisTables {
        AxisTables {
            columns: PermutationTable::build(width, &self.secret),
            rows: PermutationTable::build(height, &self.column_digest()),
        }
    }
}

impl std::fmt::Debug for PasswordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let key = PasswordKey::new("hunter2");
        let shown = format!("{key:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("redacted"));
    }

    #[test]
    fn test_digest_chain() {
        let key = PasswordKey::new("test");
        assert_eq!(
            key.column_digest(),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
        assert_eq!(
            key.row_digest(),
            "7b3d979ca8330a94fa7e9e1b466d8b99e0bcdea1ec90596c0dcc8d7ef6b4300c"
        );
    }

    #[test]
    fn test_axis_tables_use_different_keys() {
        let tables = PasswordKey::new("test").axis_tables(5, 4);
        assert_eq!(tables.columns.as_slice(), &[4, 2, 0, 1, 3]);
        assert_eq!(tables.rows.as_slice(), &[3, 2, 0, 1]);
    }

    #[test]
    fn test_sha256_derivation_prehashes() {
        let raw = PasswordKey::derive("Bilt8", KeyDerivation::Raw);
        let hashed = PasswordKey::derive("Bilt8", KeyDerivation::Sha256);
        assert_eq!(hashed, PasswordKey::new(raw.column_digest()));
        assert_ne!(raw, hashed);
    }

    #[test]
    fn test_key_derivation_parse() {
        assert_eq!(KeyDerivation::parse("RAW"), Some(KeyDerivation::Raw));
        assert_eq!(KeyDerivation::parse("sha-256"), Some(KeyDerivation::Sha256));
        assert_eq!(KeyDerivation::parse("md5"), None);
        assert_eq!(KeyDerivation::default(), KeyDerivation::Raw);
    }
}
