//! Reversible text obfuscation applied to everything written to
//! `_encrypted` files.
//!
//! This is not encryption in any security sense: the shift cipher is a fixed
//! per-character offset. The [`Cipher`] trait lets a real algorithm replace
//! it without changing how the store names, appends or searches files.

/// Key used by every file written so far.
pub const LEGACY_KEY: i32 = 10;

/// Text-to-text transform used by the encrypted store.
pub trait Cipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> String;

    fn decrypt(&self, ciphertext: &str) -> String;

    /// Whether `encrypt(a)` is a substring of `encrypt(b)` exactly when `a`
    /// is a substring of `b`. Searches may only run in cipher space when
    /// this holds.
    fn preserves_substrings(&self) -> bool {
        false
    }
}

/// Adds a fixed offset to every character's code point, without wraparound.
///
/// Printable ASCII shifted by the legacy key lands in `U+002A..=U+0088`,
/// which is stored UTF-8 encoded. A character whose shifted code point is not
/// a Unicode scalar value is left unchanged, which keeps the transform total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftCipher {
    key: i32,
}

impl ShiftCipher {
    pub fn new(key: i32) -> Self {
        Self { key }
    }

    pub fn legacy() -> Self {
        Self::new(LEGACY_KEY)
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    fn shift(text: &str, by: i64) -> String {
        text.chars()
            .map(|c| {
                i64::from(u32::from(c))
                    .checked_add(by)
                    .and_then(|code| u32::try_from(code).ok())
                    .and_then(char::from_u32)
                    .unwrap_or(c)
            })
            .collect()
    }
}

impl Default for ShiftCipher {
    fn default() -> Self {
        Self::legacy()
    }
}

impl Cipher for ShiftCipher {
    fn encrypt(&self, plaintext: &str) -> String {
        Self::shift(plaintext, i64::from(self.key))
    }

    fn decrypt(&self, ciphertext: &str) -> String {
        Self::shift(ciphertext, -i64::from(self.key))
    }

    fn preserves_substrings(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_alphabet() -> String {
        let mut text: String = (0x20u8..=0x7e).map(char::from).collect();
        text.push_str("\r\n");
        text
    }

    #[test]
    fn test_known_ciphertext() {
        let cipher = ShiftCipher::legacy();
        assert_eq!(cipher.encrypt("abc"), "klm");
        assert_eq!(cipher.encrypt("\r\n"), "\u{17}\u{14}");
        assert_eq!(cipher.encrypt("Username: "), "_}o|xkwoD*");
    }

    #[test]
    fn test_high_characters_exceed_ascii() {
        let cipher = ShiftCipher::legacy();
        let shifted = cipher.encrypt("~");
        assert_eq!(shifted, "\u{88}");
        // Stored as two UTF-8 bytes, as the legacy writer produced.
        assert_eq!(shifted.as_bytes(), &[0xc2, 0x88]);
    }

    #[test]
    fn test_round_trip_legacy_alphabet() {
        let cipher = ShiftCipher::legacy();
        let text = legacy_alphabet();
        assert_eq!(cipher.decrypt(&cipher.encrypt(&text)), text);
    }

    #[test]
    fn test_substring_preservation() {
        let cipher = ShiftCipher::legacy();
        let haystack = "Name: Bob\r\nUsername: bob\r\nPassword: pw123\r\n";
        for needle in ["Username: bob\r", "Password: pw123", "Bob"] {
            assert!(cipher.encrypt(haystack).contains(&cipher.encrypt(needle)));
        }
        assert!(!cipher.encrypt(haystack).contains(&cipher.encrypt("Username: bo\r")));
    }

    #[test]
    fn test_non_scalar_results_pass_through() {
        let cipher = ShiftCipher::new(-10);
        // Code points below the key would go negative.
        assert_eq!(cipher.encrypt("\u{5}"), "\u{5}");
        // Shifting into the surrogate block is not representable.
        let near_surrogates = ShiftCipher::new(1);
        assert_eq!(near_surrogates.encrypt("\u{d7ff}"), "\u{d7ff}");
    }

    #[test]
    fn test_extreme_keys_never_panic() {
        for key in [i32::MIN, i32::MAX] {
            let cipher = ShiftCipher::new(key);
            assert_eq!(cipher.encrypt("abc"), "abc");
            assert_eq!(cipher.decrypt("abc"), "abc");
        }
    }

    #[test]
    fn test_custom_key() {
        let cipher = ShiftCipher::new(3);
        assert_eq!(cipher.encrypt("abc"), "def");
        assert_eq!(cipher.decrypt("def"), "abc");
        assert_eq!(cipher.key(), 3);
    }
}
