//! Identity handle, profile and the per-login session

use std::path::{Path, PathBuf};

use crate::domain::EffortTimer;

/// Suffix every ciphered file name carries before its extension.
pub const ENCRYPTED_SUFFIX: &str = "_encrypted.txt";

/// Opaque reference to a located identity file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityHandle {
    path: PathBuf,
}

impl IdentityHandle {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without the `_encrypted.txt` suffix.
    pub fn display_name(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        file_name
            .strip_suffix(ENCRYPTED_SUFFIX)
            .map(str::to_string)
            .unwrap_or(file_name)
    }
}

/// Optional profile data written into a new identity file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityProfile {
    /// `Name:` line and file name; the username is used when absent.
    pub display_name: Option<String>,
    /// Extra `Key: Value` lines, in order.
    pub fields: Vec<(String, String)>,
}

impl IdentityProfile {
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }
}

/// Authenticated context owned by the caller and passed into every
/// effort-logging operation.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub handle: IdentityHandle,
    pub timer: EffortTimer,
}

impl UserSession {
    pub fn new(handle: IdentityHandle) -> Self {
        Self {
            handle,
            timer: EffortTimer::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_suffix() {
        let handle = IdentityHandle::new(PathBuf::from("/data/user_info_encrypted/Bob_encrypted.txt"));
        assert_eq!(handle.display_name(), "Bob");
    }

    #[test]
    fn test_display_name_without_suffix() {
        let handle = IdentityHandle::new(PathBuf::from("legacy.txt"));
        assert_eq!(handle.display_name(), "legacy.txt");
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = UserSession::new(IdentityHandle::new(PathBuf::from("a_encrypted.txt")));
        assert!(!session.timer.is_running());
    }
}
