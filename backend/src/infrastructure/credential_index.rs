//! Username/password lookup over the identity files.
//!
//! There is no separate index file: every identity file is scanned for the
//! ciphered `Username:` and `Password:` fragments of its canonical block.

use crate::domain::{IdentityHandle, IdentityProfile};
use crate::error::{EffortLoggerError, Result};
use crate::infrastructure::encrypted_store::{EncryptedFileStore, EntityKind};
use crate::infrastructure::record_codec::{credential_fragments, encode_identity};

pub const DEFAULT_USERNAME: &str = "user";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_DISPLAY_NAME: &str = "TestUser";

#[derive(Clone)]
pub struct CredentialIndex {
    store: EncryptedFileStore,
    logger: logging::Logger,
}

impl CredentialIndex {
    pub fn new(store: EncryptedFileStore, logger: logging::Logger) -> Self {
        Self { store, logger }
    }

    /// First identity file, in file-name order, whose block holds both the
    /// username and the password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<IdentityHandle>> {
        let (user_fragment, pass_fragment) = credential_fragments(username, password);
        let matches = self.store.matching_files(
            EntityKind::User,
            &[user_fragment.as_str(), pass_fragment.as_str()],
        )?;
        Ok(matches.into_iter().next().map(IdentityHandle::new))
    }

    pub fn contains_username(&self, username: &str) -> Result<bool> {
        let fragment = format!("Username: {}\r", username);
        let matches = self
            .store
            .matching_files(EntityKind::User, &[fragment.as_str()])?;
        Ok(!matches.is_empty())
    }

    /// Writes a new identity file named after the profile's display name
    /// (or the username when none is given).
    pub fn register(
        &self,
        username: &str,
        password: &str,
        profile: IdentityProfile,
    ) -> Result<IdentityHandle> {
        validate_credential("username", username)?;
        validate_credential("password", password)?;
        for (key, value) in &profile.fields {
            if key.trim().is_empty() || has_line_break(key) || has_line_break(value) {
                return Err(EffortLoggerError::InvalidInput(format!(
                    "profile field '{}' must be a single non-empty line",
                    key
                )));
            }
        }

        let display_name = profile
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(username);
        if has_line_break(display_name) {
            return Err(EffortLoggerError::InvalidInput(
                "display name must be a single line".to_string(),
            ));
        }

        let path = self.store.path_for(EntityKind::User, display_name)?;
        let block = encode_identity(display_name, username, password, &profile.fields);

        // Username check and file creation form one step for all registrations.
        self.store.with_kind_locked(EntityKind::User, || {
            if self.contains_username(username)? {
                return Err(EffortLoggerError::AlreadyExists(format!(
                    "username '{}'",
                    username
                )));
            }
            self.store.create_new(&path, &block)
        })?;

        self.logger
            .info(&format!("Registered '{}' in {}", username, path.display()));
        Ok(IdentityHandle::new(path))
    }

    /// Creates the default `user`/`password` identity unless that username
    /// is already registered. Returns the handle only when a file was written.
    pub fn seed_default_identity(&self) -> Result<Option<IdentityHandle>> {
        if self.contains_username(DEFAULT_USERNAME)? {
            return Ok(None);
        }
        match self.register(
            DEFAULT_USERNAME,
            DEFAULT_PASSWORD,
            IdentityProfile::named(DEFAULT_DISPLAY_NAME),
        ) {
            Ok(handle) => Ok(Some(handle)),
            Err(EffortLoggerError::AlreadyExists(_)) => {
                self.logger
                    .warn("Default identity file already present under another username");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

fn validate_credential(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(EffortLoggerError::InvalidInput(format!("{} is empty", field)));
    }
    if has_line_break(value) {
        return Err(EffortLoggerError::InvalidInput(format!(
            "{} must not contain line breaks",
            field
        )));
    }
    Ok(())
}
