//! Authentication use cases for login and registration.

use crate::domain::{IdentityHandle, IdentityProfile, UserSession};
use crate::error::Result;
use crate::infrastructure::CredentialIndex;

/// Authentication use case handler
pub struct AuthUseCase {
    credentials: CredentialIndex,
    logger: logging::Logger,
}

impl AuthUseCase {
    pub fn new(credentials: CredentialIndex, logger: logging::Logger) -> Self {
        AuthUseCase {
            credentials,
            logger,
        }
    }

    /// Opens a session for the first identity file matching both values.
    /// `Ok(None)` means the credentials matched nothing.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserSession>> {
        self.logger
            .info(&format!("Received login request for username: {}", username));

        match self.credentials.authenticate(username, password) {
            Ok(Some(handle)) => {
                self.logger.info(&format!(
                    "User {} logged in as {}",
                    username,
                    handle.display_name()
                ));
                Ok(Some(UserSession::new(handle)))
            }
            Ok(None) => {
                self.logger
                    .warn(&format!("Invalid login attempt for username: {}", username));
                Ok(None)
            }
            Err(e) => {
                self.logger
                    .error(&format!("Login lookup failed for {}: {}", username, e));
                Err(e)
            }
        }
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        profile: IdentityProfile,
    ) -> Result<IdentityHandle> {
        self.logger.info(&format!(
            "Received registration request for username: {}",
            username
        ));

        self.credentials
            .register(username, password, profile)
            .inspect_err(|e| {
                self.logger
                    .error(&format!("Registration failed for {}: {}", username, e))
            })
    }

    pub fn seed_default_identity(&self) -> Result<Option<IdentityHandle>> {
        let seeded = self.credentials.seed_default_identity()?;
        match &seeded {
            Some(handle) => self.logger.info(&format!(
                "Seeded default identity at {}",
                handle.path().display()
            )),
            None => self.logger.debug("Default identity already present"),
        }
        Ok(seeded)
    }
}
