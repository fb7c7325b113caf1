//! Infrastructure layer - Ciphered files on disk and the clock

pub mod cipher;
pub mod clock;
pub mod credential_index;
pub mod encrypted_store;
pub mod record_codec;

pub use cipher::{Cipher, LEGACY_KEY, ShiftCipher};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential_index::CredentialIndex;
pub use encrypted_store::{EncryptedFileStore, EntityKind, sanitize_name};
pub use record_codec::{DecodedLine, RecordFormat};
