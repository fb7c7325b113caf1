//! File-per-entity storage where every byte on disk has passed through a
//! [`Cipher`].
//!
//! Layout under the base directory:
//!
//! ```text
//! user_info_encrypted/<Name>_encrypted.txt
//! planning_poker_data_encrypted/<Item_Name>_encrypted.txt
//! ```
//!
//! Files only ever grow: writes append, or create a file that does not exist
//! yet. Appends to the same path from one process are serialized.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::ENCRYPTED_SUFFIX;
use crate::error::{EffortLoggerError, Result};
use crate::infrastructure::cipher::Cipher;

/// Characters replaced in file names besides whitespace.
const HOSTILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Which family of files an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    PlanningPoker,
}

impl EntityKind {
    pub fn directory_name(&self) -> &'static str {
        match self {
            EntityKind::User => "user_info_encrypted",
            EntityKind::PlanningPoker => "planning_poker_data_encrypted",
        }
    }
}

/// Turns a display name into a file-name stem.
///
/// Leading and trailing whitespace is dropped, every inner whitespace run
/// becomes one `_`, and path separators or other characters that filesystems
/// reject become `_`.
pub fn sanitize_name(display_name: &str) -> Result<String> {
    let mut stem = String::with_capacity(display_name.len());
    let mut in_space = false;
    for c in display_name.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_control() || HOSTILE_CHARS.contains(&c) {
            stem.push('_');
        } else {
            stem.push(c);
        }
    }

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        return Err(EffortLoggerError::InvalidInput(format!(
            "'{}' cannot be used as a file name",
            display_name
        )));
    }
    Ok(stem)
}

#[derive(Clone)]
pub struct EncryptedFileStore {
    base_dir: PathBuf,
    cipher: Arc<dyn Cipher>,
    locks: Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
    logger: logging::Logger,
}

impl EncryptedFileStore {
    pub fn new(base_dir: impl Into<PathBuf>, cipher: Arc<dyn Cipher>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cipher,
            locks: Arc::new(Mutex::new(HashMap::new())),
            logger: logging::Logger::disabled(),
        }
    }

    pub fn with_logger(mut self, logger: logging::Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn directory_for(&self, kind: EntityKind) -> PathBuf {
        self.base_dir.join(kind.directory_name())
    }

    /// Path of the file holding `display_name`. Nothing is created.
    pub fn path_for(&self, kind: EntityKind, display_name: &str) -> Result<PathBuf> {
        let stem = sanitize_name(display_name)?;
        Ok(self
            .directory_for(kind)
            .join(format!("{}{}", stem, ENCRYPTED_SUFFIX)))
    }

    pub fn ensure_directory(&self, kind: EntityKind) -> Result<PathBuf> {
        let dir = self.directory_for(kind);
        fs::create_dir_all(&dir).map_err(|e| EffortLoggerError::io(&dir, e))?;
        Ok(dir)
    }

    /// Encrypts `plaintext` and appends it, creating the file and its parent
    /// directories when missing. Existing content is never truncated.
    pub fn append(&self, path: &Path, plaintext: &str) -> Result<()> {
        let lock = self.lock_for(path);
        let _guard = acquire(&lock);

        create_parent(path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| EffortLoggerError::io(path, e))?;
        file.write_all(self.cipher.encrypt(plaintext).as_bytes())
            .map_err(|e| EffortLoggerError::io(path, e))?;

        self.logger
            .debug(&format!("Appended {} bytes to {}", plaintext.len(), path.display()));
        Ok(())
    }

    /// Creates `path` holding the encrypted `plaintext`; fails with
    /// `AlreadyExists` if the file is already there.
    pub fn create_new(&self, path: &Path, plaintext: &str) -> Result<()> {
        let lock = self.lock_for(path);
        let _guard = acquire(&lock);

        create_parent(path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| EffortLoggerError::io(path, e))?;
        file.write_all(self.cipher.encrypt(plaintext).as_bytes())
            .map_err(|e| EffortLoggerError::io(path, e))?;

        self.logger.info(&format!("Created {}", path.display()));
        Ok(())
    }

    /// Stored text, still ciphered.
    pub fn read_raw(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| EffortLoggerError::io(path, e))?;
        String::from_utf8(bytes).map_err(|e| {
            EffortLoggerError::Decode(format!("{} is not valid UTF-8: {}", path.display(), e))
        })
    }

    pub fn read_all_decrypted(&self, path: &Path) -> Result<String> {
        let raw = self.read_raw(path)?;
        Ok(self.cipher.decrypt(&raw))
    }

    /// Regular files of `kind`, sorted by file name. A missing directory is
    /// an empty listing.
    pub fn list_files(&self, kind: EntityKind) -> Result<Vec<PathBuf>> {
        let dir = self.directory_for(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EffortLoggerError::io(&dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EffortLoggerError::io(&dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| EffortLoggerError::io(&entry.path(), e))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Files of `kind` whose plaintext contains `term`, in file-name order.
    ///
    /// The comparison runs on ciphertext when the cipher preserves
    /// substrings, so nothing is decrypted. A blank term matches nothing.
    pub fn search(&self, kind: EntityKind, term: &str) -> Result<Vec<PathBuf>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.matching_files(kind, &[term])?;
        self.logger.debug(&format!(
            "Search in {} matched {} file(s)",
            kind.directory_name(),
            hits.len()
        ));
        Ok(hits)
    }

    /// Whether the plaintext of `path` contains every one of `terms`.
    ///
    /// In cipher space the ciphered terms are matched against the raw bytes,
    /// so a file that is not valid UTF-8 simply does not match.
    pub fn contains_all(&self, path: &Path, terms: &[&str]) -> Result<bool> {
        if self.cipher.preserves_substrings() {
            let raw = fs::read(path).map_err(|e| EffortLoggerError::io(path, e))?;
            Ok(terms
                .iter()
                .all(|t| contains_bytes(&raw, self.cipher.encrypt(t).as_bytes())))
        } else {
            let plaintext = self.read_all_decrypted(path)?;
            Ok(terms.iter().all(|t| plaintext.contains(t)))
        }
    }

    /// Files of `kind` containing every one of `terms`, in file-name order.
    /// Files that cannot be decoded are skipped with a warning.
    pub fn matching_files(&self, kind: EntityKind, terms: &[&str]) -> Result<Vec<PathBuf>> {
        let mut hits = Vec::new();
        for path in self.list_files(kind)? {
            match self.contains_all(&path, terms) {
                Ok(true) => hits.push(path),
                Ok(false) => {}
                Err(EffortLoggerError::Decode(reason)) => {
                    self.logger.warn(&format!("Skipping {}: {}", path.display(), reason));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(hits)
    }

    /// Runs `operation` while holding a lock over every file of `kind`.
    ///
    /// Shared by all clones of this store; appends to single files are not
    /// blocked by it.
    pub fn with_kind_locked<T>(
        &self,
        kind: EntityKind,
        operation: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let lock = self.lock_for(&self.directory_for(kind));
        let _guard = acquire(&lock);
        operation()
    }

    /// Writes the decrypted content of `path` to `destination`.
    pub fn export_plaintext(&self, path: &Path, destination: &Path) -> Result<()> {
        let plaintext = self.read_all_decrypted(path)?;
        create_parent(destination)?;
        fs::write(destination, plaintext).map_err(|e| EffortLoggerError::io(destination, e))?;
        self.logger.info(&format!(
            "Exported {} to {}",
            path.display(),
            destination.display()
        ));
        Ok(())
    }

    /// Ciphers a plaintext file into the store under its file stem.
    pub fn import_plaintext(&self, kind: EntityKind, source: &Path) -> Result<PathBuf> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                EffortLoggerError::InvalidInput(format!("{} has no file name", source.display()))
            })?;
        let bytes = fs::read(source).map_err(|e| EffortLoggerError::io(source, e))?;
        let plaintext = String::from_utf8(bytes).map_err(|e| {
            EffortLoggerError::Decode(format!("{} is not valid UTF-8: {}", source.display(), e))
        })?;

        let target = self.path_for(kind, &stem)?;
        self.create_new(&target, &plaintext)?;
        Ok(target)
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

// A writer that panicked mid-append leaves nothing in memory to repair.
fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|e| e.into_inner())
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| EffortLoggerError::io(parent, e))
        }
        _ => Ok(()),
    }
}
