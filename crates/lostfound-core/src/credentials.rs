//! Username to password-digest mapping stored as `username:digest` lines.

use crate::error::{Result, StoreError};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// SHA-256 a password and return the lowercase hex digest.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Usernames must be non-empty and free of the `:` field separator.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && !username.contains(':')
}

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    /// The username is already registered.
    Taken,
    /// Empty usernames and names containing `:` cannot be stored.
    InvalidUsername,
}

#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Load credentials from `path`. A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut users = BTreeMap::new();

        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
            for (index, line) in contents.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (username, digest) = match line.split_once(':') {
                    Some((username, digest))
                        if !username.is_empty() && !digest.is_empty() && !digest.contains(':') =>
                    {
                        (username, digest)
                    }
                    _ => {
                        return Err(StoreError::corrupt(
                            path,
                            format!("line {}: expected username:digest", index + 1),
                        ))
                    }
                };
                users.insert(username.to_string(), digest.to_string());
            }
        }

        tracing::debug!(path = %path.display(), count = users.len(), "Loaded credentials");
        Ok(Self {
            path: path.to_path_buf(),
            users,
        })
    }

    /// Rewrite the whole credential file.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            for (username, digest) in &self.users {
                writeln!(writer, "{username}:{digest}").map_err(|e| StoreError::io(&self.path, e))?;
            }
            writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Register a new user and persist on success.
    pub fn register(&mut self, username: &str, password: &str) -> Result<Registration> {
        if !is_valid_username(username) {
            return Ok(Registration::InvalidUsername);
        }
        if self.contains(username) {
            return Ok(Registration::Taken);
        }

        self.users
            .insert(username.to_string(), hash_password(password));
        self.save()?;
        tracing::info!(username, "Registered user");
        Ok(Registration::Created)
    }

    /// Check a password against the stored digest.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|digest| *digest == hash_password(password))
    }
}
