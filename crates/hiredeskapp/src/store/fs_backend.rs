use super::backend::KvBackend;
use crate::error::{HireError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const VALUE_EXT: &str = ".kv";
const PROBE_KEY: &str = "__probe__";

/// Key-value backend storing one file per key under a root directory.
///
/// Keys such as `wf:candidates` are percent-encoded into file names
/// (`wf%3Acandidates.kv`) so any key is a legal file name on every platform.
pub struct FsKvBackend {
    root: PathBuf,
}

impl FsKvBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", encode_key(key), VALUE_EXT))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(HireError::Io)?;
        }
        Ok(())
    }

    fn stored_keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(HireError::Io)? {
            let path = entry.map_err(HireError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(key) = name.strip_suffix(VALUE_EXT).and_then(decode_key) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl KvBackend for FsKvBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(HireError::Io)?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.path_for(key);

        // Atomic write
        let tmp = self.root.join(format!(".value-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, value).map_err(HireError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(HireError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path).map_err(HireError::Io)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in self.stored_keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .stored_keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix) && k != PROBE_KEY)
            .collect())
    }

    fn is_available(&self) -> bool {
        self.set(PROBE_KEY, "1").is_ok() && self.remove(PROBE_KEY).is_ok()
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Percent-encode everything outside `[A-Za-z0-9_-]`.
pub fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if is_plain(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Inverse of [`encode_key`]. Returns None for names this backend did not write.
pub fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if is_plain(b) => {
                out.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}
