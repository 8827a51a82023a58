use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use warden_core::{Result, WardenError};

const KEYRING_SERVICE: &str = "warden";
const VAULT_DIR: &str = ".warden";
const VAULT_FILE: &str = "keys.json";

/// Which backend satisfied a secret lookup or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretBackend {
    Env,
    Keyring,
    File,
}

impl SecretBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretBackend::Env => "environment",
            SecretBackend::Keyring => "keyring",
            SecretBackend::File => "file vault",
        }
    }
}

/// Secret storage behind a single get/set interface.
///
/// Lookup order: process environment (headless/CI wins), then the OS
/// keyring, then a mode-0600 JSON vault under the home directory. Callers
/// never branch on which backend is active.
pub struct SecretVault {
    vault_path: PathBuf,
}

impl Default for SecretVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretVault {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            vault_path: home.join(VAULT_DIR).join(VAULT_FILE),
        }
    }

    /// Use a specific vault file instead of `~/.warden/keys.json`.
    pub fn with_vault_path(vault_path: PathBuf) -> Self {
        Self { vault_path }
    }

    /// Resolve a secret by name. The name doubles as the environment
    /// variable checked first, e.g. `OPENAI_API_KEY`.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        if let Ok(v) = std::env::var(name) {
            if !v.is_empty() {
                return Ok(Some(v));
            }
        }

        match keyring::Entry::new(KEYRING_SERVICE, name).and_then(|e| e.get_password()) {
            Ok(v) => return Ok(Some(v)),
            Err(keyring::Error::NoEntry) => {}
            Err(e) => {
                warn!(error = %e, secret = name, "keyring read failed, trying file vault");
            }
        }

        Ok(self.read_vault()?.remove(name))
    }

    /// Store a secret, reporting which backend took it. The keyring is
    /// preferred; the file vault is the fallback when no keyring daemon
    /// is available.
    pub fn set(&self, name: &str, value: &str) -> Result<SecretBackend> {
        match keyring::Entry::new(KEYRING_SERVICE, name).and_then(|e| e.set_password(value)) {
            Ok(()) => return Ok(SecretBackend::Keyring),
            Err(e) => {
                warn!(error = %e, secret = name, "keyring write failed, using file vault");
            }
        }

        let mut vault = self.read_vault()?;
        vault.insert(name.to_string(), value.to_string());
        self.write_vault(&vault)?;
        Ok(SecretBackend::File)
    }

    fn read_vault(&self) -> Result<BTreeMap<String, String>> {
        if !self.vault_path.is_file() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.vault_path)?;
        // A corrupt vault reads as empty.
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    fn write_vault(&self, vault: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .vault_path
            .parent()
            .ok_or_else(|| WardenError::Secret("vault path has no parent".into()))?;
        fs::create_dir_all(dir)?;
        fs::write(&self.vault_path, serde_json::to_string_pretty(vault)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
            fs::set_permissions(&self.vault_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_vault_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let vault = SecretVault::with_vault_path(dir.path().join("keys.json"));
        let mut map = BTreeMap::new();
        map.insert("TEST_KEY".to_string(), "s3cret".to_string());
        vault.write_vault(&map).unwrap();
        assert_eq!(
            vault.read_vault().unwrap().get("TEST_KEY").map(String::as_str),
            Some("s3cret")
        );
    }

    #[test]
    fn env_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let vault = SecretVault::with_vault_path(dir.path().join("keys.json"));
        // SAFETY: test-only env mutation, no concurrent reader of this var.
        unsafe { std::env::set_var("WARDEN_TEST_SECRET", "from-env") };
        let got = vault.get("WARDEN_TEST_SECRET").unwrap();
        unsafe { std::env::remove_var("WARDEN_TEST_SECRET") };
        assert_eq!(got.as_deref(), Some("from-env"));
    }
}
