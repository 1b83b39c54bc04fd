use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    RwLock,
};

use async_trait::async_trait;
use sparklight_plugin_api::AccessToken;
use toml_edit::{
    DocumentMut,
    Item,
};

use crate::domain::{
    DomainError,
    DomainResult,
};
use crate::infrastructure::config::{
    CredentialBackend,
    SparklightConfig,
};

const TOKEN_KEY: &str = "access_token";

/// Persistence for the single access token. The host decides when to call
/// `load` (startup) and `save` (settings form submit).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `None` when nothing has been saved yet
    async fn load(&self) -> DomainResult<Option<AccessToken>>;

    async fn save(&self, token: &AccessToken) -> DomainResult<()>;

    fn backend(&self) -> CredentialBackend;
}

pub struct MemoryCredentialStore {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> DomainResult<Option<AccessToken>> {
        let token = self
            .token
            .read()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {}", e)))?;
        Ok(token.clone())
    }

    async fn save(&self, token: &AccessToken) -> DomainResult<()> {
        let mut current = self
            .token
            .write()
            .map_err(|e| DomainError::InternalError(format!("Lock poisoned: {}", e)))?;
        *current = Some(token.clone());
        Ok(())
    }

    fn backend(&self) -> CredentialBackend {
        CredentialBackend::Memory
    }
}

/// Reads the token from an environment variable; cannot be saved to
pub struct EnvCredentialStore {
    var: String,
}

impl EnvCredentialStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn load(&self) -> DomainResult<Option<AccessToken>> {
        Ok(std::env::var(&self.var).ok().map(AccessToken::new))
    }

    async fn save(&self, _token: &AccessToken) -> DomainResult<()> {
        Err(DomainError::InvalidConfig(format!(
            "Access token is read from {} and cannot be saved",
            self.var
        )))
    }

    fn backend(&self) -> CredentialBackend {
        CredentialBackend::Env
    }
}

/// Keeps the token under `access_token` in a TOML file, leaving other keys
/// and comments alone.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> DomainResult<Option<DocumentMut>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DomainError::StorageError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        content.parse::<DocumentMut>().map(Some).map_err(|e| {
            DomainError::StorageError(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_document(&self, doc: &DocumentMut) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::StorageError(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let write_err = |e: std::io::Error| {
            DomainError::StorageError(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        };

        // Narrow a pre-existing file before the token lands in it
        if self.path.exists() {
            restrict_permissions(&self.path)?;
        }

        let mut file = private_file_options().open(&self.path).map_err(write_err)?;
        file.write_all(doc.to_string().as_bytes()).map_err(write_err)
    }
}

/// New token files are created owner-only
#[cfg(unix)]
fn private_file_options() -> std::fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn private_file_options() -> std::fs::OpenOptions {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    options
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> DomainResult<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        DomainError::StorageError(format!(
            "Failed to set permissions on {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> DomainResult<()> {
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> DomainResult<Option<AccessToken>> {
        let Some(doc) = self.read_document()? else {
            return Ok(None);
        };

        match doc.get(TOKEN_KEY) {
            None => Ok(None),
            Some(item) => item
                .as_str()
                .map(|token| Some(AccessToken::new(token)))
                .ok_or_else(|| {
                    DomainError::StorageError(format!(
                        "{} in {} is not a string",
                        TOKEN_KEY,
                        self.path.display()
                    ))
                }),
        }
    }

    async fn save(&self, token: &AccessToken) -> DomainResult<()> {
        let mut doc = self.read_document()?.unwrap_or_default();
        doc.insert(TOKEN_KEY, Item::Value(token.expose().into()));
        self.write_document(&doc)
    }

    fn backend(&self) -> CredentialBackend {
        CredentialBackend::File
    }
}

pub fn build_credential_store(config: &SparklightConfig) -> Arc<dyn CredentialStore> {
    match config.credentials.backend {
        CredentialBackend::File => Arc::new(FileCredentialStore::new(config.credentials_path())),
        CredentialBackend::Env => Arc::new(EnvCredentialStore::new(
            config.credentials.env_var.clone(),
        )),
        CredentialBackend::Memory => Arc::new(MemoryCredentialStore::new()),
    }
}
