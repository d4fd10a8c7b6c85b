use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use super::cipher;
#[cfg(not(target_arch = "wasm32"))]
use super::envelope::KdfParams;
use crate::errors::CoreError;
use crate::models::draft::TradeDraft;
use crate::models::session::Session;

/// Everything the client keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub session: Option<Session>,
    pub draft: Option<TradeDraft>,
}

/// Where the session token and the unsent trade form live between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> PersistedState;

    fn save(&mut self, state: &PersistedState) -> Result<(), CoreError>;

    fn load_session(&self) -> Option<Session> {
        self.load().session
    }

    fn save_session(&mut self, session: Option<&Session>) -> Result<(), CoreError> {
        let mut state = self.load();
        state.session = session.cloned();
        self.save(&state)
    }

    fn clear_session(&mut self) -> Result<(), CoreError> {
        self.save_session(None)
    }

    fn load_draft(&self) -> Option<TradeDraft> {
        self.load().draft
    }

    fn save_draft(&mut self, draft: Option<&TradeDraft>) -> Result<(), CoreError> {
        let mut state = self.load();
        state.draft = draft.cloned();
        self.save(&state)
    }

    fn clear_draft(&mut self) -> Result<(), CoreError> {
        self.save_draft(None)
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: PersistedState,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            state: PersistedState {
                session: Some(session),
                draft: None,
            },
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> PersistedState {
        self.state.clone()
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), CoreError> {
        self.state = state.clone();
        Ok(())
    }
}

/// Password-sealed JSON file (Argon2id + AES-256-GCM).
///
/// The file is read once on [`EncryptedFileStore::open`] and rewritten in
/// full on every save; the in-memory copy is authoritative in between.
#[cfg(not(target_arch = "wasm32"))]
pub struct EncryptedFileStore {
    path: PathBuf,
    password: String,
    kdf: KdfParams,
    state: PersistedState,
}

#[cfg(not(target_arch = "wasm32"))]
impl EncryptedFileStore {
    /// Open `path`, or start empty if it doesn't exist yet.
    /// Fails on a wrong password or a corrupt file.
    pub fn open(path: impl AsRef<Path>, password: &str) -> Result<Self, CoreError> {
        Self::open_with(path, password, KdfParams::default())
    }

    /// As [`EncryptedFileStore::open`], with explicit Argon2id costs for
    /// the next save.
    pub fn open_with(
        path: impl AsRef<Path>,
        password: &str,
        kdf: KdfParams,
    ) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let sealed = std::fs::read(&path)?;
            let plain = cipher::open(&sealed, password)?;
            serde_json::from_slice(&plain)?
        } else {
            tracing::debug!(path = %path.display(), "No session store yet, starting empty");
            PersistedState::default()
        };

        Ok(Self {
            path,
            password: password.to_string(),
            kdf,
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .field("logged_in", &self.state.session.is_some())
            .field("has_draft", &self.state.draft.is_some())
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStore for EncryptedFileStore {
    fn load(&self) -> PersistedState {
        self.state.clone()
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), CoreError> {
        let plain = serde_json::to_vec(state)
            .map_err(|e| CoreError::Serialization(format!("session store: {e}")))?;
        let sealed = cipher::seal(&plain, &self.password, self.kdf)?;
        std::fs::write(&self.path, sealed)?;
        self.state = state.clone();
        Ok(())
    }
}
