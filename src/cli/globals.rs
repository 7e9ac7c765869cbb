use crate::session::{FileStorage, SessionStore};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_file: PathBuf) -> Self {
        Self {
            api_url,
            session_file,
        }
    }

    /// Session store persisted in the configured file.
    #[must_use]
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(Arc::new(FileStorage::new(self.session_file.clone())))
    }
}
