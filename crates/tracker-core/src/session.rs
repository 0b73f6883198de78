//! ============================================================================
//! SessionStore - Persisted Client Session (redb)
//! ============================================================================
//! Role, anonymous citizen id, and bearer token, persisted across runs.
//! Default path: ~/.civitrack/session.redb (override via CIVITRACK_DB_PATH)
//! If the store cannot be opened the session falls back to an in-memory
//! backend, which makes the client behave as an always-anonymous citizen.
//! ============================================================================

use std::path::{Path, PathBuf};

use redb::{backends::InMemoryBackend, Database, TableDefinition};
use tracing::{debug, warn};

use crate::types::Role;

const SESSION: TableDefinition<&str, &str> = TableDefinition::new("session");

/// Fixed storage keys, shared with the browser client of the same backend.
pub const ROLE_KEY: &str = "cst_role";
pub const CITIZEN_ID_KEY: &str = "cst_citizen_id";
pub const TOKEN_KEY: &str = "cst_token";

/// Placeholder the backend hands out for unidentified public traffic.
/// Never a real citizen identity, so reads treat it as absent.
pub const ANONYMOUS_PLACEHOLDER: &str = "public-citizen";

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Open (or create) the session store at the given path.
    /// If `path` is None, uses CIVITRACK_DB_PATH or ~/.civitrack/session.redb.
    /// Never fails: an unusable file store degrades to in-memory.
    pub fn open(path: Option<&Path>) -> Self {
        match Self::open_file(path) {
            Ok(db) => Self { db },
            Err(e) => {
                warn!("Session store unavailable ({}), running anonymous in-memory", e);
                Self::in_memory()
            }
        }
    }

    /// A store that lives only for this process. Used as the degraded mode
    /// and by tests.
    pub fn in_memory() -> Self {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .expect("in-memory session store");
        let store = Self { db };
        store.ensure_table();
        store
    }

    fn open_file(path: Option<&Path>) -> Result<Database, String> {
        let db_path = if let Some(p) = path {
            PathBuf::from(p)
        } else if let Ok(env_path) = std::env::var(crate::config::DB_PATH_ENV) {
            PathBuf::from(env_path)
        } else {
            let home = dirs::home_dir().ok_or("cannot determine home directory")?;
            let dir = home.join(".civitrack");
            std::fs::create_dir_all(&dir)
                .map_err(|e| format!("failed to create .civitrack directory: {}", e))?;
            dir.join("session.redb")
        };

        debug!("Opening session store at: {}", db_path.display());

        let db = Database::create(&db_path).map_err(|e| format!("failed to open store: {}", e))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| format!("failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(SESSION)
                .map_err(|e| format!("failed to create session table: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| format!("failed to commit init: {}", e))?;

        Ok(db)
    }

    fn ensure_table(&self) {
        if let Ok(txn) = self.db.begin_write() {
            let created = txn.open_table(SESSION).is_ok();
            if created {
                let _ = txn.commit();
            }
        }
    }

    // ========================================================================
    // Raw key access - reads default, writes are best-effort
    // ========================================================================

    fn read_key(&self, key: &str) -> Option<String> {
        let read_txn = match self.db.begin_read() {
            Ok(t) => t,
            Err(e) => {
                warn!("Session read failed: {}", e);
                return None;
            }
        };
        let table = match read_txn.open_table(SESSION) {
            Ok(t) => t,
            Err(e) => {
                warn!("Session table unavailable: {}", e);
                return None;
            }
        };
        match table.get(key) {
            Ok(Some(v)) => Some(v.value().to_string()),
            Ok(None) => None,
            Err(e) => {
                warn!("Session read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Apply all pairs in one transaction; `None` removes the key.
    /// Persistence failures are logged and otherwise ignored: the session
    /// then simply does not survive the process, which is the safe default.
    fn write_keys(&self, pairs: &[(&str, Option<&str>)]) {
        let write_txn = match self.db.begin_write() {
            Ok(t) => t,
            Err(e) => {
                warn!("Session write failed: {}", e);
                return;
            }
        };
        {
            let mut table = match write_txn.open_table(SESSION) {
                Ok(t) => t,
                Err(e) => {
                    warn!("Session table unavailable: {}", e);
                    return;
                }
            };
            for (key, value) in pairs {
                let result = match value {
                    Some(v) => table.insert(*key, *v).map(|_| ()),
                    None => table.remove(*key).map(|_| ()),
                };
                if let Err(e) = result {
                    warn!("Session write failed for {}: {}", key, e);
                    return;
                }
            }
        }
        if let Err(e) = write_txn.commit() {
            warn!("Session commit failed: {}", e);
        }
    }

    // ========================================================================
    // Role
    // ========================================================================

    /// Stored role, defaulting to citizen when unset or unreadable.
    pub fn role(&self) -> Role {
        self.read_key(ROLE_KEY)
            .and_then(|v| Role::parse(&v))
            .unwrap_or_default()
    }

    pub fn set_role(&self, role: Role) {
        self.write_keys(&[(ROLE_KEY, Some(role.as_str()))]);
        debug!("Session role set to {}", role.as_str());
    }

    pub fn is_citizen(&self) -> bool {
        self.role() == Role::Citizen
    }

    pub fn is_staff(&self) -> bool {
        self.role() == Role::Staff
    }

    // ========================================================================
    // Citizen identity
    // ========================================================================

    /// Stored citizen id, with the `public-citizen` placeholder treated as
    /// absent so it is never sent as if it were a real identity.
    pub fn citizen_id(&self) -> String {
        match self.read_key(CITIZEN_ID_KEY) {
            Some(v) if !v.is_empty() && v != ANONYMOUS_PLACEHOLDER => v,
            _ => String::new(),
        }
    }

    pub fn set_citizen_id(&self, id: &str) {
        self.write_keys(&[(CITIZEN_ID_KEY, Some(id))]);
        debug!("Session citizen id stored");
    }

    // ========================================================================
    // Auth token
    // ========================================================================

    pub fn token(&self) -> Option<String> {
        self.read_key(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Persist token and role together, atomically.
    pub fn save_auth(&self, token: &str, role: Role) {
        self.write_keys(&[(TOKEN_KEY, Some(token)), (ROLE_KEY, Some(role.as_str()))]);
        debug!("Session auth saved for role {}", role.as_str());
    }

    /// Clear token and role together. The citizen id is left in place: it
    /// identifies the anonymous session, not the login.
    pub fn logout(&self) {
        self.write_keys(&[(TOKEN_KEY, None), (ROLE_KEY, None)]);
        debug!("Session auth cleared");
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_anonymous_citizen() {
        let s = SessionStore::in_memory();
        assert_eq!(s.role(), Role::Citizen);
        assert!(s.is_citizen());
        assert!(!s.is_staff());
        assert_eq!(s.citizen_id(), "");
        assert!(s.token().is_none());
        assert!(!s.is_logged_in());
    }

    #[test]
    fn test_placeholder_citizen_id_reads_as_absent() {
        let s = SessionStore::in_memory();
        s.set_citizen_id(ANONYMOUS_PLACEHOLDER);
        assert_eq!(s.citizen_id(), "");

        s.set_citizen_id("66f0a1b2c3");
        assert_eq!(s.citizen_id(), "66f0a1b2c3");
    }

    #[test]
    fn test_save_auth_and_logout_round_trip() {
        let s = SessionStore::in_memory();
        s.save_auth("tok-123", Role::Staff);
        assert!(s.is_logged_in());
        assert!(s.is_staff());

        s.logout();
        assert!(!s.is_logged_in());
        // role falls back to the citizen default once cleared
        assert_eq!(s.role(), Role::Citizen);
    }

    #[test]
    fn test_role_round_trip() {
        let s = SessionStore::in_memory();
        s.set_role(Role::Staff);
        assert_eq!(s.role(), Role::Staff);
        s.set_role(Role::Citizen);
        assert_eq!(s.role(), Role::Citizen);
    }
}
