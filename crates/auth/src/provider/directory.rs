use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;

use loangate_core::SubjectId;

use super::r#trait::{ProviderError, UserRecord};
use crate::Role;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read user directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse user directory: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate uid in user directory: {0}")]
    DuplicateUid(SubjectId),
}

/// Provider-side store of user records and their custom claims.
///
/// Intended for tests/dev and for the JWT provider, which verifies tokens
/// locally but still needs somewhere to write role claims.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<SubjectId, UserRecord>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Result<Self, DirectoryError> {
        let mut users = HashMap::new();
        for record in records {
            let uid = record.uid.clone();
            if users.insert(uid.clone(), record).is_some() {
                return Err(DirectoryError::DuplicateUid(uid));
            }
        }
        Ok(Self {
            users: RwLock::new(users),
        })
    }

    /// Load a JSON array of user records.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<UserRecord> = serde_json::from_str(&raw)?;
        Self::from_records(records)
    }

    pub fn insert(&self, record: UserRecord) -> Result<(), ProviderError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        users.insert(record.uid.clone(), record);
        Ok(())
    }

    pub fn get(&self, subject_id: &SubjectId) -> Result<UserRecord, ProviderError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        users
            .get(subject_id)
            .cloned()
            .ok_or_else(|| not_found(subject_id))
    }

    /// Replace the role claim of an existing subject.
    pub fn set_role(&self, subject_id: &SubjectId, role: Role) -> Result<(), ProviderError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        let record = users
            .get_mut(subject_id)
            .ok_or_else(|| not_found(subject_id))?;
        record.custom_claims.role = Some(role);
        tracing::debug!(uid = %subject_id, %role, at = %Utc::now(), "role claim written");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> ProviderError {
    ProviderError::Unavailable("user directory lock poisoned".to_string())
}

fn not_found(subject_id: &SubjectId) -> ProviderError {
    ProviderError::NotFound(format!(
        "There is no user record corresponding to the provided identifier: {subject_id}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn uid(s: &str) -> SubjectId {
        SubjectId::parse(s).unwrap()
    }

    #[test]
    fn set_role_replaces_existing_claim() {
        let dir = UserDirectory::from_records([UserRecord::new(uid("u1")).with_role(Role::User)]).unwrap();
        dir.set_role(&uid("u1"), Role::Officer).unwrap();
        assert_eq!(dir.get(&uid("u1")).unwrap().custom_claims.role, Some(Role::Officer));
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let dir = UserDirectory::new();
        assert!(matches!(dir.get(&uid("ghost")), Err(ProviderError::NotFound(_))));
        assert!(matches!(
            dir.set_role(&uid("ghost"), Role::User),
            Err(ProviderError::NotFound(msg)) if msg.contains("ghost")
        ));
    }

    #[test]
    fn duplicate_uids_are_rejected() {
        let err = UserDirectory::from_records([
            UserRecord::new(uid("u1")),
            UserRecord::new(uid("u1")),
        ])
        .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateUid(id) if id.as_str() == "u1"));
    }

    #[test]
    fn loads_json_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"uid": "m1", "email": "manager@example.com", "displayName": "Manager", "customClaims": {{"role": "manager"}}}},
                {{"uid": "u2"}}
            ]"#
        )
        .unwrap();

        let dir = UserDirectory::load_json(file.path()).unwrap();
        assert_eq!(dir.len(), 2);

        let manager = dir.get(&uid("m1")).unwrap();
        assert_eq!(manager.custom_claims.role, Some(Role::Manager));
        assert_eq!(manager.display_name.as_deref(), Some("Manager"));
        assert_eq!(dir.get(&uid("u2")).unwrap().custom_claims.role, None);
    }

    #[test]
    fn rejects_unknown_roles_in_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"uid": "x", "customClaims": {{"role": "superadmin"}}}}]"#).unwrap();
        assert!(matches!(
            UserDirectory::load_json(file.path()),
            Err(DirectoryError::Parse(_))
        ));
    }
}
