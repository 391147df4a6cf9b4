use serde::{Deserialize, Serialize};

use loangate_core::SubjectId;

use crate::Role;

/// A verified caller, resolved fresh for every request.
///
/// `role` is `None` when the provider knows the subject but no role claim has
/// been assigned yet. That is different from having no identity at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject_id: SubjectId,
    role: Option<Role>,
}

impl Identity {
    pub fn new(subject_id: SubjectId, role: Option<Role>) -> Self {
        Self { subject_id, role }
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }
}
