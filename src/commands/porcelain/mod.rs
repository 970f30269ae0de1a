pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod rm;
pub mod status;

use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::errors::EngineError;
use crate::artifacts::objects::object_id::ObjectId;

/// How a revision argument resolved
pub(crate) enum Revision {
    /// A branch name with its tip commit
    Branch(BranchName, ObjectId),
    /// A raw commit digest
    Oid(ObjectId),
}

impl Revision {
    pub(crate) fn oid(&self) -> &ObjectId {
        match self {
            Revision::Branch(_, oid) => oid,
            Revision::Oid(oid) => oid,
        }
    }
}

impl Repository {
    /// Resolve a revision argument: a branch name first, then a raw digest
    pub(crate) fn resolve_revision(&self, target: &str) -> anyhow::Result<Revision> {
        if let Ok(branch) = BranchName::try_parse(target.to_string())
            && let Some(oid) = self.refs().resolve_ref(&SymRefName::for_branch(&branch))?
        {
            return Ok(Revision::Branch(branch, oid));
        }

        if let Ok(oid) = ObjectId::try_parse(target.to_string()) {
            if self.database().exists(&oid) {
                return Ok(Revision::Oid(oid));
            }
            return Err(EngineError::NotFound(target.to_string()).into());
        }

        Err(EngineError::InvalidRef(target.to_string()).into())
    }
}
