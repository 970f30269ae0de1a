use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// List branches, or create/delete one
    pub fn branch(&self, name: Option<&str>, delete: bool) -> anyhow::Result<()> {
        match (name, delete) {
            (None, _) => self.list_branches(),
            (Some(name), true) => self.delete_branch(name),
            (Some(name), false) => self.create_branch(name),
        }
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            let marker = if Some(&branch) == current.as_ref() {
                "*"
            } else {
                " "
            };
            writeln!(self.writer(), "{} {}", marker, branch)?;
        }

        Ok(())
    }

    fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;
        let head_oid = self
            .refs()
            .read_head_oid()?
            .context("cannot create a branch before the first commit")?;

        self.refs().create_branch(&branch, &head_oid)?;

        Ok(())
    }

    fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;
        let oid = self.refs().delete_branch(&branch)?;

        writeln!(
            self.writer(),
            "Deleted branch {} (was {})",
            branch,
            oid.to_short_oid()
        )?;

        Ok(())
    }
}
