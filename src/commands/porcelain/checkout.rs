use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::commands::porcelain::Revision;
use std::io::Write;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around and make experimental
commits, and discard them by checking out a branch again.
"#;

impl Repository {
    /// Switch the working tree, index, and HEAD to another revision
    ///
    /// The dirty guard refuses to overwrite uncommitted local changes.
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let revision = self.resolve_revision(target)?;
        let target_oid = revision.oid().clone();

        {
            let mut index = self.index();
            index.rehydrate()?;

            let flat = self.database().flatten_commit_tree(&target_oid)?;
            let mut migration = Migration::new(self, &mut index, flat);
            migration.apply_changes()?;

            index.write_updates()?;
        }

        match revision {
            Revision::Branch(branch, _) => {
                self.refs().set_head_symbolic(&branch)?;
                writeln!(self.writer(), "Switched to branch '{}'", branch)?;
            }
            Revision::Oid(oid) => {
                self.refs().set_head_detached(&oid)?;
                writeln!(
                    self.writer(),
                    "HEAD is now at {}{}",
                    oid.to_short_oid(),
                    DETACHMENT_NOTICE
                )?;
            }
        }

        Ok(())
    }
}
