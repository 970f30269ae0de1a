use crate::areas::repository::Repository;
use crate::artifacts::core::errors::EngineError;
use crate::artifacts::merge::engine::{Merge, MergeOutcome};
use crate::artifacts::objects::commit::Author;
use std::io::Write;

impl Repository {
    /// Merge a revision into the current branch
    pub fn merge(&self, target: &str, message: Option<&str>) -> anyhow::Result<()> {
        let revision = self.resolve_revision(target)?;
        let theirs = revision.oid().clone();

        let author = Author::load_from_env();
        let default_message = format!("Merge '{}'", target);
        let message = message.unwrap_or(&default_message);

        let outcome = {
            let mut index = self.index();
            index.rehydrate()?;

            Merge::new(self, &mut index).run(target, &theirs, author, message)
        };

        match outcome {
            Ok(MergeOutcome::AlreadyUpToDate) => {
                writeln!(self.writer(), "Already up to date.")?;
            }
            Ok(MergeOutcome::FastForward(oid)) => {
                writeln!(self.writer(), "Fast-forward to {}", oid.to_short_oid())?;
            }
            Ok(MergeOutcome::Merged(oid)) => {
                writeln!(
                    self.writer(),
                    "Merge made commit {}.",
                    oid.to_short_oid()
                )?;
            }
            Err(err) => {
                if let Some(EngineError::MergeConflict { paths }) =
                    err.downcast_ref::<EngineError>()
                {
                    for path in paths {
                        writeln!(
                            self.writer(),
                            "CONFLICT (content): Merge conflict in {}",
                            path.display()
                        )?;
                    }
                    writeln!(
                        self.writer(),
                        "Automatic merge failed; fix conflicts and then commit the result."
                    )?;
                }
                return Err(err);
            }
        }

        Ok(())
    }
}
