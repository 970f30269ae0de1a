use crate::areas::repository::Repository;
use std::io::Write;

/// Bound on the first-parent walk, matching the engine's traversal cap
const MAX_LOG_DEPTH: usize = 1_000;

impl Repository {
    /// Print the first-parent history from HEAD
    pub fn log(&self) -> anyhow::Result<()> {
        let mut current = self.refs().read_head_oid()?;
        let mut depth = 0;

        while let Some(oid) = current {
            if depth >= MAX_LOG_DEPTH {
                break;
            }

            let commit = self.database().load_commit(&oid)?;

            writeln!(self.writer(), "commit {}", oid)?;
            writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
            writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {}", line)?;
            }
            writeln!(self.writer())?;

            current = commit.parent().cloned();
            depth += 1;
        }

        Ok(())
    }
}
