use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use std::io::Write;

impl Repository {
    /// Show the working tree status
    pub fn status(&self) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let report = Inspector::new(self).report(&index)?;

        match self.refs().current_branch()? {
            Some(branch) => writeln!(self.writer(), "On branch {}", branch)?,
            None => writeln!(self.writer(), "HEAD detached")?,
        }

        if !report.staged.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (path, change) in &report.staged {
                writeln!(self.writer(), "\t{} {}", change.label(), path.display())?;
            }
        }

        if !report.unstaged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (path, change) in &report.unstaged {
                writeln!(self.writer(), "\t{} {}", change.label(), path.display())?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(self.writer(), "\t{}", path.display())?;
            }
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
