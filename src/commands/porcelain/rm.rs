use crate::areas::repository::Repository;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Unstage paths from the index
    ///
    /// The working-tree files are left untouched; only the staged entries
    /// are removed.
    pub fn rm(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        for path in paths {
            index.remove(Path::new(path))?;
            writeln!(self.writer(), "rm '{}'", path)?;
        }

        index.write_updates()?;

        Ok(())
    }
}
