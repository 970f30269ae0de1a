use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

/// Branch that HEAD points at in a fresh repository
const DEFAULT_BRANCH: &str = "main";

impl Repository {
    /// Initialize the repository metadata directory
    ///
    /// Creates `.kit/objects`, `.kit/refs/heads`, and a symbolic HEAD on
    /// the default branch. The branch file itself does not exist until the
    /// first commit.
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("failed to create the objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("failed to create the refs directory")?;

        let head_path = self.refs().head_path();
        if !head_path.exists() {
            fs::write(&head_path, format!("ref: refs/heads/{}\n", DEFAULT_BRANCH))
                .context("failed to write the HEAD file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty kit repository in {}",
            self.kit_path().display()
        )?;

        Ok(())
    }
}
