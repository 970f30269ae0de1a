use crate::areas::repository::Repository;

impl Repository {
    /// Stage files or directories
    ///
    /// Each path is expanded to the files beneath it; every file is hashed,
    /// stored as a blob, and recorded in the index with its current mode.
    /// Paths that do not exist or cannot be read are skipped.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        for path in paths {
            let root = if path == "." {
                None
            } else {
                Some(self.path().join(path))
            };

            let Ok(files) = self.workspace().list_files(root) else {
                // staging a non-existent path is ignored
                continue;
            };

            for file in files {
                let Ok(blob) = self.workspace().parse_blob(&file) else {
                    // unreadable files are ignored
                    continue;
                };

                let oid = self.database().store(&blob)?;
                let mode = self.workspace().file_mode(&file);
                index.add(&file, oid, mode)?;
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
