use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Hash a file as a blob, optionally writing it to the database
    pub fn hash_object(&self, file: &str, write: bool) -> anyhow::Result<()> {
        let blob = self.workspace().parse_blob(Path::new(file))?;

        let oid = if write {
            self.database().store(&blob)?
        } else {
            blob.object_id()?
        };

        writeln!(self.writer(), "{}", oid)?;

        Ok(())
    }
}
