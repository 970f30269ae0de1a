use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Pretty-print an object by its id
    pub fn cat_file(&self, sha: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(sha.to_string())?;
        let object = self.database().parse_object(&oid)?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
