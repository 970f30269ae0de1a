use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// List the entries of a tree object
    ///
    /// Accepts either a tree id or a commit id (the commit's tree is
    /// listed).
    pub fn ls_tree(&self, sha: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(sha.to_string())?;

        let tree = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => self
                .database()
                .parse_object_as_tree(commit.tree_oid())?
                .ok_or_else(|| anyhow::anyhow!("commit {} references no tree", oid))?,
            None => self
                .database()
                .parse_object_as_tree(&oid)?
                .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", oid))?,
        };

        writeln!(self.writer(), "{}", tree.display())?;

        Ok(())
    }
}
