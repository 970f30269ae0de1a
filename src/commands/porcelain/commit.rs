use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Record the staged index as a new commit
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        if index.is_empty() {
            anyhow::bail!("nothing to commit (the index is empty)");
        }

        // build and store the nested trees, children before parents
        let tree = Tree::build(index.entries())?;
        tree.traverse(&|subtree: &Tree| {
            self.database().store(subtree)?;
            Ok(())
        })?;
        let tree_oid = tree.object_id()?;

        let parents = self.refs().read_head_oid()?.into_iter().collect::<Vec<_>>();
        let is_root = if parents.is_empty() {
            "(root-commit) "
        } else {
            ""
        };

        let author = Author::load_from_env();
        let message = message.trim().to_string();

        let commit = Commit::new(parents, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;
        self.refs().advance_head(&commit_oid)?;

        let location = match self.refs().current_branch()? {
            Some(branch) => branch.to_string(),
            None => "detached HEAD".to_string(),
        };

        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            location,
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
