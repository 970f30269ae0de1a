//! Repository abstraction and coordination
//!
//! The `Repository` type is the facade over the lower-level components
//! (database, index, workspace, refs) and the receiver for all high-level
//! commands. There is no global state: the repository root is an explicit
//! parameter, and every operation reads refs, HEAD, and the index fresh.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::errors::EngineError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Repository metadata directory name
const KIT_DIR: &str = ".kit";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// A repository rooted at a working directory
///
/// Coordinates the database, index, workspace, and refs subsystems. This is
/// the entry point for every engine operation; command implementations live
/// in `crate::commands` as `impl Repository` blocks.
pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout in the CLI, a buffer in tests)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Staging area
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("database", &self.database)
            .field("workspace", &self.workspace)
            .field("refs", &self.refs)
            .finish()
    }
}

impl Repository {
    /// Open (or prepare to initialize) a repository at the given root
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let kit_path = path.join(KIT_DIR);
        let index = Index::new(kit_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(kit_path.join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(kit_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    /// Locate the repository containing `start` by walking upward
    ///
    /// A directory is a repository root when both `.kit/objects` and
    /// `.kit/HEAD` exist under it. Fails `NotARepository` when the walk
    /// reaches the filesystem root without a match.
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = start.canonicalize().map_err(|_| EngineError::NotARepository)?;

        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            let kit_path = dir.join(KIT_DIR);
            if kit_path.join(DATABASE_DIR).is_dir() && kit_path.join("HEAD").is_file() {
                return Self::new(dir.to_path_buf(), writer);
            }
            current = dir.parent();
        }

        Err(EngineError::NotARepository.into())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kit_path(&self) -> PathBuf {
        self.path.join(KIT_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
