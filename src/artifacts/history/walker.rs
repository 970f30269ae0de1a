//! Ancestry walks and merge-base computation
//!
//! The walker answers two questions about the commit graph:
//!
//! - `is_ancestor(a, b)`: is `a` reachable from `b` through parent links?
//! - `merge_base(a, b)`: the first ancestor of `b` (breadth-first) that is
//!   also an ancestor of `a`, or `None` for unrelated histories.
//!
//! Both walks follow all parents, so ancestry through merge commits is
//! reported correctly. The graph is acyclic by construction (objects are
//! hashed before they are stored), but a visited set guards traversal
//! anyway, and a depth bound turns pathological graphs into `TooDeep`
//! instead of unbounded work.
//!
//! The walker is generic over a parent-loader closure so the algorithms can
//! be exercised against an in-memory graph without a repository.

use crate::artifacts::core::errors::EngineError;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Maximum traversal depth before surfacing `TooDeep`
const MAX_WALK_DEPTH: usize = 1_000;

/// Commit graph walker parameterized by a parent loader
pub struct HistoryWalker<LoadParentsFn>
where
    LoadParentsFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: LoadParentsFn,
}

impl<LoadParentsFn> HistoryWalker<LoadParentsFn>
where
    LoadParentsFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(load_parents: LoadParentsFn) -> Self {
        Self { load_parents }
    }

    /// Check whether `ancestor` is reachable from `descendant`
    ///
    /// A commit counts as its own ancestor.
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(descendant.clone(), 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth > MAX_WALK_DEPTH {
                return Err(EngineError::TooDeep(MAX_WALK_DEPTH).into());
            }
            if !visited.insert(current.clone()) {
                continue;
            }

            if &current == ancestor {
                return Ok(true);
            }

            for parent in (self.load_parents)(&current)? {
                queue.push_back((parent, depth + 1));
            }
        }

        Ok(false)
    }

    /// Find the most recent common ancestor of two commits
    ///
    /// Collects every ancestor of `ours`, then walks `theirs` breadth-first
    /// and returns the first commit present in that set. `None` means the
    /// histories are unrelated.
    pub fn merge_base(
        &self,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let our_ancestors = self.collect_ancestors(ours)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(theirs.clone(), 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth > MAX_WALK_DEPTH {
                return Err(EngineError::TooDeep(MAX_WALK_DEPTH).into());
            }
            if !visited.insert(current.clone()) {
                continue;
            }

            if our_ancestors.contains(&current) {
                return Ok(Some(current));
            }

            for parent in (self.load_parents)(&current)? {
                queue.push_back((parent, depth + 1));
            }
        }

        Ok(None)
    }

    fn collect_ancestors(&self, start: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth > MAX_WALK_DEPTH {
                return Err(EngineError::TooDeep(MAX_WALK_DEPTH).into());
            }
            if !visited.insert(current.clone()) {
                continue;
            }

            for parent in (self.load_parents)(&current)? {
                queue.push_back((parent, depth + 1));
            }
        }

        Ok(visited)
    }
}
