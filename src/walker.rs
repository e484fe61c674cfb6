// src/walker.rs

use crate::error::Result;
use crate::model::CommitInfo;
use git2::{ErrorCode, Repository, Sort};
use tracing::{debug, info};

/// Produces the commits of a repository oldest first, parents before children.
pub struct RevisionGraphWalker<'r> {
    repo: &'r Repository,
    first_parent: bool,
}

impl<'r> RevisionGraphWalker<'r> {
    pub fn new(repo: &'r Repository, first_parent: bool) -> Self {
        Self { repo, first_parent }
    }

    /// Walk from the root(s) to HEAD. An unborn HEAD is an empty history.
    pub fn walk(&self) -> Result<Vec<CommitInfo>> {
        if let Err(e) = self.repo.head() {
            if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) {
                info!("Repository has no commits");
                return Ok(Vec::new());
            }
            return Err(e.into());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        if self.first_parent {
            revwalk.simplify_first_parent()?;
        }
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(CommitInfo {
                id: commit.id(),
                parents: commit.parent_ids().collect(),
                time: commit.time().seconds(),
                summary: commit.summary().unwrap_or("").to_string(),
            });
        }

        debug!(
            "Walk of {} commits ({})",
            commits.len(),
            if self.first_parent { "first parent" } else { "all" }
        );
        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn commit_file(
        repo: &Repository,
        dir: &Path,
        name: &str,
        content: &str,
        parents: &[&git2::Commit],
        update_head: bool,
    ) -> anyhow::Result<git2::Oid> {
        std::fs::write(dir.join(name), content)?;
        let mut index = repo.index()?;
        index.add_path(Path::new(name))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let sig = git2::Signature::now("Test User", "test@example.com")?;
        let head = if update_head { Some("HEAD") } else { None };
        Ok(repo.commit(head, &sig, &sig, name, &tree, parents)?)
    }

    #[test]
    fn test_empty_history() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        assert!(RevisionGraphWalker::new(&repo, true).walk()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_linear_history_oldest_first() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        let c1 = commit_file(&repo, dir.path(), "a.txt", "1\n", &[], true)?;
        let first = repo.find_commit(c1)?;
        let c2 = commit_file(&repo, dir.path(), "a.txt", "2\n", &[&first], true)?;

        let commits = RevisionGraphWalker::new(&repo, true).walk()?;
        let ids: Vec<git2::Oid> = commits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c1, c2]);
        assert_eq!(commits[1].parents, vec![c1]);
        assert_eq!(commits[1].summary, "a.txt");
        Ok(())
    }

    #[test]
    fn test_merge_parents_before_children() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        let root = commit_file(&repo, dir.path(), "a.txt", "root\n", &[], true)?;
        let root_commit = repo.find_commit(root)?;
        let side = commit_file(&repo, dir.path(), "b.txt", "side\n", &[&root_commit], false)?;
        let main = commit_file(&repo, dir.path(), "a.txt", "main\n", &[&root_commit], true)?;
        let merge = commit_file(
            &repo,
            dir.path(),
            "c.txt",
            "merge\n",
            &[&repo.find_commit(main)?, &repo.find_commit(side)?],
            true,
        )?;

        let all = RevisionGraphWalker::new(&repo, false).walk()?;
        assert_eq!(all.len(), 4);
        assert_eq!(all.first().map(|c| c.id), Some(root));
        assert_eq!(all.last().map(|c| c.id), Some(merge));

        let first_parent = RevisionGraphWalker::new(&repo, true).walk()?;
        let ids: Vec<git2::Oid> = first_parent.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![root, main, merge]);
        Ok(())
    }
}
