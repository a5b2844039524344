//! # Graft Table
//!
//! Subrepo histories are born rootless: each one starts from an orphan
//! branch with a single empty commit. The graft table assigns every such
//! first commit a synthetic parent (the tip of the shared
//! `@rgit-base-for-graft` branch), giving otherwise-disjoint histories a
//! common ancestor so that cross-subrepo merges succeed.
//!
//! ## File format
//!
//! `<git-dir>/info/grafts`, UTF-8 text, one record per line:
//! `<40-hex child> <40-hex parent>`. No header, no trailing metadata. Any
//! other line shape is a hard `CorruptGraftFile` error; in particular,
//! multi-parent graft lines are rejected rather than guessed at.
//!
//! ## Write discipline
//!
//! `set` is a full read-modify-write: the on-disk table is reloaded,
//! updated, and rewritten through a temporary file in the same directory
//! followed by an atomic rename. A concurrent reader never observes a
//! partial file, and two writers cannot silently drop each other's appends
//! the way a bare append could.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use tempfile::NamedTempFile;

use crate::backend::Repo;
use crate::error::{Error, Result};
use crate::reftree::GRAFT_BASE_BRANCH;

/// Whether `s` is a full 40-hex-digit commit id.
pub fn is_commit_id(s: &str) -> bool {
    let re = Regex::new("^[0-9a-f]{40}$").expect("commit id pattern is valid");
    re.is_match(s)
}

/// The child-commit → synthetic-parent table, in insertion order.
#[derive(Debug)]
pub struct GraftTable {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl GraftTable {
    /// Location of the graft file inside a git directory.
    pub fn graft_file(git_dir: &Path) -> PathBuf {
        git_dir.join("info").join("grafts")
    }

    /// Load the table from disk. A missing file is an empty table; a
    /// malformed line is an error, never a partial table.
    pub fn load(git_dir: &Path) -> Result<Self> {
        let path = Self::graft_file(git_dir);
        let mut entries = Vec::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            for (index, line) in content.lines().enumerate() {
                let corrupt = || Error::CorruptGraftFile {
                    path: path.clone(),
                    line: index + 1,
                    content: line.to_string(),
                };

                let fields: Vec<&str> = line.split_whitespace().collect();
                // Exactly child + one parent; grafts with multiple parents
                // are unsupported.
                let [child, parent] = fields.as_slice() else {
                    return Err(corrupt());
                };
                if !is_commit_id(child) || !is_commit_id(parent) {
                    return Err(corrupt());
                }
                entries.push(((*child).to_string(), (*parent).to_string()));
            }
        }

        Ok(Self { path, entries })
    }

    /// Synthetic parent recorded for `child`, if any.
    pub fn get(&self, child: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == child)
            .map(|(_, p)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    /// Insert or overwrite the entry for `child`, keeping its original
    /// position on overwrite.
    pub fn insert(&mut self, child: &str, parent: &str) -> Result<()> {
        for id in [child, parent] {
            if !is_commit_id(id) {
                return Err(Error::CorruptGraftFile {
                    path: self.path.clone(),
                    line: 0,
                    content: id.to_string(),
                });
            }
        }
        match self.entries.iter_mut().find(|(c, _)| c == child) {
            Some(entry) => entry.1 = parent.to_string(),
            None => self.entries.push((child.to_string(), parent.to_string())),
        }
        Ok(())
    }

    /// Rewrite the whole table to disk atomically: serialize into a
    /// temporary file next to the target, then rename over it.
    pub fn persist(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .expect("graft file always has a parent directory");
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        for (child, parent) in &self.entries {
            writeln!(tmp, "{} {}", child, parent)?;
        }
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Read-modify-write: reload the on-disk table, set `child` → `parent`,
    /// and persist the result.
    pub fn set(git_dir: &Path, child: &str, parent: &str) -> Result<()> {
        let mut table = Self::load(git_dir)?;
        table.insert(child, parent)?;
        table.persist()
    }
}

/// Graft `child` onto the repository's shared synthetic root by reading the
/// graft-base branch tip and recording it as the synthetic parent.
pub fn graft_to_root(repo: &Repo, child: &str) -> Result<()> {
    let root_tip = repo.tip_commit(GRAFT_BASE_BRANCH)?;
    GraftTable::set(&repo.git_dir()?, child, &root_tip)
}
