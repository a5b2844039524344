//! # Branch-Group Ref Tree
//!
//! This module models the branch namespace rgit maintains inside the
//! backend's ref store. Branches are partitioned into *groups*; within a
//! group, refs spell out a directory hierarchy, and specially marked leaf
//! refs declare which branch is responsible for commits at or below a given
//! path (its "sitting branch").
//!
//! ## Encoding
//!
//! - A group named `master` owns every ref under `refs/heads/@master/`.
//! - Intermediate ref segments are path segments.
//! - A leaf segment `%master` marks a sitting branch for the node spelled by
//!   the preceding segments. The group root branch is `@master/%master`; the
//!   branch sitting at `a/b` is `@master/a/b/%master`.
//! - The `%` prefix is reserved: a path segment can never collide with a
//!   marker.
//!
//! The tree is rebuilt from one `for-each-ref` scan at the start of each
//! orchestration step; the ref store stays authoritative and no tree state
//! outlives a process invocation.
//!
//! ## Resolution
//!
//! `resolve_branch_for_path` walks a path from the group root and returns
//! the sitting branch of the deepest ancestor that defines one
//! (nearest-enclosing-ancestor wins). `resolve_path_for_branch` is the
//! inverse, recovering a path from a qualified branch name.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::backend::Repo;
use crate::error::{Error, Result};

/// Reserved prefix for group directories in the ref namespace.
pub const GROUP_PREFIX: char = '@';

/// Reserved prefix for sitting-branch marker leaves.
pub const MARKER_PREFIX: char = '%';

/// The shared synthetic root every subrepo history grafts onto.
pub const GRAFT_BASE_BRANCH: &str = "@rgit-base-for-graft";

/// Default group for freshly initialized repositories.
pub const DEFAULT_GROUP: &str = "master";

/// One node of a group's path hierarchy.
///
/// A node may carry a sitting branch, children, or both: a branch can sit at
/// a directory that also has deeper nested branches below it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathNode {
    children: BTreeMap<String, PathNode>,
    sitting: Option<String>,
}

impl PathNode {
    pub fn sitting_branch(&self) -> Option<&str> {
        self.sitting.as_deref()
    }

    pub fn child(&self, segment: &str) -> Option<&PathNode> {
        self.children.get(segment)
    }
}

/// The in-memory tree for one branch group.
#[derive(Debug)]
pub struct RefTree {
    group: String,
    root: PathNode,
}

impl RefTree {
    /// Build the tree for `group` from one scan over the repository's ref
    /// listing. A non-existent or empty namespace yields an empty tree.
    pub fn build(repo: &Repo, group: &str) -> Result<Self> {
        let prefix = format!("refs/heads/{}{}", GROUP_PREFIX, group);
        let refnames = repo.list_refs(&prefix)?;
        Ok(Self::from_refnames(group, &refnames))
    }

    /// Construct the tree from raw refnames. Pure function of its inputs;
    /// refs outside the group and markers of foreign groups are ignored.
    pub fn from_refnames(group: &str, refnames: &[String]) -> Self {
        let group_dir = format!("{}{}", GROUP_PREFIX, group);
        let marker = format!("{}{}", MARKER_PREFIX, group);
        let mut root = PathNode::default();

        for refname in refnames {
            let short = refname
                .strip_prefix("refs/heads/")
                .unwrap_or(refname.as_str());
            let mut segments = short.split('/');
            if segments.next() != Some(group_dir.as_str()) {
                continue;
            }
            let rest: Vec<&str> = segments.collect();
            let Some((last, dirs)) = rest.split_last() else {
                continue;
            };

            if *last == marker {
                let node = descend_mut(&mut root, dirs);
                node.sitting = Some(short.to_string());
            } else {
                // A ref without a marker leaf contributes path structure
                // only.
                descend_mut(&mut root, &rest);
            }
        }

        Self {
            group: group.to_string(),
            root,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn root(&self) -> &PathNode {
        &self.root
    }

    /// Every sitting branch in the group, root first, children in
    /// deterministic segment order.
    pub fn branches(&self) -> Vec<&str> {
        fn collect<'t>(node: &'t PathNode, out: &mut Vec<&'t str>) {
            if let Some(branch) = node.sitting.as_deref() {
                out.push(branch);
            }
            for child in node.children.values() {
                collect(child, out);
            }
        }

        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// The sitting branch responsible for `path` (relative to the group's
    /// physical root), or `None` if no ancestor of `path` defines one.
    ///
    /// Walks the path from the root, remembering the last marker seen, so
    /// the deepest enclosing sitting branch wins.
    pub fn resolve_branch_for_path(&self, path: &Path) -> Option<&str> {
        let mut node = &self.root;
        let mut last = node.sitting.as_deref();

        for component in path.components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            let Some(segment) = segment.to_str() else {
                break;
            };
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    if let Some(branch) = node.sitting.as_deref() {
                        last = Some(branch);
                    }
                }
                None => break,
            }
        }

        last
    }
}

fn descend_mut<'a>(mut node: &'a mut PathNode, segments: &[&str]) -> &'a mut PathNode {
    for segment in segments {
        node = node.children.entry((*segment).to_string()).or_default();
    }
    node
}

/// The qualified root branch of a group, e.g. `@master/%master`.
pub fn group_root_branch(group: &str) -> String {
    format!(
        "{}{}/{}{}",
        GROUP_PREFIX, group, MARKER_PREFIX, group
    )
}

/// Split a qualified branch name into its group and the path it sits at,
/// relative to the group's physical root.
///
/// Fails with `MalformedBranchName` when the name lacks the group prefix,
/// the separator, or the trailing marker.
pub fn resolve_path_for_branch(branch: &str) -> Result<(String, PathBuf)> {
    let malformed = |message: &str| Error::MalformedBranchName {
        name: branch.to_string(),
        message: message.to_string(),
    };

    let unprefixed = branch
        .strip_prefix(GROUP_PREFIX)
        .ok_or_else(|| malformed("missing group prefix"))?;
    let (group, rest) = unprefixed
        .split_once('/')
        .ok_or_else(|| malformed("missing path separator"))?;
    if group.is_empty() {
        return Err(malformed("empty group name"));
    }

    let marker = format!("{}{}", MARKER_PREFIX, group);
    let path = if rest == marker {
        String::new()
    } else {
        rest.strip_suffix(&format!("/{}", marker))
            .ok_or_else(|| malformed("missing sitting-branch marker"))?
            .to_string()
    };
    if path.split('/').any(|s| s.starts_with(MARKER_PREFIX)) {
        return Err(malformed("path segment collides with marker prefix"));
    }

    Ok((group.to_string(), PathBuf::from(path)))
}

/// Derive the qualified branch for a new subrepo by appending the path from
/// its parent subrepo (plus the group marker) to the parent branch's prefix.
pub fn subrepo_branch(parent_branch: &str, rel_from_parent: &Path) -> Result<String> {
    let (group, parent_path) = resolve_path_for_branch(parent_branch)?;

    let mut segments: Vec<String> = Vec::new();
    for component in rel_from_parent.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(s) if !s.starts_with(MARKER_PREFIX) => segments.push(s.to_string()),
                _ => {
                    return Err(Error::MalformedBranchName {
                        name: rel_from_parent.display().to_string(),
                        message: "path segment collides with marker prefix".to_string(),
                    })
                }
            },
            Component::CurDir => {}
            _ => {
                return Err(Error::MalformedBranchName {
                    name: rel_from_parent.display().to_string(),
                    message: "subrepo path must be relative and descend only".to_string(),
                })
            }
        }
    }

    let mut prefix = format!("{}{}", GROUP_PREFIX, group);
    if !parent_path.as_os_str().is_empty() {
        prefix.push('/');
        prefix.push_str(&parent_path.to_string_lossy());
    }
    for segment in &segments {
        prefix.push('/');
        prefix.push_str(segment);
    }
    Ok(format!("{}/{}{}", prefix, MARKER_PREFIX, group))
}

/// The branch HEAD currently points at.
pub fn current_branch(repo: &Repo) -> Result<String> {
    repo.current_branch()
}

/// The group HEAD is currently inside, extracted from the symbolic ref.
pub fn current_group(repo: &Repo) -> Result<String> {
    let branch = repo.current_branch()?;
    group_of_branch(&branch)
}

/// The group a qualified branch belongs to.
pub fn group_of_branch(branch: &str) -> Result<String> {
    let (group, _) = resolve_path_for_branch(branch)?;
    Ok(group)
}
