//! # Git Backend
//!
//! This module is the only place that talks to the version-control backend.
//! It defines the `Backend` trait, a minimal command-executor interface, and
//! the production implementation `GitBackend`, which uses the system `git`
//! command. Going through the system binary means authentication, hooks, and
//! user configuration all behave exactly as they would for a plain `git`
//! invocation.
//!
//! ## Design
//!
//! The trait-based design separates orchestration logic from command
//! execution, so tests can substitute a scripted backend and simulate any
//! sequence of git successes and failures without touching a real
//! repository.
//!
//! On top of the raw executor sits `Repo`, a typed adapter binding a backend
//! to one working directory. `Repo` knows how to spell the handful of git
//! subcommands the orchestration issues (init, empty commits, single-hash
//! log queries, checkouts, hard resets, merges, stashing, symbolic-ref, ref
//! listing, and index removal) and how to interpret their output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Trait for executing git subcommands - allows mocking in tests.
///
/// Implementations run `git <subcommand> <args...>` in `cwd` and return the
/// captured standard output. A non-zero exit status must surface as
/// `Error::BackendCommandFailed` with the command, directory, exit status,
/// and standard error attached.
pub trait Backend: Send + Sync {
    fn run(&self, subcommand: &str, args: &[&str], cwd: &Path) -> Result<String>;
}

/// The default `Backend`, which invokes the system `git` binary.
pub struct GitBackend;

impl Backend for GitBackend {
    fn run(&self, subcommand: &str, args: &[&str], cwd: &Path) -> Result<String> {
        log::debug!("git {} {} (in {})", subcommand, args.join(" "), cwd.display());

        let output = Command::new("git")
            .arg(subcommand)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| Error::BackendCommandFailed {
                command: format!("{} {}", subcommand, args.join(" ")),
                dir: cwd.to_path_buf(),
                status: -1,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::BackendCommandFailed {
                command: format!("{} {}", subcommand, args.join(" ")),
                dir: cwd.to_path_buf(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Options passed through to `git init`, translated verbatim into the
/// backend's equivalent flags.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub quiet: bool,
    pub bare: bool,
    pub template: Option<PathBuf>,
    pub separate_git_dir: Option<PathBuf>,
    /// One of `false`, `true`, `umask`, `group`, `all`, `world`, `everybody`.
    pub shared: Option<String>,
}

impl InitOptions {
    fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.quiet {
            args.push("--quiet".to_string());
        }
        if self.bare {
            args.push("--bare".to_string());
        }
        if let Some(template) = &self.template {
            args.push(format!("--template={}", template.display()));
        }
        if let Some(git_dir) = &self.separate_git_dir {
            args.push(format!("--separate-git-dir={}", git_dir.display()));
        }
        if let Some(shared) = &self.shared {
            args.push(format!("--shared={}", shared));
        }
        args
    }
}

/// A backend bound to one working directory, exposing the typed git
/// operations the orchestration needs.
pub struct Repo<'a> {
    backend: &'a dyn Backend,
    workdir: PathBuf,
}

impl<'a> Repo<'a> {
    pub fn new(backend: &'a dyn Backend, workdir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a raw subcommand in this repository's working directory.
    pub fn run(&self, subcommand: &str, args: &[&str]) -> Result<String> {
        self.backend.run(subcommand, args, &self.workdir)
    }

    /// Resolve the repository's git directory.
    ///
    /// `.git` is normally a directory, but with `--separate-git-dir` it is a
    /// text file containing a `gitdir: <path>` pointer, which is followed
    /// here.
    pub fn git_dir(&self) -> Result<PathBuf> {
        let dot_git = self.workdir.join(".git");
        if dot_git.is_dir() {
            return Ok(dot_git);
        }
        if dot_git.is_file() {
            let content = fs::read_to_string(&dot_git)?;
            if let Some(target) = content.trim().strip_prefix("gitdir:") {
                let target = Path::new(target.trim());
                if target.is_absolute() {
                    return Ok(target.to_path_buf());
                }
                return Ok(self.workdir.join(target));
            }
        }
        Err(Error::NotARepository {
            path: self.workdir.clone(),
        })
    }

    /// Initialize a repository here, passing `options` through to `git init`.
    pub fn init(&self, options: &InitOptions) -> Result<String> {
        let args = options.to_args();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run("init", &arg_refs)
    }

    /// Create a commit even when nothing is staged.
    pub fn commit_empty(&self, message: &str) -> Result<()> {
        self.run("commit", &["--allow-empty", "-m", message])?;
        Ok(())
    }

    /// Commit whatever is currently staged.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run("commit", &["-m", message])?;
        Ok(())
    }

    /// Stage the given paths.
    pub fn add(&self, paths: &[&Path]) -> Result<()> {
        let rendered: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        let mut args = vec!["--"];
        args.extend(rendered.iter().map(String::as_str));
        self.run("add", &args)?;
        Ok(())
    }

    /// The commit id at the tip of `rev`, via a formatted single-hash log
    /// query.
    pub fn tip_commit(&self, rev: &str) -> Result<String> {
        let out = self.run("log", &["-1", "--format=%H", rev])?;
        let id = out.trim().to_string();
        if !crate::graft::is_commit_id(&id) {
            return Err(Error::BackendCommandFailed {
                command: format!("log -1 --format=%H {}", rev),
                dir: self.workdir.clone(),
                status: 0,
                stderr: format!("expected a commit id, got {:?}", id),
            });
        }
        Ok(id)
    }

    /// The commit id HEAD currently points at.
    pub fn head_commit(&self) -> Result<String> {
        self.tip_commit("HEAD")
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run("checkout", &["--quiet", branch])?;
        Ok(())
    }

    /// Switch branches even when untracked files in the working tree match
    /// paths in the target tree (the case right after an orphan branch was
    /// emptied of the parent's index).
    pub fn checkout_force(&self, branch: &str) -> Result<()> {
        self.run("checkout", &["--quiet", "-f", branch])?;
        Ok(())
    }

    /// Create and switch to a new branch with no history.
    pub fn checkout_orphan(&self, branch: &str) -> Result<()> {
        self.run("checkout", &["--quiet", "--orphan", branch])?;
        Ok(())
    }

    /// Move the current branch back `offset` commits, discarding the
    /// working-tree changes those commits introduced.
    pub fn reset_hard_back(&self, offset: usize) -> Result<()> {
        let target = format!("HEAD~{}", offset);
        self.run("reset", &["--hard", "--quiet", &target])?;
        Ok(())
    }

    /// Merge an explicit list of branches into the current branch, creating
    /// a (possibly octopus) merge commit.
    pub fn merge(&self, branches: &[&str], message: &str) -> Result<()> {
        let mut args = vec!["--quiet", "-m", message];
        args.extend_from_slice(branches);
        self.run("merge", &args)?;
        Ok(())
    }

    /// Save uncommitted working-tree changes. Returns whether a stash entry
    /// was actually created; git reports "No local changes to save" on
    /// stdout and exits zero when the tree is clean.
    pub fn stash_push(&self) -> Result<bool> {
        let out = self.run("stash", &["push"])?;
        Ok(!out.contains("No local changes to save"))
    }

    /// Restore the most recent stash entry, reinstating the index as it was.
    pub fn stash_pop(&self) -> Result<()> {
        self.run("stash", &["pop", "--index"])?;
        Ok(())
    }

    /// The full symbolic ref HEAD points at, e.g.
    /// `refs/heads/@master/%master`.
    pub fn symbolic_head(&self) -> Result<String> {
        let out = self.run("symbolic-ref", &["HEAD"])?;
        Ok(out.trim().to_string())
    }

    /// The short name of the branch HEAD points at.
    pub fn current_branch(&self) -> Result<String> {
        let full = self.symbolic_head()?;
        Ok(full
            .strip_prefix("refs/heads/")
            .unwrap_or(full.as_str())
            .to_string())
    }

    /// List full refnames beneath `prefix` (e.g. `refs/heads/@master`), one
    /// scan over the backend's ref namespace.
    pub fn list_refs(&self, prefix: &str) -> Result<Vec<String>> {
        let out = self.run("for-each-ref", &["--format=%(refname)", prefix])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Remove every tracked file from the index, leaving the working tree
    /// alone. Used after an orphan checkout so the new history starts from
    /// an empty tree.
    pub fn untrack_all(&self) -> Result<()> {
        self.run("rm", &["-r", "--cached", "--quiet", "."])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedBackend;

    #[test]
    fn test_init_options_to_args_default() {
        let options = InitOptions::default();
        assert!(options.to_args().is_empty());
    }

    #[test]
    fn test_init_options_to_args_all_flags() {
        let options = InitOptions {
            quiet: true,
            bare: true,
            template: Some(PathBuf::from("/tmpl")),
            separate_git_dir: Some(PathBuf::from("/meta")),
            shared: Some("group".to_string()),
        };
        assert_eq!(
            options.to_args(),
            vec![
                "--quiet",
                "--bare",
                "--template=/tmpl",
                "--separate-git-dir=/meta",
                "--shared=group",
            ]
        );
    }

    #[test]
    fn test_stash_push_reports_clean_tree() {
        let backend = ScriptedBackend::new();
        backend.on("stash push", "No local changes to save\n");
        let repo = Repo::new(&backend, "/repo");

        assert!(!repo.stash_push().unwrap());
    }

    #[test]
    fn test_stash_push_reports_created_entry() {
        let backend = ScriptedBackend::new();
        backend.on("stash push", "Saved working directory and index state\n");
        let repo = Repo::new(&backend, "/repo");

        assert!(repo.stash_push().unwrap());
    }

    #[test]
    fn test_current_branch_strips_ref_prefix() {
        let backend = ScriptedBackend::new();
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        let repo = Repo::new(&backend, "/repo");

        assert_eq!(repo.current_branch().unwrap(), "@master/%master");
    }

    #[test]
    fn test_tip_commit_rejects_non_hash_output() {
        let backend = ScriptedBackend::new();
        backend.on("log -1 --format=%H HEAD", "not-a-hash\n");
        let repo = Repo::new(&backend, "/repo");

        let err = repo.head_commit().unwrap_err();
        assert!(err.to_string().contains("expected a commit id"));
    }

    #[test]
    fn test_list_refs_splits_and_trims_lines() {
        let backend = ScriptedBackend::new();
        backend.on(
            "for-each-ref --format=%(refname) refs/heads/@master",
            "refs/heads/@master/%master\nrefs/heads/@master/sub/%master\n\n",
        );
        let repo = Repo::new(&backend, "/repo");

        assert_eq!(
            repo.list_refs("refs/heads/@master").unwrap(),
            vec!["refs/heads/@master/%master", "refs/heads/@master/sub/%master"]
        );
    }

    #[test]
    fn test_merge_passes_explicit_branch_list() {
        let backend = ScriptedBackend::new();
        let repo = Repo::new(&backend, "/repo");

        repo.merge(&["@master/a/%master", "@master/b/%master"], "rgit cap")
            .unwrap();

        let calls = backend.calls();
        assert_eq!(
            calls,
            vec!["merge --quiet -m rgit cap @master/a/%master @master/b/%master"]
        );
    }

    #[test]
    fn test_command_failure_carries_context() {
        let backend = ScriptedBackend::new();
        backend.fail_on("merge", 1, "merge conflict in README");
        let repo = Repo::new(&backend, "/repo");

        let err = repo.merge(&["@master/a/%master"], "rgit cap").unwrap_err();
        match err {
            Error::BackendCommandFailed { status, stderr, .. } => {
                assert_eq!(status, 1);
                assert!(stderr.contains("merge conflict"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
