//! # Repository Orchestrator
//!
//! Top-level workflows tying the other components together:
//!
//! - **`locate_enclosing`**: combine filesystem ascent with ref-tree
//!   resolution to answer "where am I" - the nearest enclosing repository
//!   root and, beneath it, the nearest enclosing subrepo root.
//! - **`init_repo`**: initialize a fresh repository and seed it with the
//!   shared synthetic graft root, the group's first commit (grafted onto
//!   that root), and the initial cap commit. Re-running against an existing
//!   repository only re-issues the backend's init.
//! - **`init_subrepo`**: register a new nested subrepo inside an enclosing
//!   one - module-list entry, pin file, orphan branch grafted onto the
//!   shared root - all inside one cap transaction so the group's cap
//!   reflects the new branch when the dust settles.
//! - **`dispatch`**: the single intent decision: an enclosing subrepo that
//!   differs from the target directory means "nest a subrepo", anything
//!   else means "(re)initialize a repository".
//!
//! The orchestrator owns no cross-invocation state: ref trees and graft
//! tables are rebuilt from disk at each step, and every mutating workflow
//! holds the repository lock for its whole duration.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::backend::{Backend, InitOptions, Repo};
use crate::error::{Error, Result};
use crate::graft;
use crate::lock::RepoLock;
use crate::reftree::{self, RefTree, DEFAULT_GROUP, GRAFT_BASE_BRANCH};
use crate::registry::{Pin, SubrepoRegistry};
use crate::transaction::{CapTransaction, Stage, CAP_MESSAGE};

const GRAFT_BASE_MESSAGE: &str = "rgit graft base";
const INITIAL_MESSAGE: &str = "rgit initial commit";

/// Orchestrator configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// The tool version stamped into pin files.
    pub version: Version,
    /// Group created for freshly initialized repositories.
    pub group: String,
}

impl OrchestratorConfig {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            group: DEFAULT_GROUP.to_string(),
        }
    }
}

/// Resolved result of "where am I".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Nearest ancestor containing backend metadata, if any.
    pub repo_root: Option<PathBuf>,
    /// Nearest enclosing subrepo root beneath `repo_root`, if resolvable.
    pub subrepo_root: Option<PathBuf>,
    /// The sitting branch responsible for that subrepo.
    pub subrepo_branch: Option<String>,
}

/// What `dispatch` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh repository was created and seeded.
    Initialized { root: PathBuf },
    /// Backend metadata already existed; the backend's init was re-run.
    Reinitialized { root: PathBuf },
    /// A nested subrepo was registered inside an enclosing repository.
    SubrepoInitialized {
        root: PathBuf,
        subrepo: PathBuf,
        branch: String,
    },
}

/// Top-level workflow driver.
pub struct RepoOrchestrator {
    backend: Box<dyn Backend>,
    config: OrchestratorConfig,
    registry: SubrepoRegistry,
}

impl RepoOrchestrator {
    pub fn new(backend: Box<dyn Backend>, config: OrchestratorConfig) -> Self {
        let registry = SubrepoRegistry::new(config.version.clone());
        Self {
            backend,
            config,
            registry,
        }
    }

    fn repo(&self, workdir: &Path) -> Repo<'_> {
        Repo::new(self.backend.as_ref(), workdir)
    }

    /// Ascend from `start` to the nearest ancestor holding backend
    /// metadata, then resolve the nearest enclosing subrepo beneath it.
    ///
    /// Finding no repository at all is not an error here; `dispatch` uses
    /// that to pick the fresh-init path.
    pub fn locate_enclosing(&self, start: &Path) -> Result<RepoLocation> {
        let Some(root) = start.ancestors().find(|dir| dir.join(".git").exists()) else {
            return Ok(RepoLocation {
                repo_root: None,
                subrepo_root: None,
                subrepo_branch: None,
            });
        };

        let repo = self.repo(root);
        // HEAD may sit outside any group (e.g. on the graft base); that
        // just means no subrepo encloses the caller.
        let group = match reftree::current_group(&repo) {
            Ok(group) => group,
            Err(Error::MalformedBranchName { .. }) => {
                return Ok(RepoLocation {
                    repo_root: Some(root.to_path_buf()),
                    subrepo_root: None,
                    subrepo_branch: None,
                });
            }
            Err(e) => return Err(e),
        };

        let tree = RefTree::build(&repo, &group)?;
        let rel = start.strip_prefix(root).unwrap_or(Path::new(""));
        let (subrepo_root, subrepo_branch) = match tree.resolve_branch_for_path(rel) {
            Some(branch) => {
                let (_, path) = reftree::resolve_path_for_branch(branch)?;
                (Some(root.join(path)), Some(branch.to_string()))
            }
            None => (None, None),
        };

        Ok(RepoLocation {
            repo_root: Some(root.to_path_buf()),
            subrepo_root,
            subrepo_branch,
        })
    }

    /// Initialize (or re-initialize) a repository at `dir`.
    ///
    /// A fresh directory gets the full seeding: synthetic graft root, first
    /// commit on the group's root branch grafted onto it, and the initial
    /// cap commit. An existing repository only gets the backend's
    /// idempotent re-init.
    pub fn init_repo(&self, dir: &Path, options: &InitOptions) -> Result<InitOutcome> {
        fs::create_dir_all(dir)?;
        let repo = self.repo(dir);

        match ensure_fresh(dir) {
            Ok(()) => {}
            Err(e) if e.is_benign() => {
                log::info!("repository metadata already present at {}", dir.display());
                repo.init(options)?;
                return Ok(InitOutcome::Reinitialized {
                    root: dir.to_path_buf(),
                });
            }
            Err(e) => return Err(e),
        }

        repo.init(options)?;
        if options.bare {
            // No working tree to seed; the bare repository is left as git
            // created it.
            return Ok(InitOutcome::Initialized {
                root: dir.to_path_buf(),
            });
        }

        let _lock = RepoLock::acquire(&repo.git_dir()?)?;

        repo.checkout_orphan(GRAFT_BASE_BRANCH)?;
        repo.commit_empty(GRAFT_BASE_MESSAGE)?;

        let root_branch = reftree::group_root_branch(&self.config.group);
        repo.checkout_orphan(&root_branch)?;
        repo.commit_empty(INITIAL_MESSAGE)?;
        let first_commit = repo.head_commit()?;
        graft::graft_to_root(&repo, &first_commit)?;

        repo.commit_empty(CAP_MESSAGE)?;

        Ok(InitOutcome::Initialized {
            root: dir.to_path_buf(),
        })
    }

    /// Register `new_dir` as a nested subrepo.
    ///
    /// Argument order is outermost-first: the enclosing repository root,
    /// then the enclosing subrepo's root, then the directory becoming a
    /// subrepo. `new_dir` must lie strictly inside `repo_root`.
    ///
    /// The whole branch-set mutation runs between `CapTransaction::begin`
    /// and `commit`, so the group's cap is recreated over the new branch.
    pub fn init_subrepo(
        &self,
        repo_root: &Path,
        subrepo_root: &Path,
        new_dir: &Path,
    ) -> Result<InitOutcome> {
        if new_dir == repo_root || !new_dir.starts_with(repo_root) {
            return Err(Error::NotARepository {
                path: new_dir.to_path_buf(),
            });
        }

        let repo = self.repo(repo_root);
        let _lock = RepoLock::acquire(&repo.git_dir()?)?;

        let tx = CapTransaction::begin(&repo)?;
        match self.register_subrepo(&repo, &tx, repo_root, subrepo_root, new_dir) {
            Ok(branch) => {
                tx.commit()?;
                Ok(InitOutcome::SubrepoInitialized {
                    root: repo_root.to_path_buf(),
                    subrepo: new_dir.to_path_buf(),
                    branch,
                })
            }
            Err(e) => Err(tx.fail(Stage::Mutate, e)),
        }
    }

    /// The mutate phase of subrepo registration. Returns the new subrepo's
    /// qualified branch name.
    fn register_subrepo(
        &self,
        repo: &Repo,
        tx: &CapTransaction,
        repo_root: &Path,
        subrepo_root: &Path,
        new_dir: &Path,
    ) -> Result<String> {
        let rel = new_dir
            .strip_prefix(repo_root)
            .expect("new_dir verified to lie inside repo_root");

        // Resolve and check out the branch responsible for the parent of
        // the new directory. The tree is rebuilt here, after uncap.
        let tree = RefTree::build(repo, tx.group())?;
        let parent_rel = rel.parent().unwrap_or(Path::new(""));
        let parent_branch = tree
            .resolve_branch_for_path(parent_rel)
            .ok_or_else(|| Error::NotARepository {
                path: new_dir.to_path_buf(),
            })?
            .to_string();
        repo.checkout(&parent_branch)?;

        fs::create_dir_all(new_dir)?;

        // Register with the parent subrepo and pin the newcomer.
        let (_, parent_path) = reftree::resolve_path_for_branch(&parent_branch)?;
        debug_assert_eq!(repo_root.join(&parent_path), subrepo_root);
        let rel_from_parent = new_dir
            .strip_prefix(subrepo_root)
            .map_err(|_| Error::NotARepository {
                path: new_dir.to_path_buf(),
            })?;
        let branch = reftree::subrepo_branch(&parent_branch, rel_from_parent)?;

        let module_name = rel_from_parent.to_string_lossy().replace('\\', "/");
        let modules_path =
            self.registry
                .register_module(subrepo_root, &module_name, rel_from_parent, &branch)?;
        let pin_path = self.registry.write_pin_file(new_dir, &Pin::Latest)?;

        repo.add(&[modules_path.as_path(), pin_path.as_path()])?;
        repo.commit(&format!("rgit: register subrepo {}", rel.display()))?;

        // The subrepo's own history: an orphan branch, emptied of the
        // parent's index, with one empty commit grafted onto the shared
        // root.
        repo.checkout_orphan(&branch)?;
        repo.untrack_all()?;
        repo.commit_empty(&format!("rgit: initialize subrepo {}", rel.display()))?;
        let first_commit = repo.head_commit()?;
        graft::graft_to_root(repo, &first_commit)?;

        repo.checkout_force(&parent_branch)?;
        Ok(branch)
    }

    /// Top-level entry: decide between nesting a subrepo and
    /// (re)initializing a repository at `path`.
    pub fn dispatch(&self, path: &Path, options: &InitOptions) -> Result<InitOutcome> {
        let location = self.locate_enclosing(path)?;

        match (&location.repo_root, &location.subrepo_root) {
            (Some(root), Some(subrepo)) if subrepo != path => {
                self.init_subrepo(root, subrepo, path)
            }
            _ => self.init_repo(path, options),
        }
    }
}

/// `AlreadyInitialized` when `dir` already carries backend metadata.
fn ensure_fresh(dir: &Path) -> Result<()> {
    if dir.join(".git").exists() {
        return Err(Error::AlreadyInitialized {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graft::GraftTable;
    use crate::testutil::ScriptedBackend;
    use tempfile::TempDir;

    const FIRST: &str = "1111111111111111111111111111111111111111";
    const BASE: &str = "2222222222222222222222222222222222222222";
    const SUB_FIRST: &str = "3333333333333333333333333333333333333333";

    fn orchestrator(backend: ScriptedBackend) -> RepoOrchestrator {
        RepoOrchestrator::new(
            Box::new(backend),
            OrchestratorConfig::new(Version::new(0, 1, 0)),
        )
    }

    fn scripted_fresh_init(root: &Path) -> ScriptedBackend {
        let backend = ScriptedBackend::new();
        backend.create_dir_on("init", &root.join(".git"));
        backend.on("log -1 --format=%H HEAD", &format!("{}\n", FIRST));
        backend.on(
            "log -1 --format=%H @rgit-base-for-graft",
            &format!("{}\n", BASE),
        );
        backend
    }

    #[test]
    fn test_locate_enclosing_outside_any_repo() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(ScriptedBackend::new());

        let location = orchestrator
            .locate_enclosing(&dir.path().join("a/b"))
            .unwrap();
        assert_eq!(location.repo_root, None);
        assert_eq!(location.subrepo_root, None);
    }

    #[test]
    fn test_locate_enclosing_resolves_nearest_subrepo() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();

        let backend = ScriptedBackend::new();
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        backend.on(
            "for-each-ref --format=%(refname) refs/heads/@master",
            "refs/heads/@master/%master\nrefs/heads/@master/sub/%master\n",
        );
        let orchestrator = orchestrator(backend);

        let location = orchestrator
            .locate_enclosing(&dir.path().join("sub/deeper"))
            .unwrap();
        assert_eq!(location.repo_root, Some(dir.path().to_path_buf()));
        assert_eq!(location.subrepo_root, Some(dir.path().join("sub")));
        assert_eq!(
            location.subrepo_branch,
            Some("@master/sub/%master".to_string())
        );
    }

    #[test]
    fn test_locate_enclosing_head_outside_groups() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();

        let backend = ScriptedBackend::new();
        backend.on("symbolic-ref HEAD", "refs/heads/@rgit-base-for-graft\n");
        let orchestrator = orchestrator(backend);

        let location = orchestrator.locate_enclosing(dir.path()).unwrap();
        assert_eq!(location.repo_root, Some(dir.path().to_path_buf()));
        assert_eq!(location.subrepo_root, None);
    }

    #[test]
    fn test_init_repo_seeds_fresh_repository() {
        let dir = TempDir::new().unwrap();
        let backend = scripted_fresh_init(dir.path());
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .init_repo(dir.path(), &InitOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            InitOutcome::Initialized {
                root: dir.path().to_path_buf()
            }
        );
    }

    #[test]
    fn test_init_repo_seeding_command_sequence() {
        let dir = TempDir::new().unwrap();
        let backend = scripted_fresh_init(dir.path());
        let calls_handle = backend.calls_handle();
        let orchestrator = orchestrator(backend);

        orchestrator
            .init_repo(dir.path(), &InitOptions::default())
            .unwrap();

        let calls = calls_handle.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "init".to_string(),
                "checkout --quiet --orphan @rgit-base-for-graft".to_string(),
                format!("commit --allow-empty -m {}", GRAFT_BASE_MESSAGE),
                "checkout --quiet --orphan @master/%master".to_string(),
                format!("commit --allow-empty -m {}", INITIAL_MESSAGE),
                "log -1 --format=%H HEAD".to_string(),
                "log -1 --format=%H @rgit-base-for-graft".to_string(),
                format!("commit --allow-empty -m {}", CAP_MESSAGE),
            ]
        );

        // One graft entry: first commit onto the synthetic root.
        let table = GraftTable::load(&dir.path().join(".git")).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(FIRST), Some(BASE));

        // The lock was released on completion.
        assert!(!dir.path().join(".git/rgit.lock").exists());
    }

    #[test]
    fn test_init_repo_existing_metadata_reinitializes_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();

        let backend = ScriptedBackend::new();
        let calls_handle = backend.calls_handle();
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .init_repo(dir.path(), &InitOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            InitOutcome::Reinitialized {
                root: dir.path().to_path_buf()
            }
        );
        assert_eq!(*calls_handle.lock().unwrap(), vec!["init".to_string()]);
    }

    #[test]
    fn test_init_repo_bare_skips_seeding() {
        let dir = TempDir::new().unwrap();
        let backend = scripted_fresh_init(dir.path());
        let calls_handle = backend.calls_handle();
        let orchestrator = orchestrator(backend);

        let options = InitOptions {
            bare: true,
            ..Default::default()
        };
        orchestrator.init_repo(dir.path(), &options).unwrap();

        assert_eq!(
            *calls_handle.lock().unwrap(),
            vec!["init --bare".to_string()]
        );
    }

    #[test]
    fn test_init_subrepo_full_flow() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        let new_dir = root.join("sub");

        let backend = ScriptedBackend::new();
        backend.on("stash push", "No local changes to save\n");
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        // First scan (mutate) sees only the root branch; the recap scan
        // also sees the branch created in between.
        backend.on_seq(
            "for-each-ref --format=%(refname) refs/heads/@master",
            &[
                "refs/heads/@master/%master\n",
                "refs/heads/@master/%master\nrefs/heads/@master/sub/%master\n",
            ],
        );
        backend.on("log -1 --format=%H HEAD", &format!("{}\n", SUB_FIRST));
        backend.on(
            "log -1 --format=%H @rgit-base-for-graft",
            &format!("{}\n", BASE),
        );
        let calls_handle = backend.calls_handle();
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .init_subrepo(root, root, &new_dir)
            .unwrap();
        assert_eq!(
            outcome,
            InitOutcome::SubrepoInitialized {
                root: root.to_path_buf(),
                subrepo: new_dir.clone(),
                branch: "@master/sub/%master".to_string(),
            }
        );

        // Registry files were written.
        let modules = std::fs::read_to_string(root.join(".gitmodules")).unwrap();
        assert!(modules.contains("[submodule \"sub\"]"));
        assert!(modules.contains("@master/sub/%master"));
        let pin = std::fs::read_to_string(new_dir.join(".rgit")).unwrap();
        assert!(pin.contains("pin = latest"));
        assert!(pin.contains("rgit_version = 0.1.0"));

        // The subrepo's first commit grafts onto the shared root.
        let table = GraftTable::load(&root.join(".git")).unwrap();
        assert_eq!(table.get(SUB_FIRST), Some(BASE));

        let calls = calls_handle.lock().unwrap().clone();
        let expected_tail = vec![
            "checkout --quiet --orphan @master/sub/%master".to_string(),
            "rm -r --cached --quiet .".to_string(),
            "commit --allow-empty -m rgit: initialize subrepo sub".to_string(),
            "log -1 --format=%H HEAD".to_string(),
            "log -1 --format=%H @rgit-base-for-graft".to_string(),
            "checkout --quiet -f @master/%master".to_string(),
            "for-each-ref --format=%(refname) refs/heads/@master".to_string(),
            "checkout --quiet -f @master/%master".to_string(),
            "merge --quiet -m rgit cap @master/sub/%master".to_string(),
        ];
        assert!(
            calls.ends_with(&expected_tail),
            "unexpected tail: {:#?}",
            calls
        );
        // Uncap happened before the mutation.
        assert!(calls.contains(&"reset --hard --quiet HEAD~1".to_string()));
        // Registration was committed on the parent branch.
        assert!(calls
            .iter()
            .any(|c| c.starts_with("commit -m rgit: register subrepo sub")));

        assert!(!root.join(".git/rgit.lock").exists());
    }

    #[test]
    fn test_init_subrepo_rejects_directory_outside_root() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();

        let orchestrator = orchestrator(ScriptedBackend::new());
        assert!(orchestrator
            .init_subrepo(dir.path(), dir.path(), elsewhere.path())
            .is_err());
        assert!(orchestrator
            .init_subrepo(dir.path(), dir.path(), dir.path())
            .is_err());
    }

    #[test]
    fn test_init_subrepo_mutation_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();

        let backend = ScriptedBackend::new();
        backend.on("stash push", "Saved working directory\n");
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        backend.on(
            "for-each-ref --format=%(refname) refs/heads/@master",
            "refs/heads/@master/%master\n",
        );
        backend.fail_on("commit -m", 1, "pre-commit hook rejected");
        let calls_handle = backend.calls_handle();
        let orchestrator = orchestrator(backend);

        let err = orchestrator
            .init_subrepo(root, root, &root.join("sub"))
            .unwrap_err();
        match err {
            Error::TransactionFailed { stage, .. } => assert_eq!(stage, Stage::Mutate),
            other => panic!("unexpected error: {}", other),
        }

        // Rollback restored the cap and popped the stash.
        let calls = calls_handle.lock().unwrap().clone();
        assert!(calls.contains(&format!("commit --allow-empty -m {}", CAP_MESSAGE)));
        assert_eq!(calls.last().unwrap(), "stash pop --index");
        assert!(!root.join(".git/rgit.lock").exists());
    }

    #[test]
    fn test_init_subrepo_refuses_while_lock_held() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join(".git/rgit.lock"), "999\n").unwrap();

        let orchestrator = orchestrator(ScriptedBackend::new());
        let err = orchestrator
            .init_subrepo(root, root, &root.join("sub"))
            .unwrap_err();
        assert!(matches!(err, Error::LockHeld { .. }));
    }

    #[test]
    fn test_dispatch_fresh_directory_initializes() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("project");
        let backend = scripted_fresh_init(&target);
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .dispatch(&target, &InitOptions::default())
            .unwrap();
        assert_eq!(outcome, InitOutcome::Initialized { root: target });
    }

    #[test]
    fn test_dispatch_inside_subrepo_nests_a_new_one() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        let new_dir = root.join("nested");

        let backend = ScriptedBackend::new();
        backend.on("stash push", "No local changes to save\n");
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        backend.on_seq(
            "for-each-ref --format=%(refname) refs/heads/@master",
            &[
                "refs/heads/@master/%master\n",
                "refs/heads/@master/%master\n",
                "refs/heads/@master/%master\nrefs/heads/@master/nested/%master\n",
            ],
        );
        backend.on("log -1 --format=%H HEAD", &format!("{}\n", SUB_FIRST));
        backend.on(
            "log -1 --format=%H @rgit-base-for-graft",
            &format!("{}\n", BASE),
        );
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .dispatch(&new_dir, &InitOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            InitOutcome::SubrepoInitialized {
                root: root.to_path_buf(),
                subrepo: new_dir,
                branch: "@master/nested/%master".to_string(),
            }
        );
    }

    #[test]
    fn test_dispatch_at_existing_root_reinitializes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();

        let backend = ScriptedBackend::new();
        backend.on("symbolic-ref HEAD", "refs/heads/@master/%master\n");
        backend.on(
            "for-each-ref --format=%(refname) refs/heads/@master",
            "refs/heads/@master/%master\n",
        );
        let orchestrator = orchestrator(backend);

        let outcome = orchestrator
            .dispatch(root, &InitOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            InitOutcome::Reinitialized {
                root: root.to_path_buf()
            }
        );
    }
}
