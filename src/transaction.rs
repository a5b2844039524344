//! # Cap Transaction
//!
//! Every group keeps a sentinel "cap commit" at the tip of its head branch,
//! representing the merged state of every branch in the group. Structural
//! mutations (such as registering a new subrepo branch) must happen while
//! the cap is temporarily removed, and the cap must be recreated as a merge
//! of the updated branch set afterwards.
//!
//! `CapTransaction` drives that protocol as an explicit object with
//! `begin` / `commit` / `rollback` operations rather than a callback
//! wrapper, so the step ordering and the rollback path are visible and
//! testable independently of whatever mutation runs in between:
//!
//! 1. **Stash** - save any uncommitted working-tree changes.
//! 2. **Uncap** - record the current group and branch, then move the head
//!    back one commit so it sits on the true merge of the group's branches.
//! 3. **Mutate** - the caller changes the branch set (between `begin` and
//!    `commit`).
//! 4. **Recap** - check the original branch out again and create a fresh
//!    merge commit pulling in every branch now in the group.
//! 5. **Unstash** - pop the stash, restoring the index as it was.
//!
//! Any failing step triggers a best-effort rollback of the completed steps
//! in reverse order before the failure surfaces as
//! `TransactionFailed{stage}`. The repository is never left without its cap
//! commit: if re-merging cannot restore it, a plain empty commit stands in.
//! A rollback that itself fails is reported as the more severe
//! `TransactionRollbackFailed`.

use std::fmt;

use crate::backend::Repo;
use crate::error::{Error, Result};
use crate::reftree::{self, RefTree};

/// Commit message used for every cap commit.
pub const CAP_MESSAGE: &str = "rgit cap";

/// The step of a cap transaction a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stash,
    Uncap,
    Mutate,
    Recap,
    Unstash,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Stash => "stash",
            Stage::Uncap => "uncap",
            Stage::Mutate => "mutate",
            Stage::Recap => "recap",
            Stage::Unstash => "unstash",
        };
        write!(f, "{}", name)
    }
}

/// An in-progress cap transaction. Between `begin` and `commit` the group
/// head sits directly on the merge of its branches, with the cap removed.
pub struct CapTransaction<'a> {
    repo: &'a Repo<'a>,
    group: String,
    branch: String,
    stashed: bool,
}

impl<'a> CapTransaction<'a> {
    /// Stash and uncap. On failure the completed steps are rolled back
    /// before the error is returned.
    pub fn begin(repo: &'a Repo<'a>) -> Result<Self> {
        let stashed = repo.stash_push().map_err(|e| Error::TransactionFailed {
            stage: Stage::Stash,
            source: Box::new(e),
        })?;
        log::debug!("cap transaction: stashed={}", stashed);

        let uncap = || -> Result<(String, String)> {
            let branch = repo.current_branch()?;
            let group = reftree::group_of_branch(&branch)?;
            repo.reset_hard_back(1)?;
            Ok((group, branch))
        };

        match uncap() {
            Ok((group, branch)) => {
                log::debug!("cap transaction: uncapped {} on {}", group, branch);
                Ok(Self {
                    repo,
                    group,
                    branch,
                    stashed,
                })
            }
            Err(e) => {
                if stashed {
                    if let Err(pop_err) = repo.stash_pop() {
                        return Err(Error::TransactionRollbackFailed {
                            stage: Stage::Uncap,
                            message: format!("{} (after: {})", pop_err, e),
                        });
                    }
                }
                Err(Error::TransactionFailed {
                    stage: Stage::Uncap,
                    source: Box::new(e),
                })
            }
        }
    }

    /// The group whose cap is held open by this transaction.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The branch the cap lived on, checked out again at recap time.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Recap and unstash, completing the transaction.
    pub fn commit(self) -> Result<()> {
        if let Err(e) = self.recap() {
            return Err(self.fail(Stage::Recap, e));
        }

        if self.stashed {
            self.repo
                .stash_pop()
                .map_err(|e| Error::TransactionRollbackFailed {
                    stage: Stage::Unstash,
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Roll back a failed mutation and wrap its error: re-create the cap,
    /// pop the stash, and return `TransactionFailed` for `stage` (or
    /// `TransactionRollbackFailed` if restoring state itself failed).
    pub fn fail(self, stage: Stage, source: Error) -> Error {
        log::warn!("cap transaction failed during {}: rolling back", stage);

        if let Err(rollback_err) = self.restore() {
            return Error::TransactionRollbackFailed {
                stage,
                message: format!("{} (after: {})", rollback_err, source),
            };
        }
        Error::TransactionFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// Re-create the cap on the recorded branch as a merge of every branch
    /// currently in the group. With a single branch there is nothing to
    /// merge, so the cap is a plain empty commit.
    fn recap(&self) -> Result<()> {
        let tree = RefTree::build(self.repo, &self.group)?;
        let branches = tree.branches();
        self.repo.checkout_force(&self.branch)?;

        let others: Vec<&str> = branches
            .iter()
            .copied()
            .filter(|b| *b != self.branch)
            .collect();
        if others.is_empty() {
            self.repo.commit_empty(CAP_MESSAGE)
        } else {
            self.repo.merge(&others, CAP_MESSAGE)
        }
    }

    /// Reverse-order restoration: cap back first, stash last. Falls back to
    /// an empty cap commit when the merge cannot be recreated (a partial
    /// mutation may have left an unmergeable branch behind).
    fn restore(&self) -> Result<()> {
        if let Err(merge_err) = self.recap() {
            log::warn!(
                "rollback could not recreate the cap merge ({}), capping with an empty commit",
                merge_err
            );
            self.repo.checkout_force(&self.branch)?;
            self.repo.commit_empty(CAP_MESSAGE)?;
        }
        if self.stashed {
            self.repo.stash_pop()?;
        }
        Ok(())
    }
}
