//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `rgit` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! The `Error` enum covers:
//!
//! - Missing enclosing repositories.
//! - Malformed qualified branch names.
//! - Corrupt graft files (including multi-parent graft lines, which are
//!   rejected rather than guessed at).
//! - Git command execution failures.
//! - Cap-transaction failures, including the distinct, more severe case
//!   where rollback itself failed and repository state may be inconsistent.
//! - Benign reinitialization of an existing repository.
//! - A held repository lock (a concurrent or killed invocation).
//! - Submodule-registry file errors.
//! - I/O errors.
//!
//! `TransactionFailed` means the repository was restored to its
//! pre-transaction state before the error surfaced; `TransactionRollbackFailed`
//! means it may not have been, so operators can tell the two apart.

use std::path::PathBuf;

use thiserror::Error;

use crate::transaction::Stage;

/// Main error type for rgit operations
#[derive(Error, Debug)]
pub enum Error {
    /// No enclosing git repository was found when one was required.
    #[error("not an rgit repository (or any parent up to filesystem root): {}", path.display())]
    NotARepository { path: PathBuf },

    /// A qualified branch name did not have the `@group/.../%group` shape.
    #[error("malformed branch name: {name} - {message}")]
    MalformedBranchName { name: String, message: String },

    /// A graft-file line did not consist of exactly one child and one parent
    /// commit id. Multi-parent graft lines are unsupported and land here too.
    #[error("corrupt graft file {} at line {line}: {content:?}", path.display())]
    CorruptGraftFile {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// A git subcommand exited with a non-zero status.
    #[error("git {command} failed in {} (exit status {status}): {stderr}", dir.display())]
    BackendCommandFailed {
        command: String,
        dir: PathBuf,
        status: i32,
        stderr: String,
    },

    /// A cap transaction failed; all completed steps were rolled back before
    /// this error was raised.
    #[error("cap transaction failed during {stage}: {source}")]
    TransactionFailed {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// Rollback of a failed cap transaction itself failed; the repository may
    /// be left without its cap commit or with a stranded stash entry.
    #[error("cap transaction rollback failed during {stage}: {message} (repository state may be inconsistent)")]
    TransactionRollbackFailed { stage: Stage, message: String },

    /// The target directory already holds a repository. Benign: callers take
    /// the idempotent re-init path instead of treating this as fatal.
    #[error("repository already initialized at {}", path.display())]
    AlreadyInitialized { path: PathBuf },

    /// Another rgit invocation holds the repository lock, or a previous one
    /// was killed mid-operation and left it behind.
    #[error("repository lock is held: {} (remove it manually if no other rgit process is running)", path.display())]
    LockHeld { path: PathBuf },

    /// An error occurred reading or writing the submodule-registry files.
    #[error("submodule registry error: {message}")]
    Registry { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors that signal "already done" rather than a real failure.
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::AlreadyInitialized { .. })
    }
}
