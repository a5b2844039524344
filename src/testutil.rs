//! Scripted backend for unit tests.
//!
//! Mirrors the mock-operations style used for trait seams elsewhere: tests
//! register canned stdout per command prefix, inject failures at specific
//! commands, and assert on the exact command sequence afterwards.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::backend::Backend;
use crate::error::{Error, Result};

/// A rule-based `Backend` for tests.
///
/// Commands are matched as `"<subcommand> <args joined by spaces>"` against
/// registered prefixes, first match wins in registration order. A command
/// with no matching rule succeeds with empty output, so tests only script
/// the output they care about.
pub(crate) struct ScriptedBackend {
    rules: Mutex<Vec<Rule>>,
    failures: Mutex<Vec<Failure>>,
    side_effects: Mutex<Vec<(String, PathBuf)>>,
    calls: Arc<Mutex<Vec<String>>>,
}

struct Rule {
    prefix: String,
    /// Consumed front-to-back; the final response repeats forever.
    responses: Vec<String>,
    next: usize,
}

struct Failure {
    substring: String,
    status: i32,
    stderr: String,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            side_effects: Mutex::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create `dir` whenever a command starting with `prefix` runs. Lets
    /// tests model commands with filesystem effects, e.g. `init` creating
    /// `.git`.
    pub(crate) fn create_dir_on(&self, prefix: &str, dir: &Path) {
        self.side_effects
            .lock()
            .unwrap()
            .push((prefix.to_string(), dir.to_path_buf()));
    }

    /// Always answer `output` for commands starting with `prefix`.
    pub(crate) fn on(&self, prefix: &str, output: &str) {
        self.on_seq(prefix, &[output]);
    }

    /// Answer each output in turn for commands starting with `prefix`; the
    /// last output repeats once the sequence is exhausted.
    pub(crate) fn on_seq(&self, prefix: &str, outputs: &[&str]) {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            responses: outputs.iter().map(ToString::to_string).collect(),
            next: 0,
        });
    }

    /// Fail any command containing `substring`.
    pub(crate) fn fail_on(&self, substring: &str, status: i32, stderr: &str) {
        self.failures.lock().unwrap().push(Failure {
            substring: substring.to_string(),
            status,
            stderr: stderr.to_string(),
        });
    }

    /// Every command issued so far, as `"<subcommand> <args>"` lines.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// A handle onto the call log, for tests that move the backend into a
    /// `Box<dyn Backend>` before asserting.
    pub(crate) fn calls_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl Backend for ScriptedBackend {
    fn run(&self, subcommand: &str, args: &[&str], cwd: &Path) -> Result<String> {
        let command = if args.is_empty() {
            subcommand.to_string()
        } else {
            format!("{} {}", subcommand, args.join(" "))
        };
        self.calls.lock().unwrap().push(command.clone());

        for (prefix, dir) in self.side_effects.lock().unwrap().iter() {
            if command.starts_with(prefix.as_str()) {
                std::fs::create_dir_all(dir).expect("side-effect dir is creatable");
            }
        }

        for failure in self.failures.lock().unwrap().iter() {
            if command.contains(&failure.substring) {
                return Err(Error::BackendCommandFailed {
                    command,
                    dir: cwd.to_path_buf(),
                    status: failure.status,
                    stderr: failure.stderr.clone(),
                });
            }
        }

        for rule in self.rules.lock().unwrap().iter_mut() {
            if command.starts_with(&rule.prefix) {
                let index = rule.next.min(rule.responses.len() - 1);
                rule.next += 1;
                return Ok(rule.responses[index].clone());
            }
        }

        Ok(String::new())
    }
}
