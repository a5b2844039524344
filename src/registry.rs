//! # Subrepo Registry
//!
//! Bookkeeping files that record which subrepos exist and how they are
//! pinned:
//!
//! - **Module list** (`.gitmodules`, at the parent subrepo's root): one
//!   `[submodule "name"]` section per registered subrepo with `path` and
//!   `branch` keys. Read and written through the `ini` crate.
//! - **Pin file** (`.rgit`, at each subrepo's root): two key-value lines,
//!   `pin = <revision-or-latest>` and `rgit_version = <semver>`. The line
//!   format is fixed, so it is parsed directly rather than through a
//!   general INI reader.
//!
//! The registry is deliberately thin; the orchestrator drives it as part of
//! registering a new subrepo and commits the resulting files itself.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use semver::Version;

use crate::error::{Error, Result};

/// Module-list file name, relative to a parent subrepo root.
pub const MODULES_FILE: &str = ".gitmodules";

/// Pin file name, relative to a subrepo root.
pub const PIN_FILE: &str = ".rgit";

/// What a subrepo is pinned to: a concrete revision, or whatever the branch
/// tip currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pin {
    Latest,
    Revision(String),
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Latest => write!(f, "latest"),
            Pin::Revision(rev) => write!(f, "{}", rev),
        }
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(Error::Registry {
                message: "empty pin value".to_string(),
            }),
            "latest" => Ok(Pin::Latest),
            rev => Ok(Pin::Revision(rev.to_string())),
        }
    }
}

/// Parsed contents of a `.rgit` pin file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinFile {
    pub pin: Pin,
    pub rgit_version: Version,
}

/// One `[submodule "..."]` entry from a module list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub name: String,
    pub path: PathBuf,
    pub branch: String,
}

/// Reads and writes the per-subrepo pin file and the parent's module list.
pub struct SubrepoRegistry {
    tool_version: Version,
}

impl SubrepoRegistry {
    pub fn new(tool_version: Version) -> Self {
        Self { tool_version }
    }

    /// Add (or update) the module entry for `name` in the module list at
    /// `parent_root`, returning the path of the file written.
    ///
    /// The file is emitted in git's own `.gitmodules` shape (quoted section
    /// names, tab-indented keys), which the `ini` parser reads back
    /// verbatim.
    pub fn register_module(
        &self,
        parent_root: &Path,
        name: &str,
        path: &Path,
        branch: &str,
    ) -> Result<PathBuf> {
        let modules_path = parent_root.join(MODULES_FILE);

        let mut entries = self.modules(parent_root)?;
        let entry = ModuleEntry {
            name: name.to_string(),
            path: path.to_path_buf(),
            branch: branch.to_string(),
        };
        match entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }

        let mut content = String::new();
        for entry in &entries {
            content.push_str(&format!(
                "[submodule \"{}\"]\n\tpath = {}\n\tbranch = {}\n",
                entry.name,
                entry.path.display(),
                entry.branch
            ));
        }
        fs::write(&modules_path, content)?;

        Ok(modules_path)
    }

    /// All module entries registered at `parent_root`. A missing module list
    /// means no subrepos are registered yet.
    pub fn modules(&self, parent_root: &Path) -> Result<Vec<ModuleEntry>> {
        let modules_path = parent_root.join(MODULES_FILE);
        if !modules_path.exists() {
            return Ok(Vec::new());
        }

        let modules = Ini::load_from_file(&modules_path).map_err(|e| Error::Registry {
            message: format!("failed to parse {}: {}", modules_path.display(), e),
        })?;

        let mut entries = Vec::new();
        for (section, properties) in modules.iter() {
            let Some(section) = section else { continue };
            let Some(name) = section
                .strip_prefix("submodule \"")
                .and_then(|s| s.strip_suffix('"'))
            else {
                continue;
            };
            let missing = |key: &str| Error::Registry {
                message: format!(
                    "{}: submodule \"{}\" is missing the {} key",
                    modules_path.display(),
                    name,
                    key
                ),
            };
            entries.push(ModuleEntry {
                name: name.to_string(),
                path: PathBuf::from(properties.get("path").ok_or_else(|| missing("path"))?),
                branch: properties
                    .get("branch")
                    .ok_or_else(|| missing("branch"))?
                    .to_string(),
            });
        }
        Ok(entries)
    }

    /// Write a fresh pin file at `subrepo_root`, stamped with the tool
    /// version this registry was constructed with.
    pub fn write_pin_file(&self, subrepo_root: &Path, pin: &Pin) -> Result<PathBuf> {
        let path = subrepo_root.join(PIN_FILE);
        fs::write(
            &path,
            format!("pin = {}\nrgit_version = {}\n", pin, self.tool_version),
        )?;
        Ok(path)
    }

    /// Parse a pin file. Both keys are required.
    pub fn read_pin_file(&self, subrepo_root: &Path) -> Result<PinFile> {
        let path = subrepo_root.join(PIN_FILE);
        let content = fs::read_to_string(&path)?;

        let mut pin = None;
        let mut version = None;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Registry {
                    message: format!("{}: malformed line {:?}", path.display(), line),
                });
            };
            match key.trim() {
                "pin" => pin = Some(value.trim().parse::<Pin>()?),
                "rgit_version" => {
                    version = Some(Version::parse(value.trim()).map_err(|e| Error::Registry {
                        message: format!("{}: bad rgit_version: {}", path.display(), e),
                    })?)
                }
                other => {
                    return Err(Error::Registry {
                        message: format!("{}: unknown key {:?}", path.display(), other),
                    })
                }
            }
        }

        let missing = |key: &str| Error::Registry {
            message: format!("{}: missing {} line", path.display(), key),
        };
        Ok(PinFile {
            pin: pin.ok_or_else(|| missing("pin"))?,
            rgit_version: version.ok_or_else(|| missing("rgit_version"))?,
        })
    }
}
