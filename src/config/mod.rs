//! Configuration management

use crate::types::DealiasError;
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Copy a folder to another folder, replacing Finder aliases with the files
/// and folders they point to while keeping the alias names (plus the
/// target's extension for file aliases).
#[derive(Parser, Debug)]
#[command(name = "dealias", version, about, long_about = None)]
pub struct Cli {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory (created if missing)
    pub destination: PathBuf,

    /// Print every alias resolution and copy action
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory (absolute)
    pub source: PathBuf,

    /// Destination directory (absolute)
    pub destination: PathBuf,

    /// Log each copy action to stdout
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            verbose: false,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = DealiasError;

    /// Make both paths absolute and validate immediately
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Config {
            source: absolute(&cli.source)?,
            destination: absolute(&cli.destination)?,
            verbose: cli.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    ///
    /// Checks run on real paths (symlinks resolved), so `dest/` and `dest`,
    /// or a symlinked spelling of the source, are treated alike. Nothing is
    /// written to disk.
    pub fn validate(&self) -> Result<(), DealiasError> {
        let metadata = fs::metadata(&self.source).map_err(|_| DealiasError::SourceNotFound {
            path: self.source.clone(),
        })?;
        if !metadata.is_dir() {
            return Err(DealiasError::SourceNotDirectory {
                path: self.source.clone(),
            });
        }

        let source_real = fs::canonicalize(&self.source)?;
        let destination_real = real_path(&self.destination)?;

        if source_real == destination_real {
            return Err(DealiasError::SameDirectory { path: source_real });
        }
        if destination_real.starts_with(&source_real) {
            return Err(DealiasError::DestinationInsideSource {
                source_dir: self.source.clone(),
                destination: self.destination.clone(),
            });
        }

        if let Ok(existing) = fs::metadata(&self.destination) {
            if !existing.is_dir() {
                return Err(DealiasError::DestinationNotDirectory {
                    path: self.destination.clone(),
                });
            }
        }

        Ok(())
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Canonical form of `path`, which need not exist yet.
///
/// The deepest existing ancestor is canonicalized and the remaining
/// components are appended lexically.
fn real_path(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();

    let base = loop {
        match fs::canonicalize(&existing) {
            Ok(real) => break real,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let Some(last) = existing.components().next_back() else {
                    return Err(e);
                };
                let name = last.as_os_str().to_os_string();
                missing.push(name);
                if !existing.pop() {
                    return Err(e);
                }
            }
            Err(e) => return Err(e),
        }
    };

    let mut real = base;
    for name in missing.into_iter().rev() {
        match Path::new(&name).components().next() {
            Some(Component::ParentDir) => {
                real.pop();
            }
            Some(Component::CurDir) | None => {}
            Some(_) => real.push(name),
        }
    }
    Ok(real)
}
