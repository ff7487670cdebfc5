//! Coverage-profile HTML overlay.
//!
//! Takes a `go test -coverprofile` output and the analysis report of the same
//! package, and renders the package source with statement coverage plus the
//! functions that are only covered indirectly.

pub mod html;
pub mod profile;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::Report;

pub use profile::{Boundary, Mode, Profile, ProfileBlock};

/// Errors from reading a profile or the sources it names.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: malformed profile block {text:?}")]
    Malformed { line: usize, text: String },
    #[error("bad or missing mode line")]
    MissingMode,
    #[error("profile is empty")]
    Empty,
    #[error("{file}: inconsistent statement count for block at line {line}")]
    InconsistentBlock { file: String, line: usize },
    #[error("can't find source for {name} in {}", .dir.display())]
    SourceNotFound { name: String, dir: PathBuf },
}

/// Render the overlay page for every file in `profiles`.
///
/// Source files are looked up by file name inside `package_dir`.
pub fn render(profiles: &[Profile], package_dir: &Path, report: &Report) -> Result<String, ProfileError> {
    let Some(first) = profiles.first() else {
        return Err(ProfileError::Empty);
    };

    let mut files = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let path = find_source(&profile.file_name, package_dir)?;
        let src = fs::read(&path).map_err(|source| ProfileError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(file = %profile.file_name, blocks = profile.blocks.len(), "rendering");
        files.push(html::file_view(profile, &src, &path, report));
    }

    Ok(html::page(&files, first.mode))
}

fn find_source(name: &str, package_dir: &Path) -> Result<PathBuf, ProfileError> {
    let not_found = || ProfileError::SourceNotFound {
        name: name.to_string(),
        dir: package_dir.to_path_buf(),
    };
    let base = Path::new(name).file_name().ok_or_else(not_found)?;
    let path = package_dir.join(base);
    if path.is_file() {
        Ok(path)
    } else {
        Err(not_found())
    }
}

/// Write the page to `output`, or to a temporary file opened in a browser.
///
/// Returns where the page was written.
pub fn write_page(page: &str, output: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = output {
        fs::write(path, page)?;
        return Ok(path.to_path_buf());
    }

    let dir = std::env::temp_dir().join(format!("blanket-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let path = dir.join("coverage.html");
    fs::write(&path, page)?;

    let url = format!("file://{}", path.display());
    if let Err(error) = open::that(&url) {
        warn!(%url, %error, "could not open a browser");
        eprintln!("HTML output written to {}", path.display());
    }
    Ok(path)
}
