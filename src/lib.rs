pub mod extract;
pub mod fetch;
pub mod github;
pub mod repo;

use std::io;
use std::path::{Path, PathBuf};

/// Configuration for [`clone`]. The default clones the HEAD of the
/// repository's default branch into `./{name}`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Target directory to clone into. Relative paths are resolved against
    /// the working directory; when unset the repository name is used.
    pub dir: Option<PathBuf>,
    /// Branch to clone.
    pub branch: Option<String>,
    /// Tag to clone.
    pub tag: Option<String>,
    /// Commit hash to clone. Takes precedence over `tag` and `branch`.
    pub commit: Option<String>,
    /// Write into the target directory even if it already exists.
    pub force: bool,
}

/// The result of a successful [`clone`].
#[derive(Debug, Clone)]
pub struct CloneResult {
    /// Target directory relative to the working directory; falls back to
    /// the absolute path when the target lies outside it.
    pub target_dir_rel: PathBuf,
    /// Absolute path of the target directory.
    pub target_dir_abs: PathBuf,
    /// Owner of the repository, typically a user or organisation.
    pub repo_owner: String,
    /// Name of the repository.
    pub repo_name: String,
    /// The commit, tag, or branch that was cloned, or `"HEAD"`.
    pub repo_fragment: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to parse repository reference: {0}")]
    Parse(String),
    #[error("target directory already exists: {}", .0.display())]
    TargetExists(PathBuf),
    #[error("repository not found: {0}")]
    NotFound(String),
    #[error("server replied with status code: {0}")]
    Server(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid gzip stream: {0}")]
    Decompress(String),
    #[error("failed to unpack archive: {0}")]
    Unpack(#[source] io::Error),
    #[error("unsupported entry type {kind:?} for archive entry {name}")]
    UnsupportedEntry { name: String, kind: tar::EntryType },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Clones `repository` into a local directory without invoking git.
///
/// ```no_run
/// let result = ghget::clone("github.com/AaronCQL/gitget", &ghget::Config::default())?;
/// println!(
///     "Cloned {}/{} ({}) into {}",
///     result.repo_owner,
///     result.repo_name,
///     result.repo_fragment,
///     result.target_dir_rel.display(),
/// );
/// # Ok::<(), ghget::Error>(())
/// ```
pub fn clone(repository: &str, config: &Config) -> Result<CloneResult, Error> {
    let work_dir = std::env::current_dir()?;
    let repo = repo::parse(repository)?;
    let source = github::locate(&repo, config);
    clone_in(&work_dir, repo, source, config)
}

pub(crate) fn clone_in(
    work_dir: &Path,
    repo: repo::RepoRef,
    source: github::ArchiveSource,
    config: &Config,
) -> Result<CloneResult, Error> {
    let target_dir = resolve_target(work_dir, config.dir.as_deref(), &repo.name);
    // Fail-fast guard only; the check and the later writes are not atomic.
    if target_dir.exists() && !config.force {
        return Err(Error::TargetExists(target_dir));
    }

    log::info!("downloading {}", source.url);
    let response = fetch::fetch(&source.url)?;
    log::info!("unpacking into {}", target_dir.display());
    extract::unpack(response, &target_dir)?;

    let target_dir_rel = target_dir
        .strip_prefix(work_dir)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| target_dir.clone());
    Ok(CloneResult {
        target_dir_rel,
        target_dir_abs: target_dir,
        repo_owner: repo.owner,
        repo_name: repo.name,
        repo_fragment: source.fragment,
    })
}

/// Computes the absolute target directory: the repository name under the
/// working directory by default, a requested absolute path verbatim, or a
/// requested relative path resolved against the working directory.
fn resolve_target(work_dir: &Path, requested: Option<&Path>, repo_name: &str) -> PathBuf {
    match requested.filter(|dir| !dir.as_os_str().is_empty()) {
        None => work_dir.join(repo_name),
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => work_dir.join(dir),
    }
}
