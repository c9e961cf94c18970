use crate::repo::RepoRef;
use crate::Config;

const GITHUB_BASE: &str = "https://github.com";
const GITHUB_API_BASE: &str = "https://api.github.com";

/// The download URL for one snapshot archive, plus the human-readable
/// fragment (commit, tag, or branch) it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    pub url: String,
    pub fragment: String,
}

/// Computes the archive URL for the requested ref. Precedence is
/// commit > tag > branch; with no ref the GitHub API tarball endpoint is
/// used, which redirects to the HEAD of the default branch.
pub fn locate(repo: &RepoRef, config: &Config) -> ArchiveSource {
    locate_with_bases(repo, config, GITHUB_BASE, GITHUB_API_BASE)
}

pub(crate) fn locate_with_bases(
    repo: &RepoRef,
    config: &Config,
    base: &str,
    api_base: &str,
) -> ArchiveSource {
    let RepoRef { owner, name } = repo;
    if let Some(commit) = non_empty(&config.commit) {
        ArchiveSource {
            url: format!("{base}/{owner}/{name}/archive/{commit}.tar.gz"),
            fragment: commit.to_string(),
        }
    } else if let Some(tag) = non_empty(&config.tag) {
        ArchiveSource {
            url: format!("{base}/{owner}/{name}/archive/refs/tags/{tag}.tar.gz"),
            fragment: tag.to_string(),
        }
    } else if let Some(branch) = non_empty(&config.branch) {
        ArchiveSource {
            url: format!("{base}/{owner}/{name}/archive/refs/heads/{branch}.tar.gz"),
            fragment: branch.to_string(),
        }
    } else {
        ArchiveSource {
            url: format!("{api_base}/repos/{owner}/{name}/tarball"),
            fragment: String::from("HEAD"),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
