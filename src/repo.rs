use crate::Error;

/// Reference prefixes accepted by [`parse`], checked in order.
const PREFIXES: &[&str] = &[
    "github:",
    "git@github.com:",
    "https://github.com/",
    "github.com/",
];

/// A repository identified by its owner (user or organisation) and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// Parses a user-supplied repository reference like `github.com/owner/name`.
///
/// The first matching prefix wins; the remainder is split on `/` with the
/// first segment as owner and the second as name. Anything after the name
/// (deep links into a file, for example) is ignored, and a trailing `.git`
/// on the name is stripped. No network validation happens here.
pub fn parse(input: &str) -> Result<RepoRef, Error> {
    let rest = PREFIXES
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .ok_or_else(|| Error::Parse(input.to_string()))?;
    let (owner, rest) = rest
        .split_once('/')
        .ok_or_else(|| Error::Parse(input.to_string()))?;
    let name = rest.split('/').next().unwrap_or(rest);
    let name = name.strip_suffix(".git").unwrap_or(name);
    if owner.is_empty() || name.is_empty() {
        return Err(Error::Parse(input.to_string()));
    }
    Ok(RepoRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}
