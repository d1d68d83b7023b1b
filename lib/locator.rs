//! Repository locators.

use std::fmt;
use std::str::FromStr;

/// Identifies one repository on the configured host, written `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocator {
    /// Owner or organization login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoLocator {
    /// Build a locator from its parts.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoLocator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: (*owner).to_owned(),
                repo: (*repo).to_owned(),
            }),
            _ => Err(format!("invalid repository '{s}', expected 'owner/repo'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_repo() {
        let locator: RepoLocator = "octocat/hello-world".parse().unwrap();
        assert_eq!(locator, RepoLocator::new("octocat", "hello-world"));
        assert_eq!(locator.to_string(), "octocat/hello-world");
    }

    #[test]
    fn rejects_malformed_locators() {
        for bad in ["", "noslash", "a/b/c", "/repo", "owner/", "/"] {
            assert!(bad.parse::<RepoLocator>().is_err(), "{bad:?} should fail");
        }
    }
}
