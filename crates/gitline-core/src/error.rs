#![forbid(unsafe_code)]

use std::fmt;

/// Invariant violations raised while building a [`Graph`](crate::Graph).
///
/// These are builder bugs, not runtime conditions: construction is aborted at
/// the offending call and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    EmptyBranchName,
    DuplicateBranch { name: String },
    UnknownBranch { name: String },
    AlreadyStarted,
    NotStarted,
    AlreadyEnded,
    GraphEnded,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBranchName => write!(f, "branch name must not be empty"),
            Self::DuplicateBranch { name } => {
                write!(f, "branch names must be unique: '{name}' already exists")
            }
            Self::UnknownBranch { name } => {
                write!(f, "'{name}' does not refer to an existing branch")
            }
            Self::AlreadyStarted => write!(f, "graph already started"),
            Self::NotStarted => write!(f, "graph has not been started"),
            Self::AlreadyEnded => write!(f, "graph already ended"),
            Self::GraphEnded => write!(f, "graph has been ended"),
        }
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::GraphError;

    #[test]
    fn display_names_the_branch() {
        let err = GraphError::UnknownBranch {
            name: "hotfix".into(),
        };
        assert_eq!(err.to_string(), "'hotfix' does not refer to an existing branch");
        let err = GraphError::DuplicateBranch {
            name: "master".into(),
        };
        assert!(err.to_string().contains("'master'"));
    }
}
