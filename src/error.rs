use glam::Vec3;
use thiserror::Error;

/// Why a chain cannot be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChainDefect {
    #[error("chain has {0} joint(s), at least 2 are required")]
    TooFewJoints(usize),
    #[error("chain has {0} joints, at most 3 are supported")]
    TooManyJoints(usize),
    #[error("bone {0} has zero length")]
    ZeroLengthBone(usize),
    #[error("pole vector is not finite")]
    NonFinitePole,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolverError {
    #[error("degenerate chain: {0}")]
    DegenerateChain(ChainDefect),

    #[error("target {0} is not finite")]
    NonFiniteTarget(Vec3),
}

/// Errors raised while building a skeleton or loading a rig description.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid rig description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate joint name `{0}`")]
    DuplicateJoint(String),

    #[error("joint `{0}` has a non-finite translation")]
    NonFiniteTranslation(String),

    #[error("joint `{0}` has a zero or non-finite rotation")]
    InvalidRotation(String),

    #[error("joint `{joint}` refers to unknown parent `{parent}`")]
    UnknownParent { joint: String, parent: String },

    #[error("chain `{chain}` refers to unknown joint `{joint}`")]
    UnknownJoint { chain: String, joint: String },

    #[error("chain `{chain}`: joint `{joint}` is not a child of the previous chain joint")]
    BrokenChain { chain: String, joint: String },

    #[error("unknown chain `{0}`")]
    UnknownChain(String),

    #[error("chain `{chain}`: {source}")]
    InvalidChain {
        chain: String,
        #[source]
        source: SolverError,
    },
}
