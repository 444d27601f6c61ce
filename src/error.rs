use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// A frame-sheet (or other asset) is missing, unreadable or malformed.
    ResourceLoad { asset: String, reason: String },
    /// Geometry or tunables that cannot drive the game loop.
    Configuration { reason: String },
}

impl GameError {
    pub fn resource(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceLoad { asset, reason } => {
                write!(f, "failed to load asset `{asset}`: {reason}")
            }
            Self::Configuration { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}
