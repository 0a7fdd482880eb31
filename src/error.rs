//! Error types for map loading and match orchestration.
//!
//! The tick resolver itself never fails: malformed actions and illegal moves
//! degrade to "agent stays" and are reported through the event log instead.

use std::fmt;

/// Errors raised while turning a map description into a match template.
///
/// These are surfaced before any match starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The map file could not be read.
    Io(String),
    /// The map JSON is malformed or misses a required field.
    Json(String),
    /// Board width or height is zero or negative.
    EmptyBoard {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },
    /// A template cell lies outside the board.
    CellOutOfBounds {
        /// Cell column.
        x: i32,
        /// Cell row.
        y: i32,
    },
    /// A portal points at a position outside the board.
    PortalPairOutOfBounds {
        /// Pair column.
        x: i32,
        /// Pair row.
        y: i32,
    },
    /// A `PORTAL` entry has no `pair` field.
    MissingPortalPair {
        /// Portal column.
        x: i32,
        /// Portal row.
        y: i32,
    },
    /// The extra-vision power-up is configured without an `extra` range.
    MissingExtraVision,
    /// The template holds no spawn for one of the two teams.
    NoAgents {
        /// The role label without a spawn.
        role: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read map: {e}"),
            Self::Json(e) => write!(f, "invalid map description: {e}"),
            Self::EmptyBoard { width, height } => {
                write!(f, "board must be non-empty, got {width}x{height}")
            }
            Self::CellOutOfBounds { x, y } => write!(f, "cell ({x}, {y}) lies outside the board"),
            Self::PortalPairOutOfBounds { x, y } => {
                write!(f, "portal pair ({x}, {y}) lies outside the board")
            }
            Self::MissingPortalPair { x, y } => write!(f, "portal at ({x}, {y}) has no pair"),
            Self::MissingExtraVision => {
                write!(f, "extravision power-up requires an `extra` vision range")
            }
            Self::NoAgents { role } => write!(f, "map has no {role} spawn"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
