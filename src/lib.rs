// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Pursuit: a deterministic rules engine for two-team grid pursuit games.
//!
//! Two players each control a team of agents on a rectangular board.
//! Defenders collect coins; attackers hunt defenders and steal a share of
//! their score. Power-ups grant timed abilities, portals teleport, and each
//! agent only sees a small window around itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (run / tournament / validate) │
//! ├─────────────────────────────────────┤
//! │   Tournament (bots, rounds, series) │
//! ├─────────────────────────────────────┤
//! │   Game (map, agents, tick resolver) │
//! └─────────────────────────────────────┘
//! ```
//!
//! A match is driven by calling [`Game::apply_actions`] once per tick with
//! one action map per player, after reading that player's
//! [`Game::agent_views`].

pub mod error;
pub mod game;
pub mod tournament;

pub use error::ConfigError;

// Re-export key game types at crate root for convenience
pub use game::{
    ActionMap, Agent, AgentId, AgentView, Direction, Game, MapTemplate, MatchResult, Position,
    PowerupKind, Role,
};
