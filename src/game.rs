//! Game layer for Pursuit.
//!
//! Implements the rules of a two-team pursuit match on a grid:
//! - Board with walls, portals, coins and power-up spawns
//! - Attackers and defenders with timed power-ups
//! - A fixed-order tick resolver (timers, intents, terrain, pickups, captures)
//! - Vision-limited per-agent views and a full spectator snapshot

mod agent;
mod capture;
mod config;
mod events;
pub mod invariants;
mod map;
mod movement;
mod pickups;
mod snapshot;
mod state;
mod vision;

pub use agent::{Agent, AgentId, PowerupKind, Powerups, Role};
pub use capture::{Collision, capture_delta, detect_collision, resolve_capture};
pub use config::{
    CellSpec, CellSpecKind, ExtraVisionParams, MapConf, MapDefinition, MapTemplate, PowerupConf,
    PowerupParams, TemplateCell,
};
pub use events::{CaptureBlock, GameEvent};
pub use map::{Board, Cell, Direction, InvalidDirection, Position};
pub use movement::{apply_intent, resolve_terrain};
pub use pickups::resolve_pickup;
pub use snapshot::MapSnapshot;
pub use state::{ActionMap, Game, MatchResult, RESOLUTION_ORDER, SideResult, TICK_PHASES, TickPhase};
pub use vision::{
    AgentState, AgentView, CellViews, CoinView, PortalView, PowerupView, WallView, can_observe,
    project_view,
};
