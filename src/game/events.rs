//! Per-tick event log.
//!
//! The log is replaced on every tick; callers that want history must copy it
//! out before the next `apply_actions`.

use std::fmt;

use crate::game::{AgentId, Position, PowerupKind};

/// Why a capture did not happen on a cross-team collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureBlock {
    /// Defender holds a shield and the attacker has no sword.
    Shield,
    /// Defender is still immune after a previous capture.
    Invulnerable,
}

/// Something notable that happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// An action token was not a known direction; the agent stays.
    InvalidAction {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
        /// Token as received.
        token: String,
    },
    /// No action was supplied for the agent; it stays.
    MissingAction {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
    },
    /// The move would leave the board and was cancelled.
    OutOfBounds {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
    },
    /// The move ran into a wall and was cancelled.
    WallBlocked {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
    },
    /// The agent stepped on a portal.
    Teleported {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
        /// Exit position.
        to: Position,
    },
    /// A defender picked up a coin.
    CoinCollected {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
        /// Points gained.
        score: u32,
    },
    /// An agent picked up a power-up.
    PowerupCollected {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
        /// Kind granted.
        kind: PowerupKind,
    },
    /// A held power-up ran out.
    PowerupExpired {
        /// Controlling player.
        owner: String,
        /// Agent concerned.
        agent: AgentId,
        /// Kind that expired.
        kind: PowerupKind,
    },
    /// An attacker captured a defender.
    Captured {
        /// Attacking player.
        attacker_owner: String,
        /// Attacking agent.
        attacker: AgentId,
        /// Defending player.
        defender_owner: String,
        /// Captured agent.
        defender: AgentId,
        /// Score moved from defender to attacker.
        delta: u32,
    },
    /// A collision happened but the capture was suppressed.
    CaptureBlocked {
        /// Attacking agent.
        attacker: AgentId,
        /// Defending agent.
        defender: AgentId,
        /// Why it was suppressed.
        reason: CaptureBlock,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAction { owner, agent, token } => {
                write!(f, "player[{owner}] agent[{agent}] sent invalid action {token:?}, staying")
            }
            Self::MissingAction { owner, agent } => {
                write!(f, "player[{owner}] agent[{agent}] has no action, staying")
            }
            Self::OutOfBounds { owner, agent } => {
                write!(f, "player[{owner}] agent[{agent}] tried to leave the board")
            }
            Self::WallBlocked { owner, agent } => {
                write!(f, "player[{owner}] agent[{agent}] bumped into a wall")
            }
            Self::Teleported { owner, agent, to } => {
                write!(f, "player[{owner}] agent[{agent}] teleported to {to}")
            }
            Self::CoinCollected { owner, agent, score } => {
                write!(f, "player[{owner}] agent[{agent}] collected a coin (+{score})")
            }
            Self::PowerupCollected { owner, agent, kind } => {
                write!(f, "player[{owner}] agent[{agent}] picked up {kind}")
            }
            Self::PowerupExpired { owner, agent, kind } => {
                write!(f, "player[{owner}] agent[{agent}] lost {kind}")
            }
            Self::Captured {
                attacker_owner,
                attacker,
                defender_owner,
                defender,
                delta,
            } => write!(
                f,
                "player[{attacker_owner}] agent[{attacker}] captured player[{defender_owner}] agent[{defender}], taking {delta} points"
            ),
            Self::CaptureBlocked {
                attacker,
                defender,
                reason,
            } => {
                let why = match reason {
                    CaptureBlock::Shield => "shield",
                    CaptureBlock::Invulnerable => "invulnerability",
                };
                write!(f, "agent[{attacker}] failed to capture agent[{defender}] ({why})")
            }
        }
    }
}
