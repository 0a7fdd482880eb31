//! Cross-team collision detection and capture.
//!
//! Same-team agents never collide: two teammates may share a destination or
//! swap cells freely.

use crate::game::events::CaptureBlock;
use crate::game::{Agent, GameEvent, PowerupKind};

/// How an attacker/defender pair collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Both staged destinations are the same cell.
    Destination,
    /// Each agent's destination is the other's current cell.
    PathSwap,
}

/// Detect a collision between two agents' staged moves.
#[must_use]
pub fn detect_collision(a: &Agent, b: &Agent) -> Option<Collision> {
    if a.next_pos == b.next_pos {
        Some(Collision::Destination)
    } else if a.next_pos == b.pos && b.next_pos == a.pos {
        Some(Collision::PathSwap)
    } else {
        None
    }
}

/// Score moved from `defender` to an attacker on capture.
///
/// With a sword the attacker takes everything; otherwise half, rounded down.
#[must_use]
pub const fn capture_delta(defender_score: u32, sword: bool) -> u32 {
    if sword { defender_score } else { defender_score / 2 }
}

/// Attempt a capture after a detected collision.
///
/// On success the score is transferred, the defender is sent back to its
/// origin and made invulnerable for `invulnerability` ticks. The attacker
/// keeps its resolved destination. Returns the transferred delta.
pub fn resolve_capture(
    attacker: &mut Agent,
    defender: &mut Agent,
    invulnerability: u32,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    let sword = attacker.has(PowerupKind::Sword);
    let blocked = if defender.has(PowerupKind::Shield) && !sword {
        Some(CaptureBlock::Shield)
    } else if defender.invulnerability > 0 {
        Some(CaptureBlock::Invulnerable)
    } else {
        None
    };

    if let Some(reason) = blocked {
        events.push(GameEvent::CaptureBlocked {
            attacker: attacker.id,
            defender: defender.id,
            reason,
        });
        return None;
    }

    let delta = capture_delta(defender.score, sword);
    attacker.score = attacker.score.saturating_add(delta);
    defender.score -= delta;
    defender.next_pos = defender.origin;
    defender.invulnerability = invulnerability;

    events.push(GameEvent::Captured {
        attacker_owner: attacker.owner.clone(),
        attacker: attacker.id,
        defender_owner: defender.owner.clone(),
        defender: defender.id,
        delta,
    });
    Some(delta)
}
