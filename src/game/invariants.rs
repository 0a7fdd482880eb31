//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine. They are
//! checked between ticks by tests and by the match driver in debug builds.

use std::collections::HashSet;

use crate::game::{Game, PowerupKind, TemplateCell};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
/// Agents standing on walls are not flagged: pass-wall can expire while an
/// agent is inside a wall.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = game.board();
    let base_vision = game.template().conf.vision_range;
    let mut seen = HashSet::new();

    for (idx, agent) in game.agents().iter().enumerate() {
        if usize::try_from(agent.id).ok() != Some(idx) || !seen.insert(agent.id) {
            violations.push(InvariantViolation {
                message: format!("Agent at slot {idx} has id {}", agent.id),
            });
        }

        if !board.in_bounds(agent.pos) {
            violations.push(InvariantViolation {
                message: format!("Agent {} at {} is outside the board", agent.id, agent.pos),
            });
        }

        if agent.next_pos != agent.pos {
            violations.push(InvariantViolation {
                message: format!(
                    "Agent {} has staged move {} outside tick resolution",
                    agent.id, agent.next_pos
                ),
            });
        }

        if let Some((kind, _)) = agent.powerups.iter().find(|&(_, left)| left == 0) {
            violations.push(InvariantViolation {
                message: format!("Agent {} holds {kind} with no time left", agent.id),
            });
        }

        if !agent.has(PowerupKind::Extravision) && agent.vision_range != base_vision {
            violations.push(InvariantViolation {
                message: format!(
                    "Agent {} has vision {} without extravision (base {base_vision})",
                    agent.id, agent.vision_range
                ),
            });
        }

        if agent.is_attacker() && agent.invulnerability > 0 {
            violations.push(InvariantViolation {
                message: format!("Attacker {} is invulnerable", agent.id),
            });
        }
    }

    let fixed = game
        .template()
        .count(|c| matches!(c, TemplateCell::Wall | TemplateCell::Portal { .. }));
    let standing = board.iter().filter(|(_, cell)| cell.is_permanent()).count();
    if standing != fixed {
        violations.push(InvariantViolation {
            message: format!("Board holds {standing} walls and portals, map defines {fixed}"),
        });
    }

    violations
}
