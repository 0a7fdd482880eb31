//! Coin and power-up pickup resolution.

use crate::game::{Agent, Board, Cell, GameEvent, PowerupConf, PowerupKind};

/// Consume whatever the agent's staged destination holds, if it may.
///
/// Coins are defender-only. Power-ups follow the role eligibility table and
/// must be enabled in `powerups`; ineligible or disabled pickups leave the
/// cell in place.
pub fn resolve_pickup(
    board: &mut Board,
    agent: &mut Agent,
    powerups: &PowerupConf,
    events: &mut Vec<GameEvent>,
) {
    let dest = agent.next_pos;
    match board.get(dest) {
        Some(&Cell::Coin { score }) if agent.is_defender() => {
            board.remove(dest);
            agent.score = agent.score.saturating_add(score);
            events.push(GameEvent::CoinCollected {
                owner: agent.owner.clone(),
                agent: agent.id,
                score,
            });
        }
        Some(&Cell::Powerup { kind }) if kind.eligible(agent.role) => {
            let Some(duration) = powerups.duration(kind) else {
                return;
            };
            if kind == PowerupKind::Extravision {
                let Some(extra) = powerups.extra_vision() else {
                    return;
                };
                agent.vision_range = extra;
            }
            board.remove(dest);
            agent.powerups.grant(kind, duration);
            events.push(GameEvent::PowerupCollected {
                owner: agent.owner.clone(),
                agent: agent.id,
                kind,
            });
        }
        _ => {}
    }
}
