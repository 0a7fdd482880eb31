//! Built-in controllers.
//!
//! These stand in for external AI programs: they see exactly what a remote
//! program would see (the per-agent views) and answer with direction tokens.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::{ActionMap, AgentId, AgentView, Direction, Position, PowerupKind, Role};
use crate::tournament::TournamentError;

/// Names accepted by [`bot_by_name`].
pub const BOT_NAMES: [&str; 3] = ["stay", "random", "greedy"];

/// Something that picks one action per controlled agent each tick.
pub trait Controller: Send {
    /// Short display name.
    fn name(&self) -> &str;

    /// Choose actions from this tick's views, keyed by agent id.
    fn actions(&mut self, views: &BTreeMap<AgentId, AgentView>) -> ActionMap;
}

/// Every agent stays in place forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct StayBot;

impl Controller for StayBot {
    fn name(&self) -> &str {
        "stay"
    }

    fn actions(&mut self, views: &BTreeMap<AgentId, AgentView>) -> ActionMap {
        views
            .keys()
            .map(|&id| (id, Direction::Stay.token().to_string()))
            .collect()
    }
}

/// Uniformly random tokens from a seeded stream.
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: ChaCha8Rng,
}

impl RandomBot {
    /// Create a random bot with its own seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

fn random_direction(rng: &mut ChaCha8Rng) -> Direction {
    *Direction::ALL.choose(rng).unwrap_or(&Direction::Stay)
}

impl Controller for RandomBot {
    fn name(&self) -> &str {
        "random"
    }

    fn actions(&mut self, views: &BTreeMap<AgentId, AgentView>) -> ActionMap {
        views
            .keys()
            .map(|&id| (id, random_direction(&mut self.rng).token().to_string()))
            .collect()
    }
}

/// Attackers chase the nearest visible defender; defenders run from close
/// attackers and otherwise head for the nearest visible coin.
#[derive(Debug, Clone)]
pub struct GreedyBot {
    rng: ChaCha8Rng,
}

/// Attackers closer than this (Manhattan) make a defender flee.
const FLEE_DISTANCE: i32 = 2;

impl GreedyBot {
    /// Create a greedy bot; the seed drives moves when nothing is in sight.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn choose(&mut self, view: &AgentView) -> Direction {
        let me = &view.self_agent;
        let here = Position::new(me.x, me.y);

        let nearest = |targets: &mut dyn Iterator<Item = Position>| {
            targets.min_by_key(|&p| (here.manhattan(p), p.y, p.x))
        };

        match me.role {
            Role::Attacker => {
                let mut prey = view
                    .other_agents
                    .iter()
                    .filter(|a| a.role == me.role.opponent() && a.invulnerability == 0)
                    .map(|a| Position::new(a.x, a.y));
                if let Some(target) = nearest(&mut prey) {
                    return self.step_towards(view, here, target, true);
                }
            }
            Role::Defender => {
                let mut threats = view
                    .other_agents
                    .iter()
                    .filter(|a| a.role == me.role.opponent())
                    .map(|a| Position::new(a.x, a.y));
                let exposed = me.invulnerability == 0 && !me.powerups.has(PowerupKind::Shield);
                if let Some(threat) = nearest(&mut threats).filter(|&t| exposed && here.manhattan(t) <= FLEE_DISTANCE) {
                    return self.step_towards(view, here, threat, false);
                }
                let mut coins = view.cells.coins.iter().map(|c| Position::new(c.x, c.y));
                if let Some(target) = nearest(&mut coins) {
                    return self.step_towards(view, here, target, true);
                }
            }
        }

        random_direction(&mut self.rng)
    }

    /// Best single step towards (or away from) `target`, avoiding known walls.
    fn step_towards(&mut self, view: &AgentView, here: Position, target: Position, approach: bool) -> Direction {
        let passwall = view.self_agent.powerups.has(PowerupKind::Passwall);
        let blocked = |p: Position| !passwall && view.cells.walls.iter().any(|w| w.x == p.x && w.y == p.y);

        let candidates = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
        let best = candidates
            .iter()
            .copied()
            .filter(|&d| !blocked(here.step(d)))
            .min_by_key(|&d| {
                let dist = here.step(d).manhattan(target);
                if approach { dist } else { -dist }
            });

        best.unwrap_or_else(|| random_direction(&mut self.rng))
    }
}

impl Controller for GreedyBot {
    fn name(&self) -> &str {
        "greedy"
    }

    fn actions(&mut self, views: &BTreeMap<AgentId, AgentView>) -> ActionMap {
        views
            .iter()
            .map(|(&id, view)| (id, self.choose(view).token().to_string()))
            .collect()
    }
}

/// Instantiate a built-in controller by name.
///
/// # Errors
///
/// Returns [`TournamentError::UnknownBot`] for names not in [`BOT_NAMES`].
pub fn bot_by_name(name: &str, seed: u64) -> Result<Box<dyn Controller>, TournamentError> {
    match name {
        "stay" => Ok(Box::new(StayBot)),
        "random" => Ok(Box::new(RandomBot::new(seed))),
        "greedy" => Ok(Box::new(GreedyBot::new(seed))),
        other => Err(TournamentError::UnknownBot(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, MapTemplate};

    const MAP: &str = r#"{
        "map_conf": {"width": 7, "height": 7, "coin_score": 10,
                     "invulnerability_duration": 3, "max_steps": 50, "vision_range": 3},
        "map": [
            {"x": 1, "y": 3, "type": "ATTACKER"},
            {"x": 3, "y": 3, "type": "DEFENDER"},
            {"x": 3, "y": 0, "type": "COIN"},
            {"x": 2, "y": 2, "type": "WALL"}
        ]
    }"#;

    fn game() -> Game {
        let mut game = Game::new(MapTemplate::from_json(MAP).unwrap());
        game.reset("a", "d", 0);
        game
    }

    #[test]
    fn test_unknown_bot() {
        assert!(matches!(
            bot_by_name("clever", 0),
            Err(TournamentError::UnknownBot(name)) if name == "clever"
        ));
        for name in BOT_NAMES {
            assert_eq!(bot_by_name(name, 1).unwrap().name(), name);
        }
    }

    #[test]
    fn test_stay_bot_covers_every_agent() {
        let game = game();
        let actions = StayBot.actions(&game.agent_views("d"));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[&1], "STAY");
    }

    #[test]
    fn test_random_bot_is_seeded() {
        let game = game();
        let views = game.agent_views("a");
        let mut a = RandomBot::new(9);
        let mut b = RandomBot::new(9);
        for _ in 0..20 {
            assert_eq!(a.actions(&views), b.actions(&views));
        }
    }

    #[test]
    fn test_greedy_attacker_chases() {
        let game = game();
        let actions = GreedyBot::new(0).actions(&game.agent_views("a"));
        assert_eq!(actions[&0], "RIGHT");
    }

    #[test]
    fn test_greedy_defender_flees_close_attacker() {
        let game = game();
        let actions = GreedyBot::new(0).actions(&game.agent_views("d"));
        // Up, down and right all reach distance 3; the first wins.
        assert_eq!(actions[&1], "UP");
    }
}
