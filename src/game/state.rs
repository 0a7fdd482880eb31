//! Match state and the tick resolver.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::game::capture::{detect_collision, resolve_capture};
use crate::game::config::TemplateCell;
use crate::game::movement::{apply_intent, resolve_terrain};
use crate::game::pickups::resolve_pickup;
use crate::game::{
    Agent, AgentId, Board, Cell, Direction, GameEvent, MapTemplate, PowerupKind, Role,
};

/// Requested direction tokens for one team, keyed by agent id.
///
/// Tokens stay raw so that malformed input reaches the engine and degrades
/// to `STAY` there.
pub type ActionMap = BTreeMap<AgentId, String>;

/// Team order for every phase that touches shared resources (coins,
/// power-ups, commit). Within a team, agents go by ascending id.
pub const RESOLUTION_ORDER: [Role; 2] = [Role::Defender, Role::Attacker];

/// The phases of one tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// Decrement power-up and invulnerability timers.
    DecayTimers,
    /// Restock empty power-up spawns on refresh ticks.
    RefreshPowerups,
    /// Stage `next_pos` from the requested directions.
    ApplyIntents,
    /// Cancel out-of-bounds and wall moves, follow portals.
    ResolveTerrain,
    /// Collect coins and power-ups at the staged destinations.
    ResolvePickups,
    /// Detect attacker/defender collisions and capture.
    ResolveCaptures,
    /// Move every agent to its staged destination.
    Commit,
}

/// Phase order of [`Game::apply_actions`].
pub const TICK_PHASES: [TickPhase; 7] = [
    TickPhase::DecayTimers,
    TickPhase::RefreshPowerups,
    TickPhase::ApplyIntents,
    TickPhase::ResolveTerrain,
    TickPhase::ResolvePickups,
    TickPhase::ResolveCaptures,
    TickPhase::Commit,
];

/// Final summary for one side of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideResult {
    /// Player identifier.
    pub id: String,
    /// Role this player held for the match.
    pub role: Role,
    /// Sum of the player's agents' scores.
    pub score: u64,
    /// Accumulated external time usage, as reported by the caller.
    pub time_used: f64,
}

/// Final summary of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Attacker side first, then defender side.
    pub players: [SideResult; 2],
    /// Ticks elapsed.
    pub steps: u32,
}

impl MatchResult {
    /// The side played by `role`.
    #[must_use]
    pub fn side(&self, role: Role) -> &SideResult {
        match role {
            Role::Attacker => &self.players[0],
            Role::Defender => &self.players[1],
        }
    }
}

/// A single match instance.
///
/// Owns the immutable template and all mutable per-match state. Call
/// [`Game::reset`] before the first tick and again for every rematch.
#[derive(Debug, Clone)]
pub struct Game {
    template: MapTemplate,
    board: Board,
    /// Indexed by agent id.
    agents: Vec<Agent>,
    tick: u32,
    rng: ChaCha8Rng,
    attacker: String,
    defender: String,
    attacker_time: f64,
    defender_time: f64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game for `template`, reset with placeholder owners and seed 0.
    #[must_use]
    pub fn new(template: MapTemplate) -> Self {
        let mut game = Self {
            board: template.blank_board(),
            template,
            agents: Vec::new(),
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
            attacker: String::new(),
            defender: String::new(),
            attacker_time: 0.0,
            defender_time: 0.0,
            events: Vec::new(),
        };
        game.reset("attacker", "defender", 0);
        game
    }

    /// Reinitialize the board, agents, counters and RNG from the template.
    ///
    /// Power-up spawns draw their kind from the freshly seeded RNG in
    /// template order, and agents get ids in template order. Calling this
    /// again with the same arguments reproduces the same initial state.
    pub fn reset(&mut self, attacker: &str, defender: &str, seed: u64) {
        self.attacker = attacker.to_string();
        self.defender = defender.to_string();
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.board = self.template.blank_board();
        self.agents.clear();
        self.tick = 0;
        self.attacker_time = 0.0;
        self.defender_time = 0.0;
        self.events.clear();

        let base_vision = self.template.conf.vision_range;
        let coin_score = self.template.conf.coin_score;

        for (pos, cell) in self.template.cells() {
            let pos = *pos;
            match cell {
                TemplateCell::Wall => {
                    self.board.insert(pos, Cell::Wall);
                }
                TemplateCell::Portal { pair, name } => {
                    self.board.insert(
                        pos,
                        Cell::Portal {
                            pair: *pair,
                            name: name.clone(),
                        },
                    );
                }
                TemplateCell::Coin => {
                    self.board.insert(pos, Cell::Coin { score: coin_score });
                }
                TemplateCell::Powerup => {
                    let kind = draw_kind(&mut self.rng);
                    self.board.insert(pos, Cell::Powerup { kind });
                }
                TemplateCell::Spawn(role) => {
                    let owner = match role {
                        Role::Attacker => attacker,
                        Role::Defender => defender,
                    };
                    let id = AgentId::try_from(self.agents.len()).unwrap_or(AgentId::MAX);
                    self.agents.push(Agent::new(id, *role, owner, pos, base_vision));
                }
            }
        }

        debug!(
            seed,
            agents = self.agents.len(),
            coins = self.board.coin_count(),
            "match reset"
        );
    }

    /// Advance the match by exactly one tick.
    ///
    /// Missing or malformed actions resolve to `STAY` and are logged; this
    /// never fails. The time values are added to each side's accumulator and
    /// are only reported back through [`Game::result`].
    pub fn apply_actions(
        &mut self,
        attacker_actions: &ActionMap,
        defender_actions: &ActionMap,
        attacker_time: f64,
        defender_time: f64,
    ) {
        self.events.clear();
        self.tick += 1;
        self.attacker_time += attacker_time;
        self.defender_time += defender_time;

        let order = self.resolution_order();

        for phase in TICK_PHASES {
            match phase {
                TickPhase::DecayTimers => self.decay_timers(),
                TickPhase::RefreshPowerups => self.refresh_powerups(),
                TickPhase::ApplyIntents => {
                    self.apply_intents(&order, attacker_actions, defender_actions);
                }
                TickPhase::ResolveTerrain => {
                    for &idx in &order {
                        resolve_terrain(&self.board, &mut self.agents[idx], &mut self.events);
                    }
                }
                TickPhase::ResolvePickups => {
                    for &idx in &order {
                        resolve_pickup(
                            &mut self.board,
                            &mut self.agents[idx],
                            &self.template.powerups,
                            &mut self.events,
                        );
                    }
                }
                TickPhase::ResolveCaptures => self.resolve_captures(),
                TickPhase::Commit => {
                    for &idx in &order {
                        let agent = &mut self.agents[idx];
                        agent.pos = agent.next_pos;
                    }
                }
            }
        }

        debug!(tick = self.tick, events = self.events.len(), "tick resolved");
    }

    /// Shorthand for [`Game::apply_actions`] without time bookkeeping.
    pub fn step(&mut self, attacker_actions: &ActionMap, defender_actions: &ActionMap) {
        self.apply_actions(attacker_actions, defender_actions, 0.0, 0.0);
    }

    /// Agent indices: defenders by ascending id, then attackers by ascending id.
    fn resolution_order(&self) -> Vec<usize> {
        RESOLUTION_ORDER
            .iter()
            .flat_map(|&role| {
                self.agents
                    .iter()
                    .enumerate()
                    .filter(move |(_, a)| a.role == role)
                    .map(|(idx, _)| idx)
            })
            .collect()
    }

    fn team_indices(&self, role: Role) -> Vec<usize> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.role == role)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn decay_timers(&mut self) {
        let base_vision = self.template.conf.vision_range;
        for agent in &mut self.agents {
            for kind in agent.decay_timers(base_vision) {
                self.events.push(GameEvent::PowerupExpired {
                    owner: agent.owner.clone(),
                    agent: agent.id,
                    kind,
                });
            }
        }
    }

    fn refresh_powerups(&mut self) {
        let interval = self.template.conf.refresh_interval;
        if interval == 0 || self.tick % interval != 0 {
            return;
        }

        let mut restocked = 0usize;
        for (pos, cell) in self.template.cells() {
            if *cell == TemplateCell::Powerup && self.board.is_empty_at(*pos) {
                let kind = draw_kind(&mut self.rng);
                self.board.insert(*pos, Cell::Powerup { kind });
                restocked += 1;
            }
        }
        debug!(tick = self.tick, restocked, "power-ups refreshed");
    }

    fn apply_intents(&mut self, order: &[usize], attacker_actions: &ActionMap, defender_actions: &ActionMap) {
        for &idx in order {
            let agent = &mut self.agents[idx];
            let actions = match agent.role {
                Role::Attacker => attacker_actions,
                Role::Defender => defender_actions,
            };

            let direction = match actions.get(&agent.id) {
                Some(token) => token.parse::<Direction>().unwrap_or_else(|e| {
                    warn!(agent = agent.id, owner = %agent.owner, "{e}");
                    self.events.push(GameEvent::InvalidAction {
                        owner: agent.owner.clone(),
                        agent: agent.id,
                        token: token.clone(),
                    });
                    Direction::Stay
                }),
                None => {
                    warn!(agent = agent.id, owner = %agent.owner, "missing action");
                    self.events.push(GameEvent::MissingAction {
                        owner: agent.owner.clone(),
                        agent: agent.id,
                    });
                    Direction::Stay
                }
            };

            apply_intent(agent, direction);
        }
    }

    /// Every attacker against every defender, both by ascending id.
    ///
    /// A captured defender's destination becomes its origin immediately, so
    /// later attackers compare against the respawn cell.
    fn resolve_captures(&mut self) {
        let invulnerability = self.template.conf.invulnerability_duration;
        let attackers = self.team_indices(Role::Attacker);
        let defenders = self.team_indices(Role::Defender);

        for &a in &attackers {
            for &d in &defenders {
                if detect_collision(&self.agents[a], &self.agents[d]).is_none() {
                    continue;
                }
                let (attacker, defender) = pair_mut(&mut self.agents, a, d);
                resolve_capture(attacker, defender, invulnerability, &mut self.events);
            }
        }
    }

    /// Check whether the match has ended: tick limit reached or no coin left.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.tick >= self.template.conf.max_steps || self.board.coin_count() == 0
    }

    /// Per-side totals and elapsed ticks.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        let total = |owner: &str| -> u64 {
            self.agents
                .iter()
                .filter(|a| a.owner == owner)
                .map(|a| u64::from(a.score))
                .sum()
        };

        MatchResult {
            players: [
                SideResult {
                    id: self.attacker.clone(),
                    role: Role::Attacker,
                    score: total(&self.attacker),
                    time_used: self.attacker_time,
                },
                SideResult {
                    id: self.defender.clone(),
                    role: Role::Defender,
                    score: total(&self.defender),
                    time_used: self.defender_time,
                },
            ],
            steps: self.tick,
        }
    }

    /// Ticks resolved since the last reset.
    #[must_use]
    pub const fn tick(&self) -> u32 {
        self.tick
    }

    /// The immutable template this game was built from.
    #[must_use]
    pub const fn template(&self) -> &MapTemplate {
        &self.template
    }

    /// The current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// All agents in id order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up an agent by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(usize::try_from(id).ok()?)
    }

    /// Mutable access to an agent, for scenario setup in tests. Bypasses the
    /// tick pipeline, so not part of the supported API.
    #[doc(hidden)]
    #[must_use]
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(usize::try_from(id).ok()?)
    }

    /// Mutable access to the board, for scenario setup in tests. Bypasses the
    /// tick pipeline, so not part of the supported API.
    #[doc(hidden)]
    #[must_use]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Ids of the agents controlled by `owner`, ascending.
    #[must_use]
    pub fn agent_ids_by_owner(&self, owner: &str) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| a.owner == owner)
            .map(|a| a.id)
            .collect()
    }

    /// Attacking player of the current match.
    #[must_use]
    pub fn attacker(&self) -> &str {
        &self.attacker
    }

    /// Defending player of the current match.
    #[must_use]
    pub fn defender(&self) -> &str {
        &self.defender
    }

    /// Events of the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events of the most recent tick, rendered as text.
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

fn draw_kind(rng: &mut ChaCha8Rng) -> PowerupKind {
    *PowerupKind::ALL
        .choose(rng)
        .unwrap_or(&PowerupKind::Passwall)
}

/// Borrow two distinct agents mutably.
fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> (&mut Agent, &mut Agent) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
