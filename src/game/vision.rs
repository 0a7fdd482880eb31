//! Vision-limited per-agent views.
//!
//! Each agent sees a Chebyshev square of radius `vision_range` around its
//! committed position. Attackers never see agents holding invisibility; an
//! agent always sees itself.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::{Agent, AgentId, Cell, Game, Position, PowerupKind, Powerups, Role};

/// Public state of one agent, as reported to players and spectators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentState {
    /// Agent id.
    pub id: AgentId,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Held power-ups and their remaining ticks.
    pub powerups: Powerups,
    /// Team.
    pub role: Role,
    /// Controlling player.
    #[serde(rename = "player_id")]
    pub owner: String,
    /// Current vision radius.
    pub vision_range: u32,
    /// Carried score.
    pub score: u32,
    /// Remaining post-capture immunity.
    #[serde(rename = "invulnerability_duration")]
    pub invulnerability: u32,
}

impl From<&Agent> for AgentState {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            x: agent.pos.x,
            y: agent.pos.y,
            powerups: agent.powerups,
            role: agent.role,
            owner: agent.owner.clone(),
            vision_range: agent.vision_range,
            score: agent.score,
            invulnerability: agent.invulnerability,
        }
    }
}

/// A visible wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WallView {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// A visible portal end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalView {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Exit position.
    pub pair: Position,
    /// Display label.
    pub name: String,
}

/// A visible power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerupView {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Kind on offer.
    pub powerup: PowerupKind,
}

/// A visible coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoinView {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Points it grants.
    pub score: u32,
}

/// Cell contents grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CellViews {
    /// Walls.
    pub walls: Vec<WallView>,
    /// Portal ends.
    pub portals: Vec<PortalView>,
    /// Power-ups.
    pub powerups: Vec<PowerupView>,
    /// Coins.
    pub coins: Vec<CoinView>,
}

impl CellViews {
    /// Record `cell` at `pos` under its group.
    pub fn push(&mut self, pos: Position, cell: &Cell) {
        let Position { x, y } = pos;
        match cell {
            Cell::Wall => self.walls.push(WallView { x, y }),
            Cell::Portal { pair, name } => self.portals.push(PortalView {
                x,
                y,
                pair: *pair,
                name: name.clone(),
            }),
            Cell::Coin { score } => self.coins.push(CoinView { x, y, score: *score }),
            Cell::Powerup { kind } => self.powerups.push(PowerupView { x, y, powerup: *kind }),
        }
    }
}

/// What one agent can see this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentView {
    /// The observing agent's own full state.
    pub self_agent: AgentState,
    /// Cells inside the vision window.
    #[serde(flatten)]
    pub cells: CellViews,
    /// Other visible agents, either team.
    pub other_agents: Vec<AgentState>,
}

/// Whether `observer` may see `observed` at all, ignoring distance.
#[must_use]
pub fn can_observe(observer: &Agent, observed: &Agent) -> bool {
    observer.id == observed.id
        || !(observer.is_attacker() && observed.has(PowerupKind::Invisibility))
}

/// Build the view of a single agent.
#[must_use]
pub fn project_view(game: &Game, observer: &Agent) -> AgentView {
    let board = game.board();
    let radius = i32::try_from(observer.vision_range).unwrap_or(i32::MAX);
    let center = observer.pos;
    // Window clipped to the board; columns outer, rows inner.
    let xs = center.x.saturating_sub(radius).max(0)..=center.x.saturating_add(radius).min(board.width() - 1);
    let ys = center.y.saturating_sub(radius).max(0)..=center.y.saturating_add(radius).min(board.height() - 1);

    let mut cells = CellViews::default();
    for x in xs {
        for y in ys.clone() {
            let pos = Position::new(x, y);
            if let Some(cell) = board.get(pos) {
                cells.push(pos, cell);
            }
        }
    }

    let mut visible: Vec<&Agent> = game
        .agents()
        .iter()
        .filter(|agent| agent.id != observer.id && can_observe(observer, agent))
        .filter(|agent| center.chebyshev(agent.pos) <= radius)
        .collect();
    visible.sort_by_key(|agent| (agent.pos.x, agent.pos.y, agent.id));

    AgentView {
        self_agent: AgentState::from(observer),
        cells,
        other_agents: visible.into_iter().map(AgentState::from).collect(),
    }
}

impl Game {
    /// Views for every agent controlled by `owner`, keyed by agent id.
    ///
    /// A pure read of the most recently committed tick.
    #[must_use]
    pub fn agent_views(&self, owner: &str) -> BTreeMap<AgentId, AgentView> {
        self.agents()
            .iter()
            .filter(|agent| agent.owner == owner)
            .map(|agent| (agent.id, project_view(self, agent)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MapTemplate;

    const MAP: &str = r#"{
        "map_conf": {"width": 10, "height": 10, "coin_score": 10,
                     "invulnerability_duration": 3, "max_steps": 100, "vision_range": 2},
        "map": [
            {"x": 1, "y": 1, "type": "ATTACKER"},
            {"x": 3, "y": 3, "type": "DEFENDER"},
            {"x": 8, "y": 8, "type": "DEFENDER"},
            {"x": 0, "y": 0, "type": "WALL"},
            {"x": 3, "y": 2, "type": "COIN"},
            {"x": 9, "y": 9, "type": "COIN"},
            {"x": 2, "y": 0, "type": "PORTAL", "pair": {"x": 7, "y": 7}, "name": "P"}
        ]
    }"#;

    fn game() -> Game {
        let mut game = Game::new(MapTemplate::from_json(MAP).unwrap());
        game.reset("att", "def", 1);
        game
    }

    #[test]
    fn test_window_contents() {
        let game = game();
        let views = game.agent_views("att");
        assert_eq!(views.len(), 1);
        let view = &views[&0];

        assert_eq!(view.self_agent.id, 0);
        assert_eq!(view.cells.walls, vec![WallView { x: 0, y: 0 }]);
        assert_eq!(view.cells.coins, vec![CoinView { x: 3, y: 2, score: 10 }]);
        assert_eq!(view.cells.portals.len(), 1);
        assert_eq!(view.cells.portals[0].pair, Position::new(7, 7));

        let ids: Vec<AgentId> = view.other_agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_views_keyed_by_owner() {
        let game = game();
        let views = game.agent_views("def");
        assert_eq!(views.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(game.agent_views("nobody").is_empty());
    }

    #[test]
    fn test_invisible_defender_hidden_from_attacker() {
        let mut game = game();
        game.agent_mut(1)
            .unwrap()
            .powerups
            .grant(PowerupKind::Invisibility, 3);

        let att = game.agent_views("att");
        assert!(att[&0].other_agents.is_empty());

        // The defender still sees itself and the attacker.
        let def = game.agent_views("def");
        assert_eq!(def[&1].self_agent.id, 1);
        assert_eq!(def[&1].other_agents.len(), 1);
    }

    #[test]
    fn test_defender_sees_invisible_teammate() {
        let mut game = game();
        let mate = game.agent_mut(2).unwrap();
        mate.pos = Position::new(4, 4);
        mate.next_pos = mate.pos;
        mate.powerups.grant(PowerupKind::Invisibility, 3);

        let def = game.agent_views("def");
        assert!(def[&1].other_agents.iter().any(|a| a.id == 2));
    }

    #[test]
    fn test_view_json_shape() {
        let game = game();
        let views = game.agent_views("def");
        let json = serde_json::to_value(&views[&1]).unwrap();
        assert!(json.get("walls").is_some());
        assert!(json.get("coins").is_some());
        assert_eq!(json["self_agent"]["player_id"], "def");
        assert_eq!(json["self_agent"]["role"], "DEFENDER");
        assert_eq!(json["self_agent"]["powerups"], serde_json::json!({}));
    }

    #[test]
    fn test_huge_range_is_clipped_to_board() {
        let mut game = game();
        let full = game.snapshot();
        game.agent_mut(0).unwrap().vision_range = u32::MAX;

        let views = game.agent_views("att");
        let view = &views[&0];
        assert_eq!(view.cells.walls, full.cells.walls);
        assert_eq!(view.cells.coins.len(), full.cells.coins.len());
        assert_eq!(view.cells.portals.len(), 1);
        let ids: Vec<AgentId> = view.other_agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_window_order_is_column_major() {
        let mut game = game();
        let agent = game.agent_mut(0).unwrap();
        agent.pos = Position::new(8, 8);
        agent.next_pos = agent.pos;
        agent.vision_range = 1;
        game.board_mut().insert(Position::new(9, 7), Cell::Wall);
        game.board_mut().insert(Position::new(7, 9), Cell::Wall);

        let views = game.agent_views("att");
        let walls: Vec<(i32, i32)> = views[&0].cells.walls.iter().map(|w| (w.x, w.y)).collect();
        assert_eq!(walls, vec![(7, 9), (9, 7)]);
        assert_eq!(views[&0].cells.coins, vec![CoinView { x: 9, y: 9, score: 10 }]);
    }
}
