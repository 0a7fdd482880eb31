//! Unrestricted board snapshot for spectators and debugging.

use serde::Serialize;

use crate::game::Game;
use crate::game::vision::{AgentState, CellViews};

/// Everything on the board plus every agent, with public attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSnapshot {
    /// Ticks resolved so far.
    pub tick: u32,
    /// All agents in id order.
    pub agents: Vec<AgentState>,
    /// All cells, row-major.
    #[serde(flatten)]
    pub cells: CellViews,
}

impl Game {
    /// Snapshot the whole board, ignoring vision and invisibility.
    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        let mut cells = CellViews::default();
        for (pos, cell) in self.board().iter() {
            cells.push(pos, cell);
        }
        MapSnapshot {
            tick: self.tick(),
            agents: self.agents().iter().map(AgentState::from).collect(),
            cells,
        }
    }
}
