//! Intent application and boundary/terrain resolution.

use crate::game::{Agent, Board, Cell, Direction, GameEvent, PowerupKind};

/// Stage `agent.next_pos` one step from its committed position.
pub fn apply_intent(agent: &mut Agent, direction: Direction) {
    agent.next_pos = agent.pos.step(direction);
}

/// Resolve bounds, walls and portals for a staged move.
///
/// Leaving the board cancels the move. A wall cancels the move unless the
/// agent holds pass-wall. A portal rewrites the destination to its pair;
/// the exit cell is not inspected again, so portals never chain.
pub fn resolve_terrain(board: &Board, agent: &mut Agent, events: &mut Vec<GameEvent>) {
    if !board.in_bounds(agent.next_pos) {
        events.push(GameEvent::OutOfBounds {
            owner: agent.owner.clone(),
            agent: agent.id,
        });
        agent.next_pos = agent.pos;
    }

    match board.get(agent.next_pos) {
        Some(Cell::Wall) if !agent.has(PowerupKind::Passwall) => {
            events.push(GameEvent::WallBlocked {
                owner: agent.owner.clone(),
                agent: agent.id,
            });
            agent.next_pos = agent.pos;
        }
        Some(Cell::Portal { pair, .. }) => {
            events.push(GameEvent::Teleported {
                owner: agent.owner.clone(),
                agent: agent.id,
                to: *pair,
            });
            agent.next_pos = *pair;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Role};

    fn board() -> Board {
        let mut board = Board::new(5, 5).unwrap();
        board.insert(Position::new(2, 1), Cell::Wall);
        board.insert(
            Position::new(3, 2),
            Cell::Portal {
                pair: Position::new(0, 4),
                name: "A".to_string(),
            },
        );
        board.insert(
            Position::new(0, 4),
            Cell::Portal {
                pair: Position::new(3, 2),
                name: "A".to_string(),
            },
        );
        board
    }

    fn agent_at(x: i32, y: i32) -> Agent {
        Agent::new(0, Role::Attacker, "p", Position::new(x, y), 2)
    }

    #[test]
    fn test_out_of_bounds_cancelled() {
        let board = board();
        let mut agent = agent_at(0, 0);
        let mut events = Vec::new();

        apply_intent(&mut agent, Direction::Up);
        assert_eq!(agent.next_pos, Position::new(0, -1));
        resolve_terrain(&board, &mut agent, &mut events);

        assert_eq!(agent.next_pos, Position::new(0, 0));
        assert!(matches!(events[..], [GameEvent::OutOfBounds { .. }]));
    }

    #[test]
    fn test_wall_blocks_without_passwall() {
        let board = board();
        let mut agent = agent_at(2, 2);
        let mut events = Vec::new();

        apply_intent(&mut agent, Direction::Up);
        resolve_terrain(&board, &mut agent, &mut events);
        assert_eq!(agent.next_pos, Position::new(2, 2));
        assert!(matches!(events[..], [GameEvent::WallBlocked { .. }]));
    }

    #[test]
    fn test_passwall_enters_wall() {
        let board = board();
        let mut agent = agent_at(2, 2);
        agent.powerups.grant(PowerupKind::Passwall, 3);
        let mut events = Vec::new();

        apply_intent(&mut agent, Direction::Up);
        resolve_terrain(&board, &mut agent, &mut events);
        assert_eq!(agent.next_pos, Position::new(2, 1));
        assert!(events.is_empty());
    }

    #[test]
    fn test_portal_teleports_once() {
        let board = board();
        let mut agent = agent_at(2, 2);
        let mut events = Vec::new();

        apply_intent(&mut agent, Direction::Right);
        resolve_terrain(&board, &mut agent, &mut events);

        // The exit is itself a portal but is not followed.
        assert_eq!(agent.next_pos, Position::new(0, 4));
        assert_eq!(events.len(), 1);
    }
}
