//! Agents, roles and timed power-up inventories.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::game::Position;

/// Unique identifier for an agent, assigned at reset in template order.
pub type AgentId = u32;

/// Which team an agent plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Chases defenders and steals their score.
    Attacker,
    /// Collects coins and evades capture.
    Defender,
}

impl Role {
    /// Upper-case label used in results and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attacker => "ATTACKER",
            Self::Defender => "DEFENDER",
        }
    }

    /// The opposing role.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five power-up kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    /// Defender only: hidden from attacker views.
    Invisibility,
    /// Either role: walls are ignored during terrain resolution.
    Passwall,
    /// Either role: vision range set to the configured extra value.
    Extravision,
    /// Defender only: blocks capture unless the attacker holds a sword.
    Shield,
    /// Attacker only: bypasses shields and captures the full score.
    Sword,
}

impl PowerupKind {
    /// All kinds in draw order. Random selection indexes into this array,
    /// so reordering it changes every seeded match.
    pub const ALL: [Self; 5] = [
        Self::Invisibility,
        Self::Passwall,
        Self::Extravision,
        Self::Shield,
        Self::Sword,
    ];

    /// Lower-case name used in views and config keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invisibility => "invisibility",
            Self::Passwall => "passwall",
            Self::Extravision => "extravision",
            Self::Shield => "shield",
            Self::Sword => "sword",
        }
    }

    /// Check whether an agent of `role` may pick this kind up.
    #[must_use]
    pub const fn eligible(self, role: Role) -> bool {
        match self {
            Self::Invisibility | Self::Shield => matches!(role, Role::Defender),
            Self::Sword => matches!(role, Role::Attacker),
            Self::Passwall | Self::Extravision => true,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Held power-ups with their remaining durations.
///
/// A fixed slot per kind; `None` means the kind is not held. Held entries
/// always have a positive remaining duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Powerups {
    slots: [Option<u32>; 5],
}

impl Powerups {
    /// Start (or restart) `kind` with `duration` ticks remaining.
    ///
    /// A zero duration clears the slot.
    pub fn grant(&mut self, kind: PowerupKind, duration: u32) {
        self.slots[kind.index()] = (duration > 0).then_some(duration);
    }

    /// Remaining ticks for `kind`, or `None` if not held.
    #[must_use]
    pub const fn remaining(&self, kind: PowerupKind) -> Option<u32> {
        self.slots[kind.index()]
    }

    /// Check whether `kind` is currently active.
    #[must_use]
    pub const fn has(&self, kind: PowerupKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Check whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Iterate over held kinds and their remaining durations, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (PowerupKind, u32)> + '_ {
        PowerupKind::ALL
            .iter()
            .filter_map(|&kind| self.remaining(kind).map(|left| (kind, left)))
    }

    /// Decrement every held duration by one and drop those reaching zero.
    ///
    /// Returns the kinds that expired this call.
    pub fn decay(&mut self) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        for kind in PowerupKind::ALL {
            let slot = &mut self.slots[kind.index()];
            if let Some(left) = *slot {
                let left = left.saturating_sub(1);
                if left == 0 {
                    *slot = None;
                    expired.push(kind);
                } else {
                    *slot = Some(left);
                }
            }
        }
        expired
    }
}

impl Serialize for Powerups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let held: Vec<(PowerupKind, u32)> = self.iter().collect();
        let mut map = serializer.serialize_map(Some(held.len()))?;
        for (kind, left) in held {
            map.serialize_entry(kind.name(), &left)?;
        }
        map.end()
    }
}

/// A single agent on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Stable identifier, unique within a match.
    pub id: AgentId,
    /// Team membership.
    pub role: Role,
    /// Player that controls this agent.
    pub owner: String,
    /// Committed position.
    pub pos: Position,
    /// Staged destination; equals `pos` outside of tick resolution.
    pub next_pos: Position,
    /// Spawn position, the respawn target after capture.
    pub origin: Position,
    /// Current Chebyshev vision radius.
    pub vision_range: u32,
    /// Points carried by this agent.
    pub score: u32,
    /// Ticks of post-capture immunity remaining.
    pub invulnerability: u32,
    /// Held power-ups.
    pub powerups: Powerups,
}

impl Agent {
    /// Create a new agent at its spawn position.
    #[must_use]
    pub fn new(id: AgentId, role: Role, owner: impl Into<String>, origin: Position, vision_range: u32) -> Self {
        Self {
            id,
            role,
            owner: owner.into(),
            pos: origin,
            next_pos: origin,
            origin,
            vision_range,
            score: 0,
            invulnerability: 0,
            powerups: Powerups::default(),
        }
    }

    /// Check whether this agent is an attacker.
    #[must_use]
    pub const fn is_attacker(&self) -> bool {
        matches!(self.role, Role::Attacker)
    }

    /// Check whether this agent is a defender.
    #[must_use]
    pub const fn is_defender(&self) -> bool {
        matches!(self.role, Role::Defender)
    }

    /// Check whether this agent currently holds `kind`.
    #[must_use]
    pub const fn has(&self, kind: PowerupKind) -> bool {
        self.powerups.has(kind)
    }

    /// Advance this agent's timers by one tick.
    ///
    /// Expiring extra-vision resets the vision range to `base_vision`.
    /// Returns the power-ups that expired.
    pub fn decay_timers(&mut self, base_vision: u32) -> Vec<PowerupKind> {
        let expired = self.powerups.decay();
        if expired.contains(&PowerupKind::Extravision) {
            self.vision_range = base_vision;
        }
        self.invulnerability = self.invulnerability.saturating_sub(1);
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_table() {
        use PowerupKind::{Extravision, Invisibility, Passwall, Shield, Sword};

        assert!(Invisibility.eligible(Role::Defender));
        assert!(!Invisibility.eligible(Role::Attacker));
        assert!(Shield.eligible(Role::Defender));
        assert!(!Shield.eligible(Role::Attacker));
        assert!(Sword.eligible(Role::Attacker));
        assert!(!Sword.eligible(Role::Defender));
        for role in [Role::Attacker, Role::Defender] {
            assert!(Passwall.eligible(role));
            assert!(Extravision.eligible(role));
        }
    }

    #[test]
    fn test_powerups_decay() {
        let mut held = Powerups::default();
        held.grant(PowerupKind::Shield, 2);
        held.grant(PowerupKind::Passwall, 1);

        assert_eq!(held.decay(), vec![PowerupKind::Passwall]);
        assert_eq!(held.remaining(PowerupKind::Shield), Some(1));
        assert!(!held.has(PowerupKind::Passwall));

        assert_eq!(held.decay(), vec![PowerupKind::Shield]);
        assert!(held.is_empty());
        assert!(held.decay().is_empty());
    }

    #[test]
    fn test_powerups_zero_duration_not_held() {
        let mut held = Powerups::default();
        held.grant(PowerupKind::Sword, 0);
        assert!(!held.has(PowerupKind::Sword));
    }

    #[test]
    fn test_powerups_serialize_as_map() {
        let mut held = Powerups::default();
        held.grant(PowerupKind::Sword, 4);
        held.grant(PowerupKind::Invisibility, 2);
        let json = serde_json::to_string(&held).unwrap();
        assert_eq!(json, r#"{"invisibility":2,"sword":4}"#);
    }

    #[test]
    fn test_agent_decay_resets_vision() {
        let mut agent = Agent::new(0, Role::Defender, "p1", Position::new(1, 1), 3);
        agent.vision_range = 8;
        agent.powerups.grant(PowerupKind::Extravision, 1);
        agent.invulnerability = 1;

        let expired = agent.decay_timers(3);
        assert_eq!(expired, vec![PowerupKind::Extravision]);
        assert_eq!(agent.vision_range, 3);
        assert_eq!(agent.invulnerability, 0);

        agent.decay_timers(3);
        assert_eq!(agent.invulnerability, 0);
    }

    #[test]
    fn test_agent_new() {
        let agent = Agent::new(7, Role::Attacker, "bot", Position::new(2, 4), 3);
        assert_eq!(agent.pos, agent.origin);
        assert_eq!(agent.next_pos, agent.pos);
        assert_eq!(agent.score, 0);
        assert!(agent.is_attacker());
        assert!(!agent.is_defender());
    }
}
