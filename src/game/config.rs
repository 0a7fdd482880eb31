//! Map descriptions, tunable constants and the immutable match template.
//!
//! The on-disk format is the JSON document consumed by the orchestrator:
//!
//! ```json
//! {
//!   "map_conf": {"width": 15, "height": 12, "coin_score": 10,
//!                "invulnerability_duration": 3, "max_steps": 1152,
//!                "vision_range": 3, "refresh_interval": 100},
//!   "powerup_conf": {"shield": {"duration": 12},
//!                    "extravision": {"duration": 12, "extra": 8}},
//!   "map": [{"x": 0, "y": 0, "type": "WALL"},
//!           {"x": 0, "y": 3, "type": "PORTAL", "pair": {"x": 9, "y": 3}, "name": "A"}]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{Board, Position, PowerupKind, Role};

/// Board dimensions and match-wide constants (`map_conf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConf {
    /// Board width in cells.
    pub width: i32,
    /// Board height in cells.
    pub height: i32,
    /// Points granted per coin.
    pub coin_score: u32,
    /// Ticks of immunity granted to a captured defender.
    pub invulnerability_duration: u32,
    /// Tick limit for one match.
    pub max_steps: u32,
    /// Base Chebyshev vision radius.
    pub vision_range: u32,
    /// Restock empty power-up spawns every this many ticks. `0` disables.
    #[serde(default)]
    pub refresh_interval: u32,
}

impl Default for MapConf {
    fn default() -> Self {
        Self {
            width: 15,
            height: 12,
            coin_score: 10,
            invulnerability_duration: 3,
            max_steps: 1152,
            vision_range: 3,
            refresh_interval: 0,
        }
    }
}

/// Duration of a single power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupParams {
    /// Ticks the effect lasts.
    pub duration: u32,
}

/// Extra-vision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraVisionParams {
    /// Ticks the effect lasts.
    pub duration: u32,
    /// Vision radius while active. Required when the kind is configured.
    #[serde(default)]
    pub extra: Option<u32>,
}

/// Per-kind power-up parameters (`powerup_conf`).
///
/// A kind without an entry is disabled: it can spawn but nobody can pick it up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupConf {
    /// Invisibility parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invisibility: Option<PowerupParams>,
    /// Pass-wall parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passwall: Option<PowerupParams>,
    /// Extra-vision parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extravision: Option<ExtraVisionParams>,
    /// Shield parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<PowerupParams>,
    /// Sword parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sword: Option<PowerupParams>,
}

impl PowerupConf {
    /// Every kind enabled with the same duration.
    #[must_use]
    pub const fn uniform(duration: u32, extra_vision: u32) -> Self {
        let params = Some(PowerupParams { duration });
        Self {
            invisibility: params,
            passwall: params,
            extravision: Some(ExtraVisionParams {
                duration,
                extra: Some(extra_vision),
            }),
            shield: params,
            sword: params,
        }
    }

    /// Duration granted on pickup, or `None` if the kind is disabled.
    #[must_use]
    pub fn duration(&self, kind: PowerupKind) -> Option<u32> {
        let duration = match kind {
            PowerupKind::Invisibility => self.invisibility.map(|p| p.duration),
            PowerupKind::Passwall => self.passwall.map(|p| p.duration),
            PowerupKind::Extravision => self.extravision.map(|p| p.duration),
            PowerupKind::Shield => self.shield.map(|p| p.duration),
            PowerupKind::Sword => self.sword.map(|p| p.duration),
        };
        duration.filter(|&d| d > 0)
    }

    /// Vision radius granted by extra-vision.
    #[must_use]
    pub fn extra_vision(&self) -> Option<u32> {
        self.extravision.and_then(|p| p.extra)
    }
}

/// One entry of the `map` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpec {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Typed contents.
    #[serde(flatten)]
    pub kind: CellSpecKind,
}

/// The `type` discriminator of a map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellSpecKind {
    /// Impassable wall.
    Wall,
    /// Coin spawn.
    Coin,
    /// Power-up spawn; the kind is drawn at reset.
    Powerup,
    /// One end of a portal.
    Portal {
        /// Exit position.
        #[serde(default)]
        pair: Option<Position>,
        /// Display label.
        #[serde(default)]
        name: String,
    },
    /// Attacker spawn.
    Attacker,
    /// Defender spawn.
    Defender,
}

/// The complete JSON map document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Dimensions and constants.
    pub map_conf: MapConf,
    /// Power-up parameters.
    #[serde(default)]
    pub powerup_conf: PowerupConf,
    /// Typed cells.
    pub map: Vec<CellSpec>,
}

impl MapDefinition {
    /// Parse a map document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is malformed or misses
    /// required fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a map document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// A validated template cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateCell {
    /// Impassable wall.
    Wall,
    /// Portal end.
    Portal {
        /// Exit position.
        pair: Position,
        /// Display label.
        name: String,
    },
    /// Coin spawn.
    Coin,
    /// Power-up spawn.
    Powerup,
    /// Spawn marker, consumed into an agent at reset.
    Spawn(Role),
}

/// Immutable static layout plus constants, parsed once per map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTemplate {
    /// Match constants.
    pub conf: MapConf,
    /// Power-up parameters.
    pub powerups: PowerupConf,
    blank: Board,
    cells: Vec<(Position, TemplateCell)>,
}

impl MapTemplate {
    /// Validate a parsed definition into a template.
    ///
    /// A later entry at an already listed position replaces the earlier
    /// entry but keeps the earlier entry's slot in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, a cell or portal pair lies
    /// outside the board, extra-vision lacks its range, or a team has no spawn.
    pub fn from_definition(def: &MapDefinition) -> Result<Self, ConfigError> {
        let conf = def.map_conf;
        let blank = Board::new(conf.width, conf.height).ok_or(ConfigError::EmptyBoard {
            width: conf.width,
            height: conf.height,
        })?;
        if def.powerup_conf.extravision.is_some() && def.powerup_conf.extra_vision().is_none() {
            return Err(ConfigError::MissingExtraVision);
        }

        let in_bounds = |p: Position| blank.in_bounds(p);

        let mut cells: Vec<(Position, TemplateCell)> = Vec::with_capacity(def.map.len());
        let mut slots: HashMap<Position, usize> = HashMap::with_capacity(def.map.len());

        for spec in &def.map {
            let pos = Position::new(spec.x, spec.y);
            if !in_bounds(pos) {
                return Err(ConfigError::CellOutOfBounds { x: spec.x, y: spec.y });
            }
            let cell = match &spec.kind {
                CellSpecKind::Wall => TemplateCell::Wall,
                CellSpecKind::Coin => TemplateCell::Coin,
                CellSpecKind::Powerup => TemplateCell::Powerup,
                CellSpecKind::Attacker => TemplateCell::Spawn(Role::Attacker),
                CellSpecKind::Defender => TemplateCell::Spawn(Role::Defender),
                CellSpecKind::Portal { pair, name } => {
                    let pair = pair.ok_or(ConfigError::MissingPortalPair { x: spec.x, y: spec.y })?;
                    if !in_bounds(pair) {
                        return Err(ConfigError::PortalPairOutOfBounds { x: pair.x, y: pair.y });
                    }
                    TemplateCell::Portal {
                        pair,
                        name: name.clone(),
                    }
                }
            };

            match slots.get(&pos) {
                Some(&idx) => cells[idx].1 = cell,
                None => {
                    slots.insert(pos, cells.len());
                    cells.push((pos, cell));
                }
            }
        }

        for role in [Role::Attacker, Role::Defender] {
            if !cells.iter().any(|(_, c)| *c == TemplateCell::Spawn(role)) {
                return Err(ConfigError::NoAgents { role: role.label() });
            }
        }

        Ok(Self {
            conf,
            powerups: def.powerup_conf,
            blank,
            cells,
        })
    }

    /// Parse and validate a JSON map document in one step.
    ///
    /// # Errors
    ///
    /// See [`MapDefinition::from_json`] and [`MapTemplate::from_definition`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::from_definition(&MapDefinition::from_json(text)?)
    }

    /// Read, parse and validate a map file.
    ///
    /// # Errors
    ///
    /// See [`MapDefinition::load`] and [`MapTemplate::from_definition`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_definition(&MapDefinition::load(path)?)
    }

    /// An empty board of the template's dimensions.
    #[must_use]
    pub fn blank_board(&self) -> Board {
        self.blank.clone()
    }

    /// Template cells in iteration order.
    #[must_use]
    pub fn cells(&self) -> &[(Position, TemplateCell)] {
        &self.cells
    }

    /// Number of spawns for `role`.
    #[must_use]
    pub fn spawn_count(&self, role: Role) -> usize {
        self.cells
            .iter()
            .filter(|(_, c)| *c == TemplateCell::Spawn(role))
            .count()
    }

    /// Number of cells matching `pred`.
    pub fn count(&self, pred: impl Fn(&TemplateCell) -> bool) -> usize {
        self.cells.iter().filter(|(_, c)| pred(c)).count()
    }
}
