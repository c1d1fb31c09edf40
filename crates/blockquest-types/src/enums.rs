//! Enumeration types for the Block Quest simulation.
//!
//! Every enum here carries a stable ordinal used by the save codec. New
//! variants must be appended, never inserted, so older payloads keep their
//! meaning.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// The material held by a single tile of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    /// Open air. The only non-solid kind.
    Empty,
    /// Soft soil.
    Dirt,
    /// Tree trunk.
    Wood,
    /// Rock.
    Stone,
    /// Processed wooden plank.
    Plank,
    /// Light source. Solid, but weaker as a wall.
    Torch,
    /// Crystal ore embedded in the ground.
    Crystal,
}

impl BlockKind {
    /// All block kinds in ordinal order.
    pub const ALL: [Self; 7] = [
        Self::Empty,
        Self::Dirt,
        Self::Wood,
        Self::Stone,
        Self::Plank,
        Self::Torch,
        Self::Crystal,
    ];

    /// Whether this block blocks movement and threats.
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Stable ordinal used in the save payload.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Dirt => 1,
            Self::Wood => 2,
            Self::Stone => 3,
            Self::Plank => 4,
            Self::Torch => 5,
            Self::Crystal => 6,
        }
    }

    /// Inverse of [`BlockKind::ordinal`].
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Empty),
            1 => Some(Self::Dirt),
            2 => Some(Self::Wood),
            3 => Some(Self::Stone),
            4 => Some(Self::Plank),
            5 => Some(Self::Torch),
            6 => Some(Self::Crystal),
            _ => None,
        }
    }

    /// The item granted when this block is mined. `None` for [`BlockKind::Empty`].
    pub const fn drop_item(self) -> Option<ItemKind> {
        match self {
            Self::Empty => None,
            Self::Dirt => Some(ItemKind::Dirt),
            Self::Wood => Some(ItemKind::Wood),
            Self::Stone => Some(ItemKind::Stone),
            Self::Plank => Some(ItemKind::Plank),
            Self::Torch => Some(ItemKind::Torch),
            Self::Crystal => Some(ItemKind::Crystal),
        }
    }

    /// Lower-case display name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "air",
            Self::Dirt => "dirt",
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Plank => "plank",
            Self::Torch => "torch",
            Self::Crystal => "crystal",
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A resource or tool held in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Soil, placeable as a dirt block.
    Dirt,
    /// Logs, placeable as a wood block.
    Wood,
    /// Rock, placeable as a stone block.
    Stone,
    /// Planks, placeable as a plank block.
    Plank,
    /// Torches, placeable as a torch block.
    Torch,
    /// Crystal shards. Crafting material only.
    Crystal,
    /// Mining tool. Has no block form.
    Pickaxe,
}

impl ItemKind {
    /// All item kinds in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Dirt,
        Self::Wood,
        Self::Stone,
        Self::Plank,
        Self::Torch,
        Self::Crystal,
        Self::Pickaxe,
    ];

    /// The block this item becomes when placed, if it can be placed at all.
    pub const fn placed_block(self) -> Option<BlockKind> {
        match self {
            Self::Dirt => Some(BlockKind::Dirt),
            Self::Wood => Some(BlockKind::Wood),
            Self::Stone => Some(BlockKind::Stone),
            Self::Plank => Some(BlockKind::Plank),
            Self::Torch => Some(BlockKind::Torch),
            Self::Crystal | Self::Pickaxe => None,
        }
    }

    /// Upper-case token used in the save payload (e.g. `WOOD`).
    pub const fn token(self) -> &'static str {
        match self {
            Self::Dirt => "DIRT",
            Self::Wood => "WOOD",
            Self::Stone => "STONE",
            Self::Plank => "PLANK",
            Self::Torch => "TORCH",
            Self::Crystal => "CRYSTAL",
            Self::Pickaxe => "PICKAXE",
        }
    }

    /// Parse a save-payload token. Case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.token() == token)
    }

    /// Lower-case display name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dirt => "dirt",
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Plank => "plank",
            Self::Torch => "torch",
            Self::Crystal => "crystal",
            Self::Pickaxe => "pickaxe",
        }
    }
}

/// Items the player can cycle through in place mode, in cycle order.
pub const PLACEABLES: [ItemKind; 5] = [
    ItemKind::Dirt,
    ItemKind::Wood,
    ItemKind::Stone,
    ItemKind::Plank,
    ItemKind::Torch,
];

// ---------------------------------------------------------------------------
// Day cycle
// ---------------------------------------------------------------------------

/// One segment of the day/night cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Safe daylight: gathering and companion gifts.
    Day,
    /// Warning period before night.
    Dusk,
    /// Threat checks run.
    Night,
    /// Calm period before sunrise.
    Dawn,
}

impl Phase {
    /// Stable ordinal used in the save payload.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Day => 0,
            Self::Dusk => 1,
            Self::Night => 2,
            Self::Dawn => 3,
        }
    }

    /// Inverse of [`Phase::ordinal`].
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Day),
            1 => Some(Self::Dusk),
            2 => Some(Self::Night),
            3 => Some(Self::Dawn),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// What a tap on the grid does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    /// Taps break blocks.
    #[default]
    Mine,
    /// Taps place the selected item.
    Place,
}

impl InputMode {
    /// The other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Mine => Self::Place,
            Self::Place => Self::Mine,
        }
    }

    /// Stable ordinal used in the save payload.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Mine => 0,
            Self::Place => 1,
        }
    }

    /// Inverse of [`InputMode::ordinal`].
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Mine),
            1 => Some(Self::Place),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Mood of the most recent status message, used by the UI to pick colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTone {
    /// Neutral information.
    #[default]
    Info,
    /// An action worked.
    Success,
    /// Rejected action or a hint about danger.
    Warning,
    /// The player took damage.
    Danger,
    /// Rewards and milestones.
    Celebrate,
}

impl StatusTone {
    /// Stable ordinal used in the save payload.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Success => 1,
            Self::Warning => 2,
            Self::Danger => 3,
            Self::Celebrate => 4,
        }
    }

    /// Inverse of [`StatusTone::ordinal`].
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Info),
            1 => Some(Self::Success),
            2 => Some(Self::Warning),
            3 => Some(Self::Danger),
            4 => Some(Self::Celebrate),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_ordinals_round_trip() {
        for block in BlockKind::ALL {
            assert_eq!(BlockKind::from_ordinal(block.ordinal()), Some(block));
        }
        assert_eq!(BlockKind::from_ordinal(7), None);
    }

    #[test]
    fn only_empty_is_non_solid() {
        for block in BlockKind::ALL {
            assert_eq!(block.is_solid(), block != BlockKind::Empty);
        }
    }

    #[test]
    fn crystal_and_pickaxe_cannot_be_placed() {
        assert_eq!(ItemKind::Crystal.placed_block(), None);
        assert_eq!(ItemKind::Pickaxe.placed_block(), None);
        assert_eq!(ItemKind::Torch.placed_block(), Some(BlockKind::Torch));
    }

    #[test]
    fn every_placeable_maps_to_a_block() {
        for item in PLACEABLES {
            assert!(item.placed_block().is_some(), "{item:?} should be placeable");
        }
    }

    #[test]
    fn item_tokens_parse_back() {
        for item in ItemKind::ALL {
            assert_eq!(ItemKind::from_token(item.token()), Some(item));
        }
        assert_eq!(ItemKind::from_token("wood"), None);
        assert_eq!(ItemKind::from_token("DIAMOND"), None);
    }

    #[test]
    fn mode_toggles_back_and_forth() {
        assert_eq!(InputMode::Mine.toggled(), InputMode::Place);
        assert_eq!(InputMode::Place.toggled(), InputMode::Mine);
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&ItemKind::Pickaxe).unwrap_or_default();
        assert_eq!(json, "\"PICKAXE\"");
        let phase: Result<Phase, _> = serde_json::from_str("\"DUSK\"");
        assert_eq!(phase.ok(), Some(Phase::Dusk));
    }
}
