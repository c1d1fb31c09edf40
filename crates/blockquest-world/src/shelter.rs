//! Shelter evaluation around the home anchor.
//!
//! Three numbers come out of an evaluation, all in `[0, 100]`:
//!
//! - **safety**: how enclosed the anchor is. Cardinal neighbors weigh most,
//!   diagonals less, plus a floor band two rows below and a roof band one row
//!   above. Every open neighbor costs an opening penalty and every column
//!   open to the sky costs a sky penalty.
//! - **light**: torch light inside a radius-2 diamond, fading with Manhattan
//!   distance, minus leaks through openings and open sky. A shelter with very
//!   low safety is capped so it never reads as well lit.
//! - **score**: a safety-heavy blend of the two, capped while safety is low.
//!
//! The evaluation is pure: same world, same report.

use blockquest_types::BlockKind;
use serde::Deserialize;

use crate::tile_world::TileWorld;

/// Weights applied to one tile depending on what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TileWeights {
    /// Any solid block other than a torch.
    pub solid: i32,
    /// A torch.
    pub torch: i32,
    /// Open air.
    pub empty: i32,
}

impl TileWeights {
    const fn weigh(self, block: BlockKind) -> i32 {
        match block {
            BlockKind::Empty => self.empty,
            BlockKind::Torch => self.torch,
            _ => self.solid,
        }
    }
}

/// Tuning for the shelter evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShelterConfig {
    /// Left, right, above, and below the anchor.
    pub cardinal: TileWeights,
    /// The four corner neighbors.
    pub diagonal: TileWeights,
    /// Row `anchor_y + 2`, five tiles centered on the anchor.
    pub floor_band: TileWeights,
    /// Row `anchor_y - 1`, five tiles centered on the anchor.
    pub roof_band: TileWeights,
    /// Half-width of the floor and roof bands.
    pub band_half_width: i32,
    /// Safety lost per empty neighbor.
    pub opening_penalty: i32,
    /// Safety lost per column open to the sky.
    pub sky_penalty: i32,
    /// Light from a torch at Manhattan distance 0, 1, 2.
    pub torch_light: [i32; 3],
    /// Light lost per empty neighbor.
    pub light_opening_penalty: i32,
    /// Light lost per column open to the sky.
    pub light_sky_penalty: i32,
    /// Below this safety, light is capped at `dim_light_cap`.
    pub dim_safety_threshold: u32,
    /// Light ceiling for poorly enclosed shelters.
    pub dim_light_cap: u32,
    /// Share of the score taken from safety, in percent. Light gets the rest.
    pub safety_weight_pct: u32,
    /// Below this safety, the score is capped at `low_safety_score_cap`.
    pub low_safety_threshold: u32,
    /// Score ceiling for poorly enclosed shelters.
    pub low_safety_score_cap: u32,
}

impl Default for ShelterConfig {
    fn default() -> Self {
        Self {
            cardinal: TileWeights {
                solid: 20,
                torch: 8,
                empty: -6,
            },
            diagonal: TileWeights {
                solid: 6,
                torch: 3,
                empty: -2,
            },
            floor_band: TileWeights {
                solid: 4,
                torch: 2,
                empty: -1,
            },
            roof_band: TileWeights {
                solid: 3,
                torch: 1,
                empty: -1,
            },
            band_half_width: 2,
            opening_penalty: 4,
            sky_penalty: 8,
            torch_light: [40, 30, 18],
            light_opening_penalty: 3,
            light_sky_penalty: 6,
            dim_safety_threshold: 25,
            dim_light_cap: 30,
            safety_weight_pct: 72,
            low_safety_threshold: 30,
            low_safety_score_cap: 35,
        }
    }
}

/// Result of one shelter evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShelterReport {
    /// Enclosure safety, `[0, 100]`.
    pub safety: u32,
    /// Light quality, `[0, 100]`.
    pub light: u32,
    /// Composite score, `[0, 100]`.
    pub score: u32,
    /// Empty tiles among the eight neighbors.
    pub openings: u32,
    /// Columns (left, centre, right) open to the sky.
    pub open_sky_columns: u32,
}

const CARDINALS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Scores the shelter around a fixed anchor tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelterEvaluator {
    anchor_x: i32,
    anchor_y: i32,
    config: ShelterConfig,
}

impl ShelterEvaluator {
    /// Create an evaluator for the anchor at `(anchor_x, anchor_y)`.
    pub const fn new(anchor_x: i32, anchor_y: i32, config: ShelterConfig) -> Self {
        Self {
            anchor_x,
            anchor_y,
            config,
        }
    }

    /// The anchor coordinates.
    pub const fn anchor(&self) -> (i32, i32) {
        (self.anchor_x, self.anchor_y)
    }

    /// Whether `(x, y)` is within `radius` tiles of the anchor (Chebyshev).
    pub const fn is_near_anchor(&self, x: i32, y: i32, radius: u32) -> bool {
        let dx = x.abs_diff(self.anchor_x);
        let dy = y.abs_diff(self.anchor_y);
        dx <= radius && dy <= radius
    }

    /// Evaluate the shelter in `world`.
    pub fn evaluate(&self, world: &TileWorld) -> ShelterReport {
        let cfg = &self.config;
        let openings = self.openings(world);
        let open_sky_columns = self.open_sky_columns(world);

        let mut safety: i32 = 0;
        for (dx, dy) in CARDINALS {
            safety = safety.saturating_add(cfg.cardinal.weigh(self.neighbor(world, dx, dy)));
        }
        for (dx, dy) in DIAGONALS {
            safety = safety.saturating_add(cfg.diagonal.weigh(self.neighbor(world, dx, dy)));
        }
        safety = safety.saturating_add(self.band(world, 2, cfg.floor_band));
        safety = safety.saturating_add(self.band(world, -1, cfg.roof_band));
        safety = safety.saturating_sub(scaled(cfg.opening_penalty, openings));
        safety = safety.saturating_sub(scaled(cfg.sky_penalty, open_sky_columns));
        let safety = clamp_pct(safety);

        let mut light = self.torch_light(world);
        light = light.saturating_sub(scaled(cfg.light_opening_penalty, openings));
        light = light.saturating_sub(scaled(cfg.light_sky_penalty, open_sky_columns));
        let mut light = clamp_pct(light);
        if safety < cfg.dim_safety_threshold {
            light = light.min(cfg.dim_light_cap);
        }

        let safety_weight = cfg.safety_weight_pct.min(100);
        let light_weight = 100_u32.saturating_sub(safety_weight);
        let blended = safety
            .saturating_mul(safety_weight)
            .saturating_add(light.saturating_mul(light_weight))
            .checked_div(100)
            .unwrap_or(0);
        let mut score = blended.min(100);
        if safety < cfg.low_safety_threshold {
            score = score.min(cfg.low_safety_score_cap);
        }

        ShelterReport {
            safety,
            light,
            score,
            openings,
            open_sky_columns,
        }
    }

    fn neighbor(&self, world: &TileWorld, dx: i32, dy: i32) -> BlockKind {
        world.get(
            self.anchor_x.saturating_add(dx),
            self.anchor_y.saturating_add(dy),
        )
    }

    fn openings(&self, world: &TileWorld) -> u32 {
        let mut count: u32 = 0;
        for (dx, dy) in CARDINALS.into_iter().chain(DIAGONALS) {
            if self.neighbor(world, dx, dy) == BlockKind::Empty {
                count = count.saturating_add(1);
            }
        }
        count
    }

    /// Sum of `weights` across the row at `anchor_y + row_offset`.
    fn band(&self, world: &TileWorld, row_offset: i32, weights: TileWeights) -> i32 {
        let half = self.config.band_half_width.max(0);
        let y = self.anchor_y.saturating_add(row_offset);
        let mut total: i32 = 0;
        for dx in half.saturating_neg()..=half {
            let block = world.get(self.anchor_x.saturating_add(dx), y);
            total = total.saturating_add(weights.weigh(block));
        }
        total
    }

    /// Count of the left, centre, and right columns with no solid block
    /// between the anchor's row and the top of the world.
    fn open_sky_columns(&self, world: &TileWorld) -> u32 {
        let mut open: u32 = 0;
        for dx in [-1, 0, 1] {
            let x = self.anchor_x.saturating_add(dx);
            // The centre column starts above the anchor itself; the side
            // columns include the wall tile beside it.
            let lowest = if dx == 0 {
                self.anchor_y.saturating_sub(1)
            } else {
                self.anchor_y
            };
            let covered = (0..=lowest).any(|y| world.get(x, y).is_solid());
            if !covered {
                open = open.saturating_add(1);
            }
        }
        open
    }

    fn torch_light(&self, world: &TileWorld) -> i32 {
        let mut total: i32 = 0;
        for dy in -2_i32..=2 {
            for dx in -2_i32..=2 {
                let distance = dx.unsigned_abs().saturating_add(dy.unsigned_abs());
                let Some(amount) = usize::try_from(distance)
                    .ok()
                    .and_then(|d| self.config.torch_light.get(d))
                else {
                    continue;
                };
                if self.neighbor(world, dx, dy) == BlockKind::Torch {
                    total = total.saturating_add(*amount);
                }
            }
        }
        total
    }
}

/// `weight * count` without overflow.
fn scaled(weight: i32, count: u32) -> i32 {
    weight.saturating_mul(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Clamp a signed sum into `[0, 100]`.
fn clamp_pct(value: i32) -> u32 {
    u32::try_from(value.clamp(0, 100)).unwrap_or(0)
}
