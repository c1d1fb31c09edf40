//! Crafting recipes and the craft operation.
//!
//! The [`RecipeBook`] is built once at startup and never mutated. Crafting is
//! all-or-nothing: either every input is consumed and the output granted, or
//! the inventory is left exactly as it was.

use std::collections::BTreeMap;

use blockquest_types::ItemKind;

use crate::error::PlayerError;
use crate::inventory::Inventory;

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A single crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Stable identifier used by the UI and the action API.
    pub id: &'static str,
    /// Items consumed (item -> quantity).
    pub inputs: BTreeMap<ItemKind, u32>,
    /// The item produced.
    pub output: ItemKind,
    /// How many units of the output are produced per craft.
    pub output_quantity: u32,
    /// Stars the player must hold before the recipe is usable.
    pub min_stars: u32,
}

// ---------------------------------------------------------------------------
// Recipe Book
// ---------------------------------------------------------------------------

/// Ordered, immutable recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// The standard recipe book:
    ///
    /// - `plank_bundle`: 2 wood -> 2 plank
    /// - `mud_brick`: 2 dirt + 1 wood -> 1 stone
    /// - `torch_pair`: 1 plank + 1 crystal -> 2 torch, needs 1 star
    /// - `stone_pick`: 2 stone + 1 wood -> 1 pickaxe, needs 2 stars
    pub fn standard() -> Self {
        Self {
            recipes: vec![
                Recipe {
                    id: "plank_bundle",
                    inputs: BTreeMap::from([(ItemKind::Wood, 2)]),
                    output: ItemKind::Plank,
                    output_quantity: 2,
                    min_stars: 0,
                },
                Recipe {
                    id: "mud_brick",
                    inputs: BTreeMap::from([(ItemKind::Dirt, 2), (ItemKind::Wood, 1)]),
                    output: ItemKind::Stone,
                    output_quantity: 1,
                    min_stars: 0,
                },
                Recipe {
                    id: "torch_pair",
                    inputs: BTreeMap::from([(ItemKind::Plank, 1), (ItemKind::Crystal, 1)]),
                    output: ItemKind::Torch,
                    output_quantity: 2,
                    min_stars: 1,
                },
                Recipe {
                    id: "stone_pick",
                    inputs: BTreeMap::from([(ItemKind::Stone, 2), (ItemKind::Wood, 1)]),
                    output: ItemKind::Pickaxe,
                    output_quantity: 1,
                    min_stars: 2,
                },
            ],
        }
    }

    /// Look up a recipe by id.
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// All recipes in book order.
    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Crafting
// ---------------------------------------------------------------------------

/// Craft `recipe_id` from `inventory`.
///
/// Returns the recipe that was used so the caller can report it.
///
/// # Errors
///
/// [`PlayerError::UnknownRecipe`], [`PlayerError::StarsTooLow`],
/// [`PlayerError::InsufficientItem`], or [`PlayerError::InventoryOverflow`].
/// The inventory is unchanged on any error.
pub fn craft<'a>(
    book: &'a RecipeBook,
    recipe_id: &str,
    inventory: &mut Inventory,
    stars: u32,
) -> Result<&'a Recipe, PlayerError> {
    let recipe = book
        .get(recipe_id)
        .ok_or_else(|| PlayerError::UnknownRecipe(recipe_id.to_owned()))?;

    if stars < recipe.min_stars {
        return Err(PlayerError::StarsTooLow {
            recipe: recipe.id,
            required: recipe.min_stars,
            available: stars,
        });
    }

    // Work on a copy so an output overflow cannot leave inputs consumed.
    let mut staged = inventory.clone();
    staged.consume_all(&recipe.inputs)?;
    staged.add(recipe.output, recipe.output_quantity)?;
    *inventory = staged;

    Ok(recipe)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
