//! The catalog tables.

use crate::sqlite::{DataType, Schema, TableDefinition, ID_COLUMN};

pub const DEFAULT_DB_PATH: &str = "AlcoholIntakeTracker.db";

pub const DRINKS: &str = "Drinks";
pub const INGREDIENTS: &str = "Ingredients";
pub const DRINK_RECIPES: &str = "DrinkRecipes";

pub fn drinks_table() -> TableDefinition {
    TableDefinition::new(DRINKS)
        .with_column(ID_COLUMN, DataType::Integer)
        .with_column("drink_name", DataType::Text)
        .with_column("drink_description", DataType::Text)
        .with_column("drink_method", DataType::Text)
        .with_column("drink_garnish", DataType::Text)
}

pub fn ingredients_table() -> TableDefinition {
    TableDefinition::new(INGREDIENTS)
        .with_column(ID_COLUMN, DataType::Integer)
        .with_column("ingredient_category", DataType::Text)
        .with_column("ingredient_group", DataType::Text)
        .with_column("ingredient_name", DataType::Text)
        .with_column("ingredient_brand", DataType::Text)
        .with_column("ingredient_description", DataType::Text)
        .with_column("ingredient_measure", DataType::Text)
        .with_column("ingredient_abv", DataType::Real)
}

/// Links drinks to ingredients. Declared only; nothing writes to it yet and
/// neither reference is checked.
pub fn drink_recipes_table() -> TableDefinition {
    TableDefinition::new(DRINK_RECIPES)
        .with_column(ID_COLUMN, DataType::Integer)
        .with_column("drink_id", DataType::Integer)
        .with_column("ingredient_id", DataType::Integer)
        .with_column("ingredient_volume", DataType::Real)
}

pub fn catalog_schema() -> Schema {
    Schema::new()
        .add_table(drinks_table())
        .add_table(ingredients_table())
        .add_table(drink_recipes_table())
}
