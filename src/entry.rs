//! Interactive record entry.
//!
//! [`EntryKind::build`] prompts for one record and assigns it the next free
//! identifier; [`add_record`] writes it unless a row with that identifier is
//! already stored. Duplicates are judged on the identifier alone.
//!
//! Text fields go through [`Prompter::read_line`] unvalidated. The strict
//! letters-only reader is never used for names or descriptions.

use std::fmt;
use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::info;

use crate::catalog::{drinks_table, ingredients_table};
use crate::error::Result;
use crate::input::Prompter;
use crate::sqlite::{Query, SqliteStore, TableDefinition, Value, ID_COLUMN};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drink {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub method: String,
    pub garnish: String,
}

impl Drink {
    pub fn prompt<R: BufRead, W: Write>(id: i64, input: &mut Prompter<R, W>) -> Result<Self> {
        Ok(Self {
            id,
            name: input.read_line("Enter drink name, e.g. Negroni, Gin & Tonic, Sangria: ")?,
            description: input.read_line("If you wish, enter a description here: ")?,
            method: input.read_line("How is the drink is prepared, e.g. Shaken, Stirred: ")?,
            garnish: input.read_line("If appropriate, enter a garnish here: ")?,
        })
    }

    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Integer(self.id),
            Value::Text(self.name),
            Value::Text(self.description),
            Value::Text(self.method),
            Value::Text(self.garnish),
        ]
    }
}

impl fmt::Display for Drink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Drink ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Method: {}", self.method)?;
        write!(f, "Garnish: {}", self.garnish)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub id: i64,
    /// Beer, Wine, Spirit...
    pub category: String,
    /// Ale, White wine, Whiskey...
    pub group: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    /// ml, dashes...
    pub measure: String,
    /// Expected within 0-100, not enforced.
    pub abv: f64,
}

impl Ingredient {
    pub fn prompt<R: BufRead, W: Write>(id: i64, input: &mut Prompter<R, W>) -> Result<Self> {
        Ok(Self {
            id,
            category: input.read_line("Enter the category, e.g. Beer, Wine, Spirit: ")?,
            group: input
                .read_line("Enter the type of ingredient, e.g. Ale, White wine, Whiskey: ")?,
            name: input
                .read_line("Enter product name, e.g. Neck Oil, Gran Reserva, Green Label: ")?,
            brand: input.read_line(
                "Enter the brand name, e.g. Beavertown, Luis Felipe Edwards, Johnny Walker: ",
            )?,
            description: input.read_line("If you wish, enter a description here: ")?,
            measure: input
                .read_line("What units is the ingredient measured in, e.g. ml, dashes? ")?,
            abv: Self::ask_abv(input)?,
        })
    }

    pub fn ask_abv<R: BufRead, W: Write>(input: &mut Prompter<R, W>) -> Result<f64> {
        input.read_real("Enter the ABV: ")
    }

    pub fn into_row(self) -> Vec<Value> {
        vec![
            Value::Integer(self.id),
            Value::Text(self.category),
            Value::Text(self.group),
            Value::Text(self.name),
            Value::Text(self.brand),
            Value::Text(self.description),
            Value::Text(self.measure),
            Value::Real(self.abv),
        ]
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ingredient ID: {}", self.id)?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "Type: {}", self.group)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Brand: {}", self.brand)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Measure: {}", self.measure)?;
        write!(f, "ABV: {:?}", self.abv)
    }
}

/// Record kinds that can be entered interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Drink,
    Ingredient,
}

impl EntryKind {
    pub fn table(self) -> TableDefinition {
        match self {
            EntryKind::Drink => drinks_table(),
            EntryKind::Ingredient => ingredients_table(),
        }
    }

    /// Prompts for a new record, numbered one past the current maximum.
    pub fn build<R: BufRead, W: Write>(
        self,
        store: &SqliteStore,
        input: &mut Prompter<R, W>,
    ) -> Result<Entry> {
        let id = store.next_id(&self.table())?;
        Ok(match self {
            EntryKind::Drink => Entry::Drink(Drink::prompt(id, input)?),
            EntryKind::Ingredient => Entry::Ingredient(Ingredient::prompt(id, input)?),
        })
    }
}

/// A fully assembled candidate record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Entry {
    Drink(Drink),
    Ingredient(Ingredient),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Drink(_) => EntryKind::Drink,
            Entry::Ingredient(_) => EntryKind::Ingredient,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Entry::Drink(d) => d.id,
            Entry::Ingredient(i) => i.id,
        }
    }

    /// Values in table column order, identifier first.
    pub fn into_row(self) -> Vec<Value> {
        match self {
            Entry::Drink(d) => d.into_row(),
            Entry::Ingredient(i) => i.into_row(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Inserted { id: i64 },
    Duplicate { id: i64 },
}

/// Builds one record of `kind` and stores it.
pub fn add_entry<R: BufRead, W: Write>(
    store: &SqliteStore,
    kind: EntryKind,
    input: &mut Prompter<R, W>,
) -> Result<EntryOutcome> {
    let entry = kind.build(store, input)?;
    add_record(store, entry, input.output())
}

/// Writes `entry` unless its identifier is already stored, in which case the
/// record is dropped and a notice goes to `out`.
pub fn add_record<W: Write>(
    store: &SqliteStore,
    entry: Entry,
    out: &mut W,
) -> Result<EntryOutcome> {
    let table = entry.kind().table();
    let id = entry.id();

    if store.exists(&table, &Query::new().with_condition(ID_COLUMN, id))? {
        info!(table = %table.name, id, "duplicate identifier, record discarded");
        writeln!(out, "This {} already exists.", entry_noun(&table.name))?;
        return Ok(EntryOutcome::Duplicate { id });
    }

    store.insert(&table, &entry.into_row())?;
    info!(table = %table.name, id, "record inserted");
    Ok(EntryOutcome::Inserted { id })
}

/// "Drinks" -> "drink".
fn entry_noun(table: &str) -> String {
    let singular = table.strip_suffix('s').unwrap_or(table);
    singular.to_lowercase()
}
