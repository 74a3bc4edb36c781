use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use alcohol_tracker::catalog::{catalog_schema, drinks_table, ingredients_table};
use alcohol_tracker::entry::{
    add_entry, add_record, Drink, Entry, EntryKind, EntryOutcome, Ingredient,
};
use alcohol_tracker::input::{Prompter, REAL_RETRY};
use alcohol_tracker::sqlite::{SqliteConfig, SqliteStore, Value};
use alcohol_tracker::Result;
use tempfile::TempDir;

fn create_temp_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.db");
    let config = SqliteConfig::new(path.to_str().unwrap(), catalog_schema());
    let store = SqliteStore::new(config);
    store.initialize_schema().unwrap();
    (store, dir)
}

fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn single_malt(id: i64) -> Ingredient {
    Ingredient {
        id,
        category: "Spirit".into(),
        group: "Whiskey".into(),
        name: "Green Label".into(),
        brand: "Johnny Walker".into(),
        description: "".into(),
        measure: "ml".into(),
        abv: 43.0,
    }
}

#[test]
fn test_add_drink_to_empty_table() {
    test_add_drink_to_empty_table_impl().unwrap();
}

fn test_add_drink_to_empty_table_impl() -> Result<()> {
    let (store, _dir) = create_temp_store();
    let mut p = prompter("Negroni\nClassic\nStirred\nOrange peel\n");

    let outcome = add_entry(&store, EntryKind::Drink, &mut p)?;
    assert_eq!(outcome, EntryOutcome::Inserted { id: 1 });

    let data = store.fetch_all(&drinks_table())?;
    assert_eq!(
        data.rows,
        vec![vec![
            Value::Integer(1),
            "Negroni".into(),
            "Classic".into(),
            "Stirred".into(),
            "Orange peel".into(),
        ]]
    );
    Ok(())
}

#[test]
fn test_drink_text_fields_are_unvalidated() {
    test_drink_text_fields_are_unvalidated_impl().unwrap();
}

// Names go through the free-text reader, so spaces, symbols and empty
// answers are stored as typed. Only the letters-only reader would reject them.
fn test_drink_text_fields_are_unvalidated_impl() -> Result<()> {
    let (store, _dir) = create_temp_store();
    let mut p = prompter("Gin & Tonic 2\n\nBuilt\n\n");

    add_entry(&store, EntryKind::Drink, &mut p)?;
    let data = store.fetch_all(&drinks_table())?;
    assert_eq!(data.rows[0][1], Value::Text("Gin & Tonic 2".into()));
    assert_eq!(data.rows[0][2], Value::Text("".into()));
    Ok(())
}

#[test]
fn test_add_ingredient_follows_max_id() {
    test_add_ingredient_follows_max_id_impl().unwrap();
}

fn test_add_ingredient_follows_max_id_impl() -> Result<()> {
    let (store, _dir) = create_temp_store();
    let table = ingredients_table();
    store.insert(&table, &single_malt(3).into_row())?;

    let mut p = prompter("Beer\nAle\nNeck Oil\nBeavertown\n\nml\nstrong\n4.3\n");
    let outcome = add_entry(&store, EntryKind::Ingredient, &mut p)?;
    assert_eq!(outcome, EntryOutcome::Inserted { id: 4 });

    let out = String::from_utf8(p.into_output()).unwrap();
    assert!(out.contains("Enter the ABV: "));
    assert_eq!(out.matches(REAL_RETRY).count(), 1);

    let data = store.fetch_all(&table)?;
    assert_eq!(data.rows.len(), 2);
    assert_eq!(data.rows[1][0], Value::Integer(4));
    assert_eq!(data.rows[1][3], Value::Text("Neck Oil".into()));
    assert_eq!(data.rows[1][7], Value::Real(4.3));
    Ok(())
}

#[test]
fn test_duplicate_ingredient_is_discarded() {
    test_duplicate_ingredient_is_discarded_impl().unwrap();
}

fn test_duplicate_ingredient_is_discarded_impl() -> Result<()> {
    let (store, _dir) = create_temp_store();
    let table = ingredients_table();
    store.insert(&table, &single_malt(3).into_row())?;

    // Same id, different contents: still a duplicate.
    let mut candidate = single_malt(3);
    candidate.name = "Blue Label".into();

    let mut out = Vec::new();
    let outcome = add_record(&store, Entry::Ingredient(candidate), &mut out)?;
    assert_eq!(outcome, EntryOutcome::Duplicate { id: 3 });
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "This ingredient already exists.\n"
    );

    let data = store.fetch_all(&table)?;
    assert_eq!(data.rows.len(), 1);
    assert_eq!(data.rows[0][3], Value::Text("Green Label".into()));
    Ok(())
}

#[test]
fn test_duplicate_drink_message() {
    let (store, _dir) = create_temp_store();
    let drink = Drink {
        id: 1,
        name: "Sangria".into(),
        description: "".into(),
        method: "Built".into(),
        garnish: "Orange".into(),
    };

    let mut out = Vec::new();
    add_record(&store, Entry::Drink(drink.clone()), &mut out).unwrap();
    assert!(out.is_empty());

    let outcome = add_record(&store, Entry::Drink(drink), &mut out).unwrap();
    assert_eq!(outcome, EntryOutcome::Duplicate { id: 1 });
    assert_eq!(String::from_utf8(out).unwrap(), "This drink already exists.\n");
    assert_eq!(store.fetch_all(&drinks_table()).unwrap().rows.len(), 1);
}

#[test]
fn test_entry_kind_tables() {
    assert_eq!(EntryKind::Drink.table(), drinks_table());
    assert_eq!(EntryKind::Ingredient.table(), ingredients_table());
    assert_eq!(Entry::Ingredient(single_malt(9)).kind(), EntryKind::Ingredient);
    assert_eq!(Entry::Ingredient(single_malt(9)).id(), 9);
}

#[test]
fn test_display_details() {
    let drink = Drink {
        id: 1,
        name: "Negroni".into(),
        description: "Classic".into(),
        method: "Stirred".into(),
        garnish: "Orange peel".into(),
    };
    assert_eq!(
        drink.to_string(),
        "Drink ID: 1\nName: Negroni\nDescription: Classic\nMethod: Stirred\nGarnish: Orange peel"
    );

    let details = single_malt(2).to_string();
    assert!(details.starts_with("Ingredient ID: 2\nCategory: Spirit\n"));
    assert!(details.ends_with("Measure: ml\nABV: 43.0"));
}

#[test]
fn test_entry_serializes() {
    let json = serde_json::to_value(Entry::Ingredient(single_malt(5))).unwrap();
    assert_eq!(json["Ingredient"]["id"], 5);
    assert_eq!(json["Ingredient"]["abv"], 43.0);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn logs_at(level: tracing::Level, f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_duplicate_is_not_a_warning() {
    let (store, _dir) = create_temp_store();
    store
        .insert(&ingredients_table(), &single_malt(3).into_row())
        .unwrap();

    let warnings = logs_at(tracing::Level::WARN, || {
        let mut out = Vec::new();
        let outcome = add_record(&store, Entry::Ingredient(single_malt(3)), &mut out).unwrap();
        assert_eq!(outcome, EntryOutcome::Duplicate { id: 3 });
    });
    assert!(warnings.is_empty(), "unexpected log output: {warnings}");

    let info = logs_at(tracing::Level::INFO, || {
        let mut out = Vec::new();
        add_record(&store, Entry::Ingredient(single_malt(3)), &mut out).unwrap();
    });
    assert!(info.contains("duplicate identifier"));
}
