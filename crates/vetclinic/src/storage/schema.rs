//! `SQLite` schema definitions for vetclinic.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the owners table.
pub const CREATE_OWNERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS owners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    telephone TEXT NOT NULL
)
";

/// SQL statement to create the pets table.
pub const CREATE_PETS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES owners(id),
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    birth_date TEXT NOT NULL
)
";

/// SQL statement to create the visits table.
///
/// Visits go away with their pet.
pub const CREATE_VISITS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pet_id INTEGER NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    visit_date TEXT NOT NULL,
    description TEXT NOT NULL
)
";

/// SQL statement to create the vets table.
pub const CREATE_VETS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
)
";

/// SQL statement to create the specialties table.
pub const CREATE_SPECIALTIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS specialties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
";

/// SQL statement to create the vet/specialty join table.
pub const CREATE_VET_SPECIALTIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vet_specialties (
    vet_id INTEGER NOT NULL REFERENCES vets(id) ON DELETE CASCADE,
    specialty_id INTEGER NOT NULL REFERENCES specialties(id),
    PRIMARY KEY (vet_id, specialty_id)
)
";

/// SQL statement to create the phonetic index table.
///
/// Entries are derived from owner names and go away with their owner.
pub const CREATE_PHONETIC_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS phonetic_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
    code TEXT NOT NULL
)
";

/// SQL statement to create an index on phonetic codes for exact lookup.
pub const CREATE_PHONETIC_CODE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_phonetic_entries_code ON phonetic_entries(code)
";

/// SQL statement to create an index on `pets.owner_id` for the pet guard.
pub const CREATE_PETS_OWNER_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id)
";

/// SQL statement to create an index on `visits.pet_id` for visit listings.
pub const CREATE_VISITS_PET_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_visits_pet ON visits(pet_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_OWNERS_TABLE,
    CREATE_PETS_TABLE,
    CREATE_VISITS_TABLE,
    CREATE_VETS_TABLE,
    CREATE_SPECIALTIES_TABLE,
    CREATE_VET_SPECIALTIES_TABLE,
    CREATE_PHONETIC_ENTRIES_TABLE,
    CREATE_PHONETIC_CODE_INDEX,
    CREATE_PETS_OWNER_INDEX,
    CREATE_VISITS_PET_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_owners_table_contains_required_columns() {
        assert!(CREATE_OWNERS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_OWNERS_TABLE.contains("first_name TEXT NOT NULL"));
        assert!(CREATE_OWNERS_TABLE.contains("last_name TEXT NOT NULL"));
        assert!(CREATE_OWNERS_TABLE.contains("telephone TEXT NOT NULL"));
    }

    #[test]
    fn test_phonetic_entries_cascade_with_owner() {
        assert!(CREATE_PHONETIC_ENTRIES_TABLE.contains("REFERENCES owners(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_visits_cascade_with_pet() {
        assert!(CREATE_VISITS_TABLE.contains("REFERENCES pets(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
