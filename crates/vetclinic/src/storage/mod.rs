//! Storage layer for vetclinic.
//!
//! This module provides `SQLite`-based persistent storage for the clinic
//! records: owners, pets, visits, vets and specialties, plus the phonetic
//! index that backs owner search.
//!
//! Owner writes and their derived phonetic entries always happen inside
//! one transaction: either the owner row and its entries land together,
//! or neither does.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Owner, Pet, PhoneticEntry, Specialty, Vet, Visit};

/// Text format for dates stored in `SQLite`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default wait on a locked database before giving up.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Storage engine for clinic records.
///
/// Owns a single `SQLite` connection. Mutating operations that touch
/// more than one table take `&mut self` and run in a transaction.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Whether owner updates regenerate phonetic entries.
    reindex_on_update: bool,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL for concurrent readers; foreign keys carry the cascades
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;

        // Initialize schema
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            reindex_on_update: true,
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            reindex_on_update: true,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How long a writer waits on a locked database.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying pragma cannot be set.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Control whether owner updates regenerate phonetic entries.
    ///
    /// Defaults to `true`. Turning it off reproduces datasets written by
    /// systems that indexed names on creation only, at the price of the
    /// index going stale when names change.
    pub fn set_reindex_on_update(&mut self, reindex: bool) {
        self.reindex_on_update = reindex;
    }

    // === Owners ===

    /// Insert a new owner and its phonetic entries in one transaction.
    ///
    /// Returns the stored owner with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the database operation fails.
    pub fn create_owner(&mut self, owner: &Owner) -> Result<Owner> {
        owner.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            r"
            INSERT INTO owners (first_name, last_name, address, city, telephone)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                owner.first_name,
                owner.last_name,
                owner.address,
                owner.city,
                owner.telephone,
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_phonetic_entries(&tx, id, owner)?;
        tx.commit()?;

        debug!("Inserted owner {} ({})", id, owner.full_name());
        let mut stored = owner.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    /// Update an existing owner.
    ///
    /// Phonetic entries are regenerated (deleted and reinserted) in the
    /// same transaction unless reindexing on update has been turned off.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner has no id, fails validation, does
    /// not exist, or the database operation fails.
    pub fn update_owner(&mut self, owner: &Owner) -> Result<()> {
        let id = owner
            .id
            .ok_or_else(|| Error::validation("id", "must be set for updates"))?;
        owner.validate()?;

        let reindex = self.reindex_on_update;
        let tx = self.conn.transaction()?;
        let affected = tx.execute(
            r"
            UPDATE owners
            SET first_name = ?1, last_name = ?2, address = ?3, city = ?4, telephone = ?5
            WHERE id = ?6
            ",
            params![
                owner.first_name,
                owner.last_name,
                owner.address,
                owner.city,
                owner.telephone,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(Error::not_found("owner", id));
        }
        if reindex {
            tx.execute("DELETE FROM phonetic_entries WHERE owner_id = ?1", [id])?;
            insert_phonetic_entries(&tx, id, owner)?;
        }
        tx.commit()?;

        debug!("Updated owner {}", id);
        Ok(())
    }

    /// Get an owner by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_owner(&self, id: i64) -> Result<Option<Owner>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, first_name, last_name, address, city, telephone
                FROM owners WHERE id = ?1
                ",
                [id],
                row_to_owner,
            )
            .optional()?;
        Ok(result)
    }

    /// List all owners, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_owners(&self) -> Result<Vec<Owner>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, first_name, last_name, address, city, telephone
            FROM owners ORDER BY id
            ",
        )?;

        let owners = stmt
            .query_map([], row_to_owner)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(owners)
    }

    /// Delete an owner and its phonetic entries.
    ///
    /// The deletion is guarded: an owner that still has pets registered
    /// is left untouched and the call reports [`Error::OwnerHasPets`].
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist, still has pets, or
    /// the database operation fails.
    pub fn delete_owner(&mut self, id: i64) -> Result<()> {
        if self.get_owner(id)?.is_none() {
            return Err(Error::not_found("owner", id));
        }
        let pets = self.count_pets_for_owner(id)?;
        if pets > 0 {
            return Err(Error::OwnerHasPets { id, pets });
        }

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM phonetic_entries WHERE owner_id = ?1", [id])?;
        tx.execute("DELETE FROM owners WHERE id = ?1", [id])?;
        tx.commit()?;

        info!("Deleted owner {}", id);
        Ok(())
    }

    /// Count the pets registered to an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_pets_for_owner(&self, owner_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pets WHERE owner_id = ?1",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // === Pets ===

    /// Insert a new pet for an existing owner.
    ///
    /// Returns the stored pet with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the owner does not exist,
    /// or the database operation fails.
    pub fn create_pet(&self, pet: &Pet) -> Result<Pet> {
        pet.validate()?;
        if self.get_owner(pet.owner_id)?.is_none() {
            return Err(Error::not_found("owner", pet.owner_id));
        }

        self.conn.execute(
            r"
            INSERT INTO pets (owner_id, name, species, birth_date)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                pet.owner_id,
                pet.name,
                pet.species,
                pet.birth_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted pet {} for owner {}", id, pet.owner_id);
        let mut stored = pet.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    /// Get a pet by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_pet(&self, id: i64) -> Result<Option<Pet>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, owner_id, name, species, birth_date
                FROM pets WHERE id = ?1
                ",
                [id],
                row_to_pet,
            )
            .optional()?;
        Ok(result)
    }

    /// List an owner's pets, oldest record first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_pets_for_owner(&self, owner_id: i64) -> Result<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, owner_id, name, species, birth_date
            FROM pets WHERE owner_id = ?1 ORDER BY id
            ",
        )?;

        let pets = stmt
            .query_map([owner_id], row_to_pet)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pets)
    }

    /// Update an existing pet.
    ///
    /// # Errors
    ///
    /// Returns an error if the pet has no id, fails validation, does not
    /// exist, or the database operation fails.
    pub fn update_pet(&self, pet: &Pet) -> Result<()> {
        let id = pet
            .id
            .ok_or_else(|| Error::validation("id", "must be set for updates"))?;
        pet.validate()?;

        let affected = self.conn.execute(
            r"
            UPDATE pets SET owner_id = ?1, name = ?2, species = ?3, birth_date = ?4
            WHERE id = ?5
            ",
            params![
                pet.owner_id,
                pet.name,
                pet.species,
                pet.birth_date.format(DATE_FORMAT).to_string(),
                id,
            ],
        )?;
        if affected == 0 {
            return Err(Error::not_found("pet", id));
        }
        Ok(())
    }

    /// Delete a pet by ID. Its visits cascade away with it.
    ///
    /// Returns `true` if a pet was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_pet(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM pets WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // === Visits ===

    /// Insert a new visit for an existing pet.
    ///
    /// Returns the stored visit with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the pet does not exist, or
    /// the database operation fails.
    pub fn create_visit(&self, visit: &Visit) -> Result<Visit> {
        visit.validate()?;
        if self.get_pet(visit.pet_id)?.is_none() {
            return Err(Error::not_found("pet", visit.pet_id));
        }

        self.conn.execute(
            r"
            INSERT INTO visits (pet_id, visit_date, description)
            VALUES (?1, ?2, ?3)
            ",
            params![
                visit.pet_id,
                visit.date.format(DATE_FORMAT).to_string(),
                visit.description,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted visit {} for pet {}", id, visit.pet_id);
        let mut stored = visit.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    /// List a pet's visits, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_visits_for_pet(&self, pet_id: i64) -> Result<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, pet_id, visit_date, description
            FROM visits WHERE pet_id = ?1 ORDER BY visit_date DESC, id DESC
            ",
        )?;

        let visits = stmt
            .query_map([pet_id], row_to_visit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(visits)
    }

    /// Delete a visit by ID.
    ///
    /// Returns `true` if a visit was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_visit(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM visits WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // === Vets & Specialties ===

    /// Insert a new vet and attach its specialties in one transaction.
    ///
    /// Specialty names that don't exist yet are created on the fly;
    /// existing names are shared between vets.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the database operation fails.
    pub fn create_vet(&mut self, vet: &Vet) -> Result<Vet> {
        vet.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO vets (first_name, last_name) VALUES (?1, ?2)",
            params![vet.first_name, vet.last_name],
        )?;
        let id = tx.last_insert_rowid();

        for name in &vet.specialties {
            let specialty_id = specialty_id_or_create(&tx, name)?;
            tx.execute(
                "INSERT OR IGNORE INTO vet_specialties (vet_id, specialty_id) VALUES (?1, ?2)",
                params![id, specialty_id],
            )?;
        }
        tx.commit()?;

        debug!("Inserted vet {} ({})", id, vet.full_name());
        let mut stored = vet.clone();
        stored.id = Some(id);
        stored.specialties.sort();
        stored.specialties.dedup();
        Ok(stored)
    }

    /// List all vets with their specialties attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_vets(&self) -> Result<Vec<Vet>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, first_name, last_name FROM vets ORDER BY id")?;
        let mut vets = stmt
            .query_map([], |row| {
                Ok(Vet {
                    id: Some(row.get(0)?),
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    specialties: Vec::new(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut spec_stmt = self.conn.prepare(
            r"
            SELECT s.name FROM specialties s
            JOIN vet_specialties vs ON vs.specialty_id = s.id
            WHERE vs.vet_id = ?1 ORDER BY s.name
            ",
        )?;
        for vet in &mut vets {
            let id = vet.id.unwrap_or_default();
            vet.specialties = spec_stmt
                .query_map([id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
        }
        Ok(vets)
    }

    /// List all known specialties, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_specialties(&self) -> Result<Vec<Specialty>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM specialties ORDER BY name")?;
        let specialties = stmt
            .query_map([], |row| {
                Ok(Specialty {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(specialties)
    }

    // === Phonetic Index ===

    /// Find all phonetic entries whose code exactly equals the argument.
    ///
    /// An empty result is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_by_code(&self, code: &str) -> Result<Vec<PhoneticEntry>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, owner_id, code
            FROM phonetic_entries WHERE code = ?1 ORDER BY id
            ",
        )?;

        let entries = stmt
            .query_map([code], |row| {
                Ok(PhoneticEntry {
                    id: Some(row.get(0)?),
                    owner_id: row.get(1)?,
                    code: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Delete all phonetic entries of an owner.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_phonetic_for_owner(&self, owner_id: i64) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM phonetic_entries WHERE owner_id = ?1", [owner_id])?;
        Ok(affected)
    }

    // === Stats ===

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<ClinicStats> {
        let count = |table: &str| -> Result<i64> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
            Ok(n)
        };

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(ClinicStats {
            owners: count("owners")?,
            pets: count("pets")?,
            visits: count("visits")?,
            vets: count("vets")?,
            phonetic_entries: count("phonetic_entries")?,
            db_size_bytes,
        })
    }
}

/// Write the derived phonetic entries for an owner's name fields.
///
/// One plain insert per field; callers that need regeneration delete
/// the owner's entries first, inside the same transaction.
fn insert_phonetic_entries(tx: &Transaction, owner_id: i64, owner: &Owner) -> Result<()> {
    for name in [&owner.first_name, &owner.last_name] {
        let code = metafone::encode(name);
        tx.execute(
            "INSERT INTO phonetic_entries (owner_id, code) VALUES (?1, ?2)",
            params![owner_id, code],
        )?;
    }
    Ok(())
}

/// Look up a specialty id by name, creating the row if needed.
fn specialty_id_or_create(tx: &Transaction, name: &str) -> Result<i64> {
    tx.execute("INSERT OR IGNORE INTO specialties (name) VALUES (?1)", [name])?;
    let id: i64 = tx.query_row("SELECT id FROM specialties WHERE name = ?1", [name], |row| {
        row.get(0)
    })?;
    Ok(id)
}

/// Convert a database row to an Owner struct.
fn row_to_owner(row: &rusqlite::Row) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: Some(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        telephone: row.get(5)?,
    })
}

/// Convert a database row to a Pet struct.
fn row_to_pet(row: &rusqlite::Row) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        birth_date: parse_date(row.get::<_, String>(4)?, 4)?,
    })
}

/// Convert a database row to a Visit struct.
fn row_to_visit(row: &rusqlite::Row) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: Some(row.get(0)?),
        pet_id: row.get(1)?,
        date: parse_date(row.get::<_, String>(2)?, 2)?,
        description: row.get(3)?,
    })
}

fn parse_date(text: String, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicStats {
    /// Total number of owners stored.
    pub owners: i64,
    /// Total number of pets stored.
    pub pets: i64,
    /// Total number of visits stored.
    pub visits: i64,
    /// Total number of vets stored.
    pub vets: i64,
    /// Total number of phonetic index entries stored.
    pub phonetic_entries: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
