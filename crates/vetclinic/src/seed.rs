//! Demo fixture data for a fresh clinic database.
//!
//! Loads a small, self-consistent set of owners, pets, visits and vets so
//! the CLI has something to show out of the box. The owner names include
//! a phonetically-equivalent surname pair (Sousa/Souza) to demonstrate
//! the search behavior.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{Owner, Pet, Vet, Visit};
use crate::storage::Storage;

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Owners inserted.
    pub owners: usize,
    /// Pets inserted.
    pub pets: usize,
    /// Visits inserted.
    pub visits: usize,
    /// Vets inserted.
    pub vets: usize,
}

/// Owner rows: first name, last name, address, city, telephone.
const OWNERS: &[(&str, &str, &str, &str, &str)] = &[
    ("João", "Silva", "Rua das Acácias 110", "Campinas", "1932447700"),
    ("Maria", "Sousa", "Av. Brasil 2300", "Campinas", "1932441188"),
    ("Carlos", "Souza", "Rua XV de Novembro 85", "Valinhos", "1938710246"),
    ("Fernanda", "Queiroz", "Rua do Comércio 12", "Campinas", "1932459910"),
    ("Rafael", "Carvalho", "Travessa das Palmeiras 7", "Indaiatuba", "1938752233"),
    ("Beatriz", "Nascimento", "Rua Barão Geraldo 451", "Campinas", "1932881415"),
    ("Eduardo", "Ferreira", "Av. das Amoreiras 980", "Campinas", "1932770031"),
    ("Camila", "Rodrigues", "Rua Coronel Quirino 63", "Campinas", "1932554872"),
    ("Gustavo", "Honorato", "Rua da Matriz 5", "Vinhedo", "1938366120"),
    ("Larissa", "Gonçalves", "Av. Independência 1520", "Valinhos", "1938719955"),
];

/// Pet rows: owner position in `OWNERS`, name, species, birth date.
const PETS: &[(usize, &str, &str, (i32, u32, u32))] = &[
    (0, "Rex", "dog", (2019, 5, 4)),
    (0, "Tom", "cat", (2021, 8, 19)),
    (1, "Mimi", "cat", (2020, 2, 11)),
    (2, "Thor", "dog", (2018, 11, 30)),
    (3, "Nina", "cat", (2022, 6, 7)),
    (4, "Bidu", "dog", (2017, 3, 22)),
    (5, "Luna", "cat", (2021, 1, 15)),
    (6, "Pipoca", "bird", (2023, 4, 2)),
    (7, "Mel", "dog", (2020, 9, 27)),
    (8, "Fred", "hamster", (2023, 10, 12)),
    (9, "Bolinha", "dog", (2016, 7, 8)),
    (9, "Amora", "cat", (2022, 12, 1)),
];

/// Visit rows: pet position in `PETS`, date, description.
const VISITS: &[(usize, (i32, u32, u32), &str)] = &[
    (0, (2024, 1, 10), "annual checkup"),
    (0, (2024, 6, 2), "rabies shot"),
    (2, (2024, 3, 18), "spayed"),
    (3, (2024, 2, 5), "limping on front leg"),
    (6, (2024, 7, 21), "dental cleaning"),
    (8, (2024, 5, 9), "vaccination"),
];

/// Vet rows: first name, last name, specialty names.
const VETS: &[(&str, &str, &[&str])] = &[
    ("Artur", "Campos", &[]),
    ("Helena", "Prado", &["radiology"]),
    ("Otávio", "Braga", &["surgery", "dentistry"]),
    ("Renata", "Luz", &["surgery"]),
    ("Sérgio", "Dantas", &["radiology"]),
    ("Patrícia", "Moura", &[]),
];

/// Load the demo fixture set into an empty database.
///
/// Refuses to touch a database that already holds owners or vets, so a
/// repeated `seed` run cannot duplicate records.
///
/// # Errors
///
/// Returns an error if the database is not empty or a write fails.
pub fn load_sample_data(storage: &mut Storage) -> Result<SeedSummary> {
    let stats = storage.stats()?;
    if stats.owners > 0 || stats.vets > 0 {
        return Err(Error::validation(
            "database",
            "already contains records; seed only runs on an empty database",
        ));
    }

    let mut owner_ids = Vec::with_capacity(OWNERS.len());
    for (first, last, address, city, telephone) in OWNERS {
        let stored = storage.create_owner(&Owner::new(*first, *last, *address, *city, *telephone))?;
        owner_ids.push(stored.id.unwrap_or_default());
    }

    let mut pet_ids = Vec::with_capacity(PETS.len());
    for (owner_pos, name, species, (y, m, d)) in PETS {
        let birth = seed_date(*y, *m, *d)?;
        let stored = storage.create_pet(&Pet::new(owner_ids[*owner_pos], *name, *species, birth))?;
        pet_ids.push(stored.id.unwrap_or_default());
    }

    for (pet_pos, (y, m, d), description) in VISITS {
        let date = seed_date(*y, *m, *d)?;
        storage.create_visit(&Visit::new(pet_ids[*pet_pos], date, *description))?;
    }

    for (first, last, specialties) in VETS {
        let mut vet = Vet::new(*first, *last);
        vet.specialties = specialties.iter().map(ToString::to_string).collect();
        storage.create_vet(&vet)?;
    }

    let summary = SeedSummary {
        owners: OWNERS.len(),
        pets: PETS.len(),
        visits: VISITS.len(),
        vets: VETS.len(),
    };
    info!(
        "Seeded {} owners, {} pets, {} visits, {} vets",
        summary.owners, summary.pets, summary.visits, summary.vets
    );
    Ok(summary)
}

fn seed_date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| Error::internal(format!("invalid fixture date {y}-{m}-{d}")))
}
