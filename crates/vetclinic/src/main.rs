//! `vetclin` - CLI for vetclinic
//!
//! This binary provides the command-line interface for managing clinic
//! records and searching owners by phonetic last name.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use vetclinic::cli::{
    Cli, Command, ConfigCommand, FindCommand, OwnerCommand, PetCommand, VetCommand, VisitCommand,
};
use vetclinic::model::{Owner, Pet, Vet, Visit};
use vetclinic::search::{find_owners, SearchOutcome};
use vetclinic::seed::load_sample_data;
use vetclinic::{init_logging, Config, Error, Storage};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Owner(cmd) => handle_owner(&mut open_storage(&config)?, cmd),
        Command::Pet(cmd) => handle_pet(&open_storage(&config)?, cmd),
        Command::Visit(cmd) => handle_visit(&open_storage(&config)?, cmd),
        Command::Vet(cmd) => handle_vet(&mut open_storage(&config)?, cmd),
        Command::Find(cmd) => handle_find(&open_storage(&config)?, &cmd),
        Command::Seed => handle_seed(&mut open_storage(&config)?),
        Command::Status(cmd) => handle_status(&config, &open_storage(&config)?, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the database named by the configuration and apply its knobs.
fn open_storage(config: &Config) -> Result<Storage> {
    let mut storage = Storage::open(config.database_path())?;
    storage.set_busy_timeout(config.busy_timeout())?;
    storage.set_reindex_on_update(config.search.reindex_on_update);
    Ok(storage)
}

fn handle_owner(storage: &mut Storage, cmd: OwnerCommand) -> Result<()> {
    match cmd {
        OwnerCommand::Add {
            first_name,
            last_name,
            address,
            city,
            telephone,
        } => {
            let owner = Owner::new(first_name, last_name, address, city, telephone);
            let stored = storage.create_owner(&owner)?;
            println!(
                "Owner {} registered: {}",
                stored.id.unwrap_or_default(),
                stored.full_name()
            );
        }
        OwnerCommand::Edit {
            id,
            first_name,
            last_name,
            address,
            city,
            telephone,
        } => {
            let mut owner = storage
                .get_owner(id)?
                .ok_or_else(|| Error::not_found("owner", id))?;
            if let Some(value) = first_name {
                owner.first_name = value;
            }
            if let Some(value) = last_name {
                owner.last_name = value;
            }
            if let Some(value) = address {
                owner.address = value;
            }
            if let Some(value) = city {
                owner.city = value;
            }
            if let Some(value) = telephone {
                owner.telephone = value;
            }
            storage.update_owner(&owner)?;
            println!("Owner {} updated: {}", id, owner.full_name());
        }
        OwnerCommand::Delete { id } => match storage.delete_owner(id) {
            Ok(()) => println!("Owner {id} deleted."),
            // the pet guard is a normal outcome, reported and done
            Err(err) if err.is_owner_has_pets() => {
                println!("Owner {id} cannot be deleted because it still has pets.");
                println!("Remove its pets first, then try again.");
            }
            Err(err) => return Err(err.into()),
        },
        OwnerCommand::Show { id, json } => {
            let owner = storage
                .get_owner(id)?
                .ok_or_else(|| Error::not_found("owner", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&owner_details(
                    storage, &owner,
                )?)?);
            } else {
                print_owner(storage, &owner)?;
            }
        }
        OwnerCommand::List { json } => {
            let owners = storage.list_owners()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&owners)?);
            } else if owners.is_empty() {
                println!("No owners registered.");
            } else {
                for owner in owners {
                    println!(
                        "{:>4}  {:<30} {:<15} {}",
                        owner.id.unwrap_or_default(),
                        owner.full_name(),
                        owner.city,
                        owner.telephone
                    );
                }
            }
        }
    }
    Ok(())
}

fn handle_pet(storage: &Storage, cmd: PetCommand) -> Result<()> {
    match cmd {
        PetCommand::Add {
            owner_id,
            name,
            species,
            birth_date,
        } => {
            let pet = storage.create_pet(&Pet::new(owner_id, name, species, birth_date))?;
            println!(
                "Pet {} registered: {} ({}) for owner {}",
                pet.id.unwrap_or_default(),
                pet.name,
                pet.species,
                pet.owner_id
            );
        }
        PetCommand::List { owner_id, json } => {
            let owner = storage
                .get_owner(owner_id)?
                .ok_or_else(|| Error::not_found("owner", owner_id))?;
            let pets = storage.list_pets_for_owner(owner_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pets)?);
            } else if pets.is_empty() {
                println!("{} has no pets registered.", owner.full_name());
            } else {
                for pet in pets {
                    println!(
                        "{:>4}  {:<20} {:<10} born {}",
                        pet.id.unwrap_or_default(),
                        pet.name,
                        pet.species,
                        pet.birth_date
                    );
                }
            }
        }
        PetCommand::Delete { id } => {
            if storage.delete_pet(id)? {
                println!("Pet {id} deleted.");
            } else {
                println!("Pet {id} not found.");
            }
        }
    }
    Ok(())
}

fn handle_visit(storage: &Storage, cmd: VisitCommand) -> Result<()> {
    match cmd {
        VisitCommand::Add {
            pet_id,
            date,
            description,
        } => {
            let visit = storage.create_visit(&Visit::new(pet_id, date, description))?;
            println!(
                "Visit {} recorded for pet {} on {}",
                visit.id.unwrap_or_default(),
                visit.pet_id,
                visit.date
            );
        }
        VisitCommand::List { pet_id, json } => {
            let pet = storage
                .get_pet(pet_id)?
                .ok_or_else(|| Error::not_found("pet", pet_id))?;
            let visits = storage.list_visits_for_pet(pet_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&visits)?);
            } else if visits.is_empty() {
                println!("{} has no visits recorded.", pet.name);
            } else {
                for visit in visits {
                    println!(
                        "{:>4}  {}  {}",
                        visit.id.unwrap_or_default(),
                        visit.date,
                        visit.description
                    );
                }
            }
        }
        VisitCommand::Delete { id } => {
            if storage.delete_visit(id)? {
                println!("Visit {id} deleted.");
            } else {
                println!("Visit {id} not found.");
            }
        }
    }
    Ok(())
}

fn handle_vet(storage: &mut Storage, cmd: VetCommand) -> Result<()> {
    match cmd {
        VetCommand::Add {
            first_name,
            last_name,
            specialties,
        } => {
            let mut vet = Vet::new(first_name, last_name);
            vet.specialties = specialties;
            let stored = storage.create_vet(&vet)?;
            println!(
                "Vet {} registered: {}",
                stored.id.unwrap_or_default(),
                stored.full_name()
            );
        }
        VetCommand::List { json } => {
            let vets = storage.list_vets()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vets)?);
            } else if vets.is_empty() {
                println!("No vets registered.");
            } else {
                for vet in vets {
                    let specialties = if vet.specialties.is_empty() {
                        "none".to_string()
                    } else {
                        vet.specialties.join(", ")
                    };
                    println!(
                        "{:>4}  {:<30} {}",
                        vet.id.unwrap_or_default(),
                        vet.full_name(),
                        specialties
                    );
                }
            }
        }
    }
    Ok(())
}

fn handle_find(storage: &Storage, cmd: &FindCommand) -> Result<()> {
    let query = cmd.last_name.clone().unwrap_or_default();
    let outcome = find_owners(storage, &query)?;

    if cmd.json {
        let owners: Vec<&Owner> = match &outcome {
            SearchOutcome::NotFound => Vec::new(),
            SearchOutcome::Single(owner) => vec![owner],
            SearchOutcome::Multiple(owners) => owners.iter().collect(),
        };
        let report = serde_json::json!({
            "query": query.trim(),
            "matches": owners.len(),
            "owners": owners,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match outcome {
        // a normal outcome, reported on the query field, not a failure
        SearchOutcome::NotFound => {
            println!("No owners found matching \"{}\".", query.trim());
        }
        SearchOutcome::Single(owner) => print_owner(storage, &owner)?,
        SearchOutcome::Multiple(owners) => {
            println!("{} owners match \"{}\":", owners.len(), query.trim());
            for owner in owners {
                println!(
                    "{:>4}  {:<30} {:<15} {}",
                    owner.id.unwrap_or_default(),
                    owner.full_name(),
                    owner.city,
                    owner.telephone
                );
            }
        }
    }
    Ok(())
}

fn handle_seed(storage: &mut Storage) -> Result<()> {
    let summary = load_sample_data(storage)?;
    println!(
        "Seeded {} owners, {} pets, {} visits, {} vets.",
        summary.owners, summary.pets, summary.visits, summary.vets
    );
    Ok(())
}

fn handle_status(config: &Config, storage: &Storage, json: bool) -> Result<()> {
    let stats = storage.stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "owners": stats.owners,
            "pets": stats.pets,
            "visits": stats.visits,
            "vets": stats.vets,
            "phonetic_entries": stats.phonetic_entries,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("vetclin status");
        println!("--------------");
        println!("Database:         {}", config.database_path().display());
        println!("Owners:           {}", stats.owners);
        println!("Pets:             {}", stats.pets);
        println!("Visits:           {}", stats.visits);
        println!("Vets:             {}", stats.vets);
        println!("Phonetic entries: {}", stats.phonetic_entries);
        println!("Database size:    {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:    {}", config.database_path().display());
                println!("  Busy timeout:     {} ms", config.storage.busy_timeout_ms);
                println!();
                println!("[Search]");
                println!(
                    "  Reindex on update: {}",
                    config.search.reindex_on_update
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Collect an owner with its pets and their visits for JSON output.
fn owner_details(storage: &Storage, owner: &Owner) -> Result<serde_json::Value> {
    let mut pets = Vec::new();
    for pet in storage.list_pets_for_owner(owner.id.unwrap_or_default())? {
        let visits = storage.list_visits_for_pet(pet.id.unwrap_or_default())?;
        pets.push(serde_json::json!({
            "pet": pet,
            "visits": visits,
        }));
    }
    Ok(serde_json::json!({
        "owner": owner,
        "pets": pets,
    }))
}

/// Print an owner's detail view: fields, pets, and each pet's visits.
fn print_owner(storage: &Storage, owner: &Owner) -> Result<()> {
    let id = owner.id.unwrap_or_default();
    println!("Owner {}: {}", id, owner.full_name());
    println!("  Address:   {}, {}", owner.address, owner.city);
    println!("  Telephone: {}", owner.telephone);

    let pets = storage.list_pets_for_owner(id)?;
    if pets.is_empty() {
        println!("  No pets registered.");
        return Ok(());
    }
    for pet in pets {
        println!(
            "  Pet {}: {} ({}), born {}",
            pet.id.unwrap_or_default(),
            pet.name,
            pet.species,
            pet.birth_date
        );
        for visit in storage.list_visits_for_pet(pet.id.unwrap_or_default())? {
            println!("    {}  {}", visit.date, visit.description);
        }
    }
    Ok(())
}
