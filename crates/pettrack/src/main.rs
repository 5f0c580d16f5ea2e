//! `pettrack` - CLI for the pet record store
//!
//! Each invocation opens the configured backend, loads the record store,
//! runs one command and closes the store again.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;

use pettrack::cli::{Cli, Command, ConfigCommand, PetCommand, ThemeCommand, VaccinationCommand};
use pettrack::record::{Pet, Vaccination};
use pettrack::{init_logging, Config, Error, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Config commands never touch the record store.
    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        other => other,
    };

    let kv = config
        .open_backend()
        .with_context(|| format!("opening {}", config.database_path().display()))?;
    let mut store = RecordStore::open(kv).await;

    let result = match command {
        Command::Pet(cmd) => handle_pet(&mut store, cmd).await,
        Command::Vaccination(cmd) => handle_vaccination(&mut store, cmd).await,
        Command::Theme(cmd) => handle_theme(&mut store, cmd).await,
        Command::Status(cmd) => handle_status(&store, &config, cmd.json),
        Command::Config(_) => unreachable!("handled above"),
    };

    store.close().await.context("closing record store")?;
    result
}

async fn handle_pet(store: &mut RecordStore, cmd: PetCommand) -> anyhow::Result<()> {
    match cmd {
        PetCommand::Add(args) => {
            let pet = store.create_pet(args.into()).await?;
            println!("{}", pet.id);
        }
        PetCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.pets())?);
            } else if store.pets().is_empty() {
                println!("No pets yet.");
            } else {
                for pet in store.pets() {
                    print_pet_line(pet);
                }
            }
        }
        PetCommand::Show { id, json } => {
            let Some(pet) = store.pet(&id) else {
                return Err(Error::not_found("pet", id).into());
            };
            let history = store.vaccinations_for(&id);
            if json {
                let value = serde_json::json!({ "pet": pet, "vaccinations": history });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_pet_details(pet, &history);
            }
        }
        PetCommand::Update(args) => {
            let (id, update) = args.into_update();
            if update.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            match store.update_pet(&id, update).await? {
                Some(pet) => print_pet_line(&pet),
                None => return Err(Error::not_found("pet", id).into()),
            }
        }
        PetCommand::Delete { id } => {
            if !store.delete_pet(&id).await? {
                return Err(Error::not_found("pet", id).into());
            }
            println!("Deleted pet {id}");
        }
    }
    Ok(())
}

async fn handle_vaccination(
    store: &mut RecordStore,
    cmd: VaccinationCommand,
) -> anyhow::Result<()> {
    match cmd {
        VaccinationCommand::Add(args) => {
            let vaccination = store
                .add_vaccination(args.into_new(Local::now().date_naive()))
                .await?;
            println!("{}", vaccination.id);
        }
        VaccinationCommand::List { pet, json } => {
            let records: Vec<&Vaccination> = match &pet {
                Some(pet_id) => store.vaccinations_for(pet_id),
                None => store.vaccinations().iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No vaccinations recorded.");
            } else {
                for v in records {
                    print_vaccination_line(v);
                }
            }
        }
        VaccinationCommand::Delete { id } => {
            if !store.delete_vaccination(&id).await? {
                return Err(Error::not_found("vaccination", id).into());
            }
            println!("Deleted vaccination {id}");
        }
    }
    Ok(())
}

async fn handle_theme(store: &mut RecordStore, cmd: ThemeCommand) -> anyhow::Result<()> {
    match cmd {
        ThemeCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.theme())?);
            } else {
                println!("{}", store.theme_mode());
            }
        }
        ThemeCommand::Toggle => {
            let mode = store.toggle_theme().await?;
            println!("{mode}");
        }
    }
    Ok(())
}

fn handle_status(store: &RecordStore, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        let status = serde_json::json!({
            "pets": store.pets().len(),
            "vaccinations": store.vaccinations().len(),
            "theme": store.theme_mode(),
            "backend": store.backend().backend_name(),
            "database_path": config.database_path(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("pettrack status");
        println!("---------------");
        println!("Pets:          {}", store.pets().len());
        println!("Vaccinations:  {}", store.vaccinations().len());
        println!("Theme:         {}", store.theme_mode());
        println!("Backend:       {}", store.backend().backend_name());
        println!("Database:      {}", config.database_path().display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
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

fn print_pet_line(pet: &Pet) {
    println!(
        "{}  {} ({}, {})  {} kg",
        pet.id, pet.name, pet.species, pet.breed, pet.weight
    );
}

fn print_pet_details(pet: &Pet, history: &[&Vaccination]) {
    let age = pet.age_on(Local::now().date_naive());
    println!("{}", pet.name);
    println!("  Id:         {}", pet.id);
    println!("  Species:    {}", pet.species);
    println!("  Breed:      {}", pet.breed);
    println!("  Born:       {} ({age})", pet.birth_date);
    println!("  Weight:     {} kg", pet.weight);
    if let Some(photo) = &pet.photo_uri {
        println!("  Photo:      {photo}");
    }
    println!();
    if history.is_empty() {
        println!("  No vaccinations recorded.");
    } else {
        println!("  Vaccinations:");
        for v in history {
            print!("    ");
            print_vaccination_line(v);
        }
    }
}

fn print_vaccination_line(v: &Vaccination) {
    println!(
        "{}  {}  {} (serial {})  pet {}",
        v.id, v.date, v.vaccine_name, v.serial_number, v.pet_id
    );
}
