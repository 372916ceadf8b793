use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use entry_repo::config::Config;
use entry_repo::constants::{
    ERROR_ENTRY_NOT_FOUND, ERROR_FETCH_FAILED, ERROR_INVALID_ENTRY_ID, LIST_EMPTY, SUCCESS_ENTRY_ADDED,
    SUCCESS_ENTRY_DELETED, SUCCESS_ENTRY_UPDATED, WATCH_HINT,
};
use entry_repo::entities::entry;
use entry_repo::logger;
use entry_repo::repository::{EntryRepository, SqliteEntryRepository};
use entry_repo::storage::SqliteEntryStore;
use entry_repo::utils::datetime;

const USAGE: &str = "\
Usage: entry-repo <command>

Commands:
  list            Show all entries, newest first
  add             Create a new entry
  delete <id>     Delete an entry
  toggle <id>     Flip an entry's enabled flag
  watch           Print the list every time it changes (Ctrl-C to stop)
  init-config     Write a default configuration file";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Add,
    Delete(Uuid),
    Toggle(Uuid),
    Watch,
    InitConfig,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, String> {
        let id = |value: Option<&String>| -> Result<Uuid, String> {
            let value = value.ok_or_else(|| "missing entry id".to_string())?;
            Uuid::parse_str(value).map_err(|_| format!("{}: {}", ERROR_INVALID_ENTRY_ID, value))
        };

        match args.first().map(String::as_str) {
            None | Some("list") => Ok(Command::List),
            Some("add") => Ok(Command::Add),
            Some("delete") => id(args.get(1)).map(Command::Delete),
            Some("toggle") => id(args.get(1)).map(Command::Toggle),
            Some("watch") => Ok(Command::Watch),
            Some("init-config") => Ok(Command::InitConfig),
            Some(other) => Err(format!("unknown command '{}'", other)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("❌ {}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    if command == Command::InitConfig {
        return Config::generate_default_config(Config::get_default_config_path()?);
    }

    let config = Config::load()?;
    logger::init(&config.logging)?;

    let store = SqliteEntryStore::open(&config.store)
        .await
        .context("Failed to open entry store")?;
    let repository = SqliteEntryRepository::new(store);

    // A failed initial fetch just means an empty list to start from
    if let Err(e) = repository.fetch_models().await {
        eprintln!("{}: {}", ERROR_FETCH_FAILED, e);
    }

    match command {
        Command::List => print_entries(&repository.models()),
        Command::Add => {
            repository.add_entry().await?;
            println!("{}", SUCCESS_ENTRY_ADDED);
            repository.fetch_models().await?;
            print_entries(&repository.models());
        }
        Command::Delete(id) => {
            let entry = find_entry(&repository, id)?;
            repository.delete_entry(&entry).await?;
            println!("{}", SUCCESS_ENTRY_DELETED);
        }
        Command::Toggle(id) => {
            let entry = find_entry(&repository, id)?;
            repository.set_enabled(&entry, !entry.is_enabled).await?;
            println!("{}", SUCCESS_ENTRY_UPDATED);
        }
        Command::Watch => watch(&repository).await?,
        Command::InitConfig => {}
    }

    Ok(())
}

fn find_entry(repository: &SqliteEntryRepository, id: Uuid) -> Result<entry::Model> {
    repository
        .models()
        .iter()
        .find(|entry| entry.uuid == id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{} {}", ERROR_ENTRY_NOT_FOUND, id))
}

async fn watch(repository: &SqliteEntryRepository) -> Result<()> {
    println!("{}", WATCH_HINT);
    let mut models = repository.subscribe();
    print_entries(&models.borrow_and_update());

    loop {
        tokio::select! {
            changed = models.changed() => {
                if changed.is_err() {
                    break;
                }
                print_entries(&models.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Some(err) = repository.last_refresh_error() {
        eprintln!("{}: {}", ERROR_FETCH_FAILED, err);
    }
    Ok(())
}

fn print_entries(entries: &[entry::Model]) {
    if entries.is_empty() {
        println!("{}", LIST_EMPTY);
        return;
    }

    let now = Utc::now();
    for entry in entries {
        println!(
            "{} {}  {:<10} {}",
            if entry.is_enabled { "✔" } else { " " },
            entry.uuid,
            datetime::format_age(entry.created_at, now),
            datetime::format_time(entry.created_at),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_arguments_lists() {
        assert_eq!(Command::parse(&[]), Ok(Command::List));
    }

    #[test]
    fn delete_requires_a_valid_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            Command::parse(&args(&["delete", &id.to_string()])),
            Ok(Command::Delete(id))
        );
        assert!(Command::parse(&args(&["delete"])).is_err());
        assert!(Command::parse(&args(&["delete", "nope"])).is_err());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let err = Command::parse(&args(&["frobnicate"])).unwrap_err();
        assert!(err.contains("frobnicate"));
    }
}
