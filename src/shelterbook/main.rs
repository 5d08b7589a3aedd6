use clap::Parser;
use shelterbook::api::{parse_selector, ShelterApi};
use shelterbook::commands::animal::{AnimalQuery, AnimalUpdate, NewAnimal};
use shelterbook::commands::auth::Registration;
use shelterbook::commands::config::ConfigAction;
use shelterbook::commands::request::{RequestQuery, RequestUpdate};
use shelterbook::commands::shelter::{NewShelter, ShelterQuery, ShelterUpdate};
use shelterbook::commands::user::{UserQuery, UserUpdate};
use shelterbook::commands::CmdResult;
use shelterbook::error::{Result, ShelterError};
use shelterbook::init::initialize;
use shelterbook::store::fs::FileStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
mod render;
use args::{
    AnimalCommand, AnimalFind, Cli, Commands, RequestCommand, RequestFind, ShelterCommand,
    ShelterFind, UserCommand, UserFind,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "shelterbook=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SHELTERBOOK_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

type Api = ShelterApi<FileStore>;

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut ctx = initialize(&cwd, cli.data_dir.as_deref(), cli.global)?;
    let api = &mut ctx.api;

    match cli.command {
        Commands::Init => show(api.init()?),
        Commands::Register {
            full_name,
            password,
            email,
            phone,
            address,
            birthdate,
        } => show(api.register(Registration {
            full_name,
            password,
            email,
            phone_number: phone,
            home_address: address,
            birthdate,
        })?),
        Commands::Login {
            full_name,
            email,
            password,
        } => show(api.login(&full_name, &email, &password)?),
        Commands::Logout => show(api.logout()?),
        Commands::Whoami => show(api.whoami()?),
        Commands::Shelter(cmd) => handle_shelter(api, cmd),
        Commands::Animal(cmd) => handle_animal(api, cmd),
        Commands::Request(cmd) => handle_request(api, cmd),
        Commands::User(cmd) => handle_user(api, cmd),
        Commands::Config { key, value } => handle_config(api, key, value),
    }
}

/// Print everything a command returned. Rejected writes still exit 0.
fn show(result: CmdResult) -> Result<()> {
    if !result.shelters.is_empty() {
        render::print_shelters(&result.shelters);
    }
    if !result.animals.is_empty() {
        render::print_animals(&result.animals);
    }
    if !result.requests.is_empty() {
        render::print_requests(&result.requests);
    }
    if !result.users.is_empty() {
        render::print_users(&result.users);
    }
    if let Some(account) = &result.account {
        render::print_account(account);
    }
    if let Some(config) = &result.config {
        render::print_config(config);
    }
    render::print_validation_errors(&result.validation_errors);
    render::print_messages(&result.messages);
    Ok(())
}

fn nothing_to_change() -> Result<()> {
    Err(ShelterError::Api("Nothing to change: pass at least one field".into()))
}

fn handle_shelter(api: &mut Api, cmd: ShelterCommand) -> Result<()> {
    match cmd {
        ShelterCommand::List => {
            let result = api.list_shelters()?;
            render::print_shelters(&result.shelters);
            Ok(())
        }
        ShelterCommand::Add {
            name,
            address,
            phone,
            capacity,
        } => show(api.add_shelter(NewShelter {
            name,
            address,
            phone,
            capacity,
        })?),
        ShelterCommand::Edit {
            shelter,
            name,
            address,
            phone,
            capacity,
        } => {
            let changes = ShelterUpdate {
                name,
                address,
                phone,
                capacity,
            };
            if changes.is_empty() {
                return nothing_to_change();
            }
            show(api.edit_shelter(&shelter, changes)?)
        }
        ShelterCommand::Delete { shelter } => show(api.delete_shelter(&shelter)?),
        ShelterCommand::Find(find) => {
            let query = shelter_query(find)?;
            let result = api.find_shelters(&query)?;
            render::print_shelters(&result.shelters);
            Ok(())
        }
    }
}

fn shelter_query(find: ShelterFind) -> Result<ShelterQuery> {
    match find {
        ShelterFind { name: Some(n), .. } => Ok(ShelterQuery::Name(n)),
        ShelterFind {
            capacity: Some(c), ..
        } => Ok(ShelterQuery::Capacity(c)),
        ShelterFind { phone: Some(p), .. } => Ok(ShelterQuery::Phone(p)),
        ShelterFind {
            address: Some(a), ..
        } => Ok(ShelterQuery::Address(a)),
        _ => Err(ShelterError::Api("Pass one field to search by".into())),
    }
}

fn handle_animal(api: &mut Api, cmd: AnimalCommand) -> Result<()> {
    match cmd {
        AnimalCommand::List => {
            let result = api.list_animals()?;
            render::print_animals(&result.animals);
            Ok(())
        }
        AnimalCommand::Add {
            name,
            age,
            species,
            breed,
            shelter,
        } => {
            let input = NewAnimal {
                name,
                age,
                species,
                breed,
                shelter: shelter.as_deref().map(parse_selector).transpose()?,
            };
            show(api.add_animal(input)?)
        }
        AnimalCommand::Edit {
            animal,
            name,
            age,
            species,
            breed,
            shelter,
        } => {
            let changes = AnimalUpdate {
                name,
                age,
                species,
                breed,
                shelter: shelter.as_deref().map(parse_selector).transpose()?,
            };
            if changes.is_empty() {
                return nothing_to_change();
            }
            show(api.edit_animal(&animal, changes)?)
        }
        AnimalCommand::Delete { animal } => show(api.delete_animal(&animal)?),
        AnimalCommand::Find(find) => {
            let query = animal_query(find)?;
            let result = api.find_animals(&query)?;
            render::print_animals(&result.animals);
            Ok(())
        }
    }
}

fn animal_query(find: AnimalFind) -> Result<AnimalQuery> {
    match find {
        AnimalFind { name: Some(n), .. } => Ok(AnimalQuery::Name(n)),
        AnimalFind {
            species: Some(s), ..
        } => Ok(AnimalQuery::Species(s)),
        AnimalFind { breed: Some(b), .. } => Ok(AnimalQuery::Breed(b)),
        AnimalFind { year: Some(y), .. } => Ok(AnimalQuery::Year(y)),
        AnimalFind {
            shelter: Some(s), ..
        } => Ok(AnimalQuery::Shelter(parse_selector(&s)?)),
        _ => Err(ShelterError::Api("Pass one field to search by".into())),
    }
}

fn handle_request(api: &mut Api, cmd: RequestCommand) -> Result<()> {
    match cmd {
        RequestCommand::List => {
            let result = api.list_requests()?;
            render::print_requests(&result.requests);
            Ok(())
        }
        RequestCommand::Add { name, animal, user } => {
            show(api.add_request(name, animal.as_deref(), user.as_deref())?)
        }
        RequestCommand::Edit {
            request,
            name,
            animal,
            status,
        } => {
            let changes = RequestUpdate {
                name,
                animal: animal.as_deref().map(parse_selector).transpose()?,
                status,
            };
            if changes.is_empty() {
                return nothing_to_change();
            }
            show(api.edit_request(&request, changes)?)
        }
        RequestCommand::Delete { request } => show(api.delete_request(&request)?),
        RequestCommand::Find(find) => {
            let query = match find {
                RequestFind {
                    status: Some(s), ..
                } => RequestQuery::Status(s),
                RequestFind {
                    animal: Some(a), ..
                } => RequestQuery::Animal(parse_selector(&a)?),
                RequestFind { user: Some(u), .. } => RequestQuery::User(parse_selector(&u)?),
                _ => return Err(ShelterError::Api("Pass one field to search by".into())),
            };
            let result = api.find_requests(&query)?;
            render::print_requests(&result.requests);
            Ok(())
        }
    }
}

fn handle_user(api: &mut Api, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::List => {
            let result = api.list_users()?;
            render::print_users(&result.users);
            Ok(())
        }
        UserCommand::Show { user } => {
            let result = api.show_user(user.as_deref())?;
            for u in &result.users {
                render::print_profile(&u.item);
            }
            Ok(())
        }
        UserCommand::Edit {
            user,
            full_name,
            phone,
            address,
            email,
            password,
            role,
        } => {
            let changes = UserUpdate {
                full_name,
                phone_number: phone,
                home_address: address,
                email,
                password,
                role,
            };
            if changes.is_empty() {
                return nothing_to_change();
            }
            show(api.edit_user(user.as_deref(), changes)?)
        }
        UserCommand::Delete { user } => show(api.delete_user(&user)?),
        UserCommand::Find(find) => {
            let query = match find {
                UserFind { name: Some(n), .. } => UserQuery::Name(n),
                UserFind { id: Some(id), .. } => UserQuery::Id(id),
                _ => return Err(ShelterError::Api("Pass one field to search by".into())),
            };
            let result = api.find_users(&query)?;
            render::print_users(&result.users);
            Ok(())
        }
    }
}

fn handle_config(api: &mut Api, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    show(api.config(action)?)
}
