use std::{fs, io::Read};

use clap::Parser;
use cli::{Args, Commands};
use edit::{add_repo, edit_repos, remove_repos};
use error::{ErrorContext, RepojumpResult};
use list::list_repos;
use logging::setup_logging;
use open::{open_repo, OpenRequest};
use repojump_config::{
    config::{self, generate_default_config, get_config, set_config_path, Config},
    error::ConfigError,
};
use repojump_navigation::Modifiers;
use repojump_store::{storage::JsonFileStorage, RepositoryStore};
use repojump_utils::path::resolve_path;
use tracing::{debug, info};
use transfer::{export_settings, import_settings};
use utils::disable_color;

mod cli;
mod edit;
mod error;
mod list;
mod logging;
mod open;
mod transfer;
mod utils;

fn read_rows(file: Option<&str>) -> RepojumpResult<String> {
    match file {
        Some(file) if file != "-" => {
            let path = resolve_path(file)?;
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "reading rows from stdin".to_string())?;
            Ok(buffer)
        }
    }
}

fn show_or_update_config(mut config: Config, storage_path: Option<String>) -> RepojumpResult<()> {
    match storage_path {
        Some(path) => {
            config.storage_path = Some(path);
            config.save()?;
        }
        None => {
            let content = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
            info!("{content}");
        }
    }
    Ok(())
}

fn handle_cli() -> RepojumpResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        disable_color();
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    if let Commands::DefConfig = args.command {
        generate_default_config()?;
        return Ok(());
    }

    config::init()?;
    let config = get_config();
    if !config.display().color() {
        disable_color();
    }

    if let Commands::Config {
        storage_path,
    } = args.command
    {
        return show_or_update_config(config, storage_path);
    }

    let storage_path = config.get_storage_path()?;
    debug!(path = %storage_path.display(), "using settings storage");
    let mut store = RepositoryStore::new(JsonFileStorage::new(storage_path));

    match args.command {
        Commands::List {
            query,
        } => list_repos(&mut store, &query)?,
        Commands::Add {
            url,
            tag,
        } => add_repo(&mut store, &url, tag.as_deref())?,
        Commands::Remove {
            repos,
        } => remove_repos(&mut store, &repos)?,
        Commands::Edit {
            file,
        } => {
            let content = read_rows(file.as_deref())?;
            edit_repos(&mut store, &content)?;
        }
        Commands::Export {
            output,
        } => export_settings(&mut store, output.as_deref())?,
        Commands::Import {
            file,
        } => import_settings(&mut store, &file)?,
        Commands::Open {
            query,
            mode,
            down,
            up,
            replace,
            background,
        } => {
            let mut query = query.join(" ");
            if let Some(mode) = mode {
                query = format!("{} {query}", mode.hotkey());
            }
            let request = OpenRequest {
                query,
                down,
                up,
                modifiers: Modifiers {
                    replace_current: replace,
                    background,
                },
            };
            open_repo(&mut store, &request, args.json)?;
        }
        Commands::Config {
            ..
        }
        | Commands::DefConfig => unreachable!(),
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
