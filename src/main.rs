mod cli;
mod output;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use daily_specials_admin::{
    ApiClient, ClientConfig, ClientError, ConfigOverride, DailySpecialPatch, FileStorage,
    ImageUpload, LoginRequired, NewDailySpecial, SpecialsClient, TokenStore,
};
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::{Args, Commands};
use crate::output::Printer;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let overrides = args
        .base_url
        .map(ConfigOverride::api_base_url)
        .into_iter()
        .chain(args.token_file.map(ConfigOverride::token_file));
    let config = ClientConfig::load(overrides)?;

    let token_file = config
        .token_file_path()
        .context("could not determine where to store the session, pass --token-file")?;
    let token_store = TokenStore::new(FileStorage::open(token_file));

    let session_handler = Arc::new(LoginRequired {
        login_hint: "run `specials-admin login --username <name>`".to_string(),
    });
    let api = ApiClient::new(&config, token_store, session_handler)?;
    let specials = SpecialsClient::new(api.clone());
    let printer = Printer::new(args.json);

    match args.command {
        Commands::Login { username, password } => {
            match api.auth().login(&username, &password).await {
                Ok(_) => printer.message("Signed in successfully")?,
                Err(ClientError::Unauthorized { body }) => {
                    let reason = daily_specials_admin::ValidationErrors::parse(&body)
                        .and_then(|errors| errors.detail().map(str::to_string))
                        .unwrap_or_else(|| "Login failed".to_string());
                    anyhow::bail!(reason);
                }
                Err(e) => return Err(e).context("Login failed"),
            }
        }
        Commands::Logout => {
            api.auth().logout();
            printer.message("Signed out")?;
        }
        Commands::Status => {
            let message = if api.token_store().is_logged_in() {
                "Signed in"
            } else {
                "Not signed in"
            };
            printer.message(message)?;
        }
        Commands::List { page } => {
            let result = specials.list(page).await.context("Failed to load specials")?;
            printer.page(&result, page.max(1))?;
        }
        Commands::Active => {
            let result = specials
                .list_active()
                .await
                .context("Failed to load active specials")?;
            printer.active(&result)?;
        }
        Commands::Dashboard => {
            let stats = specials
                .dashboard()
                .await
                .context("Failed to load dashboard")?;
            printer.dashboard(&stats)?;
        }
        Commands::Create {
            name,
            description,
            price,
            image,
        } => {
            let image = match image {
                Some(path) => Some(ImageUpload::from_path(&path).await?),
                None => None,
            };
            let created = specials
                .create(&NewDailySpecial {
                    name,
                    description,
                    price,
                    image,
                })
                .await
                .context("Failed to create")?;
            printer.special(&created)?;
        }
        Commands::Update {
            id,
            name,
            description,
            price,
            image,
            active,
        } => {
            let image = match image {
                Some(path) => Some(ImageUpload::from_path(&path).await?),
                None => None,
            };
            let patch = DailySpecialPatch {
                name,
                description,
                price,
                image,
                is_active: active,
            };
            let updated = specials
                .update(id, &patch)
                .await
                .context("Failed to update")?;
            printer.special(&updated)?;
        }
        Commands::Toggle { id } => {
            let toggled = specials
                .toggle_active(id)
                .await
                .context("Failed to toggle")?;
            printer.special(&toggled)?;
        }
        Commands::Delete { id } => {
            specials.delete(id).await.context("Failed to delete")?;
            printer.message("Deleted successfully")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    tracing_subscriber::registry()
        .with(log_filter(verbose, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// `-q` and `-v` win over `RUST_LOG`, which falls back to `info`
fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
