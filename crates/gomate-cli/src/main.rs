// SPDX-License-Identifier: AGPL-3.0
// GoMate CLI - Terminal frontend
//
// Each invocation restores the persisted session, performs one action
// and exits. Logs go to stderr; results go to stdout.

mod view;

use anyhow::{bail, Context, Result};
use chrono::Timelike;
use clap::{Parser, Subcommand, ValueEnum};
use gomate_core::{
    AppError, AppState, CatalogFilter, ClientConfig, PasswordChangeForm, ProfileForm,
    RegisterForm,
};

#[derive(Parser)]
#[command(name = "gomate")]
#[command(about = "Browse Sri Lankan routes and destinations", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes and destinations
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Search routes and destinations
    Search { query: String },
    /// Show a single item
    Show { id: u64 },
    /// Log in with a demo, local or remote account
    Login { username: String, password: String },
    /// Create an account on this device and log in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Log out and forget favourites
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Edit the logged-in user's profile
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the password of a local account
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Manage favourites
    #[command(subcommand)]
    Fav(FavCommand),
    /// Show or change dark mode
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
}

#[derive(Subcommand)]
enum FavCommand {
    /// Add or remove an item
    Toggle { id: u64 },
    /// List favourite items
    List,
    /// Remove all favourites
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Destinations,
    Routes,
}

impl From<FilterArg> for CatalogFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => CatalogFilter::All,
            FilterArg::Destinations => CatalogFilter::Destinations,
            FilterArg::Routes => CatalogFilter::Routes,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gomate=info".parse()?)
                .add_directive("gomate_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    tracing::debug!(
        "Starting GoMate v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    let mut state = AppState::open(&config)
        .await
        .context("Failed to initialize application state")?;
    state.restore().await;

    run(&mut state, cli.command).await
}

async fn run(state: &mut AppState, command: Commands) -> Result<()> {
    match command {
        Commands::List { filter } => {
            if let Some(user) = state.current_user() {
                println!(
                    "{}, {}",
                    view::greeting(chrono::Local::now().hour()),
                    user.first_name
                );
            }
            state.refresh().await;
            print_items(state, filter.into(), "No items available");
        }
        Commands::Search { query } => {
            state.search(&query).await;
            print_items(state, CatalogFilter::All, "No results found");
        }
        Commands::Show { id } => match state.item(id).await {
            Some(item) => println!("{}", view::item_details(&item, state.is_favourite(id))),
            None => bail!("No item with id {}", id),
        },
        Commands::Login { username, password } => {
            let user = state.login(&username, &password).await.map_err(describe)?;
            println!("Logged in as {}", view::user_summary(&user));
        }
        Commands::Register {
            first_name,
            last_name,
            email,
            username,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                first_name,
                last_name,
                email,
                username,
                password,
                confirm_password,
            };
            let user = state.register(&form).await.map_err(describe)?;
            println!("Registered {}", view::user_summary(&user));
        }
        Commands::Logout => {
            state.logout().await;
            println!("Logged out");
        }
        Commands::Whoami => match state.refresh_user().await {
            Some(user) => println!("{}", view::user_summary(user)),
            None => println!("Not logged in"),
        },
        Commands::Profile {
            first_name,
            last_name,
            email,
        } => {
            let current = state.current_user().ok_or(AppError::NotAuthenticated)?;
            let form = ProfileForm {
                first_name: first_name.unwrap_or_else(|| current.first_name.clone()),
                last_name: last_name.unwrap_or_else(|| current.last_name.clone()),
                email: email.unwrap_or_else(|| current.email.clone()),
            };
            let user = state.update_profile(&form).await.map_err(describe)?;
            println!("Profile updated: {}", view::user_summary(&user));
        }
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let form = PasswordChangeForm {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            state.change_password(&form).await.map_err(describe)?;
            println!("Password changed");
        }
        Commands::Fav(FavCommand::Toggle { id }) => {
            state.refresh().await;
            let title = state
                .catalog()
                .find(id)
                .map(|item| item.title.clone())
                .unwrap_or_else(|| format!("Item {}", id));
            if state.toggle_favourite(id).await {
                println!("{} has been added to your favourites.", title);
            } else {
                println!("{} has been removed from favourites.", title);
            }
        }
        Commands::Fav(FavCommand::List) => {
            state.refresh().await;
            let items = state.favourite_items();
            if items.is_empty() {
                println!("No favourites yet");
            }
            for item in items {
                println!("{}", view::item_row(item, true));
            }
        }
        Commands::Fav(FavCommand::Clear) => {
            state.clear_favourites().await;
            println!("All favourites have been cleared.");
        }
        Commands::Theme { mode } => {
            let is_dark = match mode {
                None => state.is_dark_mode(),
                Some(ThemeArg::Dark) => {
                    state.set_dark_mode(true).await;
                    true
                }
                Some(ThemeArg::Light) => {
                    state.set_dark_mode(false).await;
                    false
                }
                Some(ThemeArg::Toggle) => state.toggle_theme().await,
            };
            println!("Dark mode: {}", if is_dark { "on" } else { "off" });
        }
    }

    Ok(())
}

fn print_items(state: &AppState, filter: CatalogFilter, empty_message: &str) {
    let items = state.catalog().filtered(filter);
    if items.is_empty() {
        println!("{}", empty_message);
        return;
    }
    for item in items {
        println!("{}", view::item_row(item, state.is_favourite(item.id)));
    }
}

/// Spell out each failing field instead of the one-line summary
fn describe(err: AppError) -> anyhow::Error {
    match err {
        AppError::Validation(errors) => {
            let lines: Vec<String> = errors
                .iter()
                .map(|e| format!("  {}: {}", e.field, e.message))
                .collect();
            anyhow::anyhow!("Please fix the following:\n{}", lines.join("\n"))
        }
        other => other.into(),
    }
}
