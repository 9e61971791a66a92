mod commands;
mod input;
mod render;
mod repl;
mod settings;

use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use ask_client::{FileTokenStore, HttpApiClient, TokenStore};
use ask_core::{SessionManager, guard};
use ask_types::routes::Route;

use crate::input::Input;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "ask", version, about = "Terminal client for the Q&A assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and open the chat
    Login {
        #[arg(long)]
        username: Option<String>,
        #[arg(long, env = "ASK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account, sign in and open the chat
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, env = "ASK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change email, username or password
    Profile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
    /// Delete the account and sign out
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List past questions
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },
    /// Interactive chat (default)
    Chat {
        /// Context attached to every question
        #[arg(long)]
        context: Option<String>,
    },
    /// Check that the API is reachable
    Health,
}

impl Command {
    /// The view this command stands for, as seen by the route guard.
    fn route(&self) -> Route {
        match self {
            Self::Login { .. } => Route::Login,
            Self::Register { .. } => Route::Register,
            Self::Logout | Self::Health => Route::Home,
            Self::Whoami
            | Self::Profile { .. }
            | Self::DeleteAccount { .. }
            | Self::History { .. }
            | Self::Chat { .. } => Route::Dashboard,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ask=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    debug!(api_url = %settings.client.api_url, token_path = %settings.client.token_path.display(), "Configured");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&settings.client.token_path));
    let api = Arc::new(HttpApiClient::new(&settings.client, tokens.clone())?);
    let mut session = SessionManager::new(api, tokens.clone());
    let mut input = Input::stdin();

    let command = cli.command.unwrap_or(Command::Chat { context: None });
    let requested = command.route();

    match guard(requested.path(), tokens.is_present()) {
        Some(Route::Login) => bail!("Not logged in. Run `ask login` or `ask register` first."),
        Some(Route::Dashboard) => {
            session.hydrate().await;
            if session.is_authenticated() {
                println!("Already logged in.");
                return open_dashboard(&mut session, &mut input, &settings, None).await;
            }
            // The stored token was stale and hydration removed it.
        }
        _ => session.hydrate().await,
    }

    if requested == Route::Dashboard && !session.is_authenticated() {
        bail!("Session expired. Run `ask login` to sign in again.");
    }

    let route = match command {
        Command::Login { username, password } => {
            commands::login(&mut session, &mut input, username, password).await?
        }
        Command::Register {
            email,
            username,
            password,
        } => commands::register(&mut session, &mut input, email, username, password).await?,
        Command::Chat { context } => {
            return open_dashboard(&mut session, &mut input, &settings, context).await;
        }
        Command::Logout => commands::logout(&mut session),
        Command::Whoami => commands::whoami(&session)?,
        Command::Profile {
            email,
            username,
            password,
        } => commands::profile(&mut session, &mut input, email, username, password).await?,
        Command::DeleteAccount { yes } => commands::delete_account(&mut session, &mut input, yes).await?,
        Command::History { limit, skip } => commands::history(&session, limit, skip).await?,
        Command::Health => commands::health(&session).await?,
    };

    // Signing in navigates to the dashboard; everything else ends here.
    if matches!(requested, Route::Login | Route::Register) && route == Route::Dashboard {
        return open_dashboard(&mut session, &mut input, &settings, None).await;
    }
    debug!(%route, "Done");
    Ok(())
}

async fn open_dashboard(
    session: &mut SessionManager<HttpApiClient>,
    input: &mut Input,
    settings: &Settings,
    context: Option<String>,
) -> anyhow::Result<()> {
    let route = repl::run(session, input, settings.chat.clone(), context).await?;
    if route == Route::Login {
        info!("Logged out from chat");
        println!("Logged out");
    }
    Ok(())
}
