//! One handler per subcommand. Each returns the route the user ends up on.

use anyhow::{Result, bail};

use ask_client::{ApiClient, HttpApiClient};
use ask_core::SessionManager;
use ask_core::form::{LoginForm, RegisterForm};
use ask_types::api::UserUpdate;
use ask_types::routes::Route;

use crate::input::Input;
use crate::render;

type Session = SessionManager<HttpApiClient>;

pub async fn login(
    session: &mut Session,
    input: &mut Input,
    username: Option<String>,
    password: Option<String>,
) -> Result<Route> {
    let form = LoginForm {
        username: input.value_or_prompt(username, "Username or email").await?,
        password: input.value_or_prompt(password, "Password").await?,
    };
    let route = session.login(&form.validate()?).await?;
    if let Some(user) = session.user() {
        println!("Logged in as {}", user.username);
    }
    Ok(route)
}

pub async fn register(
    session: &mut Session,
    input: &mut Input,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<Route> {
    let email = input.value_or_prompt(email, "Email").await?;
    let username = input.value_or_prompt(username, "Username").await?;
    let (password, confirm_password) = match password {
        Some(password) => (password.clone(), password),
        None => (
            input.prompt("Password").await?,
            input.prompt("Confirm password").await?,
        ),
    };

    let form = RegisterForm {
        email,
        username,
        password,
        confirm_password,
    };
    let route = session.register(&form.validate()?).await?;
    if let Some(user) = session.user() {
        println!("Account created. Logged in as {}", user.username);
    }
    Ok(route)
}

pub fn logout(session: &mut Session) -> Route {
    let route = session.logout();
    println!("Logged out");
    route
}

pub fn whoami(session: &Session) -> Result<Route> {
    match session.user() {
        Some(user) => render::user(user),
        None => bail!("Not logged in"),
    }
    Ok(Route::Dashboard)
}

pub async fn profile(
    session: &mut Session,
    input: &mut Input,
    email: Option<String>,
    username: Option<String>,
    change_password: bool,
) -> Result<Route> {
    let password = if change_password {
        let password = input.prompt("New password").await?;
        if password != input.prompt("Confirm new password").await? {
            bail!("Passwords do not match");
        }
        Some(password)
    } else {
        None
    };

    let update = UserUpdate {
        email,
        username,
        password,
    };
    let user = session.update_profile(&update).await?;
    println!("Profile updated");
    render::user(user);
    Ok(Route::Dashboard)
}

pub async fn delete_account(session: &mut Session, input: &mut Input, yes: bool) -> Result<Route> {
    if !yes {
        let answer = input.prompt("Delete your account and all history? Type 'yes'").await?;
        if answer.trim() != "yes" {
            println!("Aborted");
            return Ok(Route::Dashboard);
        }
    }
    let route = session.delete_account().await?;
    println!("Account deleted");
    Ok(route)
}

pub async fn history(session: &Session, limit: u32, skip: u32) -> Result<Route> {
    let page = session.api().history(limit, skip).await?;
    render::history(&page.items);
    if page.count > u64::from(skip) + page.items.len() as u64 {
        println!("({} of {} shown)", page.items.len(), page.count);
    }
    Ok(Route::Dashboard)
}

pub async fn health(session: &Session) -> Result<Route> {
    let api = session.api();
    let status = api.health().await?;
    println!("{} at {}: {}", status.service, api.base_url(), status.status);
    Ok(Route::Home)
}
