//! Admin command - Role management outside the HTTP API.

use std::sync::Arc;

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::AppResult;
use crate::services::{ServiceContainer, Services, TokenIssuer};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = super::open_database(&config, true).await?;
    let issuer = Arc::new(TokenIssuer::from_config(&config));
    let users = Services::from_connection(db.get_connection(), issuer).users();

    let (username, role) = match args.action {
        AdminAction::Promote { username } => (username, UserRole::Admin),
        AdminAction::Demote { username } => (username, UserRole::User),
    };

    let user = users.set_role(&username, role).await?;
    println!("{}: {}", user.username, user.role);

    Ok(())
}
