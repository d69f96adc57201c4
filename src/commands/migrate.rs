//! Migrate command - manual control over the users and todos schema.

use std::future::Future;

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = super::open_database(&config, false).await?;

    match args.action {
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for line in status_lines(&status) {
                println!("{}", line);
            }
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            tracing::info!(total = status.len(), pending, "Migration status");
            Ok(())
        }
        MigrateAction::Up => apply("up", db.run_migrations()).await,
        MigrateAction::Down => apply("down", db.rollback_migration()).await,
        MigrateAction::Fresh => {
            tracing::warn!("Dropping the users and todos tables");
            apply("fresh", db.fresh_migrations()).await
        }
    }
}

async fn apply(step: &str, run: impl Future<Output = Result<(), DbErr>>) -> AppResult<()> {
    tracing::info!(step, "Migrating");
    run.await?;
    tracing::info!(step, "Migration finished");
    Ok(())
}

/// One aligned `<name>  applied|pending` line per known migration.
fn status_lines(status: &[(String, bool)]) -> Vec<String> {
    let width = status.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    status
        .iter()
        .map(|(name, applied)| {
            let state = if *applied { "applied" } else { "pending" };
            format!("{:<width$}  {}", name, state, width = width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines_are_aligned() {
        let status = vec![
            ("m20240101_create_users".to_string(), true),
            ("m20240102_todos".to_string(), false),
        ];

        let lines = status_lines(&status);

        assert_eq!(lines[0], "m20240101_create_users  applied");
        assert_eq!(lines[1], "m20240102_todos         pending");
    }

    #[test]
    fn test_status_lines_empty() {
        assert!(status_lines(&[]).is_empty());
    }
}
