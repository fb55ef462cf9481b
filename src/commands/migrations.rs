use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Current and latest schema version
    Status,
    /// Applied migrations, oldest first
    History,
}

pub async fn cmd(args: MigrationsArgs) -> Result<()> {
    // Inspect the file as it is; opening through `super::open` would migrate it first.
    let config = Config::read()?;
    let db = Db::open_unmigrated(&config.database)?;

    match args.command {
        MigrationsCommand::Status => {
            let (version, needs_update) = db
                .with_conn(|conn| Ok((get_db_version(conn)?, needs_migration(conn)?)))
                .await?;

            msg_print!(Message::DatabaseVersion(version, MigrationManager::new().latest_version()));
            if needs_update {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let manager = MigrationManager::new();
            let history = db.with_conn(|conn| manager.get_migration_history(conn)).await?;

            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                msg_print!(Message::MigrationHistoryEntry(version, name, applied_at));
            }
        }
    }

    Ok(())
}
