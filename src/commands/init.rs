use crate::{
    db::db::Db,
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the saved configuration instead
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        if Config::delete()? {
            msg_success!(Message::ConfigDeleted);
        } else {
            msg_info!(Message::ConfigNotFound);
        }
        return Ok(());
    }

    let config = Config::init()?;
    config.save()?;
    msg_success!(Message::ConfigSaved);

    // Opening creates the file and applies the schema.
    Db::open(&config.database)?;
    msg_success!(Message::DatabaseReady(config.database.path.display().to_string()));
    Ok(())
}
