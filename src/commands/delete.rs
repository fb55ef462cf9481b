use crate::{
    db::registry::Entity,
    libs::messages::Message,
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(value_enum)]
    entity: Entity,
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: DeleteArgs) -> Result<()> {
    let (_, db) = super::open()?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDelete(args.entity.to_string(), args.id).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    match db.delete(args.entity, args.id).await {
        Ok(()) => {
            msg_success!(Message::RecordDeleted(args.entity.to_string(), args.id));
            Ok(())
        }
        Err(error) if error.is_integrity() => {
            msg_bail_anyhow!(Message::RecordInUse(args.entity.to_string(), args.id))
        }
        Err(error) => Err(error.into()),
    }
}
