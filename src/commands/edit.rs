use crate::{
    db::registry::Entity,
    libs::{form::FormModel, messages::Message},
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(value_enum)]
    entity: Entity,
    id: i64,
}

pub async fn cmd(args: EditArgs) -> Result<()> {
    let (_, db) = super::open()?;

    let Some(record) = db.get_record(args.entity, args.id).await? else {
        msg_bail_anyhow!(Message::RecordNotFound(args.entity.to_string(), args.id));
    };
    let initial = FormModel::for_entity(args.entity).values_from(&record);

    let input = super::add::prompt_input(&db, args.entity, &initial).await?;
    input.update(&db, args.id).await?;
    msg_success!(Message::RecordUpdated(args.entity.to_string(), args.id));
    Ok(())
}
