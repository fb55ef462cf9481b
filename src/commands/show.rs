use crate::{
    db::{db::Db, record::RecordSet, registry::Entity},
    libs::{messages::Message, view::View},
    msg_bail_anyhow, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(value_enum)]
    entity: Entity,
    id: i64,
}

pub async fn cmd(args: ShowArgs) -> Result<()> {
    let (_, db) = super::open()?;

    let Some(record) = db.get_record(args.entity, args.id).await? else {
        msg_bail_anyhow!(Message::RecordNotFound(args.entity.to_string(), args.id));
    };
    View::record(&record)?;

    for (title, related) in related(&db, args.entity, args.id).await? {
        msg_print!(Message::RelatedHeader(title.to_string()), true);
        if related.is_empty() {
            msg_print!(Message::NothingLinked);
        } else {
            View::records(&related)?;
        }
    }
    Ok(())
}

/// Linked records shown under a record, by entity.
async fn related(db: &Db, entity: Entity, id: i64) -> Result<Vec<(&'static str, RecordSet)>> {
    let sections = match entity {
        Entity::Actors => vec![
            ("roles", db.actor_roles(id).await?),
            ("productions", db.actor_productions(id).await?),
            ("rehearsals", db.actor_rehearsals(id).await?),
        ],
        Entity::Authors => vec![("plays", db.plays_for_author(id).await?)],
        Entity::Plays => vec![
            ("authors", db.authors_for_play(id).await?),
            ("roles", db.roles_for_play(id).await?),
        ],
        Entity::Productions => vec![
            ("cast", db.cast_for_production(id).await?),
            ("actors", db.actors_for_production(id).await?),
        ],
        Entity::Rehearsals => vec![("actors", db.actors_for_rehearsal(id).await?)],
        _ => Vec::new(),
    };
    Ok(sections)
}
