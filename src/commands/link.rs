use crate::{
    db::{associations::CastAssignment, record::RecordSet},
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct LinkArgs {
    #[command(subcommand)]
    command: LinkCommand,
}

/// Without members and without `--clear`, each subcommand shows the
/// current set instead of replacing it.
#[derive(Debug, Subcommand)]
enum LinkCommand {
    /// Replace the cast of a production
    Cast {
        production_id: i64,
        /// `ACTOR_ID:ROLE_ID`, repeatable
        #[arg(short, long = "assign", value_parser = parse_assignment)]
        assignments: Vec<CastAssignment>,
        #[arg(long)]
        clear: bool,
    },
    /// Replace the actors attending a rehearsal
    Rehearsal {
        rehearsal_id: i64,
        #[arg(short, long = "actor")]
        actors: Vec<i64>,
        #[arg(long)]
        clear: bool,
    },
    /// Replace the authors of a play
    PlayAuthors {
        play_id: i64,
        #[arg(short, long = "author")]
        authors: Vec<i64>,
        #[arg(long)]
        clear: bool,
    },
    /// Replace the plays of an author
    AuthorPlays {
        author_id: i64,
        #[arg(short, long = "play")]
        plays: Vec<i64>,
        #[arg(long)]
        clear: bool,
    },
}

pub async fn cmd(args: LinkArgs) -> Result<()> {
    let (_, db) = super::open()?;

    match args.command {
        LinkCommand::Cast {
            production_id,
            assignments,
            clear,
        } => {
            if assignments.is_empty() && !clear {
                return show(db.cast_for_production(production_id).await?);
            }
            let count = db.set_production_cast(production_id, &assignments).await?;
            replaced(count);
        }
        LinkCommand::Rehearsal {
            rehearsal_id,
            actors,
            clear,
        } => {
            if actors.is_empty() && !clear {
                return show(db.actors_for_rehearsal(rehearsal_id).await?);
            }
            replaced(db.set_rehearsal_actors(rehearsal_id, &actors).await?);
        }
        LinkCommand::PlayAuthors { play_id, authors, clear } => {
            if authors.is_empty() && !clear {
                return show(db.authors_for_play(play_id).await?);
            }
            replaced(db.set_play_authors(play_id, &authors).await?);
        }
        LinkCommand::AuthorPlays { author_id, plays, clear } => {
            if plays.is_empty() && !clear {
                return show(db.plays_for_author(author_id).await?);
            }
            replaced(db.set_author_plays(author_id, &plays).await?);
        }
    }

    Ok(())
}

fn parse_assignment(value: &str) -> Result<CastAssignment, String> {
    let (actor, role) = value
        .split_once(':')
        .ok_or_else(|| Message::InvalidCastAssignment(value.to_string()).to_string())?;
    let actor_id = actor.trim().parse().map_err(|_| Message::InvalidCastAssignment(value.to_string()).to_string())?;
    let role_id = role.trim().parse().map_err(|_| Message::InvalidCastAssignment(value.to_string()).to_string())?;
    Ok(CastAssignment::new(actor_id, role_id))
}

fn show(records: RecordSet) -> Result<()> {
    if records.is_empty() {
        msg_print!(Message::NothingLinked);
        return Ok(());
    }
    View::records(&records)
}

fn replaced(count: usize) {
    if count == 0 {
        msg_info!(Message::LinksCleared);
    } else {
        msg_success!(Message::LinksReplaced(count));
    }
}
