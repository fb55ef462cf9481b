use crate::{
    db::{query::ListOptions, registry::Entity},
    libs::{messages::Message, view::View},
    msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_enum)]
    entity: Entity,

    /// Column to sort by; unknown columns fall back to the default order
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Only rows where a searchable column contains this text
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Bypass cached statements
    #[arg(long)]
    fresh: bool,
}

impl ListArgs {
    pub(crate) fn options(&self) -> ListOptions {
        ListOptions {
            sort_column: self.sort.clone(),
            ascending: !self.desc,
            force_refresh: self.fresh,
        }
    }
}

pub async fn cmd(args: ListArgs) -> Result<()> {
    let (_, db) = super::open()?;
    let options = args.options();

    let records = match args.search.as_deref() {
        Some(text) => db.search(args.entity, text, &options).await?,
        None => db.list(args.entity, &options).await?,
    };

    if records.is_empty() {
        msg_info!(Message::NoRecordsFound(args.entity.to_string()));
        return Ok(());
    }
    View::records(&records)?;
    Ok(())
}
