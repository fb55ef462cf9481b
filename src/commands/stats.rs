use crate::{
    db::{
        error::DbError,
        stats::{DashboardFilters, Period, UniqueColumn},
    },
    libs::{messages::Message, state::AppState, view::View, worker::DbWorker},
    msg_bail_anyhow, msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(short, long, value_enum, default_value_t)]
    period: Period,

    /// Only rehearsals of productions by this director
    #[arg(short, long)]
    director: Option<String>,

    /// Only rehearsals in this theatre
    #[arg(short, long)]
    theatre: Option<String>,

    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// List the director and theatre names accepted as filters
    #[arg(long)]
    filters: bool,
}

pub async fn cmd(args: StatsArgs) -> Result<()> {
    let (_, db) = super::open()?;
    let worker = DbWorker::spawn(db);

    if args.filters {
        let lookup = worker.submit(|db| async move {
            let directors = db.unique_values(UniqueColumn::DirectorNames).await?;
            let theatres = db.unique_values(UniqueColumn::Theatres).await?;
            Ok::<_, DbError>((directors, theatres))
        });
        let (directors, theatres) = lookup.wait().await??;
        msg_print!(Message::FilterValues("director".to_string(), directors.join(", ")));
        msg_print!(Message::FilterValues("theatre".to_string(), theatres.join(", ")));
        worker.shutdown().await?;
        return Ok(());
    }

    let state = Arc::new(AppState::new(DashboardFilters {
        period: args.period,
        director: args.director,
        theatre: args.theatre,
    }));
    let Some(mut pending) = state.refresh(&worker) else {
        msg_bail_anyhow!(Message::RefreshInProgress);
    };

    let deadline = Instant::now() + Duration::from_secs(args.timeout);
    loop {
        if let Some(result) = pending.wait_timeout(POLL_INTERVAL).await? {
            result?;
            break;
        }
        if Instant::now() >= deadline {
            msg_warning!(Message::StatsTimedOut(args.timeout));
            return Ok(());
        }
        msg_info!(Message::StatsLoading);
    }

    match state.metrics() {
        Some(metrics) => View::dashboard(&metrics)?,
        None => msg_info!(Message::NoRecordsFound("rehearsals".to_string())),
    }
    worker.shutdown().await?;
    Ok(())
}
