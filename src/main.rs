use {
    anyhow::{Context, Result, bail},
    clap::Parser,
    itertools::Itertools,
    rank_scope::{
        Cli, DatasetHub, HttpReporter, IngestReporter, NoopReporter, SqliteSnapshotStorage,
        config::PERSISTENCE,
        models::{RangeFilter, SortDirection, SortKey},
        query, report,
    },
    std::sync::Arc,
};

#[tokio::main]
async fn main() -> Result<()> {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Warn, log::LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, global_level)
        .filter(Some("rank_scope"), my_code_level)
        .init();

    let args = Cli::parse();

    let db_path = args.db.clone().unwrap_or(PERSISTENCE.db_path.to_string());
    let storage = Arc::new(SqliteSnapshotStorage::new(&db_path).await?);
    let mut hub = DatasetHub::new(storage);

    if args.reset {
        hub.reset().await.context("Failed to wipe snapshot store")?;
        println!("All persisted snapshots wiped. Next run starts fresh.");
        return Ok(());
    }

    hub.restore().await;

    // Ingest, if a file was dropped on us.
    let mut category = args.category;
    if let Some(path) = &args.file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        // Legacy-encoding transcode is the caller's concern; ids and
        // numerics are plain ASCII so a lossy read never corrupts them.
        let text = String::from_utf8_lossy(&bytes);

        let reporter: Box<dyn IngestReporter> = match &args.report_url {
            Some(url) => Box::new(HttpReporter::new(url.clone())),
            None => Box::new(NoopReporter),
        };

        let summary = hub.ingest(&text, reporter.as_ref()).await?;
        category = summary.category;
        println!("{}", report::render_user_status(&summary.user_info));
    }

    let Some(dataset) = hub.dataset(category) else {
        bail!("no {category} snapshot available yet; ingest a CSV file first");
    };

    // Assemble the view: deterministic base order, filter, sort, limit.
    let all_ids: Vec<String> = dataset.data.keys().cloned().sorted().collect();

    let filter = RangeFilter {
        min: args.min,
        max: args.max,
    };
    let visible = query::filter_by_range(dataset, &all_ids, args.metric, filter);

    let key = if args.sort_change {
        SortKey::PercentChange {
            base_index: args.base_index,
        }
    } else {
        SortKey::Metric {
            metric: args.metric,
            date_index: 0,
        }
    };
    let direction = if args.asc {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    let mut ordered = query::rank_sort(dataset, &visible, key, direction);
    if let Some(limit) = args.limit {
        ordered.truncate(limit);
    }

    if args.json {
        println!(
            "{}",
            report::render_json(dataset, &ordered, args.base_index, args.window)?
        );
    } else {
        println!("{}", report::render_summary(dataset, ordered.len()));
        println!("{}", report::render_table(dataset, &ordered, args.base_index));
    }

    Ok(())
}
