#[warn(clippy::pedantic)]
mod client;
mod database;
mod error;
mod normalize;

use crate::client::EgenClient;
use crate::database::models::{
    AnnouncementRecord, EmergencyRecord, EquipmentRecord, IcuRecord,
};
use crate::database::queries::{replace_announcements, upsert_snapshot};
use crate::error::{DistrictError, PollerError};
use crate::normalize::{
    announcement_record, emergency_record, equipment_record, has_more_pages, icu_record,
    parse_page,
};
use chrono::Utc;
use shared::egen::DISTRICTS;
use shared::egen::response::{AnnouncementItem, RealtimeItem};
use shared::error::InitializationError;
use shared::{PostgresConfig, kst_timestamp, load_config};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, PollerError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    let config = load_config().map_err(InitializationError::from)?;
    let db_pool = initialize_db(&config.postgres).await?;
    let client = EgenClient::new(config.api)?;

    let report = run(&client, &db_pool).await;
    info!(
        realtime_ok = report.realtime_ok,
        realtime_failed = report.realtime_failures,
        announcement_failed = report.announcement_failures,
        announcements_collected = report.announcements_collected,
        replace_failed = report.replace_failed,
        "run complete"
    );

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn initialize_db(pg_config: &PostgresConfig) -> Result<Pool<Postgres>, InitializationError> {
    let options = PgConnectOptions::new()
        .host(&pg_config.host)
        .port(pg_config.port)
        .username(&pg_config.user)
        .password(&pg_config.password)
        .database(&pg_config.database);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run any new migrations
    sqlx::migrate!("../migrations").run(&pool).await?;

    Ok(pool)
}

/// Per-run accounting. Any failed district or a failed announcement replace
/// marks the run partial, surfaced through the process exit code.
#[derive(Debug, Default)]
struct RunReport {
    realtime_ok: usize,
    realtime_failures: usize,
    announcement_failures: usize,
    announcements_collected: usize,
    replace_failed: bool,
}

impl RunReport {
    fn is_clean(&self) -> bool {
        self.realtime_failures == 0 && self.announcement_failures == 0 && !self.replace_failed
    }
}

/// Realtime snapshots for every district first, then the announcement
/// replace over everything collected. A district failure in either flow is
/// logged and counted, never propagated past the loop.
async fn run(client: &EgenClient, pool: &Pool<Postgres>) -> RunReport {
    let mut report = RunReport::default();

    for district in DISTRICTS {
        match process_district_realtime(client, pool, district).await {
            Ok(()) => report.realtime_ok += 1,
            Err(e) => {
                error!(district, error = ?e, "realtime processing failed for district");
                report.realtime_failures += 1;
            }
        }
    }

    let mut announcements: Vec<AnnouncementRecord> = Vec::new();
    for district in DISTRICTS {
        match collect_district_announcements(client, district).await {
            Ok(records) => {
                if records.is_empty() {
                    info!(district, "no announcements for district");
                } else {
                    announcements.extend(records);
                }
            }
            Err(e) => {
                error!(district, error = ?e, "announcement collection failed for district");
                report.announcement_failures += 1;
            }
        }
    }

    report.announcements_collected = announcements.len();
    if announcements.is_empty() {
        info!("no announcements collected, leaving er_announcement untouched");
    } else {
        match replace_announcements(pool, &announcements, kst_timestamp(Utc::now())).await {
            Ok(summary) => info!(
                deleted = summary.deleted,
                inserted = summary.inserted,
                skipped = summary.skipped,
                "replaced announcement snapshot"
            ),
            Err(e) => {
                error!(error = ?e, "announcement replace failed");
                report.replace_failed = true;
            }
        }
    }

    report
}

/// One district's realtime cycle: fetch every page, project the payload into
/// the three table views, and run three upsert batches stamped from the same
/// instant.
async fn process_district_realtime(
    client: &EgenClient,
    pool: &Pool<Postgres>,
    district: &str,
) -> Result<(), DistrictError> {
    let items = fetch_realtime_items(client, district).await?;
    info!(district, items = items.len(), "fetched realtime items");

    let equipment: Vec<EquipmentRecord> = items.iter().filter_map(equipment_record).collect();
    let icu: Vec<IcuRecord> = items.iter().filter_map(icu_record).collect();
    let emergency: Vec<EmergencyRecord> = items.iter().filter_map(emergency_record).collect();

    let stamped_at = kst_timestamp(Utc::now());
    let equipment_summary = upsert_snapshot(pool, &equipment, stamped_at).await?;
    let icu_summary = upsert_snapshot(pool, &icu, stamped_at).await?;
    let emergency_summary = upsert_snapshot(pool, &emergency, stamped_at).await?;
    info!(
        district,
        equipment_inserted = equipment_summary.inserted,
        equipment_updated = equipment_summary.updated,
        icu_inserted = icu_summary.inserted,
        icu_updated = icu_summary.updated,
        emergency_inserted = emergency_summary.inserted,
        emergency_updated = emergency_summary.updated,
        "stored district snapshot"
    );
    Ok(())
}

async fn fetch_realtime_items(
    client: &EgenClient,
    district: &str,
) -> Result<Vec<RealtimeItem>, DistrictError> {
    let mut items = Vec::new();
    let mut page_no = 1;
    loop {
        let xml = client.fetch_realtime(district, page_no).await?;
        let page = parse_page::<RealtimeItem>(&xml)?;
        let fetched = page.items.len();
        items.extend(page.items);
        if !has_more_pages(fetched, items.len(), page.total_count) {
            break;
        }
        page_no += 1;
    }
    Ok(items)
}

async fn collect_district_announcements(
    client: &EgenClient,
    district: &str,
) -> Result<Vec<AnnouncementRecord>, DistrictError> {
    let mut records = Vec::new();
    let mut seen = 0;
    let mut page_no = 1;
    loop {
        let xml = client.fetch_announcements(district, page_no).await?;
        let page = parse_page::<AnnouncementItem>(&xml)?;
        let fetched = page.items.len();
        seen += fetched;
        for item in &page.items {
            if let Some(record) = announcement_record(item)? {
                records.push(record);
            }
        }
        if !has_more_pages(fetched, seen, page.total_count) {
            break;
        }
        page_no += 1;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::RunReport;

    #[test]
    fn clean_run_has_no_failures() {
        let report = RunReport {
            realtime_ok: 25,
            announcements_collected: 3,
            ..RunReport::default()
        };
        assert!(report.is_clean());
    }

    #[test]
    fn any_failure_marks_the_run_partial() {
        let failed_district = RunReport {
            realtime_ok: 24,
            realtime_failures: 1,
            ..RunReport::default()
        };
        assert!(!failed_district.is_clean());

        let failed_announcement = RunReport {
            announcement_failures: 2,
            ..RunReport::default()
        };
        assert!(!failed_announcement.is_clean());

        let failed_replace = RunReport {
            replace_failed: true,
            ..RunReport::default()
        };
        assert!(!failed_replace.is_clean());
    }
}
