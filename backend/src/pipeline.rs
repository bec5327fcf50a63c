use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use ingest::ingestor::{DemoIngestor, IngestItem};
use ingest::progress::StatusHandle;

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Decode(crate::decoder::DecodeError),
    Database(diesel::result::Error),
}

impl From<std::io::Error> for ParseError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<crate::decoder::DecodeError> for ParseError {
    fn from(value: crate::decoder::DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<diesel::result::Error> for ParseError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

#[derive(Debug, Clone)]
pub struct DemoMeta {
    pub id: i64,
    pub file_name: String,
    pub map: String,
    pub demo_source: Option<String>,
    pub tick_rate: i32,
    pub total_ticks: i64,
}

#[derive(Debug, Default)]
pub struct ParseSummary {
    pub rounds_committed: usize,
    pub rounds_failed: usize,
    pub matches_committed: usize,
    pub open_round: bool,
    pub cancelled: bool,
}

// Fallback round estimate for progress when the decoder could not determine
// the total tick count.
const ESTIMATED_ROUNDS: f32 = 24.0;

/// Parse trigger shared by the CLI and any upload-style background task.
/// Returns plain success/failure; details are logged.
#[tracing::instrument(skip(status))]
pub async fn parse_demo_file(
    path: &std::path::Path,
    demo_source: Option<&str>,
    map_hint: Option<&str>,
    status: &StatusHandle,
) -> bool {
    let started = std::time::Instant::now();

    match parse_demo_file_inner(path, demo_source, map_hint, status).await {
        Ok(summary) => {
            tracing::info!(
                "parsed {:?} in {:?}: {} rounds committed, {} failed, cancelled: {}",
                path,
                started.elapsed(),
                summary.rounds_committed,
                summary.rounds_failed,
                summary.cancelled,
            );
            true
        }
        Err(e) => {
            tracing::error!("parsing {:?} failed after {:?}: {:?}", path, started.elapsed(), e);
            false
        }
    }
}

async fn parse_demo_file_inner(
    path: &std::path::Path,
    demo_source: Option<&str>,
    map_hint: Option<&str>,
    status: &StatusHandle,
) -> Result<ParseSummary, ParseError> {
    let file = std::fs::File::open(path)?;
    let mmap = unsafe { memmap2::MmapOptions::new().map(&file) }?;

    let decoded = crate::decoder::decode(&mmap)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let demo_id = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0);

    let meta = DemoMeta {
        id: demo_id,
        file_name,
        map: map_hint
            .map(|map| map.to_owned())
            .unwrap_or_else(|| decoded.map.clone()),
        demo_source: demo_source.map(|source| source.to_owned()),
        tick_rate: decoded.tick_rate,
        total_ticks: decoded.total_ticks as i64,
    };

    let mut connection = crate::db_connection().await;
    parse_events(&mut connection, meta, decoded.frames, status).await
}

/// Drives the single-pass pipeline over an already-decoded frame stream and
/// commits one batch per closed round. The demo file row is created first
/// without a completion marker; the marker is stamped only when the stream
/// was fully consumed without cancellation, so readers can always tell a
/// finished parse from an aborted one.
pub async fn parse_events<I>(
    connection: &mut diesel_async::AsyncPgConnection,
    meta: DemoMeta,
    frames: I,
    status: &StatusHandle,
) -> Result<ParseSummary, ParseError>
where
    I: IntoIterator<Item = ingest::event::Frame>,
{
    status.begin();
    status.set_progress(0.0);

    let demo_row = crate::models::DemoFile {
        id: meta.id,
        file_name: meta.file_name.clone(),
        map: meta.map.clone(),
        demo_source: meta.demo_source.clone(),
        tick_rate: meta.tick_rate,
        total_ticks: meta.total_ticks,
        duration_secs: if meta.tick_rate > 0 {
            meta.total_ticks as f32 / meta.tick_rate as f32
        } else {
            0.0
        },
        created_at: chrono::Utc::now().naive_utc(),
        parsed_at: None,
    };
    diesel::dsl::insert_into(crate::schema::demo_files::dsl::demo_files)
        .values(&demo_row)
        .execute(connection)
        .await?;

    let mut ingestor = DemoIngestor::new(meta.demo_source.as_deref());
    let mut writer = crate::writer::DemoWriter::new(meta.id);
    let mut summary = ParseSummary::default();

    'frames: for frame in frames {
        for item in ingestor.observe(frame) {
            match item {
                IngestItem::Player(player) => {
                    writer.register_player(&player);
                }
                IngestItem::Round(record) => {
                    let round_number = record.round.number;
                    match writer.commit_round(connection, &record).await {
                        Ok(()) => {
                            summary.rounds_committed += 1;
                        }
                        Err(e) => {
                            // one malformed round must not abort the parse
                            summary.rounds_failed += 1;
                            tracing::error!("round {} batch aborted: {:?}", round_number, e);
                        }
                    };

                    status.set_progress(round_progress(
                        record.round.end_tick,
                        meta.total_ticks,
                        summary.rounds_committed + summary.rounds_failed,
                    ));

                    if status.cancel_requested() {
                        tracing::info!("cancellation requested, stopping after round {}", round_number);
                        summary.cancelled = true;
                        break 'frames;
                    }
                }
                IngestItem::Match(closed) => {
                    match writer
                        .commit_match(connection, &closed, &meta.map, None)
                        .await
                    {
                        Ok(()) => {
                            summary.matches_committed += 1;
                        }
                        Err(e) => {
                            tracing::error!("match {} batch aborted: {:?}", closed.number, e);
                        }
                    };
                }
            };
        }
    }

    if summary.cancelled {
        status.finish();
        return Ok(summary);
    }

    let finish = ingestor.finish();
    if finish.orphan_events > 0 {
        tracing::debug!("{} events arrived outside any round", finish.orphan_events);
    }

    if let Some(open) = finish.open_round.as_ref() {
        summary.open_round = true;
        tracing::info!(
            "stream ended with round {} still open at tick {}",
            open.round.number,
            open.round.start_tick
        );
        if let Err(e) = writer.commit_open_round(connection, open).await {
            tracing::error!("open round batch aborted: {:?}", e);
        }
    }

    if let Some(closed) = finish.closed_match.as_ref() {
        match writer
            .commit_match(connection, closed, &meta.map, None)
            .await
        {
            Ok(()) => {
                summary.matches_committed += 1;
            }
            Err(e) => {
                tracing::error!("match {} batch aborted: {:?}", closed.number, e);
            }
        };
    }

    let stamp = diesel::dsl::update(crate::schema::demo_files::dsl::demo_files)
        .set(
            crate::schema::demo_files::dsl::parsed_at
                .eq(Some(chrono::Utc::now().naive_utc())),
        )
        .filter(crate::schema::demo_files::dsl::id.eq(meta.id));
    stamp.execute(connection).await?;

    status.set_progress(1.0);
    status.finish();

    Ok(summary)
}

fn round_progress(end_tick: u64, total_ticks: i64, rounds_seen: usize) -> f32 {
    if total_ticks > 0 {
        end_tick as f32 / total_ticks as f32
    } else {
        (rounds_seen as f32 / ESTIMATED_ROUNDS).min(0.95)
    }
}
