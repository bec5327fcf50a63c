use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// All known demo files. A missing completion marker means the parse was
/// aborted or cancelled; already-committed rounds of such demos stay
/// queryable.
pub async fn list_demos(
    connection: &mut diesel_async::AsyncPgConnection,
) -> Result<Vec<common::BaseDemoInfo>, diesel::result::Error> {
    let query = crate::schema::demo_files::dsl::demo_files
        .select(crate::models::DemoFile::as_select())
        .order(crate::schema::demo_files::dsl::id.asc());
    let results: Vec<crate::models::DemoFile> = query.load(connection).await?;

    Ok(results
        .into_iter()
        .map(|demo| common::BaseDemoInfo {
            id: demo.id,
            map: demo.map,
            demo_source: demo.demo_source,
            parsed: demo.parsed_at.is_some(),
        })
        .collect())
}

/// Rounds of one demo with the per-platform offset correction applied.
/// Stored rounds whose corrected display number would be zero or below are
/// excluded here but remain in storage.
pub async fn list_rounds(
    connection: &mut diesel_async::AsyncPgConnection,
    demo_id: i64,
) -> Result<Vec<common::RoundListEntry>, diesel::result::Error> {
    let demo_query = crate::schema::demo_files::dsl::demo_files
        .select(crate::models::DemoFile::as_select())
        .filter(crate::schema::demo_files::dsl::id.eq(demo_id));
    let mut demos: Vec<crate::models::DemoFile> = demo_query.load(connection).await?;
    let demo = demos.pop().ok_or(diesel::result::Error::NotFound)?;
    let source = demo.demo_source.as_deref();

    let rounds_query = crate::schema::rounds::dsl::rounds
        .select(crate::models::DemoRound::as_select())
        .filter(crate::schema::rounds::dsl::demo_id.eq(demo_id))
        .order((
            crate::schema::rounds::dsl::match_number.asc(),
            crate::schema::rounds::dsl::round_number.asc(),
        ));
    let rounds: Vec<crate::models::DemoRound> = rounds_query.load(connection).await?;

    Ok(rounds
        .into_iter()
        .filter(|round| ingest::offset::is_listed(round.round_number, source))
        .map(|round| common::RoundListEntry {
            match_number: round.match_number,
            display_round_number: ingest::offset::display_round_number(
                round.round_number,
                source,
            ),
            start_tick: round.start_tick,
            end_tick: round.end_tick,
            winner_team: round.winner_team,
            end_reason: round.end_reason,
            bomb_planted: round.bomb_planted,
            bomb_defused: round.bomb_defused,
            bomb_exploded: round.bomb_exploded,
        })
        .collect())
}

/// Translates a user-facing round query back to the storage key.
pub fn storage_round_number(display: i32, demo_source: Option<&str>) -> i32 {
    ingest::offset::stored_round_number(display, demo_source)
}
