use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use ingest::event::{Event, Frame, PlayerMeta, PlayerSlot, Team};
use ingest::ingestor::{OpenRoundRecord, RoundRecord};
use ingest::lifecycle::{ClosedSpan, SpanKind};
use ingest::segmenter::ClosedMatch;

#[derive(Debug)]
pub enum WriteError {
    Diesel(diesel::result::Error),
    UnknownPlayer(PlayerSlot),
}

impl From<diesel::result::Error> for WriteError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

/// Slot to row mapping for one demo file. Players are registered as their
/// join events arrive; references to never-joined slots are absorbed by
/// placeholder rows on the writer's retry pass.
pub struct PlayerTable {
    demo_id: i64,
    known: std::collections::BTreeMap<PlayerSlot, crate::models::DemoPlayer>,
}

impl PlayerTable {
    pub fn new(demo_id: i64) -> Self {
        Self {
            demo_id,
            known: std::collections::BTreeMap::new(),
        }
    }

    pub fn register(&mut self, meta: &PlayerMeta) {
        self.known.insert(
            meta.slot,
            crate::models::DemoPlayer {
                demo_id: self.demo_id,
                slot: meta.slot.0 as i16,
                platform_id: meta.platform_id as i64,
                name: meta.name.clone(),
                team: meta.team.map(|team| team.as_str().to_owned()),
            },
        );
    }

    pub fn register_placeholder(&mut self, slot: PlayerSlot) {
        self.known
            .entry(slot)
            .or_insert_with(|| crate::models::DemoPlayer {
                demo_id: self.demo_id,
                slot: slot.0 as i16,
                platform_id: 0,
                name: String::from("unknown"),
                team: None,
            });
    }

    pub fn resolve(&self, slot: PlayerSlot) -> Result<i16, WriteError> {
        self.known
            .get(&slot)
            .map(|player| player.slot)
            .ok_or(WriteError::UnknownPlayer(slot))
    }

    pub fn resolve_opt(&self, slot: Option<PlayerSlot>) -> Result<Option<i16>, WriteError> {
        match slot {
            Some(slot) => self.resolve(slot).map(Some),
            None => Ok(None),
        }
    }

    pub fn team_of(&self, slot: PlayerSlot) -> Option<Team> {
        self.known
            .get(&slot)
            .and_then(|player| player.team.as_deref())
            .and_then(|team| match team {
                "CT" => Some(Team::Ct),
                "T" => Some(Team::T),
                _ => None,
            })
    }

    pub fn rows(&self) -> Vec<crate::models::DemoPlayer> {
        self.known.values().cloned().collect()
    }

    pub fn slots(&self) -> Vec<i16> {
        self.known.values().map(|player| player.slot).collect()
    }
}

/// Every row belonging to one closed round, built up-front so the commit is
/// a single bounded transaction: the whole round becomes visible or none of
/// it does.
#[derive(Debug, Default)]
pub struct RoundBatch {
    pub round: Option<crate::models::DemoRound>,
    pub players: Vec<crate::models::DemoPlayer>,
    pub kills: Vec<crate::models::NewKill>,
    pub damages: Vec<crate::models::NewDamage>,
    pub weapon_fires: Vec<crate::models::NewWeaponFire>,
    pub bomb_events: Vec<crate::models::NewBombEvent>,
    pub chat_messages: Vec<crate::models::NewChatMessage>,
    pub radio_commands: Vec<crate::models::NewRadioCommand>,
    pub voice_communications: Vec<crate::models::NewVoiceCommunication>,
    pub economy_events: Vec<crate::models::NewEconomyEvent>,
    pub player_positions: Vec<crate::models::NewPlayerPosition>,
    pub grenades: Vec<crate::models::Grenade>,
    pub trajectories: Vec<crate::models::GrenadeTrajectory>,
    pub smoke_clouds: Vec<crate::models::SmokeCloud>,
    pub fire_areas: Vec<crate::models::FireArea>,
    pub flash_events: Vec<crate::models::NewFlashEvent>,
    pub dropped_items: Vec<crate::models::DroppedItem>,
    pub entity_lifecycles: Vec<crate::models::NewEntityLifecycle>,
    pub round_stats: Vec<crate::models::PlayerRoundStats>,
    pub round_impacts: Vec<crate::models::RoundImpact>,
}

impl RoundBatch {
    pub fn build(
        demo_id: i64,
        record: &RoundRecord,
        players: &PlayerTable,
    ) -> Result<Self, WriteError> {
        let round = &record.round;

        let mut batch = Self::from_parts(
            demo_id,
            round.match_number,
            round.number,
            &record.events,
            &record.spans,
            players,
        )?;

        batch.round = Some(crate::models::DemoRound {
            demo_id,
            match_number: round.match_number,
            round_number: round.number,
            start_tick: round.start_tick as i64,
            end_tick: Some(round.end_tick as i64),
            winner_team: round.winner.map(|team| team.as_str().to_owned()),
            end_reason: serde_json::to_string(&round.reason).unwrap(),
            ct_live_players: round.ct_live as i16,
            t_live_players: round.t_live as i16,
            bomb_planted: round.bomb_planted,
            bomb_defused: round.bomb_defused,
            bomb_exploded: round.bomb_exploded,
            bomb_site: round.bomb_site,
            is_warmup: round.is_warmup,
        });

        batch.build_aggregates(demo_id, round.match_number, round.number, &record.events, players)?;

        Ok(batch)
    }

    /// Batch for the trailing round of a truncated stream: end tick stays
    /// NULL and no aggregates are derived from it.
    pub fn build_open(
        demo_id: i64,
        record: &OpenRoundRecord,
        players: &PlayerTable,
    ) -> Result<Self, WriteError> {
        let round = &record.round;

        let mut batch = Self::from_parts(
            demo_id,
            round.match_number,
            round.number,
            &record.events,
            &record.spans,
            players,
        )?;

        batch.round = Some(crate::models::DemoRound {
            demo_id,
            match_number: round.match_number,
            round_number: round.number,
            start_tick: round.start_tick as i64,
            end_tick: None,
            winner_team: None,
            end_reason: serde_json::to_string(&ingest::event::EndReason::StillInProgress).unwrap(),
            ct_live_players: 0,
            t_live_players: 0,
            bomb_planted: round.bomb_planted,
            bomb_defused: round.bomb_defused,
            bomb_exploded: round.bomb_exploded,
            bomb_site: round.bomb_site,
            is_warmup: round.is_warmup,
        });

        Ok(batch)
    }

    fn from_parts(
        demo_id: i64,
        match_number: i32,
        round_number: i32,
        events: &[Frame],
        spans: &[ClosedSpan],
        players: &PlayerTable,
    ) -> Result<Self, WriteError> {
        let mut batch = Self::default();
        batch.players = players.rows();

        for frame in events {
            batch.push_event(demo_id, match_number, round_number, frame, players)?;
        }
        for span in spans {
            batch.push_span(demo_id, match_number, round_number, span, players)?;
        }

        Ok(batch)
    }

    fn push_event(
        &mut self,
        demo_id: i64,
        match_number: i32,
        round_number: i32,
        frame: &Frame,
        players: &PlayerTable,
    ) -> Result<(), WriteError> {
        let tick = frame.tick as i64;

        match &frame.event {
            Event::Kill {
                attacker,
                victim,
                assister,
                weapon,
                headshot,
                penetrated,
                noscope,
                through_smoke,
                attacker_blind,
            } => {
                let team_kill = attacker
                    .and_then(|attacker| players.team_of(attacker))
                    .zip(players.team_of(*victim))
                    .map(|(a, v)| a == v)
                    .unwrap_or(false);

                self.kills.push(crate::models::NewKill {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    attacker_slot: players.resolve_opt(*attacker)?,
                    victim_slot: players.resolve(*victim)?,
                    assister_slot: players.resolve_opt(*assister)?,
                    weapon: weapon.clone(),
                    headshot: *headshot,
                    penetrated: *penetrated as i16,
                    noscope: *noscope,
                    through_smoke: *through_smoke,
                    attacker_blind: *attacker_blind,
                    team_kill,
                });
            }
            Event::Damage {
                attacker,
                victim,
                health_removed,
                armor_removed,
                hitgroup,
                weapon,
            } => {
                self.damages.push(crate::models::NewDamage {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    attacker_slot: players.resolve_opt(*attacker)?,
                    victim_slot: players.resolve(*victim)?,
                    health_removed: *health_removed as i16,
                    armor_removed: *armor_removed as i16,
                    hitgroup: *hitgroup as i16,
                    weapon: weapon.clone(),
                });
            }
            Event::WeaponFire {
                player,
                weapon,
                silenced,
            } => {
                self.weapon_fires.push(crate::models::NewWeaponFire {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve(*player)?,
                    weapon: weapon.clone(),
                    silenced: *silenced,
                });
            }
            Event::Bomb { player, kind, site } => {
                self.bomb_events.push(crate::models::NewBombEvent {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve_opt(*player)?,
                    kind: kind.as_str().to_owned(),
                    site: *site,
                });
            }
            Event::ChatMessage {
                player,
                text,
                team_only,
            } => {
                self.chat_messages.push(crate::models::NewChatMessage {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve(*player)?,
                    message: text.clone(),
                    team_only: *team_only,
                });
            }
            Event::RadioCommand { player, command } => {
                self.radio_commands.push(crate::models::NewRadioCommand {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve(*player)?,
                    command: command.clone(),
                });
            }
            Event::VoiceTransmission {
                player,
                duration_ms,
            } => {
                self.voice_communications
                    .push(crate::models::NewVoiceCommunication {
                        demo_id,
                        match_number,
                        round_number,
                        tick,
                        player_slot: players.resolve(*player)?,
                        duration_ms: *duration_ms as i32,
                    });
            }
            Event::EconomyEvent {
                player,
                kind,
                item,
                amount,
            } => {
                self.economy_events.push(crate::models::NewEconomyEvent {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve(*player)?,
                    kind: kind.as_str().to_owned(),
                    item: item.clone(),
                    amount: *amount,
                });
            }
            Event::PlayerSnapshot {
                player,
                position,
                health,
                armor,
                money,
            } => {
                self.player_positions.push(crate::models::NewPlayerPosition {
                    demo_id,
                    match_number,
                    round_number,
                    tick,
                    player_slot: players.resolve(*player)?,
                    x: position.x,
                    y: position.y,
                    z: position.z,
                    health: *health as i16,
                    armor: *armor as i16,
                    money: *money,
                });
            }
            _ => {}
        };

        Ok(())
    }

    fn push_span(
        &mut self,
        demo_id: i64,
        match_number: i32,
        round_number: i32,
        span: &ClosedSpan,
        players: &PlayerTable,
    ) -> Result<(), WriteError> {
        let owner_slot = players.resolve_opt(span.owner)?;
        let close_reason = span.reason.as_str().to_owned();

        self.entity_lifecycles.push(crate::models::NewEntityLifecycle {
            demo_id,
            match_number,
            round_number,
            entity_id: span.entity.0,
            tick: span.start_tick as i64,
            entity_kind: span.kind.as_str().to_owned(),
            event: String::from("created"),
        });
        self.entity_lifecycles.push(crate::models::NewEntityLifecycle {
            demo_id,
            match_number,
            round_number,
            entity_id: span.entity.0,
            tick: span.end_tick as i64,
            entity_kind: span.kind.as_str().to_owned(),
            event: String::from("destroyed"),
        });

        match span.kind {
            SpanKind::GrenadeFlight(kind) => {
                self.grenades.push(crate::models::Grenade {
                    demo_id,
                    entity_id: span.entity.0,
                    match_number,
                    round_number,
                    owner_slot,
                    grenade_type: kind.as_str().to_owned(),
                    throw_tick: span.start_tick as i64,
                    detonate_tick: Some(span.end_tick as i64),
                    close_reason,
                    throw_x: span.origin.map(|p| p.x),
                    throw_y: span.origin.map(|p| p.y),
                    throw_z: span.origin.map(|p| p.z),
                    detonate_x: span.terminus.map(|p| p.x),
                    detonate_y: span.terminus.map(|p| p.y),
                    detonate_z: span.terminus.map(|p| p.z),
                });

                for (tick, position) in span.samples.iter() {
                    self.trajectories.push(crate::models::GrenadeTrajectory {
                        demo_id,
                        entity_id: span.entity.0,
                        tick: *tick as i64,
                        x: position.x,
                        y: position.y,
                        z: position.z,
                    });
                }
            }
            SpanKind::SmokeCloud => {
                self.smoke_clouds.push(crate::models::SmokeCloud {
                    demo_id,
                    entity_id: span.entity.0,
                    match_number,
                    round_number,
                    owner_slot,
                    start_tick: span.start_tick as i64,
                    end_tick: Some(span.end_tick as i64),
                    close_reason,
                    x: span.origin.map(|p| p.x),
                    y: span.origin.map(|p| p.y),
                    z: span.origin.map(|p| p.z),
                });
            }
            SpanKind::FireArea => {
                self.fire_areas.push(crate::models::FireArea {
                    demo_id,
                    entity_id: span.entity.0,
                    match_number,
                    round_number,
                    owner_slot,
                    start_tick: span.start_tick as i64,
                    end_tick: Some(span.end_tick as i64),
                    close_reason,
                    x: span.origin.map(|p| p.x),
                    y: span.origin.map(|p| p.y),
                    z: span.origin.map(|p| p.z),
                });
            }
            SpanKind::FlashBlind => {
                let flashed = match span.subject {
                    Some(subject) => subject,
                    None => {
                        tracing::warn!("flash span {:?} without a flashed player", span.entity);
                        return Ok(());
                    }
                };

                let team_flash = span
                    .owner
                    .and_then(|owner| players.team_of(owner))
                    .zip(players.team_of(flashed))
                    .map(|(a, b)| a == b)
                    .unwrap_or(false);

                self.flash_events.push(crate::models::NewFlashEvent {
                    demo_id,
                    match_number,
                    round_number,
                    flashed_slot: players.resolve(flashed)?,
                    flasher_slot: owner_slot,
                    start_tick: span.start_tick as i64,
                    end_tick: Some(span.end_tick as i64),
                    close_reason,
                    team_flash,
                });
            }
            SpanKind::DroppedItem => {
                let picked_up = span.picked_up_by.is_some();
                self.dropped_items.push(crate::models::DroppedItem {
                    demo_id,
                    entity_id: span.entity.0,
                    match_number,
                    round_number,
                    owner_slot,
                    item: span.detail.clone().unwrap_or_default(),
                    drop_tick: span.start_tick as i64,
                    pickup_tick: picked_up.then(|| span.end_tick as i64),
                    picked_up_by_slot: players.resolve_opt(span.picked_up_by)?,
                    close_reason,
                });
            }
        };

        Ok(())
    }

    /// Per-round derived rows. Only called for closed rounds; an open round
    /// must never contribute to aggregates.
    fn build_aggregates(
        &mut self,
        demo_id: i64,
        match_number: i32,
        round_number: i32,
        events: &[Frame],
        players: &PlayerTable,
    ) -> Result<(), WriteError> {
        let mut stats: std::collections::BTreeMap<i16, crate::models::PlayerRoundStats> = players
            .slots()
            .into_iter()
            .map(|slot| {
                (
                    slot,
                    crate::models::PlayerRoundStats {
                        demo_id,
                        match_number,
                        round_number,
                        player_slot: slot,
                        kills: 0,
                        deaths: 0,
                        assists: 0,
                        damage: 0,
                        start_money: None,
                        end_money: None,
                        survived: true,
                    },
                )
            })
            .collect();

        let mut opening_kill: Option<i16> = None;

        for frame in events {
            match &frame.event {
                Event::Kill {
                    attacker,
                    victim,
                    assister,
                    ..
                } => {
                    let victim_slot = players.resolve(*victim)?;
                    if let Some(entry) = stats.get_mut(&victim_slot) {
                        entry.deaths += 1;
                        entry.survived = false;
                    }

                    if let Some(attacker_slot) = players.resolve_opt(*attacker)? {
                        if let Some(entry) = stats.get_mut(&attacker_slot) {
                            entry.kills += 1;
                        }
                        if opening_kill.is_none() {
                            opening_kill = Some(attacker_slot);
                        }
                    }

                    if let Some(assister_slot) = players.resolve_opt(*assister)? {
                        if let Some(entry) = stats.get_mut(&assister_slot) {
                            entry.assists += 1;
                        }
                    }
                }
                Event::Damage {
                    attacker,
                    health_removed,
                    ..
                } => {
                    if let Some(attacker_slot) = players.resolve_opt(*attacker)? {
                        if let Some(entry) = stats.get_mut(&attacker_slot) {
                            entry.damage += *health_removed;
                        }
                    }
                }
                Event::PlayerSnapshot { player, money, .. } => {
                    let slot = players.resolve(*player)?;
                    if let Some(entry) = stats.get_mut(&slot) {
                        if entry.start_money.is_none() {
                            entry.start_money = Some(*money);
                        }
                        entry.end_money = Some(*money);
                    }
                }
                _ => {}
            };
        }

        self.round_impacts = stats
            .values()
            .map(|entry| crate::models::RoundImpact {
                demo_id,
                match_number,
                round_number,
                player_slot: entry.player_slot,
                impact: entry.kills as f32
                    + entry.assists as f32 * 0.5
                    + if entry.survived { 0.3 } else { 0.0 },
                opening_kill: opening_kill == Some(entry.player_slot),
            })
            .collect();
        self.round_stats = stats.into_values().collect();

        Ok(())
    }

    pub async fn commit(
        &self,
        connection: &mut diesel_async::AsyncPgConnection,
    ) -> Result<(), WriteError> {
        connection
            .build_transaction()
            .run::<_, WriteError, _>(|conn| {
                Box::pin(async move {
                    let store_players =
                        diesel::dsl::insert_into(crate::schema::players::dsl::players)
                            .values(&self.players)
                            .on_conflict((
                                crate::schema::players::dsl::demo_id,
                                crate::schema::players::dsl::slot,
                            ))
                            .do_update()
                            .set((
                                crate::schema::players::dsl::name.eq(diesel::upsert::excluded(
                                    crate::schema::players::dsl::name,
                                )),
                                crate::schema::players::dsl::team.eq(diesel::upsert::excluded(
                                    crate::schema::players::dsl::team,
                                )),
                                crate::schema::players::dsl::platform_id.eq(
                                    diesel::upsert::excluded(
                                        crate::schema::players::dsl::platform_id,
                                    ),
                                ),
                            ));
                    store_players.execute(conn).await?;

                    if let Some(round) = self.round.as_ref() {
                        diesel::dsl::insert_into(crate::schema::rounds::dsl::rounds)
                            .values(round)
                            .execute(conn)
                            .await?;
                    }

                    diesel::dsl::insert_into(crate::schema::kills::dsl::kills)
                        .values(&self.kills)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::damages::dsl::damages)
                        .values(&self.damages)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::weapon_fires::dsl::weapon_fires)
                        .values(&self.weapon_fires)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::bomb_events::dsl::bomb_events)
                        .values(&self.bomb_events)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::chat_messages::dsl::chat_messages)
                        .values(&self.chat_messages)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::radio_commands::dsl::radio_commands)
                        .values(&self.radio_commands)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(
                        crate::schema::voice_communications::dsl::voice_communications,
                    )
                    .values(&self.voice_communications)
                    .execute(conn)
                    .await?;
                    diesel::dsl::insert_into(crate::schema::economy_events::dsl::economy_events)
                        .values(&self.economy_events)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::player_positions::dsl::player_positions)
                        .values(&self.player_positions)
                        .execute(conn)
                        .await?;

                    diesel::dsl::insert_into(crate::schema::grenades::dsl::grenades)
                        .values(&self.grenades)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(
                        crate::schema::grenade_trajectories::dsl::grenade_trajectories,
                    )
                    .values(&self.trajectories)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                    diesel::dsl::insert_into(crate::schema::smoke_clouds::dsl::smoke_clouds)
                        .values(&self.smoke_clouds)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::fire_areas::dsl::fire_areas)
                        .values(&self.fire_areas)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::flash_events::dsl::flash_events)
                        .values(&self.flash_events)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(crate::schema::dropped_items::dsl::dropped_items)
                        .values(&self.dropped_items)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(
                        crate::schema::entity_lifecycles::dsl::entity_lifecycles,
                    )
                    .values(&self.entity_lifecycles)
                    .execute(conn)
                    .await?;

                    diesel::dsl::insert_into(
                        crate::schema::player_round_stats::dsl::player_round_stats,
                    )
                    .values(&self.round_stats)
                    .execute(conn)
                    .await?;
                    diesel::dsl::insert_into(crate::schema::round_impacts::dsl::round_impacts)
                        .values(&self.round_impacts)
                        .execute(conn)
                        .await?;

                    Ok(())
                })
            })
            .await
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct MatchTotals {
    kills: i32,
    deaths: i32,
    assists: i32,
    damage: i32,
    headshots: i32,
    rounds_played: i32,
}

/// Stateful writer for one demo file. Owns the player table and the
/// per-match aggregate accumulators; only rounds that actually committed
/// feed the match-level aggregates.
pub struct DemoWriter {
    demo_id: i64,
    players: PlayerTable,
    match_totals: std::collections::BTreeMap<(i32, i16), MatchTotals>,
    failed_rounds: usize,
}

impl DemoWriter {
    pub fn new(demo_id: i64) -> Self {
        Self {
            demo_id,
            players: PlayerTable::new(demo_id),
            match_totals: std::collections::BTreeMap::new(),
            failed_rounds: 0,
        }
    }

    pub fn register_player(&mut self, meta: &PlayerMeta) {
        self.players.register(meta);
    }

    pub fn failed_rounds(&self) -> usize {
        self.failed_rounds
    }

    /// Commits one closed round as a single transaction. A batch failing
    /// validation is retried once after re-resolving player lookups; a batch
    /// that still fails aborts only this round and ingestion continues.
    pub async fn commit_round(
        &mut self,
        connection: &mut diesel_async::AsyncPgConnection,
        record: &RoundRecord,
    ) -> Result<(), WriteError> {
        let mut attempt = 0;
        let result = loop {
            let batch = match RoundBatch::build(self.demo_id, record, &self.players) {
                Ok(batch) => batch,
                Err(WriteError::UnknownPlayer(slot)) if attempt == 0 => {
                    tracing::warn!(
                        "round {} references unknown player {:?}, re-resolving",
                        record.round.number,
                        slot
                    );
                    self.register_missing(record);
                    attempt += 1;
                    continue;
                }
                Err(e) => break Err(e),
            };

            match batch.commit(connection).await {
                Ok(()) => {
                    self.accumulate(record, &batch.round_stats);
                    break Ok(());
                }
                Err(e) if attempt == 0 => {
                    tracing::warn!(
                        "committing round {} failed, retrying once: {:?}",
                        record.round.number,
                        e
                    );
                    self.register_missing(record);
                    attempt += 1;
                }
                Err(e) => break Err(e),
            };
        };

        if result.is_err() {
            self.failed_rounds += 1;
        }

        result
    }

    /// Persists the trailing open round of a truncated stream. No winner, no
    /// end tick, no aggregate contribution.
    pub async fn commit_open_round(
        &mut self,
        connection: &mut diesel_async::AsyncPgConnection,
        record: &OpenRoundRecord,
    ) -> Result<(), WriteError> {
        self.register_missing_open(record);
        let batch = RoundBatch::build_open(self.demo_id, record, &self.players)?;

        batch.commit(connection).await
    }

    pub async fn commit_match(
        &mut self,
        connection: &mut diesel_async::AsyncPgConnection,
        closed: &ClosedMatch,
        map: &str,
        game_mode: Option<&str>,
    ) -> Result<(), WriteError> {
        let match_row = crate::models::DemoMatch {
            demo_id: self.demo_id,
            match_number: closed.number,
            map: map.to_owned(),
            game_mode: game_mode.map(|mode| mode.to_owned()),
            ct_score: closed.ct_score,
            t_score: closed.t_score,
            overtime: closed.overtime,
            finished: closed.finished,
        };

        let totals: Vec<((i32, i16), MatchTotals)> = self
            .match_totals
            .range((closed.number, i16::MIN)..=(closed.number, i16::MAX))
            .map(|(key, totals)| (*key, *totals))
            .collect();

        let match_stats: Vec<crate::models::PlayerMatchStats> = totals
            .iter()
            .map(|((_, slot), totals)| crate::models::PlayerMatchStats {
                demo_id: self.demo_id,
                match_number: closed.number,
                player_slot: *slot,
                kills: totals.kills,
                deaths: totals.deaths,
                assists: totals.assists,
                damage: totals.damage,
                headshots: totals.headshots,
                rounds_played: totals.rounds_played,
            })
            .collect();

        let advanced_stats: Vec<crate::models::AdvancedPlayerStats> = totals
            .iter()
            .map(|((_, slot), totals)| {
                let rounds = (totals.rounds_played as f32).max(1.0);

                crate::models::AdvancedPlayerStats {
                    demo_id: self.demo_id,
                    match_number: closed.number,
                    player_slot: *slot,
                    kd_ratio: totals.kills as f32 / (totals.deaths as f32).max(1.0),
                    adr: totals.damage as f32 / rounds,
                    headshot_percentage: if totals.kills > 0 {
                        totals.headshots as f32 / totals.kills as f32
                    } else {
                        0.0
                    },
                    kills_per_round: totals.kills as f32 / rounds,
                    deaths_per_round: totals.deaths as f32 / rounds,
                }
            })
            .collect();

        for (key, _) in totals.iter() {
            self.match_totals.remove(key);
        }

        connection
            .build_transaction()
            .run::<_, WriteError, _>(|conn| {
                Box::pin(async move {
                    diesel::dsl::insert_into(crate::schema::matches::dsl::matches)
                        .values(&match_row)
                        .execute(conn)
                        .await?;
                    diesel::dsl::insert_into(
                        crate::schema::player_match_stats::dsl::player_match_stats,
                    )
                    .values(&match_stats)
                    .execute(conn)
                    .await?;
                    diesel::dsl::insert_into(
                        crate::schema::advanced_player_stats::dsl::advanced_player_stats,
                    )
                    .values(&advanced_stats)
                    .execute(conn)
                    .await?;

                    Ok(())
                })
            })
            .await
    }

    fn accumulate(&mut self, record: &RoundRecord, round_stats: &[crate::models::PlayerRoundStats]) {
        if record.round.is_warmup {
            return;
        }

        for entry in round_stats {
            let totals = self
                .match_totals
                .entry((record.round.match_number, entry.player_slot))
                .or_default();

            totals.kills += entry.kills as i32;
            totals.deaths += entry.deaths as i32;
            totals.assists += entry.assists as i32;
            totals.damage += entry.damage;
            totals.rounds_played += 1;
        }

        for frame in record.events.iter() {
            if let Event::Kill {
                attacker: Some(attacker),
                headshot: true,
                ..
            } = &frame.event
            {
                if let Ok(slot) = self.players.resolve(*attacker) {
                    if let Some(totals) = self
                        .match_totals
                        .get_mut(&(record.round.match_number, slot))
                    {
                        totals.headshots += 1;
                    }
                }
            }
        }
    }

    fn register_missing(&mut self, record: &RoundRecord) {
        for slot in referenced_slots(&record.events, &record.spans) {
            self.players.register_placeholder(slot);
        }
    }

    fn register_missing_open(&mut self, record: &OpenRoundRecord) {
        for slot in referenced_slots(&record.events, &record.spans) {
            self.players.register_placeholder(slot);
        }
    }
}

fn referenced_slots(
    events: &[Frame],
    spans: &[ClosedSpan],
) -> std::collections::BTreeSet<PlayerSlot> {
    let mut slots = std::collections::BTreeSet::new();

    for frame in events {
        match &frame.event {
            Event::Kill {
                attacker,
                victim,
                assister,
                ..
            } => {
                slots.extend(attacker.iter().chain(assister.iter()));
                slots.insert(*victim);
            }
            Event::Damage {
                attacker, victim, ..
            } => {
                slots.extend(attacker.iter());
                slots.insert(*victim);
            }
            Event::WeaponFire { player, .. }
            | Event::ChatMessage { player, .. }
            | Event::RadioCommand { player, .. }
            | Event::VoiceTransmission { player, .. }
            | Event::EconomyEvent { player, .. }
            | Event::PlayerSnapshot { player, .. } => {
                slots.insert(*player);
            }
            Event::Bomb { player, .. } => {
                slots.extend(player.iter());
            }
            _ => {}
        };
    }

    for span in spans {
        slots.extend(span.owner.iter());
        slots.extend(span.subject.iter());
        slots.extend(span.picked_up_by.iter());
    }

    slots
}
