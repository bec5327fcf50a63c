use backend::writer::{PlayerTable, RoundBatch, WriteError};
use ingest::event::{
    EndReason, EntityId, Event, Frame, GrenadeKind, PlayerMeta, PlayerSlot, Team, Vec3,
};
use ingest::ingestor::{OpenRoundRecord, RoundRecord};
use ingest::lifecycle::{CloseReason, ClosedSpan, SpanKind};
use ingest::segmenter::{ClosedRound, OpenRoundInfo};
use pretty_assertions::assert_eq;

const DEMO_ID: i64 = 1722870000;

fn players() -> PlayerTable {
    let mut table = PlayerTable::new(DEMO_ID);
    for slot in 0..4 {
        table.register(&PlayerMeta {
            slot: PlayerSlot(slot),
            platform_id: 76561198000000000 + slot as u64,
            name: format!("player-{}", slot),
            team: Some(if slot < 2 { Team::Ct } else { Team::T }),
        });
    }

    table
}

fn closed_round() -> ClosedRound {
    ClosedRound {
        match_number: 1,
        number: 3,
        start_tick: 1_000,
        end_tick: 2_000,
        winner: Some(Team::Ct),
        reason: EndReason::TKilled,
        ct_live: 2,
        t_live: 0,
        bomb_planted: false,
        bomb_defused: false,
        bomb_exploded: false,
        bomb_site: None,
        is_warmup: false,
    }
}

fn kill_frame(tick: u64, attacker: i32, victim: i32, headshot: bool) -> Frame {
    Frame {
        tick,
        event: Event::Kill {
            attacker: Some(PlayerSlot(attacker)),
            victim: PlayerSlot(victim),
            assister: None,
            weapon: "ak47".to_owned(),
            headshot,
            penetrated: 0,
            noscope: false,
            through_smoke: false,
            attacker_blind: false,
        },
    }
}

#[test]
fn batch_maps_kills_with_resolved_slots() {
    let record = RoundRecord {
        round: closed_round(),
        spans: Vec::new(),
        events: vec![kill_frame(1_500, 0, 2, true)],
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();

    let round = batch.round.as_ref().expect("round row present");
    assert_eq!(Some(2_000), round.end_tick);
    assert_eq!(Some("CT".to_owned()), round.winner_team);
    assert_eq!("\"TKilled\"", round.end_reason);

    assert_eq!(1, batch.kills.len());
    assert_eq!(Some(0), batch.kills[0].attacker_slot);
    assert_eq!(2, batch.kills[0].victim_slot);
    assert!(!batch.kills[0].team_kill);
    assert_eq!(4, batch.players.len());
}

#[test]
fn team_kill_flagged_from_player_table() {
    let record = RoundRecord {
        round: closed_round(),
        spans: Vec::new(),
        events: vec![kill_frame(1_500, 0, 1, false)],
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();
    assert!(batch.kills[0].team_kill);
}

#[test]
fn unknown_player_aborts_only_this_batch() {
    let record = RoundRecord {
        round: closed_round(),
        spans: Vec::new(),
        events: vec![kill_frame(1_500, 0, 9, false)],
    };

    let result = RoundBatch::build(DEMO_ID, &record, &players());
    assert!(matches!(
        result,
        Err(WriteError::UnknownPlayer(PlayerSlot(9)))
    ));

    // the same writer state still builds clean rounds
    let clean = RoundRecord {
        round: closed_round(),
        spans: Vec::new(),
        events: vec![kill_frame(1_500, 0, 2, false)],
    };
    assert!(RoundBatch::build(DEMO_ID, &clean, &players()).is_ok());
}

#[test]
fn round_stats_cover_every_player() {
    let record = RoundRecord {
        round: closed_round(),
        spans: Vec::new(),
        events: vec![
            Frame {
                tick: 1_100,
                event: Event::PlayerSnapshot {
                    player: PlayerSlot(0),
                    position: Vec3 {
                        x: 0.0,
                        y: 0.0,
                        z: 0.0,
                    },
                    health: 100,
                    armor: 100,
                    money: 4_000,
                },
            },
            kill_frame(1_500, 0, 2, true),
            Frame {
                tick: 1_600,
                event: Event::Damage {
                    attacker: Some(PlayerSlot(0)),
                    victim: PlayerSlot(3),
                    health_removed: 27,
                    armor_removed: 4,
                    hitgroup: 1,
                    weapon: "ak47".to_owned(),
                },
            },
            Frame {
                tick: 1_900,
                event: Event::PlayerSnapshot {
                    player: PlayerSlot(0),
                    position: Vec3 {
                        x: 5.0,
                        y: 5.0,
                        z: 0.0,
                    },
                    health: 80,
                    armor: 90,
                    money: 1_250,
                },
            },
        ],
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();
    assert_eq!(4, batch.round_stats.len());

    let shooter = batch
        .round_stats
        .iter()
        .find(|entry| entry.player_slot == 0)
        .unwrap();
    assert_eq!(1, shooter.kills);
    assert_eq!(27, shooter.damage);
    assert_eq!(Some(4_000), shooter.start_money);
    assert_eq!(Some(1_250), shooter.end_money);
    assert!(shooter.survived);

    let victim = batch
        .round_stats
        .iter()
        .find(|entry| entry.player_slot == 2)
        .unwrap();
    assert_eq!(1, victim.deaths);
    assert!(!victim.survived);

    let opener = batch
        .round_impacts
        .iter()
        .find(|entry| entry.player_slot == 0)
        .unwrap();
    assert!(opener.opening_kill);
}

#[test]
fn open_round_has_no_aggregates_and_no_end_tick() {
    let record = OpenRoundRecord {
        round: OpenRoundInfo {
            match_number: 1,
            number: 5,
            start_tick: 9_000,
            bomb_planted: false,
            bomb_defused: false,
            bomb_exploded: false,
            bomb_site: None,
            is_warmup: false,
        },
        spans: Vec::new(),
        events: vec![kill_frame(9_100, 0, 2, false)],
    };

    let batch = RoundBatch::build_open(DEMO_ID, &record, &players()).unwrap();

    let round = batch.round.as_ref().unwrap();
    assert_eq!(None, round.end_tick);
    assert_eq!(None, round.winner_team);
    assert!(batch.round_stats.is_empty());
    assert!(batch.round_impacts.is_empty());
    // the events themselves are still persisted
    assert_eq!(1, batch.kills.len());
}

#[test]
fn grenade_span_maps_to_row_and_trajectory() {
    let mut samples = std::collections::BTreeMap::new();
    samples.insert(1_210_u64, Vec3 {
        x: 1.0,
        y: 2.0,
        z: 3.0,
    });
    samples.insert(1_220_u64, Vec3 {
        x: 2.0,
        y: 3.0,
        z: 4.0,
    });

    let record = RoundRecord {
        round: closed_round(),
        spans: vec![ClosedSpan {
            entity: EntityId(42),
            kind: SpanKind::GrenadeFlight(GrenadeKind::Smoke),
            owner: Some(PlayerSlot(1)),
            subject: None,
            start_tick: 1_200,
            end_tick: 1_300,
            reason: CloseReason::Terminal,
            origin: Some(Vec3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            }),
            terminus: Some(Vec3 {
                x: 3.0,
                y: 4.0,
                z: 5.0,
            }),
            detail: None,
            picked_up_by: None,
            samples,
        }],
        events: Vec::new(),
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();

    assert_eq!(1, batch.grenades.len());
    assert_eq!("smokegrenade", batch.grenades[0].grenade_type);
    assert_eq!(Some(1), batch.grenades[0].owner_slot);
    assert_eq!(Some(1_300), batch.grenades[0].detonate_tick);
    assert_eq!("Terminal", batch.grenades[0].close_reason);

    assert_eq!(2, batch.trajectories.len());
    assert_eq!(1_210, batch.trajectories[0].tick);

    // created + destroyed audit rows
    assert_eq!(2, batch.entity_lifecycles.len());
}

#[test]
fn flash_span_maps_flashed_and_flasher() {
    let record = RoundRecord {
        round: closed_round(),
        spans: vec![ClosedSpan {
            entity: EntityId(-1),
            kind: SpanKind::FlashBlind,
            owner: Some(PlayerSlot(0)),
            subject: Some(PlayerSlot(1)),
            start_tick: 1_400,
            end_tick: 1_520,
            reason: CloseReason::Expired,
            origin: None,
            terminus: None,
            detail: None,
            picked_up_by: None,
            samples: std::collections::BTreeMap::new(),
        }],
        events: Vec::new(),
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();

    assert_eq!(1, batch.flash_events.len());
    assert_eq!(1, batch.flash_events[0].flashed_slot);
    assert_eq!(Some(0), batch.flash_events[0].flasher_slot);
    assert!(batch.flash_events[0].team_flash);
    assert_eq!("Expired", batch.flash_events[0].close_reason);
}

#[test]
fn dropped_item_keeps_pickup_information() {
    let record = RoundRecord {
        round: closed_round(),
        spans: vec![ClosedSpan {
            entity: EntityId(31),
            kind: SpanKind::DroppedItem,
            owner: Some(PlayerSlot(2)),
            subject: None,
            start_tick: 1_100,
            end_tick: 1_800,
            reason: CloseReason::Terminal,
            origin: None,
            terminus: None,
            detail: Some("awp".to_owned()),
            picked_up_by: Some(PlayerSlot(3)),
            samples: std::collections::BTreeMap::new(),
        }],
        events: Vec::new(),
    };

    let batch = RoundBatch::build(DEMO_ID, &record, &players()).unwrap();

    assert_eq!(1, batch.dropped_items.len());
    assert_eq!("awp", batch.dropped_items[0].item);
    assert_eq!(Some(1_800), batch.dropped_items[0].pickup_tick);
    assert_eq!(Some(3), batch.dropped_items[0].picked_up_by_slot);
}

#[test]
fn storage_round_translation() {
    assert_eq!(3, backend::listing::storage_round_number(1, Some("faceit")));
    assert_eq!(1, backend::listing::storage_round_number(1, None));
}
