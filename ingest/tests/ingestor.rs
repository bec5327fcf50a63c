use ingest::event::{
    EndReason, EntityId, Event, Frame, GrenadeKind, PlayerMeta, PlayerSlot, Team, Tick, Vec3,
};
use ingest::ingestor::{DemoIngestor, IngestItem, RoundRecord};
use ingest::lifecycle::CloseReason;
use pretty_assertions::assert_eq;

fn frame(tick: Tick, event: Event) -> Frame {
    Frame { tick, event }
}

fn join(slot: i32, team: Team) -> Event {
    Event::PlayerJoin(PlayerMeta {
        slot: PlayerSlot(slot),
        platform_id: 76561198000000000 + slot as u64,
        name: format!("player-{}", slot),
        team: Some(team),
    })
}

fn kill(attacker: i32, victim: i32) -> Event {
    Event::Kill {
        attacker: Some(PlayerSlot(attacker)),
        victim: PlayerSlot(victim),
        assister: None,
        weapon: "ak47".to_owned(),
        headshot: true,
        penetrated: 0,
        noscope: false,
        through_smoke: false,
        attacker_blind: false,
    }
}

fn rounds(items: Vec<IngestItem>) -> Vec<RoundRecord> {
    items
        .into_iter()
        .filter_map(|item| match item {
            IngestItem::Round(record) => Some(record),
            _ => None,
        })
        .collect()
}

#[test]
fn round_record_contains_its_events() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(0, join(0, Team::Ct)));
    ingestor.observe(frame(0, join(5, Team::T)));
    ingestor.observe(frame(100, Event::RoundStart));
    ingestor.observe(frame(150, kill(0, 5)));
    let closed = rounds(ingestor.observe(frame(
        300,
        Event::RoundEnd {
            winner: Some(Team::Ct),
            reason: EndReason::TKilled,
        },
    )));

    assert_eq!(1, closed.len());
    let record = &closed[0];
    assert_eq!(100, record.round.start_tick);
    assert_eq!(300, record.round.end_tick);
    assert_eq!(Some(Team::Ct), record.round.winner);

    assert_eq!(1, record.events.len());
    assert_eq!(150, record.events[0].tick);
    assert!(matches!(record.events[0].event, Event::Kill { .. }));
}

#[test]
fn truncated_round_is_surfaced_not_dropped() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(500, Event::RoundStart));
    ingestor.observe(frame(550, kill(0, 5)));
    let finish = ingestor.finish();

    let open = finish.open_round.expect("open round kept");
    assert_eq!(500, open.round.start_tick);
    assert_eq!(1, open.events.len());
    assert_eq!(0, finish.rounds_closed);
}

#[test]
fn grenade_without_detonation_force_closed_at_round_end() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(5, Event::RoundStart));
    ingestor.observe(frame(
        10,
        Event::GrenadeThrown {
            entity: EntityId(7),
            player: PlayerSlot(3),
            grenade: GrenadeKind::Smoke,
            position: Vec3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        },
    ));
    let closed = rounds(ingestor.observe(frame(
        50,
        Event::RoundEnd {
            winner: Some(Team::Ct),
            reason: EndReason::TKilled,
        },
    )));

    assert_eq!(1, closed.len());
    assert_eq!(1, closed[0].spans.len());

    let span = &closed[0].spans[0];
    assert_eq!(EntityId(7), span.entity);
    assert_eq!(10, span.start_tick);
    assert_eq!(50, span.end_tick);
    assert_eq!(CloseReason::RoundEnded, span.reason);
}

#[test]
fn flash_blind_expires_inside_round() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(100, Event::RoundStart));
    ingestor.observe(frame(
        200,
        Event::PlayerBlind {
            player: PlayerSlot(6),
            attacker: Some(PlayerSlot(1)),
            duration_ticks: 120,
        },
    ));
    // a later frame inside the round trips the deadline
    ingestor.observe(frame(400, kill(1, 6)));
    let closed = rounds(ingestor.observe(frame(
        900,
        Event::RoundEnd {
            winner: Some(Team::T),
            reason: EndReason::CtKilled,
        },
    )));

    assert_eq!(1, closed.len());
    assert_eq!(1, closed[0].spans.len());

    let span = &closed[0].spans[0];
    assert_eq!(CloseReason::Expired, span.reason);
    assert_eq!(200, span.start_tick);
    assert_eq!(320, span.end_tick);
    assert_eq!(Some(PlayerSlot(6)), span.subject);
    assert_eq!(Some(PlayerSlot(1)), span.owner);
}

#[test]
fn detonated_grenade_keeps_trajectory_samples() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(100, Event::RoundStart));
    ingestor.observe(frame(
        110,
        Event::GrenadeThrown {
            entity: EntityId(12),
            player: PlayerSlot(2),
            grenade: GrenadeKind::HeGrenade,
            position: Vec3 {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
        },
    ));
    for tick in [120_u64, 130, 130, 140] {
        ingestor.observe(frame(
            tick,
            Event::GrenadeSample {
                entity: EntityId(12),
                position: Vec3 {
                    x: tick as f32,
                    y: 0.0,
                    z: 0.0,
                },
            },
        ));
    }
    ingestor.observe(frame(
        150,
        Event::GrenadeDetonate {
            entity: EntityId(12),
            position: Vec3 {
                x: 9.0,
                y: 9.0,
                z: 9.0,
            },
        },
    ));
    let closed = rounds(ingestor.observe(frame(
        300,
        Event::RoundEnd {
            winner: Some(Team::Ct),
            reason: EndReason::TKilled,
        },
    )));

    assert_eq!(1, closed[0].spans.len());
    let span = &closed[0].spans[0];
    assert_eq!(CloseReason::Terminal, span.reason);
    // duplicate tick 130 collapsed
    assert_eq!(3, span.samples.len());
    assert_eq!(150, span.end_tick);
}

#[test]
fn terminal_bomb_event_lands_in_the_round_it_closes() {
    use ingest::event::BombEventKind;

    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(100, Event::RoundStart));
    ingestor.observe(frame(
        200,
        Event::Bomb {
            player: Some(PlayerSlot(2)),
            kind: BombEventKind::Planted,
            site: Some(1),
        },
    ));
    let closed = rounds(ingestor.observe(frame(
        400,
        Event::Bomb {
            player: None,
            kind: BombEventKind::Exploded,
            site: Some(1),
        },
    )));

    assert_eq!(1, closed.len());
    assert!(closed[0].round.bomb_exploded);
    assert_eq!(400, closed[0].round.end_tick);
    assert_eq!(2, closed[0].events.len());
    assert!(matches!(
        closed[0].events[1].event,
        Event::Bomb {
            kind: BombEventKind::Exploded,
            ..
        }
    ));
}

#[test]
fn events_outside_rounds_are_counted_not_attached() {
    let mut ingestor = DemoIngestor::new(None);

    ingestor.observe(frame(10, kill(0, 5)));
    ingestor.observe(frame(100, Event::RoundStart));
    let closed = rounds(ingestor.observe(frame(
        300,
        Event::RoundEnd {
            winner: Some(Team::Ct),
            reason: EndReason::TKilled,
        },
    )));

    assert_eq!(0, closed[0].events.len());

    let finish = ingestor.finish();
    assert_eq!(1, finish.orphan_events);
}
