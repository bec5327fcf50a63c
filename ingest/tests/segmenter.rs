use ingest::event::{
    BombEventKind, EndReason, Event, Frame, PlayerMeta, PlayerSlot, Team, Tick,
};
use ingest::segmenter::{RoundSegmenter, SegmentOutput};
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

fn kill(victim: i32) -> Event {
    Event::Kill {
        attacker: Some(PlayerSlot(0)),
        victim: PlayerSlot(victim),
        assister: None,
        weapon: "ak47".to_owned(),
        headshot: false,
        penetrated: 0,
        noscope: false,
        through_smoke: false,
        attacker_blind: false,
    }
}

fn round_end(winner: Team, reason: EndReason) -> Event {
    Event::RoundEnd {
        winner: Some(winner),
        reason,
    }
}

fn closed_rounds(outputs: Vec<SegmentOutput>) -> Vec<ingest::segmenter::ClosedRound> {
    outputs
        .into_iter()
        .filter_map(|out| match out {
            SegmentOutput::RoundClosed(round) => Some(round),
            _ => None,
        })
        .collect()
}

#[test]
fn single_round_with_kill() {
    let mut segmenter = RoundSegmenter::new(None);

    let mut closed = Vec::new();
    closed.extend(closed_rounds(segmenter.observe(&frame(100, Event::RoundStart))));
    closed.extend(closed_rounds(segmenter.observe(&frame(150, kill(5)))));
    closed.extend(closed_rounds(segmenter.observe(&frame(
        300,
        round_end(Team::Ct, EndReason::TKilled),
    ))));

    assert_eq!(1, closed.len());
    let round = &closed[0];
    assert_eq!(100, round.start_tick);
    assert_eq!(300, round.end_tick);
    assert_eq!(Some(Team::Ct), round.winner);
    assert_eq!(EndReason::TKilled, round.reason);
    assert_eq!(1, round.number);
    assert_eq!(1, round.match_number);
}

#[test]
fn missing_round_end_force_closes_previous() {
    let mut segmenter = RoundSegmenter::new(None);

    assert_eq!(0, segmenter.observe(&frame(100, Event::RoundStart)).len());
    let closed = closed_rounds(segmenter.observe(&frame(500, Event::RoundStart)));

    assert_eq!(1, closed.len());
    assert_eq!(100, closed[0].start_tick);
    assert_eq!(499, closed[0].end_tick);
    assert_eq!(EndReason::Truncated, closed[0].reason);
    assert_eq!(None, closed[0].winner);
}

#[test]
fn truncated_stream_leaves_round_open() {
    let mut segmenter = RoundSegmenter::new(None);

    segmenter.observe(&frame(500, Event::RoundStart));
    let finish = segmenter.finish();

    let open = finish.open_round.expect("open round surfaced");
    assert_eq!(500, open.start_tick);
    assert_eq!(1, open.number);

    let closed_match = finish.closed_match.expect("match frame committed");
    assert!(!closed_match.finished);
    assert_eq!(0, closed_match.rounds);
}

#[tracing_test::traced_test]
#[test]
fn out_of_order_tick_is_clamped_into_open_round() {
    let mut segmenter = RoundSegmenter::new(None);

    segmenter.observe(&frame(100, Event::RoundStart));
    segmenter.observe(&frame(50, kill(3)));
    let closed = closed_rounds(segmenter.observe(&frame(
        300,
        round_end(Team::Ct, EndReason::TKilled),
    )));

    assert!(logs_contain("out-of-order tick"));
    assert_eq!(1, closed.len());
    assert_eq!(100, closed[0].start_tick);
    assert_eq!(300, closed[0].end_tick);
}

#[test]
fn round_numbers_strictly_increase_and_ticks_are_ordered() {
    let mut segmenter = RoundSegmenter::new(None);

    let mut closed = Vec::new();
    let mut tick = 1_000;
    for i in 0..12 {
        closed.extend(closed_rounds(segmenter.observe(&frame(tick, Event::RoundStart))));
        // every third round never gets its end event
        if i % 3 != 2 {
            tick += 500;
            closed.extend(closed_rounds(segmenter.observe(&frame(
                tick,
                round_end(Team::T, EndReason::CtKilled),
            ))));
        }
        tick += 100;
    }

    // the last round (number 12) never got an end event and stays open
    let finish = segmenter.finish();
    assert!(finish.open_round.is_some());
    assert_eq!(11, closed.len());

    for (previous, current) in closed.iter().zip(closed.iter().skip(1)) {
        assert!(current.number == previous.number + 1);
        assert!(current.start_tick >= previous.end_tick);
    }
    for round in closed.iter() {
        assert!(round.end_tick >= round.start_tick);
    }
}

#[test]
fn bomb_explosion_is_terminal() {
    let mut segmenter = RoundSegmenter::new(None);

    segmenter.observe(&frame(100, Event::RoundStart));
    segmenter.observe(&frame(
        200,
        Event::Bomb {
            player: Some(PlayerSlot(2)),
            kind: BombEventKind::Planted,
            site: Some(0),
        },
    ));
    let closed = closed_rounds(segmenter.observe(&frame(
        400,
        Event::Bomb {
            player: None,
            kind: BombEventKind::Exploded,
            site: Some(0),
        },
    )));

    assert_eq!(1, closed.len());
    assert_eq!(400, closed[0].end_tick);
    assert_eq!(Some(Team::T), closed[0].winner);
    assert_eq!(EndReason::BombExploded, closed[0].reason);
    assert!(closed[0].bomb_planted);
    assert!(closed[0].bomb_exploded);
    assert_eq!(Some(0), closed[0].bomb_site);

    // the trailing round-end for the already-closed round is ignored
    let trailing = segmenter.observe(&frame(410, round_end(Team::T, EndReason::BombExploded)));
    assert_eq!(0, trailing.len());
}

#[test]
fn match_restart_resets_round_numbering() {
    let mut segmenter = RoundSegmenter::new(None);

    segmenter.observe(&frame(100, Event::RoundStart));
    segmenter.observe(&frame(500, round_end(Team::Ct, EndReason::TKilled)));

    let outputs = segmenter.observe(&frame(
        600,
        Event::MatchStart {
            map: Some("de_nuke".to_owned()),
            game_mode: None,
        },
    ));
    let matches: Vec<_> = outputs
        .iter()
        .filter(|out| matches!(out, SegmentOutput::MatchClosed(_)))
        .collect();
    assert_eq!(1, matches.len());

    let closed = closed_rounds(segmenter.observe(&frame(700, Event::RoundStart)));
    assert_eq!(0, closed.len());

    let closed = closed_rounds(segmenter.observe(&frame(
        900,
        round_end(Team::T, EndReason::CtKilled),
    )));
    assert_eq!(1, closed.len());
    assert_eq!(1, closed[0].number);
    assert_eq!(2, closed[0].match_number);
}

#[test]
fn warmup_rounds_are_tagged_not_filtered() {
    let mut segmenter = RoundSegmenter::new(Some("faceit"));

    let mut closed = Vec::new();
    let mut tick = 100;
    for _ in 0..3 {
        segmenter.observe(&frame(tick, Event::RoundStart));
        tick += 400;
        closed.extend(closed_rounds(segmenter.observe(&frame(
            tick,
            round_end(Team::Ct, EndReason::TKilled),
        ))));
        tick += 100;
    }

    assert_eq!(3, closed.len());
    assert!(closed[0].is_warmup);
    assert!(closed[1].is_warmup);
    assert!(!closed[2].is_warmup);

    // warmup rounds never count towards the score
    let finish = segmenter.finish();
    let closed_match = finish.closed_match.expect("match closed");
    assert_eq!(1, closed_match.ct_score);
    assert_eq!(0, closed_match.t_score);
}

#[test]
fn live_player_counts_at_round_end() {
    let mut segmenter = RoundSegmenter::new(None);

    for slot in 0..5 {
        segmenter.observe(&frame(0, join(slot, Team::Ct)));
    }
    for slot in 5..10 {
        segmenter.observe(&frame(0, join(slot, Team::T)));
    }

    segmenter.observe(&frame(100, Event::RoundStart));
    segmenter.observe(&frame(150, kill(5)));
    segmenter.observe(&frame(180, kill(6)));
    let closed = closed_rounds(segmenter.observe(&frame(
        300,
        round_end(Team::Ct, EndReason::TKilled),
    )));

    assert_eq!(1, closed.len());
    assert_eq!(5, closed[0].ct_live);
    assert_eq!(3, closed[0].t_live);
}
