use ingest::event::{
    BombEventKind, EndReason, Event, Frame, PlayerMeta, PlayerSlot, Team, Tick,
};

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The outer demo container is malformed or truncated.
    Container,
    /// The frame/message stream inside the container failed to parse.
    Frames,
    /// The demo holds no round data at all.
    Empty,
}

#[derive(Debug)]
pub struct DecodedDemo {
    pub map: String,
    pub tick_rate: i32,
    pub total_ticks: Tick,
    pub frames: Vec<Frame>,
}

// CS2 demos are recorded at a fixed 64 ticks per second.
const TICK_RATE: i32 = 64;

struct RawRound {
    start: u32,
    end: u32,
    reason: Option<EndReason>,
}

/// Adapts the external csdemo decoder into the engine's frame stream. Round
/// boundaries and win reasons come from the game-rules entity states, the
/// discrete events from the game event stream; both are merged into one
/// tick-ordered sequence.
pub fn decode(buf: &[u8]) -> Result<DecodedDemo, DecodeError> {
    let container = csdemo::Container::parse(buf).map_err(|_| DecodeError::Container)?;
    let output = csdemo::parser::parse(
        csdemo::FrameIterator::parse(container.inner),
        csdemo::parser::EntityFilter::all(),
    )
    .map_err(|_| DecodeError::Frames)?;

    let map = output.header.map_name().to_owned();

    let mut rounds: Vec<RawRound> = Vec::new();
    let mut last_state_tick = 0_u32;
    for tick in output.entity_states.ticks.iter() {
        last_state_tick = last_state_tick.max(tick.tick);

        for state in tick.states.iter() {
            let round_start_count = state
                .get_prop("CCSGameRulesProxy.CCSGameRules.m_nRoundStartCount")
                .map(|v| v.value.as_u32())
                .flatten();
            if let Some(round_start_count) = round_start_count {
                if rounds.len() < (round_start_count - 1) as usize {
                    rounds.push(RawRound {
                        start: tick.tick,
                        end: u32::MAX,
                        reason: None,
                    });
                }
            }

            let round_end_count = state
                .get_prop("CCSGameRulesProxy.CCSGameRules.m_nRoundEndCount")
                .map(|v| v.value.as_u32())
                .flatten();
            if let Some(round_end_count) = round_end_count {
                if rounds.len() == (round_end_count - 1) as usize {
                    if let Some(last) = rounds.last_mut() {
                        last.end = tick.tick;
                    }
                }
            }

            if state.class.as_ref() == "CCSGameRulesProxy" {
                let reason = state
                    .get_prop("CCSGameRulesProxy.CCSGameRules.m_eRoundWinReason")
                    .map(|p| p.value.as_i32())
                    .flatten()
                    .map(|v| ingest::event::ROUND_END_REASON.get(&v))
                    .flatten()
                    .filter(|r| !matches!(r, EndReason::StillInProgress));
                if let Some(reason) = reason {
                    if let Some(last) = rounds.last_mut() {
                        last.reason = Some(*reason);
                    }
                }
            }
        }
    }

    if rounds.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut frames = Vec::new();

    let mut roster: Vec<_> = output
        .player_info
        .iter()
        .filter(|(id, _)| id.0 <= 10)
        .collect();
    roster.sort_unstable_by_key(|(id, _)| id.0);
    for (id, player) in roster {
        frames.push(Frame {
            tick: 0,
            event: Event::PlayerJoin(PlayerMeta {
                slot: PlayerSlot(id.0),
                platform_id: player.xuid,
                name: player.name.clone(),
                team: Team::from_number(player.team),
            }),
        });
    }

    let mut current_tick = 0_u32;
    let mut player_life = std::collections::HashMap::<csdemo::UserId, i32>::new();
    for event in output.events.iter() {
        match event {
            csdemo::DemoEvent::Tick(tick) => {
                current_tick = tick.tick();
            }
            csdemo::DemoEvent::GameEvent(gevent) => {
                match gevent.as_ref() {
                    csdemo::game_event::GameEvent::RoundAnnounceMatchStart(_) => {
                        frames.push(Frame {
                            tick: current_tick as Tick,
                            event: Event::MatchStart {
                                map: Some(map.clone()),
                                game_mode: None,
                            },
                        });
                    }
                    csdemo::game_event::GameEvent::PlayerSpawn(pspawn) => {
                        if let Some(userid) = pspawn.userid {
                            player_life.insert(userid, 100);
                        }
                    }
                    csdemo::game_event::GameEvent::PlayerDeath(death) => {
                        let died = match death.userid {
                            Some(d) => d,
                            None => continue,
                        };
                        let attacker = death.attacker.filter(|p| p.0 <= 10);
                        let assister = death.assister.filter(|p| p.0 <= 10);

                        frames.push(Frame {
                            tick: current_tick as Tick,
                            event: Event::Kill {
                                attacker: attacker.map(|a| PlayerSlot(a.0)),
                                victim: PlayerSlot(died.0),
                                assister: assister.map(|a| PlayerSlot(a.0)),
                                weapon: String::from("unknown"),
                                headshot: false,
                                penetrated: 0,
                                noscope: false,
                                through_smoke: false,
                                attacker_blind: false,
                            },
                        });
                    }
                    csdemo::game_event::GameEvent::PlayerHurt(phurt) => {
                        let hurt_player = match phurt.userid {
                            Some(p) => p,
                            None => continue,
                        };

                        let n_health = match phurt.health {
                            Some(csdemo::RawValue::F32(v)) => v as i32,
                            Some(csdemo::RawValue::I32(v)) => v,
                            Some(csdemo::RawValue::U64(v)) => v as i32,
                            _ => 0,
                        };
                        let previous_health =
                            player_life.get(&hurt_player).copied().unwrap_or(100);
                        let health_removed = (previous_health - n_health).max(0);
                        player_life.insert(hurt_player, n_health);

                        frames.push(Frame {
                            tick: current_tick as Tick,
                            event: Event::Damage {
                                attacker: phurt
                                    .attacker
                                    .filter(|p| p.0 <= 10)
                                    .map(|a| PlayerSlot(a.0)),
                                victim: PlayerSlot(hurt_player.0),
                                health_removed,
                                armor_removed: 0,
                                hitgroup: 0,
                                weapon: String::from("unknown"),
                            },
                        });
                    }
                    csdemo::game_event::GameEvent::BombPlanted(_) => {
                        frames.push(Frame {
                            tick: current_tick as Tick,
                            event: Event::Bomb {
                                player: None,
                                kind: BombEventKind::Planted,
                                site: None,
                            },
                        });
                    }
                    csdemo::game_event::GameEvent::BombDefused(_) => {
                        frames.push(Frame {
                            tick: current_tick as Tick,
                            event: Event::Bomb {
                                player: None,
                                kind: BombEventKind::Defused,
                                site: None,
                            },
                        });
                    }
                    _ => {}
                };
            }
            _ => {}
        };
    }

    for round in rounds.iter() {
        frames.push(Frame {
            tick: round.start as Tick,
            event: Event::RoundStart,
        });
        if round.end != u32::MAX {
            frames.push(Frame {
                tick: round.end as Tick,
                event: Event::RoundEnd {
                    winner: round.reason.and_then(|reason| reason.winner()),
                    reason: round.reason.unwrap_or(EndReason::Truncated),
                },
            });
        }
    }

    frames.sort_by_key(|frame| (frame.tick, frame_order(&frame.event)));

    let total_ticks = frames
        .last()
        .map(|frame| frame.tick)
        .unwrap_or(0)
        .max(last_state_tick as Tick);

    Ok(DecodedDemo {
        map,
        tick_rate: TICK_RATE,
        total_ticks,
        frames,
    })
}

/// Ordering of frames sharing a tick: roster first, then round open, then
/// the round's events, then round close.
fn frame_order(event: &Event) -> u8 {
    match event {
        Event::PlayerJoin(_) | Event::PlayerTeamChange { .. } => 0,
        Event::MatchStart { .. } => 1,
        Event::RoundStart => 2,
        Event::RoundEnd { .. } => 4,
        _ => 3,
    }
}
