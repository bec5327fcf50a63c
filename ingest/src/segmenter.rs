use crate::event::{BombEventKind, EndReason, Event, Frame, PlayerSlot, Team, Tick};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClosedRound {
    pub match_number: i32,
    pub number: i32,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub winner: Option<Team>,
    pub reason: EndReason,
    pub ct_live: i32,
    pub t_live: i32,
    pub bomb_planted: bool,
    pub bomb_defused: bool,
    pub bomb_exploded: bool,
    pub bomb_site: Option<i32>,
    pub is_warmup: bool,
}

/// A round the stream ended on without a terminal event. Surfaced to the
/// caller instead of dropped; its end tick stays unset.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OpenRoundInfo {
    pub match_number: i32,
    pub number: i32,
    pub start_tick: Tick,
    pub bomb_planted: bool,
    pub bomb_defused: bool,
    pub bomb_exploded: bool,
    pub bomb_site: Option<i32>,
    pub is_warmup: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClosedMatch {
    pub number: i32,
    pub ct_score: i32,
    pub t_score: i32,
    pub rounds: i32,
    pub overtime: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOutput {
    RoundClosed(ClosedRound),
    MatchClosed(ClosedMatch),
}

#[derive(Debug)]
struct OpenRound {
    number: i32,
    start_tick: Tick,
    bomb_planted: bool,
    bomb_defused: bool,
    bomb_exploded: bool,
    bomb_site: Option<i32>,
    is_warmup: bool,
}

#[derive(Debug)]
struct MatchAcc {
    number: i32,
    ct_score: i32,
    t_score: i32,
    rounds_started: i32,
    rounds_closed: i32,
}

// MR12 regulation is 24 rounds.
const REGULATION_ROUNDS: i32 = 24;

#[derive(Debug)]
pub struct SegmenterFinish {
    pub open_round: Option<OpenRoundInfo>,
    pub closed_match: Option<ClosedMatch>,
}

pub struct RoundSegmenter {
    warmup_rounds: i32,
    last_tick: Tick,
    match_counter: i32,
    current_match: Option<MatchAcc>,
    current_round: Option<OpenRound>,
    teams: std::collections::HashMap<PlayerSlot, Team>,
    dead: std::collections::HashSet<PlayerSlot>,
}

impl RoundSegmenter {
    pub fn new(demo_source: Option<&str>) -> Self {
        Self {
            warmup_rounds: crate::offset::source_offset(demo_source),
            last_tick: 0,
            match_counter: 0,
            current_match: None,
            current_round: None,
            teams: std::collections::HashMap::new(),
            dead: std::collections::HashSet::new(),
        }
    }

    /// Enforces non-decreasing ticks. An out-of-order tick is logged and
    /// clamped to the latest tick seen, assigning the event to the
    /// currently-open round.
    pub fn admit_tick(&mut self, raw: Tick) -> Tick {
        if raw < self.last_tick {
            tracing::warn!(
                "out-of-order tick {} clamped to {}",
                raw,
                self.last_tick
            );
            return self.last_tick;
        }

        self.last_tick = raw;
        raw
    }

    pub fn observe(&mut self, frame: &Frame) -> Vec<SegmentOutput> {
        let tick = self.admit_tick(frame.tick);
        let mut out = Vec::new();

        match &frame.event {
            Event::PlayerJoin(meta) => {
                match meta.team {
                    Some(team) => {
                        self.teams.insert(meta.slot, team);
                    }
                    None => {
                        self.teams.remove(&meta.slot);
                    }
                };
            }
            Event::PlayerTeamChange { player, team } => {
                match team {
                    Some(team) => {
                        self.teams.insert(*player, *team);
                    }
                    None => {
                        self.teams.remove(player);
                    }
                };
            }
            Event::MatchStart { .. } => {
                if self.current_round.is_some() {
                    out.push(SegmentOutput::RoundClosed(self.force_close(tick)));
                }
                if let Some(closed) = self.close_match(false) {
                    out.push(SegmentOutput::MatchClosed(closed));
                }
            }
            Event::RoundStart => {
                if self.current_round.is_some() {
                    tracing::warn!("round start at tick {} with previous round still open", tick);
                    out.push(SegmentOutput::RoundClosed(self.force_close(tick)));
                }

                let (match_number, number) = {
                    let current_match = self.ensure_match();
                    current_match.rounds_started += 1;
                    (current_match.number, current_match.rounds_started)
                };

                self.current_round = Some(OpenRound {
                    number,
                    start_tick: tick,
                    bomb_planted: false,
                    bomb_defused: false,
                    bomb_exploded: false,
                    bomb_site: None,
                    is_warmup: match_number == 1 && number <= self.warmup_rounds,
                });
                self.dead.clear();
            }
            Event::RoundEnd { winner, reason } => {
                if self.current_round.is_some() {
                    out.push(SegmentOutput::RoundClosed(self.close(tick, *winner, *reason)));
                } else {
                    tracing::debug!("round end at tick {} with no open round", tick);
                }
            }
            Event::Kill { victim, .. } => {
                self.dead.insert(*victim);
            }
            Event::Bomb { kind, site, .. } => match kind {
                BombEventKind::Planted => {
                    if let Some(round) = self.current_round.as_mut() {
                        round.bomb_planted = true;
                        round.bomb_site = *site;
                    }
                }
                BombEventKind::Defused => {
                    if let Some(round) = self.current_round.as_mut() {
                        round.bomb_defused = true;
                    }
                    if self.current_round.is_some() {
                        out.push(SegmentOutput::RoundClosed(self.close(
                            tick,
                            Some(Team::Ct),
                            EndReason::BombDefused,
                        )));
                    }
                }
                BombEventKind::Exploded => {
                    if let Some(round) = self.current_round.as_mut() {
                        round.bomb_exploded = true;
                    }
                    if self.current_round.is_some() {
                        out.push(SegmentOutput::RoundClosed(self.close(
                            tick,
                            Some(Team::T),
                            EndReason::BombExploded,
                        )));
                    }
                }
                _ => {}
            },
            _ => {}
        };

        out
    }

    /// Stream end. Leaves a still-open round open rather than dropping it and
    /// closes the match frame around whatever was committed.
    pub fn finish(&mut self) -> SegmenterFinish {
        let open_round = self.current_round.take().map(|round| OpenRoundInfo {
            match_number: self.match_counter,
            number: round.number,
            start_tick: round.start_tick,
            bomb_planted: round.bomb_planted,
            bomb_defused: round.bomb_defused,
            bomb_exploded: round.bomb_exploded,
            bomb_site: round.bomb_site,
            is_warmup: round.is_warmup,
        });

        let closed_match = self.close_match(open_round.is_none());

        SegmenterFinish {
            open_round,
            closed_match,
        }
    }

    pub fn round_open(&self) -> bool {
        self.current_round.is_some()
    }

    pub fn last_tick(&self) -> Tick {
        self.last_tick
    }

    fn ensure_match(&mut self) -> &mut MatchAcc {
        if self.current_match.is_none() {
            self.match_counter += 1;
            self.current_match = Some(MatchAcc {
                number: self.match_counter,
                ct_score: 0,
                t_score: 0,
                rounds_started: 0,
                rounds_closed: 0,
            });
        }

        self.current_match.as_mut().unwrap()
    }

    fn close_match(&mut self, finished: bool) -> Option<ClosedMatch> {
        let acc = self.current_match.take()?;

        Some(ClosedMatch {
            number: acc.number,
            ct_score: acc.ct_score,
            t_score: acc.t_score,
            rounds: acc.rounds_closed,
            overtime: acc.rounds_closed > REGULATION_ROUNDS,
            finished,
        })
    }

    fn force_close(&mut self, next_start: Tick) -> ClosedRound {
        self.close(next_start.saturating_sub(1), None, EndReason::Truncated)
    }

    fn close(&mut self, tick: Tick, winner: Option<Team>, reason: EndReason) -> ClosedRound {
        let round = self.current_round.take().expect("no open round to close");
        let end_tick = tick.max(round.start_tick);
        let winner = winner.or_else(|| reason.winner());

        let (mut ct_live, mut t_live) = (0, 0);
        for (slot, team) in self.teams.iter() {
            if self.dead.contains(slot) {
                continue;
            }
            match team {
                Team::Ct => ct_live += 1,
                Team::T => t_live += 1,
            };
        }

        let match_number = match self.current_match.as_mut() {
            Some(acc) => {
                acc.rounds_closed += 1;
                if !round.is_warmup {
                    match winner {
                        Some(Team::Ct) => acc.ct_score += 1,
                        Some(Team::T) => acc.t_score += 1,
                        None => {}
                    };
                }
                acc.number
            }
            None => self.match_counter,
        };

        ClosedRound {
            match_number,
            number: round.number,
            start_tick: round.start_tick,
            end_tick,
            winner,
            reason,
            ct_live,
            t_live,
            bomb_planted: round.bomb_planted,
            bomb_defused: round.bomb_defused,
            bomb_exploded: round.bomb_exploded,
            bomb_site: round.bomb_site,
            is_warmup: round.is_warmup,
        }
    }
}
