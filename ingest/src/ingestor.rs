use crate::event::{Event, Frame, PlayerMeta};
use crate::lifecycle::{ClosedSpan, EntityTracker, SpanKind, SpanOpen};
use crate::segmenter::{ClosedMatch, OpenRoundInfo, RoundSegmenter, SegmentOutput};

/// Everything belonging to one closed round: the round itself, every span
/// that ended inside it (naturally or force-closed at its end), and the
/// discrete events that occurred while it was open.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub round: crate::segmenter::ClosedRound,
    pub spans: Vec<ClosedSpan>,
    pub events: Vec<Frame>,
}

/// The trailing round of a truncated stream. Kept, not dropped; its spans
/// are closed with reason StreamEnded and its end tick stays unset.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRoundRecord {
    pub round: OpenRoundInfo,
    pub spans: Vec<ClosedSpan>,
    pub events: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestItem {
    Player(PlayerMeta),
    Round(RoundRecord),
    Match(ClosedMatch),
}

#[derive(Debug)]
pub struct IngestFinish {
    pub open_round: Option<OpenRoundRecord>,
    pub closed_match: Option<ClosedMatch>,
    /// Spans that were still open outside any round when the stream ended.
    pub stray_spans: Vec<ClosedSpan>,
    pub rounds_closed: usize,
    pub orphan_events: usize,
}

/// Single-pass pipeline over one demo file's frame stream: Round Segmenter
/// and Entity Lifecycle Tracker composed in tick order, no fan-out.
pub struct DemoIngestor {
    segmenter: RoundSegmenter,
    tracker: EntityTracker,
    round_events: Vec<Frame>,
    span_buf: Vec<ClosedSpan>,
    rounds_closed: usize,
    orphan_events: usize,
}

impl DemoIngestor {
    pub fn new(demo_source: Option<&str>) -> Self {
        Self {
            segmenter: RoundSegmenter::new(demo_source),
            tracker: EntityTracker::new(),
            round_events: Vec::new(),
            span_buf: Vec::new(),
            rounds_closed: 0,
            orphan_events: 0,
        }
    }

    pub fn observe(&mut self, frame: Frame) -> Vec<IngestItem> {
        let tick = self.segmenter.admit_tick(frame.tick);
        let frame = Frame {
            tick,
            event: frame.event,
        };

        self.span_buf.extend(self.tracker.expire_due(tick));

        let mut items = Vec::new();

        match &frame.event {
            Event::PlayerJoin(meta) => {
                items.push(IngestItem::Player(meta.clone()));
            }
            Event::GrenadeThrown {
                entity,
                player,
                grenade,
                position,
            } => {
                let superseded = self.tracker.span_start(SpanOpen {
                    entity: *entity,
                    kind: SpanKind::GrenadeFlight(*grenade),
                    tick,
                    owner: Some(*player),
                    subject: None,
                    origin: Some(*position),
                    deadline: None,
                    detail: None,
                });
                self.span_buf.extend(superseded);
            }
            Event::GrenadeSample { entity, position } => {
                self.tracker.span_sample(*entity, tick, *position);
            }
            Event::GrenadeDetonate { entity, position } => {
                self.span_buf
                    .extend(self.tracker.span_end(*entity, tick, Some(*position), None));
            }
            Event::SmokeStart {
                entity,
                player,
                position,
            } => {
                let superseded = self.tracker.span_start(SpanOpen {
                    entity: *entity,
                    kind: SpanKind::SmokeCloud,
                    tick,
                    owner: *player,
                    subject: None,
                    origin: Some(*position),
                    deadline: None,
                    detail: None,
                });
                self.span_buf.extend(superseded);
            }
            Event::SmokeExpired { entity } => {
                self.span_buf
                    .extend(self.tracker.span_end(*entity, tick, None, None));
            }
            Event::InfernoStart {
                entity,
                player,
                position,
            } => {
                let superseded = self.tracker.span_start(SpanOpen {
                    entity: *entity,
                    kind: SpanKind::FireArea,
                    tick,
                    owner: *player,
                    subject: None,
                    origin: Some(*position),
                    deadline: None,
                    detail: None,
                });
                self.span_buf.extend(superseded);
            }
            Event::InfernoExpired { entity } => {
                self.span_buf
                    .extend(self.tracker.span_end(*entity, tick, None, None));
            }
            Event::PlayerBlind {
                player,
                attacker,
                duration_ticks,
            } => {
                let entity = self.tracker.mint_span_id();
                let superseded = self.tracker.span_start(SpanOpen {
                    entity,
                    kind: SpanKind::FlashBlind,
                    tick,
                    owner: *attacker,
                    subject: Some(*player),
                    origin: None,
                    deadline: Some(tick + duration_ticks),
                    detail: None,
                });
                self.span_buf.extend(superseded);
            }
            Event::ItemDropped {
                entity,
                player,
                item,
            } => {
                let superseded = self.tracker.span_start(SpanOpen {
                    entity: *entity,
                    kind: SpanKind::DroppedItem,
                    tick,
                    owner: *player,
                    subject: None,
                    origin: None,
                    deadline: None,
                    detail: Some(item.clone()),
                });
                self.span_buf.extend(superseded);
            }
            Event::ItemPickedUp { entity, player } => {
                self.span_buf
                    .extend(self.tracker.span_end(*entity, tick, None, Some(*player)));
            }
            _ => {}
        };

        // Buffer before segmenting so a terminal event (bomb explode/defuse)
        // still lands in the round it closes.
        if is_discrete(&frame.event) {
            if self.segmenter.round_open() {
                self.round_events.push(frame.clone());
            } else {
                self.orphan_events += 1;
                tracing::trace!("event at tick {} outside any round", tick);
            }
        }

        for output in self.segmenter.observe(&frame) {
            match output {
                SegmentOutput::RoundClosed(round) => {
                    let mut spans = std::mem::take(&mut self.span_buf);
                    spans.extend(self.tracker.close_round(round.end_tick));
                    let events = std::mem::take(&mut self.round_events);

                    self.rounds_closed += 1;
                    items.push(IngestItem::Round(RoundRecord {
                        round,
                        spans,
                        events,
                    }));
                }
                SegmentOutput::MatchClosed(closed) => {
                    items.push(IngestItem::Match(closed));
                }
            };
        }

        items
    }

    pub fn finish(mut self) -> IngestFinish {
        let finish = self.segmenter.finish();
        let last_tick = self.segmenter.last_tick();

        let mut stray_spans = Vec::new();
        let open_round = match finish.open_round {
            Some(info) => {
                let mut spans = std::mem::take(&mut self.span_buf);
                spans.extend(self.tracker.close_stream(last_tick));

                Some(OpenRoundRecord {
                    round: info,
                    spans,
                    events: std::mem::take(&mut self.round_events),
                })
            }
            None => {
                stray_spans = std::mem::take(&mut self.span_buf);
                stray_spans.extend(self.tracker.close_stream(last_tick));
                if !stray_spans.is_empty() {
                    tracing::warn!("{} spans closed outside any round at stream end", stray_spans.len());
                }

                None
            }
        };

        IngestFinish {
            open_round,
            closed_match: finish.closed_match,
            stray_spans,
            rounds_closed: self.rounds_closed,
            orphan_events: self.orphan_events,
        }
    }

    pub fn rounds_closed(&self) -> usize {
        self.rounds_closed
    }
}

fn is_discrete(event: &Event) -> bool {
    matches!(
        event,
        Event::Kill { .. }
            | Event::Damage { .. }
            | Event::WeaponFire { .. }
            | Event::Bomb { .. }
            | Event::ChatMessage { .. }
            | Event::RadioCommand { .. }
            | Event::VoiceTransmission { .. }
            | Event::EconomyEvent { .. }
            | Event::PlayerSnapshot { .. }
    )
}
