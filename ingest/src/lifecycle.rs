use crate::event::{EntityId, GrenadeKind, PlayerSlot, Tick, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SpanKind {
    GrenadeFlight(GrenadeKind),
    SmokeCloud,
    FireArea,
    FlashBlind,
    DroppedItem,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrenadeFlight(_) => "grenade_flight",
            Self::SmokeCloud => "smoke_cloud",
            Self::FireArea => "fire_area",
            Self::FlashBlind => "flash_blind",
            Self::DroppedItem => "dropped_item",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CloseReason {
    /// The span's natural terminal event arrived.
    Terminal,
    /// The deadline known at open (blind duration, smoke lifetime) passed.
    Expired,
    /// Force-closed because the owning round ended first.
    RoundEnded,
    /// Force-closed because the stream ended first.
    StreamEnded,
    /// The game reused the entity id while the span was still open.
    Superseded,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminal => "Terminal",
            Self::Expired => "Expired",
            Self::RoundEnded => "RoundEnded",
            Self::StreamEnded => "StreamEnded",
            Self::Superseded => "Superseded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanOpen {
    pub entity: EntityId,
    pub kind: SpanKind,
    pub tick: Tick,
    pub owner: Option<PlayerSlot>,
    /// Player the span acts on, when distinct from the owner (the flashed
    /// player of a blind span).
    pub subject: Option<PlayerSlot>,
    pub origin: Option<Vec3>,
    /// Natural end tick known at open time, if any.
    pub deadline: Option<Tick>,
    /// Kind-specific label (item name for dropped items).
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSpan {
    pub entity: EntityId,
    pub kind: SpanKind,
    pub owner: Option<PlayerSlot>,
    pub subject: Option<PlayerSlot>,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub reason: CloseReason,
    pub origin: Option<Vec3>,
    pub terminus: Option<Vec3>,
    pub detail: Option<String>,
    pub picked_up_by: Option<PlayerSlot>,
    pub samples: std::collections::BTreeMap<Tick, Vec3>,
}

#[derive(Debug)]
struct OpenSpan {
    kind: SpanKind,
    owner: Option<PlayerSlot>,
    subject: Option<PlayerSlot>,
    start_tick: Tick,
    origin: Option<Vec3>,
    deadline: Option<Tick>,
    detail: Option<String>,
    samples: std::collections::BTreeMap<Tick, Vec3>,
}

impl OpenSpan {
    fn close(
        self,
        entity: EntityId,
        end_tick: Tick,
        reason: CloseReason,
        terminus: Option<Vec3>,
        picked_up_by: Option<PlayerSlot>,
    ) -> ClosedSpan {
        ClosedSpan {
            entity,
            kind: self.kind,
            owner: self.owner,
            subject: self.subject,
            start_tick: self.start_tick,
            // end tick, once set, is never below the start tick
            end_tick: end_tick.max(self.start_tick),
            reason,
            origin: self.origin,
            terminus,
            detail: self.detail,
            picked_up_by,
            samples: self.samples,
        }
    }
}

/// Tracks every concurrently-open multi-tick entity of one demo file and
/// guarantees each is closed exactly once: by its terminal event, its
/// deadline, or the owning round's end, whichever comes first.
pub struct EntityTracker {
    open: std::collections::HashMap<EntityId, OpenSpan>,
    synthetic_next: i32,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self {
            open: std::collections::HashMap::new(),
            synthetic_next: -1,
        }
    }

    /// Span keys for phenomena without a game-assigned entity (flash blinds).
    /// Counts down from -1; game ids are non-negative.
    pub fn mint_span_id(&mut self) -> EntityId {
        let id = EntityId(self.synthetic_next);
        self.synthetic_next -= 1;
        id
    }

    /// Opens a span. If the id is already open the old span is returned
    /// closed as Superseded rather than silently lost.
    pub fn span_start(&mut self, open: SpanOpen) -> Option<ClosedSpan> {
        let superseded = self.open.remove(&open.entity).map(|old| {
            tracing::warn!(
                "entity {:?} reopened at tick {} while still open",
                open.entity,
                open.tick
            );
            old.close(open.entity, open.tick, CloseReason::Superseded, None, None)
        });

        self.open.insert(
            open.entity,
            OpenSpan {
                kind: open.kind,
                owner: open.owner,
                subject: open.subject,
                start_tick: open.tick,
                origin: open.origin,
                deadline: open.deadline,
                detail: open.detail,
                samples: std::collections::BTreeMap::new(),
            },
        );

        superseded
    }

    /// Records a trajectory/position sample. A duplicate sample at the same
    /// tick for the same entity overwrites the previous one.
    pub fn span_sample(&mut self, entity: EntityId, tick: Tick, position: Vec3) {
        match self.open.get_mut(&entity) {
            Some(span) => {
                span.samples.insert(tick, position);
            }
            None => {
                tracing::debug!("sample for unknown entity {:?} at tick {}", entity, tick);
            }
        };
    }

    pub fn span_end(
        &mut self,
        entity: EntityId,
        tick: Tick,
        terminus: Option<Vec3>,
        picked_up_by: Option<PlayerSlot>,
    ) -> Option<ClosedSpan> {
        match self.open.remove(&entity) {
            Some(span) => Some(span.close(entity, tick, CloseReason::Terminal, terminus, picked_up_by)),
            None => {
                tracing::debug!("terminal event for unknown entity {:?} at tick {}", entity, tick);
                None
            }
        }
    }

    /// Closes every span whose deadline has passed at its deadline tick.
    pub fn expire_due(&mut self, tick: Tick) -> Vec<ClosedSpan> {
        let due: Vec<EntityId> = self
            .open
            .iter()
            .filter(|(_, span)| span.deadline.map(|d| d <= tick).unwrap_or(false))
            .map(|(entity, _)| *entity)
            .collect();

        due.into_iter()
            .filter_map(|entity| {
                let span = self.open.remove(&entity)?;
                let deadline = span.deadline.unwrap_or(tick);
                Some(span.close(entity, deadline, CloseReason::Expired, None, None))
            })
            .collect()
    }

    /// Force-closes everything still open for the round that just ended.
    /// Guarantees no span outlives its round.
    pub fn close_round(&mut self, end_tick: Tick) -> Vec<ClosedSpan> {
        self.drain(end_tick, CloseReason::RoundEnded)
    }

    /// Force-closes everything still open at stream end (truncated demo).
    pub fn close_stream(&mut self, end_tick: Tick) -> Vec<ClosedSpan> {
        self.drain(end_tick, CloseReason::StreamEnded)
    }

    pub fn open_spans(&self) -> usize {
        self.open.len()
    }

    fn drain(&mut self, end_tick: Tick, reason: CloseReason) -> Vec<ClosedSpan> {
        let mut closed: Vec<ClosedSpan> = self
            .open
            .drain()
            .map(|(entity, span)| span.close(entity, end_tick, reason, None, None))
            .collect();
        closed.sort_unstable_by_key(|span| (span.start_tick, span.entity));

        closed
    }
}

impl Default for EntityTracker {
    fn default() -> Self {
        Self::new()
    }
}
