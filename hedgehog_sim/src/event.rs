// Game events and the synchronous event bus.
//
// `GameEvent` is everything the controller tells the outside world: invalid
// moves, food, pit and predator outcomes, conversations, curling, bush
// traps, timeouts, restarts and victory. It serializes with an `event` tag
// carrying the camelCase wire name (`invalidMove`, `foodCollected`, ...) and
// camelCase payload fields (`positionX`, `positionY`), which is what the
// presentation layer consumes.
//
// `EventBus` is a plain observer list. Subscribers are boxed `FnMut`
// callbacks, optionally filtered to one `EventKind`. `emit()` calls every
// matching subscriber synchronously, in registration order, before it
// returns; the emitter never looks at what subscribers do. `off()` removes a
// subscription by the id `on()` returned; unknown ids are ignored.
//
// See also: `controller.rs`, the only emitter during play.
//
// **Critical constraint: determinism.** Subscribers must not feed back into
// the simulation during `emit()`; the controller holds `&mut self` while
// emitting, so the borrow checker already rules that out.

use crate::direction::Direction;
use crate::npc::TalkResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    InvalidMove {
        direction: Direction,
    },
    FoodCollected {
        value: u32,
        position_x: i32,
        position_y: i32,
    },
    PitSurvived {
        position_x: i32,
        position_y: i32,
    },
    PitDeath {
        position_x: i32,
        position_y: i32,
    },
    PredatorDeath {
        predator: String,
        position_x: i32,
        position_y: i32,
    },
    PredatorSurvived {
        predator: String,
        position_x: i32,
        position_y: i32,
    },
    NpcTalk(TalkResult),
    HedgehogCurl,
    HedgehogUncurl,
    BushSurvived {
        position_x: i32,
        position_y: i32,
    },
    BushTrapDeath {
        position_x: i32,
        position_y: i32,
    },
    TimeOut,
    GameRestart,
    Victory {
        score: u32,
    },
}

/// Payload-free discriminant of `GameEvent`, used to filter subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    InvalidMove,
    FoodCollected,
    PitSurvived,
    PitDeath,
    PredatorDeath,
    PredatorSurvived,
    NpcTalk,
    HedgehogCurl,
    HedgehogUncurl,
    BushSurvived,
    BushTrapDeath,
    TimeOut,
    GameRestart,
    Victory,
}

impl EventKind {
    /// Wire name, as used in the serialized `event` tag.
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::InvalidMove => "invalidMove",
            EventKind::FoodCollected => "foodCollected",
            EventKind::PitSurvived => "pitSurvived",
            EventKind::PitDeath => "pitDeath",
            EventKind::PredatorDeath => "predatorDeath",
            EventKind::PredatorSurvived => "predatorSurvived",
            EventKind::NpcTalk => "npcTalk",
            EventKind::HedgehogCurl => "hedgehogCurl",
            EventKind::HedgehogUncurl => "hedgehogUncurl",
            EventKind::BushSurvived => "bushSurvived",
            EventKind::BushTrapDeath => "bushTrapDeath",
            EventKind::TimeOut => "timeOut",
            EventKind::GameRestart => "gameRestart",
            EventKind::Victory => "victory",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::InvalidMove { .. } => EventKind::InvalidMove,
            GameEvent::FoodCollected { .. } => EventKind::FoodCollected,
            GameEvent::PitSurvived { .. } => EventKind::PitSurvived,
            GameEvent::PitDeath { .. } => EventKind::PitDeath,
            GameEvent::PredatorDeath { .. } => EventKind::PredatorDeath,
            GameEvent::PredatorSurvived { .. } => EventKind::PredatorSurvived,
            GameEvent::NpcTalk(_) => EventKind::NpcTalk,
            GameEvent::HedgehogCurl => EventKind::HedgehogCurl,
            GameEvent::HedgehogUncurl => EventKind::HedgehogUncurl,
            GameEvent::BushSurvived { .. } => EventKind::BushSurvived,
            GameEvent::BushTrapDeath { .. } => EventKind::BushTrapDeath,
            GameEvent::TimeOut => EventKind::TimeOut,
            GameEvent::GameRestart => EventKind::GameRestart,
            GameEvent::Victory { .. } => EventKind::Victory,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Handle returned by `EventBus::on()`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type EventCallback = Box<dyn FnMut(&GameEvent)>;

struct Subscriber {
    id: SubscriptionId,
    filter: Option<EventKind>,
    callback: EventCallback,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event.
    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribe(Some(kind), Box::new(callback))
    }

    /// Subscribe to every event.
    pub fn on_any(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.subscribe(None, Box::new(callback))
    }

    fn subscribe(&mut self, filter: Option<EventKind>, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            filter,
            callback,
        });
        id
    }

    /// Remove a subscription. Returns false if `id` was not subscribed.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every matching subscriber, in registration order.
    pub fn emit(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for sub in &mut self.subscribers {
            if sub.filter.is_none_or(|k| k == kind) {
                (sub.callback)(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
