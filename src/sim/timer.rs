//! Cooperative timer scheduler
//!
//! Every periodic or delayed action in the game (fuse, color tick, removal
//! delay, projectile lifetime, shot cooldown, spawners) is an entry here,
//! measured in simulation ticks. Entries that belong to an entity are
//! cancelled together when the entity goes away.

use super::state::EntityId;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Cube fuse ran out
    CubeFuse(EntityId),
    /// Cube color update
    CubeColor(EntityId),
    /// Exploded cube leaves the scene
    CubeRemove(EntityId),
    /// Projectile lifetime ended
    ProjectileExpire(EntityId),
    /// Ambient fire lifetime ended
    FireExpire(EntityId),
    /// Player may shoot again
    ShotCooldown,
    /// Spawn a cube on the play area
    CubeSpawner,
    /// Spawn an ambient fire on the play area
    FireSpawner,
}

impl TimerEvent {
    /// Entity whose lifetime bounds this timer (None for controller timers)
    pub fn owner(&self) -> Option<EntityId> {
        match *self {
            TimerEvent::CubeFuse(id)
            | TimerEvent::CubeColor(id)
            | TimerEvent::CubeRemove(id)
            | TimerEvent::ProjectileExpire(id)
            | TimerEvent::FireExpire(id) => Some(id),
            TimerEvent::ShotCooldown | TimerEvent::CubeSpawner | TimerEvent::FireSpawner => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::CubeFuse(_) => "cube fuse",
            TimerEvent::CubeColor(_) => "cube color",
            TimerEvent::CubeRemove(_) => "cube removal",
            TimerEvent::ProjectileExpire(_) => "projectile expiry",
            TimerEvent::FireExpire(_) => "fire expiry",
            TimerEvent::ShotCooldown => "shot cooldown",
            TimerEvent::CubeSpawner => "cube spawner",
            TimerEvent::FireSpawner => "fire spawner",
        }
    }
}

/// Handle returned by [`Scheduler::schedule`], usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    event: TimerEvent,
    due: u64,
    /// Repeat period in ticks (None = one-shot)
    period: Option<u64>,
}

/// Tick-based scheduler with deterministic firing order (due tick, then id)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once, `delay` ticks after `now`
    pub fn schedule(&mut self, now: u64, delay: u64, event: TimerEvent) -> TimerId {
        self.push(now + delay.max(1), None, event)
    }

    /// Fire `event` every `period` ticks, first at `now + period`
    pub fn schedule_repeating(&mut self, now: u64, period: u64, event: TimerEvent) -> TimerId {
        let period = period.max(1);
        self.push(now + period, Some(period), event)
    }

    fn push(&mut self, due: u64, period: Option<u64>, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            event,
            due,
            period,
        });
        id
    }

    /// Cancel a single timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every timer owned by `owner`
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.event.owner() != Some(owner));
        before - self.entries.len()
    }

    /// Cancel every timer matching `event` exactly
    pub fn cancel_event(&mut self, event: TimerEvent) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.event != event);
        before - self.entries.len()
    }

    pub fn is_scheduled(&self, event: TimerEvent) -> bool {
        self.entries.iter().any(|e| e.event == event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect everything due at or before `now`.
    ///
    /// Repeating timers are rescheduled; one that fell several periods behind
    /// fires once per missed period.
    pub fn advance(&mut self, now: u64) -> Vec<TimerEvent> {
        let mut due: Vec<(u64, TimerId, TimerEvent)> = Vec::new();

        self.entries.retain_mut(|entry| {
            while entry.due <= now {
                due.push((entry.due, entry.id, entry.event));
                match entry.period {
                    Some(period) => entry.due += period,
                    None => return false,
                }
            }
            true
        });

        due.sort_by_key(|&(at, id, _)| (at, id));
        due.into_iter().map(|(_, _, event)| event).collect()
    }
}
