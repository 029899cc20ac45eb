//! Event fan-out to battle viewers.
//!
//! Each session carries two subscriber groups: the attacker's own channel
//! and a public spectator channel. Both receive the same stream; the
//! groups exist so the embedding transport can authorize them differently.
//! Sending never blocks, and a subscriber whose receiver is gone is
//! pruned on the next publish.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use rampart_core::constants::MOVE_BROADCAST_PROBABILITY;
use rampart_core::events::{BattleEvent, BattleEventKind};

use crate::lock;

pub struct EventBroadcaster {
    attackers: Mutex<Vec<Sender<BattleEvent>>>,
    spectators: Mutex<Vec<Sender<BattleEvent>>>,
    /// Drives the move-event throttle only; simulation state never
    /// touches this rng.
    rng: Mutex<ChaCha8Rng>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0);
        Self {
            attackers: Mutex::new(Vec::new()),
            spectators: Mutex::new(Vec::new()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Subscribe on the attacker channel.
    pub fn subscribe_attacker(&self) -> Receiver<BattleEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.attackers).push(tx);
        rx
    }

    /// Subscribe on the public spectator channel.
    pub fn subscribe_spectator(&self) -> Receiver<BattleEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.spectators).push(tx);
        rx
    }

    /// Deliver a batch of events to every live subscriber of both groups.
    ///
    /// `TROOP_MOVE` events are forwarded with `MOVE_BROADCAST_PROBABILITY`
    /// to cap stream volume; every other kind is always delivered.
    pub fn publish(&self, events: &[BattleEvent]) {
        if events.is_empty() {
            return;
        }

        let forwarded: Vec<&BattleEvent> = {
            let mut rng = lock(&self.rng);
            events
                .iter()
                .filter(|event| match event.kind {
                    BattleEventKind::TroopMove { .. } => {
                        rng.gen::<f64>() < MOVE_BROADCAST_PROBABILITY
                    }
                    _ => true,
                })
                .collect()
        };
        if forwarded.is_empty() {
            return;
        }

        Self::send_to_group(&self.attackers, &forwarded, "attacker");
        Self::send_to_group(&self.spectators, &forwarded, "spectator");
    }

    fn send_to_group(
        group: &Mutex<Vec<Sender<BattleEvent>>>,
        events: &[&BattleEvent],
        label: &str,
    ) {
        let mut senders = lock(group);
        let before = senders.len();
        senders.retain(|sender| {
            events
                .iter()
                .all(|event| sender.send((*event).clone()).is_ok())
        });
        let pruned = before - senders.len();
        if pruned > 0 {
            debug!(channel = label, pruned, "pruned disconnected subscribers");
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
