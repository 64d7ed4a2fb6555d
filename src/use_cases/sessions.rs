// Connected sessions as seen by the simulation task.

use super::types::Outbound;
use crate::domain::ShipId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct Session {
    pub ship_id: ShipId,
    outbound: Outbound,
    /// Set on disconnect; the session is dropped at the end of the tick.
    marked: bool,
    dropped_frames: u64,
    last_drop_log: Instant,
}

impl Session {
    pub fn new(ship_id: ShipId, outbound: Outbound) -> Self {
        Self {
            ship_id,
            outbound,
            marked: false,
            dropped_frames: 0,
            last_drop_log: Instant::now() - LOG_THROTTLE,
        }
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Queues a frame without blocking. A full queue drops the frame; a closed one
    /// marks the session.
    fn send(&mut self, frame: &Arc<str>) {
        match self.outbound.try_send(Arc::clone(frame)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped_frames += 1;
                if should_log(&mut self.last_drop_log) {
                    warn!(
                        ship_id = self.ship_id,
                        dropped = self.dropped_frames,
                        "outbound queue full; dropping frame"
                    );
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!(ship_id = self.ship_id, "outbound queue closed");
                self.marked = true;
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<ShipId, Session>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.ship_id, session);
    }

    pub fn get(&self, ship_id: ShipId) -> Option<&Session> {
        self.sessions.get(&ship_id)
    }

    pub fn contains(&self, ship_id: ShipId) -> bool {
        self.sessions.contains_key(&ship_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns false if no session exists for the ship.
    pub fn mark(&mut self, ship_id: ShipId) -> bool {
        match self.sessions.get_mut(&ship_id) {
            Some(session) => {
                session.marked = true;
                true
            }
            None => false,
        }
    }

    pub fn is_marked(&self, ship_id: ShipId) -> bool {
        self.sessions.get(&ship_id).is_some_and(Session::is_marked)
    }

    /// Marks sessions whose connection task has gone away, then sends the frame to
    /// every remaining session.
    pub fn broadcast(&mut self, frame: &Arc<str>) {
        for session in self.sessions.values_mut() {
            if !session.marked && session.outbound.is_closed() {
                session.marked = true;
            }
            if session.marked {
                continue;
            }
            session.send(frame);
        }
    }

    /// Drops marked sessions and returns their ship ids.
    pub fn reap(&mut self) -> Vec<ShipId> {
        let gone: Vec<ShipId> = self
            .sessions
            .values()
            .filter(|s| s.marked)
            .map(|s| s.ship_id)
            .collect();
        for ship_id in &gone {
            self.sessions.remove(ship_id);
        }
        gone
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}
