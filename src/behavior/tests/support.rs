//! Shared helpers for behavior tests.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::behavior::domain::{BehaviorEvent, Detection, MarkerPosition, Point2};
use crate::registry::domain::MarkerId;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = DateTime::<Utc>::from_timestamp(1_760_000_000, 0).expect("valid timestamp");
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let delta = TimeDelta::from_std(by).expect("duration within range");
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

pub fn detection(id: i64, offset: f64) -> BehaviorEvent {
    BehaviorEvent::Detection(Detection::single(
        MarkerId::new(id),
        MarkerPosition::new(offset, 0.0, 1.0),
    ))
}

pub fn odometry(x: f64, y: f64) -> BehaviorEvent {
    BehaviorEvent::Odometry(Point2::new(x, y))
}
