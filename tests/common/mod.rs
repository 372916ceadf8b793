#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use entry_repo::repository::EntryRepository;

pub const WAIT: Duration = Duration::from_secs(5);

/// Fixed timestamp `secs` seconds after an arbitrary epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Wait until the repository's models satisfy `done`.
pub async fn wait_for_models<R, F>(repository: &R, done: F)
where
    R: EntryRepository,
    F: Fn(&[R::Entry]) -> bool,
{
    let mut models = repository.subscribe();
    tokio::time::timeout(WAIT, async {
        loop {
            let satisfied = done(models.borrow_and_update().as_slice());
            if satisfied {
                return;
            }
            models.changed().await.expect("live query dropped");
        }
    })
    .await
    .expect("timed out waiting for models");
}

/// Poll `condition` until it holds.
pub async fn eventually<F: FnMut() -> bool>(mut condition: F) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
