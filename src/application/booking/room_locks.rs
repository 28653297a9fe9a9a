//! Per-room async locks serializing check-and-write on the same room

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Hands out one mutex per room id. Different rooms never contend.
#[derive(Default)]
pub struct RoomLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `room_id`; released when the guard drops.
    pub async fn lock(&self, room_id: i32) -> OwnedMutexGuard<()> {
        let mutex = self.locks.entry(room_id).or_default().clone();
        mutex.lock_owned().await
    }

    /// Forget a deleted room's lock
    pub fn remove(&self, room_id: i32) {
        self.locks.remove(&room_id);
    }

    #[cfg(test)]
    pub(crate) fn is_tracked(&self, room_id: i32) -> bool {
        self.locks.contains_key(&room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_room_is_exclusive() {
        let locks = Arc::new(RoomLocks::new());
        let guard = locks.lock(1).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_rooms_do_not_contend() {
        let locks = RoomLocks::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(b.is_ok());
    }
}
