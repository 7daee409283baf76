//! Exclusive ownership of the device store by one long-running operation

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{DeployError, Result};
use crate::models::Activity;

/// Admits at most one scan or deployment at a time.
///
/// A rejected request leaves the holder undisturbed.
#[derive(Debug, Default)]
pub struct ActivityLock {
    current: Mutex<Option<Activity>>,
}

impl ActivityLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, activity: Activity) -> Result<ActivityGuard<'_>> {
        let mut current = self.lock();
        if let Some(active) = *current {
            return Err(DeployError::busy(active));
        }
        *current = Some(activity);
        Ok(ActivityGuard { owner: self })
    }

    pub fn current(&self) -> Option<Activity> {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Activity>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the activity when dropped.
#[derive(Debug)]
pub struct ActivityGuard<'a> {
    owner: &'a ActivityLock,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        *self.owner.lock() = None;
    }
}
