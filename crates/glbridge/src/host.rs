//! Host execution-exclusivity handoff.
//!
//! A host runtime typically serialises its own code behind one global lock.
//! Long-running native calls give that lock up for their duration so other
//! host threads can make progress while the GPU works, then take it back
//! before any result is produced.

use std::thread::{self, ThreadId};

use parking_lot::lock_api::RawMutex as _;
use parking_lot::Mutex;

/// The host's execution-exclusivity lock, as seen from the bridge.
///
/// The bridge only ever calls `release` from a thread that entered it while
/// holding the lock, and always pairs a successful `release` with exactly one
/// `reacquire`.
pub trait HostLock: Send + Sync {
    /// Give the lock up. Returns `false` if it was not held, in which case no
    /// `reacquire` follows.
    fn release(&self) -> bool;

    fn reacquire(&self);
}

/// For hosts without an exclusivity lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHostLock;

impl HostLock for NoHostLock {
    fn release(&self) -> bool {
        false
    }

    fn reacquire(&self) {}
}

/// A ready-made exclusivity lock built on a `parking_lot` raw mutex.
///
/// The host calls [`acquire`](Self::acquire) before entering bridge code and
/// [`unlock`](Self::unlock) when it leaves; the bridge hands it off around
/// blocking native calls. Only the holding thread's own calls hand it off:
/// a thread that enters the bridge without holding it leaves another
/// thread's hold untouched.
pub struct HostExclusivity {
    raw: parking_lot::RawMutex,
    owner: Mutex<Option<ThreadId>>,
}

impl Default for HostExclusivity {
    fn default() -> Self {
        Self::new()
    }
}

impl HostExclusivity {
    pub const fn new() -> Self {
        Self {
            raw: parking_lot::RawMutex::INIT,
            owner: parking_lot::const_mutex(None),
        }
    }

    /// Block until the lock is held by the caller.
    pub fn acquire(&self) {
        self.raw.lock();
        self.claim();
    }

    pub fn try_acquire(&self) -> bool {
        let got = self.raw.try_lock();
        if got {
            self.claim();
        }
        got
    }

    /// # Safety
    /// The caller must hold the lock.
    pub unsafe fn unlock(&self) {
        *self.owner.lock() = None;
        unsafe { self.raw.unlock() };
    }

    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        *self.owner.lock() == Some(thread::current().id())
    }

    fn claim(&self) {
        *self.owner.lock() = Some(thread::current().id());
    }
}

impl HostLock for HostExclusivity {
    fn release(&self) -> bool {
        if !self.is_held_by_current_thread() {
            return false;
        }
        // Only the owner can have passed the check above.
        unsafe { self.unlock() };
        true
    }

    fn reacquire(&self) {
        self.acquire();
    }
}

/// Keeps the host lock released while alive; reacquires on drop, including
/// when the native call unwinds.
pub(crate) struct Released<'a> {
    lock: &'a dyn HostLock,
    released: bool,
}

impl<'a> Released<'a> {
    pub(crate) fn new(lock: &'a dyn HostLock) -> Self {
        let released = lock.release();
        Self { lock, released }
    }
}

impl Drop for Released<'_> {
    fn drop(&mut self) {
        if self.released {
            self.lock.reacquire();
        }
    }
}
