//! Integration test: host lock handoff
//!
//! Blocking native calls run with the host lock released and take it back
//! afterwards; everything else keeps it held.
//!
//! Run with: cargo test --test host_lock_test

use std::sync::{mpsc, Arc};
use std::thread;

use glbridge::consts::*;
use glbridge::{GlContext, HostExclusivity, HostLock, NoHostLock, SimDriver};
use parking_lot::Mutex;

type Observed = Arc<Mutex<Vec<(&'static str, bool)>>>;

/// A context whose driver records, for every native call, whether the host
/// lock was held while it ran.
fn observed_context(lock: &Arc<HostExclusivity>) -> (GlContext<SimDriver>, Observed) {
    let observed: Observed = Arc::new(Mutex::new(Vec::new()));
    let driver = SimDriver::new();
    {
        let lock = lock.clone();
        let observed = observed.clone();
        driver.set_call_hook(move |call| observed.lock().push((call, lock.is_locked())));
    }
    let ctx = GlContext::new(driver).with_host_lock(lock.clone());
    (ctx, observed)
}

fn held_during(observed: &Observed, call: &str) -> Vec<bool> {
    observed
        .lock()
        .iter()
        .filter(|(name, _)| *name == call)
        .map(|(_, held)| *held)
        .collect()
}

#[test]
fn test_lock_released_only_around_blocking_calls() {
    let lock = Arc::new(HostExclusivity::new());
    let (ctx, observed) = observed_context(&lock);

    lock.acquire();
    let vao = ctx.gen_vertex_arrays(1).unwrap()[0];
    ctx.bind_vertex_array(vao).unwrap();
    ctx.viewport(0, 0, 64, 64).unwrap();
    ctx.clear(GL_COLOR_BUFFER_BIT).unwrap();
    ctx.draw_arrays(GL_TRIANGLES, 0, 3).unwrap();
    ctx.draw_arrays_instanced(GL_TRIANGLES, 0, 3, 4).unwrap();
    assert!(lock.is_locked());

    assert_eq!(held_during(&observed, "glViewport"), vec![true]);
    assert_eq!(held_during(&observed, "glBindVertexArray"), vec![true]);
    assert_eq!(held_during(&observed, "glClear"), vec![false]);
    assert_eq!(held_during(&observed, "glDrawArrays"), vec![false]);
    assert_eq!(held_during(&observed, "glDrawArraysInstanced"), vec![false]);
    // The error check runs after the lock is back.
    assert!(held_during(&observed, "glGetError").iter().all(|held| *held));

    unsafe { lock.unlock() };
}

#[test]
fn test_other_host_threads_progress_during_blocking_call() {
    let lock = Arc::new(HostExclusivity::new());
    let progressed = Arc::new(Mutex::new(Vec::new()));
    let driver = SimDriver::new();
    {
        let lock = lock.clone();
        let progressed = progressed.clone();
        driver.set_call_hook(move |call| {
            if call != "glDrawArrays" && call != "glViewport" {
                return;
            }
            let other = lock.clone();
            let got = thread::spawn(move || {
                let got = other.try_acquire();
                if got {
                    unsafe { other.unlock() };
                }
                got
            })
            .join()
            .unwrap();
            progressed.lock().push((call, got));
        });
    }
    let ctx = GlContext::new(driver).with_host_lock(lock.clone());

    lock.acquire();
    let vao = ctx.gen_vertex_arrays(1).unwrap()[0];
    ctx.bind_vertex_array(vao).unwrap();
    ctx.viewport(0, 0, 8, 8).unwrap();
    ctx.draw_arrays(GL_POINTS, 0, 1).unwrap();
    assert!(lock.is_locked());
    unsafe { lock.unlock() };

    assert_eq!(
        *progressed.lock(),
        vec![("glViewport", false), ("glDrawArrays", true)]
    );
}

#[test]
fn test_lock_reacquired_when_call_fails() {
    let lock = Arc::new(HostExclusivity::new());
    let (ctx, _observed) = observed_context(&lock);

    lock.acquire();
    // No vertex array bound: the draw itself fails.
    assert!(ctx.draw_arrays(GL_TRIANGLES, 0, 3).is_err());
    assert!(lock.is_locked());
    unsafe { lock.unlock() };
}

#[test]
fn test_unheld_lock_is_left_alone() {
    let lock = Arc::new(HostExclusivity::new());
    let (ctx, observed) = observed_context(&lock);

    ctx.clear(GL_COLOR_BUFFER_BIT).unwrap();
    assert!(!lock.is_locked());
    assert_eq!(held_during(&observed, "glClear"), vec![false]);
}

#[test]
fn test_lock_held_by_another_thread_is_not_handed_off() {
    let lock = Arc::new(HostExclusivity::new());
    let (ctx, observed) = observed_context(&lock);
    let (held_tx, held_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let holder = {
        let lock = lock.clone();
        thread::spawn(move || {
            lock.acquire();
            held_tx.send(()).unwrap();
            done_rx.recv().unwrap();
            let still_ours = lock.is_held_by_current_thread();
            unsafe { lock.unlock() };
            still_ours
        })
    };
    held_rx.recv().unwrap();

    // This thread never acquired the lock, so the draw must not touch it.
    ctx.clear(GL_COLOR_BUFFER_BIT).unwrap();
    assert_eq!(held_during(&observed, "glClear"), vec![true]);
    assert!(lock.is_locked());
    assert!(!lock.is_held_by_current_thread());

    done_tx.send(()).unwrap();
    assert!(holder.join().unwrap());
    assert!(!lock.is_locked());
}

#[test]
fn test_no_host_lock() {
    assert!(!NoHostLock.release());
    NoHostLock.reacquire();

    let ctx = GlContext::new(SimDriver::new());
    let vao = ctx.gen_vertex_arrays(1).unwrap()[0];
    ctx.bind_vertex_array(vao).unwrap();
    ctx.draw_arrays(GL_LINES, 0, 2).unwrap();
    assert_eq!(ctx.driver().draws().len(), 1);
}
