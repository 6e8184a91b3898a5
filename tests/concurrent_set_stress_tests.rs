#![cfg(feature = "concurrent")]
//! Multi-threaded stress tests for ConcurrentSet.
//!
//! These run real OS threads against one shared set and check the final
//! state, so a lost update or a torn store shows up as a wrong count.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rstest::rstest;
use uniset::concurrent::ConcurrentSet;

fn shared_set() -> Arc<ConcurrentSet<usize>> {
    Arc::new(ConcurrentSet::new())
}

#[rstest]
#[case(2, 1_000)]
#[case(8, 500)]
#[case(16, 250)]
fn test_distinct_inserts_are_never_lost(#[case] threads: usize, #[case] per_thread: usize) {
    let set = shared_set();
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let set = Arc::clone(&set);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for offset in 0..per_thread {
                    assert!(set.insert(worker * per_thread + offset));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(set.len(), threads * per_thread);
}

#[rstest]
fn test_overlapping_inserts_are_counted_once() {
    let set = shared_set();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let fresh = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let set = Arc::clone(&set);
            let barrier = Arc::clone(&barrier);
            let fresh = Arc::clone(&fresh);
            thread::spawn(move || {
                barrier.wait();
                for element in 0..1_000 {
                    if set.insert(element) {
                        fresh.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(set.len(), 1_000);
    assert_eq!(fresh.load(Ordering::Relaxed), 1_000);
}

/// The writer toggles between two complete generations of the store. A
/// reader must only ever see one full generation, never a mix.
#[rstest]
fn test_readers_never_observe_torn_store() {
    const GENERATION_SIZE: usize = 64;
    let even: Vec<usize> = (0..GENERATION_SIZE).map(|x| x * 2).collect();
    let odd: Vec<usize> = (0..GENERATION_SIZE).map(|x| x * 2 + 1).collect();

    let set: Arc<ConcurrentSet<usize>> = Arc::new(ConcurrentSet::from_slice(&even));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let set = Arc::clone(&set);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let keys: Vec<usize> = set.keys();
                    assert_eq!(keys.len(), GENERATION_SIZE);
                    let parity = keys[0] % 2;
                    assert!(keys.iter().all(|key| key % 2 == parity));
                }
            })
        })
        .collect();

    for round in 0..500 {
        let next = if round % 2 == 0 { &odd } else { &even };
        set.replace_with(next.iter().copied());
    }
    stop.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
}

/// Same shape as above, but the writer flips generations through snapshot
/// pipelines. `x ^ 1` maps every even key to its odd neighbour and back, so
/// each commit swaps in one complete generation.
#[rstest]
fn test_readers_never_observe_torn_snapshot_commit() {
    const GENERATION_SIZE: usize = 64;
    let even: Vec<usize> = (0..GENERATION_SIZE).map(|x| x * 2).collect();

    let set: Arc<ConcurrentSet<usize>> = Arc::new(ConcurrentSet::from_slice(&even));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let set = Arc::clone(&set);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let keys = set.keys();
                    assert_eq!(keys.len(), GENERATION_SIZE);
                    let parity = keys[0] % 2;
                    assert!(keys.iter().all(|key| key % 2 == parity));
                }
            })
        })
        .collect();

    for _ in 0..500 {
        let committed = set.pipeline().map(|x| x ^ 1).collect();
        assert_eq!(committed, GENERATION_SIZE);
    }
    stop.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }

    // An even number of flips lands back on the starting generation.
    let mut keys = set.keys();
    keys.sort_unstable();
    assert_eq!(keys, even);
}

#[rstest]
fn test_snapshot_commit_overwrites_inserts_made_after_snapshot() {
    let set = shared_set();
    set.insert_all([1, 2, 3]);

    let pipeline = set.pipeline().filter(|x| *x > 1);

    let inserter = {
        let set = Arc::clone(&set);
        thread::spawn(move || assert!(set.insert(99)))
    };
    inserter.join().unwrap();
    assert!(set.contains(&99));

    // Last writer wins: the commit swaps in the snapshot-derived set.
    assert_eq!(pipeline.collect(), 2);
    let mut keys = set.keys();
    keys.sort_unstable();
    assert_eq!(keys, vec![2, 3]);
}

#[rstest]
fn test_readers_during_insert_delete_cycles() {
    let set = shared_set();
    let stop = Arc::new(AtomicBool::new(false));
    set.insert_all(0..10);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let set = Arc::clone(&set);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let size = set.len();
                    assert!((10..=11).contains(&size));
                    assert!(set.contains(&0));
                }
            })
        })
        .collect();

    for _ in 0..2_000 {
        assert!(set.insert(10));
        assert!(set.delete(&10));
    }
    stop.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(set.len(), 10);
}

#[rstest]
fn test_exclusive_pipelines_do_not_lose_inserts() {
    let set = shared_set();
    let threads = 4;
    let barrier = Arc::new(Barrier::new(threads + 1));

    let inserters: Vec<_> = (0..threads)
        .map(|worker| {
            let set = Arc::clone(&set);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for offset in 0..250 {
                    set.insert(worker * 1_000 + offset);
                }
            })
        })
        .collect();

    barrier.wait();
    for _ in 0..100 {
        // Identity transform under exclusive mode: no concurrent insert may be
        // overwritten by the commit.
        set.pipeline_exclusive().filter(|_| true).collect();
    }

    for inserter in inserters {
        inserter.join().unwrap();
    }
    assert_eq!(set.len(), threads * 250);
}

#[rstest]
fn test_reentry_panic_is_per_thread() {
    let set = shared_set();
    set.insert(1);

    let panicking = {
        let set = Arc::clone(&set);
        thread::spawn(move || {
            set.for_each(|_| {
                set.insert(2);
            });
        })
    };
    assert!(panicking.join().is_err());

    // The panicking thread's scope was released during unwinding.
    assert!(set.insert(3));
    let mut keys = set.keys();
    keys.sort_unstable();
    assert_eq!(keys, vec![1, 3]);
}
