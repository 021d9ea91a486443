#![cfg(not(feature = "loom"))]

use rand::Rng;
use ringbuffer_rs::{Config, RingBuffer};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_fifo_ordering_across_growth() {
    let rb = RingBuffer::new(2);

    const N: u64 = 10_000;

    for i in 0..N {
        rb.push(i);
    }
    assert_eq!(rb.len(), N as usize);

    let mut expected = 0;
    while let Some(item) = rb.pop() {
        assert_eq!(item, expected, "FIFO violation: expected {}, got {}", expected, item);
        expected += 1;
    }
    assert_eq!(expected, N);
}

#[test]
fn test_concurrent_pop_single_item() {
    // Two threads race for one item; only one may win.
    for _ in 0..10_000 {
        let rb = Arc::new(RingBuffer::new(4));
        rb.push(1);
        let barrier = Arc::new(Barrier::new(2));
        let successes = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let rb = Arc::clone(&rb);
                let barrier = Arc::clone(&barrier);
                let successes = Arc::clone(&successes);
                thread::spawn(move || {
                    barrier.wait();
                    if rb.pop().is_some() {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(successes.load(Ordering::SeqCst), 1, "item popped twice");
        assert_eq!(rb.len(), 0);
    }
}

#[test]
fn test_concurrent_pop_n_single_item() {
    for _ in 0..10_000 {
        let rb = Arc::new(RingBuffer::new(4));
        rb.push(1);
        let barrier = Arc::new(Barrier::new(2));
        let removed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let rb = Arc::clone(&rb);
                let barrier = Arc::clone(&barrier);
                let removed = Arc::clone(&removed);
                thread::spawn(move || {
                    barrier.wait();
                    if let Some(items) = rb.pop_n(1) {
                        removed.fetch_add(items.len(), Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(removed.load(Ordering::SeqCst), 1, "false positive item removal");
    }
}

#[test]
fn test_multi_producer_multi_consumer_no_loss() {
    const N_PRODUCERS: usize = 4;
    const N_CONSUMERS: usize = 4;
    const ITEMS_PER_PRODUCER: usize = 5_000;
    const TOTAL: usize = N_PRODUCERS * ITEMS_PER_PRODUCER;

    let rb = Arc::new(RingBuffer::new(8));
    let consumed = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..N_PRODUCERS)
        .map(|producer_id| {
            let rb = Arc::clone(&rb);
            thread::spawn(move || {
                for i in 0..ITEMS_PER_PRODUCER {
                    rb.push((producer_id, i));
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..N_CONSUMERS)
        .map(|_| {
            let rb = Arc::clone(&rb);
            let consumed = Arc::clone(&consumed);
            thread::spawn(move || {
                let mut local = Vec::new();
                while consumed.load(Ordering::SeqCst) < TOTAL {
                    if let Some(batch) = rb.pop_n(16) {
                        consumed.fetch_add(batch.len(), Ordering::SeqCst);
                        local.extend(batch);
                    } else {
                        thread::yield_now();
                    }
                }
                local
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }

    let mut seen = HashSet::with_capacity(TOTAL);
    let mut last_seen = vec![None; N_PRODUCERS];
    for handle in consumers {
        let local = handle.join().unwrap();
        // Within one consumer, items of one producer keep their push order.
        let mut per_consumer_last = vec![None; N_PRODUCERS];
        for (producer_id, i) in local {
            if let Some(prev) = per_consumer_last[producer_id] {
                assert!(i > prev, "producer {} reordered: {} after {}", producer_id, i, prev);
            }
            per_consumer_last[producer_id] = Some(i);
            last_seen[producer_id] = last_seen[producer_id].max(Some(i));
            assert!(seen.insert((producer_id, i)), "duplicate item ({}, {})", producer_id, i);
        }
    }

    assert_eq!(seen.len(), TOTAL);
    assert!(rb.is_empty());
    for last in last_seen {
        assert_eq!(last, Some(ITEMS_PER_PRODUCER - 1));
    }
}

#[test]
fn test_push_front_requeue_under_contention() {
    const N_WORKERS: usize = 4;
    const JOBS: usize = 2_000;

    // Workers pop a job, and re-queue it at the front once before completing it.
    let rb = Arc::new(RingBuffer::new(4));
    for job in 0..JOBS {
        rb.push((job, false));
    }
    let done = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..N_WORKERS)
        .map(|_| {
            let rb = Arc::clone(&rb);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut completed = Vec::new();
                while done.load(Ordering::SeqCst) < JOBS {
                    match rb.pop() {
                        Some((job, false)) => rb.push_front((job, true)),
                        Some((job, true)) => {
                            completed.push(job);
                            done.fetch_add(1, Ordering::SeqCst);
                        }
                        None => thread::yield_now(),
                    }
                }
                completed
            })
        })
        .collect();

    let mut all: Vec<usize> = workers
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    all.sort_unstable();

    assert_eq!(all, (0..JOBS).collect::<Vec<_>>());
    assert!(rb.is_empty());
}

#[test]
fn test_len_matches_at_quiescence() {
    const N_THREADS: u64 = 4;
    const OPS: u64 = 2_000;

    let rb = Arc::new(RingBuffer::new(16));
    let pushed = Arc::new(AtomicUsize::new(0));
    let popped = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..N_THREADS)
        .map(|t| {
            let rb = Arc::clone(&rb);
            let pushed = Arc::clone(&pushed);
            let popped = Arc::clone(&popped);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..OPS {
                    match rng.gen_range(0..4) {
                        0 => {
                            rb.push(t * OPS + i);
                            pushed.fetch_add(1, Ordering::SeqCst);
                        }
                        1 => {
                            rb.push_front(t * OPS + i);
                            pushed.fetch_add(1, Ordering::SeqCst);
                        }
                        2 => {
                            if rb.pop().is_some() {
                                popped.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                        _ => {
                            if let Some(items) = rb.pop_n(rng.gen_range(0..8)) {
                                popped.fetch_add(items.len(), Ordering::SeqCst);
                            }
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = pushed.load(Ordering::SeqCst) - popped.load(Ordering::SeqCst);
    assert_eq!(rb.len(), expected);
    assert_eq!(rb.drain().len(), expected);
    assert!(rb.is_empty());
}

#[test]
fn test_clear_while_shared() {
    let rb = Arc::new(RingBuffer::with_config(Config::default().with_capacity(4)).unwrap());
    for i in 0..100 {
        rb.push(i);
    }

    let clearer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || rb.clear())
    };
    clearer.join().unwrap();

    assert_eq!(rb.len(), 0);
    rb.push(7);
    assert_eq!(rb.pop(), Some(7));
    assert_eq!(rb.pop(), None);
}

#[test]
fn test_ring_buffer_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RingBuffer<String>>();
    assert_send_sync::<RingBuffer<Box<[u8]>>>();
}
