//! Work queue with retries.
//!
//! Workers pull jobs from a shared `RingBuffer`. A job that fails is put back
//! with `push_front` so it is retried before anything queued after it.
//!
//! Run with: `cargo run --example work_queue`

use ringbuffer_rs::{Config, RingBuffer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
struct Job {
    id: usize,
    attempts: u32,
}

fn main() {
    const JOBS: usize = 1_000;
    const WORKERS: usize = 4;

    let config = Config::default().with_capacity(16).with_metrics(true);
    let queue = Arc::new(RingBuffer::with_config(config).expect("valid config"));

    for id in 0..JOBS {
        queue.push(Job { id, attempts: 0 });
    }
    println!("queued {} jobs, capacity now {}", queue.len(), queue.capacity());

    let finished = Arc::new(AtomicUsize::new(0));
    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let queue = Arc::clone(&queue);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                let mut done = 0;
                while finished.load(Ordering::Acquire) < JOBS {
                    let Some(batch) = queue.pop_n(8) else {
                        thread::yield_now();
                        continue;
                    };

                    // Every third job fails on its first attempt.
                    for mut job in batch {
                        if job.id % 3 == 0 && job.attempts == 0 {
                            job.attempts += 1;
                            queue.push_front(job);
                        } else {
                            done += 1;
                            finished.fetch_add(1, Ordering::AcqRel);
                        }
                    }
                }
                println!("worker {worker} finished {done} jobs");
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let metrics = queue.metrics();
    println!(
        "pushed {} | retried {} | popped {} | grows {}",
        metrics.pushed, metrics.pushed_front, metrics.popped, metrics.grows
    );
    assert!(queue.is_empty());
}
