use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_queue_rs::{ChunkedQueue, CircularQueue, FifoQueue, LinkedQueue, SyncQueue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

// Number of operations per benchmark
const OPS_PER_BENCH: usize = 1_000_000;
// Elements kept queued while cycling
const STEADY_LEN: usize = 1024;

/// Fill to `burst`, then drain, repeatedly; exercises growth and shrinking
fn burst<Q: FifoQueue<u64> + Default>(burst: usize) {
    let mut queue = Q::default();
    for _ in 0..OPS_PER_BENCH / burst {
        for i in 0..burst {
            queue.enqueue(black_box(i as u64));
        }
        for _ in 0..burst {
            black_box(queue.dequeue().ok());
        }
    }
}

/// One enqueue and one dequeue per step at a constant length
fn steady<Q: FifoQueue<u64> + Default>() {
    let mut queue = Q::default();
    for i in 0..STEADY_LEN {
        queue.enqueue(i as u64);
    }
    for i in 0..OPS_PER_BENCH {
        queue.enqueue(black_box(i as u64));
        black_box(queue.dequeue().ok());
    }
}

fn bench_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_thread");
    group.throughput(Throughput::Elements(OPS_PER_BENCH as u64));

    for size in [16usize, 1024, 65536].iter() {
        group.bench_with_input(BenchmarkId::new("CircularQueue", size), size, |b, &size| {
            b.iter(|| burst::<CircularQueue<u64>>(size))
        });
        group.bench_with_input(BenchmarkId::new("ChunkedQueue", size), size, |b, &size| {
            b.iter(|| burst::<ChunkedQueue<u64>>(size))
        });
        group.bench_with_input(BenchmarkId::new("LinkedQueue", size), size, |b, &size| {
            b.iter(|| burst::<LinkedQueue<u64>>(size))
        });
        // Baseline
        group.bench_with_input(BenchmarkId::new("VecDeque", size), size, |b, &size| {
            b.iter(|| {
                let mut queue = VecDeque::new();
                for _ in 0..OPS_PER_BENCH / size {
                    for i in 0..size {
                        queue.push_back(black_box(i as u64));
                    }
                    for _ in 0..size {
                        black_box(queue.pop_front());
                    }
                }
            })
        });
    }

    group.bench_function("CircularQueue/steady", |b| b.iter(steady::<CircularQueue<u64>>));
    group.bench_function("ChunkedQueue/steady", |b| b.iter(steady::<ChunkedQueue<u64>>));
    group.bench_function("LinkedQueue/steady", |b| b.iter(steady::<LinkedQueue<u64>>));

    group.finish();
}

fn contended<Q>(threads: usize)
where
    Q: FifoQueue<u64> + Default + Send + 'static,
{
    let queue = Arc::new(SyncQueue::<u64, Q>::default());
    let barrier = Arc::new(Barrier::new(threads * 2));
    let consumed = Arc::new(AtomicUsize::new(0));
    let per_thread = OPS_PER_BENCH / threads;
    let total = per_thread * threads;

    let mut handles = Vec::with_capacity(threads * 2);

    // Producers
    for _ in 0..threads {
        let q = queue.clone();
        let b = barrier.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            for i in 0..per_thread {
                q.enqueue(black_box(i as u64));
            }
        }));
    }

    // Consumers
    for _ in 0..threads {
        let q = queue.clone();
        let b = barrier.clone();
        let consumed = consumed.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            while consumed.load(Ordering::Relaxed) < total {
                if let Ok(x) = q.dequeue() {
                    black_box(x);
                    consumed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_contended");
    group.throughput(Throughput::Elements(OPS_PER_BENCH as u64));
    group.sample_size(10);

    // Test different thread counts
    for threads in [1, 2, 4].iter() {
        // Skip configurations that would require more than available CPUs
        if *threads * 2 > num_cpus::get() {
            continue;
        }

        group.bench_with_input(
            BenchmarkId::new("SyncQueue<CircularQueue>", threads),
            threads,
            |b, &threads| b.iter(|| contended::<CircularQueue<u64>>(threads)),
        );
        group.bench_with_input(
            BenchmarkId::new("SyncQueue<ChunkedQueue>", threads),
            threads,
            |b, &threads| b.iter(|| contended::<ChunkedQueue<u64>>(threads)),
        );
        group.bench_with_input(
            BenchmarkId::new("SyncQueue<LinkedQueue>", threads),
            threads,
            |b, &threads| b.iter(|| contended::<LinkedQueue<u64>>(threads)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread, bench_contended);
criterion_main!(benches);
