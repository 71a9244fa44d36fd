use fast_queue_rs::{ChunkedQueue, CircularQueue, FifoQueue, LinkedQueue, SyncQueue};
use std::collections::VecDeque;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

// Number of operations per run
const OPERATIONS: usize = 1_000_000;
// Elements kept queued while cycling
const STEADY_LEN: usize = 1024;
// Warmup runs
const WARMUP_RUNS: usize = 3;
// Timing runs
const TIMING_RUNS: usize = 10;

// Benchmark results
struct BenchmarkResult {
    name: String,
    burst_mops: Vec<f64>,     // Million operations per second
    steady_mops: Vec<f64>,    // Million operations per second
    contended_mops: Vec<f64>, // Million operations per second, behind a SyncQueue
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn mops(duration: Duration) -> f64 {
    OPERATIONS as f64 / duration.as_secs_f64() / 1_000_000.0
}

fn main() {
    println!("FastQueue Rust Benchmarks");
    println!("-------------------------\n");

    let num_cpus = num_cpus::get();
    println!("Number of CPUs: {}", num_cpus);

    let mut results = vec![
        benchmark_queue::<CircularQueue<u64>>("CircularQueue<u64>"),
        benchmark_queue::<ChunkedQueue<u64>>("ChunkedQueue<u64>"),
        benchmark_queue::<LinkedQueue<u64>>("LinkedQueue<u64>"),
    ];
    results.push(benchmark_baseline());

    println!("\nSummary Results:");
    println!(
        "{:<24} {:>15} {:>15} {:>20}",
        "Queue Type", "Burst (Mops/s)", "Steady (Mops/s)", "Contended (Mops/s)"
    );
    println!(
        "{:<24} {:>15} {:>15} {:>20}",
        "---------", "--------------", "---------------", "------------------"
    );

    for result in results {
        println!(
            "{:<24} {:>15.2} {:>15.2} {:>20.2}",
            result.name,
            mean(&result.burst_mops),
            mean(&result.steady_mops),
            mean(&result.contended_mops)
        );
    }
}

fn benchmark_queue<Q>(name: &str) -> BenchmarkResult
where
    Q: FifoQueue<u64> + Default + Send + 'static,
{
    println!("\nBenchmarking {}", name);

    let mut burst_mops = Vec::new();
    let mut steady_mops = Vec::new();
    let mut contended_mops = Vec::new();

    for run in 0..(WARMUP_RUNS + TIMING_RUNS) {
        let is_warmup = run < WARMUP_RUNS;

        // Fill then drain: every run grows and shrinks the queue
        let mut queue = Q::default();
        let start = Instant::now();
        for i in 0..OPERATIONS / 2 {
            queue.enqueue(i as u64);
        }
        while queue.dequeue().is_ok() {}
        let burst = start.elapsed();

        // Constant length: no resizing at all
        let mut queue = Q::default();
        for i in 0..STEADY_LEN {
            queue.enqueue(i as u64);
        }
        let start = Instant::now();
        for i in 0..OPERATIONS / 2 {
            queue.enqueue(i as u64);
            let _ = queue.dequeue();
        }
        let steady = start.elapsed();

        let contended = contended_run::<Q>((num_cpus::get() / 2).max(1));

        if !is_warmup {
            println!(
                "  run {}: burst {:.2} Mops/s, steady {:.2} Mops/s, contended {:.2} Mops/s",
                run - WARMUP_RUNS,
                mops(burst),
                mops(steady),
                mops(contended)
            );
            burst_mops.push(mops(burst));
            steady_mops.push(mops(steady));
            contended_mops.push(mops(contended));
        }
    }

    BenchmarkResult {
        name: name.to_string(),
        burst_mops,
        steady_mops,
        contended_mops,
    }
}

/// `threads` producers and as many consumers sharing one `SyncQueue`
fn contended_run<Q>(threads: usize) -> Duration
where
    Q: FifoQueue<u64> + Default + Send + 'static,
{
    let queue = Arc::new(SyncQueue::<u64, Q>::default());
    let barrier = Arc::new(Barrier::new(threads * 2 + 1));
    let per_thread = OPERATIONS / 2 / threads;

    let mut handles = Vec::with_capacity(threads * 2);

    // Start consumers
    for _ in 0..threads {
        let q = queue.clone();
        let b = barrier.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            let mut count = 0;
            while count < per_thread {
                if q.dequeue().is_ok() {
                    count += 1;
                }
            }
        }));
    }

    // Start producers
    for _ in 0..threads {
        let q = queue.clone();
        let b = barrier.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            for i in 0..per_thread {
                q.enqueue(i as u64);
            }
        }));
    }

    barrier.wait();
    let start = Instant::now();
    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

fn benchmark_baseline() -> BenchmarkResult {
    println!("\nBenchmarking VecDeque<u64> (baseline)");

    let mut burst_mops = Vec::new();
    let mut steady_mops = Vec::new();

    for run in 0..(WARMUP_RUNS + TIMING_RUNS) {
        let mut queue = VecDeque::new();
        let start = Instant::now();
        for i in 0..OPERATIONS / 2 {
            queue.push_back(i as u64);
        }
        while queue.pop_front().is_some() {}
        queue.shrink_to_fit();
        let burst = start.elapsed();

        let mut queue: VecDeque<u64> = (0..STEADY_LEN as u64).collect();
        let start = Instant::now();
        for i in 0..OPERATIONS / 2 {
            queue.push_back(i as u64);
            queue.pop_front();
        }
        let steady = start.elapsed();

        if run >= WARMUP_RUNS {
            burst_mops.push(mops(burst));
            steady_mops.push(mops(steady));
        }
    }

    BenchmarkResult {
        name: "VecDeque<u64>".to_string(),
        burst_mops,
        steady_mops,
        contended_mops: Vec::new(),
    }
}
