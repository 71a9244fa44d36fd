use fast_queue_rs::{CircularQueue, DynamicArgs, SyncQueue, Value};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=fast_queue_rs=debug shows every resize
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("FastQueue Rust Example");
    println!("----------------------\n");

    indexing();
    dynamic_arguments();
    producers_and_consumers();
}

fn indexing() {
    let mut queue: CircularQueue<u32> = (0..1000).collect();
    println!("Queue of {} elements, capacity {}", queue.len(), queue.capacity());
    println!("queue[0] = {}, queue[-1] = {}", queue[0], queue[-1]);

    queue[-1] = 10;
    println!("After queue[-1] = 10: last element is {:?}", queue.back());

    match queue.get(1000) {
        Ok(x) => println!("queue[1000] = {}", x),
        Err(err) => println!("queue[1000]: {}", err),
    }

    while queue.len() > 10 {
        let _ = queue.dequeue();
    }
    println!("Drained to {} elements, capacity {}\n", queue.len(), queue.capacity());
}

fn dynamic_arguments() {
    let queue = CircularQueue::<Value>::from_args(vec![Value::range(0, 5)]);
    println!("from_args(range(0, 5)) -> {:?}", queue);

    let err = CircularQueue::<Value>::from_args(vec![Value::Int(0)]);
    println!("from_args(0) -> {:?}\n", err);
}

fn producers_and_consumers() {
    // Configuration
    const PRODUCERS: usize = 2; // Number of producer threads
    const CONSUMERS: usize = 2; // Number of consumer threads
    const N: u32 = 100_000; // Each producer enqueues this many elements

    // Create a queue object shared between all producers and consumers
    let queue = Arc::new(SyncQueue::<u32>::new());

    println!("Starting {} producers and {} consumers", PRODUCERS, CONSUMERS);
    println!("Each producer will enqueue {} elements\n", N);

    let start_time = Instant::now();

    // Start the consumers
    let mut consumer_threads = Vec::with_capacity(CONSUMERS);
    for _ in 0..CONSUMERS {
        let q = queue.clone();
        consumer_threads.push(thread::spawn(move || {
            let mut local_sum = 0u64;
            loop {
                // Poll without an error; a 0 is the termination signal
                if q.peek().is_none() {
                    thread::yield_now();
                    continue;
                }
                match q.dequeue() {
                    Ok(0) => break,
                    Ok(n) => local_sum += n as u64,
                    Err(_) => continue,
                }
            }
            local_sum
        }));
    }

    // Start the producers
    let mut producer_threads = Vec::with_capacity(PRODUCERS);
    for _ in 0..PRODUCERS {
        let q = queue.clone();
        producer_threads.push(thread::spawn(move || {
            // Enqueue elements in descending order [N, 1]
            for n in (1..=N).rev() {
                q.enqueue(n);
            }
        }));
    }

    // Wait for all producers to finish
    for handle in producer_threads {
        handle.join().unwrap();
    }

    // Tell consumers to terminate by enqueuing one 0 for each consumer
    for _ in 0..CONSUMERS {
        queue.enqueue(0);
    }

    let sums: Vec<u64> = consumer_threads
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    let total_sum: u64 = sums.iter().sum();

    // The expected sum is N*(N+1)/2 * PRODUCERS
    let expected_sum: u64 = (N as u64 * (N as u64 + 1) / 2) * PRODUCERS as u64;

    println!("Execution time: {:?}", start_time.elapsed());
    println!("Total sum: {}", total_sum);
    println!("Expected sum: {}", expected_sum);

    if total_sum != expected_sum {
        println!("ERROR: Sum mismatch! Difference: {}", total_sum as i64 - expected_sum as i64);
    } else {
        println!("SUCCESS: All elements were correctly processed.");
    }

    println!("\nPer-consumer statistics:");
    for (i, &sum) in sums.iter().enumerate() {
        println!("Consumer {}: sum = {}", i, sum);
    }
}
