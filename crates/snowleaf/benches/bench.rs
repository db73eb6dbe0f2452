use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowleaf::{
    IdGenerator, MonotonicClock, RandSource, SeededRandom, SleepProvider, SystemClock,
    TWITTER_EPOCH, ThreadRandom, ThreadSleep, TimeSource,
};
use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicU64, Ordering},
    },
    thread::scope,
    time::Instant,
};

/// Advances one millisecond every 1024 reads so the sequence never wraps.
struct TickingMockTime {
    reads: AtomicU64,
}

impl TickingMockTime {
    fn new() -> Self {
        Self {
            reads: AtomicU64::new(0),
        }
    }
}

impl TimeSource for TickingMockTime {
    fn current_millis(&self) -> u64 {
        TWITTER_EPOCH.as_millis() as u64 + (self.reads.fetch_add(1, Ordering::Relaxed) >> 10)
    }
}

// Number of IDs generated per benchmark iteration (shared across threads for
// contended runs).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a single caller on a fresh generator.
fn bench_generator<T, R, S>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> IdGenerator<T, R, S>,
) where
    T: TimeSource,
    R: RandSource,
    S: SleepProvider,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_fn();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("generator failed"));
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared by several threads.
fn bench_generator_contended<T, R, S>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> IdGenerator<T, R, S>,
) where
    T: TimeSource + Send + Sync,
    R: RandSource + Send,
    S: SleepProvider + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator_fn());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().expect("generator failed"));
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/thread_random", || {
        IdGenerator::with_parts(
            0,
            TWITTER_EPOCH,
            TickingMockTime::new(),
            ThreadRandom,
            ThreadSleep,
        )
        .unwrap()
    });
    bench_generator(c, "mock/sequential/seeded", || {
        IdGenerator::with_parts(
            0,
            TWITTER_EPOCH,
            TickingMockTime::new(),
            SeededRandom::new(0),
            ThreadSleep,
        )
        .unwrap()
    });
}

fn benchmark_mock_contended(c: &mut Criterion) {
    bench_generator_contended(c, "mock/contended", || {
        IdGenerator::with_parts(
            0,
            TWITTER_EPOCH,
            TickingMockTime::new(),
            ThreadRandom,
            ThreadSleep,
        )
        .unwrap()
    });
}

fn benchmark_system_sequential(c: &mut Criterion) {
    bench_generator(c, "system/sequential", || {
        IdGenerator::with_parts(0, TWITTER_EPOCH, SystemClock, ThreadRandom, ThreadSleep).unwrap()
    });
}

fn benchmark_system_contended(c: &mut Criterion) {
    bench_generator_contended(c, "system/contended", || {
        IdGenerator::with_parts(0, TWITTER_EPOCH, SystemClock, ThreadRandom, ThreadSleep).unwrap()
    });
}

fn benchmark_mono_contended(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_contended(c, "mono/contended", || {
        IdGenerator::with_parts(0, TWITTER_EPOCH, clock.clone(), ThreadRandom, ThreadSleep)
            .unwrap()
    });
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential,
    benchmark_mock_contended,
    // Real clocks (may spin on sequence exhaustion)
    benchmark_system_sequential,
    benchmark_system_contended,
    benchmark_mono_contended,
);
criterion_main!(benches);
