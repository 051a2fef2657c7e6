use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use billetter_core::{AvailabilityIndex, Venue};

// Горячий путь движка: полностью продать зал компаниями по 4 места,
// затем вернуть всё обратно.
fn hold_release_cycle(c: &mut Criterion) {
    let venue = Venue::new(50, 100, 25).unwrap();
    c.bench_function("fill_and_drain_4_seat_parties", |b| {
        b.iter_batched(
            || AvailabilityIndex::new(venue.clone()),
            |mut index| {
                let mut held = Vec::new();
                while let Ok(seats) = index.find_best_adjacent_seats(4) {
                    held.push(seats);
                }
                for mut seats in held {
                    index.release_seats(&mut seats);
                }
                index
            },
            BatchSize::SmallInput,
        )
    });
}

fn venue_ordering(c: &mut Criterion) {
    c.bench_function("build_best_seats_50x100", |b| {
        b.iter(|| Venue::new(50, 100, 25).unwrap())
    });
}

criterion_group!(benches, hold_release_cycle, venue_ordering);
criterion_main!(benches);
