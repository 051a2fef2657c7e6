use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billetter_core::{config::Config, TicketService, Venue};

// Распределение размеров компаний для демо-прогона; ноль означает
// «случайный размер в пределах текущего максимума»
const PARTY_SIZES: [usize; 19] = [1, 2, 2, 2, 2, 2, 3, 3, 4, 4, 4, 4, 4, 5, 5, 6, 6, 6, 0];

const DEMO_EMAIL: &str = "ronald.hughes@gmail.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Billetter allocation demo");

    let venue = Venue::new(
        config.venue.num_rows,
        config.venue.num_seats_per_row,
        config.venue.best_row,
    )?;
    let total_seats = venue.seat_count();
    let service = TicketService::new(venue, config.hold.expire_duration());

    let mut rng = StdRng::seed_from_u64(0);
    let mut max_adjacent = config.venue.num_seats_per_row;
    let mut reserved_parties = 0usize;

    // Продаём зал целиком: случайные компании держат места, изредка
    // «задумываются» перед закреплением, а при отказе уменьшаем
    // предполагаемый максимум смежных мест
    while service.num_seats_available().await > 0 {
        let num_seats = party_size(&mut rng, max_adjacent);
        let Some(hold) = service.find_and_hold_seats(num_seats, DEMO_EMAIL).await? else {
            if num_seats <= max_adjacent {
                max_adjacent = num_seats - 1;
            }
            continue;
        };
        if rng.random_range(0..100) < 10 {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        match service.reserve_seats(hold.id(), DEMO_EMAIL).await? {
            Some(reservation_id) => {
                reserved_parties += 1;
                info!(
                    "{}",
                    serde_json::json!({
                        "reservation_id": reservation_id,
                        "hold": hold.to_string(),
                    })
                );
            }
            None => warn!(hold_id = hold.id(), "hold expired before it could be reserved"),
        }
    }

    info!(total_seats, reserved_parties, "venue sold out");
    Ok(())
}

fn party_size(rng: &mut StdRng, maximum: usize) -> usize {
    let size = PARTY_SIZES[rng.random_range(0..PARTY_SIZES.len())];
    if size == 0 || size > maximum {
        rng.random_range(0..maximum) + 1
    } else {
        size
    }
}
