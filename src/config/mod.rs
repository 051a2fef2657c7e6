use serde::Deserialize;
use std::env;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub venue: VenueConfig,
    pub hold: HoldConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// Геометрия зала
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub num_rows: usize,
    pub num_seats_per_row: usize,
    pub best_row: usize,
}

// Настройки удержания мест
#[derive(Debug, Clone, Deserialize)]
pub struct HoldConfig {
    pub expire_millis: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "billetter_core=debug".to_string()),
            },
            venue: VenueConfig {
                num_rows: env::var("VENUE_ROWS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("VENUE_ROWS must be a valid number"),
                num_seats_per_row: env::var("VENUE_SEATS_PER_ROW")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("VENUE_SEATS_PER_ROW must be a valid number"),
                best_row: env::var("VENUE_BEST_ROW")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()
                    .expect("VENUE_BEST_ROW must be a valid number"),
            },
            hold: HoldConfig {
                expire_millis: env::var("HOLD_EXPIRE_MILLIS")
                    .unwrap_or_else(|_| "300000".to_string())
                    .parse()
                    .expect("HOLD_EXPIRE_MILLIS must be a valid number"),
            },
        }
    }
}

impl HoldConfig {
    pub fn expire_duration(&self) -> Duration {
        Duration::from_millis(self.expire_millis)
    }
}
