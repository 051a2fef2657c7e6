use thiserror::Error;

/// Ошибки публичного API ядра. Все варианты относятся к некорректным
/// аргументам вызывающего и обнаруживаются до каких-либо изменений состояния.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// Число рядов вне допустимого диапазона (0, 1000).
    #[error("bad rows: {0}")]
    InvalidRows(usize),

    /// Число мест в ряду вне допустимого диапазона (0, 500).
    #[error("bad seatsPerRow: {0}")]
    InvalidSeatsPerRow(usize),

    /// Лучший ряд должен существовать в зале.
    #[error("bad bestRow: {best_row} (venue has {num_rows} rows)")]
    InvalidBestRow { best_row: usize, num_rows: usize },

    /// Email не прошёл валидацию.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Запрос нуля мест отклоняется явно, а не трактуется как "ничего не нужно".
    #[error("numSeats must be at least 1")]
    InvalidSeatCount,

    /// Неизвестный идентификатор брони.
    #[error("seat hold {0} not found")]
    HoldNotFound(u64),
}

/// Недостаточно смежных свободных мест для запроса. Ожидаемый и частый исход:
/// сервис отдаёт его вызывающему как `Ok(None)`, а не как ошибку.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no sufficient adjacent seats available")]
pub struct NoSeatsAvailable;
