use serde::Serialize;

use crate::models::SeatHold;

/// Подтверждённая бронь. Создаётся ровно один раз при переходе
/// HELD -> RESERVED и больше не изменяется.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    seat_hold: SeatHold,
    reservation_id: String,
}

impl Reservation {
    pub(crate) fn new(seat_hold: SeatHold, reservation_id: String) -> Self {
        Self { seat_hold, reservation_id }
    }

    pub fn seat_hold(&self) -> &SeatHold {
        &self.seat_hold
    }

    /// Идентификатор подтверждения: десятичная запись id исходной брони.
    pub fn reservation_id(&self) -> &str {
        &self.reservation_id
    }
}
