use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::error::TicketError;
use crate::models::Seat;

// Сознательно упрощённый шаблон: локальная часть из букв/цифр/точек,
// домен и TLD минимум из двух букв.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.]+@[A-Za-z0-9]+\.[A-Za-z]{2,}$").expect("email pattern must compile")
});

/// Проверяет email клиента по упрощённому шаблону сервиса.
pub fn is_valid_email(customer_email: &str) -> bool {
    EMAIL_PATTERN.is_match(customer_email)
}

/// Состояние брони.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoldState {
    /// Начальное состояние; может перейти в Reserved или Expired.
    Held,
    /// Терминальное: места закреплены за клиентом.
    Reserved,
    /// Терминальное: бронь истекла, места возвращены в индекс.
    Expired,
}

impl fmt::Display for HoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HoldState::Held => "HELD",
            HoldState::Reserved => "RESERVED",
            HoldState::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

/// Временная бронь: непустой набор мест, удерживаемый для клиента до
/// закрепления или истечения. Создаётся только успешной аллокацией.
#[derive(Debug, Clone, Serialize)]
pub struct SeatHold {
    id: u64,
    customer_email: String,
    seats: Vec<Seat>,
    state: HoldState,
    created_at: DateTime<Utc>,
}

impl SeatHold {
    /// Создаёт новую бронь в состоянии HELD. Невалидный email — ошибка
    /// конструирования, а не времени выполнения.
    pub(crate) fn new(id: u64, customer_email: &str, seats: Vec<Seat>) -> Result<Self, TicketError> {
        if !is_valid_email(customer_email) {
            return Err(TicketError::InvalidEmail(customer_email.to_string()));
        }
        debug_assert!(!seats.is_empty(), "a hold always covers at least one seat");
        Ok(Self {
            id,
            customer_email: customer_email.to_string(),
            seats,
            state: HoldState::Held,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_held(&self) -> bool {
        self.state == HoldState::Held
    }

    pub fn is_reserved(&self) -> bool {
        self.state == HoldState::Reserved
    }

    pub fn is_expired(&self) -> bool {
        self.state == HoldState::Expired
    }

    /// Закрепляет бронь. Повторный вызов безвреден: из терминального
    /// состояния переходов нет. Возвращает true, если бронь теперь RESERVED.
    pub(crate) fn reserve(&mut self) -> bool {
        if self.state == HoldState::Held {
            self.state = HoldState::Reserved;
        }
        self.state == HoldState::Reserved
    }

    /// Помечает бронь истёкшей. Повторный вызов безвреден. Возвращает true,
    /// если бронь теперь EXPIRED.
    pub(crate) fn expire(&mut self) -> bool {
        if self.state == HoldState::Held {
            self.state = HoldState::Expired;
        }
        self.state == HoldState::Expired
    }
}

impl fmt::Display for SeatHold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.state, self.id, self.seats.len())?;
        for seat in &self.seats {
            write!(f, " {seat}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold() -> SeatHold {
        SeatHold::new(7, "a@b.com", vec![Seat::new(0, 0, 0)]).unwrap()
    }

    #[test]
    fn accepts_simple_addresses() {
        for email in ["a@b.com", "ronald.hughes@gmail.com", "user.42@host99.museum"] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "a",
            "a@",
            "@b.com",
            "a@b",
            "a@b.c",
            "a@b.c0m",
            "a b@c.com",
            "a@b c.com",
            "a@b.com ",
            "a@@b.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn invalid_email_fails_construction() {
        let err = SeatHold::new(0, "not-an-email", vec![Seat::new(0, 0, 0)]).unwrap_err();
        assert_eq!(err, TicketError::InvalidEmail("not-an-email".to_string()));
    }

    #[test]
    fn reserve_is_idempotent() {
        let mut h = hold();
        assert!(h.is_held());
        assert!(h.reserve());
        assert!(h.reserve());
        assert!(h.is_reserved());
    }

    #[test]
    fn expire_is_idempotent() {
        let mut h = hold();
        assert!(h.expire());
        assert!(h.expire());
        assert!(h.is_expired());
    }

    #[test]
    fn terminal_states_never_transition() {
        let mut reserved = hold();
        reserved.reserve();
        assert!(!reserved.expire());
        assert!(reserved.is_reserved());

        let mut expired = hold();
        expired.expire();
        assert!(!expired.reserve());
        assert!(expired.is_expired());
    }

    #[test]
    fn display_lists_state_id_and_seats() {
        let h = SeatHold::new(3, "a@b.com", vec![Seat::new(4, 9, 0), Seat::new(4, 10, 1)]).unwrap();
        assert_eq!(h.to_string(), "HELD 3: 2 5x10:0 5x11:1");
    }
}
