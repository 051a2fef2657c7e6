use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, warn};

use crate::allocation::AvailabilityIndex;
use crate::error::TicketError;
use crate::models::{is_valid_email, Reservation, SeatHold};
use crate::venue::Venue;

/// Время жизни незакреплённой брони по умолчанию: пять минут.
pub const DEFAULT_HOLD_EXPIRATION: Duration = Duration::from_millis(5 * 60 * 1000);

/// Фасад сервиса продажи билетов для одного зала.
///
/// Владеет индексом доступности, таблицей броней, таблицей подтверждений и
/// счётчиком идентификаторов. Все мутации сериализуются одной блокировкой:
/// hold, reserve, истечение и даже подсчёт свободных мест держат её на всю
/// логическую операцию, поэтому эффект параллельных вызовов эквивалентен
/// некоторому последовательному порядку.
///
/// Хэндл дёшево клонируется; все клоны разделяют одно состояние.
#[derive(Clone)]
pub struct TicketService {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    expire_after: Duration,
}

struct State {
    index: AvailabilityIndex,
    next_hold_id: u64,
    holds: HashMap<u64, SeatHold>,
    reservations: HashMap<String, Reservation>,
}

impl TicketService {
    /// Новый сервис для зала с заданным временем жизни брони.
    pub fn new(venue: Venue, expire_after: Duration) -> Self {
        info!(
            rows = venue.num_rows(),
            seats_per_row = venue.num_seats_per_row(),
            expire_millis = expire_after.as_millis() as u64,
            "ticket service created"
        );
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    index: AvailabilityIndex::new(venue),
                    next_hold_id: 0,
                    holds: HashMap::new(),
                    reservations: HashMap::new(),
                }),
                expire_after,
            }),
        }
    }

    /// Новый сервис со стандартными пятью минутами на закрепление брони.
    pub fn with_default_expiration(venue: Venue) -> Self {
        Self::new(venue, DEFAULT_HOLD_EXPIRATION)
    }

    /// Число мест, которые сейчас не удержаны и не закреплены.
    pub async fn num_seats_available(&self) -> usize {
        self.inner.state.lock().await.index.available_count()
    }

    /// Находит и удерживает лучшие смежные места для клиента.
    ///
    /// `Ok(None)` означает нормальный исход «сейчас столько смежных мест
    /// нет» — вызывающему стоит повторить с меньшей компанией или позже.
    /// Успешная бронь получает очередной id и таймер истечения; метод
    /// возвращается сразу после его постановки, не дожидаясь таймера.
    pub async fn find_and_hold_seats(
        &self,
        num_seats: usize,
        customer_email: &str,
    ) -> Result<Option<SeatHold>, TicketError> {
        if num_seats == 0 {
            warn!("hold request for zero seats rejected");
            return Err(TicketError::InvalidSeatCount);
        }
        // email проверяется до захвата блокировки и до снятия мест
        if !is_valid_email(customer_email) {
            warn!(customer_email, "hold request with malformed email rejected");
            return Err(TicketError::InvalidEmail(customer_email.to_string()));
        }

        let hold = {
            let mut state = self.inner.state.lock().await;
            let seats = match state.index.find_best_adjacent_seats(num_seats) {
                Ok(seats) => seats,
                Err(_) => {
                    debug!(num_seats, "insufficient adjacent seats available");
                    return Ok(None);
                }
            };
            let id = state.next_hold_id;
            // email уже прошёл валидацию выше, конструктор не откажет
            let hold = SeatHold::new(id, customer_email, seats)?;
            state.next_hold_id += 1;
            state.holds.insert(id, hold.clone());
            info!(
                hold_id = id,
                num_seats,
                remaining = state.index.available_count(),
                "🎫 seats held"
            );
            hold
        };
        self.schedule_expiration(hold.id());
        Ok(Some(hold))
    }

    /// Закрепляет удержанные места за клиентом.
    ///
    /// Повторное закрепление идемпотентно и возвращает тот же id;
    /// истёкшая бронь даёт `Ok(None)`; неизвестный id — ошибка вызывающего.
    /// Совпадение email с указанным при создании брони по контракту
    /// не проверяется.
    pub async fn reserve_seats(
        &self,
        hold_id: u64,
        customer_email: &str,
    ) -> Result<Option<String>, TicketError> {
        let mut state = self.inner.state.lock().await;
        // неизвестная бронь важнее формы email: сначала ищем бронь
        if !state.holds.contains_key(&hold_id) {
            return Err(TicketError::HoldNotFound(hold_id));
        }
        if !is_valid_email(customer_email) {
            warn!(customer_email, "reserve request with malformed email rejected");
            return Err(TicketError::InvalidEmail(customer_email.to_string()));
        }
        let snapshot = {
            let hold = state
                .holds
                .get_mut(&hold_id)
                .ok_or(TicketError::HoldNotFound(hold_id))?;
            if hold.is_reserved() {
                // повторный вызов: тот же id подтверждения
                return Ok(Some(hold_id.to_string()));
            }
            if hold.is_expired() {
                debug!(hold_id, "reserve attempt on an expired hold");
                return Ok(None);
            }
            hold.reserve();
            hold.clone()
        };
        let reservation_id = hold_id.to_string();
        state
            .reservations
            .insert(reservation_id.clone(), Reservation::new(snapshot, reservation_id.clone()));
        info!(hold_id, reservation_id = %reservation_id, "✅ seats reserved");
        Ok(Some(reservation_id))
    }

    /// Подтверждение по его идентификатору (снимок).
    pub async fn get_reservation(&self, reservation_id: &str) -> Option<Reservation> {
        self.inner.state.lock().await.reservations.get(reservation_id).cloned()
    }

    /// Снимок брони по id.
    pub async fn seat_hold(&self, hold_id: u64) -> Option<SeatHold> {
        self.inner.state.lock().await.holds.get(&hold_id).cloned()
    }

    // Взводит таймер истечения брони. Таймер никогда не отменяется:
    // колбэк сам перепроверяет состояние под общей блокировкой, поэтому
    // гонка с параллельным закреплением безопасна.
    fn schedule_expiration(&self, hold_id: u64) {
        let service = self.clone();
        let expire_after = self.inner.expire_after;
        task::spawn(async move {
            tokio::time::sleep(expire_after).await;
            service.expire(hold_id).await;
        });
    }

    /// Истечение брони. Закреплённую или уже истёкшую бронь не трогает,
    /// поэтому места не возвращаются в индекс дважды.
    async fn expire(&self, hold_id: u64) {
        let mut state = self.inner.state.lock().await;
        let mut seats = {
            let Some(hold) = state.holds.get_mut(&hold_id) else {
                return;
            };
            if !hold.is_held() {
                return;
            }
            hold.expire();
            hold.seats().to_vec()
        };
        state.index.release_seats(&mut seats);
        info!(
            hold_id,
            released = seats.len(),
            available = state.index.available_count(),
            "🧹 hold expired, seats released"
        );
    }
}
