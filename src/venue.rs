use std::collections::VecDeque;

use crate::error::TicketError;
use crate::models::Seat;

// Верхние границы для защиты от опечаток в конфигурации
const MAX_ROWS: usize = 1000;
const MAX_SEATS_PER_ROW: usize = 500;

/// Зал: неизменяемая геометрия плюс полное упорядочение мест по качеству.
///
/// `best_seats` содержит каждое место ровно один раз, по возрастанию
/// bestness (меньше — лучше); `grid` даёт то же место по координатам.
#[derive(Debug, Clone)]
pub struct Venue {
    num_rows: usize,
    num_seats_per_row: usize,
    best_seats: Vec<Seat>,
    grid: Vec<Vec<Seat>>,
}

impl Venue {
    /// Строит зал и его упорядочение мест. Размеры проходят проверку на
    /// разумность, лучший ряд обязан существовать.
    pub fn new(num_rows: usize, num_seats_per_row: usize, best_row: usize) -> Result<Self, TicketError> {
        if num_rows == 0 || num_rows >= MAX_ROWS {
            return Err(TicketError::InvalidRows(num_rows));
        }
        if num_seats_per_row == 0 || num_seats_per_row >= MAX_SEATS_PER_ROW {
            return Err(TicketError::InvalidSeatsPerRow(num_seats_per_row));
        }
        if best_row >= num_rows {
            return Err(TicketError::InvalidBestRow { best_row, num_rows });
        }
        let best_seats = build_best_seats(num_rows, num_seats_per_row, best_row);
        let grid = build_grid(num_rows, num_seats_per_row, &best_seats);
        Ok(Self { num_rows, num_seats_per_row, best_seats, grid })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_seats_per_row(&self) -> usize {
        self.num_seats_per_row
    }

    /// Общее число мест в зале.
    pub fn seat_count(&self) -> usize {
        self.best_seats.len()
    }

    /// Место по координатам.
    pub fn seat(&self, row: usize, number: usize) -> Seat {
        self.grid[row][number]
    }

    /// Все места по возрастанию bestness.
    pub fn best_seats(&self) -> &[Seat] {
        &self.best_seats
    }
}

/// Позиции `0..limit`, обходимые «расходящимся веером» от центра:
/// center, center+1, center-1, center+2, center-2, … с отбрасыванием
/// выходов за границы. Перечисляет каждую позицию ровно один раз.
pub(crate) fn outward_from(center: usize, limit: usize) -> impl Iterator<Item = usize> {
    let center = center as i64;
    let bound = limit as i64;
    std::iter::successors(Some(0i64), |n| Some(if *n <= 0 { -n + 1 } else { -n }))
        .take(2 * limit + 1)
        .map(move |offset| center + offset)
        .filter(move |&n| n >= 0 && n < bound)
        .map(|n| n as usize)
}

// Порядок обхода рядов: треугольная серия от лучшего ряда
// (b; b,b+1,b-1; b,b+1,b-1,b+2,b-2; ...), обрезанная до границ зала.
// Итератор бесконечный, потребитель останавливается, раздав все места.
fn row_visit_order(num_rows: usize, best_row: usize) -> impl Iterator<Item = usize> {
    let best = best_row as i64;
    let rows = num_rows as i64;
    (0i64..)
        .flat_map(move |i| {
            std::iter::once(best).chain((1..=i).flat_map(move |j| [best + j, best - j]))
        })
        .filter(move |&row| row >= 0 && row < rows)
        .map(|row| row as usize)
}

/// Назначает каждому месту уникальный bestness 0..R*C-1, расширяясь ромбом
/// от середины лучшего ряда. За один визит ряд отдаёт до
/// `max(1, 2*(seats_per_row / num_rows))` мест, чтобы широкие ряды
/// заполнялись быстрее относительно числа рядов.
fn build_best_seats(num_rows: usize, num_seats_per_row: usize, best_row: usize) -> Vec<Seat> {
    let num_seats = num_rows * num_seats_per_row;
    let seats_per_visit = ((num_seats_per_row / num_rows) * 2).max(1);
    let mid = (num_seats_per_row - 1) / 2;

    // Очередь позиций каждого ряда в порядке убывания качества
    let mut remaining_in_row: Vec<VecDeque<usize>> = (0..num_rows)
        .map(|_| outward_from(mid, num_seats_per_row).collect())
        .collect();

    let mut best_seats = Vec::with_capacity(num_seats);
    let mut bestness = 0;
    'assign: for row in row_visit_order(num_rows, best_row) {
        for _ in 0..seats_per_visit {
            let Some(number) = remaining_in_row[row].pop_front() else {
                break; // ряд исчерпан, идём к следующему визиту
            };
            best_seats.push(Seat::new(row, number, bestness));
            bestness += 1;
            if bestness == num_seats {
                break 'assign;
            }
        }
    }
    best_seats
}

fn build_grid(num_rows: usize, num_seats_per_row: usize, best_seats: &[Seat]) -> Vec<Vec<Seat>> {
    debug_assert_eq!(best_seats.len(), num_rows * num_seats_per_row);
    let mut grid = vec![vec![Seat::new(0, 0, 0); num_seats_per_row]; num_rows];
    for &seat in best_seats {
        grid[seat.row][seat.number] = seat;
    }
    grid
}
