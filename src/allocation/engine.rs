//! Движок аллокации: поиск лучшего блока смежных мест и возврат мест
//! в индекс. Все операции предполагают, что вызывающий уже держит
//! блокировку сервиса.

use tracing::error;

use crate::allocation::AvailabilityIndex;
use crate::error::NoSeatsAvailable;
use crate::models::Seat;
use crate::venue::outward_from;

impl AvailabilityIndex {
    /// Число свободных мест в ряду, смежных с данным: правый прогон
    /// (включая само место) плюс левый прогон.
    pub fn adjacent_available_count(&self, seat: Seat) -> usize {
        let cols = self.venue().num_seats_per_row();
        let mut count = 0;
        let mut n = seat.number;
        while n < cols && self.is_available(seat.row, n) {
            count += 1;
            n += 1;
        }
        let mut n = seat.number;
        while n > 0 && self.is_available(seat.row, n - 1) {
            count += 1;
            n -= 1;
        }
        count
    }

    /// Находит и снимает из индекса лучший блок из `num_seats` смежных мест.
    ///
    /// Якорем становится первое место в порядке bestness, вокруг которого
    /// хватает смежных свободных мест; альтернативные якоря не оцениваются.
    /// Запрос больше вместимости зала просто не находит якоря.
    pub fn find_best_adjacent_seats(&mut self, num_seats: usize) -> Result<Vec<Seat>, NoSeatsAvailable> {
        debug_assert!(num_seats > 0, "seat count is validated by the service");
        let anchor = self
            .best_available()
            .iter()
            .copied()
            .find(|&seat| self.adjacent_available_count(seat) >= num_seats);
        let Some(anchor) = anchor else {
            return Err(NoSeatsAvailable);
        };
        let seats = self.collect_adjacent_seats(num_seats, anchor);
        self.hold_seats(&seats);
        Ok(seats)
    }

    /// Собирает `num_needed` смежных свободных мест вокруг якоря: шаги
    /// чередуются вправо/влево, пока обе стороны свободны; когда одна
    /// сторона упирается в занятое место или край ряда, остаток добирается
    /// строго по другой стороне. Ничего не мутирует.
    fn collect_adjacent_seats(&self, num_needed: usize, anchor: Seat) -> Vec<Seat> {
        let row = anchor.row;
        let cols = self.venue().num_seats_per_row();
        let mut seats = Vec::with_capacity(num_needed);
        let mut one_side_blocked = false;
        for number in outward_from(anchor.number, cols) {
            if !one_side_blocked {
                if self.is_available(row, number) {
                    seats.push(self.venue().seat(row, number));
                    if seats.len() == num_needed {
                        return seats;
                    }
                } else {
                    one_side_blocked = true;
                }
                continue;
            }
            // одна сторона закрыта: добираем остаток монотонно в эту сторону
            let step: i64 = if number < anchor.number { -1 } else { 1 };
            let mut n = number as i64;
            while seats.len() < num_needed {
                if n < 0 || n >= cols as i64 || !self.is_available(row, n as usize) {
                    self.abort_inconsistent(row, anchor, "run out of seats mid-extraction");
                }
                seats.push(self.venue().seat(row, n as usize));
                n += step;
            }
            return seats;
        }
        self.abort_inconsistent(row, anchor, "row exhausted before the block was complete")
    }

    /// Снимает собранный блок из индекса. Отсутствие места в отсортированном
    /// списке — порча индекса: частично снятые места возвращаются на место,
    /// после чего операция аварийно завершается.
    fn hold_seats(&mut self, seats: &[Seat]) {
        for (i, &seat) in seats.iter().enumerate() {
            if !self.remove_available(seat) {
                let mut removed = seats[..i].to_vec();
                self.release_seats(&mut removed);
                self.abort_inconsistent(seat.row, seat, "held seat missing from best-available list");
            }
        }
    }

    /// Возвращает места одной брони в индекс. Места сортируются по bestness,
    /// после чего каждая вставка продолжает сканирование с точки предыдущей;
    /// список остаётся отсортированным и без дубликатов даже при чередовании
    /// возвратов с новыми аллокациями.
    pub fn release_seats(&mut self, seats: &mut [Seat]) {
        seats.sort_unstable_by_key(|seat| seat.bestness);
        let mut from = 0;
        for &seat in seats.iter() {
            from = self.insert_available(seat, from);
        }
    }

    // Ошибка согласованности индекса: дальше работать нельзя, общие
    // структуры могут быть уже повреждены.
    fn abort_inconsistent(&self, row: usize, seat: Seat, detail: &str) -> ! {
        error!(row, seat = %seat, detail, "availability index is corrupted");
        panic!("availability index corrupted: {detail}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::Venue;
    use proptest::prelude::*;

    fn index() -> AvailabilityIndex {
        AvailabilityIndex::new(Venue::new(10, 20, 4).unwrap())
    }

    /// Проверка инварианта: список отсортирован, без дубликатов и зеркалит сетку.
    fn assert_index_consistent(idx: &AvailabilityIndex) {
        for pair in idx.best_available().windows(2) {
            assert!(pair[0].bestness < pair[1].bestness, "list must stay sorted");
        }
        let listed = idx.best_available().len();
        let mut marked = 0;
        for row in 0..idx.venue().num_rows() {
            for number in 0..idx.venue().num_seats_per_row() {
                if idx.is_available(row, number) {
                    marked += 1;
                }
            }
        }
        assert_eq!(listed, marked, "list membership must mirror the grid");
        for seat in idx.best_available() {
            assert!(idx.is_available(seat.row, seat.number));
        }
    }

    fn assert_contiguous(seats: &[Seat]) {
        let row = seats[0].row;
        let mut numbers: Vec<usize> = seats.iter().map(|s| s.number).collect();
        numbers.sort_unstable();
        for seat in seats {
            assert_eq!(seat.row, row, "block never spans rows");
        }
        for pair in numbers.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "block must be contiguous: {numbers:?}");
        }
    }

    #[test]
    fn adjacent_count_spans_both_directions() {
        let mut idx = index();
        let seat = idx.venue().seat(4, 9);
        assert_eq!(idx.adjacent_available_count(seat), 20);
        // пробиваем дыру справа: остаются 9 левых, само место и 2 правых
        assert!(idx.remove_available(idx.venue().seat(4, 12)));
        assert_eq!(idx.adjacent_available_count(seat), 12);
    }

    #[test]
    fn adjacent_count_for_held_seat_ignores_it() {
        // прогон с самого места: занятое место даёт только левый прогон
        let mut idx = index();
        let seat = idx.venue().seat(4, 9);
        assert!(idx.remove_available(seat));
        assert_eq!(idx.adjacent_available_count(seat), 9);
    }

    #[test]
    fn first_block_centers_on_best_seat() {
        let mut idx = index();
        let seats = idx.find_best_adjacent_seats(5).unwrap();
        assert_eq!(seats.len(), 5);
        assert_contiguous(&seats);
        // якорь — лучшее место зала (ряд 4, место 9), блок вокруг него
        let numbers: Vec<usize> = seats.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![9, 10, 8, 11, 7]);
        assert_eq!(idx.available_count(), 195);
        assert_index_consistent(&idx);
    }

    #[test]
    fn extraction_flows_around_prior_holds() {
        let mut idx = index();
        // первый блок занимает центр лучшего ряда
        let first = idx.find_best_adjacent_seats(4).unwrap();
        assert_eq!(
            first.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![9, 10, 8, 11]
        );
        // следующий якорь в том же ряду упирается в занятый центр и
        // добирает места в одну сторону
        let second = idx.find_best_adjacent_seats(4).unwrap();
        assert_eq!(second[0].row, 4);
        assert_contiguous(&second);
        assert_index_consistent(&idx);
    }

    #[test]
    fn whole_row_can_be_taken() {
        let mut idx = index();
        let seats = idx.find_best_adjacent_seats(20).unwrap();
        assert_eq!(seats.len(), 20);
        assert_eq!(seats[0].row, 4);
        assert_contiguous(&seats);
        assert_index_consistent(&idx);
    }

    #[test]
    fn request_larger_than_any_row_is_rejected() {
        let mut idx = index();
        assert_eq!(idx.find_best_adjacent_seats(21), Err(NoSeatsAvailable));
        // и заведомо больше вместимости зала — без специального случая
        assert_eq!(idx.find_best_adjacent_seats(1000), Err(NoSeatsAvailable));
        assert_eq!(idx.available_count(), 200);
    }

    #[test]
    fn release_restores_the_index() {
        let mut idx = index();
        let mut seats = idx.find_best_adjacent_seats(7).unwrap();
        assert_eq!(idx.available_count(), 193);
        idx.release_seats(&mut seats);
        assert_eq!(idx.available_count(), 200);
        assert_index_consistent(&idx);
    }

    #[test]
    fn interleaved_releases_keep_order() {
        let mut idx = index();
        let mut a = idx.find_best_adjacent_seats(6).unwrap();
        let mut b = idx.find_best_adjacent_seats(5).unwrap();
        let c = idx.find_best_adjacent_seats(4).unwrap();
        idx.release_seats(&mut b);
        let d = idx.find_best_adjacent_seats(3).unwrap();
        idx.release_seats(&mut a);
        assert_index_consistent(&idx);
        assert_eq!(idx.available_count(), 200 - c.len() - d.len());
    }

    #[test]
    fn four_seat_groups_tile_the_venue_exactly() {
        let mut idx = index();
        for _ in 0..50 {
            let seats = idx.find_best_adjacent_seats(4).unwrap();
            assert_contiguous(&seats);
        }
        assert_eq!(idx.available_count(), 0);
        assert_eq!(idx.find_best_adjacent_seats(1), Err(NoSeatsAvailable));
    }

    #[test]
    fn extraction_near_row_edges_stays_contiguous() {
        // узкие залы: якоря быстро упираются в края рядов, а чередование
        // возвратов с новыми аллокациями дробит ряды на короткие прогоны
        for (rows, cols, best) in [(1usize, 7usize, 0usize), (2, 5, 1), (3, 20, 1)] {
            let mut idx = AvailabilityIndex::new(Venue::new(rows, cols, best).unwrap());
            let mut held: Vec<Vec<Seat>> = Vec::new();
            for size in [2, 3, 1, 2, 3, 1, 2] {
                if let Ok(seats) = idx.find_best_adjacent_seats(size) {
                    assert_eq!(seats.len(), size);
                    assert_contiguous(&seats);
                    held.push(seats);
                }
                assert_index_consistent(&idx);
            }
            // возвращаем каждый второй блок и добираем одиночные места
            let mut n = 0;
            held.retain_mut(|seats| {
                n += 1;
                if n % 2 == 0 {
                    idx.release_seats(seats);
                    false
                } else {
                    true
                }
            });
            assert_index_consistent(&idx);
            while let Ok(seats) = idx.find_best_adjacent_seats(1) {
                assert_eq!(seats.len(), 1);
                held.push(seats);
            }
            assert_eq!(idx.available_count(), 0);
            for mut seats in held {
                idx.release_seats(&mut seats);
            }
            assert_index_consistent(&idx);
            assert_eq!(idx.available_count(), rows * cols);
        }
    }

    #[test]
    fn single_seats_drain_in_bestness_order() {
        let venue = Venue::new(2, 3, 0).unwrap();
        let expected: Vec<Seat> = venue.best_seats().to_vec();
        let mut idx = AvailabilityIndex::new(venue);
        let mut taken = Vec::new();
        while let Ok(seats) = idx.find_best_adjacent_seats(1) {
            taken.extend(seats);
        }
        assert_eq!(taken, expected);
    }

    proptest! {
        // Случайная смесь аллокаций и возвратов не ломает инвариант индекса
        #[test]
        fn random_workload_preserves_invariants(
            rows in 1usize..8,
            cols in 1usize..12,
            best in 0usize..8,
            ops in proptest::collection::vec((1usize..6, any::<bool>()), 1..60),
        ) {
            prop_assume!(best < rows);
            let mut idx = AvailabilityIndex::new(Venue::new(rows, cols, best).unwrap());
            let mut held: Vec<Vec<Seat>> = Vec::new();
            for (size, release_first) in ops {
                if release_first {
                    if let Some(mut seats) = held.pop() {
                        idx.release_seats(&mut seats);
                    }
                }
                if let Ok(seats) = idx.find_best_adjacent_seats(size) {
                    prop_assert_eq!(seats.len(), size);
                    held.push(seats);
                }
                assert_index_consistent(&idx);
            }
            for mut seats in held {
                idx.release_seats(&mut seats);
            }
            assert_index_consistent(&idx);
            prop_assert_eq!(idx.available_count(), rows * cols);
        }
    }
}
