use crate::models::Seat;
use crate::venue::Venue;

/// Индекс доступности мест одного зала: сетка флагов по координатам плюс
/// список свободных мест, отсортированный по возрастанию bestness.
///
/// Инвариант: `best_available` всегда отсортирован и содержит ровно те
/// места, для которых сетка отмечена как свободная. Любая мутация идёт
/// только через операции движка аллокации, под блокировкой сервиса.
#[derive(Debug, Clone)]
pub struct AvailabilityIndex {
    venue: Venue,
    available: Vec<Vec<bool>>,
    best_available: Vec<Seat>,
}

impl AvailabilityIndex {
    /// Новый индекс: все места зала свободны.
    pub fn new(venue: Venue) -> Self {
        let available = vec![vec![true; venue.num_seats_per_row()]; venue.num_rows()];
        let best_available = venue.best_seats().to_vec();
        Self { venue, available, best_available }
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    /// Число свободных мест (размер отсортированного списка).
    pub fn available_count(&self) -> usize {
        self.best_available.len()
    }

    pub fn is_available(&self, row: usize, number: usize) -> bool {
        self.available[row][number]
    }

    /// Свободные места по возрастанию bestness.
    pub fn best_available(&self) -> &[Seat] {
        &self.best_available
    }

    /// Снимает место из свободных: сетка + список. bestness уникален в зале,
    /// поэтому поиск в списке — бинарный по нему. Возвращает false, если
    /// места в списке не оказалось (нарушение инварианта у вызывающего).
    pub(crate) fn remove_available(&mut self, seat: Seat) -> bool {
        match self.best_available.binary_search_by_key(&seat.bestness, |s| s.bestness) {
            Ok(pos) => {
                self.best_available.remove(pos);
                self.available[seat.row][seat.number] = false;
                true
            }
            Err(_) => false,
        }
    }

    /// Возвращает место в свободные, вставляя его в списке на позицию,
    /// сохраняющую сортировку. Сканирование начинается с `from` — при
    /// пакетном возврате заранее отсортированных мест каждая следующая
    /// вставка продолжает с места предыдущей. Возвращает индекс сразу
    /// за вставленным местом.
    pub(crate) fn insert_available(&mut self, seat: Seat, from: usize) -> usize {
        debug_assert!(
            !self.available[seat.row][seat.number],
            "seat released twice: {seat}"
        );
        self.available[seat.row][seat.number] = true;
        for index in from..self.best_available.len() {
            if seat.bestness < self.best_available[index].bestness {
                self.best_available.insert(index, seat);
                return index + 1;
            }
        }
        self.best_available.push(seat);
        self.best_available.len()
    }
}
