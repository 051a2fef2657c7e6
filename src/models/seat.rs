use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Место в зале: координаты плюс заранее вычисленный ранг качества.
/// Неизменяемое значение; bestness уникален в пределах зала, 0 — лучшее место.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Seat {
    pub row: usize,
    pub number: usize,
    pub bestness: usize,
}

impl Seat {
    pub(crate) fn new(row: usize, number: usize, bestness: usize) -> Self {
        Self { row, number, bestness }
    }
}

impl PartialOrd for Seat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bestness
            .cmp(&other.bestness)
            .then(self.row.cmp(&other.row))
            .then(self.number.cmp(&other.number))
    }
}

impl fmt::Display for Seat {
    // Ряды и места нумеруются с единицы в пользовательском выводе
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}:{}", self.row + 1, self.number + 1, self.bestness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based() {
        assert_eq!(Seat::new(3, 9, 0).to_string(), "4x10:0");
    }

    #[test]
    fn ordered_by_bestness() {
        let mut seats = vec![Seat::new(0, 0, 2), Seat::new(5, 5, 0), Seat::new(1, 1, 1)];
        seats.sort();
        let ranks: Vec<usize> = seats.iter().map(|s| s.bestness).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn equality_covers_all_fields() {
        assert_eq!(Seat::new(1, 2, 3), Seat::new(1, 2, 3));
        assert_ne!(Seat::new(1, 2, 3), Seat::new(1, 2, 4));
        assert_ne!(Seat::new(1, 2, 3), Seat::new(2, 2, 3));
    }
}
