use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A simulated seat scanner.
///
/// Every scan moves the number of free seats by at most one, never leaving
/// `0..=total_seats`. A fresh scanner sees every seat free.
#[derive(Debug)]
pub struct SeatScanner<R = StdRng> {
    total_seats: u32,
    free_seats: u32,
    rng: R,
}

impl SeatScanner {
    /// Creates a scanner over `total_seats` seeded from the OS.
    #[must_use]
    pub fn new(total_seats: u32) -> Self {
        Self::with_rng(total_seats, StdRng::from_entropy())
    }
}

impl<R: Rng> SeatScanner<R> {
    /// Creates a scanner drawing its steps from `rng`.
    pub const fn with_rng(total_seats: u32, rng: R) -> Self {
        Self {
            total_seats,
            free_seats: total_seats,
            rng,
        }
    }

    /// Takes one reading and returns the new number of free seats.
    pub fn scan(&mut self) -> u32 {
        let step: i64 = self.rng.gen_range(-1..=1);
        let next = (i64::from(self.free_seats) + step).clamp(0, i64::from(self.total_seats));
        self.free_seats = u32::try_from(next).unwrap_or(self.total_seats);
        self.free_seats
    }

    /// Free seats seen by the last scan.
    pub const fn free_seats(&self) -> u32 {
        self.free_seats
    }

    /// Seats covered by the scanner.
    pub const fn total_seats(&self) -> u32 {
        self.total_seats
    }
}
