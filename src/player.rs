//! Players, seats, and the human/computer tag the turn controller matches on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two seats at the table. Serialized as the turn indicator 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Index into a `[_; 2]` player array.
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        match seat {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            other => Err(format!("turn indicator must be 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Which heuristic a computer seat plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// The game's own one-ply heuristic.
    #[default]
    Tactical,
    /// Any legal move, uniformly at random.
    Random,
}

/// Who produces the moves for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Controller {
    Human,
    Computer { heuristic: Heuristic },
}

/// A player record. Identity is fixed at setup; only `resource` changes
/// during play (e.g. the pool of numbers left in Numerical Tic-Tac-Toe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player<R> {
    pub name: String,
    #[serde(flatten)]
    pub controller: Controller,
    pub resource: R,
}

impl<R> Player<R> {
    pub fn human(name: impl Into<String>, resource: R) -> Self {
        Self {
            name: name.into(),
            controller: Controller::Human,
            resource,
        }
    }

    pub fn computer(name: impl Into<String>, heuristic: Heuristic, resource: R) -> Self {
        Self {
            name: name.into(),
            controller: Controller::Computer { heuristic },
            resource,
        }
    }

    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }
}

/// Numbers a Numerical Tic-Tac-Toe player may still place, in the order they
/// were dealt. Each number is consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberPool(Vec<u32>);

impl NumberPool {
    pub fn new(numbers: Vec<u32>) -> Self {
        Self(numbers)
    }

    /// Odd numbers of `1..=limit`, ascending.
    pub fn odds(limit: u32) -> Self {
        Self((1..=limit).filter(|n| n % 2 == 1).collect())
    }

    /// Even numbers of `1..=limit`, ascending.
    pub fn evens(limit: u32) -> Self {
        Self((1..=limit).filter(|n| n % 2 == 0).collect())
    }

    pub fn contains(&self, number: u32) -> bool {
        self.0.contains(&number)
    }

    /// Remove `number`. Returns false if it was not in the pool.
    pub fn take(&mut self, number: u32) -> bool {
        match self.0.iter().position(|&n| n == number) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn numbers(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NumberPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_alternates() {
        assert_eq!(Seat::One.other(), Seat::Two);
        assert_eq!(Seat::Two.other().other(), Seat::Two);
    }

    #[test]
    fn test_seat_rejects_third_player() {
        assert_eq!(serde_json::to_string(&Seat::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Seat>("1").unwrap(), Seat::One);
        assert!(serde_json::from_str::<Seat>("3").is_err());
    }

    #[test]
    fn test_pools_split_odd_even() {
        assert_eq!(NumberPool::odds(9).numbers(), &[1, 3, 5, 7, 9]);
        assert_eq!(NumberPool::evens(9).numbers(), &[2, 4, 6, 8]);
    }

    #[test]
    fn test_pool_take_consumes_once() {
        let mut pool = NumberPool::odds(5);
        assert!(pool.take(3));
        assert!(!pool.take(3));
        assert_eq!(pool.numbers(), &[1, 5]);
    }

    #[test]
    fn test_player_type_tag() {
        let player = Player::computer("Computer", Heuristic::Tactical, NumberPool::evens(4));
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["type"], "computer");
        assert_eq!(json["heuristic"], "tactical");
        assert_eq!(json["resource"], serde_json::json!([2, 4]));

        let back: Player<NumberPool> = serde_json::from_value(json).unwrap();
        assert_eq!(back, player);
        assert!(Player::human("Player 1", ()).is_human());
    }
}
