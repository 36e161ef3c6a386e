//! Playing cards and decks shared by the card games.

use std::fmt;

use parlor_room::GameRng;
use serde::{Deserialize, Serialize};

/// A card suit. Ordering is only used as a stable sort key; no game
/// ranks suits against each other (Pirat's trump is a fixed suit, not a
/// higher one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Lowercase English name, used in rule-violation messages.
    pub fn name(&self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        }
    }

    fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// A card rank, two low, ace high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value for hand evaluation: 2..=14, ace high.
    pub fn value(&self) -> u8 {
        *self as u8 + 2
    }

    fn symbol(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// One playing card. Ordering is by rank, then suit, as a stable sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// A deck of cards that deals from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A full 52-card deck, shuffled with the room's RNG.
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        rng.shuffle(&mut cards);
        Self { cards }
    }

    /// Deals `n` cards off the top.
    ///
    /// Panics if the deck runs out; callers deal within known bounds
    /// (at most 52 across one round or hand).
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let split = self.cards.len() - n;
        self.cards.split_off(split)
    }

    /// Deals one card off the top.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deck exhausted")
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_has_52_unique_cards() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::shuffled(&mut rng);
        let mut cards = deck.deal(52);
        assert_eq!(deck.remaining(), 0);
        cards.sort();
        cards.dedup();
        assert_eq!(cards.len(), 52);
    }

    #[test]
    fn test_shuffle_is_seed_deterministic() {
        let mut a = Deck::shuffled(&mut GameRng::new(9));
        let mut b = Deck::shuffled(&mut GameRng::new(9));
        assert_eq!(a.deal(52), b.deal(52));
    }

    #[test]
    fn test_rank_values_ace_high() {
        assert_eq!(Rank::Two.value(), 2);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::Ace.value(), 14);
        assert!(Rank::Ace > Rank::King);
    }

    #[test]
    fn test_card_display() {
        let card = Card::new(Rank::Seven, Suit::Spades);
        assert_eq!(card.to_string(), "7♠");
    }

    #[test]
    fn test_card_json_shape() {
        let card = Card::new(Rank::Ace, Suit::Hearts);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json, serde_json::json!({"rank": "ace", "suit": "hearts"}));
    }
}
