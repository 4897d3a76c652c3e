//! Round resolution: the rules of rock-paper-scissors.
//!
//! [`resolve`] is pure. It takes two `(player, hand)` pairs by value and
//! says who won, without knowing anything about users or rooms, so the
//! coordinator can hand it connection ids and act on the answer.

use janken_protocol::{Choice, GameResult};

/// The outcome of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<P> {
    /// Both players showed the same hand.
    Tie { players: [P; 2] },
    /// One hand beat the other.
    Decided { winner: P, loser: P },
}

impl<P: PartialEq> Outcome<P> {
    /// The round result as seen by `player`, or `None` if they did not
    /// play in this round.
    pub fn result_for(&self, player: &P) -> Option<GameResult> {
        match self {
            Self::Tie { players } if players.contains(player) => {
                Some(GameResult::Tie)
            }
            Self::Decided { winner, .. } if winner == player => {
                Some(GameResult::Win)
            }
            Self::Decided { loser, .. } if loser == player => {
                Some(GameResult::Lose)
            }
            _ => None,
        }
    }
}

/// Decides a round between two players.
///
/// Total over all nine hand combinations. Swapping the arguments never
/// changes who won, and a tie stays a tie.
pub fn resolve<P>(first: (P, Choice), second: (P, Choice)) -> Outcome<P> {
    let (a, a_hand) = first;
    let (b, b_hand) = second;

    if a_hand.beats(b_hand) {
        Outcome::Decided { winner: a, loser: b }
    } else if b_hand.beats(a_hand) {
        Outcome::Decided { winner: b, loser: a }
    } else {
        Outcome::Tie { players: [a, b] }
    }
}
