//! Rally scoring
//!
//! Rally-point scoring: every rally scores a point and its winner serves
//! the next one. The server always makes hit #1, so an odd impact count
//! means the server hit last.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::court::{Area, Player, half_court, serve_from_right, service_box};
use super::shuttle::{ShuttleState, Shuttlecock};
use crate::consts::{GAME_POINTS, GAME_POINTS_CAP};

/// Score of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score1: u32,
    pub score2: u32,
    /// Rallies already settled; trails `score1 + score2` between a point
    /// and the next serve
    pub nth_score: u32,
    /// Winner of the previous rally, who serves this one
    pub last_winner: Player,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(Player::One)
    }
}

impl Scoreboard {
    pub fn new(first_server: Player) -> Self {
        Self {
            score1: 0,
            score2: 0,
            nth_score: 0,
            last_winner: first_server,
        }
    }

    pub fn server(&self) -> Player {
        self.last_winner
    }

    pub fn score_of(&self, player: Player) -> u32 {
        match player {
            Player::One => self.score1,
            Player::Two => self.score2,
        }
    }

    pub fn total(&self) -> u32 {
        self.score1 + self.score2
    }

    /// A point was awarded and the next serve has not happened yet
    pub fn is_settled(&self) -> bool {
        self.nth_score != self.total()
    }

    /// Start of a rally: the settled count catches up with the score
    pub fn begin_rally(&mut self) {
        self.nth_score = self.total();
    }

    /// Score the rally once the shuttlecock has come to rest.
    ///
    /// Returns the winner the one time a terminal state is first seen.
    pub fn resolve(&mut self, shuttle: &Shuttlecock) -> Option<Player> {
        if !shuttle.state.is_terminal() || self.is_settled() {
            return None;
        }
        let server = self.server();
        let net_fault = shuttle.state == ShuttleState::StopNet || shuttle.hung || shuttle.under_net;
        let winner = if net_fault {
            net_fault_winner(server, shuttle.impact_count)
        } else {
            landing_winner(
                server,
                self.score_of(server),
                shuttle.impact_count,
                shuttle.position,
            )
        };
        self.award(winner);
        Some(winner)
    }

    fn award(&mut self, winner: Player) {
        match winner {
            Player::One => self.score1 += 1,
            Player::Two => self.score2 += 1,
        }
        self.last_winner = winner;
    }

    pub fn winner(&self) -> Option<Player> {
        let (high, low, leader) = if self.score1 >= self.score2 {
            (self.score1, self.score2, Player::One)
        } else {
            (self.score2, self.score1, Player::Two)
        };
        if high >= GAME_POINTS_CAP || (high >= GAME_POINTS && high - low >= 2) {
            Some(leader)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }
}

/// Net hang or under-net pass: whoever hit last loses. With an even count
/// the receiver hit last, so the previous winner keeps serving.
pub fn net_fault_winner(last_winner: Player, impact_count: u32) -> Player {
    if impact_count % 2 == 0 {
        last_winner
    } else {
        last_winner.other()
    }
}

/// Where the last hit had to land: the receiver's service box for the
/// serve, then the opponent's full half. `None` if nobody hit at all.
pub fn landing_area(server: Player, server_score: u32, impact_count: u32) -> Option<Area> {
    let receiver = server.other();
    match impact_count {
        0 => None,
        1 => Some(service_box(receiver, serve_from_right(server_score))),
        n if n % 2 == 1 => Some(half_court(receiver)),
        _ => Some(half_court(server)),
    }
}

/// Ground landing: the last hitter wins if it landed in, loses otherwise.
/// A serve that was never struck is the server's fault.
pub fn landing_winner(
    server: Player,
    server_score: u32,
    impact_count: u32,
    landing: Vec3,
) -> Player {
    let Some(area) = landing_area(server, server_score, impact_count) else {
        return server.other();
    };
    let last_hitter = if impact_count % 2 == 1 {
        server
    } else {
        server.other()
    };
    if area.contains(landing, 0.0) {
        last_hitter
    } else {
        last_hitter.other()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shuttle::ShuttleParams;

    fn landed(at: Vec3, impact_count: u32) -> Shuttlecock {
        let mut s = Shuttlecock::new(ShuttleParams::default());
        s.reset(at, Vec3::ZERO);
        s.state = ShuttleState::StopGround;
        s.impact_count = impact_count;
        s
    }

    fn hung(impact_count: u32) -> Shuttlecock {
        let mut s = landed(Vec3::new(0.0, 120.0, 0.0), impact_count);
        s.state = ShuttleState::StopNet;
        s.hung = true;
        s
    }

    #[test]
    fn test_net_hang_parity() {
        // Even count: receiver hit last, server keeps the serve
        let mut board = Scoreboard::new(Player::Two);
        assert_eq!(board.resolve(&hung(2)), Some(Player::Two));
        assert_eq!(board.score2, 1);

        // Odd count: server hit last, winner switches
        let mut board = Scoreboard::new(Player::Two);
        assert_eq!(board.resolve(&hung(3)), Some(Player::One));
        assert_eq!(board.last_winner, Player::One);
    }

    #[test]
    fn test_under_net_uses_net_parity() {
        // Lands in the correct half, but went under the net
        let mut s = landed(Vec3::new(0.0, 0.0, 300.0), 3);
        s.under_net = true;
        let mut board = Scoreboard::new(Player::One);
        assert_eq!(board.resolve(&s), Some(Player::Two));

        let mut s = landed(Vec3::new(0.0, 0.0, -300.0), 2);
        s.under_net = true;
        let mut board = Scoreboard::new(Player::One);
        assert_eq!(board.resolve(&s), Some(Player::One));
    }

    #[test]
    fn test_ground_parity_differs_from_net_parity() {
        // Count 3: server hit last and it landed in the receiver's half -> server wins
        let mut board = Scoreboard::new(Player::One);
        assert_eq!(board.resolve(&landed(Vec3::new(50.0, 0.0, 400.0), 3)), Some(Player::One));

        // Count 2: receiver hit last into the server's half -> receiver wins
        let mut board = Scoreboard::new(Player::One);
        assert_eq!(board.resolve(&landed(Vec3::new(50.0, 0.0, -400.0), 2)), Some(Player::Two));

        // Count 2 but out over the back line -> server wins
        let mut board = Scoreboard::new(Player::One);
        assert_eq!(board.resolve(&landed(Vec3::new(50.0, 0.0, -700.0), 2)), Some(Player::One));
    }

    #[test]
    fn test_serve_box_alternates_with_server_score() {
        // Server one on 0 serves into two's right box (x > 0)
        let in_right = Vec3::new(100.0, 0.0, 400.0);
        let in_left = Vec3::new(-100.0, 0.0, 400.0);
        assert_eq!(landing_winner(Player::One, 0, 1, in_right), Player::One);
        assert_eq!(landing_winner(Player::One, 0, 1, in_left), Player::Two);
        // On an odd score the left box is live
        assert_eq!(landing_winner(Player::One, 5, 1, in_left), Player::One);
        // Short serve
        assert_eq!(landing_winner(Player::One, 0, 1, Vec3::new(100.0, 0.0, 100.0)), Player::Two);
        // After the serve the whole half counts
        assert_eq!(landing_winner(Player::One, 0, 3, in_left), Player::One);
    }

    #[test]
    fn test_unstruck_serve_is_a_fault() {
        assert_eq!(landing_winner(Player::Two, 4, 0, Vec3::new(0.0, 0.0, 300.0)), Player::One);
    }

    #[test]
    fn test_scores_once_per_terminal_state() {
        let mut board = Scoreboard::new(Player::One);
        let s = hung(1);
        assert!(board.resolve(&s).is_some());
        assert!(board.resolve(&s).is_none());
        assert_eq!(board.total(), 1);
        assert!(board.is_settled());

        board.begin_rally();
        assert_eq!(board.nth_score, 1);
        assert!(board.resolve(&s).is_some());
        assert_eq!(board.total(), 2);
    }

    #[test]
    fn test_no_score_in_flight() {
        let mut board = Scoreboard::new(Player::One);
        let mut s = landed(Vec3::ZERO, 1);
        s.state = ShuttleState::Topple;
        assert!(board.resolve(&s).is_none());
        assert_eq!(board.total(), 0);
    }

    #[test]
    fn test_game_end() {
        let mut board = Scoreboard::new(Player::One);
        board.score1 = 21;
        board.score2 = 20;
        assert!(!board.is_game_over());
        board.score1 = 22;
        assert_eq!(board.winner(), Some(Player::One));
        board.score1 = 29;
        board.score2 = 30;
        assert_eq!(board.winner(), Some(Player::Two));
    }
}
