// This file is part of the chessmask library.
// Copyright (C) 2026 The chessmask developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Playing a game move by move.

use std::{error::Error, fmt};

use tracing::warn;

use crate::{
    attacks,
    board::Board,
    color::Color,
    san::{self, ResolveError},
    types::MoveSteps,
};

/// A board, the side to move and the moves accepted so far.
///
/// # Examples
///
/// ```
/// use chessmask::{game::Game, Color};
///
/// let mut game = Game::new();
/// game.play("e4")?;
/// game.play("e5")?;
///
/// assert_eq!(game.turn(), Color::White);
/// assert_eq!(game.history(), ["e4", "e5"]);
/// # Ok::<_, chessmask::san::ResolveError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    history: Vec<String>,
}

impl Game {
    /// A game from the standard starting position, white to move.
    pub fn new() -> Game {
        Game::from_board(Board::new(), Color::White)
    }

    pub fn from_board(board: Board, turn: Color) -> Game {
        Game {
            board,
            turn,
            history: Vec::new(),
        }
    }

    /// Resolves `token` for the side to move and plays it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the token does not describe exactly one
    /// legal move. The game is unchanged in that case.
    pub fn play(&mut self, token: &str) -> Result<MoveSteps, ResolveError> {
        let steps = san::resolve(&self.board, self.turn, token).map_err(|err| {
            warn!(token, turn = %self.turn, %err, "rejected move");
            err
        })?;

        self.board.play_unchecked(&steps);
        self.history.push(token.to_owned());
        self.turn = !self.turn;
        Ok(steps)
    }

    /// Plays a sequence of moves from the starting position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] for the first move that cannot be played.
    pub fn from_moves<I>(moves: I) -> Result<Game, GameError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut game = Game::new();
        for token in moves {
            let token = token.as_ref();
            if let Err(source) = game.play(token) {
                return Err(GameError {
                    ply: game.history.len() + 1,
                    token: token.to_owned(),
                    source,
                });
            }
        }
        Ok(game)
    }

    /// Tests if the side to move is in check.
    pub fn is_check(&self) -> bool {
        attacks::is_check(&self.board, self.turn)
    }

    /// Tests if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        attacks::is_checkmate(&self.board, self.turn)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The accepted tokens, in the order they were played.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

/// A move of a sequence could not be played.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameError {
    /// Number of the half-move, starting at 1.
    pub ply: usize,
    pub token: String,
    pub source: ResolveError,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid move {:?} at ply {}: {}", self.token, self.ply, self.source)
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{role::Role, square::Square};

    #[test]
    fn test_play() {
        let mut game = Game::new();
        game.play("e4").expect("legal");
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(
            game.board().piece_at(Square::E4),
            Some(Role::Pawn.of(Color::White))
        );
        assert_eq!(game.board().en_passant_target(), Some(Square::E3));

        game.play("Nc6").expect("legal");
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.history(), ["e4", "Nc6"]);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut game = Game::new();
        game.play("e4").expect("legal");
        let before = game.clone();

        assert_eq!(game.play("e4"), Err(ResolveError::Illegal));
        assert_eq!(game.board(), before.board());
        assert_eq!(game.turn(), before.turn());
        assert_eq!(game.history(), before.history());
    }

    #[test]
    fn test_fools_mate() {
        let game = Game::from_moves(["f3", "e5", "g4", "Qh4#"]).expect("legal");
        assert_eq!(game.turn(), Color::White);
        assert!(game.is_check());
        assert!(game.is_checkmate());
    }

    #[test]
    fn test_from_moves_reports_ply() {
        let err = Game::from_moves(["e4", "e5", "Ke3"]).expect_err("illegal");
        assert_eq!(err.ply, 3);
        assert_eq!(err.token, "Ke3");
        assert_eq!(err.source, ResolveError::Illegal);
        assert_eq!(
            err.to_string(),
            "invalid move \"Ke3\" at ply 3: move is not possible"
        );
    }
}
