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

//! Pulling move tokens out of PGN text.
//!
//! This is not a full PGN parser: tag pairs, comments, variations, move
//! numbers, annotation glyphs and the game result are skipped, and what is
//! left are the tokens to hand to [`Game::play`](crate::game::Game::play).
//!
//! # Examples
//!
//! ```
//! use chessmask::movetext;
//!
//! let pgn = "[Event \"Casual\"]\n\n1. e4 {best by test} e5 2. Nf3 $1 Nc6 *\n";
//! let game = movetext::read_game(pgn, 0)?;
//! assert_eq!(movetext::extract_moves(game)?, ["e4", "e5", "Nf3", "Nc6"]);
//! # Ok::<_, movetext::MovetextError>(())
//! ```

use std::{error::Error, fmt};

/// Error when reading games from PGN text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MovetextError {
    /// The text contains no game at all.
    Empty,
    /// Fewer games than requested.
    GameNotFound { index: usize, count: usize },
    /// The game has no moves.
    NoMoves,
}

impl fmt::Display for MovetextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MovetextError::Empty => f.write_str("no game found"),
            MovetextError::GameNotFound { index, count } => write!(
                f,
                "game {} requested, but only {count} game(s) found",
                index + 1
            ),
            MovetextError::NoMoves => f.write_str("no moves found"),
        }
    }
}

impl Error for MovetextError {}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Splits PGN text into games. A game ends where a tag pair follows its
/// movetext.
pub fn games(pgn: &str) -> Vec<&str> {
    let mut games = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut in_movetext = false;

    for line in pgn.split_inclusive('\n') {
        let line_start = line.trim_start();
        if line_start.starts_with('[') {
            if in_movetext {
                games.push(&pgn[start..offset]);
                start = offset;
                in_movetext = false;
            }
        } else if !line_start.is_empty() {
            in_movetext = true;
        }
        offset += line.len();
    }

    if !pgn[start..].trim().is_empty() {
        games.push(&pgn[start..]);
    }

    games
}

/// The text of the game at `index` (starting at 0).
///
/// # Errors
///
/// Returns [`MovetextError::Empty`] for text without any game and
/// [`MovetextError::GameNotFound`] if `index` is out of range.
pub fn read_game(pgn: &str, index: usize) -> Result<&str, MovetextError> {
    let games = games(pgn);
    if games.is_empty() {
        return Err(MovetextError::Empty);
    }
    games
        .get(index)
        .copied()
        .ok_or(MovetextError::GameNotFound {
            index,
            count: games.len(),
        })
}

/// The move tokens of a single game, in order.
///
/// # Errors
///
/// Returns [`MovetextError::NoMoves`] if nothing but tags, comments, move
/// numbers and the result is found.
pub fn extract_moves(game: &str) -> Result<Vec<&str>, MovetextError> {
    let mut moves = Vec::new();
    let mut rest = game;
    let mut depth = 0usize;

    loop {
        rest = rest.trim_start();
        let Some(ch) = rest.chars().next() else {
            break;
        };

        match ch {
            '[' => rest = skip_past(rest, ']'),
            '{' => rest = skip_past(rest, '}'),
            ';' | '%' => rest = skip_past(rest, '\n'),
            '(' => {
                depth += 1;
                rest = &rest[1..];
            }
            ')' => {
                depth = depth.saturating_sub(1);
                rest = &rest[1..];
            }
            '}' => rest = &rest[1..],
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | ';' | '(' | ')'))
                    .unwrap_or(rest.len());
                let (token, tail) = rest.split_at(end);
                rest = tail;

                if depth > 0 {
                    continue;
                }
                if let Some(token) = move_token(token) {
                    moves.push(token);
                }
            }
        }
    }

    if moves.is_empty() {
        Err(MovetextError::NoMoves)
    } else {
        Ok(moves)
    }
}

fn skip_past(s: &str, needle: char) -> &str {
    s.find(needle).map_or("", |pos| &s[pos + needle.len_utf8()..])
}

/// Strips a leading move number and trailing `!`/`?` glyphs. Returns `None`
/// for tokens that are not moves.
fn move_token(token: &str) -> Option<&str> {
    if RESULTS.contains(&token) || is_nag(token) {
        return None;
    }

    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let token = if digits > 0
        && token[digits..].starts_with('.')
        && btoi::btou::<u32>(token[..digits].as_bytes()).is_ok()
    {
        token[digits..].trim_start_matches('.')
    } else {
        token
    };

    let token = token.trim_end_matches(|c| c == '!' || c == '?');
    (!token.is_empty()).then_some(token)
}

fn is_nag(token: &str) -> bool {
    token
        .strip_prefix('$')
        .is_some_and(|number| btoi::btou::<u8>(number.as_bytes()).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GAMES: &str = "\
[Event \"First\"]
[Result \"1-0\"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0

[Event \"Second\"]
[Result \"0-1\"]

1. f3 e5 2. g4 Qh4# 0-1
";

    #[test]
    fn test_games() {
        let games = games(TWO_GAMES);
        assert_eq!(games.len(), 2);
        assert!(games[0].starts_with("[Event \"First\"]"));
        assert!(games[1].starts_with("[Event \"Second\"]"));
    }

    #[test]
    fn test_read_game() {
        let game = read_game(TWO_GAMES, 1).expect("second game");
        assert_eq!(extract_moves(game), Ok(vec!["f3", "e5", "g4", "Qh4#"]));

        assert_eq!(
            read_game(TWO_GAMES, 2),
            Err(MovetextError::GameNotFound { index: 2, count: 2 })
        );
        assert_eq!(read_game("", 0), Err(MovetextError::Empty));
        assert_eq!(read_game(" \n\n", 0), Err(MovetextError::Empty));
    }

    #[test]
    fn test_extract_moves() {
        let game = read_game(TWO_GAMES, 0).expect("first game");
        assert_eq!(
            extract_moves(game),
            Ok(vec!["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"])
        );
    }

    #[test]
    fn test_skips_annotations() {
        let game = "1. e4 {King's pawn} 1... c5!? ; Sicilian\n\
                    2.Nf3 $1 (2. c3 d5) d6 3. d4?! cxd4 1/2-1/2";
        assert_eq!(
            extract_moves(game),
            Ok(vec!["e4", "c5", "Nf3", "d6", "d4", "cxd4"])
        );
    }

    #[test]
    fn test_castling_is_not_a_move_number() {
        assert_eq!(extract_moves("10. 0-0 0-0-0 *"), Ok(vec!["0-0", "0-0-0"]));
    }

    #[test]
    fn test_no_moves() {
        assert_eq!(
            extract_moves("[Event \"Empty\"]\n\n*\n"),
            Err(MovetextError::NoMoves)
        );
    }
}
