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

//! The piece placement and move history of a game.

use std::{
    error::Error,
    fmt::{self, Write as _},
    str::FromStr,
};

use crate::{
    bitboard::Bitboard,
    color::Color,
    role::Role,
    square::{File, Rank, Square},
    types::Piece,
};

/// Piece positions on a board, together with the history needed to decide
/// castling and en passant.
///
/// # Examples
///
/// ```
/// use chessmask::{Board, Color, Square};
///
/// let board = Board::new();
/// assert_eq!(board.piece_at(Square::E1), Some(Color::White.king()));
/// assert!(board.is_empty(Square::E4));
///
/// assert_eq!(board.to_string().lines().next(), Some("  a b c d e f g h"));
/// ```
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) moved: Bitboard,
    pub(crate) ep_target: Option<Square>,
}

impl Board {
    /// The standard starting position. No piece has moved.
    pub fn new() -> Board {
        let mut board = Board::empty();
        let backrank = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];
        for (file, role) in File::ALL.into_iter().zip(backrank) {
            for color in Color::ALL {
                let home = color.backrank();
                let pawn_rank = Rank::Second.relative_to(color);
                board.set_piece_at(Square::from_coords(file, home), role.of(color));
                board.set_piece_at(Square::from_coords(file, pawn_rank), Role::Pawn.of(color));
            }
        }
        board
    }

    /// A board without any pieces.
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
            moved: Bitboard::EMPTY,
            ep_target: None,
        }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[usize::from(sq)]
    }

    #[inline]
    pub fn role_at(&self, sq: Square) -> Option<Role> {
        self.piece_at(sq).map(|piece| piece.role)
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|piece| piece.color)
    }

    /// Puts a piece on a square, replacing whatever was there.
    ///
    /// This is board setup, not a move: the move history is left alone.
    #[inline]
    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) {
        self.squares[usize::from(sq)] = Some(piece);
    }

    /// Removes and returns the piece on a square.
    #[inline]
    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        self.squares[usize::from(sq)].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Checks if the square holds a piece of the opposite color.
    ///
    /// Empty squares are never enemies.
    #[inline]
    pub fn is_enemy_of(&self, sq: Square, color: Color) -> bool {
        self.color_at(sq) == Some(!color)
    }

    /// Checks if the piece on the square has made at least one move.
    #[inline]
    pub fn has_moved(&self, sq: Square) -> bool {
        self.moved.contains(sq)
    }

    /// Squares occupied by a piece that has moved at least once.
    #[inline]
    pub fn moved(&self) -> Bitboard {
        self.moved
    }

    /// Flags the piece on the square as already moved. Useful when setting
    /// up positions that did not arise from play.
    pub fn mark_moved(&mut self, sq: Square) {
        self.moved.add(sq);
    }

    /// The square a pawn skipped over with a double advance on the previous
    /// move.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }

    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.ep_target = target;
    }

    /// Iterates over occupied squares and their pieces, `a1` first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn occupied(&self) -> Bitboard {
        self.pieces().map(|(sq, _)| sq).collect()
    }

    pub fn by_color(&self, color: Color) -> Bitboard {
        self.pieces()
            .filter(|(_, piece)| piece.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn by_piece(&self, piece: Piece) -> Bitboard {
        self.pieces()
            .filter(|&(_, p)| p == piece)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Finds the king of the given color.
    ///
    /// Boards are expected to have exactly one king per side. If there are
    /// several, the one with the lowest square index is returned.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.by_piece(color.king()).first()
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(" ")?;
        for file in File::ALL {
            write!(f, " {file}")?;
        }
        f.write_char('\n')?;

        for rank in Rank::ALL.into_iter().rev() {
            f.write_char(rank.char())?;
            for file in File::ALL {
                let ch = self
                    .piece_at(Square::from_coords(file, rank))
                    .map_or('_', Piece::char);
                write!(f, " {ch}")?;
            }
            f.write_char('\n')?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")?;
        if self.moved.any() {
            f.write_str("moved:")?;
            for sq in self.moved {
                write!(f, " {sq}")?;
            }
            f.write_char('\n')?;
        }
        if let Some(ep) = self.ep_target {
            writeln!(f, "en passant: {ep}")?;
        }
        Ok(())
    }
}

/// Error when parsing a board diagram.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseBoardError {
    /// The diagram does not have exactly eight rows.
    RowCount { rows: usize },
    /// A row does not have exactly eight squares.
    RowLength { rank: Rank, len: usize },
    /// A square is neither a piece letter nor `_`.
    InvalidSymbol { rank: Rank, ch: char },
}

impl fmt::Display for ParseBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseBoardError::RowCount { rows } => write!(f, "expected 8 rows, got {rows}"),
            ParseBoardError::RowLength { rank, len } => {
                write!(f, "rank {rank} has {len} squares, expected 8")
            }
            ParseBoardError::InvalidSymbol { rank, ch } => {
                write!(f, "invalid symbol {ch:?} on rank {rank}")
            }
        }
    }
}

impl Error for ParseBoardError {}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses a diagram of eight rows, rank 8 first, separated by `/` or
    /// whitespace. Each row has eight symbols: a piece letter (uppercase
    /// for white) or `_` for an empty square.
    ///
    /// All pieces are considered unmoved and there is no en passant target.
    fn from_str(s: &str) -> Result<Board, ParseBoardError> {
        let rows: Vec<&str> = s
            .split(|ch: char| ch == '/' || ch.is_whitespace())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != 8 {
            return Err(ParseBoardError::RowCount { rows: rows.len() });
        }

        let mut board = Board::empty();

        for (row, rank) in rows.into_iter().zip(Rank::ALL.into_iter().rev()) {
            let len = row.chars().count();
            if len != 8 {
                return Err(ParseBoardError::RowLength { rank, len });
            }

            for (ch, file) in row.chars().zip(File::ALL) {
                if ch == '_' {
                    continue;
                }
                let piece = Piece::from_char(ch).ok_or(ParseBoardError::InvalidSymbol { rank, ch })?;
                board.set_piece_at(Square::from_coords(file, rank), piece);
            }
        }

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::new();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.by_color(Color::Black).count(), 16);
        assert_eq!(board.king_of(Color::White), Some(Square::E1));
        assert_eq!(board.king_of(Color::Black), Some(Square::E8));
        assert_eq!(board.piece_at(Square::D8), Some(Role::Queen.of(Color::Black)));
        assert_eq!(board.moved(), Bitboard::EMPTY);
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn test_display() {
        let expected = concat!(
            "  a b c d e f g h\n",
            "8 r n b q k b n r\n",
            "7 p p p p p p p p\n",
            "6 _ _ _ _ _ _ _ _\n",
            "5 _ _ _ _ _ _ _ _\n",
            "4 _ _ _ _ _ _ _ _\n",
            "3 _ _ _ _ _ _ _ _\n",
            "2 P P P P P P P P\n",
            "1 R N B Q K B N R\n",
        );
        assert_eq!(Board::new().to_string(), expected);
    }

    #[test]
    fn test_parse() {
        let board: Board = "rnbqkbnr/pppppppp/________/________/________/________/PPPPPPPP/RNBQKBNR"
            .parse()
            .expect("valid board");
        assert_eq!(board, Board::new());

        let board: Board = "
            k_______
            _Q______
            __K_____
            ________
            ________
            ________
            ________
            ________"
            .parse()
            .expect("valid board");
        assert_eq!(board.piece_at(Square::A8), Some(Color::Black.king()));
        assert_eq!(board.piece_at(Square::B7), Some(Role::Queen.of(Color::White)));
        assert_eq!(board.king_of(Color::White), Some(Square::C6));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "k_______/________".parse::<Board>(),
            Err(ParseBoardError::RowCount { rows: 2 })
        );
        assert_eq!(
            "k______/________/________/________/________/________/________/_______K"
                .parse::<Board>(),
            Err(ParseBoardError::RowLength {
                rank: Rank::Eighth,
                len: 7
            })
        );
        assert_eq!(
            "k_______/________/________/___x____/________/________/________/_______K"
                .parse::<Board>(),
            Err(ParseBoardError::InvalidSymbol {
                rank: Rank::Fifth,
                ch: 'x'
            })
        );
    }

    #[test]
    fn test_enemies() {
        let board = Board::new();
        assert!(board.is_enemy_of(Square::E7, Color::White));
        assert!(!board.is_enemy_of(Square::E2, Color::White));
        assert!(!board.is_enemy_of(Square::E4, Color::White));
        assert!(!board.is_enemy_of(Square::E4, Color::Black));
    }
}
