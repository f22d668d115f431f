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

//! Per-piece move masks.
//!
//! A [`Mask`] describes how the piece on one square can interact with every
//! other square of the board: which squares it can move to, which it can
//! capture on and where it can capture en passant.
//!
//! # Examples
//!
//! ```
//! use chessmask::{mask::{Mask, MaskFlags, MaskMode}, Board, Square};
//!
//! let board = Board::new();
//! let mask = Mask::generate(&board, Square::G1, MaskMode::Moves);
//!
//! assert_eq!(mask.get(Square::F3), MaskFlags::MOVE | MaskFlags::CAPTURE);
//! assert_eq!(mask.get(Square::E2), MaskFlags::empty());
//! assert_eq!(mask.squares().count(), 2);
//! ```

use std::{
    fmt::{self, Write as _},
    ops,
};

use bitflags::bitflags;

use crate::{
    bitboard::Bitboard,
    board::Board,
    color::Color,
    role::Role,
    square::{File, Rank, Square},
};

bitflags! {
    /// How a piece can interact with a square.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MaskFlags: u8 {
        /// The piece can move to the (empty) square.
        const MOVE = 1;
        /// The piece attacks the square and captures whatever enemy piece
        /// stands there.
        const CAPTURE = 2;
        /// The square is the en passant target and a pawn can capture there.
        const EN_PASSANT = 4;
    }
}

/// Which view of pawn captures a [`Mask`] should contain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MaskMode {
    /// Only squares the piece can actually go to. Pawns do not get empty
    /// diagonal squares (except the en passant target).
    Moves,
    /// Every square the piece attacks, including empty diagonal squares in
    /// front of pawns. Used to decide if a square is attacked.
    Attacks,
}

const ORTHOGONALS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
];

/// Flags for every square of the board, as seen by a single piece.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Mask {
    flags: [MaskFlags; 64],
}

impl Mask {
    /// A mask without any flagged square.
    pub const EMPTY: Mask = Mask {
        flags: [MaskFlags::empty(); 64],
    };

    /// Computes the mask of the piece standing on `sq`. An empty square
    /// gives an empty mask.
    ///
    /// Castling is not part of the king's mask.
    pub fn generate(board: &Board, sq: Square, mode: MaskMode) -> Mask {
        let mut mask = Mask::EMPTY;

        let Some(piece) = board.piece_at(sq) else {
            return mask;
        };

        match piece.role {
            Role::Pawn => mask.add_pawn(board, sq, piece.color, mode),
            Role::Knight => mask.add_knight(board, sq, piece.color),
            Role::Bishop => mask.add_rays(board, sq, piece.color, &DIAGONALS, 7),
            Role::Rook => mask.add_rays(board, sq, piece.color, &ORTHOGONALS, 7),
            Role::Queen => {
                mask.add_rays(board, sq, piece.color, &DIAGONALS, 7);
                mask.add_rays(board, sq, piece.color, &ORTHOGONALS, 7);
            }
            Role::King => {
                mask.add_rays(board, sq, piece.color, &DIAGONALS, 1);
                mask.add_rays(board, sq, piece.color, &ORTHOGONALS, 1);
            }
        }

        mask
    }

    #[inline]
    pub fn get(&self, sq: Square) -> MaskFlags {
        self.flags[usize::from(sq)]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, flags: MaskFlags) {
        self.flags[usize::from(sq)] = flags;
    }

    /// Checks if any square is flagged.
    pub fn is_empty(&self) -> bool {
        self.flags.iter().all(|flags| flags.is_empty())
    }

    /// All flagged squares.
    pub fn squares(&self) -> Bitboard {
        Square::all().filter(|&sq| !self.get(sq).is_empty()).collect()
    }

    fn add_rays(
        &mut self,
        board: &Board,
        from: Square,
        color: Color,
        directions: &[(i32, i32)],
        length: u32,
    ) {
        for &(files, ranks) in directions {
            let mut sq = from;
            for _ in 0..length {
                let Some(next) = sq.offset(files, ranks) else {
                    break;
                };
                sq = next;

                match board.color_at(sq) {
                    None => self.set(sq, MaskFlags::MOVE | MaskFlags::CAPTURE),
                    Some(blocker) => {
                        if blocker != color {
                            self.set(sq, MaskFlags::CAPTURE);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn add_knight(&mut self, board: &Board, from: Square, color: Color) {
        for (files, ranks) in KNIGHT_JUMPS {
            let Some(to) = from.offset(files, ranks) else {
                continue;
            };
            match board.color_at(to) {
                None => self.set(to, MaskFlags::MOVE | MaskFlags::CAPTURE),
                Some(other) if other != color => self.set(to, MaskFlags::CAPTURE),
                Some(_) => (),
            }
        }
    }

    fn add_pawn(&mut self, board: &Board, from: Square, color: Color, mode: MaskMode) {
        let forward = color.pawn_direction();

        // Advances, two squares only for a pawn that has never moved.
        let advances = if board.has_moved(from) { 1 } else { 2 };
        let mut sq = from;
        for _ in 0..advances {
            match sq.offset(0, forward) {
                Some(next) if board.is_empty(next) => {
                    self.set(next, MaskFlags::MOVE);
                    sq = next;
                }
                _ => break,
            }
        }

        let diagonals = [-1, 1].map(|files| from.offset(files, forward));

        for to in diagonals.into_iter().flatten() {
            if board.is_empty(to) || board.is_enemy_of(to, color) {
                self.set(to, MaskFlags::CAPTURE);
            }
        }

        if let Some(ep) = board.en_passant_target() {
            if self.get(ep) == MaskFlags::CAPTURE && ep.relative_rank(color) == Rank::Sixth {
                self.set(ep, MaskFlags::CAPTURE | MaskFlags::EN_PASSANT);
            }
        }

        if mode == MaskMode::Moves {
            for to in diagonals.into_iter().flatten() {
                if self.get(to) == MaskFlags::CAPTURE && board.is_empty(to) {
                    self.set(to, MaskFlags::empty());
                }
            }
        }
    }
}

impl Default for Mask {
    fn default() -> Mask {
        Mask::EMPTY
    }
}

impl ops::Index<Square> for Mask {
    type Output = MaskFlags;

    #[inline]
    fn index(&self, sq: Square) -> &MaskFlags {
        &self.flags[usize::from(sq)]
    }
}

fn flags_char(flags: MaskFlags) -> char {
    if flags.is_empty() {
        '_'
    } else if flags == MaskFlags::MOVE {
        '.'
    } else if flags == MaskFlags::CAPTURE {
        'x'
    } else if flags == MaskFlags::MOVE | MaskFlags::CAPTURE {
        '-'
    } else if flags.contains(MaskFlags::EN_PASSANT) {
        '&'
    } else {
        '?'
    }
}

/// Renders the mask as eight rows, rank 8 first: `_` for untouched squares,
/// `.` move only, `x` capture only, `-` move or capture and `&` en passant.
impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                f.write_char(flags_char(self.get(Square::from_coords(file, rank))))?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
