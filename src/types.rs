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

use std::fmt;

use arrayvec::ArrayVec;

use crate::{color::Color, role::Role, square::Square};

/// A piece with [`Color`] and [`Role`].
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// Gets the letter of the piece, uppercase for white and lowercase for
    /// black.
    pub fn char(self) -> char {
        self.color.fold_wb(self.role.upper_char(), self.role.char())
    }

    /// Parses a piece letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use chessmask::{Color, Piece, Role};
    ///
    /// assert_eq!(Piece::from_char('R'), Some(Role::Rook.of(Color::White)));
    /// assert_eq!(Piece::from_char('q'), Some(Role::Queen.of(Color::Black)));
    /// assert_eq!(Piece::from_char('_'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Piece> {
        Role::from_char(ch).map(|role| role.of(Color::from_white(ch.is_ascii_uppercase())))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Write::write_char(f, self.char())
    }
}

/// One atomic relocation of a piece.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Step {
    pub from: Square,
    pub to: Square,
}

impl Step {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Step {
        Step { from, to }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// The relocations making up one move, executed in order.
///
/// Every move is a single step, except castling, which is the king step
/// followed by the rook step.
pub type MoveSteps = ArrayVec<Step, 2>;
