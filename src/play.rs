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

//! Executing moves, for real and speculatively.

use std::ops::Deref;

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::{
    bitboard::Bitboard,
    board::Board,
    role::Role,
    square::Square,
    types::{MoveSteps, Piece, Step},
};

impl Board {
    /// Executes the steps of a move in order.
    ///
    /// Per step: a pawn arriving on the en passant target removes the pawn
    /// that made the double advance, the piece is relocated, the moved set
    /// follows it, the en passant target is recomputed and a pawn reaching
    /// its last rank becomes a queen.
    ///
    /// It is the caller's responsibility to ensure the steps are legal (see
    /// [`resolve`](crate::san::resolve)).
    ///
    /// # Examples
    ///
    /// ```
    /// use chessmask::{Board, Square, Step};
    ///
    /// let mut board = Board::new();
    /// board.play_unchecked(&[Step::new(Square::E2, Square::E4)]);
    ///
    /// assert!(board.is_empty(Square::E2));
    /// assert!(board.has_moved(Square::E4));
    /// assert_eq!(board.en_passant_target(), Some(Square::E3));
    /// ```
    pub fn play_unchecked(&mut self, steps: &[Step]) {
        for &step in steps {
            debug!(%step, "executing step");
            self.apply_step(step);
        }
    }

    /// Plays the steps of a move on this board until the returned guard is
    /// dropped, which restores the exact previous state.
    ///
    /// The guard dereferences to the board with the move applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use chessmask::{Board, MoveSteps, Square, Step};
    ///
    /// let mut board = Board::new();
    /// let before = board.clone();
    /// let steps: MoveSteps = [Step::new(Square::G1, Square::F3)].into_iter().collect();
    ///
    /// {
    ///     let speculation = board.speculate(&steps);
    ///     assert!(speculation.is_empty(Square::G1));
    /// }
    ///
    /// assert_eq!(board, before);
    /// ```
    pub fn speculate(&mut self, steps: &MoveSteps) -> Speculation<'_> {
        let mut speculation = Speculation {
            saved: ArrayVec::new(),
            moved: self.moved,
            ep_target: self.ep_target,
            board: self,
        };

        for &step in steps {
            trace!(%step, "speculating step");
            if let Some(victim) = speculation.board.en_passant_victim(step) {
                speculation.save(victim);
            }
            speculation.save(step.from);
            speculation.save(step.to);
            speculation.board.apply_step(step);
        }

        speculation
    }

    /// Square of the pawn captured en passant by this step, if any.
    pub(crate) fn en_passant_victim(&self, Step { from, to }: Step) -> Option<Square> {
        let mover = self.piece_at(from)?;
        if mover.role != Role::Pawn || self.ep_target != Some(to) || from.file() == to.file() {
            return None;
        }
        let victim = Square::from_coords(to.file(), from.rank());
        (self.piece_at(victim) == Some(Role::Pawn.of(!mover.color))).then_some(victim)
    }

    fn apply_step(&mut self, step: Step) {
        let Step { from, to } = step;

        if let Some(victim) = self.en_passant_victim(step) {
            self.remove_piece_at(victim);
            self.moved.discard(victim);
        }

        let Some(piece) = self.remove_piece_at(from) else {
            self.ep_target = None;
            return;
        };

        self.set_piece_at(to, piece);
        self.moved.discard(from);
        self.moved.add(to);

        self.ep_target = if piece.role == Role::Pawn
            && from.file() == to.file()
            && from.distance(to) == 2
        {
            from.offset(0, piece.color.pawn_direction())
        } else {
            None
        };

        if piece.role == Role::Pawn && to.rank() == piece.color.promotion_rank() {
            self.set_piece_at(to, Role::Queen.of(piece.color));
        }
    }
}

/// A move played speculatively on a [`Board`].
///
/// Holds the original contents of every square the move touched, the moved
/// set and the en passant target, and puts all of them back when dropped.
#[derive(Debug)]
pub struct Speculation<'a> {
    board: &'a mut Board,
    saved: ArrayVec<(Square, Option<Piece>), 6>,
    moved: Bitboard,
    ep_target: Option<Square>,
}

impl Speculation<'_> {
    fn save(&mut self, sq: Square) {
        if self.saved.iter().all(|&(saved, _)| saved != sq) {
            self.saved.push((sq, self.board.piece_at(sq)));
        }
    }
}

impl Deref for Speculation<'_> {
    type Target = Board;

    #[inline]
    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        for (sq, piece) in self.saved.drain(..) {
            self.board.squares[usize::from(sq)] = piece;
        }
        self.board.moved = self.moved;
        self.board.ep_target = self.ep_target;
    }
}
