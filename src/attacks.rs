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

//! Attack and check detection.
//!
//! Everything here is built on [`Mask`]: a square is attacked if the mask of
//! some piece flags it with [`MaskFlags::CAPTURE`].
//!
//! # Examples
//!
//! ```
//! use chessmask::{attacks, Board, Color, Square};
//!
//! let board: Board = "
//!     _r______
//!     ________
//!     ________
//!     ________
//!     ________
//!     ________
//!     _K______
//!     ________
//! ".parse()?;
//!
//! assert!(attacks::is_attacked(&board, Square::B2, Color::Black));
//! assert!(attacks::is_check(&board, Color::White));
//! assert!(!attacks::is_attacked(&board, Square::A2, Color::Black));
//! # Ok::<_, chessmask::ParseBoardError>(())
//! ```

use std::iter;

use tracing::trace;

use crate::{
    bitboard::Bitboard,
    board::Board,
    color::Color,
    mask::{Mask, MaskFlags, MaskMode},
    role::Role,
    square::Square,
    types::{MoveSteps, Step},
};

/// A claim about the position after a move.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    Check,
    Checkmate,
}

/// Tests if any piece of `by` attacks `sq`.
///
/// Pawns attack their empty diagonal squares as well.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    board.by_color(by).into_iter().any(|from| {
        Mask::generate(board, from, MaskMode::Attacks)
            .get(sq)
            .contains(MaskFlags::CAPTURE)
    })
}

/// Squares of the pieces of color `of` that could capture on `sq`, kings
/// excluded.
pub fn attackers_of(board: &Board, sq: Square, of: Color) -> Bitboard {
    board
        .pieces()
        .filter(|&(_, piece)| piece.color == of && piece.role != Role::King)
        .filter(|&(from, _)| {
            Mask::generate(board, from, MaskMode::Moves)
                .get(sq)
                .contains(MaskFlags::CAPTURE)
        })
        .map(|(from, _)| from)
        .collect()
}

/// Tests if the king of `color` is attacked. A board without that king is
/// never in check.
pub fn is_check(board: &Board, color: Color) -> bool {
    board
        .king_of(color)
        .is_some_and(|king| is_attacked(board, king, !color))
}

/// Tests if the king of `color` is checkmated.
///
/// Every way out of the check is tried on a scratch copy of the board: king
/// steps, capturing a lone checker (en passant included) and interposing
/// against a lone sliding checker.
///
/// # Examples
///
/// ```
/// use chessmask::{attacks, Board, Color};
///
/// let board: Board = "
///     k_______
///     _Q______
///     __K_____
///     ________
///     ________
///     ________
///     ________
///     ________
/// ".parse()?;
///
/// assert!(attacks::is_checkmate(&board, Color::Black));
/// # Ok::<_, chessmask::ParseBoardError>(())
/// ```
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_of(color) else {
        return false;
    };
    if !is_attacked(board, king, !color) {
        return false;
    }

    let mut scratch = board.clone();

    let king_steps = Mask::generate(board, king, MaskMode::Moves).squares();
    if king_steps
        .into_iter()
        .any(|to| escapes(&mut scratch, color, Step::new(king, to)))
    {
        return false;
    }

    // Double check leaves only king steps.
    let Some(checker) = attackers_of(board, king, !color).single_square() else {
        return true;
    };

    let captures = attackers_of(board, checker, color)
        .into_iter()
        .map(|from| Step::new(from, checker))
        .chain(en_passant_captures(board, checker, color));
    for step in captures {
        if escapes(&mut scratch, color, step) {
            return false;
        }
    }

    if board.role_at(checker).is_some_and(Role::is_slider) {
        let blocks = MaskFlags::MOVE | MaskFlags::EN_PASSANT;
        for sq in between(checker, king) {
            let defenders = board
                .pieces()
                .filter(|&(_, piece)| piece.color == color && piece.role != Role::King)
                .filter(|&(from, _)| {
                    Mask::generate(board, from, MaskMode::Moves)
                        .get(sq)
                        .intersects(blocks)
                })
                .map(|(from, _)| from)
                .collect::<Bitboard>();
            for from in defenders {
                if escapes(&mut scratch, color, Step::new(from, sq)) {
                    return false;
                }
            }
        }
    }

    true
}

/// Plays `steps` for `mover` speculatively and tests if the opponent ends up
/// in check or checkmate. The board is unchanged afterwards.
///
/// # Examples
///
/// ```
/// use chessmask::{attacks::{self, Outcome}, Board, Color, MoveSteps, Square, Step};
///
/// let mut board: Board = "
///     ____k___
///     ________
///     ________
///     ________
///     ________
///     ________
///     ________
///     R___K___
/// ".parse()?;
/// let before = board.clone();
///
/// let rook_lift: MoveSteps = [Step::new(Square::A1, Square::A8)].into_iter().collect();
/// assert!(attacks::would_result_in(&mut board, Color::White, &rook_lift, Outcome::Check));
/// assert!(!attacks::would_result_in(&mut board, Color::White, &rook_lift, Outcome::Checkmate));
/// assert_eq!(board, before);
/// # Ok::<_, chessmask::ParseBoardError>(())
/// ```
pub fn would_result_in(
    board: &mut Board,
    mover: Color,
    steps: &MoveSteps,
    outcome: Outcome,
) -> bool {
    let speculation = board.speculate(steps);
    let result = match outcome {
        Outcome::Check => is_check(&speculation, !mover),
        Outcome::Checkmate => is_checkmate(&speculation, !mover),
    };
    trace!(?outcome, %mover, result, "evaluated speculative move");
    result
}

/// Tests if playing `steps` would leave the king of `mover` attacked.
pub fn leaves_in_check(board: &mut Board, mover: Color, steps: &MoveSteps) -> bool {
    would_result_in(board, !mover, steps, Outcome::Check)
}

/// Squares strictly between `a` and `b` if they share a rank, file or
/// diagonal.
pub fn between(a: Square, b: Square) -> Bitboard {
    let files = b.file() as i32 - a.file() as i32;
    let ranks = b.rank() as i32 - a.rank() as i32;
    if (files, ranks) == (0, 0) || (files != 0 && ranks != 0 && files.abs() != ranks.abs()) {
        return Bitboard::EMPTY;
    }

    let (df, dr) = (files.signum(), ranks.signum());
    let mut squares = Bitboard::EMPTY;
    let mut sq = a;
    while let Some(next) = sq.offset(df, dr) {
        if next == b {
            break;
        }
        squares.add(next);
        sq = next;
    }
    squares
}

fn en_passant_captures(board: &Board, checker: Square, color: Color) -> impl Iterator<Item = Step> + '_ {
    let target = board
        .en_passant_target()
        .filter(|ep| ep.offset(0, -color.pawn_direction()) == Some(checker));

    target.into_iter().flat_map(move |ep| {
        board
            .by_piece(Role::Pawn.of(color))
            .into_iter()
            .filter(move |&from| {
                Mask::generate(board, from, MaskMode::Moves)
                    .get(ep)
                    .contains(MaskFlags::EN_PASSANT)
            })
            .map(move |from| Step::new(from, ep))
    })
}

fn escapes(scratch: &mut Board, color: Color, step: Step) -> bool {
    let steps: MoveSteps = iter::once(step).collect();
    !leaves_in_check(scratch, color, &steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(diagram: &str) -> Board {
        diagram.parse().expect("valid board")
    }

    fn single(from: Square, to: Square) -> MoveSteps {
        iter::once(Step::new(from, to)).collect()
    }

    #[test]
    fn test_rook_attacks_king() {
        let mut board = board(
            "
            _r______
            ________
            ________
            ________
            ________
            ________
            _K______
            ________
        ",
        );
        assert!(is_attacked(&board, Square::B2, Color::Black));
        board.play_unchecked(&[Step::new(Square::B2, Square::A2)]);
        assert!(!is_attacked(&board, Square::A2, Color::Black));
        assert!(!is_check(&board, Color::White));
    }

    #[test]
    fn test_is_attacked() {
        let board = board(
            "
            K______R
            ______q_
            ________
            ________
            ________
            ________
            ________
            _______k
        ",
        );
        assert!(!is_attacked(&board, Square::A8, Color::White));
        assert!(is_attacked(&board, Square::B8, Color::White));
        assert!(is_attacked(&board, Square::H1, Color::White));
        assert!(is_attacked(&board, Square::H8, Color::Black));
    }

    #[test]
    fn test_pawn_attacks_empty_diagonals() {
        let board = board(
            "
            ____k___
            ________
            ________
            ________
            ________
            ________
            ___P____
            ____K___
        ",
        );
        assert!(is_attacked(&board, Square::C3, Color::White));
        assert!(is_attacked(&board, Square::E3, Color::White));
        assert!(!is_attacked(&board, Square::D3, Color::White));
    }

    #[test]
    fn test_attackers_of() {
        let board = board(
            "
            k___R___
            _P______
            _N______
            ________
            ________
            ________
            R_______
            ____K___
        ",
        );
        let attackers = attackers_of(&board, Square::A8, Color::White);
        assert_eq!(
            attackers.into_iter().collect::<Vec<_>>(),
            [Square::A2, Square::B6, Square::B7, Square::E8]
        );
        assert!(attackers_of(&board, Square::A8, Color::Black).is_empty());
    }

    #[test]
    fn test_attackers_of_excludes_king() {
        let board = board(
            "
            ________
            ________
            ________
            ________
            ________
            __k_____
            _p______
            K_______
        ",
        );
        assert!(attackers_of(&board, Square::B2, Color::White).is_empty());
        assert!(is_attacked(&board, Square::B2, Color::White));
    }

    #[test]
    fn test_checkmate_queen_and_king() {
        let board = board(
            "
            k_______
            _Q______
            __K_____
            ________
            ________
            ________
            ________
            ________
        ",
        );
        assert!(is_checkmate(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::White));
    }

    #[test]
    fn test_queen_can_be_captured() {
        let board = board(
            "
            k_______
            _Q______
            ________
            ________
            ________
            ________
            ________
            _______K
        ",
        );
        assert!(is_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_back_rank_mate() {
        let board = board(
            "
            k____R__
            ppp_____
            ________
            ________
            ________
            ________
            ________
            ____K___
        ",
        );
        assert!(is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_checker_can_be_captured() {
        let board = board(
            "
            k____R__
            ppp_____
            _____r__
            ________
            ________
            ________
            ________
            ________
        ",
        );
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_checker_can_be_blocked() {
        let board = board(
            "
            k____R__
            ppp_____
            ____r___
            ________
            ________
            ________
            ________
            ________
        ",
        );
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_double_check() {
        let board = board(
            "
            k____R__
            _pp_____
            _____r__
            ________
            R_______
            ________
            ________
            ________
        ",
        );
        assert_eq!(attackers_of(&board, Square::A8, Color::White).count(), 2);
        assert!(is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_king_captures_undefended_checker() {
        let board = board(
            "
            k__R____
            _Q______
            R_______
            ________
            ________
            ________
            ________
            ________
        ",
        );
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_pinned_defender_cannot_capture() {
        let board = board(
            "
            ____R__k
            _______p
            _____n_P
            ____B___
            ________
            ________
            ________
            K_______
        ",
        );
        assert_eq!(
            attackers_of(&board, Square::E8, Color::Black),
            Bitboard::from_square(Square::F6)
        );
        assert!(is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_checking_pawn_captured_en_passant() {
        let mut board = board(
            "
            ___r___k
            ________
            ________
            ___pPB__
            ___BKB__
            ___PPP__
            ________
            ________
        ",
        );
        board.mark_moved(Square::D5);
        board.mark_moved(Square::E5);
        assert!(is_check(&board, Color::White));
        assert!(is_checkmate(&board, Color::White));

        board.set_en_passant_target(Some(Square::D6));
        assert!(!is_checkmate(&board, Color::White));
    }

    #[test]
    fn test_no_king_is_no_check() {
        let board = Board::empty();
        assert!(!is_check(&board, Color::White));
        assert!(!is_checkmate(&board, Color::White));
    }

    #[test]
    fn test_would_result_in_restores_board() {
        let mut board = board(
            "
            ____k___
            ________
            ________
            ___Pp___
            ________
            ________
            ________
            ____K___
        ",
        );
        board.set_en_passant_target(Some(Square::E6));
        let before = board.clone();

        let capture = single(Square::D5, Square::E6);
        assert!(!would_result_in(&mut board, Color::White, &capture, Outcome::Check));
        assert_eq!(board, before);
        assert_eq!(board.piece_at(Square::E5), Some(Role::Pawn.of(Color::Black)));
    }

    #[test]
    fn test_would_result_in_castling() {
        let mut board = board(
            "
            _____k__
            ________
            ________
            ________
            ________
            ________
            ________
            ____K__R
        ",
        );
        let before = board.clone();

        let castle: MoveSteps = [
            Step::new(Square::E1, Square::G1),
            Step::new(Square::H1, Square::F1),
        ]
        .into_iter()
        .collect();
        assert!(would_result_in(&mut board, Color::White, &castle, Outcome::Check));
        assert!(!would_result_in(&mut board, Color::White, &castle, Outcome::Checkmate));
        assert_eq!(board, before);
    }

    #[test]
    fn test_leaves_in_check() {
        let mut board = board(
            "
            ____r__k
            ________
            ________
            ________
            ________
            ________
            ____B___
            ____K___
        ",
        );
        assert!(leaves_in_check(&mut board, Color::White, &single(Square::E2, Square::D3)));
        assert!(!leaves_in_check(&mut board, Color::White, &single(Square::E1, Square::D1)));
    }

    #[test]
    fn test_between() {
        assert_eq!(
            between(Square::A1, Square::D4).into_iter().collect::<Vec<_>>(),
            [Square::B2, Square::C3]
        );
        assert_eq!(between(Square::H8, Square::H6), Bitboard::from_square(Square::H7));
        assert!(between(Square::A1, Square::B3).is_empty());
        assert!(between(Square::E4, Square::E5).is_empty());
    }
}
