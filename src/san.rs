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

//! Read algebraic notation and resolve it against a board.
//!
//! A token like `Nbd7`, `exd6 e.p.`, `e8=Q+` or `O-O-O` is parsed into a
//! [`Notation`]: what moves where ([`San`]) plus the claims the writer made
//! about the move ([`MetaTags`]). Resolving finds the single piece that can
//! make the move, turns it into [`MoveSteps`] and checks every claim.
//!
//! # Examples
//!
//! ```
//! use chessmask::{san::{self, ResolveError}, Board, Color, Square, Step};
//!
//! let board = Board::new();
//!
//! let steps = san::resolve(&board, Color::White, "Nf3")?;
//! assert_eq!(steps.as_slice(), [Step::new(Square::G1, Square::F3)]);
//!
//! assert!(matches!(
//!     san::resolve(&board, Color::White, "Nxf3"),
//!     Err(ResolveError::MetaMismatch(_))
//! ));
//! # Ok::<_, ResolveError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use bitflags::bitflags;
use tracing::debug;

use crate::{
    attacks::{self, Outcome},
    bitboard::Bitboard,
    board::Board,
    castling_side::CastlingSide,
    color::Color,
    mask::{Mask, MaskFlags, MaskMode},
    role::Role,
    square::{File, Rank, Square},
    types::{MoveSteps, Step},
};

bitflags! {
    /// Claims embedded in a notation token.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MetaTags: u8 {
        /// `x` or `:`.
        const CAPTURE = 1;
        /// `-`.
        const MOVE = 1 << 1;
        /// `e.p.` or `(e.p.)`.
        const EN_PASSANT = 1 << 2;
        /// `=Q`, `(Q)`, `/Q` or `Q`.
        const PROMOTION = 1 << 3;
        /// `+` or `ch`.
        const CHECK = 1 << 4;
        /// `#`, `++` or `mate`.
        const CHECKMATE = 1 << 5;
    }
}

const SUFFIXES: [(MetaTags, &[&str]); 4] = [
    (MetaTags::CHECKMATE, &["#", "mate", "++"]),
    (MetaTags::CHECK, &["+", "ch"]),
    (MetaTags::PROMOTION, &["=Q", "(Q)", "/Q", "Q"]),
    (MetaTags::EN_PASSANT, &["(e.p.)", "e.p."]),
];

const CAPTURE_SYMBOLS: [char; 2] = [':', 'x'];

/// Error when parsing a syntactically invalid notation token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseNotationError {
    /// Nothing left after stripping the meta tags.
    Empty,
    /// More than five symbols left after stripping the meta tags.
    TooLong { len: usize },
    InvalidPiece(char),
    InvalidRank(Option<char>),
    InvalidFile(Option<char>),
    InvalidDeparture(char),
    Trailing(char),
    InvalidCastling,
}

impl fmt::Display for ParseNotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseNotationError::Empty => f.write_str("empty move"),
            ParseNotationError::TooLong { len } => {
                write!(f, "too many symbols ({len}, at most 5)")
            }
            ParseNotationError::InvalidPiece(ch) => write!(f, "invalid piece symbol '{ch}'"),
            ParseNotationError::InvalidRank(Some(ch)) => {
                write!(f, "invalid destination rank '{ch}'")
            }
            ParseNotationError::InvalidRank(None) => f.write_str("missing destination rank"),
            ParseNotationError::InvalidFile(Some(ch)) => {
                write!(f, "invalid destination file '{ch}'")
            }
            ParseNotationError::InvalidFile(None) => f.write_str("missing destination file"),
            ParseNotationError::InvalidDeparture(ch) => {
                write!(f, "invalid departure square symbol '{ch}'")
            }
            ParseNotationError::Trailing(ch) => write!(f, "unexpected symbol '{ch}'"),
            ParseNotationError::InvalidCastling => f.write_str("invalid castling move"),
        }
    }
}

impl Error for ParseNotationError {}

/// Why castling is impossible.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CastlingError {
    NoKing,
    KingMoved(Square),
    NoRook(CastlingSide),
    RookMoved(Square),
    KingAttacked(Square),
    Occupied(Square),
    Attacked(Square),
}

impl fmt::Display for CastlingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CastlingError::NoKing => f.write_str("no king found"),
            CastlingError::KingMoved(sq) => write!(f, "king ({sq}) was moved"),
            CastlingError::NoRook(side) => write!(f, "no rook found for {side}"),
            CastlingError::RookMoved(sq) => write!(f, "rook ({sq}) was moved"),
            CastlingError::KingAttacked(sq) => write!(f, "king ({sq}) is under attack"),
            CastlingError::Occupied(sq) => write!(f, "square {sq} is not empty"),
            CastlingError::Attacked(sq) => write!(f, "square {sq} is under attack"),
        }
    }
}

impl Error for CastlingError {}

/// Error when a notation token does not describe exactly one legal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolveError {
    Malformed(ParseNotationError),
    /// No piece can make the move.
    Illegal,
    /// The move would leave the own king attacked.
    SelfCheck,
    /// The destination holds the opposing king.
    KingCapture(Square),
    /// Several pieces can make the move.
    Ambiguous { candidates: usize },
    Castling(CastlingError),
    /// The move does not have the claimed property.
    MetaMismatch(MetaTags),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ResolveError::Malformed(ref err) => write!(f, "wrong input ({err})"),
            ResolveError::Illegal => f.write_str("move is not possible"),
            ResolveError::SelfCheck => f.write_str("move is not possible due to a check"),
            ResolveError::KingCapture(sq) => write!(f, "the king ({sq}) cannot be captured"),
            ResolveError::Ambiguous { candidates } => {
                write!(f, "move is ambiguous ({candidates} pieces can perform it)")
            }
            ResolveError::Castling(ref err) => write!(f, "castling impossible - {err}"),
            ResolveError::MetaMismatch(tag) => f.write_str(if tag == MetaTags::CAPTURE {
                "not a capture"
            } else if tag == MetaTags::EN_PASSANT {
                "not an en passant"
            } else if tag == MetaTags::PROMOTION {
                "not a pawn promotion"
            } else if tag == MetaTags::CHECK {
                "not a check"
            } else if tag == MetaTags::CHECKMATE {
                "not a checkmate"
            } else {
                "notation does not match the move"
            }),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::Malformed(err) => Some(err),
            ResolveError::Castling(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseNotationError> for ResolveError {
    fn from(err: ParseNotationError) -> ResolveError {
        ResolveError::Malformed(err)
    }
}

impl From<CastlingError> for ResolveError {
    fn from(err: CastlingError) -> ResolveError {
        ResolveError::Castling(err)
    }
}

/// What moves where, without any claims.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum San {
    Normal {
        role: Role,
        file: Option<File>,
        rank: Option<Rank>,
        to: Square,
    },
    Castle(CastlingSide),
}

impl San {
    fn parse_normal(token: &str) -> Result<San, ParseNotationError> {
        let len = token.chars().count();
        if len == 0 {
            return Err(ParseNotationError::Empty);
        } else if len > 5 {
            return Err(ParseNotationError::TooLong { len });
        }

        let mut chars = token.chars();

        let role = match token.chars().next() {
            Some(ch) if ch.is_uppercase() => {
                chars.next();
                Role::from_char(ch).ok_or(ParseNotationError::InvalidPiece(ch))?
            }
            _ => Role::Pawn,
        };

        let to_rank = chars.next_back();
        let to_rank = to_rank
            .and_then(Rank::from_char)
            .ok_or(ParseNotationError::InvalidRank(to_rank))?;
        let to_file = chars.next_back();
        let to_file = to_file
            .and_then(File::from_char)
            .ok_or(ParseNotationError::InvalidFile(to_file))?;

        let mut chars = chars.peekable();
        let file = chars.next_if(|&ch| File::from_char(ch).is_some()).and_then(File::from_char);
        let rank = match chars.next() {
            Some(ch) => Some(Rank::from_char(ch).ok_or(ParseNotationError::InvalidDeparture(ch))?),
            None => None,
        };
        if let Some(ch) = chars.next() {
            return Err(ParseNotationError::Trailing(ch));
        }

        Ok(San::Normal {
            role,
            file,
            rank,
            to: Square::from_coords(to_file, to_rank),
        })
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            San::Normal {
                role,
                file,
                rank,
                to,
            } => {
                if role != Role::Pawn {
                    write!(f, "{}", role.upper_char())?;
                }
                if let Some(file) = file {
                    write!(f, "{}", file.char())?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", rank.char())?;
                }
                write!(f, "{to}")
            }
            San::Castle(side) => write!(f, "{side}"),
        }
    }
}

/// A parsed notation token: a [`San`] and the claims made about it.
///
/// # Examples
///
/// ```
/// use chessmask::{san::{MetaTags, Notation, San}, Role, Square};
///
/// let notation: Notation = "exd8=Q+".parse()?;
/// assert_eq!(notation.san, San::Normal {
///     role: Role::Pawn,
///     file: Some(chessmask::File::E),
///     rank: None,
///     to: Square::D8,
/// });
/// assert_eq!(notation.meta, MetaTags::CAPTURE | MetaTags::PROMOTION | MetaTags::CHECK);
/// # Ok::<_, chessmask::san::ParseNotationError>(())
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Notation {
    pub san: San,
    pub meta: MetaTags,
}

impl Notation {
    /// Finds the steps of the move on `board` for the side `color`.
    ///
    /// The board is only read: claims of check and checkmate are evaluated
    /// on a scratch copy.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if no piece or more than one piece can make
    /// the move, if the move leaves the own king in check, if castling is
    /// impossible or if a claim does not hold.
    pub fn resolve(&self, board: &Board, color: Color) -> Result<MoveSteps, ResolveError> {
        let steps = match self.san {
            San::Normal {
                role,
                file,
                rank,
                to,
            } => resolve_normal(board, color, role, file, rank, to)?,
            San::Castle(side) => resolve_castle(board, color, side)?,
        };
        verify_meta(board, color, &steps, self.meta)?;
        debug!(notation = %self.san, %color, ?steps, "resolved move");
        Ok(steps)
    }
}

impl FromStr for Notation {
    type Err = ParseNotationError;

    fn from_str(token: &str) -> Result<Notation, ParseNotationError> {
        let token = token.trim();
        if token.starts_with("O-O") || token.starts_with("0-0") {
            let (rest, meta) = strip_meta(token, false);
            let side = match rest.as_str() {
                "O-O" | "0-0" => CastlingSide::KingSide,
                "O-O-O" | "0-0-0" => CastlingSide::QueenSide,
                _ => return Err(ParseNotationError::InvalidCastling),
            };
            Ok(Notation {
                san: San::Castle(side),
                meta,
            })
        } else {
            let (rest, meta) = strip_meta(token, true);
            Ok(Notation {
                san: San::parse_normal(&rest)?,
                meta,
            })
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)?;
        if self.meta.contains(MetaTags::EN_PASSANT) {
            f.write_str(" e.p.")?;
        }
        if self.meta.contains(MetaTags::PROMOTION) {
            f.write_str("=Q")?;
        }
        if self.meta.contains(MetaTags::CHECKMATE) {
            f.write_str("#")?;
        } else if self.meta.contains(MetaTags::CHECK) {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// Parses `token` and resolves it on `board` for the side `color`.
///
/// # Errors
///
/// See [`Notation::resolve`]. Syntax errors are reported as
/// [`ResolveError::Malformed`].
pub fn resolve(board: &Board, color: Color, token: &str) -> Result<MoveSteps, ResolveError> {
    token.parse::<Notation>()?.resolve(board, color)
}

/// Removes suffixes (at most one per tag, in table order) and then infixes,
/// collecting the tags found.
fn strip_meta(token: &str, with_move_symbol: bool) -> (String, MetaTags) {
    let mut meta = MetaTags::empty();
    let mut rest = token;

    for (tag, suffixes) in SUFFIXES {
        if let Some(stripped) = suffixes.iter().find_map(|suffix| rest.strip_suffix(suffix)) {
            meta |= tag;
            rest = stripped.trim();
        }
    }

    let mut rest = rest.to_owned();
    if let Some(pos) = rest.find(&CAPTURE_SYMBOLS[..]) {
        rest.remove(pos);
        meta |= MetaTags::CAPTURE;
    }
    if with_move_symbol {
        if let Some(pos) = rest.find('-') {
            rest.remove(pos);
            meta |= MetaTags::MOVE;
        }
    }

    (rest.trim().to_owned(), meta)
}

fn resolve_normal(
    board: &Board,
    color: Color,
    role: Role,
    file: Option<File>,
    rank: Option<Rank>,
    to: Square,
) -> Result<MoveSteps, ResolveError> {
    let candidates: Bitboard = board
        .by_piece(role.of(color))
        .into_iter()
        .filter(|sq| file.map_or(true, |file| sq.file() == file))
        .filter(|sq| rank.map_or(true, |rank| sq.rank() == rank))
        .filter(|&from| !Mask::generate(board, from, MaskMode::Moves).get(to).is_empty())
        .collect();

    let from = match candidates.single_square() {
        Some(from) => from,
        None if candidates.is_empty() => return Err(ResolveError::Illegal),
        None => {
            return Err(ResolveError::Ambiguous {
                candidates: candidates.count(),
            })
        }
    };

    let mut steps = MoveSteps::new();
    steps.push(Step::new(from, to));

    if attacks::leaves_in_check(&mut board.clone(), color, &steps) {
        return Err(ResolveError::SelfCheck);
    }
    if board.piece_at(to) == Some(Role::King.of(!color)) {
        return Err(ResolveError::KingCapture(to));
    }

    Ok(steps)
}

/// Castling with the rook [`CastlingSide::rook_offset`] files away from
/// the king, on any rank.
///
/// If several rooks qualify, one that has already moved is preferred (and
/// then rejected). Only the squares the king crosses are tested for attacks,
/// but every square between king and rook has to be empty, and so does the
/// rook's path when it stands on another rank.
fn resolve_castle(
    board: &Board,
    color: Color,
    side: CastlingSide,
) -> Result<MoveSteps, CastlingError> {
    let king = board.king_of(color).ok_or(CastlingError::NoKing)?;
    if board.has_moved(king) {
        return Err(CastlingError::KingMoved(king));
    }

    let rooks: Bitboard = board
        .by_piece(Role::Rook.of(color))
        .into_iter()
        .filter(|rook| rook.file() as i32 - king.file() as i32 == side.rook_offset())
        .collect();
    let rook = (rooks & board.moved())
        .first()
        .or_else(|| rooks.first())
        .ok_or(CastlingError::NoRook(side))?;

    if board.has_moved(rook) {
        return Err(CastlingError::RookMoved(rook));
    }
    if attacks::is_attacked(board, king, !color) {
        return Err(CastlingError::KingAttacked(king));
    }

    let direction = side.direction();
    for distance in 1..side.rook_offset().abs() {
        let sq = king
            .offset(direction * distance, 0)
            .ok_or(CastlingError::NoRook(side))?;
        if !board.is_empty(sq) {
            return Err(CastlingError::Occupied(sq));
        }
        if distance <= 2 && attacks::is_attacked(board, sq, !color) {
            return Err(CastlingError::Attacked(sq));
        }
    }

    // A rook off the king's rank slides along its own rank.
    if rook.rank() != king.rank() {
        for distance in 1..side.rook_offset().abs() {
            let sq = rook
                .offset(-direction * distance, 0)
                .ok_or(CastlingError::NoRook(side))?;
            if !board.is_empty(sq) {
                return Err(CastlingError::Occupied(sq));
            }
        }
    }

    let king_to = king
        .offset(direction * 2, 0)
        .ok_or(CastlingError::NoRook(side))?;
    let rook_to = Square::from_coords(king.file(), rook.rank())
        .offset(direction, 0)
        .ok_or(CastlingError::NoRook(side))?;

    let mut steps = MoveSteps::new();
    steps.push(Step::new(king, king_to));
    steps.push(Step::new(rook, rook_to));
    Ok(steps)
}

/// Checks the claims against the last step, which is the rook step when
/// castling.
fn verify_meta(
    board: &Board,
    color: Color,
    steps: &MoveSteps,
    meta: MetaTags,
) -> Result<(), ResolveError> {
    let Some(&Step { from, to }) = steps.last() else {
        return Ok(());
    };

    let en_passant = Mask::generate(board, from, MaskMode::Moves)
        .get(to)
        .contains(MaskFlags::EN_PASSANT);

    if meta.contains(MetaTags::CAPTURE) && board.is_empty(to) && !en_passant {
        return Err(ResolveError::MetaMismatch(MetaTags::CAPTURE));
    }
    if meta.contains(MetaTags::EN_PASSANT) && !en_passant {
        return Err(ResolveError::MetaMismatch(MetaTags::EN_PASSANT));
    }
    if meta.contains(MetaTags::PROMOTION) && to.rank() != color.promotion_rank() {
        return Err(ResolveError::MetaMismatch(MetaTags::PROMOTION));
    }

    let mut scratch = board.clone();
    for (tag, outcome) in [
        (MetaTags::CHECK, Outcome::Check),
        (MetaTags::CHECKMATE, Outcome::Checkmate),
    ] {
        if meta.contains(tag) && !attacks::would_result_in(&mut scratch, color, steps, outcome) {
            return Err(ResolveError::MetaMismatch(tag));
        }
    }

    Ok(())
}
