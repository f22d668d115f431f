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

//! A chess rules engine driven by algebraic notation.
//!
//! Every piece gets a [`Mask`](mask::Mask) of the squares it can move to or
//! capture on. Attack, check and checkmate detection are built on masks,
//! and so is the resolver that turns notation like `Nbd7`, `exd6 e.p.` or
//! `O-O-O+` into the steps that are then played on the [`Board`].
//!
//! # Examples
//!
//! Resolve and play moves:
//!
//! ```
//! use chessmask::{san, Board, Color, Square};
//!
//! let mut board = Board::new();
//!
//! let steps = san::resolve(&board, Color::White, "e4")?;
//! board.play_unchecked(&steps);
//!
//! assert!(board.is_empty(Square::E2));
//! assert_eq!(board.en_passant_target(), Some(Square::E3));
//! # Ok::<_, chessmask::san::ResolveError>(())
//! ```
//!
//! Keep track of a whole game:
//!
//! ```
//! use chessmask::game::Game;
//!
//! let game = Game::from_moves(["f3", "e5", "g4", "Qh4#"])?;
//! assert!(game.is_checkmate());
//! # Ok::<_, chessmask::game::GameError>(())
//! ```
//!
//! # Feature flags
//!
//! * `cli`: Builds the `chessmask` binary. Enabled by default.
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   [`Square`], [`Color`] and [`Role`], using their string representations.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![doc(html_root_url = "https://docs.rs/chessmask/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

#[macro_use]
mod util;
mod castling_side;
mod color;
mod play;
mod role;
mod square;
mod types;

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod game;
pub mod mask;
pub mod movetext;
pub mod san;

pub use bitboard::Bitboard;
pub use board::{Board, ParseBoardError};
pub use castling_side::CastlingSide;
pub use color::{Color, ParseColorError};
pub use play::Speculation;
pub use role::Role;
pub use square::{File, ParseSquareError, Rank, Square};
pub use types::{MoveSteps, Piece, Step};

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for File {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Rank {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Role {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
