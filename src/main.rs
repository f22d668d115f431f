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

use std::{
    fs,
    io::{self, BufRead as _, Write as _},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use chessmask::{game::Game, movetext};
use clap::Parser;
use color_eyre::{
    eyre::{bail, WrapErr as _},
    Result,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Replays a game from a PGN file and prints the final board, or plays a
/// game from the keyboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// PGN file to read the game from.
    #[arg(required_unless_present = "play")]
    file: Option<PathBuf>,
    /// Number of the game in the file, starting at 1.
    #[arg(default_value = "1")]
    index: NonZeroUsize,
    /// Read moves from standard input instead (`q` quits).
    #[arg(short, long, conflicts_with = "file")]
    play: bool,
}

fn main() -> Result<()> {
    install_tracing();
    color_eyre::install()?;

    let args = Args::parse();

    match args.file {
        Some(path) if !args.play => replay(&path, args.index.get() - 1),
        _ => play_interactive(),
    }
}

fn install_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn replay(path: &Path, index: usize) -> Result<()> {
    if path.extension().map_or(true, |ext| ext != "pgn") {
        bail!("{} is not a .pgn file", path.display());
    }

    let pgn = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let text = movetext::read_game(&pgn, index)
        .wrap_err_with(|| format!("failed to read a game from {}", path.display()))?;
    let moves = movetext::extract_moves(text)?;

    let game = Game::from_moves(moves)?;
    print!("{}", game.board());
    if game.is_checkmate() {
        println!("{} is checkmated", game.turn());
    }

    Ok(())
}

fn play_interactive() -> Result<()> {
    let mut game = Game::new();
    let mut stdout = io::stdout();
    let mut lines = io::stdin().lock().lines();

    println!("Input 'q' at any time to quit");

    loop {
        print!("{}", game.board());
        print!("{} to move: ", game.turn());
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let token = line.trim();

        if token == "q" {
            break;
        } else if token.is_empty() {
            continue;
        }

        match game.play(token) {
            Ok(_) if game.is_checkmate() => {
                print!("{}", game.board());
                println!("{} is checkmated", game.turn());
                break;
            }
            Ok(_) if game.is_check() => println!("{} is in check", game.turn()),
            Ok(_) => (),
            Err(err) => println!("{err}"),
        }
    }

    println!("Exited");
    Ok(())
}
