#![no_main]

use chessmask::{game::Game, movetext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(pgn) = std::str::from_utf8(data) {
        for game in movetext::games(pgn) {
            if let Ok(moves) = movetext::extract_moves(game) {
                let _ = Game::from_moves(moves);
            }
        }
    }
});
