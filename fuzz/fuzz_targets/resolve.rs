#![no_main]

use chessmask::{game::Game, san, Board, Color};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(token) = std::str::from_utf8(data) {
        let board = Board::new();
        for color in Color::ALL {
            if let Ok(steps) = san::resolve(&board, color, token) {
                let mut played = board.clone();
                played.play_unchecked(&steps);
                assert_ne!(played, board);
            }
        }

        let mut game = Game::new();
        let before = game.board().clone();
        if game.play(token).is_err() {
            assert_eq!(game.board(), &before);
            assert!(game.history().is_empty());
        }
    }
});
