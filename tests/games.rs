use chessmask::{
    attacks::{self, Outcome},
    game::Game,
    movetext,
    san::ResolveError,
    Board, Color, Role, Square,
};
use serde::Deserialize;
use serde_with::{formats::SpaceSeparator, serde_as, StringWithSeparator};

#[serde_as]
#[derive(Deserialize)]
struct Record {
    name: String,
    #[serde_as(as = "StringWithSeparator<SpaceSeparator, String>")]
    moves: Vec<String>,
    checkmate: bool,
}

fn records() -> Vec<Record> {
    let mut reader = csv::Reader::from_path("tests/games.csv").expect("reader");
    reader
        .deserialize()
        .map(|record| record.expect("record"))
        .collect()
}

/// Copies only the pieces, dropping the moved set and the en passant target.
fn pieces_only(board: &Board) -> Board {
    let mut fresh = Board::empty();
    for (sq, piece) in board.pieces() {
        fresh.set_piece_at(sq, piece);
    }
    fresh
}

#[test]
fn test_replay_games() {
    for record in records() {
        let game = Game::from_moves(&record.moves)
            .unwrap_or_else(|err| panic!("{}: {}", record.name, err));
        assert_eq!(game.is_checkmate(), record.checkmate, "{}", record.name);
        assert_eq!(game.history().len(), record.moves.len(), "{}", record.name);
    }
}

#[test]
fn test_opera_game_final_position() {
    let record = records()
        .into_iter()
        .find(|record| record.name == "opera")
        .expect("opera game");
    let game = Game::from_moves(&record.moves).expect("legal");

    let expected: Board = "
        _n_Rkb_r
        p____ppp
        ____q___
        ____p_B_
        ____P___
        ________
        PPP__PPP
        __K_____
    "
    .parse()
    .expect("valid board");

    assert_eq!(game.board().to_string(), expected.to_string());
    assert_eq!(game.turn(), Color::Black);
    assert!(game.is_check());
}

#[test]
fn test_state_is_consistent_after_every_move() {
    for record in records() {
        let mut game = Game::new();
        for token in &record.moves {
            let mut scratch = game.board().clone();
            let steps = chessmask::san::resolve(&scratch, game.turn(), token).expect("legal");

            let before = scratch.clone();
            attacks::would_result_in(&mut scratch, game.turn(), &steps, Outcome::Check);
            attacks::would_result_in(&mut scratch, game.turn(), &steps, Outcome::Checkmate);
            assert_eq!(scratch, before, "{}: {}", record.name, token);

            game.play(token).expect("legal");

            let rebuilt = pieces_only(game.board());
            for color in Color::ALL {
                assert_eq!(
                    attacks::is_check(game.board(), color),
                    attacks::is_check(&rebuilt, color),
                    "{}: {}",
                    record.name,
                    token
                );
            }
        }
    }
}

#[test]
fn test_en_passant_game() {
    let game = Game::from_moves(["e4", "Nf6", "e5", "d5", "exd6 e.p."]).expect("legal");
    assert!(game.board().is_empty(Square::D5));
    assert_eq!(
        game.board().piece_at(Square::D6),
        Some(Role::Pawn.of(Color::White))
    );
    assert_eq!(game.board().en_passant_target(), None);
}

#[test]
fn test_castling_game() {
    let game = Game::from_moves(["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O", "Nf6", "d3", "0-0"])
        .expect("legal");
    for (sq, piece) in [
        (Square::G1, Role::King.of(Color::White)),
        (Square::F1, Role::Rook.of(Color::White)),
        (Square::G8, Role::King.of(Color::Black)),
        (Square::F8, Role::Rook.of(Color::Black)),
    ] {
        assert_eq!(game.board().piece_at(sq), Some(piece));
    }
}

#[test]
fn test_failed_move_in_sequence() {
    let err = Game::from_moves(["e4", "e5", "Nf3", "Nf6", "Nxe5", "Nxe4", "Qe2", "Nf6", "Nc6#"])
        .expect_err("discovered check is not mate");
    assert_eq!(err.ply, 9);
    assert_eq!(err.token, "Nc6#");
    assert_eq!(
        err.source,
        ResolveError::MetaMismatch(chessmask::san::MetaTags::CHECKMATE)
    );

    let mut game = Game::from_moves(["e4", "e5", "Nf3", "Nf6", "Nxe5", "Nxe4", "Qe2", "Nf6"])
        .expect("legal");
    game.play("Nc6+").expect("discovered check");
    assert!(game.is_check());
    assert!(!game.is_checkmate());
}

#[test]
fn test_pgn_to_game() {
    let pgn = "\
[Event \"Paris\"]
[White \"Morphy\"]
[Black \"Duke Karl / Count Isouard\"]
[Result \"1-0\"]

1. e4 e5 2. Nf3 d6 3. d4 Bg4 {This is a weak move already.} 4. dxe5 Bxf3
5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5
11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7
16. Qb8+ Nxb8 17. Rd8# 1-0
";
    let text = movetext::read_game(pgn, 0).expect("game");
    let moves = movetext::extract_moves(text).expect("moves");
    assert_eq!(moves.len(), 33);

    let game = Game::from_moves(moves).expect("legal");
    assert!(game.is_checkmate());
}
