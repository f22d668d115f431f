use chessmask::{attacks, Board, Color};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

#[serde_as]
#[derive(Deserialize)]
struct Record {
    #[serde_as(as = "DisplayFromStr")]
    board: Board,
    #[serde_as(as = "DisplayFromStr")]
    color: Color,
    check: bool,
    checkmate: bool,
}

#[test]
fn test_checkmate_reference() {
    let mut reader = csv::Reader::from_path("tests/checkmate.csv").expect("reader");

    for (i, record) in reader.deserialize().enumerate() {
        let record: Record = record.expect("record");
        let before = record.board.clone();

        assert_eq!(
            attacks::is_check(&record.board, record.color),
            record.check,
            "check, line {}",
            i + 1
        );
        assert_eq!(
            attacks::is_checkmate(&record.board, record.color),
            record.checkmate,
            "checkmate, line {}",
            i + 1
        );
        assert_eq!(record.board, before, "board changed, line {}", i + 1);
    }
}
