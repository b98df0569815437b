#[cfg(test)]
mod tests {
    use amazons_core::logic::board::{Board, BoardPreset, Color, Coord};
    use amazons_core::logic::game::{GameState, GameStatus};
    use amazons_core::logic::rules::MoveError;

    fn c(col: i32, row: i32) -> Coord {
        Coord::new(col, row)
    }

    #[test]
    fn test_opening_move_and_arrow_on_vacated_cell() {
        let mut game = GameState::new(BoardPreset::Small8);
        let red: Vec<Coord> = game.board().pieces_of(Color::Red).map(|p| p.pos).collect();
        let blue: Vec<Coord> = game.board().pieces_of(Color::Blue).map(|p| p.pos).collect();
        assert_eq!(red, vec![c(2, 0), c(5, 0), c(0, 2), c(7, 2)]);
        assert_eq!(blue, vec![c(2, 7), c(5, 7), c(0, 5), c(7, 5)]);
        assert_eq!(game.turn(), Color::Red);

        game.move_piece(c(2, 0), c(2, 3)).unwrap();
        assert_eq!(game.turn(), Color::Red);

        let outcome = game.place_arrow(c(2, 0)).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(game.turn(), Color::Blue);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.board().has_block_at(c(2, 0)));
    }

    #[test]
    fn test_move_from_empty_cell() {
        let mut game = GameState::new(BoardPreset::Small8);
        assert_eq!(
            game.move_piece(c(0, 0), c(1, 1)),
            Err(MoveError::NoPieceAtSource)
        );
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_immobilizing_all_blue_queens() {
        let mut board = Board::empty(8);
        for pos in [c(0, 0), c(7, 0), c(0, 7), c(7, 7)] {
            board.add_piece(pos, Color::Blue);
        }
        for pos in [c(3, 3), c(4, 3), c(3, 4), c(4, 4)] {
            board.add_piece(pos, Color::Red);
        }
        let walls = [
            c(1, 0), c(0, 1), c(1, 1),
            c(6, 0), c(7, 1), c(6, 1),
            c(1, 7), c(0, 6), c(1, 6),
            c(6, 7), c(7, 6),
        ];
        for pos in walls {
            board.add_block(pos);
        }

        // (6, 6) is the last exit for the queen on (7, 7).
        let mut game = GameState::from_position(board, Color::Red);
        assert_eq!(game.status(), GameStatus::Playing);
        game.move_piece(c(4, 4), c(5, 5)).unwrap();
        let outcome = game.place_arrow(c(6, 6)).unwrap();

        assert_eq!(outcome.winner, Some(Color::Red));
        assert_eq!(game.status(), GameStatus::Finished { winner: Color::Red });
        assert_eq!(game.place_arrow(c(2, 2)), Err(MoveError::GameFinished));
    }

    #[test]
    fn test_standard_board_opening() {
        let game = GameState::new(BoardPreset::Standard10);
        let red: Vec<Coord> = game.board().pieces_of(Color::Red).map(|p| p.pos).collect();
        assert_eq!(red, vec![c(3, 0), c(6, 0), c(0, 3), c(9, 3)]);
        assert!(game.board().blocks.is_empty());
        let diagram = game.board().to_diagram();
        assert_eq!(diagram.lines().next(), Some(". . . R . . R . . ."));
        assert_eq!(diagram.lines().nth(9), Some(". . . B . . B . . ."));
    }
}
