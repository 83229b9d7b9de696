use peeksweep_core::*;
use rand::{SeedableRng, rngs::SmallRng};

fn all_coords(size: Coord) -> impl Iterator<Item = Coord2> {
    (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
}

fn dealt(size: Coord, difficulty: f64, seed: u64) -> Board {
    let mut board = Board::new(GameConfig::new(size, difficulty));
    board.initialize(&mut SmallRng::seed_from_u64(seed));
    board
}

fn counts_consistent(board: &Board) -> bool {
    let size = board.size();
    all_coords(size).all(|coords| {
        let cell = board[coords];
        if cell.is_hazard() {
            cell.neighbor_hazard_count() == HAZARD_SENTINEL
        } else {
            let expected = NeighborIter::new(coords, (size, size))
                .filter(|&pos| board[pos].is_hazard())
                .count();
            usize::from(cell.neighbor_hazard_count()) == expected
        }
    })
}

#[test]
fn grid_shape_is_square() {
    for size in [1, 2, 9, 24] {
        let board = dealt(size, 0.2, u64::from(size));
        let (rows, cols) = board.cells().dim();

        assert_eq!((rows, cols), (usize::from(size), usize::from(size)));
        assert_eq!(board.total_cells(), u32::from(size) * u32::from(size));
    }
}

#[test]
fn neighbor_counts_hold_after_generation_and_first_reveal() {
    for seed in 0..30 {
        let mut board = dealt(10, 0.24, seed);
        assert!(counts_consistent(&board));

        let mut rng = SmallRng::seed_from_u64(seed + 1000);
        board.reveal((5, 5), &mut rng);
        assert!(counts_consistent(&board));
    }
}

#[test]
fn first_reveal_never_loses_when_a_free_cell_exists() {
    for seed in 0..50 {
        let board = dealt(6, 0.5, seed);
        let has_free_cell = board
            .cells()
            .iter()
            .any(|cell| !cell.is_hazard() && !cell.has_reward());
        if !has_free_cell {
            continue;
        }
        for coords in all_coords(6) {
            let mut board = board.clone();
            board.reveal(coords, &mut SmallRng::seed_from_u64(seed));

            assert_ne!(board.evaluate_state(), GameState::Lost, "seed {} at {:?}", seed, coords);
        }
    }
}

#[test]
fn flood_fill_reaches_exactly_the_zero_region_and_border() {
    for seed in 0..20 {
        let mut board = dealt(12, 0.1, seed);
        let Some(start) = all_coords(12).find(|&c| {
            let cell = board[c];
            !cell.is_hazard() && cell.neighbor_hazard_count() == 0
        }) else {
            continue;
        };

        // a zero cell is never moved, so the reachable region can be computed up front
        let mut expected = vec![start];
        let mut frontier = vec![start];
        while let Some(coords) = frontier.pop() {
            if board[coords].neighbor_hazard_count() != 0 {
                continue;
            }
            for pos in NeighborIter::new(coords, (12, 12)) {
                if !board[pos].is_hazard() && !expected.contains(&pos) {
                    expected.push(pos);
                    frontier.push(pos);
                }
            }
        }
        expected.sort();

        board.reveal(start, &mut SmallRng::seed_from_u64(seed));

        let visited: Vec<Coord2> = all_coords(12).filter(|&c| board[c].is_visited()).collect();
        assert_eq!(visited, expected, "seed {}", seed);
        assert!(visited.iter().all(|&c| !board[c].is_hazard()));
    }
}

#[test]
fn rewards_change_only_through_dealing_visiting_and_peeking() {
    let mut board = Board::from_layout(GameConfig::new(4, 0.2), &[(0, 0)], &[(3, 3)]).unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(board.rewards_remaining(), 1);

    board.toggle_flag((2, 2));
    board.toggle_flag((2, 2));
    assert_eq!(board.rewards_remaining(), 1);

    assert_eq!(board.peek((9, 9)), PeekOutcome::OutOfBounds);
    assert_eq!(board.rewards_remaining(), 1);

    assert_eq!(board.peek((0, 0)), PeekOutcome::Hazard);
    assert_eq!(board.rewards_remaining(), 0);

    assert_eq!(board.peek((0, 0)), PeekOutcome::NoRewardAvailable);
    assert_eq!(board.rewards_remaining(), 0);

    board.reveal((3, 3), &mut rng);
    assert_eq!(board.rewards_remaining(), 1);
}

#[test]
fn lost_board_never_reports_won() {
    let mut board = Board::from_layout(GameConfig::new(3, 0.2), &[(1, 1)], &[]).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);

    board.reveal((0, 0), &mut rng);
    board.reveal((1, 1), &mut rng);
    assert_eq!(board.evaluate_state(), GameState::Lost);

    for coords in all_coords(3) {
        board.reveal(coords, &mut rng);
        assert_eq!(board.evaluate_state(), GameState::Lost);
    }
    assert_eq!(board.final_score(), 0);
}

#[test]
fn score_never_drops_below_size_and_difficulty_floor() {
    let mut board = Board::from_layout(GameConfig::new(6, 0.18), &[(0, 0)], &[]).unwrap();
    board.reveal((5, 5), &mut SmallRng::seed_from_u64(0));
    assert_eq!(board.evaluate_state(), GameState::Won);

    let floor = (36.0 * 20.0 + 0.18 * 5000.0) as u64;
    let score = board.final_score();
    assert!(score >= floor);
    assert!(score <= floor + 3000);
}

#[test]
fn one_cell_board_without_hazards_wins_immediately() {
    let mut board = dealt(1, 0.0, 42);
    assert_eq!(board.hazard_count(), 0);
    // the single safe cell also takes the only reward
    assert_eq!(board.rewards_remaining(), 1);

    board.reveal((0, 0), &mut SmallRng::seed_from_u64(0));

    assert_eq!(board.evaluate_state(), GameState::Won);
    let score = board.final_score();
    assert!((20 + 2990..=20 + 3000).contains(&score), "score {}", score);
    let stat = board.build_stat("solo").unwrap();
    assert_eq!(stat.score, score);
}

#[test]
fn lone_safe_cell_among_hazards_wins_without_flood() {
    let mask: Vec<bool> = all_coords(5).map(|c| c != (2, 2)).collect();
    let mut board = Board::new(GameConfig::new(5, 0.9));
    board.initialize(&mut ScriptedSource::from_hazard_mask(&mask, vec![0]));

    assert_eq!(board.hazard_count(), 24);
    assert_eq!(board[(2, 2)].neighbor_hazard_count(), 8);
    assert!(board[(2, 2)].has_reward());

    board.reveal((2, 2), &mut ScriptedSource::default());

    assert_eq!(board.evaluate_state(), GameState::Won);
    assert_eq!(all_coords(5).filter(|&c| board[c].is_visited()).count(), 1);
}

#[test]
fn peek_without_rewards_leaves_board_untouched() {
    let mut board = dealt(8, 0.2, 9);
    while board.rewards_remaining() > 0 {
        board.peek((0, 0));
    }
    let before = board.clone();

    assert_eq!(board.peek((3, 3)), PeekOutcome::NoRewardAvailable);
    assert_eq!(board, before);
}

#[test]
fn boards_serialize_mid_game() {
    let mut board = dealt(6, 0.2, 4);
    board.reveal((2, 2), &mut SmallRng::seed_from_u64(4));
    board.toggle_flag((0, 0));

    let json = serde_json::to_string(&board).unwrap();
    let restored: Board = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, board);
}
