use skyjobot::card::{HIDDEN_SENTINEL, mean_card_value};
use skyjobot::{GameError, InvalidAction, RowConfig, RowGame};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn sorted_action_targets_the_mapped_cell() -> Result<(), GameError> {
    let mut game = RowGame::with_prefix(RowConfig::default(), &[8, 9, 10, 5])?;
    assert_eq!(game.observation(), vec![-3, -3, -3, 5]);

    let step = game.step(2)?;
    let deck = game.deck();
    // All cells tie on the sentinel, so the second sorted slot is cell 1.
    assert_eq!(deck.values(), &[8, 5, 10]);
    assert_eq!(deck.mask(), &[false, true, false]);
    assert_eq!(game.snapshot().pile[3], 9);
    assert_eq!(game.snapshot().cursor, 4);
    assert_eq!(&step.observation[..3], &[-3, -3, 5]);
    assert_eq!(step.observation[3], game.drawn_card());
    assert!(!step.done);
    Ok(())
}

#[test]
fn sorted_action_skips_over_visible_cells() -> Result<(), GameError> {
    let config = RowConfig {
        initial_visible: 2,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[7, 2, 9, 4])?;
    // Row [7, 2, hidden] sorts as [hidden, 2, 7]: action 1 is the hidden cell.
    let step = game.step(1)?;
    assert_eq!(game.deck().values(), &[7, 2, 4]);
    assert!(game.deck().is_fully_visible());
    assert_eq!(&step.observation[..3], &[2, 4, 7]);
    // Non-terminal rewards are the expected-total delta.
    assert!(close(step.reward, mean_card_value(150) - 4.0));
    Ok(())
}

#[test]
fn round_penalty_is_opt_in() -> Result<(), GameError> {
    let config = RowConfig {
        initial_visible: 2,
        round_penalty: true,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[7, 2, 9, 4])?;
    let step = game.step(1)?;
    assert!(close(step.reward, mean_card_value(150) - 4.0 - 0.1));
    Ok(())
}

#[test]
fn discard_action_flips_leftmost_hidden_cell() -> Result<(), GameError> {
    let config = RowConfig {
        initial_visible: 1,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[3, 6, 11, 12])?;
    game.step(0)?;
    assert_eq!(game.deck().mask(), &[true, true, false]);
    assert_eq!(game.deck().values(), &[3, 6, 11]);
    let snapshot = game.snapshot();
    // The discarded card stays where it was; the next card is on offer.
    assert_eq!(snapshot.pile[3], 12);
    assert_eq!(snapshot.cursor, 4);
    assert_eq!(snapshot.round, 1);
    Ok(())
}

#[test]
fn game_ends_at_max_rounds_with_final_total() -> Result<(), GameError> {
    let config = RowConfig {
        max_rounds: 2,
        initial_visible: 3,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[12, 11, 10])?;
    assert!(!game.step(0)?.done);
    let last = game.step(0)?;
    assert!(last.done);
    assert!(close(last.reward, -33.0));
    assert_eq!(game.step(0).unwrap_err(), GameError::GameOver);
    Ok(())
}

#[test]
fn game_ends_early_on_non_positive_visible_total() -> Result<(), GameError> {
    let config = RowConfig {
        initial_visible: 2,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[-2, -1, 0, -2])?;
    let step = game.step(1)?;
    assert_eq!(game.deck().values(), &[-2, -1, -2]);
    assert!(step.done);
    assert!(close(step.reward, 5.0));
    Ok(())
}

#[test]
fn matching_row_is_cleared() -> Result<(), GameError> {
    let config = RowConfig {
        initial_visible: 2,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[4, 4, 1, 4])?;
    let step = game.step(1)?;
    assert_eq!(game.deck().values(), &[0, 0, 0]);
    assert!(step.done);
    assert!(close(step.reward, 0.0));
    Ok(())
}

#[test]
fn out_of_range_action_is_rejected_without_side_effects() -> Result<(), GameError> {
    let mut game = RowGame::new(RowConfig::default())?;
    let before = game.snapshot();
    assert_eq!(
        game.step(4).unwrap_err(),
        GameError::InvalidAction(InvalidAction::ActionIndex(4))
    );
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.legal_actions(), vec![0, 1, 2, 3]);
    Ok(())
}

#[test]
fn reset_can_change_initial_visible_count() -> Result<(), GameError> {
    let mut game = RowGame::new(RowConfig::default())?;
    game.step(3)?;
    let observation = game.reset(Some(&[1, 2, 3, 4][..]), Some(3))?;
    assert_eq!(observation, vec![1, 2, 3, 4]);
    assert_eq!(game.round(), 0);
    assert_eq!(game.config().initial_visible, 3);

    let before = game.snapshot();
    assert!(game.reset(None, Some(4)).is_err());
    assert_eq!(game.snapshot(), before);
    assert!(game.observation().iter().all(|&v| v != HIDDEN_SENTINEL));
    Ok(())
}

#[test]
fn pile_wraps_around_behind_the_row() -> Result<(), GameError> {
    let config = RowConfig {
        max_rounds: 400,
        initial_visible: 3,
        ..RowConfig::default()
    };
    let mut game = RowGame::with_prefix(config, &[12, 11, 12])?;
    let mut tail: Vec<i8> = game.snapshot().pile[3..].to_vec();
    tail.sort_unstable();
    for _ in 0..300 {
        let step = game.step(0)?;
        assert!(!step.done);
        let snapshot = game.snapshot();
        assert!((3..150).contains(&snapshot.cursor));
        assert_eq!(&snapshot.pile[..3], &[12, 11, 12]);
        let mut current = snapshot.pile[3..].to_vec();
        current.sort_unstable();
        assert_eq!(current, tail);
    }
    Ok(())
}
