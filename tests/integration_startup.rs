//! Integration test to ensure a game can start up and be driven without errors.

use gloom::{
    Action, EntityKind, Frame, Game, GameState, GenerationConfig, GloomResult, Input, MemorySlot,
    MessageKind, TurnOutcome, UiMode,
};

#[test]
fn test_basic_startup() -> GloomResult<()> {
    let state = GameState::new_game(12345)?;

    assert_eq!(state.turn_number, 0);
    assert_eq!(state.map.depth, 1);
    assert_eq!(state.mode, UiMode::Normal);

    let player_pos = state.player_position()?;
    assert!(state.map.is_walkable(player_pos));
    assert_eq!(player_pos, state.map.rooms[0].center());
    assert!(state.is_lit(player_pos));

    let stairs = state
        .store
        .iter()
        .filter(|e| e.kind == EntityKind::Stairs)
        .count();
    assert_eq!(stairs, 1);

    let welcome = state.messages.last().map(|m| m.kind);
    assert_eq!(welcome, Some(MessageKind::Welcome));
    Ok(())
}

#[test]
fn test_frame_after_startup() -> GloomResult<()> {
    let state = GameState::new_game_with_config(GenerationConfig::for_testing(99))?;
    let frame = Frame::capture(&state)?;

    let text = frame.to_text();
    assert!(text.contains('@'));
    assert!(text.contains("HP: 30/30"));
    assert!(text.contains("Hello and welcome, adventurer"));
    assert!(frame.overlay.is_none());
    Ok(())
}

#[test]
fn test_driving_with_keys() -> GloomResult<()> {
    let mut game = Game::new_game(2024, Box::new(MemorySlot::new()))?;

    for key in ["c", "Escape", "i", "Escape", "`", "`"] {
        assert_eq!(game.handle_input(&Input::key(key))?, TurnOutcome::Idle);
    }
    assert_eq!(game.state().mode, UiMode::Normal);
    assert_eq!(game.state().turn_number, 0);

    // Waiting always takes a turn while alive.
    for _ in 0..5 {
        if game.state().mode != UiMode::Normal {
            break;
        }
        assert_eq!(game.apply(Action::Move { dx: 0, dy: 0 })?, TurnOutcome::TurnTaken);
    }
    assert!(game.state().turn_number >= 1);
    Ok(())
}

#[test]
fn test_same_seed_same_start() -> GloomResult<()> {
    let a = GameState::new_game(777)?;
    let b = GameState::new_game(777)?;
    assert_eq!(a, b);

    let c = GameState::new_game(778)?;
    assert_ne!(a.map, c.map);
    Ok(())
}
