//! Async engine tests (virtual time)

use tokio::time::{self, Duration, Instant};

use tetra_quest::core::{Board, GameSession, PieceSource};
use tetra_quest::engine::{spawn_engine, spawn_engine_with, EngineConfig, EngineError};
use tetra_quest::types::{ActionKind, Command, GameEvent, GameStatus, PieceKind};

fn sequence(kinds: &[PieceKind]) -> GameSession {
    GameSession::with_source(PieceSource::sequence(kinds.iter().copied()))
}

#[tokio::test(start_paused = true)]
async fn test_seeded_engines_agree() {
    let config = EngineConfig::default().with_seed(42);
    let mut a = spawn_engine(&config);
    let mut b = spawn_engine(&config);

    for engine in [&a, &b] {
        engine.send(Command::Start).await.unwrap();
        engine.send(Command::HardDrop).await.unwrap();
        engine.send(Command::HardDrop).await.unwrap();
    }

    for _ in 0..4 {
        let left = a.next_observation().await.unwrap();
        let right = b.next_observation().await.unwrap();
        assert_eq!(left, right);
    }
}

#[tokio::test(start_paused = true)]
async fn test_observations_follow_command_order() {
    let mut engine = spawn_engine_with(sequence(&[PieceKind::T]), &EngineConfig::default());
    engine.next_observation().await.unwrap();

    engine.send(Command::Start).await.unwrap();
    engine.send(Command::MoveLeft).await.unwrap();
    engine.send(Command::RotateCw).await.unwrap();

    let start = engine.next_observation().await.unwrap();
    assert_eq!(start.events.as_slice(), &[GameEvent::GameStart]);

    let moved = engine.next_observation().await.unwrap();
    assert_eq!(moved.snapshot.flags.last_action, Some(ActionKind::Move));
    assert_eq!(moved.snapshot.active.map(|p| p.x), Some(2));

    let rotated = engine.next_observation().await.unwrap();
    assert_eq!(rotated.snapshot.flags.last_action, Some(ActionKind::Rotate));
    // Flags reflect only what happened since the previous observation.
    assert!(!rotated.snapshot.flags.game_start);
}

#[tokio::test(start_paused = true)]
async fn test_resume_restarts_full_interval() {
    let mut engine = spawn_engine_with(sequence(&[PieceKind::T]), &EngineConfig::default());
    engine.next_observation().await.unwrap();
    engine.send(Command::Start).await.unwrap();
    engine.next_observation().await.unwrap();

    time::sleep(Duration::from_millis(900)).await;
    engine.send(Command::Pause).await.unwrap();
    engine.next_observation().await.unwrap();

    time::sleep(Duration::from_secs(5)).await;
    engine.send(Command::Pause).await.unwrap();
    let resumed = engine.next_observation().await.unwrap();
    assert_eq!(resumed.snapshot.status, GameStatus::Running);
    let t0 = Instant::now();

    let step = engine.next_observation().await.unwrap();
    assert_eq!(t0.elapsed(), Duration::from_millis(1200));
    assert_eq!(step.snapshot.active.map(|p| p.y), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_game_over_stops_gravity() {
    let mut rows = vec![vec![0u8; 10]; 20];
    for row in rows.iter_mut().skip(2) {
        row[4] = 1;
    }
    let board = Board::from_rows(&rows).unwrap();
    let session = GameSession::from_board(board, PieceSource::sequence([PieceKind::O]));
    let mut engine = spawn_engine_with(session, &EngineConfig::default());
    engine.next_observation().await.unwrap();

    engine.send(Command::HardDrop).await.unwrap();
    let over = engine.next_observation().await.unwrap();
    assert_eq!(over.snapshot.status, GameStatus::GameOver);
    assert!(over.snapshot.flags.game_over);

    time::advance(Duration::from_secs(30)).await;
    tokio::task::yield_now().await;
    assert!(engine.try_next_observation().is_none());

    // A new game can start from game over.
    engine.send(Command::Start).await.unwrap();
    let restarted = engine.next_observation().await.unwrap();
    assert_eq!(restarted.snapshot.status, GameStatus::Running);
    assert_eq!(restarted.snapshot.grid.iter().flatten().filter(|&&c| c != 0).count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_zero_capacity_is_clamped_to_one() {
    let engine = spawn_engine(&EngineConfig::default().with_max_pending(0));

    assert_eq!(engine.try_send(Command::Start), Ok(()));
    assert_eq!(engine.try_send(Command::Pause), Err(EngineError::Busy));

    let session = engine.shutdown().await.unwrap();
    assert_eq!(session.status(), GameStatus::Running);
}
