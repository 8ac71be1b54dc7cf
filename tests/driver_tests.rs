use tui_match3::core::{find_matches, BoardSession, Grid, SelectOutcome, SessionConfig};
use tui_match3::engine::{apply_hint, find_matching_swap, Driver, DriverStage, DriverTiming, HintError};
use tui_match3::types::{Phase, Pos, SwapRejectReason, TileKind, TICK_MS};

fn scenario_session(moves: u32) -> BoardSession {
    let grid = Grid::from_fn(7, 7, |p| {
        if p.y == 0 {
            TileKind::new([0, 0, 1, 2, 3, 4, 5][p.x as usize])
        } else if p == Pos::new(2, 1) {
            TileKind::new(0)
        } else {
            TileKind::new((p.x + 2 * p.y) % 6)
        }
    });
    let mut s = BoardSession::with_grid(SessionConfig::new(7, 7, 6, moves), grid, 7).unwrap();
    s.drain_events();
    s
}

#[test]
fn matching_swap_waits_for_animations() {
    let mut s = scenario_session(10);
    let mut driver = Driver::default();
    s.request_swap(Pos::new(2, 0), Pos::new(2, 1));

    driver.tick(&mut s, TICK_MS);
    assert_eq!(driver.stage(), DriverStage::Swapping);
    assert_eq!(s.phase(), Phase::Swapping);
    assert_eq!(s.moves_remaining(), 9);
    assert_eq!(s.score(), 0);

    // Swap animation ends: first cascade pass lands, fall animation starts.
    driver.tick(&mut s, 300);
    assert_eq!(driver.stage(), DriverStage::Falling);
    assert_eq!(s.phase(), Phase::Resolving);
    assert!(s.score() >= 30);
    assert_eq!(s.cascade_passes(), 1);

    // Leftover time from earlier ticks already ate into the fall delay.
    driver.tick(&mut s, 100);
    assert_eq!(driver.stage(), DriverStage::Falling);
    assert_eq!(driver.wait_ms(), 500 - 16 - 100);

    let mut guard = 0;
    while driver.is_busy() {
        driver.tick(&mut s, TICK_MS);
        guard += 1;
        assert!(guard < 10_000, "driver never went idle");
    }
    assert_eq!(s.phase(), Phase::Idle);
    assert!(find_matches(s.grid()).is_empty());
}

#[test]
fn input_is_rejected_while_driver_is_busy() {
    let mut s = scenario_session(10);
    let mut driver = Driver::default();
    s.request_swap(Pos::new(2, 0), Pos::new(2, 1));
    driver.tick(&mut s, TICK_MS);

    assert_eq!(
        s.select_tile(Pos::new(4, 4)),
        SelectOutcome::Rejected(SwapRejectReason::Busy)
    );

    driver.run_until_idle(&mut s);
    assert_eq!(s.select_tile(Pos::new(4, 4)), SelectOutcome::Selected);
}

#[test]
fn run_until_idle_ignores_timing() {
    let mut s = scenario_session(1);
    let mut driver = Driver::default();
    s.request_swap(Pos::new(2, 0), Pos::new(2, 1));

    let phase = driver.run_until_idle(&mut s);
    assert!(phase.is_terminal());
    assert_eq!(driver.stage(), DriverStage::Idle);
}

#[test]
fn hint_driven_play_spends_one_move_per_turn() {
    let config = SessionConfig::new(8, 8, 4, 12);
    let mut s = BoardSession::new(config, 31).unwrap();
    let mut driver = Driver::new(DriverTiming::instant());

    let mut turns = 0;
    loop {
        match apply_hint(&mut s) {
            Ok((a, b)) => assert!(a.is_adjacent(b)),
            Err(HintError::NotPlayable) | Err(HintError::NoMatchingSwap) => break,
        }
        let before = s.moves_remaining();
        driver.run_until_idle(&mut s);
        turns += 1;
        assert_eq!(s.moves_remaining(), before - 1);
        assert!(s.grid().is_full());
        assert!(find_matches(s.grid()).is_empty());
    }

    assert!(turns > 0);
    assert!(s.score() > 0);
    assert_eq!(s.moves_remaining(), 12 - turns);
    if s.phase() == Phase::Idle {
        assert!(find_matching_swap(s.grid()).is_none());
    }
}

#[test]
fn hint_rejects_terminal_sessions() {
    let mut s = scenario_session(1);
    s.request_swap(Pos::new(2, 0), Pos::new(2, 1));
    s.settle();
    assert!(s.phase().is_terminal());
    assert_eq!(apply_hint(&mut s), Err(HintError::NotPlayable));
}
