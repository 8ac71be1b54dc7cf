use tui_match3::core::{BoardSession, GameSnapshot, SessionConfig};
use tui_match3::term::{encode_diff_into, AnchorY, GameView, Viewport};
use tui_match3::types::{Phase, Pos};

fn snapshot(phase: Phase) -> GameSnapshot {
    let session = BoardSession::new(SessionConfig::default(), 3).unwrap();
    let mut snap = session.snapshot();
    snap.phase = phase;
    snap
}

fn screen_text(fb: &tui_match3::term::FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn game_view_draws_border_corners() {
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let snap = snapshot(Phase::Idle);
    let viewport = Viewport::new(60, 20);
    let fb = view.render(&snap, None, viewport);

    let layout = view.layout(&snap, viewport);
    assert_eq!(layout.frame_w, 7 * 3 + 2);
    assert_eq!(layout.frame_h, 7 + 2);

    let (x, y) = (layout.x, layout.y);
    let (r, b) = (x + layout.frame_w - 1, y + layout.frame_h - 1);
    assert_eq!(fb.get(x, y).unwrap().ch, '┌');
    assert_eq!(fb.get(r, y).unwrap().ch, '┐');
    assert_eq!(fb.get(x, b).unwrap().ch, '└');
    assert_eq!(fb.get(r, b).unwrap().ch, '┘');
}

#[test]
fn game_view_draws_every_tile_letter() {
    let view = GameView::default();
    let snap = snapshot(Phase::Idle);
    let viewport = Viewport::new(60, 20);
    let fb = view.render(&snap, None, viewport);
    let layout = view.layout(&snap, viewport);

    for x in 0..snap.width {
        for y in 0..snap.height {
            let pos = Pos::new(x, y);
            let (cx, cy) = layout.cell_origin(pos);
            let expected = snap.cell(pos).unwrap().letter();
            assert_eq!(fb.get(cx + 1, cy).unwrap().ch, expected, "tile at {pos}");
        }
    }
}

#[test]
fn side_panel_lists_score_moves_and_progress() {
    let view = GameView::default();
    let mut snap = snapshot(Phase::Idle);
    snap.score = 1230;
    snap.moves_remaining = 4;
    snap.display_progress = 50.0;
    let fb = view.render(&snap, None, Viewport::new(60, 20));
    let text = screen_text(&fb);

    assert!(text.contains("SCORE"));
    assert!(text.contains("1230"));
    assert!(text.contains("MOVES"));
    assert!(text.contains("PROGRESS"));
    assert!(text.contains("█████░░░░░ 50%"));
    assert!(text.contains("TARGET"));
}

#[test]
fn cursor_is_bracketed() {
    let view = GameView::default();
    let snap = snapshot(Phase::Idle);
    let viewport = Viewport::new(60, 20);
    let pos = Pos::new(3, 2);
    let fb = view.render(&snap, Some(pos), viewport);
    let (cx, cy) = view.layout(&snap, viewport).cell_origin(pos);

    assert_eq!(fb.get(cx, cy).unwrap().ch, '[');
    assert_eq!(fb.get(cx + 2, cy).unwrap().ch, ']');
}

#[test]
fn terminal_phases_draw_overlays() {
    let view = GameView::default();
    let viewport = Viewport::new(60, 20);

    let won = screen_text(&view.render(&snapshot(Phase::Won), None, viewport));
    assert!(won.contains("YOU WIN"));
    assert!(!won.contains("GAME OVER"));

    let mut lost_snap = snapshot(Phase::Lost);
    lost_snap.score = 470;
    let lost = screen_text(&view.render(&lost_snap, None, viewport));
    assert!(lost.contains("GAME OVER"));
    assert!(lost.contains("SCORE 470"));
}

#[test]
fn mouse_hit_test_matches_drawn_cells() {
    let view = GameView::default();
    let snap = snapshot(Phase::Idle);
    let viewport = Viewport::new(60, 20);
    let layout = view.layout(&snap, viewport);

    let (cx, cy) = layout.cell_origin(Pos::new(0, 0));
    assert_eq!(view.cell_at(&snap, viewport, cx, cy), Some(Pos::new(0, 0)));

    let (cx, cy) = layout.cell_origin(Pos::new(6, 6));
    assert_eq!(view.cell_at(&snap, viewport, cx + 2, cy), Some(Pos::new(6, 6)));

    // Border and side panel are not cells.
    assert_eq!(view.cell_at(&snap, viewport, layout.x, layout.y + 1), None);
    assert_eq!(view.cell_at(&snap, viewport, 59, 10), None);
}

#[test]
fn selecting_a_tile_only_redraws_that_cell() {
    let view = GameView::default();
    let mut session = BoardSession::new(SessionConfig::default(), 3).unwrap();
    let viewport = Viewport::new(60, 20);

    let before = view.render(&session.snapshot(), None, viewport);
    session.select_tile(Pos::new(1, 1));
    let after = view.render(&session.snapshot(), None, viewport);

    let mut out = Vec::new();
    encode_diff_into(&before, &after, &mut out).unwrap();
    assert!(!out.is_empty());

    let changed = before
        .cells()
        .iter()
        .zip(after.cells())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, 3);
}
