//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board is drawn with `y = 0` on the bottom row, matching the grid's
//! gravity. [`BoardLayout`] holds the screen geometry so mouse clicks can be
//! mapped back to grid positions with the same arithmetic used for drawing.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, Pos, TileKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen placement of the board frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the border.
    pub x: u16,
    pub y: u16,
    /// Border size including the frame lines.
    pub frame_w: u16,
    pub frame_h: u16,
    pub cols: u8,
    pub rows: u8,
    pub cell_w: u16,
    pub cell_h: u16,
}

impl BoardLayout {
    /// Top-left screen cell of a grid position.
    pub fn cell_origin(&self, pos: Pos) -> (u16, u16) {
        let flipped = (self.rows.saturating_sub(1).saturating_sub(pos.y)) as u16;
        (
            self.x + 1 + (pos.x as u16) * self.cell_w,
            self.y + 1 + flipped * self.cell_h,
        )
    }

    /// Grid position under a screen cell, if any.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Pos> {
        if self.cell_w == 0 || self.cell_h == 0 {
            return None;
        }
        let ix = column.checked_sub(self.x + 1)? / self.cell_w;
        let iy = row.checked_sub(self.y + 1)? / self.cell_h;
        if ix >= self.cols as u16 || iy >= self.rows as u16 {
            return None;
        }
        Some(Pos::new(ix as u8, self.rows - 1 - iy as u8))
    }
}

/// Tile colors, cycled for catalogs larger than the palette.
const PALETTE: [Rgb; 8] = [
    Rgb::new(220, 70, 70),
    Rgb::new(90, 200, 100),
    Rgb::new(80, 130, 230),
    Rgb::new(235, 210, 70),
    Rgb::new(190, 100, 220),
    Rgb::new(70, 200, 210),
    Rgb::new(245, 150, 40),
    Rgb::new(200, 200, 200),
];

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PROGRESS_BAR_W: u16 = 10;

pub fn tile_color(kind: TileKind) -> Rgb {
    PALETTE[kind.index() % PALETTE.len()]
}

/// A lightweight terminal renderer for the match-3 board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 3 columns leave room for a cursor bracket on each side of the letter.
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board placement for this snapshot and viewport.
    pub fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> BoardLayout {
        let frame_w = (snap.width as u16) * self.cell_w + 2;
        let frame_h = (snap.height as u16) * self.cell_h + 2;
        let x = viewport.width.saturating_sub(frame_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        BoardLayout {
            x,
            y,
            frame_w,
            frame_h,
            cols: snap.width,
            rows: snap.height,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
        }
    }

    /// Grid position under a mouse click.
    pub fn cell_at(
        &self,
        snap: &GameSnapshot,
        viewport: Viewport,
        column: u16,
        row: u16,
    ) -> Option<Pos> {
        self.layout(snap, viewport).cell_at(column, row)
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes. `cursor` is the keyboard cursor, if shown.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<Pos>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.layout(snap, viewport);
        let bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.frame_w.saturating_sub(2),
            layout.frame_h.saturating_sub(2),
            ' ',
            bg,
        );
        self.draw_border(fb, &layout, border);

        for x in 0..snap.width {
            for y in 0..snap.height {
                let pos = Pos::new(x, y);
                match snap.cell(pos) {
                    Some(kind) => self.draw_tile(
                        fb,
                        &layout,
                        pos,
                        kind,
                        snap.selected == Some(pos),
                        cursor == Some(pos),
                    ),
                    None => self.draw_empty_cell(fb, &layout, pos),
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        match snap.phase {
            Phase::Won => self.draw_overlay(fb, &layout, "YOU WIN", snap.score),
            Phase::Lost => self.draw_overlay(fb, &layout, "GAME OVER", snap.score),
            Phase::Idle | Phase::Swapping | Phase::Resolving => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, cursor: Option<Pos>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &BoardLayout, style: CellStyle) {
        let (x, y, w, h) = (layout.x, layout.y, layout.frame_w, layout.frame_h);
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: &BoardLayout, pos: Pos) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        let (px, py) = layout.cell_origin(pos);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, '·', style);
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        pos: Pos,
        kind: TileKind,
        selected: bool,
        under_cursor: bool,
    ) {
        let color = tile_color(kind);
        let mut style = if selected {
            CellStyle::new(Rgb::new(0, 0, 0), color).bold()
        } else {
            CellStyle::new(color, color.scaled(64))
        };
        if under_cursor {
            style.bold = true;
        }

        let (px, py) = layout.cell_origin(pos);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let mid_x = px + self.cell_w / 2;
        let mid_y = py + self.cell_h / 2;
        fb.put_char(mid_x, mid_y, kind.letter(), style);
        if under_cursor && self.cell_w >= 3 {
            let bracket = CellStyle {
                fg: Rgb::new(255, 255, 255),
                ..style
            };
            fb.put_char(px, mid_y, '[', bracket);
            fb.put_char(px + self.cell_w - 1, mid_y, ']', bracket);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: &BoardLayout,
    ) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = layout.y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.moves_remaining, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "PROGRESS", label);
        y = y.saturating_add(1);
        let end = self.draw_progress_bar(fb, panel_x, y, snap.display_progress / 100.0);
        if panel_w >= PROGRESS_BAR_W + 6 {
            let x = fb.put_u32(end + 1, y, snap.display_progress.round() as u32, value);
            fb.put_char(x, y, '%', value);
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "TARGET", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.completion_threshold.round() as u32, value);
        y = y.saturating_add(2);

        if y.saturating_add(3) < viewport.height && panel_w >= 16 {
            let help = value.dim();
            fb.put_str(panel_x, y, "space select", help);
            fb.put_str(panel_x, y + 1, "? hint  r new", help);
            fb.put_str(panel_x, y + 2, "q quit", help);
        }
    }

    /// Draw a bar filled to `fraction`; returns the column after it.
    fn draw_progress_bar(&self, fb: &mut FrameBuffer, x: u16, y: u16, fraction: f32) -> u16 {
        let filled = (fraction.clamp(0.0, 1.0) * PROGRESS_BAR_W as f32).round() as u16;
        let on = CellStyle::new(Rgb::new(90, 200, 100), Rgb::new(0, 0, 0));
        let off = CellStyle::new(Rgb::new(70, 70, 80), Rgb::new(0, 0, 0)).dim();
        for i in 0..PROGRESS_BAR_W {
            if i < filled {
                fb.put_char(x + i, y, '█', on);
            } else {
                fb.put_char(x + i, y, '░', off);
            }
        }
        x + PROGRESS_BAR_W
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, layout: &BoardLayout, text: &str, score: u32) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        let mid_y = layout.y.saturating_add(layout.frame_h / 2);
        let center = |w: u16| layout.x.saturating_add(layout.frame_w.saturating_sub(w) / 2);

        let text_w = text.chars().count() as u16;
        fb.put_str(center(text_w), mid_y, text, style);

        let digits = score.checked_ilog10().unwrap_or(0) as u16 + 1;
        let line_w = 6 + digits;
        let x = fb.put_str(center(line_w), mid_y + 1, "SCORE ", style);
        fb.put_u32(x, mid_y + 1, score, style);
    }
}
