//! Note grid: waveform ruler, track rows and notes

use std::collections::BTreeSet;

use beatgrid_core::{
    follow_scroll, Editor, EditorAction, EditorMode, NoteBounds, NoteKey, PointerButton, PointerEvent, Track,
    Transport, CELL_WIDTH,
};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

/// Actions returned from the grid
pub enum GridAction {
    None,
    Modified,
    /// Clicked the ruler; seek playback to this time
    Seek(f64),
    /// A context menu opened at this screen position
    ContextMenu(Pos2),
}

const RULER_HEIGHT: f32 = 48.0;
const ROW_HEIGHT: f32 = 36.0;
const NOTE_INSET: f32 = 4.0;

pub struct GridPanel {
    /// Horizontal scroll in surface pixels
    scroll_x: f32,
    pointer_inside: bool,
}

impl GridPanel {
    pub fn new() -> Self {
        Self { scroll_x: 0.0, pointer_inside: false }
    }

    pub fn ui(&mut self, ui: &mut Ui, editor: &mut Editor, transport: &Transport, peaks: &[f32]) -> GridAction {
        let available = ui.available_rect_before_wrap();
        let (response, painter) = ui.allocate_painter(available.size(), Sense::click_and_drag());
        let rect = response.rect;
        let ruler_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width(), RULER_HEIGHT));
        let rows_top = ruler_rect.bottom();

        let timing = editor.timing();
        let surface_width = (timing.start_offset_px + timing.waveform_width(editor.music_duration())) as f32;

        // Scroll: wheel when hovered, auto-follow while playing
        if response.hovered() {
            let delta = ui.input(|i| i.smooth_scroll_delta);
            self.scroll_x -= delta.x + delta.y;
        }
        if transport.is_playing() && transport.auto_follow {
            self.scroll_x = follow_scroll(transport.position_secs, &timing, rect.width() as f64) as f32;
        }
        self.scroll_x = self.scroll_x.clamp(0.0, (surface_width - rect.width()).max(0.0));

        let tracks: Vec<Track> = editor.state().displayed_tracks().into_iter().cloned().collect();
        let to_screen_x = |surface_x: f64| rect.left() + surface_x as f32 - self.scroll_x;

        painter.rect_filled(rect, 0.0, Color32::from_gray(22));
        self.draw_ruler(&painter, ruler_rect, editor, peaks);
        self.draw_grid_lines(&painter, rect, rows_top, tracks.len(), editor);

        // Notes, collecting where each one lands for the lasso
        let mut rendered: Vec<NoteBounds> = Vec::new();
        let drag_offset = editor.drag_offset();
        let resize = editor.resize_preview();
        let overlapping = editor.overlapping_selected();
        let marked: BTreeSet<NoteKey> = editor.marked_for_delete().cloned().unwrap_or_default();

        for (row, track) in tracks.iter().enumerate() {
            let row_top = rows_top + row as f32 * ROW_HEIGHT;
            let base = parse_hex_color(&track.color).unwrap_or(Color32::from_rgb(52, 152, 219));

            for note in &track.notes {
                let key = note.key();
                let selected = editor.selection().contains(key);
                let (mut left, mut right) = editor.note_span_px(note);
                if selected && drag_offset != 0 {
                    let shifted = (note.grid_position as i64 + drag_offset).max(0) as f64 * CELL_WIDTH;
                    right = timing.start_offset_px + shifted + (right - left);
                    left = timing.start_offset_px + shifted;
                }
                if let Some((resize_key, width_px)) = resize {
                    if resize_key == key {
                        right = left + width_px;
                    }
                }

                let note_rect = Rect::from_min_max(
                    Pos2::new(to_screen_x(left), row_top + NOTE_INSET),
                    Pos2::new(to_screen_x(right).max(to_screen_x(left) + 3.0), row_top + ROW_HEIGHT - NOTE_INSET),
                );
                rendered.push(NoteBounds {
                    key,
                    bounds: editor.note_bounds(
                        note,
                        (row_top - rows_top) as f64,
                        (row_top - rows_top + ROW_HEIGHT) as f64,
                    ),
                });
                if !note_rect.intersects(rect) {
                    continue;
                }

                let active = transport.is_playing() && note.is_active_at(transport.position_secs);
                let mut fill = if active { base.gamma_multiply(1.6) } else { base };
                if marked.contains(&key) {
                    fill = fill.gamma_multiply(0.3);
                }
                painter.rect_filled(note_rect, 3.0, fill);

                let outline = if overlapping.contains(&key) {
                    Stroke::new(2.0, Color32::from_rgb(231, 76, 60))
                } else if selected {
                    Stroke::new(2.0, Color32::WHITE)
                } else {
                    Stroke::new(1.0, Color32::from_black_alpha(120))
                };
                painter.rect_stroke(note_rect, 3.0, outline, StrokeKind::Inside);

                if let Some(action) = &note.specific_action {
                    painter.text(
                        note_rect.left_center() + Vec2::new(4.0, 0.0),
                        Align2::LEFT_CENTER,
                        action.icon.glyph(),
                        FontId::proportional(14.0),
                        Color32::WHITE,
                    );
                }
            }
        }

        // Ghost note and realtime previews
        let ghosts = editor
            .ghost_note()
            .map(|g| (g.track_id, g.grid_position, g.grid_width))
            .into_iter()
            .chain(
                editor
                    .realtime_previews(transport.position_secs)
                    .into_iter()
                    .map(|p| (p.track_id, p.grid_position, p.grid_width)),
            );
        for (track_id, position, width) in ghosts {
            let Some(row) = tracks.iter().position(|t| t.id == track_id) else {
                continue;
            };
            let row_top = rows_top + row as f32 * ROW_HEIGHT;
            let left = to_screen_x(timing.cell_to_pixel(position));
            let ghost = Rect::from_min_max(
                Pos2::new(left, row_top + NOTE_INSET),
                Pos2::new(left + width as f32 * CELL_WIDTH as f32, row_top + ROW_HEIGHT - NOTE_INSET),
            );
            painter.rect_filled(ghost, 3.0, Color32::from_white_alpha(40));
            painter.rect_stroke(ghost, 3.0, Stroke::new(1.0, Color32::from_white_alpha(160)), StrokeKind::Inside);
        }

        if let Some(lasso) = editor.lasso_bounds() {
            let lasso_rect = Rect::from_min_max(
                Pos2::new(to_screen_x(lasso.min_x), rows_top + lasso.min_y as f32),
                Pos2::new(to_screen_x(lasso.max_x), rows_top + lasso.max_y as f32),
            );
            painter.rect_filled(lasso_rect, 0.0, Color32::from_rgba_unmultiplied(100, 150, 255, 30));
            painter.rect_stroke(lasso_rect, 0.0, Stroke::new(1.0, Color32::from_rgb(100, 150, 255)), StrokeKind::Inside);
        }

        // Playhead
        let playhead_x = to_screen_x(timing.start_offset_px + beatgrid_core::grid::time_to_pixel_position(
            transport.position_secs,
            timing.bpm,
            timing.sub_rhythm_sync,
        ));
        if rect.x_range().contains(playhead_x) {
            painter.line_segment(
                [Pos2::new(playhead_x, rect.top()), Pos2::new(playhead_x, rect.bottom())],
                Stroke::new(2.0, Color32::from_rgb(255, 200, 60)),
            );
        }

        self.route_pointer(ui, editor, rect, ruler_rect, rows_top, &tracks, &rendered)
    }

    /// Translate egui pointer state into editor events
    #[allow(clippy::too_many_arguments)]
    fn route_pointer(
        &mut self,
        ui: &Ui,
        editor: &mut Editor,
        rect: Rect,
        ruler_rect: Rect,
        rows_top: f32,
        tracks: &[Track],
        rendered: &[NoteBounds],
    ) -> GridAction {
        let (pos, primary_down, secondary_down, primary_up, secondary_up, ctrl) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_pressed(egui::PointerButton::Secondary),
                i.pointer.button_released(egui::PointerButton::Primary),
                i.pointer.button_released(egui::PointerButton::Secondary),
                i.modifiers.ctrl || i.modifiers.command,
            )
        });

        // Popups and windows drawn over the grid take the pointer
        let inside = pos.is_some_and(|p| rect.contains(p) && ui.ctx().layer_id_at(p) == Some(ui.layer_id()));
        if !inside {
            let was_inside = std::mem::replace(&mut self.pointer_inside, false);
            if was_inside {
                return action_from(editor.pointer_leave(rendered));
            }
            return GridAction::None;
        }
        self.pointer_inside = true;
        let Some(pos) = pos else {
            return GridAction::None;
        };

        if ruler_rect.contains(pos) {
            if primary_down {
                let timing = editor.timing();
                let x = (pos.x - rect.left() + self.scroll_x) as f64 - timing.start_offset_px;
                let time = beatgrid_core::grid::pixel_position_to_time(x, timing.bpm, timing.sub_rhythm_sync)
                    + timing.offset_time();
                return GridAction::Seek(time);
            }
            return GridAction::None;
        }

        let surface_y = (pos.y - rows_top) as f64;
        let row = (surface_y / ROW_HEIGHT as f64).floor();
        let track_id = (row >= 0.0).then(|| tracks.get(row as usize).map(|t| t.id)).flatten();
        let event = |button| PointerEvent {
            track_id,
            x: (pos.x - rect.left() + self.scroll_x) as f64,
            y: surface_y,
            button,
            ctrl,
        };

        let action = if primary_down {
            editor.pointer_down(&event(PointerButton::Primary))
        } else if secondary_down {
            editor.pointer_down(&event(PointerButton::Secondary))
        } else if primary_up {
            editor.pointer_up(&event(PointerButton::Primary), rendered)
        } else if secondary_up {
            editor.pointer_up(&event(PointerButton::Secondary), rendered)
        } else if ui.input(|i| i.pointer.delta() != Vec2::ZERO) {
            editor.pointer_move(&event(PointerButton::Primary))
        } else {
            EditorAction::None
        };
        match action {
            EditorAction::ContextMenuOpened => GridAction::ContextMenu(pos),
            action => action_from(action),
        }
    }

    fn draw_ruler(&self, painter: &egui::Painter, ruler_rect: Rect, editor: &Editor, peaks: &[f32]) {
        painter.rect_filled(ruler_rect, 0.0, Color32::from_gray(32));
        if peaks.is_empty() {
            return;
        }

        let timing = editor.timing();
        let width = timing.waveform_width(editor.music_duration()) as f32;
        let bucket_width = width / peaks.len() as f32;
        let center = ruler_rect.center().y;
        let half = ruler_rect.height() / 2.0 - 2.0;
        // Waveform is aligned to the audio, which starts before cell 0 by the start offset
        let audio_left = ruler_rect.left() - self.scroll_x;
        for (i, peak) in peaks.iter().enumerate() {
            let x = audio_left + i as f32 * bucket_width;
            if x < ruler_rect.left() - bucket_width || x > ruler_rect.right() {
                continue;
            }
            let h = peak * half;
            painter.line_segment(
                [Pos2::new(x, center - h), Pos2::new(x, center + h)],
                Stroke::new(bucket_width.max(1.0), Color32::from_rgb(90, 160, 120)),
            );
        }
    }

    fn draw_grid_lines(&self, painter: &egui::Painter, rect: Rect, rows_top: f32, rows: usize, editor: &Editor) {
        let state = editor.state();
        let timing = editor.timing();
        let cells_per_beat = state.sub_rhythm_sync.max(1);
        let cells_per_measure = cells_per_beat * state.rhythm_sync.max(1);
        let rows_bottom = (rows_top + rows as f32 * ROW_HEIGHT).min(rect.bottom());

        let first = ((self.scroll_x as f64 - timing.start_offset_px) / CELL_WIDTH).floor().max(0.0) as u32;
        let visible = (rect.width() as f64 / CELL_WIDTH).ceil() as u32 + 2;
        for cell in first..first + visible {
            let x = rect.left() + timing.cell_to_pixel(cell) as f32 - self.scroll_x;
            let stroke = if cell % cells_per_measure == 0 {
                Stroke::new(1.5, Color32::from_gray(90))
            } else if cell % cells_per_beat == 0 {
                Stroke::new(1.0, Color32::from_gray(60))
            } else {
                Stroke::new(0.5, Color32::from_gray(40))
            };
            painter.line_segment([Pos2::new(x, rows_top), Pos2::new(x, rows_bottom)], stroke);
            if cell % cells_per_measure == 0 {
                painter.text(
                    Pos2::new(x + 3.0, rows_top - 2.0),
                    Align2::LEFT_BOTTOM,
                    (cell / cells_per_measure + 1).to_string(),
                    FontId::monospace(10.0),
                    Color32::from_gray(160),
                );
            }
        }

        for row in 0..=rows {
            let y = rows_top + row as f32 * ROW_HEIGHT;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(0.5, Color32::from_gray(50)),
            );
        }

        let mode_label = match editor.mode() {
            EditorMode::Edit => "EDIT",
            EditorMode::Select => "SELECT",
        };
        painter.text(
            rect.right_top() + Vec2::new(-6.0, 4.0),
            Align2::RIGHT_TOP,
            mode_label,
            FontId::monospace(11.0),
            Color32::from_gray(140),
        );
    }
}

fn action_from(action: EditorAction) -> GridAction {
    if action.is_modified() {
        GridAction::Modified
    } else {
        GridAction::None
    }
}

/// Parse `#rrggbb`
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color32::from_rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

/// Format a color as `#rrggbb`
pub fn to_hex_color(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_hex_color("#ff8800"), Some(Color32::from_rgb(255, 136, 0)));
        assert_eq!(parse_hex_color("ff8800"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(to_hex_color([255, 136, 0]), "#ff8800");
    }
}
