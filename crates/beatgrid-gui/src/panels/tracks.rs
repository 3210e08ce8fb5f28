//! Track list: groups, per-track settings and specific actions

use std::collections::HashMap;

use beatgrid_core::{ActionIcon, ActionId, EditorState, Track, TrackGroupId, TrackId, TrackUpdate};
use egui::{Color32, RichText, Ui};

use super::grid::{parse_hex_color, to_hex_color};

/// Actions returned from the track list
pub enum TracksAction {
    None,
    AddTrack { name: String, color: String },
    UpdateTrack(TrackId, TrackUpdate),
    DeleteTrack(TrackId),
    ToggleTrackVisibility(TrackId),
    SetTrackGroup(TrackId, Option<TrackGroupId>),
    AddGroup(String),
    RenameGroup(TrackGroupId, String),
    ToggleGroupVisibility(TrackGroupId),
    ToggleGroupCollapsed(TrackGroupId),
    DeleteGroup(TrackGroupId),
    AddAction(String, ActionIcon),
    /// Rename an action or change its icon; linked notes follow
    UpdateAction(ActionId, String, ActionIcon),
    DeleteAction(ActionId),
    /// Attach (or detach with `None`) an action on the selected notes
    AssignAction(Option<ActionId>),
}

const TRACK_PALETTE: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#e67e22", "#1abc9c", "#ecf0f1",
];

pub struct TracksPanel {
    new_track_name: String,
    new_group_name: String,
    new_action_name: String,
    new_action_icon: ActionIcon,
    /// Track being renamed and its pending name
    renaming: Option<(TrackId, String)>,
    renaming_group: Option<(TrackGroupId, String)>,
    /// Action open in the edit row with its pending name and icon
    editing_action: Option<(ActionId, String, ActionIcon)>,
    /// Pending key bindings, committed on focus loss
    key_edits: HashMap<TrackId, String>,
}

impl TracksPanel {
    pub fn new() -> Self {
        Self {
            new_track_name: String::new(),
            new_group_name: String::new(),
            new_action_name: String::new(),
            new_action_icon: ActionIcon::default(),
            renaming: None,
            renaming_group: None,
            editing_action: None,
            key_edits: HashMap::new(),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, state: &EditorState, selected_notes: usize) -> TracksAction {
        let mut action = TracksAction::None;

        ui.heading("Tracks");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_track_name);
            if ui.button("+ Track").clicked() {
                let name = if self.new_track_name.trim().is_empty() {
                    format!("Track {}", state.tracks.len() + 1)
                } else {
                    std::mem::take(&mut self.new_track_name)
                };
                let color = TRACK_PALETTE[state.tracks.len() % TRACK_PALETTE.len()].to_string();
                action = TracksAction::AddTrack { name, color };
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().id_salt("track_list").max_height(ui.available_height() * 0.6).show(ui, |ui| {
            let tracks = state.ordered_tracks();

            for track in tracks.iter().filter(|t| t.group_id.is_none()) {
                self.track_row(ui, state, track, &mut action);
            }

            for group in &state.track_groups {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let arrow = if group.collapsed { "▶" } else { "▼" };
                    if ui.small_button(arrow).clicked() {
                        action = TracksAction::ToggleGroupCollapsed(group.id);
                    }
                    let eye = if group.visible { "👁" } else { "○" };
                    if ui.small_button(eye).on_hover_text("Show/hide group").clicked() {
                        action = TracksAction::ToggleGroupVisibility(group.id);
                    }

                    match &mut self.renaming_group {
                        Some((id, name)) if *id == group.id => {
                            let response = ui.text_edit_singleline(name);
                            if response.lost_focus() {
                                action = TracksAction::RenameGroup(group.id, name.clone());
                                self.renaming_group = None;
                            }
                        }
                        _ => {
                            let label = ui.label(RichText::new(&group.name).strong());
                            if label.double_clicked() {
                                self.renaming_group = Some((group.id, group.name.clone()));
                            }
                        }
                    }

                    if ui.small_button("🗑").on_hover_text("Delete group (keeps tracks)").clicked() {
                        action = TracksAction::DeleteGroup(group.id);
                    }
                });

                if group.collapsed {
                    continue;
                }
                ui.indent(("group", group.id.0), |ui| {
                    for track in tracks.iter().filter(|t| t.group_id == Some(group.id)) {
                        self.track_row(ui, state, track, &mut action);
                    }
                });
            }
        });

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_group_name);
            if ui.button("+ Group").clicked() && !self.new_group_name.trim().is_empty() {
                action = TracksAction::AddGroup(std::mem::take(&mut self.new_group_name));
            }
        });

        ui.separator();
        self.actions_ui(ui, state, selected_notes, &mut action);

        action
    }

    fn track_row(&mut self, ui: &mut Ui, state: &EditorState, track: &Track, action: &mut TracksAction) {
        ui.horizontal(|ui| {
            let eye = if track.visible { "👁" } else { "○" };
            if ui.small_button(eye).on_hover_text("Show/hide track").clicked() {
                *action = TracksAction::ToggleTrackVisibility(track.id);
            }

            let mut rgb = parse_hex_color(&track.color).map(|c| [c.r(), c.g(), c.b()]).unwrap_or([128; 3]);
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                *action = TracksAction::UpdateTrack(
                    track.id,
                    TrackUpdate { color: Some(to_hex_color(rgb)), ..Default::default() },
                );
            }

            match &mut self.renaming {
                Some((id, name)) if *id == track.id => {
                    let response = ui.add(egui::TextEdit::singleline(name).desired_width(90.0));
                    if response.lost_focus() {
                        *action = TracksAction::UpdateTrack(
                            track.id,
                            TrackUpdate { name: Some(name.clone()), ..Default::default() },
                        );
                        self.renaming = None;
                    }
                }
                _ => {
                    let text = if track.visible {
                        RichText::new(&track.name)
                    } else {
                        RichText::new(&track.name).color(Color32::GRAY)
                    };
                    if ui.label(text).on_hover_text("Double-click to rename").double_clicked() {
                        self.renaming = Some((track.id, track.name.clone()));
                    }
                }
            }

            let key = self
                .key_edits
                .entry(track.id)
                .or_insert_with(|| track.assigned_key.clone().unwrap_or_default());
            let response = ui.add(egui::TextEdit::singleline(key).desired_width(24.0).hint_text("key"));
            if response.lost_focus() {
                let pending = key.trim().to_lowercase();
                if Some(pending.as_str()) != track.assigned_key.as_deref().or(Some("")) {
                    let assigned_key = (!pending.is_empty()).then_some(pending);
                    *action = TracksAction::UpdateTrack(
                        track.id,
                        TrackUpdate { assigned_key: Some(assigned_key), ..Default::default() },
                    );
                }
                // Re-read from the track next frame so a rejected key snaps back
                self.key_edits.remove(&track.id);
            } else if !response.has_focus() {
                self.key_edits.remove(&track.id);
            }

            let group_name = |id: Option<TrackGroupId>| {
                id.and_then(|g| state.group(g)).map(|g| g.name.clone()).unwrap_or_else(|| "-".to_string())
            };
            egui::ComboBox::from_id_salt(("track_group", track.id.0))
                .width(70.0)
                .selected_text(group_name(track.group_id))
                .show_ui(ui, |ui| {
                    if ui.selectable_label(track.group_id.is_none(), "-").clicked() {
                        *action = TracksAction::SetTrackGroup(track.id, None);
                    }
                    for group in &state.track_groups {
                        if ui.selectable_label(track.group_id == Some(group.id), &group.name).clicked() {
                            *action = TracksAction::SetTrackGroup(track.id, Some(group.id));
                        }
                    }
                });

            ui.label(RichText::new(track.notes.len().to_string()).weak());
            if ui.small_button("🗑").on_hover_text("Delete track").clicked() {
                *action = TracksAction::DeleteTrack(track.id);
            }
        });
    }

    fn actions_ui(&mut self, ui: &mut Ui, state: &EditorState, selected_notes: usize, action: &mut TracksAction) {
        ui.heading("Actions");
        for specific in &state.specific_actions {
            let editing = self.editing_action.as_mut().filter(|(id, ..)| *id == specific.id);
            if let Some((_, name, icon)) = editing {
                let mut done = false;
                ui.horizontal(|ui| {
                    icon_picker(ui, ("edit_action_icon", specific.id.0), icon);
                    ui.add(egui::TextEdit::singleline(name).desired_width(100.0));
                    if ui.small_button("Save").clicked() {
                        *action = TracksAction::UpdateAction(specific.id, name.clone(), *icon);
                        done = true;
                    }
                    if ui.small_button("Cancel").clicked() {
                        done = true;
                    }
                });
                if done {
                    self.editing_action = None;
                }
                continue;
            }

            ui.horizontal(|ui| {
                ui.label(format!("{} {}", specific.icon.glyph(), specific.name));
                let assign = ui.add_enabled(selected_notes > 0, egui::Button::new("Assign").small());
                if assign.on_hover_text("Attach to the selected notes").clicked() {
                    *action = TracksAction::AssignAction(Some(specific.id));
                }
                if ui.small_button("✏").on_hover_text("Edit action").clicked() {
                    self.editing_action = Some((specific.id, specific.name.clone(), specific.icon));
                }
                if ui.small_button("🗑").clicked() {
                    *action = TracksAction::DeleteAction(specific.id);
                }
            });
        }
        if ui.add_enabled(selected_notes > 0, egui::Button::new("Clear action").small()).clicked() {
            *action = TracksAction::AssignAction(None);
        }

        ui.horizontal(|ui| {
            icon_picker(ui, "new_action_icon", &mut self.new_action_icon);
            ui.add(egui::TextEdit::singleline(&mut self.new_action_name).desired_width(100.0));
            if ui.button("+ Action").clicked() && !self.new_action_name.trim().is_empty() {
                *action = TracksAction::AddAction(std::mem::take(&mut self.new_action_name), self.new_action_icon);
            }
        });
    }
}

fn icon_picker(ui: &mut Ui, id_salt: impl std::hash::Hash, icon: &mut ActionIcon) {
    egui::ComboBox::from_id_salt(id_salt)
        .width(40.0)
        .selected_text(icon.glyph())
        .show_ui(ui, |ui| {
            for choice in ActionIcon::ALL {
                ui.selectable_value(icon, choice, format!("{} {}", choice.glyph(), choice.name()));
            }
        });
}
