//! Main application state

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use beatgrid_core::{
    ContextMenu, Editor, EditorCommand, EditorMode, EditorState, Transport,
};
use beatgrid_services::{
    export_to_file, load_project, read_audio_info, save_project, AudioInfo, MusicStatus, PROJECT_EXTENSION,
};
use eframe::CreationContext;
use egui::{Align2, Context, Key, Modifiers, Pos2, RichText};

use crate::config::AppConfig;
use crate::panels::{GridAction, GridPanel, TracksAction, TracksPanel};

/// Something the user asked for that would discard unsaved changes
#[derive(Debug, Clone)]
enum PendingAction {
    NewProject,
    OpenProject(PathBuf),
    Quit,
}

pub struct BeatgridApp {
    editor: Editor,
    transport: Transport,
    audio: Option<AudioInfo>,
    config: AppConfig,

    project_path: Option<PathBuf>,
    project_name: String,

    // Panels
    grid_panel: GridPanel,
    tracks_panel: TracksPanel,

    /// Screen position of the open context menu
    context_menu_pos: Option<Pos2>,
    /// Waiting on the unsaved-changes prompt
    pending: Option<PendingAction>,
    allow_close: bool,
    /// Music referenced by the project but not found on disk
    missing_music: Option<PathBuf>,
    status: Option<String>,
    title: String,
    last_frame: Instant,
}

impl BeatgridApp {
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let now = Instant::now();
        let editor = Editor::new(new_project_state(&config), now);

        Self {
            editor,
            transport: Transport { auto_follow: config.auto_follow, ..Transport::new(0.0) },
            audio: None,
            config,
            project_path: None,
            project_name: "Untitled".to_string(),
            grid_panel: GridPanel::new(),
            tracks_panel: TracksPanel::new(),
            context_menu_pos: None,
            pending: None,
            allow_close: false,
            missing_music: None,
            status: None,
            title: String::new(),
            last_frame: now,
        }
    }

    // ── Project lifecycle ───────────────────────────────────────────

    /// Run `action` now, or ask first when there are unsaved changes
    fn request(&mut self, action: PendingAction) {
        if self.editor.is_dirty() {
            self.pending = Some(action);
        } else {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: PendingAction) {
        match action {
            PendingAction::NewProject => self.new_project(),
            PendingAction::OpenProject(path) => {
                if let Err(e) = self.open_project(&path) {
                    self.report_error(e);
                }
            }
            PendingAction::Quit => self.allow_close = true,
        }
    }

    fn new_project(&mut self) {
        self.set_music(None);
        self.editor.load(new_project_state(&self.config), Instant::now());
        self.project_path = None;
        self.project_name = "Untitled".to_string();
        self.missing_music = None;
        self.status = None;
        tracing::info!("New project");
    }

    fn open_project(&mut self, path: &Path) -> anyhow::Result<()> {
        let loaded = load_project(path).with_context(|| format!("Failed to open {}", path.display()))?;

        self.missing_music = None;
        match &loaded.music {
            MusicStatus::Found(music) => match read_audio_info(music, self.config.waveform_buckets) {
                Ok(info) => self.set_music(Some(info)),
                Err(e) => {
                    tracing::warn!("Failed to read music {}: {}", music.display(), e);
                    self.set_music(None);
                    self.missing_music = Some(music.clone());
                }
            },
            MusicStatus::Missing(music) => {
                self.set_music(None);
                self.missing_music = Some(music.clone());
            }
            MusicStatus::None => self.set_music(None),
        }
        // Music first so the reload absorbs its revision bump
        self.editor.load(loaded.state, Instant::now());

        self.project_name = loaded.name;
        self.project_path = Some(path.to_path_buf());
        self.config.push_recent(path);
        self.config.save();
        self.status = Some(format!("Opened {}", path.display()));
        Ok(())
    }

    fn open_project_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Beatgrid project", &[PROJECT_EXTENSION])
            .pick_file()
        {
            self.request(PendingAction::OpenProject(path));
        }
    }

    /// Save to the current path, asking for one when needed. Returns true on success.
    fn save(&mut self, save_as: bool) -> bool {
        let path = match (&self.project_path, save_as) {
            (Some(path), false) => path.clone(),
            _ => {
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("Beatgrid project", &[PROJECT_EXTENSION])
                    .set_file_name(format!("{}.{}", self.project_name, PROJECT_EXTENSION))
                    .save_file()
                else {
                    return false;
                };
                path
            }
        };

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if save_as || self.project_path.is_none() {
                self.project_name = stem.to_string();
            }
        }
        match save_project(&path, &self.project_name, self.editor.state())
            .with_context(|| format!("Failed to save {}", path.display()))
        {
            Ok(()) => {
                self.editor.mark_saved();
                self.config.push_recent(&path);
                self.config.save();
                self.status = Some(format!("Saved {}", path.display()));
                self.project_path = Some(path);
                true
            }
            Err(e) => {
                self.report_error(e);
                false
            }
        }
    }

    // ── Music and export ────────────────────────────────────────────

    fn set_music(&mut self, info: Option<AudioInfo>) {
        match &info {
            Some(info) => self.editor.set_audio(Some(info.path.clone()), info.file_name.clone(), info.duration),
            None => self.editor.set_audio(None, "", 0.0),
        }
        self.transport = Transport {
            auto_follow: self.transport.auto_follow,
            ..Transport::new(info.as_ref().map_or(0.0, |i| i.duration))
        };
        self.audio = info;
    }

    fn open_music_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("WAV audio", &["wav"]).pick_file() else {
            return;
        };
        match read_audio_info(&path, self.config.waveform_buckets).with_context(|| format!("Failed to read {}", path.display())) {
            Ok(info) => {
                self.status = Some(format!("Loaded {} ({:.1}s)", info.file_name, info.duration));
                self.set_music(Some(info));
                self.missing_music = None;
            }
            // The previous music stays loaded
            Err(e) => self.report_error(e),
        }
    }

    fn export_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(format!("{}.json", self.project_name));
        if let Some(dir) = &self.config.last_export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else { return };

        match export_to_file(&path, self.editor.state(), self.editor.music_duration())
            .with_context(|| format!("Failed to export {}", path.display()))
        {
            Ok(count) => {
                self.status = Some(format!("Exported {} notes", count));
                self.config.last_export_dir = path.parent().map(Path::to_path_buf);
                self.config.save();
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        self.status = Some(format!("{:#}", error));
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Forward key presses to realtime entry. Returns the keys it consumed.
    fn route_realtime_keys(&mut self, ctx: &Context) -> HashSet<Key> {
        let mut consumed = HashSet::new();
        if !self.editor.is_realtime_active() {
            return consumed;
        }
        let time = self.transport.position_secs;
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let egui::Event::Key { key, pressed, repeat, modifiers, .. } = event else {
                continue;
            };
            if modifiers.any() {
                continue;
            }
            let handled = if pressed {
                repeat || self.editor.realtime_key_down(key.name(), time)
            } else {
                self.editor.realtime_key_up(key.name(), time)
            };
            if handled {
                consumed.insert(key);
            }
        }
        consumed
    }

    fn handle_shortcuts(&mut self, ctx: &Context, realtime_keys: &HashSet<Key>) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let now = Instant::now();
        let free = |key: Key| !realtime_keys.contains(&key);

        let pressed = |ctx: &Context, modifiers: Modifiers, key: Key| ctx.input_mut(|i| i.consume_key(modifiers, key));

        if pressed(ctx, Modifiers::NONE, Key::Space) {
            self.transport.toggle();
        }
        if pressed(ctx, Modifiers::COMMAND, Key::S) {
            self.save(false);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::E) {
            self.export_dialog();
        }

        let mut commands = Vec::new();
        if pressed(ctx, Modifiers::COMMAND | Modifiers::SHIFT, Key::Z) || pressed(ctx, Modifiers::COMMAND, Key::Y) {
            commands.push(EditorCommand::Redo);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::Z) {
            commands.push(EditorCommand::Undo);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::A) {
            commands.push(EditorCommand::SelectAll);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::C) {
            commands.push(EditorCommand::Copy);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::X) {
            commands.push(EditorCommand::Cut);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::V) {
            commands.push(EditorCommand::Paste);
        }
        if pressed(ctx, Modifiers::COMMAND, Key::D) {
            commands.push(EditorCommand::Duplicate);
        }
        if free(Key::E) && pressed(ctx, Modifiers::NONE, Key::E) {
            commands.push(EditorCommand::SetMode(EditorMode::Edit));
        }
        if free(Key::S) && pressed(ctx, Modifiers::NONE, Key::S) {
            commands.push(EditorCommand::SetMode(EditorMode::Select));
        }
        if free(Key::F) && pressed(ctx, Modifiers::NONE, Key::F) {
            commands.push(EditorCommand::Merge);
        }
        if pressed(ctx, Modifiers::NONE, Key::Delete) {
            commands.push(EditorCommand::Delete);
        }
        if pressed(ctx, Modifiers::NONE, Key::Escape) {
            commands.push(EditorCommand::Escape);
        }
        // Shifted first: a bare arrow pattern also matches with shift held
        for (modifiers, cells) in [(Modifiers::SHIFT, 4), (Modifiers::NONE, 1)] {
            if pressed(ctx, modifiers, Key::ArrowLeft) {
                commands.push(EditorCommand::Nudge { cells: -cells });
            }
            if pressed(ctx, modifiers, Key::ArrowRight) {
                commands.push(EditorCommand::Nudge { cells });
            }
        }

        for command in commands {
            self.editor.apply_command(command, now);
        }
        if self.editor.context_menu().is_none() {
            self.context_menu_pos = None;
        }
    }

    // ── UI sections ─────────────────────────────────────────────────

    fn menu_bar_ui(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New project").clicked() {
                    self.request(PendingAction::NewProject);
                    ui.close_menu();
                }
                if ui.button("Open project…").clicked() {
                    self.open_project_dialog();
                    ui.close_menu();
                }
                ui.menu_button("Open recent", |ui| {
                    if self.config.recent_projects.is_empty() {
                        ui.label(RichText::new("No recent projects").weak());
                    }
                    for path in self.config.recent_projects.clone() {
                        if ui.button(path.display().to_string()).clicked() {
                            self.request(PendingAction::OpenProject(path));
                            ui.close_menu();
                        }
                    }
                });
                ui.separator();
                if ui.button("Save").clicked() {
                    self.save(false);
                    ui.close_menu();
                }
                if ui.button("Save as…").clicked() {
                    self.save(true);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Load music…").clicked() {
                    self.open_music_dialog();
                    ui.close_menu();
                }
                if ui.button("Export JSON…").clicked() {
                    self.export_dialog();
                    ui.close_menu();
                }
            });

            ui.menu_button("Edit", |ui| {
                let now = Instant::now();
                if ui.add_enabled(self.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                    self.editor.undo(now);
                    ui.close_menu();
                }
                if ui.add_enabled(self.editor.can_redo(), egui::Button::new("Redo")).clicked() {
                    self.editor.redo(now);
                    ui.close_menu();
                }
                ui.separator();
                let selecting = self.editor.mode() == EditorMode::Select;
                let selected = self.editor.selection().len();
                for (label, command, enabled) in [
                    ("Select all", EditorCommand::SelectAll, selecting),
                    ("Copy", EditorCommand::Copy, selecting && selected > 0),
                    ("Cut", EditorCommand::Cut, selecting && selected > 0),
                    ("Paste", EditorCommand::Paste, selecting && self.editor.clipboard().has_notes()),
                    ("Duplicate", EditorCommand::Duplicate, selecting && selected > 0),
                    ("Merge", EditorCommand::Merge, selecting && selected >= 2),
                    ("Delete", EditorCommand::Delete, selecting && selected > 0),
                ] {
                    if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                        self.editor.apply_command(command, now);
                        ui.close_menu();
                    }
                }
            });
        });
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 8.0;

            // Play/Pause
            let play_text = if self.transport.is_playing() { "\u{23F8}" } else { "\u{25B6}" };
            if ui.button(RichText::new(play_text).size(20.0)).clicked() {
                self.transport.toggle();
            }
            if ui.button(RichText::new("\u{23F9}").size(20.0)).clicked() {
                self.transport.stop();
            }
            ui.label(RichText::new(self.transport.format_time()).monospace().size(16.0));
            ui.checkbox(&mut self.transport.auto_follow, "Follow");
            ui.separator();

            let mut mode = self.editor.mode();
            ui.selectable_value(&mut mode, EditorMode::Edit, "Edit");
            ui.selectable_value(&mut mode, EditorMode::Select, "Select");
            if mode != self.editor.mode() {
                self.editor.set_mode(mode);
            }
            ui.separator();

            let state = self.editor.state();
            let (mut bpm, mut sub, mut rhythm) = (state.bpm, state.sub_rhythm_sync, state.rhythm_sync);
            let (mut offset, mut volume, mut pitch) = (state.start_offset, state.volume, state.pitch);
            let mut setting = Ok(());

            if ui.add(egui::DragValue::new(&mut bpm).range(1.0..=400.0).speed(0.5).prefix("BPM ")).changed() {
                setting = self.editor.set_bpm(bpm);
            }
            if ui.add(egui::DragValue::new(&mut sub).range(1..=16).prefix("Sub ")).changed() {
                setting = self.editor.set_sub_rhythm_sync(sub);
            }
            if ui.add(egui::DragValue::new(&mut rhythm).range(1..=16).prefix("Beats ")).changed() {
                setting = self.editor.set_rhythm_sync(rhythm);
            }
            if ui.add(egui::DragValue::new(&mut offset).range(0.0..=10_000.0).prefix("Offset ").suffix(" px")).changed() {
                setting = self.editor.set_start_offset(offset);
            }
            if ui.add(egui::DragValue::new(&mut volume).range(0.0..=100.0).prefix("Vol ")).changed() {
                setting = self.editor.set_volume(volume);
            }
            if ui.add(egui::DragValue::new(&mut pitch).range(0.25..=4.0).speed(0.01).prefix("Rate ")).changed() {
                setting = self.editor.set_pitch(pitch);
            }
            if let Err(e) = setting {
                self.status = Some(e.to_string());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match &self.audio {
                    Some(audio) => ui.label(RichText::new(&audio.file_name).weak()),
                    None => ui.label(RichText::new("No music").weak()),
                };
                if self.editor.is_realtime_active() {
                    ui.label(RichText::new("● REC").color(egui::Color32::from_rgb(255, 80, 80)));
                }
            });
        });
    }

    fn context_menu_ui(&mut self, ctx: &Context, just_opened: bool) {
        let (Some(menu), Some(pos)) = (self.editor.context_menu(), self.context_menu_pos) else {
            self.context_menu_pos = None;
            return;
        };
        let now = Instant::now();
        let mut close = false;
        let mut assigned = None;

        let response = egui::Area::new(egui::Id::new("grid_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(140.0);
                    match menu {
                        ContextMenu::Note { .. } => {
                            let selected = self.editor.selection().len();
                            for (label, command, enabled) in [
                                ("Copy", EditorCommand::Copy, true),
                                ("Cut", EditorCommand::Cut, true),
                                ("Duplicate", EditorCommand::Duplicate, true),
                                ("Merge", EditorCommand::Merge, selected >= 2),
                                ("Delete", EditorCommand::Delete, true),
                            ] {
                                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                                    self.editor.close_context_menu();
                                    self.editor.apply_command(command, now);
                                    close = true;
                                }
                            }
                            if !self.editor.state().specific_actions.is_empty() {
                                ui.separator();
                                let keys = self.editor.selection().to_vec();
                                let actions: Vec<_> = self
                                    .editor
                                    .state()
                                    .specific_actions
                                    .iter()
                                    .map(|a| (a.id, format!("{} {}", a.icon.glyph(), a.name)))
                                    .collect();
                                for (id, label) in actions {
                                    if ui.button(label).clicked() {
                                        assigned = Some(self.editor.assign_action(&keys, Some(id)));
                                        close = true;
                                    }
                                }
                                if ui.button("No action").clicked() {
                                    assigned = Some(self.editor.assign_action(&keys, None));
                                    close = true;
                                }
                            }
                        }
                        ContextMenu::Paste { cell, .. } => {
                            let count = self.editor.clipboard().note_count();
                            if ui.add_enabled(count > 0, egui::Button::new(format!("Paste {count} notes"))).clicked() {
                                self.editor.paste_at(cell);
                                close = true;
                            }
                        }
                    }
                });
            })
            .response;

        if let Some(Err(e)) = assigned {
            self.status = Some(e.to_string());
        }

        // The press that opened the menu is not a click elsewhere
        let clicked_elsewhere = !just_opened
            && ctx.input(|i| i.pointer.any_pressed())
            && ctx.input(|i| i.pointer.interact_pos()).is_some_and(|p| !response.rect.contains(p));
        if close || clicked_elsewhere || ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.editor.close_context_menu();
            self.context_menu_pos = None;
        }
    }

    fn dialogs_ui(&mut self, ctx: &Context) {
        if let Some(pending) = self.pending.clone() {
            let mut choice = None;
            egui::Window::new("Unsaved changes")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Save changes to \"{}\"?", self.project_name));
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            choice = Some(true);
                        }
                        if ui.button("Discard").clicked() {
                            choice = Some(false);
                        }
                        if ui.button("Cancel").clicked() {
                            self.pending = None;
                        }
                    });
                });
            match choice {
                Some(true) => {
                    if self.save(false) {
                        self.pending = None;
                        self.perform(pending);
                    }
                }
                Some(false) => {
                    self.pending = None;
                    self.perform(pending);
                }
                None => {}
            }
        }

        if let Some(missing) = self.missing_music.clone() {
            let mut open = true;
            egui::Window::new("Music not found")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Could not load {}", missing.display()));
                    if ui.button("Locate music…").clicked() {
                        self.open_music_dialog();
                    }
                });
            if !open {
                self.missing_music = None;
            }
        }
    }
}

fn new_project_state(config: &AppConfig) -> EditorState {
    EditorState {
        bpm: config.defaults.bpm,
        sub_rhythm_sync: config.defaults.sub_rhythm_sync.max(1),
        rhythm_sync: config.defaults.rhythm_sync.max(1),
        ..Default::default()
    }
}

impl eframe::App for BeatgridApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        // Close request: ask first when dirty
        if ctx.input(|i| i.viewport().close_requested()) && !self.allow_close && self.editor.is_dirty() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.pending = Some(PendingAction::Quit);
        }

        // Playback clock and realtime entry
        self.transport.advance(dt, self.editor.state().pitch);
        let realtime = self.transport.is_playing() && self.transport.auto_follow;
        self.editor.set_realtime_active(realtime, self.transport.position_secs);
        let realtime_keys = self.route_realtime_keys(ctx);
        self.handle_shortcuts(ctx, &realtime_keys);

        // 1. Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar_ui(ui));

        // 2. Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar_ui(ui));

        // 3. Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.editor.state();
                ui.label(format!(
                    "{} tracks · {} notes · {} selected",
                    state.tracks.len(),
                    state.note_count(),
                    self.editor.selection().len()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(RichText::new(status).weak());
                }
            });
        });

        // 4. Track list
        let tracks_action = egui::SidePanel::left("tracks")
            .default_width(320.0)
            .show(ctx, |ui| self.tracks_panel.ui(ui, self.editor.state(), self.editor.selection().len()))
            .inner;
        self.apply_tracks_action(tracks_action);

        // 5. Grid
        let peaks = self.audio.as_ref().map(|a| a.peaks.as_slice()).unwrap_or(&[]);
        let grid_action = egui::CentralPanel::default()
            .show(ctx, |ui| self.grid_panel.ui(ui, &mut self.editor, &self.transport, peaks))
            .inner;
        let menu_opened = matches!(grid_action, GridAction::ContextMenu(_));
        match grid_action {
            GridAction::Seek(time) => self.transport.seek(time),
            GridAction::ContextMenu(pos) => self.context_menu_pos = Some(pos),
            GridAction::Modified | GridAction::None => {}
        }

        self.context_menu_ui(ctx, menu_opened);
        self.dialogs_ui(ctx);

        if self.allow_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // History capture runs on the frame clock
        self.editor.tick(Instant::now());
        if let Some(wait) = self.editor.time_until_capture(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        let title = format!(
            "{}{} - Beatgrid",
            if self.editor.is_dirty() { "• " } else { "" },
            self.project_name
        );
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        // Request repaint for animation
        if self.transport.is_playing() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.auto_follow = self.transport.auto_follow;
        self.config.save();
    }
}

impl BeatgridApp {
    fn apply_tracks_action(&mut self, action: TracksAction) {
        let result = match action {
            TracksAction::None => Ok(()),
            TracksAction::AddTrack { name, color } => {
                self.editor.add_track(name, color);
                Ok(())
            }
            TracksAction::UpdateTrack(id, update) => self.editor.update_track(id, update),
            TracksAction::DeleteTrack(id) => self.editor.delete_track(id),
            TracksAction::ToggleTrackVisibility(id) => self.editor.toggle_track_visibility(id).map(|_| ()),
            TracksAction::SetTrackGroup(id, group) => self.editor.set_track_group(id, group),
            TracksAction::AddGroup(name) => self.editor.add_group(&name).map(|_| ()),
            TracksAction::RenameGroup(id, name) => self.editor.rename_group(id, &name),
            TracksAction::ToggleGroupVisibility(id) => self.editor.toggle_group_visibility(id).map(|_| ()),
            TracksAction::ToggleGroupCollapsed(id) => self.editor.toggle_group_collapsed(id).map(|_| ()),
            TracksAction::DeleteGroup(id) => self.editor.delete_group(id),
            TracksAction::AddAction(name, icon) => self.editor.add_action(&name, icon).map(|_| ()),
            TracksAction::UpdateAction(id, name, icon) => self.editor.update_action(id, &name, icon),
            TracksAction::DeleteAction(id) => self.editor.delete_action(id),
            TracksAction::AssignAction(action) => {
                let keys = self.editor.selection().to_vec();
                self.editor.assign_action(&keys, action).map(|_| ())
            }
        };
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }
}
