use crate::action::{ActionIcon, ActionId, NoteAction, SpecificAction};
use crate::error::{BeatgridError, Result};
use crate::note::NoteKey;
use crate::track::{Track, TrackGroup, TrackGroupId, TrackId};

use super::Editor;

/// Partial track edit; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the key
    pub assigned_key: Option<Option<String>>,
}

fn non_empty(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BeatgridError::EmptyName);
    }
    Ok(name.to_string())
}

impl Editor {
    pub fn add_track(&mut self, name: impl Into<String>, color: impl Into<String>) -> TrackId {
        let id = TrackId(self.alloc_id());
        let order = self.state.tracks.iter().map(|t| t.order.saturating_add(1)).max().unwrap_or(0);
        self.state.tracks.push(Track::new(id, name, color, order));
        self.touch();
        tracing::debug!(track = id.0, "Added track");
        id
    }

    /// Apply a track edit. Renaming rewrites the name carried by its notes.
    pub fn update_track(&mut self, id: TrackId, update: TrackUpdate) -> Result<()> {
        let name = update.name.as_deref().map(non_empty).transpose()?;
        let key = match update.assigned_key {
            Some(key) => Some(key.map(|k| k.trim().to_lowercase()).filter(|k| !k.is_empty())),
            None => None,
        };
        if let Some(Some(key)) = &key {
            if self.state.tracks.iter().any(|t| t.id != id && t.matches_key(key)) {
                tracing::warn!(key = %key, "Key already assigned");
                return Err(BeatgridError::KeyAlreadyAssigned(key.clone()));
            }
        }

        let track = self.state.track_mut(id).ok_or(BeatgridError::TrackNotFound(id.0))?;
        if let Some(name) = name {
            for note in &mut track.notes {
                note.track_name = name.clone();
            }
            track.name = name;
        }
        if let Some(color) = update.color {
            track.color = color;
        }
        if let Some(key) = key {
            track.assigned_key = key;
        }
        self.touch();
        Ok(())
    }

    pub fn delete_track(&mut self, id: TrackId) -> Result<()> {
        let index = self
            .state
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(BeatgridError::TrackNotFound(id.0))?;
        self.state.tracks.remove(index);
        for note_id in self.selection.in_track(id) {
            self.selection.remove(NoteKey::new(id, note_id));
        }
        self.touch();
        tracing::debug!(track = id.0, "Deleted track");
        Ok(())
    }

    /// Returns the new visibility
    pub fn toggle_track_visibility(&mut self, id: TrackId) -> Result<bool> {
        let track = self.state.track_mut(id).ok_or(BeatgridError::TrackNotFound(id.0))?;
        track.visible = !track.visible;
        let visible = track.visible;
        self.touch();
        Ok(visible)
    }

    pub fn add_group(&mut self, name: &str) -> Result<TrackGroupId> {
        let name = non_empty(name)?;
        let id = TrackGroupId(self.alloc_id());
        self.state.track_groups.push(TrackGroup::new(id, name));
        self.touch();
        Ok(id)
    }

    pub fn rename_group(&mut self, id: TrackGroupId, name: &str) -> Result<()> {
        let name = non_empty(name)?;
        self.group_mut(id)?.name = name;
        self.touch();
        Ok(())
    }

    pub fn toggle_group_visibility(&mut self, id: TrackGroupId) -> Result<bool> {
        let group = self.group_mut(id)?;
        group.visible = !group.visible;
        let visible = group.visible;
        self.touch();
        Ok(visible)
    }

    pub fn toggle_group_collapsed(&mut self, id: TrackGroupId) -> Result<bool> {
        let group = self.group_mut(id)?;
        group.collapsed = !group.collapsed;
        let collapsed = group.collapsed;
        self.touch();
        Ok(collapsed)
    }

    /// Remove a group; its tracks become ungrouped
    pub fn delete_group(&mut self, id: TrackGroupId) -> Result<()> {
        self.group_mut(id)?;
        self.state.track_groups.retain(|g| g.id != id);
        for track in &mut self.state.tracks {
            if track.group_id == Some(id) {
                track.group_id = None;
            }
        }
        self.touch();
        Ok(())
    }

    pub fn set_track_group(&mut self, track_id: TrackId, group: Option<TrackGroupId>) -> Result<()> {
        if let Some(group) = group {
            self.group_mut(group)?;
        }
        let track = self.state.track_mut(track_id).ok_or(BeatgridError::TrackNotFound(track_id.0))?;
        track.group_id = group;
        self.touch();
        Ok(())
    }

    fn group_mut(&mut self, id: TrackGroupId) -> Result<&mut TrackGroup> {
        self.state
            .track_groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(BeatgridError::GroupNotFound(id.0))
    }

    pub fn add_action(&mut self, name: &str, icon: ActionIcon) -> Result<ActionId> {
        let name = non_empty(name)?;
        let id = ActionId(self.alloc_id());
        self.state.specific_actions.push(SpecificAction { id, name, icon });
        self.touch();
        Ok(id)
    }

    /// Edit an action. Notes carrying it by its old name follow the edit.
    pub fn update_action(&mut self, id: ActionId, name: &str, icon: ActionIcon) -> Result<()> {
        let name = non_empty(name)?;
        let action = self
            .state
            .specific_actions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BeatgridError::ActionNotFound(id.0))?;
        let old_name = std::mem::replace(&mut action.name, name);
        action.icon = icon;
        let replacement = NoteAction::from(&*action);

        let notes = self.state.tracks.iter_mut().flat_map(|t| t.notes.iter_mut());
        for note in notes.filter(|n| n.specific_action.as_ref().is_some_and(|a| a.name == old_name)) {
            note.specific_action = Some(replacement.clone());
        }
        self.touch();
        Ok(())
    }

    /// Delete an action and unlink it from every note
    pub fn delete_action(&mut self, id: ActionId) -> Result<()> {
        let index = self
            .state
            .specific_actions
            .iter()
            .position(|a| a.id == id)
            .ok_or(BeatgridError::ActionNotFound(id.0))?;
        let removed = self.state.specific_actions.remove(index);

        let notes = self.state.tracks.iter_mut().flat_map(|t| t.notes.iter_mut());
        for note in notes.filter(|n| n.specific_action.as_ref().is_some_and(|a| a.name == removed.name)) {
            note.specific_action = None;
        }
        self.touch();
        Ok(())
    }
}
