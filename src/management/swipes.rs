use std::sync::Arc;

use crate::{
    Error, Res,
    spotify::Upstream,
    types::{Interaction, SwipeAction, Token},
};

use super::{TrackStore, UserStore};

pub const PLAYLIST_NAME: &str = "My Juke Playlist";
const PLAYLIST_DESCRIPTION: &str = "Playlist created by Juke to store your liked songs.";

/// Outcome of recording a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// History entry appended and side effects applied.
    New,
    /// The track was already in the user's history; nothing changed. A
    /// replayed swipe and a conflicting re-swipe both land here: the first
    /// recorded decision wins.
    Duplicate,
}

/// Persists like/dislike decisions and their side effects.
///
/// Order of effects: history append and counter increment first (one
/// indivisible store update), then playlist sync for likes, then the global
/// snapshot upsert. The later steps are not transactional with the first;
/// a failed track-add after a recorded like leaves the playlist short until
/// a later like retries against the now-existing playlist.
pub struct InteractionRecorder {
    users: Arc<dyn UserStore>,
    tracks: Arc<dyn TrackStore>,
    upstream: Arc<dyn Upstream>,
}

impl InteractionRecorder {
    pub fn new(
        users: Arc<dyn UserStore>,
        tracks: Arc<dyn TrackStore>,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        InteractionRecorder {
            users,
            tracks,
            upstream,
        }
    }

    /// Records one swipe for the user. Idempotent: a duplicate submission
    /// reports success without double-counting.
    pub async fn record(
        &self,
        token: &Token,
        user_id: &str,
        entry: Interaction,
    ) -> Res<Recorded> {
        let appended = self.users.record_interaction(user_id, entry.clone()).await?;
        if !appended {
            return Ok(Recorded::Duplicate);
        }

        if entry.action == SwipeAction::Like {
            let playlist_id = self.ensure_playlist(token, user_id).await?;
            self.upstream
                .add_track_to_playlist(token, &playlist_id, &entry.track_id)
                .await?;
        }

        self.tracks.record_swipe(user_id, &entry).await?;
        Ok(Recorded::New)
    }

    /// Returns the user's playlist id, creating the playlist upstream and
    /// persisting its id on first use.
    pub async fn ensure_playlist(&self, token: &Token, user_id: &str) -> Res<String> {
        let user = self
            .users
            .find(user_id)
            .await?
            .ok_or_else(|| Error::UnknownUser(user_id.to_string()))?;

        if let Some(playlist_id) = user.playlist_id {
            return Ok(playlist_id);
        }

        let playlist = self
            .upstream
            .create_playlist(token, user_id, PLAYLIST_NAME, PLAYLIST_DESCRIPTION)
            .await?;
        self.users.set_playlist_id(user_id, &playlist.id).await?;
        Ok(playlist.id)
    }
}
