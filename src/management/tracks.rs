use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    Res,
    types::{Interaction, SwipeAction, TrackSnapshot},
};

/// Global per-track aggregates, keyed by the Spotify track id.
#[async_trait]
pub trait TrackStore: Send + Sync {
    async fn find(&self, id: &str) -> Res<Option<TrackSnapshot>>;

    /// Adds the user to the snapshot's like or dislike set, creating the
    /// snapshot on first interaction. Set-union semantics: a user already
    /// present in either set is never added again, so the two sets stay
    /// disjoint per user.
    async fn record_swipe(&self, user_id: &str, entry: &Interaction) -> Res<()>;
}

/// File-backed track store, same single-document layout as the user store.
pub struct JsonTrackStore {
    path: PathBuf,
    tracks: Mutex<HashMap<String, TrackSnapshot>>,
}

impl JsonTrackStore {
    pub async fn open(path: PathBuf) -> Res<Self> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let tracks = if path.is_file() {
            let content = async_fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        Ok(JsonTrackStore {
            path,
            tracks: Mutex::new(tracks),
        })
    }

    async fn persist(&self, tracks: &HashMap<String, TrackSnapshot>) -> Res<()> {
        let json = serde_json::to_string_pretty(tracks)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl TrackStore for JsonTrackStore {
    async fn find(&self, id: &str) -> Res<Option<TrackSnapshot>> {
        let tracks = self.tracks.lock().await;
        Ok(tracks.get(id).cloned())
    }

    async fn record_swipe(&self, user_id: &str, entry: &Interaction) -> Res<()> {
        let mut tracks = self.tracks.lock().await;

        let snapshot = tracks.entry(entry.track_id.clone()).or_insert_with(|| TrackSnapshot {
            id: entry.track_id.clone(),
            name: entry.name.clone(),
            artists: entry.artists.clone(),
            images: entry.images.clone(),
            likes: Vec::new(),
            dislikes: Vec::new(),
        });

        let already_counted = snapshot.likes.iter().any(|u| u == user_id)
            || snapshot.dislikes.iter().any(|u| u == user_id);
        if !already_counted {
            match entry.action {
                SwipeAction::Like => snapshot.likes.push(user_id.to_string()),
                SwipeAction::Dislike => snapshot.dislikes.push(user_id.to_string()),
            }
        }

        self.persist(&tracks).await
    }
}
