use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    types::{Interaction, SwipeAction, User},
};

/// Persistent user records, keyed by the Spotify profile id.
///
/// The store's update operations must be indivisible per user record: the
/// interaction append and counter increment in [`record_interaction`] are
/// one operation, so two concurrent swipes cannot leave the counters out of
/// step with the history.
///
/// [`record_interaction`]: UserStore::record_interaction
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: &str) -> Res<Option<User>>;

    /// Inserts the record unless one with the same id already exists. On
    /// repeat login the existing record (history, counters, playlist id)
    /// must survive untouched.
    async fn insert(&self, user: User) -> Res<()>;

    /// Whether the track already appears in the user's interaction history.
    async fn has_seen(&self, id: &str, track_id: &str) -> Res<bool>;

    /// Appends a history entry and increments the matching counter in one
    /// indivisible step. Returns `false` without changing anything when the
    /// track is already in the history.
    async fn record_interaction(&self, id: &str, entry: Interaction) -> Res<bool>;

    async fn set_playlist_id(&self, id: &str, playlist_id: &str) -> Res<()>;

    /// Removes the stored playlist reference. The upstream playlist itself
    /// is left alone.
    async fn clear_playlist_id(&self, id: &str) -> Res<()>;
}

/// File-backed user store: one pretty-printed JSON document per server,
/// guarded by a single async mutex so every update is serialized.
pub struct JsonUserStore {
    path: PathBuf,
    users: Mutex<HashMap<String, User>>,
}

impl JsonUserStore {
    /// Opens the store at `path`, loading existing records when the file is
    /// present.
    pub async fn open(path: PathBuf) -> Res<Self> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let users = if path.is_file() {
            let content = async_fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        Ok(JsonUserStore {
            path,
            users: Mutex::new(users),
        })
    }

    async fn persist(&self, users: &HashMap<String, User>) -> Res<()> {
        let json = serde_json::to_string_pretty(users)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn find(&self, id: &str) -> Res<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(id).cloned())
    }

    async fn insert(&self, user: User) -> Res<()> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) {
            return Ok(());
        }
        users.insert(user.id.clone(), user);
        self.persist(&users).await
    }

    async fn has_seen(&self, id: &str, track_id: &str) -> Res<bool> {
        let users = self.users.lock().await;
        let user = users.get(id).ok_or_else(|| Error::UnknownUser(id.to_string()))?;
        Ok(user.has_seen(track_id))
    }

    async fn record_interaction(&self, id: &str, entry: Interaction) -> Res<bool> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| Error::UnknownUser(id.to_string()))?;

        if user.has_seen(&entry.track_id) {
            return Ok(false);
        }

        match entry.action {
            SwipeAction::Like => user.swipes.likes += 1,
            SwipeAction::Dislike => user.swipes.dislikes += 1,
        }
        user.recommendations.push(entry);

        self.persist(&users).await?;
        Ok(true)
    }

    async fn set_playlist_id(&self, id: &str, playlist_id: &str) -> Res<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| Error::UnknownUser(id.to_string()))?;
        user.playlist_id = Some(playlist_id.to_string());
        self.persist(&users).await
    }

    async fn clear_playlist_id(&self, id: &str) -> Res<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| Error::UnknownUser(id.to_string()))?;
        user.playlist_id = None;
        self.persist(&users).await
    }
}
