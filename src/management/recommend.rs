use std::{collections::HashSet, sync::Arc};

use crate::{
    Res,
    spotify::Upstream,
    types::{SpotifyTrack, Token},
};

use super::UserStore;

/// How many seed tracks to pull from the user's recent listening history.
const SEED_TRACK_COUNT: u32 = 5;

/// Consecutive rounds without a single newly approved track before the
/// top-up loop gives up. The recommendation endpoint repeats itself once
/// its candidate pool for a seed set is exhausted, so zero net progress is
/// the termination signal rather than an error.
pub const MAX_STALLED_ROUNDS: u32 = 3;

/// Iteratively collects recommended tracks until the requested count is
/// reached or the upstream stops yielding anything new.
///
/// Every returned track passes two independent filters: it carries preview
/// media, and it does not appear in the user's persisted interaction
/// history. Results keep the upstream-provided order.
pub struct RecommendationEngine {
    users: Arc<dyn UserStore>,
    upstream: Arc<dyn Upstream>,
}

impl RecommendationEngine {
    pub fn new(users: Arc<dyn UserStore>, upstream: Arc<dyn Upstream>) -> Self {
        RecommendationEngine { users, upstream }
    }

    /// Returns the ids of the user's recent top tracks, the default seed set.
    pub async fn seed_from_top_tracks(&self, token: &Token) -> Res<Vec<String>> {
        let tracks = self.upstream.top_tracks(token, SEED_TRACK_COUNT).await?;
        Ok(tracks.into_iter().map(|t| t.id).collect())
    }

    /// Bounded iterative top-up: request as many candidates as are still
    /// missing, keep the survivors of both filters, repeat.
    ///
    /// A short result is valid, not an error; it means the upstream could
    /// not supply enough novel, playable tracks for these seeds before the
    /// stall bound was hit.
    pub async fn get_recommendations(
        &self,
        token: &Token,
        user_id: &str,
        seed_tracks: &[String],
        target: usize,
    ) -> Res<Vec<SpotifyTrack>> {
        let mut approved: Vec<SpotifyTrack> = Vec::new();
        // Guards against the upstream repeating a track across rounds
        // before it lands in the persisted history.
        let mut picked: HashSet<String> = HashSet::new();
        let mut stalled_rounds = 0u32;

        while approved.len() < target {
            let remaining = (target - approved.len()) as u32;
            let candidates = self
                .upstream
                .recommendations(token, seed_tracks, remaining)
                .await?;

            let before = approved.len();
            for track in candidates {
                if !track.has_preview() {
                    continue;
                }
                if picked.contains(&track.id) {
                    continue;
                }
                if self.users.has_seen(user_id, &track.id).await? {
                    continue;
                }
                picked.insert(track.id.clone());
                approved.push(track);
            }

            if approved.len() == before {
                stalled_rounds += 1;
                if stalled_rounds >= MAX_STALLED_ROUNDS {
                    break;
                }
            } else {
                stalled_rounds = 0;
            }
        }

        approved.truncate(target);
        Ok(approved)
    }
}
