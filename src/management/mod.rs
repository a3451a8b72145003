mod auth;
mod recommend;
mod swipes;
mod tracks;
mod users;

pub use auth::AuthFlow;
pub use recommend::MAX_STALLED_ROUNDS;
pub use recommend::RecommendationEngine;
pub use swipes::InteractionRecorder;
pub use swipes::PLAYLIST_NAME;
pub use swipes::Recorded;
pub use tracks::JsonTrackStore;
pub use tracks::TrackStore;
pub use users::JsonUserStore;
pub use users::UserStore;
