pub mod youtube_token;

pub use youtube_token::{PostgresCredentialStore, YoutubeToken};
