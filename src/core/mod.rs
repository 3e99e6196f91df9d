//! Core services
//!
//! Each service owns a handle to the database and is cheap to clone.

pub mod catalog;
pub mod credentials;
pub mod playlists;
pub mod search;
pub mod tokens;

pub use catalog::CatalogStore;
pub use credentials::CredentialStore;
pub use playlists::PlaylistService;
pub use search::{SearchKind, SearchResults, SearchService};
pub use tokens::{Identity, TokenService};
