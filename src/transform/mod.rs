//! Pure data shaping between the fetcher and the renderer.

pub mod deflate;
pub mod watchlist;

pub use deflate::merge_and_deflate;
pub use watchlist::select_watchlist;
