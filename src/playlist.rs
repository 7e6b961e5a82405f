//! Playlist data model: `Track` and the ordered `Playlist` that holds them.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
