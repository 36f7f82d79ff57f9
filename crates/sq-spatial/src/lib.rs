//! `sq-spatial` — tile connectivity, routing, and path smoothing.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                    |
//! |------------------|-------------------------------------------------------------|
//! | [`tiles`]        | `TileKind`, `Slope`, `Surface`, `TileSource`, `TileGrid`    |
//! | [`connectivity`] | `ConnectivityMap`, `ConnectivityNode`, `NodeStatus`         |
//! | [`router`]       | `Router` trait, `FloodRouter`, `PathRequest`                |
//! | [`smooth`]       | `smooth_path` — slope-aware sub-tile offsets                |
//! | [`error`]        | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |
//! | `parallel` | `FloodRouter::find_paths` runs requests on Rayon.         |

pub mod connectivity;
pub mod error;
pub mod router;
pub mod smooth;
pub mod tiles;

#[cfg(test)]
mod tests;

pub use connectivity::{ConnectivityMap, ConnectivityNode, NodeStatus};
pub use error::{SpatialError, SpatialResult};
pub use router::{FloodRouter, PathRequest, Router};
pub use smooth::smooth_path;
pub use tiles::{Slope, Surface, TileGrid, TileKind, TileSource};
