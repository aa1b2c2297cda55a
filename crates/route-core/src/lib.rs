//! `route-core` — foundational value types for the offline route planner.
//!
//! This crate is a dependency of every other crate in the workspace.  It
//! intentionally has no `route-*` dependencies and minimal external ones
//! (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                           |
//! |-----------------|-----------------------------------------------------|
//! | [`ids`]         | `VertexId`, `RoadId`                               |
//! | [`geo`]         | `Point`, `BBox`, haversine/planar distance          |
//! | [`road`]        | `HighwayKind`, `Road`, `rating`/`visibility`        |
//! | [`diagnostics`] | `Counter`, `Sizable`                               |
//! | [`error`]       | `CoreError`, `CoreResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod diagnostics;
pub mod error;
pub mod geo;
pub mod ids;
pub mod road;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diagnostics::{Counter, Sizable};
pub use error::{CoreError, CoreResult};
pub use geo::{BBox, Point};
pub use ids::{RoadId, VertexId};
pub use road::{HighwayKind, Road};
