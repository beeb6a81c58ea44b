//! `hb-flower` — nectar flowers and the arena that owns them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`flower`]  | `Flower` — depletable nectar store with feed/reset              |
//! | [`area`]    | `FlowerArea` — flower registry, probe lookup, bulk reset        |
//! | [`nearest`] | `NearestFlower` — sticky target pointer, `update_nearest`       |
//! | [`error`]   | `FlowerError`, `FlowerResult<T>`                                |
//!
//! # Ownership
//!
//! `FlowerArea` owns every `Flower` in a `Vec` that is built once and never
//! reordered.  Everything else (agents, the probe lookup) refers to flowers
//! by [`FlowerId`][hb_core::FlowerId], an index into that `Vec`.  Flowers
//! are reset in place between episodes, never recreated, so IDs stay valid
//! for the arena's whole lifetime.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash for the probe → flower lookup map.               |
//! | `serde`   | Derives `Serialize`/`Deserialize` on colour config.     |

pub mod area;
pub mod error;
pub mod flower;
pub mod nearest;


pub use area::{AREA_DIAMETER, FlowerArea};
pub use error::{FlowerError, FlowerResult};
pub use flower::{Flower, FlowerColors, NECTAR_CAPACITY, Rgb};
pub use nearest::{NearestFlower, update_nearest};
