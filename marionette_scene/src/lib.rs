// marionette_scene — the scene graph the animation core writes into.
//
// This crate decouples animation logic from any rendering engine: instead of
// mutating an engine's node tree directly, animators own `NodeId` handles
// into a `SceneArena` and mutate local transforms and visibility through a
// small interface (`set_local_translation`, `set_rotation_euler`,
// `set_scale`, `set_visible`). A renderer walks the arena after each frame
// and mirrors it into whatever engine is in use.
//
// Module overview:
// - `math.rs`:  `Vec3` + 3×3 rotation matrices from Euler angles — the small
//   amount of hand-rolled linear algebra the arena needs.
// - `arena.rs`: `SceneArena` — slab of nodes with parent indices, child
//   lists, local TRS, visibility, and world-space resolution.
//
// The arena is plain data (serde-derived throughout) so a scene can be
// snapshotted and inspected in tests.

pub mod arena;
pub mod math;

pub use arena::{NodeId, SceneArena};
pub use math::{Mat3, Vec3, rad};
