//! Coordinate frame graph
//!
//! Resolves the pose of one named frame relative to another. The sequencer
//! only depends on the [`TransformLookup`] trait; [`TransformBuffer`] is the
//! in-process implementation fed from the transport, and [`ScriptedLookup`]
//! replays canned answers for tests and simulations.

pub mod lookup;
pub mod buffer;
pub mod mock;
pub mod error;

pub use lookup::TransformLookup;
pub use buffer::TransformBuffer;
pub use mock::ScriptedLookup;
pub use error::{LookupError, LookupResult};
