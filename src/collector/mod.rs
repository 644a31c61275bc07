//! Process table sampling: filesystem access, `/proc` readers, the tick
//! sampler, and the termination primitive.

pub mod mock;
pub mod procfs;
pub mod sampler;
pub mod signal;
pub mod traits;

pub use procfs::CollectError;
pub use sampler::{Sampler, TickHistory};
pub use traits::{FileSystem, RealFs};
