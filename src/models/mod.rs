//! Status.io model types.

mod common;
mod component;
mod incident;
mod maintenance;
mod metric;
mod status;
mod subscriber;

pub use common::*;
pub use component::*;
pub use incident::*;
pub use maintenance::*;
pub use metric::*;
pub use status::*;
pub use subscriber::*;
