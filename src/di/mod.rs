mod builder;
mod container;
mod global;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use global::{global, set_global};
