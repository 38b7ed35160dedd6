// Filter settings: persisted slider positions and restore on start.

pub mod restore;
pub mod store;
pub mod types;
