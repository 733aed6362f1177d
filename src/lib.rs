pub mod header;
pub mod model;
pub mod patch;
pub mod pipeline;
pub mod recipe;
pub mod store;
pub mod workspace;
