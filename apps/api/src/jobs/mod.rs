// Job Registry: job card persistence and CRUD.

pub mod handlers;
pub mod memory;
pub mod registry;
pub mod store;
