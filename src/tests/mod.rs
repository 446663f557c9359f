pub mod common;
pub mod secret_manager_wire;
