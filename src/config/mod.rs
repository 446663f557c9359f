pub mod proc_loader;
pub mod proc_validator;
pub mod refresher;
pub mod settings;
