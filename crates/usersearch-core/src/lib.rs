pub mod directory;
pub mod execution;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod settings;
pub mod view;
