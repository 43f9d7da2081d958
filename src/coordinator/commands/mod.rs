pub mod load_inverters;
pub mod refresh_settings;
pub mod send_command;
