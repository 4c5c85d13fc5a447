pub mod declare_commands;

pub use declare_commands::DeclareCommands;
