//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{
    BuildArgs, CacheAction, CacheArgs, Cli, Commands, ComposeArgs, InitArgs, InstallArgs,
    OutputFormat,
};
