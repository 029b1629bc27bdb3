//! Launch file parsing, substitution and configuration resolution

mod launch_config;
mod launch_file;
mod profiles;
mod resolver;
mod substitution;

pub use launch_config::*;
pub use launch_file::*;
pub use profiles::*;
pub use resolver::*;
pub use substitution::*;
