pub mod cli;
pub mod config;
pub mod diff;
pub mod events;
pub mod filter;
pub mod monitor;
pub mod scanner;
pub mod sink;

pub use config::*;
pub use diff::*;
pub use events::*;
pub use filter::*;
pub use monitor::*;
pub use scanner::*;
pub use sink::*;
