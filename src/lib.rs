pub mod cbz;
pub mod cli;
pub mod download;
pub mod run;
pub mod site;

pub use cli::Cli;
pub use run::run;
