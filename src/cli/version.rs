//! Version command.

/// Crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name shown in version and usage output.
pub const BIN_NAME: &str = "kortix-chat";

pub fn version_line() -> String {
    format!("{} {}", BIN_NAME, VERSION)
}

/// Handle `--version`: print the version line.
pub fn handle_version_command() {
    println!("{}", version_line());
}
