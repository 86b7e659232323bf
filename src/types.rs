use std::path::PathBuf;

/// Default env file name for directory locations.
pub const DEFAULT_FILE_NAME: &str = ".env";

/// Where the env file lives.
///
/// Directory variants are joined with the builder's file name (`.env` by
/// default). [`Path`](EnvFile::Path) names the file itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnvFile {
    /// The current working directory.
    #[default]
    Cwd,
    /// The user's home directory.
    Home,
    /// The platform config directory for an app (XDG on Linux,
    /// `~/Library/Application Support` on macOS).
    Platform(String),
    /// An explicit file path.
    Path(PathBuf),
}
