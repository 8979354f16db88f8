use thiserror::Error;

/// Reasons `retro_load_game` reports failure.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No game provided")]
    NoGame,
    #[error("Game info has no path; this core needs full paths")]
    MissingPath,
    #[error("Host rejected the XRGB8888 pixel format")]
    PixelFormatRejected,
    #[error("Emulator failed to load the title: {0}")]
    Core(String),
    #[error("Emulator panicked while loading the title")]
    Panicked,
}

/// Reasons save-state calls report failure.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Save states are not supported by the active backend")]
    Unsupported,
    #[error("No game is loaded")]
    NotLoaded,
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("Not a save state (bad magic)")]
    BadMagic,
    #[error("Unsupported save state version {found}")]
    VersionMismatch { found: u32 },
    #[error("Save state is truncated")]
    Truncated,
    #[error("Emulator state error: {0}")]
    Core(String),
    #[error("Emulator panicked during state transfer")]
    Panicked,
}
