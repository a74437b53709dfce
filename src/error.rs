use miette::Diagnostic;
use thiserror::Error;

/// Main error type for glowbrush host operations.
///
/// The drawing core never returns these; they come from loading
/// configuration and scripts, decoding brush images and writing output.
#[derive(Error, Diagnostic, Debug)]
pub enum GlowError {
    #[error("IO error: {0}")]
    #[diagnostic(code(glowbrush::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(glowbrush::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(glowbrush::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(glowbrush::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Decode error: {message}")]
    #[diagnostic(code(glowbrush::decode))]
    Decode { message: String },

    #[error("Output error: {message}")]
    #[diagnostic(code(glowbrush::output))]
    Output {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, GlowError>;
