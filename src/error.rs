//! Process-level error type.
//!
//! The parsing/aggregation core never fails (malformed cells degrade to
//! zeros and empty strings), so `AppError` only describes shell problems:
//! bad invocations, empty selections, terminal or network trouble. Each
//! error carries the exit code `main` should return:
//!
//! - 2: usage or input problem (bad flags, missing env, export I/O)
//! - 3: the selection matched no rows
//! - 4: runtime failure (terminal, network)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad invocation or input (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// The current selection matched nothing (exit code 3).
    pub fn empty_selection(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Terminal, network, or other runtime failure (exit code 4).
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
