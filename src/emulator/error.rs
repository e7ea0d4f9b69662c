use std::io;
use thiserror::Error;

/// Everything that can go wrong around the interpreter.
/// Bad memory accesses and unknown opcodes are not errors, they are no-ops.
#[derive(Debug, Error)]
pub enum Error {
    #[error("program is too large ({size} bytes), at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("the interpreter thread panicked")]
    InterpreterPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::ProgramTooLarge { size: 4000, max: 3583 };
        assert_eq!(
            err.to_string(),
            "program is too large (4000 bytes), at most 3583 bytes fit in memory"
        );
        let io_err: Error = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(io_err.to_string(), "I/O error: missing");
    }
}
