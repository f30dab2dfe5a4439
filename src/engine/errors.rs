use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("engine setup failed ({})", describe_exit(.code))]
    SetupFailed { code: Option<i32> },
    #[error("image generation failed ({})", describe_exit(.code))]
    GenerationFailed { code: Option<i32> },
    #[error("no image generated in {}", .dir.display())]
    NoOutputProduced { dir: PathBuf },
    #[error("io failure: {0}")]
    IoFailure(#[from] io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_exit() {
        let e = GenerationError::SetupFailed { code: Some(2) };
        assert_eq!(e.to_string(), "engine setup failed (exit code 2)");

        let e = GenerationError::GenerationFailed { code: None };
        assert_eq!(e.to_string(), "image generation failed (terminated by signal)");
    }
}
