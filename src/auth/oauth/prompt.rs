//! Operator interaction for the installed-application flow.

use std::io::{self, BufRead, Write};

use crate::auth::AuthError;

/// Shows the consent URL to the operator and returns the pasted code.
///
/// Implementations may block; the resolver calls them on tokio's blocking
/// pool.
pub trait AuthorizationPrompt: Send + Sync {
    /// Presents `authorization_url` and waits for the authorization code.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Prompt`] if no code can be obtained.
    fn request_code(&self, authorization_url: &str) -> Result<String, AuthError>;
}

/// Prompts on the process's standard output and reads standard input.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinPrompt;

impl AuthorizationPrompt for StdinPrompt {
    fn request_code(&self, authorization_url: &str) -> Result<String, AuthError> {
        let prompt_error = |e: io::Error| AuthError::Prompt {
            reason: e.to_string(),
        };

        let mut stdout = io::stdout().lock();
        write!(
            stdout,
            "Visit the following URL and log in:\n\n\t{authorization_url}\n\nThen type the resulting code here: "
        )
        .map_err(prompt_error)?;
        stdout.flush().map_err(prompt_error)?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map_err(prompt_error)?;
        normalize_code(&line)
    }
}

/// Trims the pasted code and rejects empty input.
pub(crate) fn normalize_code(input: &str) -> Result<String, AuthError> {
    let code = input.trim();
    if code.is_empty() {
        return Err(AuthError::Prompt {
            reason: "no authorization code entered".to_string(),
        });
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code_trims_whitespace() {
        assert_eq!(normalize_code("  4/0Ab-code\n").unwrap(), "4/0Ab-code");
    }

    #[test]
    fn test_normalize_code_rejects_empty_input() {
        assert!(matches!(normalize_code("\n"), Err(AuthError::Prompt { .. })));
        assert!(normalize_code("").is_err());
    }

    #[test]
    fn test_prompt_is_object_safe() {
        let prompt: Box<dyn AuthorizationPrompt> = Box::new(StdinPrompt);
        let _ = prompt;
    }
}
