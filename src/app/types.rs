//! Application types for CLI commands.

/// Rendered output of a command together with its process exit code.
///
/// # Example
///
/// ```
/// use groundwater_sql::app::CommandOutput;
///
/// let out = CommandOutput::success("done".to_string());
/// assert_eq!(out.exit_code, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `0` on success, `1` when the statement failed or was rejected.
    pub exit_code: i32,
    /// Formatted text, JSON or YAML for stdout.
    pub output:    String
}

impl CommandOutput {
    pub fn success(output: String) -> Self {
        Self {
            exit_code: 0,
            output
        }
    }

    pub fn with_code(exit_code: i32, output: String) -> Self {
        Self {
            exit_code,
            output
        }
    }
}
