use crate::core::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Hands picked identifiers to an external copy program (e.g. `pbcopy`,
/// `wl-copy`, `xclip -selection clipboard`). Without one, identifiers are only
/// collected and printed to stdout once the picker exits.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    command: Option<Vec<String>>,
}

impl Clipboard {
    pub fn new(command: Option<Vec<String>>) -> Self {
        let command = command.filter(|args| !args.is_empty());
        Self { command }
    }

    pub fn has_command(&self) -> bool {
        self.command.is_some()
    }

    /// Send `identifier` to the copy program, if one is configured
    pub fn copy(&self, identifier: &str) -> Result<()> {
        let Some(args) = &self.command else {
            return Ok(());
        };
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::Clipboard("Empty copy command".to_string()))?;

        debug!("Copying {:?} with {}", identifier, program);

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("Failed to start {}: {}", program, e)))?;

        // stdin is dropped before waiting so the program sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(identifier.as_bytes()),
            None => Ok(()),
        };
        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::Clipboard(format!("Failed to write to {}: {}", program, e)));
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(Error::Clipboard(format!("{} exited with {}", program, status)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_is_a_no_op() {
        let clipboard = Clipboard::new(None);
        assert!(!clipboard.has_command());
        assert!(clipboard.copy("bolt").is_ok());
    }

    #[test]
    fn test_empty_command_is_ignored() {
        let clipboard = Clipboard::new(Some(Vec::new()));
        assert!(!clipboard.has_command());
    }

    #[test]
    fn test_missing_program_is_reported() {
        let clipboard = Clipboard::new(Some(vec!["symbolpick-no-such-copy-program".to_string()]));
        assert!(matches!(clipboard.copy("bolt"), Err(Error::Clipboard(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_identifier_is_written_to_stdin() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let target = temp_dir.path().join("copied.txt");
        let clipboard = Clipboard::new(Some(vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("cat > '{}'", target.display()),
        ]));

        clipboard.copy("circle.info.fill")?;

        assert_eq!(std::fs::read_to_string(&target)?, "circle.info.fill");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_reported() {
        let clipboard = Clipboard::new(Some(vec!["false".to_string()]));
        assert!(matches!(clipboard.copy("bolt"), Err(Error::Clipboard(_))));
    }
}
