//! Replay scripts.
//!
//! One step per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! start
//! moveLeft
//! wait 1200      # advance gravity time
//! hardDrop
//! ```
//!
//! Command names are the camelCase names of [`Command`], matched without
//! regard to case.

use thiserror::Error;

use crate::types::Command;

/// One parsed script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Command(Command),
    /// Let this many milliseconds pass
    Wait(u32),
}

/// A script line that could not be parsed (line numbers start at 1)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: `wait` needs a millisecond count, got `{arg}`")]
    BadWait { line: usize, arg: String },
    #[error("line {line}: unexpected `{extra}` after `{word}`")]
    TrailingInput {
        line: usize,
        word: String,
        extra: String,
    },
}

/// Parse a single line; `Ok(None)` for blank and comment lines.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ScriptStep>, ScriptError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    let mut words = content.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    if word.eq_ignore_ascii_case("wait") {
        let arg = words.next().unwrap_or_default();
        let ms = arg.parse::<u32>().map_err(|_| ScriptError::BadWait {
            line: line_no,
            arg: arg.to_string(),
        })?;
        reject_trailing(line_no, word, words)?;
        return Ok(Some(ScriptStep::Wait(ms)));
    }

    let command = Command::from_str(word).ok_or_else(|| ScriptError::UnknownCommand {
        line: line_no,
        word: word.to_string(),
    })?;
    reject_trailing(line_no, word, words)?;
    Ok(Some(ScriptStep::Command(command)))
}

fn reject_trailing<'a>(
    line: usize,
    word: &str,
    mut rest: impl Iterator<Item = &'a str>,
) -> Result<(), ScriptError> {
    match rest.next() {
        Some(extra) => Err(ScriptError::TrailingInput {
            line,
            word: word.to_string(),
            extra: extra.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(step) = parse_line(idx + 1, line)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_commands_waits_and_comments() {
        let script = "# warm up\nstart\n\n  moveLeft  # nudge\nWAIT 250\nrotateCCW\n";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                ScriptStep::Command(Command::Start),
                ScriptStep::Command(Command::MoveLeft),
                ScriptStep::Wait(250),
                ScriptStep::Command(Command::RotateCcw),
            ]
        );
    }

    #[test]
    fn test_reports_line_numbers() {
        let err = parse_script("start\nhold\n").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownCommand {
                line: 2,
                word: "hold".to_string()
            }
        );

        let err = parse_script("wait soon").unwrap_err();
        assert_eq!(
            err,
            ScriptError::BadWait {
                line: 1,
                arg: "soon".to_string()
            }
        );

        let err = parse_script("start now").unwrap_err();
        assert!(matches!(err, ScriptError::TrailingInput { line: 1, .. }));
    }
}
