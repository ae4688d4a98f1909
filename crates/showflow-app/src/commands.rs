//! Operator console input.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Grant the next capture request, optionally labelled.
    Add(Option<String>),

    /// Dismiss the next capture picker.
    Cancel,

    /// Fail the next capture request.
    Fail(String),

    /// Select the Nth gallery entry (1-based) for preview.
    Preview(usize),

    /// Remove the Nth gallery entry (1-based).
    Remove(usize),

    /// Promote preview to program.
    Take,

    /// Cut to standby.
    Cut,

    /// Load a standby image.
    Standby(PathBuf),

    /// Open the output surface.
    Open,

    /// Close the output surface as its user would.
    CloseOutput,

    /// Refuse or allow output surface creation.
    Block(bool),

    /// End the Nth granted track (1-based) from the device side.
    EndTrack(usize),

    /// Dismiss the current notification.
    Dismiss,

    /// Print the current state.
    State,

    /// Print help.
    Help,

    /// Leave.
    Quit,
}

/// Console help text.
pub const HELP: &str = "\
add [label]     request a source (granted)
cancel          request a source (picker dismissed)
fail [message]  request a source (platform failure)
preview <n>     select gallery entry n for preview
remove <n>      remove gallery entry n
take | go       put preview on air
cut | panic     cut to standby
standby <path>  load standby image
open            open the output surface
close-output    close the output surface
block on|off    refuse/allow output surface creation
end <n>         end granted track n from the device side
dismiss         dismiss the current error
state           print state
quit            exit";

/// Parse one console line.
pub fn parse(line: &str) -> Result<ConsoleInput> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word {
        "add" => ConsoleInput::Add((!rest.is_empty()).then(|| rest.to_string())),
        "cancel" => ConsoleInput::Cancel,
        "fail" => ConsoleInput::Fail(rest.to_string()),
        "preview" => ConsoleInput::Preview(index(rest)?),
        "remove" => ConsoleInput::Remove(index(rest)?),
        "take" | "go" => ConsoleInput::Take,
        "cut" | "panic" => ConsoleInput::Cut,
        "standby" => {
            if rest.is_empty() {
                bail!("standby needs a file path");
            }
            ConsoleInput::Standby(PathBuf::from(rest))
        }
        "open" => ConsoleInput::Open,
        "close-output" => ConsoleInput::CloseOutput,
        "block" => match rest {
            "on" => ConsoleInput::Block(true),
            "off" => ConsoleInput::Block(false),
            _ => bail!("block takes on|off"),
        },
        "end" => ConsoleInput::EndTrack(index(rest)?),
        "dismiss" => ConsoleInput::Dismiss,
        "state" => ConsoleInput::State,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        "" => bail!("empty command"),
        other => bail!("unknown command '{other}' (try 'help')"),
    };

    Ok(input)
}

fn index(arg: &str) -> Result<usize> {
    let n: usize = arg
        .parse()
        .with_context(|| format!("expected a number, got '{arg}'"))?;
    n.checked_sub(1).ok_or_else(|| anyhow!("numbers start at 1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("take").unwrap(), ConsoleInput::Take);
        assert_eq!(parse(" go ").unwrap(), ConsoleInput::Take);
        assert_eq!(parse("panic").unwrap(), ConsoleInput::Cut);
        assert_eq!(parse("open").unwrap(), ConsoleInput::Open);
        assert_eq!(parse("quit").unwrap(), ConsoleInput::Quit);
    }

    #[test]
    fn test_parse_add_label() {
        assert_eq!(parse("add").unwrap(), ConsoleInput::Add(None));
        assert_eq!(
            parse("add Window: Slides").unwrap(),
            ConsoleInput::Add(Some("Window: Slides".to_string()))
        );
    }

    #[test]
    fn test_parse_indices_are_one_based() {
        assert_eq!(parse("preview 1").unwrap(), ConsoleInput::Preview(0));
        assert_eq!(parse("remove 3").unwrap(), ConsoleInput::Remove(2));
        assert!(parse("preview 0").is_err());
        assert!(parse("preview x").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse("fade").is_err());
        assert!(parse("").is_err());
        assert!(parse("standby").is_err());
        assert!(parse("block maybe").is_err());
    }
}
