//! Text command scripts driving a [`SkipListPq`].
//!
//! A script starts with a header line `N alpha`, followed by `N` command
//! lines:
//!
//! | Line          | Command                         |
//! |---------------|---------------------------------|
//! | `0`           | print the minimum entry         |
//! | `1`           | remove the minimum entry        |
//! | `2 key value` | insert an entry                 |
//! | `3`           | print every entry with its height |
//!
//! Running a script echoes the header, prints the output of the `0` and `3`
//! commands, and ends with the summary line `alpha size inserts average`.

use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
};

use thiserror::Error;

use crate::{height_policy::HeightPolicy, pq::SkipListPq};

/// Printed by the `0` and `3` commands when the queue is empty.
pub const EMPTY_MESSAGE: &str = "Empty list, try again";

/// Errors that can occur while parsing a script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The script has no header line.
    #[error("missing header line.")]
    MissingHeader,
    /// A token expected to be an integer is not one.
    #[error("line {line}: invalid integer {token:?}.")]
    InvalidInteger {
        /// The 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// The header's alpha is not a number.
    #[error("line {line}: invalid alpha {token:?}.")]
    InvalidAlpha {
        /// The 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A line is missing one of its operands.
    #[error("line {line}: missing {what}.")]
    MissingOperand {
        /// The 1-based line number.
        line: usize,
        /// The name of the missing operand.
        what: &'static str,
    },
    /// A command line starts with an unknown opcode.
    #[error("line {line}: invalid operation code {opcode}.")]
    UnknownOpcode {
        /// The 1-based line number.
        line: usize,
        /// The opcode.
        opcode: i64,
    },
    /// The script ends before the announced number of commands.
    #[error("expected {expected} commands, found {found}.")]
    MissingCommands {
        /// Commands announced by the header.
        expected: usize,
        /// Commands present.
        found: usize,
    },
}

// ////////////////////////////////////////////////////////////////////////////
// Command
// ////////////////////////////////////////////////////////////////////////////

/// A single script command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the minimum entry (`0`).
    PeekMin,
    /// Remove the minimum entry (`1`).
    RemoveMin,
    /// Insert an entry (`2 key value`).
    Insert {
        /// The key.
        key: i64,
        /// The value.
        value: String,
    },
    /// Print every entry with its tower height (`3`).
    Print,
}

impl Command {
    /// Parse one command line. `line` is the 1-based line number used in
    /// errors.
    ///
    /// # Errors
    ///
    /// Fails on a missing or unknown opcode, or on missing or malformed insert
    /// operands. Tokens after the last expected operand are ignored.
    pub fn parse_line(text: &str, line: usize) -> Result<Self, ParseError> {
        let mut tokens = text.split_whitespace();
        let opcode = parse_int(tokens.next(), line, "operation code")?;
        match opcode {
            0 => Ok(Command::PeekMin),
            1 => Ok(Command::RemoveMin),
            2 => {
                let key = parse_int(tokens.next(), line, "key")?;
                let value = tokens.next().ok_or(ParseError::MissingOperand {
                    line,
                    what: "value",
                })?;
                Ok(Command::Insert {
                    key,
                    value: value.to_owned(),
                })
            }
            3 => Ok(Command::Print),
            _ => Err(ParseError::UnknownOpcode { line, opcode }),
        }
    }

    /// Apply the command to `pq`, writing any output to `out`.
    ///
    /// # Errors
    ///
    /// Only fails if writing to `out` fails.
    pub fn apply<P, W>(&self, pq: &mut SkipListPq<P>, out: &mut W) -> io::Result<()>
    where
        P: HeightPolicy,
        W: Write + ?Sized,
    {
        match self {
            Command::PeekMin => match pq.min() {
                Some(entry) => writeln!(out, "{entry}"),
                None => writeln!(out, "{EMPTY_MESSAGE}"),
            },
            Command::RemoveMin => {
                if pq.remove_min().is_none() {
                    tracing::debug!("remove on empty queue");
                }
                Ok(())
            }
            Command::Insert { key, value } => {
                pq.insert(*key, value.as_str());
                Ok(())
            }
            Command::Print => {
                if pq.is_empty() {
                    writeln!(out, "{EMPTY_MESSAGE}")
                } else {
                    writeln!(out, "{pq}")
                }
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PeekMin => write!(f, "0"),
            Command::RemoveMin => write!(f, "1"),
            Command::Insert { key, value } => write!(f, "2 {key} {value}"),
            Command::Print => write!(f, "3"),
        }
    }
}

fn parse_int(token: Option<&str>, line: usize, what: &'static str) -> Result<i64, ParseError> {
    let token = token.ok_or(ParseError::MissingOperand { line, what })?;
    token.parse().map_err(|_err| ParseError::InvalidInteger {
        line,
        token: token.to_owned(),
    })
}

// ////////////////////////////////////////////////////////////////////////////
// Script
// ////////////////////////////////////////////////////////////////////////////

/// A parsed command script.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    /// The height policy parameter from the header.
    pub alpha: f64,
    /// The commands, in order.
    pub commands: Vec<Command>,
}

impl Script {
    /// Run the script against a fresh queue built from its `alpha`.
    ///
    /// # Errors
    ///
    /// Only fails if writing to `out` fails.
    pub fn execute<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<SkipListPq> {
        let mut pq = SkipListPq::new(self.alpha);
        self.run(&mut pq, out)?;
        Ok(pq)
    }

    /// Run the script against `pq`: echo the header, apply every command and
    /// finish with the summary line.
    ///
    /// # Errors
    ///
    /// Only fails if writing to `out` fails.
    pub fn run<P, W>(&self, pq: &mut SkipListPq<P>, out: &mut W) -> io::Result<()>
    where
        P: HeightPolicy,
        W: Write + ?Sized,
    {
        writeln!(out, "{} {:?}", self.commands.len(), self.alpha)?;
        for command in &self.commands {
            command.apply(pq, out)?;
        }
        tracing::debug!(
            size = pq.len(),
            inserts = pq.insert_count(),
            "script finished"
        );
        writeln!(
            out,
            "{:?} {} {} {:?}",
            self.alpha,
            pq.len(),
            pq.insert_count(),
            pq.average_traversed().unwrap_or(f64::NAN)
        )
    }
}

impl FromStr for Script {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text))
            .filter(|(_, text)| !text.trim().is_empty());

        let (line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
        let mut tokens = header.split_whitespace();
        let count = parse_int(tokens.next(), line, "command count")?;
        let expected = usize::try_from(count).map_err(|_err| ParseError::InvalidInteger {
            line,
            token: count.to_string(),
        })?;
        let token = tokens.next().ok_or(ParseError::MissingOperand {
            line,
            what: "alpha",
        })?;
        let alpha = token.parse().map_err(|_err| ParseError::InvalidAlpha {
            line,
            token: token.to_owned(),
        })?;

        let commands = lines
            .take(expected)
            .map(|(line, text)| Command::parse_line(text, line))
            .collect::<Result<Vec<_>, _>>()?;
        if commands.len() < expected {
            return Err(ParseError::MissingCommands {
                expected,
                found: commands.len(),
            });
        }
        Ok(Script { alpha, commands })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Command, ParseError, Script};
    use crate::pq::SkipListPq;

    fn output(script: &Script) -> Result<String> {
        let mut out = Vec::new();
        script.execute(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parse() -> Result<()> {
        let script: Script = "5 0.5\n2 4 a\n2 -2 b\n\n0\n1\n3\n".parse()?;
        assert_eq!(script.alpha, 0.5);
        assert_eq!(
            script.commands,
            vec![
                Command::Insert {
                    key: 4,
                    value: "a".to_owned()
                },
                Command::Insert {
                    key: -2,
                    value: "b".to_owned()
                },
                Command::PeekMin,
                Command::RemoveMin,
                Command::Print,
            ]
        );
        Ok(())
    }

    #[test]
    fn trailing_lines_are_ignored() -> Result<()> {
        let script: Script = "1 2\n0\n9 garbage\n".parse()?;
        assert_eq!(script.commands, vec![Command::PeekMin]);
        Ok(())
    }

    #[rstest]
    #[case("", ParseError::MissingHeader)]
    #[case("x 0.5", ParseError::InvalidInteger { line: 1, token: "x".to_owned() })]
    #[case("-1 0.5", ParseError::InvalidInteger { line: 1, token: "-1".to_owned() })]
    #[case("1", ParseError::MissingOperand { line: 1, what: "alpha" })]
    #[case("1 half", ParseError::InvalidAlpha { line: 1, token: "half".to_owned() })]
    #[case("1 0.5\n4", ParseError::UnknownOpcode { line: 2, opcode: 4 })]
    #[case("1 0.5\n2", ParseError::MissingOperand { line: 2, what: "key" })]
    #[case("1 0.5\n2 7", ParseError::MissingOperand { line: 2, what: "value" })]
    #[case("1 0.5\n2 seven x", ParseError::InvalidInteger { line: 2, token: "seven".to_owned() })]
    #[case("3 0.5\n0\n\n1", ParseError::MissingCommands { expected: 3, found: 2 })]
    fn parse_errors(#[case] input: &str, #[case] expected: ParseError) {
        assert_eq!(input.parse::<Script>(), Err(expected));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ParseError::UnknownOpcode { line: 3, opcode: 7 }.to_string(),
            "line 3: invalid operation code 7."
        );
        assert_eq!(
            ParseError::MissingCommands {
                expected: 2,
                found: 1
            }
            .to_string(),
            "expected 2 commands, found 1."
        );
    }

    #[test]
    fn deterministic_run() -> Result<()> {
        let script: Script = "8 2\n0\n3\n2 4 a\n2 2 b\n2 6 c\n0\n3\n1\n".parse()?;
        insta::assert_snapshot!(output(&script)?, @r"
        8 2.0
        Empty list, try again
        Empty list, try again
        2 b
        2 b 2, 4 a 3, 6 c 2
        2.0 2 3 3.6666666666666665
        ");
        Ok(())
    }

    #[test]
    fn no_inserts_prints_nan() -> Result<()> {
        let script: Script = "2 0.5\n1\n0\n".parse()?;
        insta::assert_snapshot!(output(&script)?, @r"
        2 0.5
        Empty list, try again
        0.5 0 0 NaN
        ");
        Ok(())
    }

    #[test]
    fn run_on_existing_queue() -> Result<()> {
        let script: Script = "2 0.25\n2 1 x\n1\n".parse()?;
        let mut pq = SkipListPq::with_seed(0.25, 3);
        let mut out = Vec::new();
        script.run(&mut pq, &mut out)?;
        assert!(pq.is_empty());
        assert_eq!(pq.insert_count(), 1);
        let text = String::from_utf8(out)?;
        assert!(text.starts_with("2 0.25\n0.25 0 1 "), "{text}");
        Ok(())
    }

    #[test]
    fn display_round_trips_lines() -> Result<()> {
        for text in ["0", "1", "2 -5 hello", "3"] {
            assert_eq!(Command::parse_line(text, 1)?.to_string(), text);
        }
        Ok(())
    }
}
