//! Line-oriented wizard session.
//!
//! Each step prints its title and note, then prompts for its fields one at
//! a time. Pressing Enter keeps the value shown in brackets. At any prompt
//! the commands `back`, `reset` and `quit` are accepted.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use comp_core::wizard::{Advance, Wizard};
use tracing::debug;

use crate::present::Present;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user accepted the results.
    Finished,
    /// The user typed `quit` or input ran out.
    Quit,
}

enum Reply {
    Value(String),
    Back,
    Reset,
    Quit,
}

fn read_reply<R: BufRead>(input: &mut R) -> Result<Reply> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(Reply::Quit);
    }
    let line = line.trim();
    Ok(match line.to_ascii_lowercase().as_str() {
        "back" => Reply::Back,
        "reset" => Reply::Reset,
        "quit" | "exit" => Reply::Quit,
        _ => Reply::Value(line.to_string()),
    })
}

/// Accepts either an option's number or its value.
fn resolve_choice<'a>(
    choices: &[(&'a str, &'a str)],
    reply: &str,
) -> Option<&'a str> {
    if let Ok(number) = reply.parse::<usize>() {
        return choices.get(number.checked_sub(1)?).map(|(value, _)| *value);
    }
    choices
        .iter()
        .find(|(value, _)| value.eq_ignore_ascii_case(reply))
        .map(|(value, _)| *value)
}

/// Runs `wizard` to completion against `input` and `output`.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or if the wizard reports a
/// contract violation.
pub fn run_session<F, R, W>(
    wizard: &mut Wizard<F>,
    input: &mut R,
    output: &mut W,
) -> Result<SessionEnd>
where
    F: Present,
    R: BufRead,
    W: Write,
{
    'steps: loop {
        let spec = wizard.current_spec()?;
        writeln!(output)?;
        writeln!(output, "== {} ==", spec.title)?;
        if !spec.note.is_empty() {
            writeln!(output, "{}", spec.note)?;
        }

        if spec.is_terminal() {
            match wizard.results() {
                Some(outcome) => {
                    for (label, value) in F::summary(outcome) {
                        writeln!(output, "  {label:<24} {value}")?;
                    }
                }
                None => writeln!(output, "  No results.")?,
            }
            write!(output, "Press Enter to finish, or type back or reset: ")?;
            output.flush()?;
            match read_reply(input)? {
                Reply::Back => {
                    wizard.back();
                    continue 'steps;
                }
                Reply::Reset => {
                    wizard.reset();
                    continue 'steps;
                }
                Reply::Quit => return Ok(SessionEnd::Quit),
                Reply::Value(_) => return Ok(SessionEnd::Finished),
            }
        }

        for field in spec.fields {
            if let Some(context) = wizard.flow().context(wizard.fields(), field) {
                writeln!(output, "  {context}")?;
            }
            let choices = F::choices(field);
            for (number, (_, label)) in choices.iter().enumerate() {
                writeln!(output, "  {}. {label}", number + 1)?;
            }
            if let Some(error) = wizard.errors().get(*field) {
                writeln!(output, "  ! {error}")?;
            }
            write!(
                output,
                "{} [{}]: ",
                F::label(field),
                wizard.field(field).unwrap_or_default()
            )?;
            output.flush()?;

            match read_reply(input)? {
                Reply::Back => {
                    wizard.back();
                    continue 'steps;
                }
                Reply::Reset => {
                    wizard.reset();
                    continue 'steps;
                }
                Reply::Quit => return Ok(SessionEnd::Quit),
                Reply::Value(reply) if reply.is_empty() => {}
                Reply::Value(reply) => {
                    let value = if choices.is_empty() {
                        reply.as_str()
                    } else {
                        resolve_choice(&choices, &reply).unwrap_or(reply.as_str())
                    };
                    wizard.set_field(field, value)?;
                }
            }
        }

        match wizard.next()? {
            Advance::Blocked => {
                debug!(errors = wizard.errors().len(), "step has errors");
                for (field, error) in wizard.errors() {
                    writeln!(output, "  ! {}: {error}", F::label(field))?;
                }
            }
            Advance::Moved(_) | Advance::Completed(_) => {}
        }
    }
}
