//! Edit scripts: one command per line, applied to a sheet in order.
//!
//! ```text
//! # comment
//! set A1 5
//! set B1 =A1+3
//! get B1
//! clear A1
//! values
//! ```

use std::io::{BufRead, Write};

use cellweave_core::{Position, Sheet, SheetError};

use crate::error::{CliError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
    Get(Position),
    Deps(Position),
    Size,
    Values,
    Texts,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<std::result::Result<Command, String>> {
    let line = line.trim_end_matches('\r').trim_start();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    Some(parse_command(word, rest))
}

fn parse_command(word: &str, rest: &str) -> std::result::Result<Command, String> {
    match word {
        "set" => {
            // Everything after the single separating space is cell text.
            let (cell, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Ok(Command::Set(parse_position(cell)?, text.to_string()))
        }
        "clear" => Ok(Command::Clear(parse_position(rest.trim())?)),
        "get" => Ok(Command::Get(parse_position(rest.trim())?)),
        "deps" => Ok(Command::Deps(parse_position(rest.trim())?)),
        "size" => no_args(word, rest, Command::Size),
        "values" => no_args(word, rest, Command::Values),
        "texts" => no_args(word, rest, Command::Texts),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn no_args(word: &str, rest: &str, command: Command) -> std::result::Result<Command, String> {
    if rest.trim().is_empty() {
        Ok(command)
    } else {
        Err(format!("'{}' takes no arguments", word))
    }
}

fn parse_position(name: &str) -> std::result::Result<Position, String> {
    name.parse::<Position>().map_err(|e| e.to_string())
}

/// Apply a single command from script line `line`, writing any output to
/// `out`.
pub fn apply<W: Write>(
    sheet: &mut Sheet,
    command: Command,
    line: usize,
    out: &mut W,
) -> Result<()> {
    let sheet_err = |source: SheetError| CliError::Sheet { line, source };

    match command {
        Command::Set(pos, text) => sheet.set_cell(pos, &text).map_err(sheet_err)?,
        Command::Clear(pos) => sheet.clear_cell(pos).map_err(sheet_err)?,
        Command::Get(pos) => match sheet.cell(pos).map_err(sheet_err)? {
            Some(cell) => writeln!(
                out,
                "{}\t{}\t{}",
                cell.position(),
                cell.value(),
                cell.text()
            )?,
            None => writeln!(out, "{}\t", pos)?,
        },
        Command::Deps(pos) => {
            let refs: Vec<String> = match sheet.cell(pos).map_err(sheet_err)? {
                Some(cell) => cell.referenced_cells().iter().map(|p| p.to_string()).collect(),
                None => Vec::new(),
            };
            let deps: Vec<String> = sheet
                .dependents_of(pos)
                .map_err(sheet_err)?
                .iter()
                .map(|p| p.to_string())
                .collect();
            writeln!(
                out,
                "{}\treferences={}\tdependents={}",
                pos,
                refs.join(","),
                deps.join(",")
            )?;
        }
        Command::Size => {
            let size = sheet.printable_size();
            writeln!(out, "{}\t{}", size.rows, size.cols)?;
        }
        Command::Values => sheet.print_values(out)?,
        Command::Texts => sheet.print_texts(out)?,
    }
    Ok(())
}

/// Run every line of `input` against `sheet`.
///
/// With `keep_going`, failing lines are reported to `errors` and skipped;
/// otherwise the first failure is returned. Returns the number of failed
/// lines.
pub fn run_script<R, W, E>(
    sheet: &mut Sheet,
    input: R,
    out: &mut W,
    errors: &mut E,
    keep_going: bool,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut failures = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let outcome = match parse_line(&line) {
            None => continue,
            Some(Err(message)) => Err(CliError::Parse {
                line: number,
                message,
            }),
            Some(Ok(command)) => apply(sheet, command, number, out),
        };

        if let Err(err) = outcome {
            if !keep_going || matches!(err, CliError::Io(_)) {
                return Err(err);
            }
            failures += 1;
            writeln!(errors, "Error: {}", err)?;
        }
    }
    Ok(failures)
}
