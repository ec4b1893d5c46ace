//! Interactive line prompts
//!
//! Each prompt has a `_with` variant taking explicit input and output
//! streams; the plain versions use stdin/stdout.

use std::io::{self, BufRead, Write};

use crate::error::{KeyvaultError, KeyvaultResult};

/// Ask a yes/no question; anything but `y`/`yes` is a no
pub fn confirm(message: &str) -> KeyvaultResult<bool> {
    confirm_with(&mut io::stdin().lock(), &mut io::stdout(), message)
}

pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> KeyvaultResult<bool> {
    let answer = read_answer(input, output, &format!("{} (y/N): ", message))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Choose one item from a numbered list
///
/// A single item is chosen without asking. Invalid answers are re-asked;
/// end of input aborts.
pub fn select<'a, T>(
    title: &str,
    items: &'a [T],
    label: impl Fn(&T) -> String,
) -> KeyvaultResult<&'a T> {
    select_with(&mut io::stdin().lock(), &mut io::stdout(), title, items, label)
}

pub fn select_with<'a, T, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
    items: &'a [T],
    label: impl Fn(&T) -> String,
) -> KeyvaultResult<&'a T> {
    match items {
        [] => {
            return Err(KeyvaultError::Validation(format!(
                "Nothing to choose from: {}",
                title
            )))
        }
        [only] => return Ok(only),
        _ => {}
    }

    writeln!(output, "{}", title)?;
    for (index, item) in items.iter().enumerate() {
        writeln!(output, "  {}. {}", index + 1, label(item))?;
    }

    loop {
        let answer = read_answer(input, output, &format!("Enter a number (1-{}): ", items.len()))?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(&items[n - 1]),
            _ => writeln!(output, "Please enter a number between 1 and {}.", items.len())?,
        }
    }
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> KeyvaultResult<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(KeyvaultError::Aborted);
    }
    Ok(line.trim().to_string())
}
