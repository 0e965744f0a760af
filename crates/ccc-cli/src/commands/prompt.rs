use std::io::{self, BufRead, Write};

use ccc_core::errors::{CccError, ErrorInfo};

/// Writes `message`, then reads one trimmed line from `input`.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String, CccError> {
    write!(output, "{message}")
        .and_then(|_| output.flush())
        .map_err(|err| CccError::Io(ErrorInfo::new("ccc_cli.prompt", err.to_string())))?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| CccError::Io(ErrorInfo::new("ccc_cli.prompt", err.to_string())))?;
    if read == 0 {
        return Err(CccError::Io(
            ErrorInfo::new("ccc_cli.prompt", "standard input closed before an answer was given")
                .with_context("prompt", message.trim())
                .with_hint("pass the value as a command-line flag instead"),
        ));
    }
    Ok(line.trim().to_string())
}

/// Like [`ask`], parsing the answer as a number.
pub fn ask_f64<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<f64, CccError> {
    let answer = ask(input, output, message)?;
    answer.parse::<f64>().map_err(|err| {
        CccError::Parse(
            ErrorInfo::new("ccc_cli.prompt_number", err.to_string()).with_context("answer", answer),
        )
    })
}

/// Prompts on the terminal.
pub fn stdin_line(message: &str) -> Result<String, CccError> {
    ask(&mut io::stdin().lock(), &mut io::stdout(), message)
}

pub fn stdin_f64(message: &str) -> Result<f64, CccError> {
    ask_f64(&mut io::stdin().lock(), &mut io::stdout(), message)
}
