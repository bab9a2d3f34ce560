//! Interactive credential collection
//!
//! Connection parameters are never taken from flags or the environment;
//! they are asked for on the terminal, the password without echo.

use crate::config::connections::{ConnectionConfig, DEFAULT_PORT};
use crate::error::{ConfigError, ConfigResult};
use std::io::{self, BufRead, Write};

/// Ask for host, username, password, port and database name, in that order.
///
/// `read_secret` receives the password prompt and must read the answer
/// without echoing it; `main` passes `rpassword::prompt_password`.
pub fn collect_credentials<R, W, P>(
    input: &mut R,
    output: &mut W,
    read_secret: P,
) -> ConfigResult<ConnectionConfig>
where
    R: BufRead,
    W: Write,
    P: FnOnce(&str) -> io::Result<String>,
{
    let host = ask_required(input, output, "Enter host name (e.g., localhost): ", "host")?;
    let username = ask_required(input, output, "Enter username: ", "username")?;

    let password = read_secret("Enter password: ")?;
    let password = (!password.is_empty()).then_some(password);

    let port = ask_port(input, output)?;
    let database = ask_required(input, output, "Enter database name: ", "database name")?;

    ConnectionConfig::new(&host, port, &username, password, &database)
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    field: &'static str,
) -> ConfigResult<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ConfigError::InputClosed(field));
    }
    Ok(line.trim().to_string())
}

/// Re-prompt until a non-empty answer arrives
fn ask_required<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    field: &'static str,
) -> ConfigResult<String> {
    loop {
        let answer = read_answer(input, output, prompt, field)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        writeln!(output, "A {} is required.", field)?;
    }
}

fn ask_port<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> ConfigResult<u16> {
    loop {
        let prompt = format!("Enter port (e.g., {}): ", DEFAULT_PORT);
        let answer = read_answer(input, output, &prompt, "port")?;
        match answer.parse::<u16>() {
            Ok(port) if port > 0 => return Ok(port),
            _ => writeln!(
                output,
                "Invalid port '{}': expected a number between 1 and 65535.",
                answer
            )?,
        }
    }
}
