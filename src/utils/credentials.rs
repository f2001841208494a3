use std::io::{self, BufRead, Write};
use log::info;
use crate::config::Config;
use crate::models::Credentials;

// Source of interactively entered credentials.
pub trait Prompt {
    fn username(&mut self) -> io::Result<String>;
    fn password(&mut self) -> io::Result<String>;
}

// Reads the username from stdin with echo and the password from the terminal without echo.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn username(&mut self) -> io::Result<String> {
        print!("Enter StudentVUE Username: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no username entered"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn password(&mut self) -> io::Result<String> {
        rpassword::prompt_password("Enter StudentVUE Password: ")
    }
}

// Returns the configured credentials when both are set, otherwise asks for them.
pub fn acquire<P: Prompt>(config: &Config, prompt: &mut P) -> io::Result<Credentials> {
    let configured = config.username.as_deref().filter(|u| !u.is_empty())
        .zip(config.password.as_deref().filter(|p| !p.is_empty()));

    if let Some((username, password)) = configured {
        info!("Credentials successfully loaded from the environment");
        return Ok(Credentials::new(username, password));
    }

    info!("No credentials configured, please provide them");
    let username = prompt.username()?;
    let password = prompt.password()?;
    Ok(Credentials::new(username, password))
}
