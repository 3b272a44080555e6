use std::io::{self, BufRead, Write};

/// How the client talks back to the user: blocking notices and yes/no
/// confirmations for destructive actions.
pub trait Prompter {
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}

/// Prompts on stderr and reads answers from stdin.
pub struct TerminalPrompter {
    pub assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [y/N] ");
        io::stderr().flush().ok();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    )
}
