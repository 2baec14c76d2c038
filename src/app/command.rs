//! Command parsing for the command line

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application: :q or :quit
    Quit,
    /// Show help: :help or :h
    Help,
    /// Back to level selection: :level
    Level,
    /// Pick another topic: :new
    New,
    /// Check answers: :submit
    Submit,
    /// Show the lesson tab: :lesson
    Lesson,
    /// Show the quiz tab: :quiz
    Quiz,
    /// Store the Anthropic API key: :key <api-key>
    Key(String),
    /// Forget the stored API key: :key-clear
    KeyClear,
    /// Set Claude model: :model <haiku|sonnet|opus>
    Model(String),
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "level" | "nivel" => ParseResult::Ok(Command::Level),
        "new" | "n" => ParseResult::Ok(Command::New),
        "submit" | "check" => ParseResult::Ok(Command::Submit),
        "lesson" => ParseResult::Ok(Command::Lesson),
        "quiz" => ParseResult::Ok(Command::Quiz),
        "key" => {
            if args.is_empty() {
                ParseResult::MissingArgument("key".to_string())
            } else {
                ParseResult::Ok(Command::Key(args.to_string()))
            }
        }
        "key-clear" => ParseResult::Ok(Command::KeyClear),
        "model" | "m" => {
            if args.is_empty() {
                ParseResult::MissingArgument("model".to_string())
            } else {
                ParseResult::Ok(Command::Model(args.to_string()))
            }
        }
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}
