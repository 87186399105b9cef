//! Terminal commands
//!
//! One line of user input maps to one `UserCommand`. Row numbers are
//! 1-based as displayed; they are converted to 0-based indexes here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// `<from> -> <to>` (or `→`)
    Search { from: String, to: String },
    SetFrom(String),
    SetTo(String),
    /// Submit the form fields as they are
    SubmitForm,
    /// Toggle detail of the bus row at this index
    ToggleBus(usize),
    /// Re-run the history entry at this index
    SelectHistory(usize),
    ToggleLanguage,
    Help,
    Quit,
    Nothing,
    Unknown(String),
}

impl UserCommand {
    pub fn parse(line: &str) -> UserCommand {
        let line = line.trim();
        if line.is_empty() {
            return UserCommand::Nothing;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let (name, arg) = match rest.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (rest, ""),
            };
            return match name {
                "from" => UserCommand::SetFrom(arg.to_string()),
                "to" => UserCommand::SetTo(arg.to_string()),
                "search" | "find" => UserCommand::SubmitForm,
                "bus" => row_index(arg)
                    .map(UserCommand::ToggleBus)
                    .unwrap_or_else(|| UserCommand::Unknown(line.to_string())),
                "history" | "h" => row_index(arg)
                    .map(UserCommand::SelectHistory)
                    .unwrap_or_else(|| UserCommand::Unknown(line.to_string())),
                "lang" => UserCommand::ToggleLanguage,
                "help" | "?" => UserCommand::Help,
                "quit" | "exit" | "q" => UserCommand::Quit,
                _ => UserCommand::Unknown(line.to_string()),
            };
        }

        for separator in ["->", "→"] {
            if let Some((from, to)) = line.split_once(separator) {
                return UserCommand::Search {
                    from: from.trim().to_string(),
                    to: to.trim().to_string(),
                };
            }
        }
        UserCommand::Unknown(line.to_string())
    }
}

/// 1-based row number to 0-based index
fn row_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}
