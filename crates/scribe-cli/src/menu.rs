//! Numbered command menu over a [`TextBuffer`].
//!
//! Reads one answer per line from any [`BufRead`] and writes prompts and
//! results to any [`Write`], so sessions can be scripted in tests. Edit
//! failures are printed and the loop continues; only I/O errors on the
//! streams end it early.

use std::io::{BufRead, Write};

use scribe_core::TextBuffer;

use crate::error::Result;

/// ANSI "erase display" followed by "cursor home".
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Append,
    NewLine,
    Save,
    Load,
    Print,
    Find,
    Insert,
    Clear,
    Undo,
    Redo,
    Delete,
    Cut,
    Copy,
    Paste,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::Exit,
        Command::Append,
        Command::NewLine,
        Command::Save,
        Command::Load,
        Command::Print,
        Command::Find,
        Command::Insert,
        Command::Clear,
        Command::Undo,
        Command::Redo,
        Command::Delete,
        Command::Cut,
        Command::Copy,
        Command::Paste,
    ];

    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn number(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Exit => "Exit",
            Self::Append => "Append text",
            Self::NewLine => "Start new line",
            Self::Save => "Save as file",
            Self::Load => "Load file",
            Self::Print => "Print current saved text",
            Self::Find => "Find text",
            Self::Insert => "Insert text at position",
            Self::Clear => "Clear console",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Delete => "Delete text",
            Self::Cut => "Cut text",
            Self::Copy => "Copy text",
            Self::Paste => "Paste text",
        }
    }
}

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Menu<R, W> {
    buffer: TextBuffer,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(buffer: TextBuffer, input: R, output: W) -> Self {
        Self {
            buffer,
            input,
            output,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn into_parts(self) -> (TextBuffer, R, W) {
        (self.buffer, self.input, self.output)
    }

    /// Run until command 0 or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display()?;
            let Some(line) = self.read_line()? else {
                tracing::debug!("menu.eof");
                return Ok(());
            };
            let Some(command) = Command::from_choice(&line) else {
                writeln!(self.output, "Invalid command")?;
                continue;
            };
            tracing::debug!(?command, "menu.command");
            if self.dispatch(command)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn display(&mut self) -> Result<()> {
        writeln!(self.output, "Choose the command:")?;
        for command in Command::ALL.iter().skip(1).chain(Command::ALL.first()) {
            writeln!(self.output, "{}. {}", command.number(), command.label())?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Exit => return Ok(Flow::Quit),
            Command::Append => {
                let Some(text) = self.prompt("Enter text to append:")? else {
                    return Ok(Flow::Quit);
                };
                self.buffer.append(text);
            }
            Command::NewLine => self.buffer.append("\n"),
            Command::Save => {
                let Some(path) = self.prompt("Enter the filename to save:")? else {
                    return Ok(Flow::Quit);
                };
                match self.buffer.save_to_file(&path) {
                    Ok(()) => writeln!(self.output, "Saved to {path}")?,
                    Err(err) => writeln!(self.output, "Failed to save to {path}: {err}")?,
                }
            }
            Command::Load => {
                let Some(path) = self.prompt("Enter the filename to load:")? else {
                    return Ok(Flow::Quit);
                };
                match self.buffer.load_from_file(&path) {
                    Ok(()) => writeln!(self.output, "Loaded from {path}")?,
                    Err(err) => writeln!(self.output, "Failed to load from {path}: {err}")?,
                }
            }
            Command::Print => {
                writeln!(self.output, "Current saved text:")?;
                writeln!(self.output, "{}", self.buffer.text_lossy())?;
            }
            Command::Find => {
                let Some(needle) = self.prompt("Enter the text to find:")? else {
                    return Ok(Flow::Quit);
                };
                match self.buffer.find_text(&needle) {
                    Some(pos) => writeln!(self.output, "Found text at position {pos}")?,
                    None => writeln!(self.output, "Text not found.")?,
                }
            }
            Command::Insert => return self.insert(),
            Command::Clear => write!(self.output, "{CLEAR_SCREEN}")?,
            Command::Undo => {
                if self.buffer.undo().is_err() {
                    writeln!(self.output, "Cannot undo further.")?;
                }
            }
            Command::Redo => {
                if self.buffer.redo().is_err() {
                    writeln!(self.output, "Cannot redo further.")?;
                }
            }
            Command::Delete | Command::Cut | Command::Copy => return self.span_command(command),
            Command::Paste => {
                let Some(answer) = self.prompt("Enter the position to paste:")? else {
                    return Ok(Flow::Quit);
                };
                let Some([pos]) = parse_numbers::<1>(&answer) else {
                    writeln!(self.output, "Invalid number.")?;
                    return Ok(Flow::Continue);
                };
                if self.buffer.paste_text(pos).is_err() {
                    writeln!(self.output, "Invalid position.")?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn insert(&mut self) -> Result<Flow> {
        let Some(pos) = self.prompt("Enter the position to insert text:")? else {
            return Ok(Flow::Quit);
        };
        let Some(text) = self.prompt("Enter the text to insert:")? else {
            return Ok(Flow::Quit);
        };
        let Some(replace) = self.prompt(
            "Enter the number of characters to replace at the insertion point (0 for none):",
        )?
        else {
            return Ok(Flow::Quit);
        };

        let (Some([pos]), Some([replace])) = (parse_numbers::<1>(&pos), parse_numbers::<1>(&replace))
        else {
            writeln!(self.output, "Invalid number.")?;
            return Ok(Flow::Continue);
        };
        if let Err(err) = self.buffer.insert_and_replace(pos, text, replace) {
            writeln!(self.output, "{err}")?;
        }
        Ok(Flow::Continue)
    }

    fn span_command(&mut self, command: Command) -> Result<Flow> {
        let verb = match command {
            Command::Delete => "delete",
            Command::Cut => "cut",
            _ => "copy",
        };
        let prompt = format!("Enter the starting position and length to {verb}:");
        let Some(answer) = self.prompt(&prompt)? else {
            return Ok(Flow::Quit);
        };
        let Some([pos, len]) = parse_numbers::<2>(&answer) else {
            writeln!(self.output, "Invalid number.")?;
            return Ok(Flow::Continue);
        };

        let result = match command {
            Command::Delete => self.buffer.delete_text(pos, len),
            Command::Cut => self.buffer.cut_text(pos, len),
            _ => self.buffer.copy_text(pos, len),
        };
        if result.is_err() {
            writeln!(self.output, "Invalid position or length.")?;
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Next input line without its line ending, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Parse exactly `N` whitespace-separated unsigned integers.
fn parse_numbers<const N: usize>(line: &str) -> Option<[usize; N]> {
    let mut values = [0usize; N];
    let mut parts = line.split_whitespace();
    for slot in &mut values {
        *slot = parts.next()?.parse().ok()?;
    }
    parts.next().is_none().then_some(values)
}
