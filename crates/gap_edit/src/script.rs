use std::io::{self, Write};

use gap_buffer::GapBuffer;

/// A parsed edit script, ready to be replayed against a buffer.
#[derive(Debug, Default)]
pub struct Script {
    commands: Vec<(usize, Command)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(String),
    Move(Target),
    Left(usize),
    Right(usize),
    Delete(usize),
    Backspace(usize),
    Print,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Start,
    End,
    Index(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: &'static str },

    #[error("line {line}: invalid number `{arg}`")]
    InvalidNumber { line: usize, arg: String },

    #[error("line {line}: position {pos} is past the end of the buffer (length {len})")]
    OutOfBounds { line: usize, pos: usize, len: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Script {
    /// Parse a script, one command per line. Blank lines and lines starting
    /// with `#` are skipped.
    pub fn parse(src: &str) -> Result<Self, ScriptError> {
        let mut commands = vec![];

        for (i, line) in src.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim_start();

            if line.trim_end().is_empty() || line.starts_with('#') {
                continue;
            }

            commands.push((line_no, parse_command(line_no, line)?));
        }

        Ok(Self { commands })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every command to `buf` in order. `print` writes to `out`.
    pub fn run(&self, buf: &mut GapBuffer<char>, out: &mut impl Write) -> Result<(), ScriptError> {
        for (line, command) in &self.commands {
            log::debug!("line {line}: {command:?} at {}", buf.position());

            match command {
                Command::Insert(text) => buf.insert_str(text),

                Command::Move(target) => {
                    let pos = match *target {
                        Target::Start => 0,
                        Target::End => buf.len(),
                        Target::Index(pos) => pos,
                    };

                    if pos > buf.len() {
                        return Err(ScriptError::OutOfBounds {
                            line: *line,
                            pos,
                            len: buf.len(),
                        });
                    }

                    buf.set_position(pos);
                }

                Command::Left(n) => buf.set_position(buf.position().saturating_sub(*n)),

                Command::Right(n) => {
                    let pos = buf.position().saturating_add(*n).min(buf.len());
                    buf.set_position(pos);
                }

                Command::Delete(n) => {
                    let removed = (0..*n).map_while(|_| buf.remove()).count();
                    log::trace!("deleted {removed} chars");
                }

                Command::Backspace(n) => {
                    let removed = (0..*n).map_while(|_| buf.remove_before()).count();
                    log::trace!("backspaced {removed} chars");
                }

                Command::Print => writeln!(out, "{buf}")?,
            }
        }

        Ok(())
    }
}

fn parse_command(line_no: usize, line: &str) -> Result<Command, ScriptError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let arg = rest.trim();

    let command = match name {
        "insert" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    line: line_no,
                    command: "insert",
                });
            }
            Command::Insert(unescape(rest))
        }

        "move" => match arg {
            "" => {
                return Err(ScriptError::MissingArgument {
                    line: line_no,
                    command: "move",
                })
            }
            "start" => Command::Move(Target::Start),
            "end" => Command::Move(Target::End),
            _ => Command::Move(Target::Index(parse_count(line_no, arg)?)),
        },

        "left" => Command::Left(parse_count_or_one(line_no, arg)?),
        "right" => Command::Right(parse_count_or_one(line_no, arg)?),
        "delete" => Command::Delete(parse_count_or_one(line_no, arg)?),
        "backspace" => Command::Backspace(parse_count_or_one(line_no, arg)?),
        "print" => Command::Print,

        _ => {
            return Err(ScriptError::UnknownCommand {
                line: line_no,
                command: name.to_owned(),
            })
        }
    };

    Ok(command)
}

fn parse_count(line_no: usize, arg: &str) -> Result<usize, ScriptError> {
    arg.parse().map_err(|_| ScriptError::InvalidNumber {
        line: line_no,
        arg: arg.to_owned(),
    })
}

fn parse_count_or_one(line_no: usize, arg: &str) -> Result<usize, ScriptError> {
    if arg.is_empty() {
        Ok(1)
    } else {
        parse_count(line_no, arg)
    }
}

/// Decode `\n`, `\t` and `\\`. Anything else after a backslash is kept as is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
