use std::str::Chars;

use crate::error::{ParseError, Position};

/// Sequential character reader with line/column tracking and a single
/// character of pushback.
pub struct Source<'a> {
    chars: Chars<'a>,
    line: usize,
    column: usize,
    /// The most recently returned character (`None` at end of input) and its
    /// position.
    last: Option<(Option<char>, Position)>,
    pushed_back: bool,
}

impl<'a> Source<'a> {
    pub fn new(input: &'a str) -> Self {
        Source {
            chars: input.chars(),
            line: 1,
            column: 0,
            last: None,
            pushed_back: false,
        }
    }

    /// Return the next character, or `None` once the input is exhausted.
    pub fn get(&mut self) -> Option<char> {
        if self.pushed_back {
            self.pushed_back = false;
            return self.last.and_then(|(ch, _)| ch);
        }

        let ch = self.chars.next();
        let pos = match ch {
            Some(c) => {
                self.column += 1;
                let pos = Position::new(self.line, self.column);
                if c == '\n' {
                    self.line += 1;
                    self.column = 0;
                }
                pos
            }
            None => Position::new(self.line, self.column + 1),
        };
        self.last = Some((ch, pos));
        ch
    }

    /// Push the most recently returned character back so that the next
    /// [`get`](Source::get) returns it again.
    pub fn unget(&mut self) -> Result<(), ParseError> {
        if self.pushed_back {
            return Err(ParseError::Internal {
                message: "character pushback is already occupied",
                pos: self.position(),
            });
        }
        if self.last.is_none() {
            return Err(ParseError::Internal {
                message: "no character to push back",
                pos: self.position(),
            });
        }
        self.pushed_back = true;
        Ok(())
    }

    /// Consume spaces, tabs, carriage returns and newlines.
    pub fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            match self.get() {
                Some(' ' | '\t' | '\r' | '\n') => continue,
                _ => return self.unget(),
            }
        }
    }

    /// Consume the next character if it equals `expected`.
    pub fn expect(&mut self, expected: char) -> Result<bool, ParseError> {
        if self.get() == Some(expected) {
            Ok(true)
        } else {
            self.unget()?;
            Ok(false)
        }
    }

    /// Position of the most recently returned character.
    pub fn position(&self) -> Position {
        match self.last {
            Some((_, pos)) => pos,
            None => Position::new(self.line, self.column + 1),
        }
    }

    /// Current line counter.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current column counter; 0 right after a newline.
    pub fn column(&self) -> usize {
        self.column
    }
}
