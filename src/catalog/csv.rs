//! Minimal CSV record reader.
//!
//! Handles double-quoted fields with embedded separators, newlines and `""`
//! escapes. A record that cannot be parsed is reported as `Malformed` and the
//! reader resynchronises at the line after the one where the record started.

/// One parsed line (or multi-line quoted record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Record {
    Fields(Vec<String>),
    Malformed { line: usize, reason: &'static str },
}

/// Iterator over the records of a CSV document.
pub(crate) struct Records<'a> {
    lines: Vec<&'a str>,
    next_line: usize,
}

impl<'a> Records<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().collect(),
            next_line: 0,
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        // Skip blank lines between records.
        let start = loop {
            let index = self.next_line;
            let line = self.lines.get(index)?;
            self.next_line += 1;
            if !line.trim().is_empty() {
                break index;
            }
        };
        let line_no = start + 1;

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::FieldStart;
        let mut line = self.lines[start];

        loop {
            for c in line.chars() {
                match state {
                    State::FieldStart => match c {
                        '"' => state = State::Quoted,
                        ',' => fields.push(std::mem::take(&mut field)),
                        _ => {
                            field.push(c);
                            state = State::Unquoted;
                        }
                    },
                    State::Unquoted => match c {
                        ',' => {
                            fields.push(std::mem::take(&mut field));
                            state = State::FieldStart;
                        }
                        '"' => {
                            return Some(Record::Malformed {
                                line: line_no,
                                reason: "quote inside unquoted field",
                            })
                        }
                        _ => field.push(c),
                    },
                    State::Quoted => match c {
                        '"' => state = State::QuoteInQuoted,
                        _ => field.push(c),
                    },
                    State::QuoteInQuoted => match c {
                        '"' => {
                            field.push('"');
                            state = State::Quoted;
                        }
                        ',' => {
                            fields.push(std::mem::take(&mut field));
                            state = State::FieldStart;
                        }
                        _ => {
                            return Some(Record::Malformed {
                                line: line_no,
                                reason: "text after closing quote",
                            })
                        }
                    },
                }
            }

            if !matches!(state, State::Quoted) {
                break;
            }

            // Open quote: the field continues on the next physical line.
            match self.lines.get(self.next_line) {
                Some(&next) => {
                    self.next_line += 1;
                    field.push('\n');
                    line = next;
                }
                None => {
                    // Only the opening line is lost; rescan what followed it.
                    self.next_line = start + 1;
                    return Some(Record::Malformed {
                        line: line_no,
                        reason: "unterminated quoted field",
                    });
                }
            }
        }

        fields.push(field);
        Some(Record::Fields(fields))
    }
}
