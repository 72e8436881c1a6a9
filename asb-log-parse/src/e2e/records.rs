use std::io::{BufRead, Lines};

use crate::error::Result;

fn leading_timestamp(line: &str) -> Option<u64> {
    regex!(r"^(\d+),")
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// Groups consecutive lines that share a leading timestamp into one record.
///
/// Yields `(timestamp, lines joined by '\n')` in file order. The first line
/// without a `<digits>,` prefix ends the scan; nothing after it is read.
pub struct EventRecords<R> {
    lines: Lines<R>,
    current: Option<(u64, Vec<String>)>,
    done: bool,
}

impl<R: BufRead> EventRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current: None,
            done: false,
        }
    }

    fn flush(&mut self) -> Option<Result<(u64, String)>> {
        self.current
            .take()
            .map(|(timestamp, lines)| Ok((timestamp, lines.join("\n"))))
    }
}

impl<R: BufRead> Iterator for EventRecords<R> {
    type Item = Result<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return self.flush();
                }
            };

            let Some(timestamp) = leading_timestamp(&line) else {
                self.done = true;
                return self.flush();
            };

            if let Some((current, lines)) = self.current.as_mut() {
                if *current == timestamp {
                    lines.push(line);
                    continue;
                }
            }
            if let Some((prev, lines)) = self.current.replace((timestamp, vec![line])) {
                return Some(Ok((prev, lines.join("\n"))));
            }
        }
    }
}
