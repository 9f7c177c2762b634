//! Line unfolding.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Lines;

/// Iterator over logical content lines.
///
/// A physical line starting with a space or tab continues the previous one;
/// it is spliced on with that single leading character removed. Unfolding
/// happens by peeking at the next physical line, so the input is read in one
/// pass. Both LF and CRLF endings are accepted.
pub struct LogicalLines<'a> {
    physical: Peekable<Lines<'a>>,
}

impl<'a> LogicalLines<'a> {
    pub fn new(text: &'a str) -> Self {
        LogicalLines {
            physical: text.lines().peekable(),
        }
    }
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Cow::Borrowed(self.physical.next()?);

        while let Some(&next) = self.physical.peek() {
            let Some(continuation) = strip_fold(next) else {
                break;
            };
            line.to_mut().push_str(continuation);
            self.physical.next();
        }

        Some(line)
    }
}

fn strip_fold(line: &str) -> Option<&str> {
    line.strip_prefix(' ').or_else(|| line.strip_prefix('\t'))
}
