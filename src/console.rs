//! Line-oriented, append-only error log shown to the user.

/// Receives one line per shader diagnostic.
pub trait ErrorSink {
    fn append(&mut self, line: &str);
}

impl ErrorSink for Vec<String> {
    fn append(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

