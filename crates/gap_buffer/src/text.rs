use std::fmt::{self, Write};

use crate::GapBuffer;

impl GapBuffer<char> {
    /// Insert the characters of `s` at the cursor.
    #[inline]
    pub fn insert_str(&mut self, s: &str) {
        self.insert_iter(s.chars());
    }
}

impl From<&str> for GapBuffer<char> {
    #[inline]
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl fmt::Display for GapBuffer<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|&ch| f.write_char(ch))
    }
}

#[cfg(test)]
mod tests {
    use crate::GapBuffer;

    #[test]
    fn insert_str() {
        let mut buf = GapBuffer::from("Lord of the Rings");
        buf.set_position(12);
        buf.insert_str("Onion ");

        assert_eq!(buf.to_string(), "Lord of the Onion Rings");
        assert_eq!(buf.position(), 18);
    }

    #[test]
    fn multibyte() {
        let mut buf = GapBuffer::from("héllo");
        buf.set_position(2);
        assert_eq!(buf.remove_before(), Some('é'));
        buf.insert_str("€");

        assert_eq!(buf.len(), 5);
        assert_eq!(buf.to_string(), "h€llo");
    }

    #[test]
    fn display_empty() {
        assert_eq!(GapBuffer::<char>::new().to_string(), "");
    }
}
