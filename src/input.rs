/// Editable text with a cursor measured in characters, not bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when there is nothing but whitespace to submit
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor. Carriage returns are normalized away.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert_str(byte_pos, &text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Move to the start of the current line
    pub fn move_home(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    /// Move to the end of the current line
    pub fn move_end(&mut self) {
        let rest = self.value.chars().skip(self.cursor).take_while(|c| *c != '\n').count();
        self.cursor += rest;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Empty the buffer and hand back what was in it
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    /// Zero-based (line, column) of the cursor, both in characters
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.value.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> TextInput {
        let mut input = TextInput::new();
        input.insert_str(text);
        input
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = input("押金");
        input.move_left();
        input.insert('的');
        assert_eq!(input.value(), "押的金");
        input.backspace();
        assert_eq!(input.value(), "押金");
        assert_eq!(input.cursor(), 1);
        input.delete();
        assert_eq!(input.value(), "押");
    }

    #[test]
    fn test_blank_detection() {
        assert!(input("").is_blank());
        assert!(input("  \n\t ").is_blank());
        assert!(!input(" a ").is_blank());
    }

    #[test]
    fn test_take_resets() {
        let mut input = input("hello");
        assert_eq!(input.take(), "hello");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let input = input("a\r\nb\rc");
        assert_eq!(input.value(), "a\nb\nc");
        assert_eq!(input.cursor_line_col(), (2, 1));
    }

    #[test]
    fn test_home_end_are_line_aware() {
        let mut input = input("first\nsecond");
        input.move_home();
        assert_eq!(input.cursor_line_col(), (1, 0));
        input.move_end();
        assert_eq!(input.cursor_line_col(), (1, 6));
        for _ in 0..7 {
            input.move_left();
        }
        assert_eq!(input.cursor_line_col(), (0, 5));
        input.move_home();
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut input = input("ab");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.clear();
        input.move_left();
        input.backspace();
        assert_eq!(input.cursor(), 0);
    }
}
