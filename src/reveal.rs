//! Message reveal: rotating message sets and the typewriter effect.

/// Fixed list of message sets handed out in order, wrapping after the last.
#[derive(Clone, Debug)]
pub struct MessageCycle {
    sets: Vec<Vec<String>>,
    index: usize,
}

impl MessageCycle {
    pub fn new(sets: Vec<Vec<String>>) -> Self {
        Self { sets, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn next_set(&mut self) -> &[String] {
        if self.sets.is_empty() {
            return &[];
        }
        let current = self.index;
        self.index = (self.index + 1) % self.sets.len();
        &self.sets[current]
    }
}

/// Reveals a block of text a few characters per frame.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    /// Byte offset of every char boundary after the first, plus the end.
    boundaries: Vec<usize>,
    shown: usize,
    step: usize,
}

impl Typewriter {
    /// Types `lines` joined by newlines; the whole text always takes about 80 frames.
    pub fn new(lines: &[String]) -> Self {
        let text = lines.join("\n");
        let boundaries: Vec<usize> = text
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let step = (text.chars().count() / 80).max(1);
        Self {
            text,
            boundaries,
            shown: 0,
            step,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn chars_per_frame(&self) -> usize {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.boundaries.len()
    }

    /// Advances one frame and returns the visible prefix.
    pub fn tick(&mut self) -> &str {
        self.shown = (self.shown + self.step).min(self.boundaries.len());
        self.visible()
    }

    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn short_text_types_one_char_per_frame() {
        let mut tw = Typewriter::new(&lines(&["ab", "c"]));
        assert_eq!(tw.chars_per_frame(), 1);
        assert_eq!(tw.tick(), "a");
        assert_eq!(tw.tick(), "ab");
        assert_eq!(tw.tick(), "ab\n");
        assert_eq!(tw.tick(), "ab\nc");
        assert!(tw.is_done());
        assert_eq!(tw.tick(), "ab\nc");
    }

    #[test]
    fn never_splits_multibyte_chars() {
        let mut tw = Typewriter::new(&lines(&["cœur ❤️ à"]));
        while !tw.is_done() {
            let shown = tw.tick().to_string();
            assert!(tw.full_text().starts_with(&shown));
        }
        assert_eq!(tw.visible(), "cœur ❤️ à");
    }

    #[test]
    fn long_text_takes_bigger_steps() {
        let long = "x".repeat(400);
        let mut tw = Typewriter::new(&[long]);
        assert_eq!(tw.chars_per_frame(), 5);
        assert_eq!(tw.tick().len(), 5);
    }

    #[test]
    fn empty_cycle_yields_nothing() {
        let mut cycle = MessageCycle::new(Vec::new());
        assert!(cycle.next_set().is_empty());
    }
}
