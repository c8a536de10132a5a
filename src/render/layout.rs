use super::metrics::text_width;
use super::{MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use lopdf::Object;
use lopdf::content::{Content, Operation};

pub(super) const REGULAR_FONT: &str = "F1";
pub(super) const BOLD_FONT: &str = "F2";

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Horizontal placement of a line.
#[derive(Debug, Clone, Copy)]
pub(super) enum Align {
    Left,
    Center,
}

/// Font, size, spacing and fill color for a run of text.
#[derive(Debug, Clone, Copy)]
pub(super) struct TextStyle {
    pub(super) bold: bool,
    pub(super) size: f32,
    pub(super) leading: f32,
    pub(super) color: [u8; 3],
}

/// Top-down flow layout that starts a new page whenever the cursor would cross the bottom margin.
pub(super) struct PageLayout {
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl PageLayout {
    pub(super) fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Lay out `text` as one paragraph, wrapping on word boundaries.
    pub(super) fn paragraph(&mut self, text: &str, style: &TextStyle, align: Align) {
        for line in wrap(text, style, CONTENT_WIDTH) {
            self.line(&line, style, align);
        }
    }

    /// Advance the cursor by `amount` points of vertical whitespace.
    pub(super) fn space(&mut self, amount: f32) {
        self.cursor -= amount;
    }

    /// Draw a full-width horizontal rule.
    pub(super) fn rule(&mut self, color: [u8; 3], thickness: f32) {
        self.reserve(thickness);
        self.cursor -= thickness;
        let [r, g, b] = color;
        let y = self.cursor;
        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![channel(r), channel(g), channel(b)]),
            Operation::new("w", vec![thickness.into()]),
            Operation::new("m", vec![MARGIN.into(), y.into()]),
            Operation::new("l", vec![(PAGE_WIDTH - MARGIN).into(), y.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub(super) fn finish(mut self) -> Vec<Content> {
        self.finished.push(self.current);
        self.finished
            .into_iter()
            .map(|operations| Content { operations })
            .collect()
    }

    fn line(&mut self, text: &str, style: &TextStyle, align: Align) {
        self.reserve(style.leading);
        self.cursor -= style.leading;
        if text.is_empty() {
            return;
        }

        let width = text_width(text, style.size, style.bold);
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => ((PAGE_WIDTH - width) / 2.0).max(MARGIN),
        };
        let baseline = self.cursor + (style.leading - style.size) / 2.0;
        let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };
        let [r, g, b] = style.color;

        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![channel(r), channel(g), channel(b)]),
            Operation::new("Tf", vec![font.into(), style.size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn reserve(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            let page = std::mem::take(&mut self.current);
            self.finished.push(page);
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
    }
}

fn channel(value: u8) -> Object {
    (f32::from(value) / 255.0).into()
}

/// Greedy word wrap. A blank input yields a single empty line so it still occupies vertical space.
fn wrap(text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width(candidate, style.size, style.bold) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            current.push(ch);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode `text` for a WinAnsiEncoding font; unmappable characters become `?`.
pub(super) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            ' '..='~' | '\u{a0}'..='\u{ff}' => ch as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: TextStyle = TextStyle {
        bold: false,
        size: 10.0,
        leading: 12.0,
        color: [0, 0, 0],
    };

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("two words", &STYLE, 500.0), vec!["two words"]);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap("aaaa bbbb cccc", &STYLE, 50.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn wrap_splits_words_wider_than_the_line() {
        let lines = wrap("mmmmmmmmmm", &STYLE, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "mmmmmmmmmm");
    }

    #[test]
    fn blank_text_occupies_one_line() {
        assert_eq!(wrap("", &STYLE, 100.0), vec![String::new()]);
    }

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("città"), vec![b'c', b'i', b't', b't', 0xe0]);
        assert_eq!(encode_win_ansi("“ok”"), vec![0x93, b'o', b'k', 0x94]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
