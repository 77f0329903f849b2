//! X12 delimiter handling and tokenization
//!
//! X12 has no release character: the terminator and separator must never
//! occur inside element data.

/// Default X12 delimiters
pub const DEFAULT_SEGMENT_TERMINATOR: char = '~';
pub const DEFAULT_ELEMENT_SEPARATOR: char = '*';

/// Delimiters used for tokenizing and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    /// Segment terminator (default '~')
    pub segment: char,
    /// Element separator (default '*')
    pub element: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            segment: DEFAULT_SEGMENT_TERMINATOR,
            element: DEFAULT_ELEMENT_SEPARATOR,
        }
    }
}

impl Separators {
    pub fn new(segment: char, element: char) -> Self {
        Self { segment, element }
    }

    /// Whether a character is one of the delimiters
    pub fn is_special(&self, c: char) -> bool {
        c == self.segment || c == self.element
    }

    /// Join a tag and its rendered elements into one terminated segment
    pub fn render(&self, tag: &str, elements: &[String], new_line: bool) -> String {
        let mut out = String::from(tag);
        for element in elements {
            out.push(self.element);
            out.push_str(element);
        }
        out.push(self.segment);
        if new_line {
            out.push('\n');
        }
        out
    }
}

/// One tokenized segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based ordinal of the segment in the input
    pub position: usize,
    /// Tag followed by the data elements
    pub elements: Vec<String>,
}

impl Segment {
    /// Segment tag (first element)
    pub fn tag(&self) -> &str {
        self.elements.first().map_or("", String::as_str)
    }

    /// Data elements after the tag
    pub fn values(&self) -> &[String] {
        self.elements.get(1..).unwrap_or(&[])
    }
}

/// Split raw interchange text into segments
///
/// Line breaks are stripped first unless one of them is itself a
/// delimiter. Text after the final terminator that holds nothing but
/// whitespace is dropped.
pub fn tokenize(input: &str, separators: Separators) -> Vec<Segment> {
    let cleaned: String = input
        .chars()
        .filter(|&c| !matches!(c, '\r' | '\n') || separators.is_special(c))
        .collect();

    let mut raw: Vec<&str> = cleaned.split(separators.segment).collect();
    while raw.last().is_some_and(|last| last.trim().is_empty()) {
        raw.pop();
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, text)| Segment {
            position: i + 1,
            elements: text.split(separators.element).map(String::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(Segment::tag).collect()
    }

    #[test]
    fn test_default_separators() {
        let sep = Separators::default();
        assert_eq!(sep.segment, '~');
        assert_eq!(sep.element, '*');
        assert!(sep.is_special('~'));
        assert!(!sep.is_special(':'));
    }

    #[test]
    fn test_tokenize_segments_and_elements() {
        let segments = tokenize("ST*850*0001~BEG*00*NE*PONUM~", Separators::default());
        assert_eq!(tags(&segments), vec!["ST", "BEG"]);
        assert_eq!(segments[1].values(), ["00", "NE", "PONUM"]);
        assert_eq!(segments[0].position, 1);
        assert_eq!(segments[1].position, 2);
    }

    #[test]
    fn test_line_breaks_stripped() {
        let segments = tokenize("ST*850*0001~\r\nBEG*00*\nNE~\n", Separators::default());
        assert_eq!(tags(&segments), vec!["ST", "BEG"]);
        assert_eq!(segments[1].values(), ["00", "NE"]);
    }

    #[test]
    fn test_trailing_text_dropped() {
        let segments = tokenize("ST*850~  ~ ", Separators::default());
        assert_eq!(tags(&segments), vec!["ST"]);
    }

    #[test]
    fn test_interior_empty_segment_kept() {
        let segments = tokenize("ST*850~~SE*2~", Separators::default());
        assert_eq!(tags(&segments), vec!["ST", "", "SE"]);
    }

    #[test]
    fn test_missing_final_terminator() {
        let segments = tokenize("ST*850~SE*2", Separators::default());
        assert_eq!(tags(&segments), vec!["ST", "SE"]);
        assert_eq!(segments[1].values(), ["2"]);
    }

    #[test]
    fn test_empty_elements_preserved() {
        let segments = tokenize("REF*IA**X*~", Separators::default());
        assert_eq!(segments[0].values(), ["IA", "", "X", ""]);
    }

    #[test]
    fn test_custom_separators() {
        let segments = tokenize("ST|850'BEG|00'", Separators::new('\'', '|'));
        assert_eq!(tags(&segments), vec!["ST", "BEG"]);
        assert_eq!(segments[0].values(), ["850"]);
    }

    #[test]
    fn test_newline_terminator_survives() {
        let segments = tokenize("ST*850\nBEG*00\n", Separators::new('\n', '*'));
        assert_eq!(tags(&segments), vec!["ST", "BEG"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", Separators::default()).is_empty());
        assert!(tokenize("\r\n", Separators::default()).is_empty());
    }

    #[test]
    fn test_render() {
        let sep = Separators::default();
        let elements = vec!["850".to_string(), "0001".to_string()];
        assert_eq!(sep.render("ST", &elements, false), "ST*850*0001~");
        assert_eq!(sep.render("ST", &elements, true), "ST*850*0001~\n");
        assert_eq!(sep.render("SE", &[], false), "SE~");
    }
}
