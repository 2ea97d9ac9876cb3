//! # Fragment Extraction
//!
//! Collects the interiors of fenced blocks tagged `json` from a markdown
//! document, in document order.
//!
//! ## Matching Rules
//!
//! - A block opens at a line that is exactly ```` ```json ```` and closes at
//!   the next line that is exactly ```` ``` ````. Line terminators are not
//!   part of the comparison, so `\r\n` documents match too.
//! - The interior is captured verbatim, terminators included.
//! - Any other run of three or more backticks whose info string holds no
//!   backtick opens a block of another language. Its interior is skipped up
//!   to a line of at least as many backticks, so a JSON marker quoted inside
//!   it is never taken as an opener. A line like ```` ```x``` text ```` is an
//!   inline code span, not a fence.
//! - A JSON block still open at end of input is dropped with a warning.

use serde::Serialize;

/// Opening marker of a JSON fenced block.
pub const JSON_FENCE_OPEN: &str = "```json";
/// Closing marker of a JSON fenced block, and the shortest fence there is.
pub const FENCE_CLOSE: &str = "```";

/// One extracted schema fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Zero-based position among the fragments of the document.
    pub index: usize,
    /// 1-based line number of the opening fence.
    pub line: usize,
    /// Interior text, verbatim.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Searching,
    InJson { opened_at: usize },
    InOther { fence_len: usize },
}

/// Extract every JSON fragment from `text`.
///
/// Returns an empty vector when the document has no JSON blocks.
pub fn extract_fragments(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut state = ScanState::Searching;
    let mut buffer = String::new();

    for (line_no, raw) in text.split_inclusive('\n').enumerate() {
        let line_no = line_no + 1;
        let line = strip_terminator(raw);

        state = match state {
            ScanState::Searching => {
                if line == JSON_FENCE_OPEN {
                    buffer.clear();
                    ScanState::InJson { opened_at: line_no }
                } else if let Some(fence_len) = fence_opener(line) {
                    ScanState::InOther { fence_len }
                } else {
                    ScanState::Searching
                }
            }
            ScanState::InJson { opened_at } => {
                if line == FENCE_CLOSE {
                    fragments.push(Fragment {
                        index: fragments.len(),
                        line: opened_at,
                        text: std::mem::take(&mut buffer),
                    });
                    ScanState::Searching
                } else {
                    buffer.push_str(raw);
                    state
                }
            }
            ScanState::InOther { fence_len } => {
                if closes_fence(line, fence_len) {
                    ScanState::Searching
                } else {
                    state
                }
            }
        };
    }

    if let ScanState::InJson { opened_at } = state {
        tracing::warn!(line = opened_at, "unterminated json block dropped");
    }

    tracing::debug!(count = fragments.len(), "extracted schema fragments");
    fragments
}

/// Length of the backtick run opening a fence, or `None` when `line` is
/// not a fence opener.
fn fence_opener(line: &str) -> Option<usize> {
    let len = backtick_run(line);
    if len < FENCE_CLOSE.len() || line[len..].contains('`') {
        return None;
    }
    Some(len)
}

/// A closing fence is a run of at least `fence_len` backticks and nothing
/// else but trailing blanks.
fn closes_fence(line: &str, fence_len: usize) -> bool {
    let line = line.trim_end_matches([' ', '\t']);
    let len = backtick_run(line);
    len >= fence_len && len == line.len()
}

fn backtick_run(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b'`').count()
}

/// Strip a trailing `\n` or `\r\n`.
fn strip_terminator(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(fragments: &[Fragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn no_blocks_yields_empty() {
        assert!(extract_fragments("# Title\n\nJust prose.\n").is_empty());
        assert!(extract_fragments("").is_empty());
    }

    #[test]
    fn captures_interior_verbatim() {
        let md = "intro\n```json\n\"Clip\": {\n  \"type\": \"object\"\n}\n```\noutro\n";
        let fragments = extract_fragments(md);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "\"Clip\": {\n  \"type\": \"object\"\n}\n");
        assert_eq!(fragments[0].line, 2);
        assert_eq!(fragments[0].index, 0);
    }

    #[test]
    fn keeps_document_order() {
        let md = "```json\n\"A\": {}\n```\n\n```json\n\"B\": {}\n```\n```json\n\"C\": {}\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\n", "\"B\": {}\n", "\"C\": {}\n"]);
    }

    #[test]
    fn ignores_other_languages() {
        let md = "```python\nprint(1)\n```\n```json\n\"A\": {}\n```\n```\nplain\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\n"]);
    }

    #[test]
    fn json_marker_inside_other_block_is_not_an_opener() {
        let md = "```markdown\n```json\n\"Quoted\": {}\n```\n```json\n\"Real\": {}\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"Real\": {}\n"]);
    }

    #[test]
    fn marker_lines_must_match_exactly() {
        let md = " ```json\n\"Indented\": {}\n```\n```json \n\"Trailing\": {}\n```\n```JSON\n\"Upper\": {}\n```\n";
        // None of the openers are exact, so every block is skipped as another language
        // or left as prose.
        assert!(extract_fragments(md).is_empty());
    }

    #[test]
    fn inline_code_at_line_start_is_not_a_fence() {
        let md = "```inline``` code at line start\n\n```json\n\"A\": {}\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\n"]);
    }

    #[test]
    fn longer_fence_is_closed_only_by_a_long_enough_run() {
        let md = "````markdown\n```json\n\"Quoted\": {}\n```\n````\n\n```json\n\"Real\": {}\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"Real\": {}\n"]);
    }

    #[test]
    fn longer_closing_run_closes_a_short_fence() {
        let md = "```python\nprint(1)\n`````  \n```json\n\"A\": {}\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\n"]);
    }

    #[test]
    fn fence_helpers() {
        assert_eq!(fence_opener("```"), Some(3));
        assert_eq!(fence_opener("````markdown"), Some(4));
        assert_eq!(fence_opener("``not a fence"), None);
        assert_eq!(fence_opener("```x``` text"), None);
        assert!(closes_fence("````", 4));
        assert!(closes_fence("`````\t", 4));
        assert!(!closes_fence("```", 4));
        assert!(!closes_fence("```` trailing", 4));
    }

    #[test]
    fn fence_like_lines_inside_json_are_content() {
        let md = "```json\n\"A\": \"```text\"\n```python\n```\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": \"```text\"\n```python\n"]);
    }

    #[test]
    fn crlf_documents_match() {
        let md = "```json\r\n\"A\": {}\r\n```\r\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\r\n"]);
    }

    #[test]
    fn empty_block_is_an_empty_fragment() {
        let fragments = extract_fragments("```json\n```\n");
        assert_eq!(texts(&fragments), vec![""]);
    }

    #[test]
    fn unterminated_block_is_dropped() {
        let md = "```json\n\"A\": {}\n```\n```json\n\"Open\": {}\n";
        assert_eq!(texts(&extract_fragments(md)), vec!["\"A\": {}\n"]);
    }

    #[test]
    fn closing_fence_without_trailing_newline() {
        assert_eq!(texts(&extract_fragments("```json\n1\n```")), vec!["1\n"]);
    }

    #[derive(Debug, Clone)]
    enum Block {
        Json(String),
        Other(String, String),
        Quoted(String),
        Prose(String),
    }

    fn body() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-zA-Z0-9 :{}\"]{0,12}", 0..4)
            .prop_map(|lines| lines.iter().map(|l| format!("{l}\n")).collect())
    }

    fn block() -> impl Strategy<Value = Block> {
        prop_oneof![
            body().prop_map(Block::Json),
            (
                prop_oneof![Just("python"), Just("yaml"), Just("mermaid"), Just("")],
                body()
            )
                .prop_map(|(lang, b)| Block::Other(lang.to_string(), b)),
            body().prop_map(Block::Quoted),
            "[a-z ]{0,20}".prop_map(Block::Prose),
        ]
    }

    proptest! {
        #[test]
        fn extracts_exactly_the_json_blocks_in_order(blocks in proptest::collection::vec(block(), 0..12)) {
            let mut md = String::new();
            let mut expected = Vec::new();
            for b in &blocks {
                match b {
                    Block::Json(body) => {
                        md.push_str("```json\n");
                        md.push_str(body);
                        md.push_str("```\n");
                        expected.push(body.clone());
                    }
                    Block::Other(lang, body) => {
                        md.push_str(&format!("```{lang}\n"));
                        md.push_str(body);
                        md.push_str("```\n");
                    }
                    Block::Quoted(body) => {
                        md.push_str("````markdown\n```json\n");
                        md.push_str(body);
                        md.push_str("```\n````\n");
                    }
                    Block::Prose(text) => {
                        md.push_str(text);
                        md.push('\n');
                    }
                }
            }
            let fragments = extract_fragments(&md);
            let got: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();
            prop_assert_eq!(got, expected);
            for (i, f) in fragments.iter().enumerate() {
                prop_assert_eq!(f.index, i);
            }
        }
    }
}
