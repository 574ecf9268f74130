//! Assembly source line parser for instructions and labels.
//!
//! Parsing is the infallible front of the pipeline: it strips comments,
//! discards blank lines, and classifies what remains into labels and raw
//! instruction tokens. Mnemonic and operand validity are checked later,
//! during expansion and encoding, where the opcode table is in scope.

/// A raw instruction line: a mnemonic plus its operand tokens, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The mnemonic as written (case preserved).
    pub mnemonic: String,
    /// Whitespace-separated operand tokens following the mnemonic.
    pub operands: Vec<String>,
}

/// A classified source line.
///
/// A line may carry a label, an instruction, both (`loop: JMP loop`), or
/// neither (blank or comment-only).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// Label declared on this line, if any.
    pub label: Option<String>,
    /// Instruction on this line, if any.
    pub instruction: Option<Instruction>,
}

impl ParsedLine {
    /// Whether the line carries neither a label nor an instruction.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.label.is_none() && self.instruction.is_none()
    }
}

/// Parses one source line into its label and instruction parts.
#[must_use]
pub fn parse_line(line: &str) -> ParsedLine {
    let stripped = strip_comment(line);
    let mut rest = stripped.trim();

    let mut parsed = ParsedLine::default();

    if let Some((label, after)) = split_label(rest) {
        parsed.label = Some(label);
        rest = after.trim();
    }

    let mut tokens = rest.split_whitespace().map(str::to_string);
    if let Some(mnemonic) = tokens.next() {
        parsed.instruction = Some(Instruction {
            mnemonic,
            operands: tokens.collect(),
        });
    }

    parsed
}

/// Parses a complete source listing, pairing each non-blank line with its
/// 1-indexed line number.
#[must_use]
pub fn parse_source(source: &str) -> Vec<(usize, ParsedLine)> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, parse_line(line)))
        .filter(|(_, parsed)| !parsed.is_blank())
        .collect()
}

fn strip_comment(line: &str) -> &str {
    line.find(';').map_or(line, |pos| &line[..pos])
}

fn split_label(text: &str) -> Option<(String, &str)> {
    let colon_pos = text.find(':')?;
    let label = text[..colon_pos].trim();
    is_valid_label(label).then(|| (label.to_string(), &text[colon_pos + 1..]))
}

fn is_valid_label(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_parse_as_blank() {
        assert!(parse_line("").is_blank());
        assert!(parse_line("   ").is_blank());
        assert!(parse_line("; just a comment").is_blank());
    }

    #[test]
    fn instruction_with_operand() {
        let parsed = parse_line("LOAD 0A");
        assert_eq!(parsed.label, None);
        assert_eq!(
            parsed.instruction,
            Some(Instruction {
                mnemonic: "LOAD".into(),
                operands: vec!["0A".into()],
            })
        );
    }

    #[test]
    fn instruction_without_operand() {
        let parsed = parse_line("NOP");
        let instruction = parsed.instruction.unwrap();
        assert_eq!(instruction.mnemonic, "NOP");
        assert!(instruction.operands.is_empty());
    }

    #[test]
    fn multiple_operand_tokens_are_preserved() {
        let parsed = parse_line("PUSH 12 34 FF");
        let instruction = parsed.instruction.unwrap();
        assert_eq!(instruction.operands, vec!["12", "34", "FF"]);
    }

    #[test]
    fn bare_label() {
        let parsed = parse_line("start:");
        assert_eq!(parsed.label, Some("start".into()));
        assert_eq!(parsed.instruction, None);
    }

    #[test]
    fn label_with_instruction_on_same_line() {
        let parsed = parse_line("loop: JMP loop");
        assert_eq!(parsed.label, Some("loop".into()));
        assert_eq!(parsed.instruction.unwrap().mnemonic, "JMP");
    }

    #[test]
    fn trailing_comment_is_stripped() {
        let parsed = parse_line("NOP ; spin");
        assert_eq!(parsed.instruction.unwrap().mnemonic, "NOP");
    }

    #[test]
    fn invalid_label_name_is_treated_as_instruction_text() {
        // Not a valid label introducer, so the whole token reaches the
        // encoder and fails there as an unknown mnemonic.
        let parsed = parse_line("9start:");
        assert_eq!(parsed.label, None);
        assert_eq!(parsed.instruction.unwrap().mnemonic, "9start:");
    }

    #[test]
    fn source_lines_are_one_indexed_and_blank_lines_dropped() {
        let lines = parse_source("NOP\n\n; note\nstart:\nJMP start\n");
        let numbers: Vec<usize> = lines.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 4, 5]);
    }
}
