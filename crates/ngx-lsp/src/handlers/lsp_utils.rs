//! LSP conversion helpers.

use text_size::{TextRange, TextSize};
use tower_lsp::lsp_types::{Position, Range};

pub(crate) fn offset_to_position(content: &str, offset: TextSize) -> Position {
    let (line, character) = ngx_ide::offset_to_line_col(content, offset);
    Position { line, character }
}

pub(crate) fn range_to_lsp(content: &str, range: TextRange) -> Range {
    Range {
        start: offset_to_position(content, range.start()),
        end: offset_to_position(content, range.end()),
    }
}

pub(crate) fn position_to_offset(content: &str, position: Position) -> Option<TextSize> {
    let mut line = 0u32;
    let mut col = 0u32;

    for (i, c) in content.char_indices() {
        if line == position.line && col == position.character {
            return TextSize::try_from(i).ok();
        }
        if c == '\n' {
            if line == position.line {
                // Position is at end of this line
                return TextSize::try_from(i).ok();
            }
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    // Position is at end of file
    if line == position.line {
        TextSize::try_from(content.len()).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_count_characters() {
        let content = "user nginx;\nerror_log «x»;\n";
        let offset = position_to_offset(content, Position::new(1, 12)).expect("offset");
        assert_eq!(&content[usize::from(offset)..], "»;\n");
        assert_eq!(offset_to_position(content, offset), Position::new(1, 12));
    }

    #[test]
    fn positions_past_line_end_clamp() {
        let content = "a;\nb;\n";
        assert_eq!(
            position_to_offset(content, Position::new(0, 99)),
            Some(TextSize::from(2))
        );
        assert_eq!(
            position_to_offset(content, Position::new(2, 0)),
            Some(TextSize::from(6))
        );
        assert_eq!(position_to_offset(content, Position::new(5, 0)), None);
    }

    #[test]
    fn ranges_convert_both_ends() {
        let content = "http {\n    gzip on;\n}\n";
        let range = range_to_lsp(content, TextRange::new(11.into(), 15.into()));
        assert_eq!(range.start, Position::new(1, 4));
        assert_eq!(range.end, Position::new(1, 8));
    }
}
