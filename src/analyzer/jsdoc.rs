//! Pragmatic JSDoc query surface.
//!
//! Real JSDoc parsing (type expressions, `@param`, cross-references) is out of
//! scope; the rule engine only ever asks two questions - "does `@suppress
//! {duplicate}` cover this declaration?" and "is this declaration a
//! `@typedef`?" - so this module answers exactly those, scanning the block
//! comments the parser already extracts.

use crate::parser::Trivia;

/// A declaration "sees" a tag in a comment that ends within this many bytes of
/// where the declaration starts - enough to span a newline and leading
/// indentation, not enough to bleed into an unrelated, far-away comment.
const MAX_ATTACHMENT_GAP: u32 = 120;

#[derive(Debug, Clone, Default)]
pub struct JsDocIndex {
    /// `@fileoverview` carrying `@suppress {duplicate}` covers every
    /// declaration in the file.
    file_level_suppress_duplicate: bool,
    /// End offsets of comments tagged `@suppress {duplicate}`.
    suppress_duplicate_ends: Vec<u32>,
    /// End offsets of comments tagged `@typedef`.
    typedef_ends: Vec<u32>,
}

impl JsDocIndex {
    pub fn build(trivia: Option<&Trivia>) -> Self {
        let Some(trivia) = trivia else {
            return Self::default();
        };

        let mut index = Self::default();

        if let Some(first) = trivia
            .block_comments
            .iter()
            .min_by_key(|c| c.span.start)
        {
            if has_tag(&first.text, "@fileoverview") && has_suppress_duplicate(&first.text) {
                index.file_level_suppress_duplicate = true;
            }
        }

        for comment in &trivia.block_comments {
            if has_suppress_duplicate(&comment.text) {
                index.suppress_duplicate_ends.push(comment.span.end);
            }
            if has_tag(&comment.text, "@typedef") {
                index.typedef_ends.push(comment.span.end);
            }
        }

        index
    }

    pub fn suppresses_duplicate(&self, declaration_position: u32) -> bool {
        self.file_level_suppress_duplicate
            || attaches(&self.suppress_duplicate_ends, declaration_position)
    }

    pub fn is_typedef(&self, declaration_position: u32) -> bool {
        attaches(&self.typedef_ends, declaration_position)
    }
}

fn attaches(comment_ends: &[u32], declaration_position: u32) -> bool {
    comment_ends.iter().any(|&end| {
        declaration_position >= end && declaration_position - end <= MAX_ATTACHMENT_GAP
    })
}

fn has_tag(text: &str, tag: &str) -> bool {
    text.contains(tag)
}

fn has_suppress_duplicate(text: &str) -> bool {
    text.contains("@suppress") && text.contains("duplicate")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Comment, CommentKind, SourceSpan};

    fn trivia_with(comments: Vec<Comment>) -> Trivia {
        Trivia {
            line_comments: Vec::new(),
            block_comments: comments,
            leading_whitespace: Vec::new(),
            trailing_whitespace: Vec::new(),
        }
    }

    fn comment(text: &str, start: u32, end: u32) -> Comment {
        Comment {
            text: text.to_string(),
            span: SourceSpan { start, end },
            kind: CommentKind::Block,
        }
    }

    #[test]
    fn should_attach_suppress_duplicate_to_the_next_declaration() {
        let trivia = trivia_with(vec![comment("* @suppress {duplicate} ", 0, 30)]);
        let index = JsDocIndex::build(Some(&trivia));
        assert!(index.suppresses_duplicate(35));
        assert!(!index.suppresses_duplicate(500));
    }

    #[test]
    fn should_not_attach_across_a_large_gap() {
        let trivia = trivia_with(vec![comment("* @suppress {duplicate} ", 0, 30)]);
        let index = JsDocIndex::build(Some(&trivia));
        assert!(!index.suppresses_duplicate(30 + MAX_ATTACHMENT_GAP + 1));
    }

    #[test]
    fn should_apply_fileoverview_suppress_to_the_whole_file() {
        let trivia = trivia_with(vec![comment(
            "* @fileoverview Legacy file. @suppress {duplicate} ",
            0,
            50,
        )]);
        let index = JsDocIndex::build(Some(&trivia));
        assert!(index.suppresses_duplicate(10_000));
    }

    #[test]
    fn should_detect_typedef() {
        let trivia = trivia_with(vec![comment("* @typedef {number} ", 0, 25)]);
        let index = JsDocIndex::build(Some(&trivia));
        assert!(index.is_typedef(28));
        assert!(!index.suppresses_duplicate(28));
    }

    #[test]
    fn should_return_empty_index_with_no_trivia() {
        let index = JsDocIndex::build(None);
        assert!(!index.suppresses_duplicate(0));
        assert!(!index.is_typedef(0));
    }
}
