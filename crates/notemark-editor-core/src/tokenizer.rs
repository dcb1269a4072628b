//! Hashtag and mention tokenization.
//!
//! A token starts at `#` or `@` and runs to the next whitespace or the end
//! of the text. The character right after the sigil must not be whitespace,
//! so `# heading` and `a @ b` produce nothing. A lone sigil at the very end
//! of the text is still a (one-character) token: it is what the user is in
//! the middle of typing.
//!
//! Scanning is a single left-to-right pass. Each match consumes up to its
//! own boundary before scanning resumes, so tokens come out ordered and
//! never overlap. `#a#b` is one token, not two.

use smol_str::SmolStr;

use crate::types::{Token, TokenKind};

/// Characters that end a token. Tabs and newlines count.
pub fn is_token_boundary(c: char) -> bool {
    c.is_whitespace()
}

/// Scan `text` for hashtag and mention tokens.
///
/// Total over any input; never fails.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().enumerate().peekable();

    while let Some((char_start, (byte_start, c))) = chars.next() {
        let Some(kind) = TokenKind::from_sigil(c) else {
            continue;
        };

        if let Some(&(_, (_, next))) = chars.peek() {
            if is_token_boundary(next) {
                continue;
            }
        }

        let mut char_end = char_start + 1;
        let mut byte_end = byte_start + c.len_utf8();
        while let Some(&(char_idx, (byte_idx, next))) = chars.peek() {
            if is_token_boundary(next) {
                break;
            }
            char_end = char_idx + 1;
            byte_end = byte_idx + next.len_utf8();
            chars.next();
        }

        tokens.push(Token {
            kind,
            raw_text: SmolStr::new(&text[byte_start..byte_end]),
            start: char_start,
            end: char_end,
        });
    }

    tokens
}

/// Find the token whose range contains `char_offset`, end-inclusive.
///
/// End-inclusive because a caret sitting right after the last character of
/// a token is still "in" it for editing purposes.
pub fn token_at(tokens: &[Token], char_offset: usize) -> Option<&Token> {
    tokens
        .iter()
        .find(|t| t.start <= char_offset && char_offset <= t.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tokens: &[Token], kind: TokenKind) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.name())
            .collect()
    }

    #[test]
    fn test_hashtags_in_order() {
        let tokens = tokenize("#urgent #followup plain");
        assert_eq!(names(&tokens, TokenKind::Hashtag), vec!["urgent", "followup"]);
        assert_eq!(tokens[0].char_range(), 0..7);
        assert_eq!(tokens[1].char_range(), 8..17);
    }

    #[test]
    fn test_mentions_and_hashtags_mixed() {
        let tokens = tokenize("ping @alice about #launch");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Mention);
        assert_eq!(tokens[0].raw_text, "@alice");
        assert_eq!(tokens[0].char_range(), 5..11);
        assert_eq!(tokens[1].kind, TokenKind::Hashtag);
        assert_eq!(tokens[1].raw_text, "#launch");
    }

    #[test]
    fn test_sigil_followed_by_whitespace_is_not_a_token() {
        assert!(tokenize("# heading").is_empty());
        assert!(tokenize("a @ b").is_empty());
        assert!(tokenize("#\tx").is_empty());
        assert!(tokenize("@\nnext").is_empty());
    }

    #[test]
    fn test_stray_sigil_at_end_spans_to_end() {
        let tokens = tokenize("hello @");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw_text, "@");
        assert_eq!(tokens[0].char_range(), 6..7);
        assert_eq!(tokens[0].name(), "");

        let tokens = tokenize("#");
        assert_eq!(tokens[0].char_range(), 0..1);
    }

    #[test]
    fn test_tab_and_newline_end_tokens() {
        let tokens = tokenize("#one\t#two\n@three");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].raw_text, "#one");
        assert_eq!(tokens[1].raw_text, "#two");
        assert_eq!(tokens[2].raw_text, "@three");
    }

    #[test]
    fn test_token_consumes_embedded_sigils() {
        let tokens = tokenize("#a#b @x@y");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].raw_text, "#a#b");
        assert_eq!(tokens[1].raw_text, "@x@y");
    }

    #[test]
    fn test_token_can_start_mid_word() {
        let tokens = tokenize("mail jd@example.com");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw_text, "@example.com");
        assert_eq!(tokens[0].start, 7);
    }

    #[test]
    fn test_offsets_are_chars_not_bytes() {
        let tokens = tokenize("café #thé @zoë");
        assert_eq!(tokens[0].char_range(), 5..9);
        assert_eq!(tokens[0].name(), "thé");
        assert_eq!(tokens[1].char_range(), 10..14);
        assert_eq!(tokens[1].name(), "zoë");
    }

    #[test]
    fn test_non_breaking_space_is_a_boundary() {
        let tokens = tokenize("#a\u{00A0}b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw_text, "#a");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_tokens_sorted_and_disjoint() {
        let corpus = [
            "#a #b #c",
            "@@@ ###",
            "x#y@z w",
            "  #  @  #x  @y ",
            "émoji 🎉#party @ünïcode",
            "#\t@\n#end#",
        ];
        for text in corpus {
            let tokens = tokenize(text);
            for pair in tokens.windows(2) {
                assert!(pair[0].end <= pair[1].start, "overlap in {text:?}");
            }
            for t in &tokens {
                assert!(t.start < t.end);
                let slice: String = text.chars().skip(t.start).take(t.char_len()).collect();
                assert_eq!(slice, t.raw_text.as_str());
            }
        }
    }

    #[test]
    fn test_token_at_is_end_inclusive() {
        let tokens = tokenize("hi @bob there");
        assert_eq!(token_at(&tokens, 3).map(|t| t.name()), Some("bob"));
        assert_eq!(token_at(&tokens, 7).map(|t| t.name()), Some("bob"));
        assert!(token_at(&tokens, 8).is_none());
        assert!(token_at(&tokens, 1).is_none());
    }
}
