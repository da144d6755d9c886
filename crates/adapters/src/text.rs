//! Post text assembly shared by the platform posters

use cutepets_domain::Post;

/// Append tags as "#tag" tokens on a new paragraph, then cap the whole
/// string at `max_chars`.
///
/// Truncation deliberately happens after the tags are appended, so a
/// long description can push tags past the limit and cut them off.
/// That matches the platforms' historical behavior; callers relying on
/// tags surviving must keep descriptions short.
pub(crate) fn assemble_text(post: &Post, max_chars: usize) -> String {
    let mut text = post.text.clone();

    let tags: Vec<String> = post
        .tags
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{}", t))
        .collect();

    if !tags.is_empty() {
        text.push_str("\n\n");
        text.push_str(&tags.join(" "));
    }

    truncate_chars(&text, max_chars)
}

/// Truncate to at most `max_chars` characters, never splitting a char
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str, tags: &[&str]) -> Post {
        Post {
            text: text.to_string(),
            image_url: None,
            link: None,
            alt_text: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_tags_appended_in_order() {
        let assembled = assemble_text(&post("Meet Poppy!", &["adoptdontshop", "rescue"]), 300);

        assert_eq!(assembled, "Meet Poppy!\n\n#adoptdontshop #rescue");
    }

    #[test]
    fn test_empty_tags_are_skipped() {
        let assembled = assemble_text(&post("Meet Poppy!", &["rescue", ""]), 300);

        assert_eq!(assembled, "Meet Poppy!\n\n#rescue");
    }

    #[test]
    fn test_no_tags_no_trailing_paragraph() {
        let assembled = assemble_text(&post("Meet Poppy!", &[]), 300);

        assert_eq!(assembled, "Meet Poppy!");
    }

    #[test]
    fn test_truncation_happens_after_tags() {
        let long_text = "a".repeat(295);
        let assembled = assemble_text(&post(&long_text, &["adoptdontshop"]), 300);

        // The tag paragraph starts past char 295, so the tag is cut mid-token.
        assert_eq!(assembled.chars().count(), 300);
        assert!(assembled.starts_with(&long_text));
        assert!(assembled.ends_with("\n\n#ad"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 4), "héll");
        assert_eq!(truncate_chars(text, 100), text);
    }
}
