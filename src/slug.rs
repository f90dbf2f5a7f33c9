//! File-name slugs shared by the synthesizer, the relocator and the screen patcher.
//!
//! All three must agree on the name of a word's audio file, so every path is
//! derived here.

/// Replace every character that is not alphanumeric with `_`.
///
/// Character count is preserved and non-ASCII letters are kept, so
/// `"T-shirt"` becomes `"T_shirt"` and `"Ice cream"` becomes `"Ice_cream"`.
pub fn word_slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Lower-case the category name and replace spaces with `_`.
pub fn category_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// `<word_slug>.<ext>`
pub fn audio_file_name(word: &str, ext: &str) -> String {
    format!("{}.{}", word_slug(word), ext)
}

/// Bundler path written into the manifest and the screen sources.
///
/// Always uses `/`, this is not an OS path.
pub fn sound_file_path(root: &str, category: &str, word: &str, ext: &str) -> String {
    format!(
        "{}/{}/{}",
        root.trim_end_matches('/'),
        category_slug(category),
        audio_file_name(word, ext)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_slug_punctuation() {
        assert_eq!(word_slug("T-shirt"), "T_shirt");
        assert_eq!(word_slug("Ice cream"), "Ice_cream");
        assert_eq!(word_slug("What's up?"), "What_s_up_");
        assert_eq!(word_slug("Apple"), "Apple");
    }

    #[test]
    fn test_word_slug_keeps_unicode_letters() {
        assert_eq!(word_slug("café au lait"), "café_au_lait");
        assert_eq!(word_slug("תפוח"), "תפוח");
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Body Parts"), "body_parts");
        assert_eq!(category_slug("Fruits"), "fruits");
    }

    #[test]
    fn test_sound_file_path() {
        assert_eq!(
            sound_file_path("../assets/sounds", "Body Parts", "Left hand", "mp3"),
            "../assets/sounds/body_parts/Left_hand.mp3"
        );
        assert_eq!(
            sound_file_path("../assets/sounds/", "Fruits", "Apple", "mp3"),
            "../assets/sounds/fruits/Apple.mp3"
        );
    }

    proptest! {
        #[test]
        fn slug_is_alphanumeric_or_underscore(s in "\\PC*") {
            let slug = word_slug(&s);
            prop_assert!(slug.chars().all(|c| c.is_alphanumeric() || c == '_'));
            prop_assert_eq!(slug.chars().count(), s.chars().count());
        }

        #[test]
        fn slug_is_stable(s in "\\PC*") {
            let once = word_slug(&s);
            prop_assert_eq!(word_slug(&once), once.clone());
        }
    }
}
