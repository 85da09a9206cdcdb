use crate::events::model::Event;
use lazy_static::lazy_static;
use regex::Regex;
use voca_rs::manipulate::latinise;

const NORDIC_LETTERS: [(char, &str); 3] = [('æ', "ae"), ('ø', "o"), ('å', "a")];

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// URL-safe form of `text`: lowercase ASCII words joined by single hyphens
pub fn slugify(text: &str) -> String {
    let lowercase = text.to_lowercase();
    let mut folded = String::with_capacity(lowercase.len());

    for c in lowercase.chars() {
        match NORDIC_LETTERS.iter().find(|(letter, _)| *letter == c) {
            Some((_, replacement)) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }

    let ascii = latinise(&folded);

    NON_ALPHANUMERIC
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}

pub fn event_slug(event: &Event) -> String {
    slugify(&format!("{} {} {}", event.title, event.venue, event.iso_day()))
}

/// Folds case and diacritics so text sorts the way a reader expects
pub fn collation_key(text: &str) -> String {
    latinise(&text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test_log::test]
    fn should_map_nordic_letters_to_fixed_ascii() {
        assert_eq!(slugify("Blåbær"), "blabaer");
        assert_eq!(slugify("Øystein Sunde"), "oystein-sunde");
        assert_eq!(slugify("ÆØÅ"), "aeoa");
    }

    #[test_log::test]
    fn should_fold_other_diacritics() {
        assert_eq!(slugify("Café Évora"), "cafe-evora");
    }

    #[test_log::test]
    fn should_collapse_and_trim_separators() {
        assert_eq!(slugify("  --AC/DC  @  Koengen!! "), "ac-dc-koengen");
    }

    #[test_log::test]
    fn when_nothing_is_alphanumeric_should_be_empty() {
        assert_eq!(slugify("!!! ---"), "");
    }

    #[test_log::test]
    fn should_slug_event_by_title_venue_and_day() {
        let event = Event::new(
            "Kygo".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 7)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
            "Bergenhus Festning".to_string(),
        );

        assert_eq!(event_slug(&event), "kygo-bergenhus-festning-2025-06-07");
    }

    #[test_log::test]
    fn collation_key_should_ignore_case_and_accents() {
        assert_eq!(collation_key("Émile"), collation_key("emile"));
    }
}
