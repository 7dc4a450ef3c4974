// Fuzzy scoring of taxonomy entries against a filename and description
//
// All comparisons are on lower-cased text. Substring hits:
//   full name +10, category +5, subcategory +7, each keyword +3
// Word hits (search words longer than 2 chars, each counted once):
//   equal to a full-name word +2; otherwise equal to a category word +1.5
//   and equal to a subcategory word +1.5
// Partial hits (both words longer than 3 chars):
//   +0.5 per (search word, full-name word) pair where one contains the other

use std::collections::BTreeSet;

use super::taxonomy::UcsCategory;

pub const EXACT_MATCH_SCORE: f64 = 100.0;

const FULL_NAME_SCORE: f64 = 10.0;
const CATEGORY_SCORE: f64 = 5.0;
const SUBCATEGORY_SCORE: f64 = 7.0;
const KEYWORD_SCORE: f64 = 3.0;
const NAME_WORD_SCORE: f64 = 2.0;
const CATEGORY_WORD_SCORE: f64 = 1.5;
const PARTIAL_WORD_SCORE: f64 = 0.5;

const MIN_WORD_LEN: usize = 3;
const MIN_PARTIAL_LEN: usize = 4;

/// Filename without a trailing `.wav`/`.wave` (any case)
pub fn strip_wav_extension(filename: &str) -> &str {
    for ext in [".wave", ".wav"] {
        if filename.len() >= ext.len() {
            let split = filename.len() - ext.len();
            if filename.is_char_boundary(split) && filename[split..].eq_ignore_ascii_case(ext) {
                return &filename[..split];
            }
        }
    }
    filename
}

/// Lower-cased `"{stem} {description}"` with `_`, `-` and `.` turned into spaces
pub fn normalize_search_text(filename: &str, description: &str) -> String {
    format!("{} {}", strip_wav_extension(filename), description)
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '_' | '-' | '.') { ' ' } else { c })
        .collect()
}

/// A pre-normalized search text with its unique words
#[derive(Debug, Clone)]
pub struct SearchText {
    text: String,
    words: BTreeSet<String>,
}

impl SearchText {
    pub fn new(filename: &str, description: &str) -> Self {
        let text = normalize_search_text(filename, description);
        let words = text.split_whitespace().map(str::to_string).collect();
        SearchText { text, words }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn contains(&self, needle: &str) -> bool {
        !needle.is_empty() && self.text.contains(needle)
    }
}

/// Score one taxonomy entry. Zero means no relation.
pub fn score_entry(search: &SearchText, entry: &UcsCategory) -> f64 {
    let full_name = entry.full_name.trim().to_lowercase();
    let category = entry.category.trim().to_lowercase();
    let subcategory = entry.subcategory.trim().to_lowercase();

    let mut score = 0.0;

    if search.contains(&full_name) {
        score += FULL_NAME_SCORE;
    }
    if search.contains(&category) {
        score += CATEGORY_SCORE;
    }
    if search.contains(&subcategory) {
        score += SUBCATEGORY_SCORE;
    }

    for keyword in &entry.keywords {
        if search.contains(&keyword.trim().to_lowercase()) {
            score += KEYWORD_SCORE;
        }
    }

    let name_words: BTreeSet<&str> = full_name.split_whitespace().collect();
    let category_words: BTreeSet<&str> = category.split_whitespace().collect();
    let subcategory_words: BTreeSet<&str> = subcategory.split_whitespace().collect();

    for word in search.words.iter().filter(|w| w.chars().count() >= MIN_WORD_LEN) {
        let word = word.as_str();
        if name_words.contains(word) {
            score += NAME_WORD_SCORE;
            continue;
        }
        if category_words.contains(word) {
            score += CATEGORY_WORD_SCORE;
        }
        if subcategory_words.contains(word) {
            score += CATEGORY_WORD_SCORE;
        }
    }

    for word in search.words.iter().filter(|w| w.chars().count() >= MIN_PARTIAL_LEN) {
        for name_word in name_words.iter().filter(|w| w.chars().count() >= MIN_PARTIAL_LEN) {
            if word.contains(name_word) || name_word.contains(word.as_str()) {
                score += PARTIAL_WORD_SCORE;
            }
        }
    }

    score
}

/// First entry whose id is a prefix of the filename stem (case-sensitive)
pub fn exact_id_match<'t, I>(filename: &str, entries: I) -> Option<&'t UcsCategory>
where
    I: IntoIterator<Item = &'t UcsCategory>,
{
    let stem = strip_wav_extension(filename);
    entries
        .into_iter()
        .find(|entry| !entry.id.is_empty() && stem.starts_with(entry.id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> UcsCategory {
        UcsCategory::new("ANMLFarm", "ANIMALS", "FARM").with_keywords(["chicken", "cackle"])
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_wav_extension("door.wav"), "door");
        assert_eq!(strip_wav_extension("door.WAVE"), "door");
        assert_eq!(strip_wav_extension("door.mp3"), "door.mp3");
        assert_eq!(strip_wav_extension(".wav"), "");
        assert_eq!(strip_wav_extension("wav"), "wav");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_search_text("Chicken_Cackle-01.v2.wav", "Farm"),
            "chicken cackle 01 v2 farm"
        );
    }

    #[test]
    fn test_score_breakdown() {
        // "animals farm" substring +10, "animals" +5, "farm" +7,
        // keywords chicken/cackle +6, words animals/farm +2 each,
        // partial animals~animals and farm~farm +0.5 each
        let search = SearchText::new("animals_farm_chicken_cackle.wav", "");
        assert_eq!(score_entry(&search, &entry()), 33.0);
    }

    #[test]
    fn test_category_and_subcategory_words_independent() {
        let entry = UcsCategory {
            full_name: "Farmyard".to_string(),
            ..UcsCategory::new("X", "barn", "barn")
        };
        // substring: category +5, subcategory +7; word: +1.5 twice
        let search = SearchText::new("barn.wav", "");
        assert_eq!(score_entry(&search, &entry), 15.0);
    }

    #[test]
    fn test_unrelated_scores_zero() {
        let search = SearchText::new("laser_zap.wav", "sci-fi weapon");
        assert_eq!(score_entry(&search, &entry()), 0.0);
    }

    #[test]
    fn test_empty_fields_never_match() {
        let entry = UcsCategory {
            full_name: String::new(),
            subcategory: String::new(),
            ..UcsCategory::new("X", "ANIMALS", "")
        }
        .with_keywords(["", "  "]);
        let search = SearchText::new("door.wav", "");
        assert_eq!(score_entry(&search, &entry), 0.0);
    }

    #[test]
    fn test_exact_id_match() {
        let entries = vec![
            UcsCategory::new("TOON", "CARTOON", "MISC"),
            UcsCategory::new("TOONAnml", "CARTOON", "ANIMAL"),
        ];
        assert_eq!(
            exact_id_match("TOONAnml_chicken.wav", &entries).map(|e| e.id.as_str()),
            Some("TOON")
        );
        assert!(exact_id_match("toonanml_chicken.wav", &entries).is_none());
        assert!(exact_id_match("random_sound.wav", &entries).is_none());
    }
}
