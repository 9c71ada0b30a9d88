use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Standard English stop list used when a build does not supply its own.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd",
    "your","yours","yourself","yourselves","he","him","his","himself","she","she's","her","hers",
    "herself","it","it's","its","itself","they","them","their","theirs","themselves",
    "what","which","who","whom","this","that","that'll","these","those",
    "am","is","are","was","were","be","been","being","have","has","had","having",
    "do","does","did","doing","a","an","the","and","but","if","or","because","as","until","while",
    "of","at","by","for","with","about","against","between","into","through","during","before","after",
    "above","below","to","from","up","down","in","out","on","off","over","under",
    "again","further","then","once","here","there","when","where","why","how",
    "all","any","both","each","few","more","most","other","some","such",
    "no","nor","not","only","own","same","so","than","too","very",
    "s","t","can","will","just","don","don't","should","should've","now",
    "d","ll","m","o","re","ve","y","ain","aren","aren't","couldn","couldn't","didn","didn't",
    "doesn","doesn't","hadn","hadn't","hasn","hasn't","haven","haven't","isn","isn't",
    "ma","mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't",
    "shouldn","shouldn't","wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't",
];

/// Splits raw text into word tokens: NFKC normalization, lower-casing, then the word regex.
pub fn words(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

pub fn stem(word: &str) -> String {
    STEMMER.stem(word).into_owned()
}

/// Text normalizer shared by index construction and query parsing.
///
/// Stop words are held lower-cased and compared against lower-cased tokens
/// before stemming, so membership is case-insensitive on both paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    stop_words: BTreeSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied())
    }
}

impl Normalizer {
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stop_words }
    }

    /// Parses a stop-word file: one word per line, `#` starts a comment line.
    pub fn from_stop_word_list(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(&token.to_lowercase())
    }

    /// Tokenize, drop stop words and stem. Duplicates are kept in order of appearance.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        words(text)
            .into_iter()
            .filter(|w| !self.stop_words.contains(w))
            .map(|w| stem(&w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = Normalizer::default().normalize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let t = Normalizer::default().normalize("fight the fights");
        assert_eq!(t, vec!["fight", "fight"]);
    }

    #[test]
    fn custom_list_replaces_default() {
        let n = Normalizer::from_stop_word_list("# films\nThe\n\nmovie\n");
        assert_eq!(n.stop_words().len(), 2);
        assert!(n.is_stop_word("THE"));
        assert_eq!(n.normalize("the movie about a dog"), vec!["about", "a", "dog"]);
    }
}
