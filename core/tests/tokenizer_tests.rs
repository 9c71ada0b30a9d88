use filmdex_core::Normalizer;

#[test]
fn it_normalizes_and_stems() {
    let words = Normalizer::default().normalize("Running Runners RUN! The family's monsters.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"monster".to_string()));
    assert!(words.iter().all(|w| w.chars().all(|c| !c.is_uppercase())));
}

#[test]
fn it_filters_stopwords() {
    let words = Normalizer::default().normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn stop_words_match_regardless_of_case() {
    let n = Normalizer::default();
    assert!(n.is_stop_word("THE"));
    assert!(n.normalize("THE The the").is_empty());
}

#[test]
fn fullwidth_text_folds_to_ascii() {
    // NFKC maps fullwidth letters to their ASCII forms
    let words = Normalizer::default().normalize("ＭＯＮＳＴＥＲＳ");
    assert_eq!(words, vec!["monster"]);
}
