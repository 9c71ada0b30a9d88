use filmdex_core::{build, Corpus, Mode, Normalizer, SearchEngine, PAGE_SIZE};

const FILMS: &str = r#"{
    "1": {"Title": ["A Quiet Place"], "Text": "a deaf family fights silent monsters",
          "Director": ["John Krasinski"], "Location": ["United States"]},
    "2": {"Title": ["Avengers"], "Text": "heroes fight a cosmic villain",
          "Director": ["Russo brothers"], "Location": []}
}"#;

fn engine(json: &str) -> SearchEngine {
    let corpus = Corpus::from_json_str(json).unwrap();
    let index = build(Normalizer::default(), corpus.documents.values());
    SearchEngine::new(index, corpus.documents)
}

fn ids(page: &filmdex_core::SearchPage) -> Vec<u32> {
    page.hits.iter().map(|h| h.doc_id).collect()
}

#[test]
fn boolean_single_term_matches_both() {
    let page = engine(FILMS).search("fight", Mode::Boolean, 1);
    assert_eq!(page.total_hits, 2);
    assert_eq!(ids(&page), vec![1, 2]);
    assert!(page.hits.iter().all(|h| h.score.is_none() && h.usage.is_none()));
}

#[test]
fn boolean_conjunction_narrows() {
    let page = engine(FILMS).search("silent monsters", Mode::Boolean, 1);
    assert_eq!(page.total_hits, 1);
    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page.hits[0].title, "A Quiet Place");
    assert_eq!(page.hits[0].snippet, "a deaf family fights silent monsters");
}

#[test]
fn ranked_returns_both_deterministically() {
    let e = engine(FILMS);
    let first = e.search("fight", Mode::Ranked, 1);
    let second = e.search("fight", Mode::Ranked, 1);
    assert_eq!(first.total_hits, 2);
    assert_eq!(ids(&first), ids(&second));
    // "fight" occurs in every film, so idf is zero and the tie falls back to id order
    assert_eq!(ids(&first), vec![1, 2]);
    for hit in &first.hits {
        assert_eq!(hit.score, Some(0.0));
        let usage = hit.usage.as_ref().unwrap();
        assert_eq!(usage.missing, vec!["fight"]);
    }
}

#[test]
fn ranked_reports_matched_and_missing_terms() {
    let page = engine(FILMS).search("cosmic monsters", Mode::Ranked, 1);
    // equal idf; "Avengers" has fewer weighted terms, so its weight per term is higher
    assert_eq!(ids(&page), vec![2, 1]);
    let first = page.hits[0].usage.as_ref().unwrap();
    assert_eq!(first.matched, vec!["cosmic"]);
    assert_eq!(first.missing, vec!["monster"]);
    assert!(page.hits[0].score > page.hits[1].score);
    assert!(page.took_s >= 0.0);
}

#[test]
fn unknown_term_yields_no_hits() {
    let e = engine(FILMS);
    for mode in [Mode::Boolean, Mode::Ranked] {
        let page = e.search("xylophone", mode, 1);
        assert_eq!(page.total_hits, 0);
        assert!(page.hits.is_empty());
        assert_eq!(page.unknown, vec!["xylophone"]);
    }
}

#[test]
fn unknown_term_blocks_conjunction_but_not_ranking() {
    let e = engine(FILMS);
    let and = e.search("monsters xylophone", Mode::Boolean, 1);
    assert_eq!(and.total_hits, 0);
    assert_eq!(and.unknown, vec!["xylophone"]);

    let ranked = e.search("monsters xylophone", Mode::Ranked, 1);
    assert_eq!(ids(&ranked), vec![1]);
    assert_eq!(ranked.unknown, vec!["xylophone"]);
}

#[test]
fn stop_words_are_reported_and_dropped() {
    let page = engine(FILMS).search("The a", Mode::Boolean, 1);
    assert_eq!(page.total_hits, 0);
    assert_eq!(page.skipped, vec!["the", "a"]);
    assert!(page.unknown.is_empty());
}

#[test]
fn pages_cover_every_hit_once() {
    let mut json = String::from("{");
    for id in 1..=23 {
        if id > 1 {
            json.push(',');
        }
        let extra = "storm ".repeat(id % 4 + 1);
        json.push_str(&format!(r#""{id}": {{"Title": ["Film {id}"], "Text": "{extra} harbor {id}"}}"#));
    }
    json.push('}');
    // one film without the query term so idf stays positive
    json.insert_str(json.len() - 1, r#","24": {"Title": ["Other"], "Text": "desert"}"#);
    let e = engine(&json);

    for mode in [Mode::Boolean, Mode::Ranked] {
        let total = e.search("storm", mode, 1).total_hits;
        assert_eq!(total, 23);
        let pages = total.div_ceil(PAGE_SIZE);
        let mut seen = Vec::new();
        for p in 1..=pages {
            let page = e.search("storm", mode, p);
            assert!(page.hits.len() <= PAGE_SIZE);
            seen.extend(ids(&page));
        }
        assert!(e.search("storm", mode, pages + 1).hits.is_empty());
        assert!(e.search("storm", mode, 0).hits.is_empty());

        let full: Vec<u32> = match mode {
            Mode::Boolean => (1..=23).collect(),
            Mode::Ranked => {
                let idx = e.index();
                filmdex_core::vector::rank_all(&["storm"], idx).iter().map(|d| d.doc_id).collect()
            }
        };
        assert_eq!(seen, full);
    }
}

#[test]
fn document_lookup_returns_full_record() {
    let e = engine(FILMS);
    let doc = e.document(1).unwrap();
    assert_eq!(doc.director, "John Krasinski");
    assert_eq!(doc.location, "United States");
    assert_eq!(e.document(2).unwrap().location, "");
    assert!(e.document(3).is_none());
}
