use std::ops::Range;

use hocr_edit_engine::{
    BBox, CommitError, Dialect, Document, EditError, LoadOptions, Session, edits,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// Assert `after` equals `before` with only `range` replaced.
fn assert_only_changed(before: &[u8], after: &[u8], range: Range<usize>) {
    let tail = before.len() - range.end;
    assert_eq!(&after[..range.start], &before[..range.start], "prefix changed");
    assert_eq!(
        &after[after.len() - tail..],
        &before[range.end..],
        "suffix changed"
    );
}

#[rstest]
#[case::tesseract("tesseract.hocr", Dialect::StrictXml)]
#[case::legacy("legacy.html", Dialect::TagSoup)]
fn empty_commit_is_identity(#[case] name: &str, #[case] dialect: Dialect) {
    let bytes = fixture(name);
    let doc = Document::load(&bytes).unwrap();
    assert_eq!(doc.dialect(), dialect);

    let committed = doc.commit(&[]).unwrap();
    assert_eq!(committed.as_bytes(), bytes.as_slice());
}

#[rstest]
#[case::tesseract("tesseract.hocr")]
#[case::legacy("legacy.html")]
fn fixture_round_trips_in_both_dialects(#[case] name: &str) {
    let bytes = fixture(name);
    for dialect in [Dialect::TagSoup, Dialect::StrictXml] {
        let options = LoadOptions {
            dialect: Some(dialect),
            ..LoadOptions::default()
        };
        let doc = Document::load_with(&bytes, &options).unwrap();
        assert_eq!(doc.syntax().to_string().as_bytes(), bytes.as_slice());
        assert_eq!(doc.commit(&[]).unwrap().as_bytes(), bytes.as_slice());
    }
}

#[test]
fn impressum_url_fix_changes_only_the_word_text() {
    let bytes = fixture("tesseract.hocr");
    let doc = Document::load(&bytes).unwrap();
    let word = doc.word_by_id("word_1_19").unwrap();
    assert_eq!(word.text, "amadeus-verlag.com");

    let replacement = edits::set_text(word, "amadeus-verlag.de").unwrap();
    let committed = doc.commit(&[replacement]).unwrap();

    let expected = String::from_utf8(bytes.clone())
        .unwrap()
        .replace(">amadeus-verlag.com<", ">amadeus-verlag.de<");
    assert_eq!(committed.text(), expected);
    assert_only_changed(&bytes, committed.as_bytes(), word.text_range.clone().unwrap());
    assert_eq!(
        committed.word_by_id("word_1_19").map(|w| w.text.as_str()),
        Some("amadeus-verlag.de")
    );
}

#[test]
fn tesseract_words() {
    let doc = Document::load(&fixture("tesseract.hocr")).unwrap();
    let listing = doc
        .words()
        .iter()
        .map(|w| {
            let confidence = w.confidence.map(|c| c.to_string()).unwrap_or_default();
            format!("{} | {} | {} | {}", w.id, w.bbox, confidence, w.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(listing, @r"
    word_1_17 | 510 2080 690 2117 | 93 | Verlag
    word_1_18 | 705 2080 1990 2117 | 61 | M&M GmbH
    word_1_19 | 510 2131 960 2168 | 84 | amadeus-verlag.com
    ");

    let page = &doc.pages()[0];
    assert_eq!(page.image.as_deref(), Some("impressum.png"));
    assert_eq!(page.bbox, Some(BBox::new(0, 0, 2480, 3508)));
}

#[test]
fn legacy_words() {
    let doc = Document::load(&fixture("legacy.html")).unwrap();
    let texts: Vec<_> = doc.words().iter().map(|w| w.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Bold", "anonymous", "fish\u{a0}& chips", "<tag>", ""]
    );

    assert!(!doc.words()[1].has_declared_id());
    assert!(doc.words()[1].id.starts_with('@'));
    assert_eq!(doc.words()[2].confidence, Some(70));

    let skipped = doc.skipped_words();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].id.as_deref(), Some("w3"));
}

#[test]
fn nested_formatting_text_is_edited_inside_the_wrapper() {
    let bytes = fixture("legacy.html");
    let doc = Document::load(&bytes).unwrap();
    let word = doc.word_by_id("w1").unwrap();

    let committed = doc.commit(&[edits::set_text(word, "Bolder").unwrap()]).unwrap();
    assert!(committed.text().contains("> <strong>Bolder</strong> </span>"));
    assert_only_changed(&bytes, committed.as_bytes(), word.text_range.clone().unwrap());
}

#[test]
fn empty_word_receives_text() {
    let doc = Document::load(&fixture("legacy.html")).unwrap();
    let word = doc.word_by_id("w6").unwrap();

    let committed = doc.commit(&[edits::set_text(word, "x & y").unwrap()]).unwrap();
    assert!(committed.text().contains("title='bbox 100 50 190 80'>x &amp; y</span>"));
    assert_eq!(committed.word_by_id("w6").unwrap().text, "x & y");
}

#[test]
fn title_edit_keeps_irregular_spacing_and_unknown_properties() {
    let bytes = fixture("legacy.html");
    let doc = Document::load(&bytes).unwrap();
    let word = doc.word_by_id("w4").unwrap();

    let committed = doc
        .commit(&[edits::set_confidence(word, 71).unwrap()])
        .unwrap();
    assert!(
        committed
            .text()
            .contains(r#"title='bbox 310 10 400 40;x_wconf 71 ;  x_font "Times New"'"#)
    );
    assert_only_changed(&bytes, committed.as_bytes(), word.metadata_range.clone());
}

#[test]
fn equivalent_words_decode_identically_in_both_dialects() {
    let word = br#"<span class="ocrx_word" id="word_1_2" title="bbox 306 245 486 334; x_wconf 92">Stra&#223;e</span>"#;
    let load = |dialect| {
        let options = LoadOptions {
            dialect: Some(dialect),
            ..LoadOptions::default()
        };
        Document::load_with(word, &options).unwrap()
    };

    let soup = load(Dialect::TagSoup);
    let strict = load(Dialect::StrictXml);
    let (a, b) = (&soup.words()[0], &strict.words()[0]);

    assert_eq!(a.text, "Straße");
    assert_eq!((&a.id, &a.text, a.bbox, a.confidence), (&b.id, &b.text, b.bbox, b.confidence));
    assert_eq!(
        (&a.text_range, &a.metadata_range, &a.id_range),
        (&b.text_range, &b.metadata_range, &b.id_range)
    );
}

#[test]
fn dialect_rejects_unrepresentable_text() {
    let doc = Document::load(&fixture("tesseract.hocr")).unwrap();
    let result = edits::set_text(&doc.words()[0], "form\u{c}feed");
    assert!(matches!(result, Err(EditError::InvalidText(_))));
}

#[test]
fn reversed_bbox_leaves_session_empty() {
    let doc = Document::load(&fixture("tesseract.hocr")).unwrap();
    let mut session = Session::new(doc);

    let result = session.edit_bbox(0, BBox::new(100, 50, 10, 200));
    assert!(matches!(result, Err(EditError::InvalidGeometry(_))));
    assert!(session.pending().is_empty());
}

#[test]
fn overlapping_edits_produce_nothing() {
    let doc = Document::load(&fixture("tesseract.hocr")).unwrap();
    let word = &doc.words()[0];
    let a = edits::set_text(word, "Verlage").unwrap();
    let b = edits::set_text(word, "Verlags").unwrap();

    assert!(matches!(
        doc.commit(&[a, b]),
        Err(CommitError::OverlappingEdit { .. })
    ));
}

#[test]
fn session_edits_over_several_commits() {
    let bytes = fixture("tesseract.hocr");
    let mut session = Session::new(Document::load(&bytes).unwrap());

    session.edit_bbox(0, BBox::new(512, 2080, 690, 2117)).unwrap();
    session.edit_confidence(0, 99).unwrap();
    assert_eq!(session.commit().unwrap(), 1);

    // Indices stay valid across commits since the word count is preserved
    session.edit_text(2, "amadeus-verlag.de").unwrap();
    session.edit_id(2, "word_1_20").unwrap();
    assert_eq!(session.commit().unwrap(), 2);

    let expected = String::from_utf8(bytes)
        .unwrap()
        .replace(
            "title='bbox 510 2080 690 2117; x_wconf 93'",
            "title='bbox 512 2080 690 2117; x_wconf 99'",
        )
        .replace("id='word_1_19'", "id='word_1_20'")
        .replace(">amadeus-verlag.com<", ">amadeus-verlag.de<");
    assert_eq!(session.document().text(), expected);
}
