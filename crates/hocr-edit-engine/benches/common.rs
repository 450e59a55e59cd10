// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// An XHTML hOCR page in the shape Tesseract writes.
#[allow(dead_code)]
pub fn generate_hocr_page(lines: usize, words_per_line: usize) -> String {
    let mut content = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\"\n",
        "    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n",
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n",
        " <head>\n  <title></title>\n",
        "  <meta name='ocr-system' content='tesseract 5.3.0' />\n",
        " </head>\n <body>\n",
        "  <div class='ocr_page' id='page_1' title='image \"page.png\"; bbox 0 0 2480 3508; ppageno 0'>\n",
    ));

    for line in 0..lines {
        let top = 40 + line * 60;
        content.push_str(&format!(
            "   <span class='ocr_line' id='line_1_{line}' title=\"bbox 40 {top} 2440 {}; baseline 0 -8\">\n",
            top + 50
        ));
        for word in 0..words_per_line {
            let left = 40 + word * 120;
            content.push_str(&format!(
                "    <span class='ocrx_word' id='word_{line}_{word}' title='bbox {left} {top} {} {}; x_wconf {}'>word&amp;{word}</span>\n",
                left + 100,
                top + 50,
                60 + (line + word) % 40
            ));
        }
        content.push_str("   </span>\n");
    }

    content.push_str("  </div>\n </body>\n</html>\n");
    content
}

/// The same page without prolog, as older engines emit it.
#[allow(dead_code)]
pub fn generate_tag_soup_page(lines: usize, words_per_line: usize) -> String {
    generate_hocr_page(lines, words_per_line)
        .lines()
        .skip(3)
        .collect::<Vec<_>>()
        .join("\n")
        .replace("<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">", "<HTML>")
        .replace(" />", ">")
}
