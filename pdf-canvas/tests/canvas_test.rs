use pdf_canvas::{BuiltinFont, Canvas, Color};

fn render(c: Canvas) -> String {
    let bytes = c.save().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn empty_canvas_still_has_one_page() {
    let output = render(Canvas::new());
    assert!(output.starts_with("%PDF-1.7"));
    assert!(output.contains("/Count 1"));
    assert!(output.contains("/MediaBox [0 0 595.27 841.89]"));
    assert!(output.ends_with("%%EOF\n"));
}

#[test]
fn title_goes_into_info_dictionary() {
    let mut c = Canvas::new();
    c.set_title("Skyview Availability Report");
    let output = render(c);
    assert!(output.contains("/Title (Skyview Availability Report)"));
    assert!(output.contains("/Info "));
}

#[test]
fn draw_string_uses_selected_font() {
    let mut c = Canvas::new();
    c.set_font(BuiltinFont::HelveticaBold, 20.0);
    c.draw_string(50.0, 800.0, "SKYVIEW BILLBOARDS");
    let output = render(c);
    assert!(output.contains("/F2 20 Tf\n50 800 Td\n(SKYVIEW BILLBOARDS) Tj"));
}

#[test]
fn default_font_is_helvetica_12() {
    let mut c = Canvas::new();
    c.draw_string(20.0, 20.0, "Hello");
    let output = render(c);
    assert!(output.contains("/F1 12 Tf"));
    assert!(output.contains("/BaseFont /Helvetica "));
    assert!(output.contains("/Encoding /WinAnsiEncoding"));
}

#[test]
fn text_delimiters_are_escaped() {
    let mut c = Canvas::new();
    c.draw_string(10.0, 10.0, "Size (approx)");
    let output = render(c);
    assert!(output.contains("(Size \\(approx\\)) Tj"));
}

#[test]
fn colors_and_line_width() {
    let mut c = Canvas::new();
    c.set_fill_color(Color::rgb(0.04, 0.14, 0.25));
    c.set_stroke_color(Color::rgb(0.0, 0.83, 1.0));
    c.set_line_width(0.75);
    let output = render(c);
    assert!(output.contains("0.04 0.14 0.25 rg\n"));
    assert!(output.contains("0 0.83 1 RG\n"));
    assert!(output.contains("0.75 w\n"));
}

#[test]
fn line_and_rect_operators() {
    let mut c = Canvas::new();
    c.line(50.0, 770.0, 545.0, 770.0);
    c.rect(30.0, 660.0, 535.0, 20.0);
    c.fill_rect(10.0, 10.0, 5.0, 5.0);
    let output = render(c);
    assert!(output.contains("50 770 m\n545 770 l\nS\n"));
    assert!(output.contains("30 660 535 20 re\nS\n"));
    assert!(output.contains("10 10 5 5 re\nf\n"));
}

#[test]
fn save_restore_state() {
    let mut c = Canvas::new();
    c.save_state();
    c.set_line_width(5.0);
    c.restore_state();
    let output = render(c);
    assert!(output.contains("q\n5 w\nQ\n"));
}

#[test]
fn show_page_starts_new_page() {
    let mut c = Canvas::new();
    c.draw_string(50.0, 800.0, "one");
    c.show_page().unwrap();
    c.draw_string(50.0, 800.0, "two");
    let output = render(c);
    assert!(output.contains("/Count 2"));
    assert!(output.contains("(one) Tj"));
    assert!(output.contains("(two) Tj"));
}

#[test]
fn trailing_blank_page_is_not_emitted() {
    let mut c = Canvas::new();
    c.draw_string(50.0, 800.0, "only");
    c.show_page().unwrap();
    let output = render(c);
    assert!(output.contains("/Count 1"));
}

#[test]
fn font_resets_after_page_break() {
    let mut c = Canvas::new();
    c.set_font(BuiltinFont::HelveticaOblique, 9.0);
    c.show_page().unwrap();
    c.draw_string(1.0, 1.0, "x");
    let output = render(c);
    assert!(output.contains("/F1 12 Tf\n1 1 Td\n(x) Tj"));
}

#[test]
fn rupee_sign_prints_as_rs() {
    let mut c = Canvas::new();
    c.draw_right_string(545.0, 740.0, "\u{20b9}15000.00/mo");
    let output = render(c);
    assert!(output.contains("(Rs.15000.00/mo) Tj"));
}

#[test]
fn compression_hides_operators() {
    let mut c = Canvas::new();
    c.set_compression(true);
    c.draw_string(50.0, 800.0, "compressed text");
    let output = render(c);
    assert!(output.contains("/Filter /FlateDecode"));
    assert!(!output.contains("(compressed text) Tj"));
}

#[test]
fn custom_page_size() {
    let c = Canvas::with_page_size(612.0, 792.0);
    assert_eq!(c.page_size(), (612.0, 792.0));
    let output = render(c);
    assert!(output.contains("/MediaBox [0 0 612 792]"));
}
