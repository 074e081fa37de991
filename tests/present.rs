use cramer::{
    Capabilities, CramerError, DisplayMode, Matrix, RichMathSink, SINGULAR_NOTICE, ShapeError,
    SolutionValue, TextSink, parse_matrix, parse_vector, present,
};

fn system(a: &str, b: &str) -> (Matrix, Matrix) {
    (
        parse_matrix(a).expect("parse A"),
        parse_vector(b).expect("parse b"),
    )
}

fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).expect("utf-8 output")
}

#[test]
fn text_sink_prints_label_then_derivation() {
    let (a, b) = system("[[2, 1], [1, 3]]", "[3, 5]");
    let mut sink = TextSink::new(Vec::new());
    let values = present(&a, &b, true, &mut sink).expect("present");

    let text = output(sink.into_inner());
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("LaTeX solution:"));
    assert_eq!(lines.next(), Some(r"\begin{aligned}"));
    assert!(text.trim_end().ends_with(r"\end{aligned}"));
    assert_eq!(values.map(|v| v.len()), Some(2));
}

#[test]
fn rich_sink_wraps_markup_in_display_math() {
    let (a, b) = system("[[2, 1], [1, 3]]", "[3, 5]");
    let mut sink = RichMathSink::new(Vec::new());
    present(&a, &b, false, &mut sink).expect("present");

    let text = output(sink.into_inner());
    assert!(text.starts_with("EVCXR_BEGIN_CONTENT text/latex\n$$\n\\begin{aligned}"));
    assert!(text.ends_with("\\end{aligned}\n$$\nEVCXR_END_CONTENT\n"));
    assert!(!text.contains("LaTeX solution:"));
}

#[test]
fn singular_system_emits_notice_and_returns_none() {
    let (a, b) = system("[[1, 2], [2, 4]]", "[3, 6]");

    let mut text = TextSink::new(Vec::new());
    assert_eq!(present(&a, &b, true, &mut text).expect("present"), None);
    assert_eq!(output(text.into_inner()), format!("{SINGULAR_NOTICE}\n"));

    let mut rich = RichMathSink::new(Vec::new());
    assert_eq!(present(&a, &b, true, &mut rich).expect("present"), None);
    assert!(output(rich.into_inner()).contains(SINGULAR_NOTICE));
}

#[test]
fn numeric_values_are_returned() {
    let (a, b) = system("[[2, 1], [1, 3]]", "[3, 5]");
    let mut sink = TextSink::new(Vec::new());
    let values = present(&a, &b, false, &mut sink)
        .expect("present")
        .expect("unique solution");
    assert_eq!(values, vec![SolutionValue::Float(0.8), SolutionValue::Float(1.4)]);
}

#[test]
fn shape_errors_write_nothing() {
    let (a, b) = system("[[1, 2, 3], [4, 5, 6]]", "[1, 2]");
    let mut sink = TextSink::new(Vec::new());
    let err = present(&a, &b, true, &mut sink).unwrap_err();

    assert!(matches!(
        err,
        CramerError::Shape(ShapeError::NotSquare { rows: 2, cols: 3 })
    ));
    assert!(sink.into_inner().is_empty());
}

#[test]
fn display_mode_overrides_runtime_detection() {
    let rich: DisplayMode = "latex".parse().expect("mode");
    let text: DisplayMode = "plain".parse().expect("mode");
    let auto: DisplayMode = "".parse().expect("mode");

    assert!(Capabilities::from_mode(rich, false).has_rich_display);
    assert!(!Capabilities::from_mode(text, true).has_rich_display);
    assert!(Capabilities::from_mode(auto, true).has_rich_display);
    assert!(!Capabilities::from_mode(auto, false).has_rich_display);
    assert!(matches!(
        "hologram".parse::<DisplayMode>(),
        Err(CramerError::Config(_))
    ));
}
