//! Report assembly tests.

use playcall::CommentaryReport;

#[test]
fn empty_report_renders_empty() {
    let report = CommentaryReport::new();
    assert!(report.is_empty());
    assert_eq!(report.len(), 0);
    assert_eq!(report.render(), "");
}

#[test]
fn sections_are_numbered_from_one() {
    let mut report = CommentaryReport::new();
    report.push("kickoff");
    report.push("midfield battle");
    report.push("shot on goal");

    let ordinals: Vec<usize> = report
        .sections()
        .iter()
        .map(|section| section.ordinal)
        .collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
}

#[test]
fn render_emits_one_labeled_block_per_section() {
    let mut report = CommentaryReport::new();
    report.push("kickoff");
    report.push("shot on goal");

    let text = report.render();
    assert_eq!(
        text,
        "Frame 1 Commentary:\nkickoff\n\nFrame 2 Commentary:\nshot on goal\n\n"
    );
}

#[test]
fn render_orders_sections_ascending() {
    let mut report = CommentaryReport::new();
    for index in 0..5 {
        report.push(format!("play {index}"));
    }

    let text = report.render();
    let mut last_position = 0;
    for ordinal in 1..=5 {
        let label = format!("Frame {ordinal} Commentary:");
        let position = text.find(&label).expect("label should be present");
        assert!(
            position >= last_position,
            "sections out of order: {label} at {position}",
        );
        last_position = position;
    }
}

#[test]
fn display_matches_render() {
    let mut report = CommentaryReport::new();
    report.push("kickoff");
    assert_eq!(format!("{report}"), report.render());
}
