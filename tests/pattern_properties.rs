//! Property checks for the diamond generator.
//!
//! These pin the observable laws of the layout: odd row counts, palindromic
//! widths stepping by 2, left-only padding of exactly (m - width) / 2, and a
//! cursor that advances one alphabet position per row.

use newsdesk::pattern::{as_block, build_diamond, requested_lines, ALPHABET, MAX_LINES};

fn expected_row_count(n: i32) -> usize {
    if n % 2 == 1 { n as usize } else { (n + 1) as usize }
}

#[test]
fn non_positive_inputs_yield_empty_output() {
    for n in [-100, -1, 0] {
        assert!(build_diamond(n).is_empty(), "n = {}", n);
        assert_eq!(as_block(n), "");
    }
}

#[test]
fn row_count_is_the_request_rounded_up_to_odd() {
    for n in 1..=(MAX_LINES + 1) {
        let rows = build_diamond(n);
        assert_eq!(rows.len(), expected_row_count(n), "n = {}", n);
        assert_eq!(rows.len() % 2, 1, "n = {}", n);
    }
}

#[test]
fn widths_are_palindromic_and_step_by_two() {
    for n in [1, 2, 5, 10, 33, 100] {
        let rows = build_diamond(n);
        let m = rows.len();
        let widths: Vec<usize> = rows.iter().map(|r| r.trim_start().len()).collect();

        let reversed: Vec<usize> = widths.iter().rev().copied().collect();
        assert_eq!(widths, reversed, "n = {}", n);

        let mid = m / 2;
        for i in 0..mid {
            assert_eq!(widths[i + 1], widths[i] + 2, "n = {}, i = {}", n, i);
        }
        assert_eq!(widths[mid], m, "middle row spans the full width");
    }
}

#[test]
fn rows_are_left_padded_by_half_the_width_deficit() {
    // m and width are both always odd, so m - width is even and the integer
    // division is exact for every m up to the clamp ceiling.
    for n in 1..=(MAX_LINES + 1) {
        let rows = build_diamond(n);
        let m = rows.len();
        for (i, row) in rows.iter().enumerate() {
            let width = row.trim_start().len();
            assert_eq!((m - width) % 2, 0, "n = {}, row {}", n, i);
            let pad = (m - width) / 2;
            assert_eq!(row.len(), pad + width, "n = {}, row {}", n, i);
            assert!(!row.ends_with(' '), "no right padding: n = {}, row {}", n, i);
        }
    }
}

#[test]
fn cursor_advances_one_alphabet_position_per_row() {
    let alphabet = ALPHABET.as_bytes();
    let rows = build_diamond(25);
    for (i, row) in rows.iter().enumerate() {
        let first = row.trim_start().as_bytes()[0];
        assert_eq!(first, alphabet[i % alphabet.len()], "row {}", i);
    }
}

#[test]
fn generation_is_idempotent() {
    for n in [1, 4, 19, 100] {
        assert_eq!(build_diamond(n), build_diamond(n));
        assert_eq!(as_block(n), build_diamond(n).join("\n"));
    }
}

#[test]
fn known_small_diamonds() {
    assert_eq!(build_diamond(1), vec!["F"]);
    assert_eq!(build_diamond(3), vec![" F", "ORM", " R"]);

    let five = build_diamond(4);
    let widths: Vec<usize> = five.iter().map(|r| r.trim_start().len()).collect();
    assert_eq!(widths, vec![1, 3, 5, 3, 1]);
}

#[test]
fn caller_side_parse_defaults_and_clamps() {
    assert_eq!(requested_lines(None), 1);
    assert_eq!(requested_lines(Some("")), 1);
    assert_eq!(requested_lines(Some("twelve")), 1);
    assert_eq!(requested_lines(Some("2.5")), 1);
    assert_eq!(requested_lines(Some("50")), 50);
    assert_eq!(requested_lines(Some("101")), 100);
    assert_eq!(requested_lines(Some("-40")), 1);
}
