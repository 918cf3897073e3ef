//! Property tests: random Insert-mode key sequences against a plain
//! `Vec<String>` model, plus the viewport invariants after every step.

mod common;

use common::{TEXT_ROWS, key, open};
use core_events::{Event, KeyCode};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Char(char),
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    fn event(&self) -> Event {
        match self {
            Step::Char(c) => key(KeyCode::Char(*c)),
            Step::Enter => key(KeyCode::Enter),
            Step::Backspace => key(KeyCode::Backspace),
            Step::Up => key(KeyCode::Up),
            Step::Down => key(KeyCode::Down),
            Step::Left => key(KeyCode::Left),
            Step::Right => key(KeyCode::Right),
        }
    }
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => proptest::char::range('a', 'z').prop_map(Step::Char),
        2 => Just(Step::Enter),
        2 => Just(Step::Backspace),
        1 => Just(Step::Up),
        1 => Just(Step::Down),
        1 => Just(Step::Left),
        1 => Just(Step::Right),
    ]
}

/// Straightforward editor over ASCII lines; `col` is 1-based.
#[derive(Debug, Default)]
struct Reference {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Reference {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            row: 0,
            col: 1,
        }
    }

    fn len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, String::len)
    }

    fn apply(&mut self, step: &Step) {
        match step {
            Step::Char(c) => {
                if self.lines.is_empty() {
                    self.lines.push(String::new());
                }
                self.lines[self.row].insert(self.col - 1, *c);
                self.col += 1;
            }
            Step::Enter => {
                if self.lines.is_empty() {
                    self.lines.push(String::new());
                }
                let tail = self.lines[self.row].split_off(self.col - 1);
                self.lines.insert(self.row + 1, tail);
                self.row += 1;
                self.col = 1;
            }
            Step::Backspace => {
                if self.col > 1 {
                    self.lines[self.row].remove(self.col - 2);
                    self.col -= 1;
                } else if self.row > 0 && self.row < self.lines.len() {
                    let tail = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.lines[self.row].len() + 1;
                    self.lines[self.row].push_str(&tail);
                }
            }
            Step::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.len(self.row) + 1);
                }
            }
            Step::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.len(self.row) + 1);
                }
            }
            Step::Left => {
                if self.col > 1 {
                    self.col -= 1;
                }
            }
            Step::Right => {
                if !self.lines.is_empty() && self.col <= self.len(self.row) {
                    self.col += 1;
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn insert_mode_matches_reference(steps in proptest::collection::vec(step(), 0..120)) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open(&dir.path().join("p.txt"));
        session.handle_event(&key(KeyCode::Char('i')));
        let mut reference = Reference::new();

        for s in &steps {
            let top_before = session.model().view().top_row;
            session.handle_event(&s.event());
            reference.apply(s);

            let view = session.model().view();
            prop_assert_eq!(session.model().state().buffer().lines(), reference.lines.as_slice());
            prop_assert_eq!((view.cursor.row, view.cursor.col), (reference.row, reference.col));
            prop_assert!(view.top_row <= view.cursor.row);
            prop_assert!(view.cursor.row < view.top_row + TEXT_ROWS);
            prop_assert!(view.top_row.abs_diff(top_before) <= 1);
        }

        let written = reference.lines.iter().map(|l| format!("{l}\n")).collect::<String>();
        prop_assert_eq!(session.model().state().buffer().content(), written);
    }
}
