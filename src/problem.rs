//! Problem files, puzzles and the verification/benchmark harness glue.
//!
//! A problem line is a 64-character board, a side-to-move color, and
//! optionally `% <score>` carrying the known best score:
//!
//! ```text
//! --XXXXX--OOOX-X-...-O X % +38
//! ```
//!
//! The core only commits to `Searcher::solve`; everything here adapts
//! text to positions and results back to report rows.

use crate::board::{Board, ParseError};
use crate::search::{SearchResult, Searcher};

/// A position with an optional known best score to check against.
#[derive(Debug, Clone)]
pub struct Problem {
    pub board: Board,
    pub expected: Option<i32>,
}

/// Parse one problem line. Empty lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Problem>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (body, expected) = match line.split_once('%') {
        Some((body, tail)) => {
            let score = tail.trim().parse::<i32>().ok();
            (body, score)
        }
        None => (line, None),
    };
    let body = body.trim();
    let Some((board_text, color)) = body.rsplit_once(char::is_whitespace) else {
        return Err(ParseError::BadLength(body.chars().filter(|c| !c.is_whitespace()).count()));
    };
    let color_char = color.chars().next().ok_or(ParseError::BadColor(' '))?;
    let board = Board::parse(board_text, color_char)?;
    Ok(Some(Problem { board, expected }))
}

/// Parse a whole problem file; line numbers are 1-based in errors.
pub fn load_problems(text: &str) -> Result<Vec<Problem>, (usize, ParseError)> {
    let mut problems = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(p)) => problems.push(p),
            Ok(None) => {}
            Err(e) => return Err((i + 1, e)),
        }
    }
    Ok(problems)
}

/// Outcome of checking one problem against its known score.
#[derive(Debug)]
pub struct Verification {
    pub result: SearchResult,
    pub expected: Option<i32>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        match self.expected {
            Some(want) => self.result.score == want,
            None => true,
        }
    }
}

/// Solve every problem and compare against the stored scores; this is
/// the reference-database check path.
pub fn verify(searcher: &mut Searcher, problems: &[Problem]) -> Vec<Verification> {
    problems
        .iter()
        .map(|p| Verification {
            result: searcher.solve(&p.board),
            expected: p.expected,
        })
        .collect()
}

/// Fixed-ply benchmark: total nodes and elapsed seconds over a fixture
/// set, for nodes-per-second reporting.
pub fn benchmark(searcher: &mut Searcher, problems: &[Problem]) -> (u64, f64) {
    let start = std::time::Instant::now();
    let mut nodes = 0;
    for p in problems {
        nodes += searcher.solve(&p.board).nodes;
    }
    (nodes, start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    fn start_line(suffix: &str) -> String {
        let mut cells = ['-'; 64];
        cells[27] = 'O';
        cells[28] = 'X';
        cells[35] = 'X';
        cells[36] = 'O';
        let board: String = cells.iter().collect();
        format!("{board} X{suffix}")
    }

    #[test]
    fn parses_board_color_and_score() {
        let p = parse_line(&start_line(" % +2")).unwrap().unwrap();
        assert_eq!(p.board, Board::new(BoardSize::Standard));
        assert_eq!(p.expected, Some(2));
    }

    #[test]
    fn score_tail_is_optional() {
        let p = parse_line(&start_line("")).unwrap().unwrap();
        assert_eq!(p.expected, None);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("# header").unwrap().is_none());
    }

    #[test]
    fn bad_line_reports_its_number() {
        let text = format!("{}\nnot a problem\n", start_line(""));
        let err = load_problems(&text).unwrap_err();
        assert_eq!(err.0, 2);
    }
}
