//! All-or-nothing checks that turn a service reply into a puzzle body.
//!
//! A payload either passes every check or is rejected whole; nothing here ever
//! returns a partially filled sheet.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::puzzle_engine::{
    helpers::{problem, problem_id},
    ArithmeticSheet, Operator, PatternGridSheet, Term, MISSING_MARKER,
};
use crate::remote::schema::{GRID_CELLS, PICTURE_COUNT_MAX, STORY_OPERAND_MAX, STORY_PROBLEM_COUNT};

fn parse<T: for<'de> Deserialize<'de>>(value: &Value) -> Result<T, ValidationError> {
    T::deserialize(value).map_err(|e| ValidationError::Shape(e.to_string()))
}

fn non_empty(field: &'static str, s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawPatternGrid {
    title: String,
    grid: Vec<i64>,
    answer: i64,
}

pub fn pattern_grid(value: &Value) -> Result<(String, PatternGridSheet), ValidationError> {
    let raw: RawPatternGrid = parse(value)?;
    non_empty("title", &raw.title)?;

    if raw.grid.len() != GRID_CELLS {
        return Err(ValidationError::Length { field: "grid", expected: GRID_CELLS, actual: raw.grid.len() });
    }
    let found = raw.grid.iter().filter(|&&v| v == MISSING_MARKER).count();
    if found != 1 {
        return Err(ValidationError::Sentinel { field: "grid", found });
    }
    if let Some(&bad) = raw.grid.iter().find(|&&v| v < 0 && v != MISSING_MARKER) {
        return Err(ValidationError::OutOfRange { field: "grid", value: bad });
    }
    if raw.answer < 0 {
        return Err(ValidationError::OutOfRange { field: "answer", value: raw.answer });
    }

    let cells = raw.grid.into_iter().map(|v| (v != MISSING_MARKER).then_some(v)).collect();
    Ok((raw.title, PatternGridSheet { size: 5, cells, answer: raw.answer }))
}

#[derive(Deserialize)]
struct RawStoryProblems {
    problems: Vec<RawStoryProblem>,
}

#[derive(Deserialize)]
struct RawStoryProblem {
    question: String,
    operands: Vec<i64>,
    operator: Operator,
    answer: i64,
}

fn operand(value: i64) -> Result<u32, ValidationError> {
    if (0..=STORY_OPERAND_MAX).contains(&value) {
        u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field: "operands", value })
    } else {
        Err(ValidationError::OutOfRange { field: "operands", value })
    }
}

pub fn story_problems(value: &Value) -> Result<ArithmeticSheet, ValidationError> {
    let raw: RawStoryProblems = parse(value)?;
    if raw.problems.len() != STORY_PROBLEM_COUNT {
        return Err(ValidationError::Length {
            field: "problems",
            expected: STORY_PROBLEM_COUNT,
            actual: raw.problems.len(),
        });
    }

    let mut problems = Vec::with_capacity(STORY_PROBLEM_COUNT);
    for (i, p) in raw.problems.into_iter().enumerate() {
        non_empty("question", &p.question)?;
        let &[a, b] = p.operands.as_slice() else {
            return Err(ValidationError::Length { field: "operands", expected: 2, actual: p.operands.len() });
        };
        let (a, b) = (operand(a)?, operand(b)?);
        let computed = match p.operator {
            Operator::Plus  => i64::from(a) + i64::from(b),
            Operator::Minus => i64::from(a) - i64::from(b),
        };
        if computed < 0 {
            return Err(ValidationError::OutOfRange { field: "answer", value: computed });
        }
        if p.answer != computed {
            return Err(ValidationError::WrongAnswer { index: i, stated: p.answer, computed });
        }
        let terms = vec![Term { op: Operator::Plus, value: a }, Term { op: p.operator, value: b }];
        problems.push(problem(problem_id(i), Some(p.question), terms));
    }
    Ok(ArithmeticSheet { problems })
}

/// One validated picture from the PictureCount batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureAsset {
    pub label: String,
    pub icon: String,
    pub count: u32,
}

#[derive(Deserialize)]
struct RawPicture {
    label: String,
    icon: String,
    count: i64,
}

/// Validate one picture against the count it was requested with.
pub fn picture(value: &Value, requested: u32) -> Result<PictureAsset, ValidationError> {
    let raw: RawPicture = parse(value)?;
    non_empty("label", &raw.label)?;
    non_empty("icon", &raw.icon)?;
    if raw.count != i64::from(requested) || !(1..=i64::from(PICTURE_COUNT_MAX)).contains(&raw.count) {
        return Err(ValidationError::OutOfRange { field: "count", value: raw.count });
    }
    Ok(PictureAsset { label: raw.label.trim().to_string(), icon: raw.icon.trim().to_string(), count: requested })
}

/// Validate a whole batch; one bad picture rejects all of them.
pub fn picture_batch(values: &[Value], requested: &[u32]) -> Result<Vec<PictureAsset>, ValidationError> {
    if values.len() != requested.len() {
        return Err(ValidationError::Length { field: "pictures", expected: requested.len(), actual: values.len() });
    }
    let assets = values
        .iter()
        .zip(requested)
        .map(|(v, &count)| picture(v, count))
        .collect::<Result<Vec<_>, _>>()?;

    let mut labels = HashSet::new();
    for asset in &assets {
        if !labels.insert(asset.label.to_lowercase()) {
            return Err(ValidationError::Duplicate { field: "label", value: asset.label.clone() });
        }
    }
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid_with_marker_at(i: usize, len: usize) -> Vec<i64> {
        (0..len).map(|k| if k == i { MISSING_MARKER } else { k as i64 + 1 }).collect()
    }

    #[test]
    fn pattern_grid_accepts_well_formed_payload() {
        let value = json!({ "title": "Count on", "grid": grid_with_marker_at(7, 25), "answer": 8 });
        let (title, sheet) = pattern_grid(&value).expect("valid");
        assert_eq!(title, "Count on");
        assert_eq!(sheet.missing_index(), Some(7));
        assert_eq!(sheet.answer, 8);
    }

    #[test]
    fn pattern_grid_rejects_short_grid() {
        let value = json!({ "title": "Count on", "grid": grid_with_marker_at(7, 24), "answer": 8 });
        assert_eq!(
            pattern_grid(&value),
            Err(ValidationError::Length { field: "grid", expected: 25, actual: 24 })
        );
    }

    #[test]
    fn pattern_grid_requires_exactly_one_marker() {
        let mut grid = grid_with_marker_at(3, 25);
        grid[4] = MISSING_MARKER;
        let value = json!({ "title": "t", "grid": grid, "answer": 4 });
        assert_eq!(pattern_grid(&value), Err(ValidationError::Sentinel { field: "grid", found: 2 }));

        let value = json!({ "title": "t", "grid": (1..=25).collect::<Vec<i64>>(), "answer": 4 });
        assert_eq!(pattern_grid(&value), Err(ValidationError::Sentinel { field: "grid", found: 0 }));
    }

    #[test]
    fn pattern_grid_rejects_missing_field() {
        let value = json!({ "grid": grid_with_marker_at(0, 25), "answer": 1 });
        assert!(matches!(pattern_grid(&value), Err(ValidationError::Shape(_))));
    }

    fn story(op: &str, a: i64, b: i64, answer: i64) -> Value {
        json!({ "question": "How many?", "operands": [a, b], "operator": op, "answer": answer })
    }

    #[test]
    fn story_problems_accept_consistent_arithmetic() {
        let value = json!({ "problems": [
            story("+", 2, 3, 5), story("-", 7, 2, 5), story("+", 0, 0, 0), story("-", 4, 4, 0),
        ]});
        let sheet = story_problems(&value).expect("valid");
        assert_eq!(sheet.problems.len(), 4);
        assert_eq!(sheet.problems[1].answer, 5);
        assert_eq!(sheet.problems[1].prompt.as_deref(), Some("How many?"));
    }

    #[test]
    fn story_problems_reject_wrong_answer_and_unknown_operator() {
        let value = json!({ "problems": [
            story("+", 2, 3, 6), story("+", 1, 1, 2), story("+", 1, 1, 2), story("+", 1, 1, 2),
        ]});
        assert_eq!(
            story_problems(&value),
            Err(ValidationError::WrongAnswer { index: 0, stated: 6, computed: 5 })
        );

        let value = json!({ "problems": [
            story("*", 2, 3, 6), story("+", 1, 1, 2), story("+", 1, 1, 2), story("+", 1, 1, 2),
        ]});
        assert!(matches!(story_problems(&value), Err(ValidationError::Shape(_))));
    }

    #[test]
    fn story_problems_reject_negative_difference() {
        let value = json!({ "problems": [
            story("-", 2, 3, -1), story("+", 1, 1, 2), story("+", 1, 1, 2), story("+", 1, 1, 2),
        ]});
        assert_eq!(story_problems(&value), Err(ValidationError::OutOfRange { field: "answer", value: -1 }));
    }

    #[test]
    fn picture_batch_rejects_wrong_count_and_duplicates() {
        let ok = |label: &str, count: u32| json!({ "label": label, "icon": "🍎", "count": count });
        assert!(picture_batch(&[ok("apples", 2), ok("pears", 3)], &[2, 3]).is_ok());
        assert_eq!(
            picture_batch(&[ok("apples", 2), ok("pears", 4)], &[2, 3]),
            Err(ValidationError::OutOfRange { field: "count", value: 4 })
        );
        assert_eq!(
            picture_batch(&[ok("apples", 2), ok("Apples", 3)], &[2, 3]),
            Err(ValidationError::Duplicate { field: "label", value: "Apples".into() })
        );
    }
}
