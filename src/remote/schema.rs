//! Output schemas and prompts for each remote game kind.

use serde_json::json;

use crate::puzzle_engine::{GameKind, MISSING_MARKER};
use crate::remote::service::ContentRequest;

pub const GRID_CELLS: usize = 25;
pub const STORY_PROBLEM_COUNT: usize = 4;
pub const STORY_OPERAND_MAX: i64 = 20;
pub const PICTURE_BATCH: usize = 5;
pub const PICTURE_COUNT_MAX: u32 = 9;

const SYSTEM_PROMPT: &str = "You write short, friendly puzzles for children aged 4 to 7. \
    Reply with JSON that matches the given schema exactly and nothing else.";

pub fn pattern_grid() -> ContentRequest {
    ContentRequest {
        game: GameKind::PatternGrid,
        schema_name: "pattern_grid",
        schema: json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "grid": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "minItems": GRID_CELLS,
                    "maxItems": GRID_CELLS
                },
                "answer": { "type": "integer" }
            },
            "required": ["title", "grid", "answer"],
            "additionalProperties": false
        }),
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!(
            "Make a 5 by 5 number pattern, row by row, as {GRID_CELLS} integers. \
             Replace exactly one number with {MISSING_MARKER} and give the replaced number as `answer`."
        ),
    }
}

pub fn story_problems(theme: &str) -> ContentRequest {
    ContentRequest {
        game: GameKind::StoryProblems,
        schema_name: "story_problems",
        schema: json!({
            "type": "object",
            "properties": {
                "problems": {
                    "type": "array",
                    "minItems": STORY_PROBLEM_COUNT,
                    "maxItems": STORY_PROBLEM_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "operands": {
                                "type": "array",
                                "items": { "type": "integer" },
                                "minItems": 2,
                                "maxItems": 2
                            },
                            "operator": { "type": "string", "enum": ["+", "-"] },
                            "answer": { "type": "integer" }
                        },
                        "required": ["question", "operands", "operator", "answer"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["problems"],
            "additionalProperties": false
        }),
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!(
            "Write {STORY_PROBLEM_COUNT} one-sentence word problems about \"{theme}\". \
             Use numbers from 0 to {STORY_OPERAND_MAX}; subtraction must not go below zero."
        ),
    }
}

/// One request per picture; `count` is fixed by the caller.
pub fn picture(count: u32) -> ContentRequest {
    ContentRequest {
        game: GameKind::PictureCount,
        schema_name: "picture",
        schema: json!({
            "type": "object",
            "properties": {
                "label": { "type": "string" },
                "icon": { "type": "string" },
                "count": { "type": "integer", "minimum": 1, "maximum": PICTURE_COUNT_MAX }
            },
            "required": ["label", "icon", "count"],
            "additionalProperties": false
        }),
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!(
            "Name one everyday thing a child can count, give a single emoji for it, \
             and set `count` to {count}."
        ),
    }
}
