//! Remote puzzle generation through a structured-output content service.
//!
//! ## Flow
//!
//! 1. Build the request(s) for the game from `schema`.
//! 2. Send them once through a [`ContentService`]. PictureCount sends a fixed
//!    batch of five and awaits them together.
//! 3. Run the reply through `validate`. Every check must pass.
//! 4. On any service or validation failure, return the game's hand-authored
//!    puzzle from `fallback` together with a [`Notice`] for the user.
//!
//! The only error returned to the caller is a request problem that stops the
//! generation before anything is sent (a blank theme, or a local game kind).

pub mod fallback;
pub mod schema;
pub mod service;
pub mod validate;

use std::fmt;

use futures::future::join_all;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{GenerateError, ValidationError};
use crate::puzzle_engine::{
    generator::{make_puzzle_id, request_rng},
    helpers::{pairing, puzzle},
    shuffle, GameKind, PuzzleBody, PuzzleInstance, PuzzleRequest, PuzzleSource,
};

pub use service::{ContentRequest, ContentService, HttpContentService, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteGame {
    PatternGrid,
    StoryProblems,
    PictureCount,
}

impl RemoteGame {
    pub const ALL: [RemoteGame; 3] = [RemoteGame::PatternGrid, RemoteGame::StoryProblems, RemoteGame::PictureCount];
}

impl From<RemoteGame> for GameKind {
    fn from(game: RemoteGame) -> Self {
        match game {
            RemoteGame::PatternGrid   => GameKind::PatternGrid,
            RemoteGame::StoryProblems => GameKind::StoryProblems,
            RemoteGame::PictureCount  => GameKind::PictureCount,
        }
    }
}

impl TryFrom<GameKind> for RemoteGame {
    type Error = GenerateError;

    fn try_from(game: GameKind) -> Result<Self, Self::Error> {
        match game {
            GameKind::PatternGrid   => Ok(RemoteGame::PatternGrid),
            GameKind::StoryProblems => Ok(RemoteGame::StoryProblems),
            GameKind::PictureCount  => Ok(RemoteGame::PictureCount),
            other => Err(GenerateError::NotRemote(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    RateLimited,
    Unavailable,
}

/// Non-blocking message shown when a fallback puzzle was substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn for_failure(failure: &RemoteFailure) -> Self {
        match failure {
            RemoteFailure::Service(err) if err.is_rate_limited() => Notice {
                kind: NoticeKind::RateLimited,
                message: "The puzzle helper is busy right now. Here is a ready-made puzzle instead.".to_string(),
            },
            _ => Notice {
                kind: NoticeKind::Unavailable,
                message: "We couldn't make a new puzzle. Here is a ready-made one instead.".to_string(),
            },
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A generated puzzle plus the notice to show, if it is a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub puzzle: PuzzleInstance,
    pub notice: Option<Notice>,
}

#[derive(Debug, Error)]
enum RemoteFailure {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

async fn pattern_grid<S: ContentService>(service: &S, puzzle_id: String) -> Result<PuzzleInstance, RemoteFailure> {
    let reply = service.complete(&schema::pattern_grid()).await?;
    let (title, sheet) = validate::pattern_grid(&reply)?;
    Ok(puzzle(puzzle_id, GameKind::PatternGrid, title, PuzzleSource::Remote, PuzzleBody::Pattern(sheet)))
}

async fn story_problems<S: ContentService>(service: &S, theme: &str, puzzle_id: String) -> Result<PuzzleInstance, RemoteFailure> {
    let reply = service.complete(&schema::story_problems(theme)).await?;
    let sheet = validate::story_problems(&reply)?;
    let title = format!("Story problems: {theme}");
    Ok(puzzle(puzzle_id, GameKind::StoryProblems, title, PuzzleSource::Remote, PuzzleBody::Arithmetic(sheet)))
}

async fn picture_count<S: ContentService, R: Rng>(service: &S, rng: &mut R, puzzle_id: String) -> Result<PuzzleInstance, RemoteFailure> {
    let counts: Vec<u32> = shuffle::permutation(rng, 1, schema::PICTURE_COUNT_MAX as u8)
        .into_iter()
        .take(schema::PICTURE_BATCH)
        .map(u32::from)
        .collect();
    let requests: Vec<ContentRequest> = counts.iter().map(|&c| schema::picture(c)).collect();

    // The batch stands or falls as a unit.
    let replies = join_all(requests.iter().map(|r| service.complete(r)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    let assets = validate::picture_batch(&replies, &counts)?;

    let base = assets
        .into_iter()
        .map(|a| (a.icon.repeat(a.count as usize), i64::from(a.count)))
        .collect();
    let sheet = pairing(rng, base);
    Ok(puzzle(puzzle_id, GameKind::PictureCount, "Count the pictures", PuzzleSource::Remote, PuzzleBody::Pairing(sheet)))
}

/// Generate a remote game kind, falling back to its default puzzle on any failure.
pub async fn generate_remote<S: ContentService>(
    service: &S,
    request: &PuzzleRequest,
) -> Result<GenerationOutcome, GenerateError> {
    let game = RemoteGame::try_from(request.game)?;

    let theme = request.theme.as_deref().map(str::trim).unwrap_or_default();
    if game == RemoteGame::StoryProblems && theme.is_empty() {
        return Err(GenerateError::MissingTheme(request.game));
    }

    let mut rng = request_rng(request);
    let puzzle_id = make_puzzle_id(request.game, &mut rng);
    debug!(game = %request.game, puzzle_id = %puzzle_id, "requesting remote puzzle");

    let attempt = match game {
        RemoteGame::PatternGrid   => pattern_grid(service, puzzle_id).await,
        RemoteGame::StoryProblems => story_problems(service, theme, puzzle_id).await,
        RemoteGame::PictureCount  => picture_count(service, &mut rng, puzzle_id).await,
    };

    match attempt {
        Ok(puzzle) => Ok(GenerationOutcome { puzzle, notice: None }),
        Err(failure) => {
            warn!(game = %request.game, error = %failure, "remote generation failed, using fallback puzzle");
            let notice = Notice::for_failure(&failure);
            Ok(GenerationOutcome { puzzle: fallback::default_puzzle(game), notice: Some(notice) })
        }
    }
}
