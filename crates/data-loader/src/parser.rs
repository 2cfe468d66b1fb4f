//! Parsers for the catalog files.
//!
//! - movies.dat: movieId::title::rating::voteCount::genres::keywords::overview
//! - movies.json: array of movie objects
//! - engagements.dat: userId::movieId[::rating]
//!
//! The overview is the last `.dat` field and may itself contain `::`.
//! Genres are pipe-separated in both formats: "Action|Adventure|Drama".

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const MOVIE_FIELDS: usize = 7;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Non-empty, non-comment lines with their 1-based line numbers
fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a movies.dat file
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let content = read_file(path)?;
    parse_movies_str(&content, &file_name(path))
}

/// Parse movies.dat content already in memory.
///
/// `file` is only used for error context.
pub fn parse_movies_str(content: &str, file: &str) -> Result<Vec<MovieRecord>> {
    let mut movies = Vec::new();

    for (line_no, line) in data_lines(content) {
        let parts: Vec<&str> = line.splitn(MOVIE_FIELDS, "::").collect();
        if parts.len() != MOVIE_FIELDS {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!(
                    "expected {} fields but found {}",
                    MOVIE_FIELDS,
                    parts.len()
                ),
            });
        }

        let parse_err = |field: &str, e: &dyn std::fmt::Display| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid {}: {}", field, e),
        };

        let movie = MovieRecord {
            id: parts[0].trim().parse().map_err(|e| parse_err("movieId", &e))?,
            title: parts[1].trim().to_string(),
            rating: parts[2].trim().parse().map_err(|e| parse_err("rating", &e))?,
            vote_count: parts[3]
                .trim()
                .parse()
                .map_err(|e| parse_err("voteCount", &e))?,
            genres: split_genres(parts[4]),
            keywords: parts[5].trim().to_string(),
            overview: parts[6].trim().to_string(),
        };

        movies.push(movie);
    }

    Ok(movies)
}

/// Genres as stored upstream: usually a pipe-joined string, sometimes a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGenres {
    Piped(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
struct RawMovie {
    id: MovieId,
    title: String,
    genres: RawGenres,
    keywords: String,
    overview: String,
    rating: f32,
    vote_count: u32,
}

impl From<RawMovie> for MovieRecord {
    fn from(raw: RawMovie) -> Self {
        let genres = match raw.genres {
            RawGenres::Piped(s) => split_genres(&s),
            RawGenres::List(list) => list
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        };
        MovieRecord {
            id: raw.id,
            title: raw.title,
            genres,
            keywords: raw.keywords,
            overview: raw.overview,
            rating: raw.rating,
            vote_count: raw.vote_count,
        }
    }
}

/// Parse a movies.json file
pub fn parse_movies_json(path: &Path) -> Result<Vec<MovieRecord>> {
    let content = read_file(path)?;
    parse_movies_json_str(&content, &file_name(path))
}

/// Parse a JSON array of movie documents.
///
/// Every field is required; a document missing one fails the whole load.
pub fn parse_movies_json_str(content: &str, file: &str) -> Result<Vec<MovieRecord>> {
    let raw: Vec<RawMovie> =
        serde_json::from_str(content).map_err(|source| DataLoadError::JsonError {
            file: file.to_string(),
            source,
        })?;
    Ok(raw.into_iter().map(MovieRecord::from).collect())
}

/// Parse an engagements.dat file into (user, entry) pairs in file order
pub fn parse_engagements(path: &Path) -> Result<Vec<(UserId, EngagedMovie)>> {
    let content = read_file(path)?;
    parse_engagements_str(&content, &file_name(path))
}

pub fn parse_engagements_str(content: &str, file: &str) -> Result<Vec<(UserId, EngagedMovie)>> {
    let mut engagements = Vec::new();

    for (line_no, line) in data_lines(content) {
        let mut parts = line.split("::");

        let user_id = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing userId".to_string(),
            })?;

        let movie_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing movieId".to_string(),
        })?;

        let movie_id = movie_id
            .trim()
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid movieId: {}", e),
            })?;

        let rating = match parts.next() {
            Some(value) => Some(value.trim().parse().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid rating: {}", e),
            })?),
            None => None,
        };

        engagements.push((user_id.to_string(), EngagedMovie { movie_id, rating }));
    }

    Ok(engagements)
}
