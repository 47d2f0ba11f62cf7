//! One canonical grid cell and its shape validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GridError, GridResult};

/// A grid slot annotated with the people busy in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub users: Vec<String>,
    #[serde(rename = "numPeople")]
    pub num_people: usize,
}

impl Cell {
    /// A cell occupied by a single person.
    pub fn occupied(id: impl Into<String>, owner: &str) -> Self {
        Cell {
            id: id.into(),
            users: vec![owner.to_string()],
            num_people: 1,
        }
    }

    /// Validate a raw JSON record against the cell shape.
    ///
    /// Requires a non-empty string `id`, a non-empty array of strings `users`
    /// and a non-negative integer `numPeople` equal to the number of users.
    pub fn validate(raw: &Value) -> GridResult<Cell> {
        let obj = raw
            .as_object()
            .ok_or_else(|| GridError::Schema(format!("expected an object, got {}", raw)))?;

        let id = match obj.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::String(_)) => return Err(GridError::Schema("'id' is empty".into())),
            Some(other) => {
                return Err(GridError::Schema(format!("'id' must be a string, got {}", other)));
            }
            None => return Err(GridError::Schema("missing field 'id'".into())),
        };

        let users = match obj.get("users") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|u| {
                    u.as_str().map(str::to_string).ok_or_else(|| {
                        GridError::Schema(format!(
                            "cell '{}': 'users' entries must be strings, got {}",
                            id, u
                        ))
                    })
                })
                .collect::<GridResult<Vec<String>>>()?,
            Some(other) => {
                return Err(GridError::Schema(format!(
                    "cell '{}': 'users' must be an array, got {}",
                    id, other
                )));
            }
            None => return Err(GridError::Schema(format!("cell '{}': missing field 'users'", id))),
        };

        if users.is_empty() {
            return Err(GridError::Schema(format!("cell '{}': 'users' is empty", id)));
        }

        let num_people = match obj.get("numPeople") {
            Some(n) => n.as_u64().ok_or_else(|| {
                GridError::Schema(format!(
                    "cell '{}': 'numPeople' must be a non-negative integer, got {}",
                    id, n
                ))
            })? as usize,
            None => {
                return Err(GridError::Schema(format!(
                    "cell '{}': missing field 'numPeople'",
                    id
                )));
            }
        };

        if num_people != users.len() {
            return Err(GridError::Schema(format!(
                "cell '{}': numPeople is {} but {} users are listed",
                id,
                num_people,
                users.len()
            )));
        }

        Ok(Cell {
            id,
            users,
            num_people,
        })
    }
}
