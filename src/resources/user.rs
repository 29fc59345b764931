use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::Resource;
use crate::filter::{FieldKind, QueryField};
use crate::store::{to_document, Document, DocumentId, StoreError};
use crate::validation::{is_email, non_blank, non_empty, positive_integer, Rule};

const AVATAR_BASE_URL: &str = "https://gravatar.com/avatar/";
pub const PLACEHOLDER_AVATAR: &str = "https://gravatar.com/avatar/?d=mp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub age: i64,
    pub company: String,
    pub role: Role,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub company: String,
    pub role: Role,
    pub email: String,
}

#[derive(Serialize)]
struct UserDocument {
    #[serde(flatten)]
    user: NewUser,
    avatar: String,
}

fn is_role(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| s.parse::<Role>().is_ok())
}

impl Resource for User {
    type Draft = NewUser;

    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "user";
    const DEFAULT_SORT: &'static str = "name";

    const QUERY_FIELDS: &'static [QueryField] = &[
        QueryField::new("age", FieldKind::Integer),
        QueryField::new("company", FieldKind::Pattern),
        QueryField::new("role", FieldKind::Exact),
    ];

    const RULES: &'static [Rule] = &[
        Rule::new("name", non_blank, "User must have a non-empty name"),
        Rule::new("email", is_email, "User must have a legal email"),
        Rule::new("age", positive_integer, "User's age must be greater than zero"),
        Rule::new("role", is_role, "User must have a legal role (admin, editor or viewer)"),
        Rule::new("company", non_empty, "User must have a non-empty company"),
    ];

    fn prepare(draft: NewUser) -> Result<Document, StoreError> {
        let avatar = avatar_url(&draft.email);
        to_document(&UserDocument { user: draft, avatar })
    }
}

/// Gravatar identicon URL for an email. Falls back to the placeholder when
/// there is nothing to hash.
pub fn avatar_url(email: &str) -> String {
    match email_digest(email) {
        Some(digest) => format!("{}{}?d=identicon", AVATAR_BASE_URL, digest),
        None => PLACEHOLDER_AVATAR.to_string(),
    }
}

fn email_digest(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some(format!("{:x}", Sha256::digest(normalized.as_bytes())))
}
