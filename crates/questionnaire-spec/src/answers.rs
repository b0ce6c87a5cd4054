use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Metadata of a file picked for a `file` question. The bytes stay on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl FileHandle {
    /// Reads name, size, and a media type guess for a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            media_type: guess_media_type(path).map(String::from),
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|media_type| media_type.starts_with("image/"))
    }
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(media_type)
}

/// Value recorded against one question. `None` in an answer slot means unanswered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Rating(u8),
    Text(String),
    File(FileHandle),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_rating(&self) -> Option<u8> {
        match self {
            Answer::Rating(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Answer::File(file) => Some(file),
            _ => None,
        }
    }

    /// Short human-readable form used by text renderers.
    pub fn display(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::Rating(value) => value.to_string(),
            Answer::File(file) => file.name.clone(),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<u8> for Answer {
    fn from(value: u8) -> Self {
        Answer::Rating(value)
    }
}

impl From<FileHandle> for Answer {
    fn from(value: FileHandle) -> Self {
        Answer::File(value)
    }
}

/// Outcome of checking answers against the required flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Ids of required questions whose slot is still empty, in question order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_serialize_untagged() {
        let answers = vec![Some(Answer::from("hello")), None, Some(Answer::Rating(4))];
        let value = serde_json::to_value(&answers).expect("serialize");
        assert_eq!(value, json!(["hello", null, 4]));
    }

    #[test]
    fn answers_read_back_by_shape() {
        let value = json!(["b", 3, null, {"name": "a.png", "path": "a.png", "size": 10}]);
        let answers: Vec<Option<Answer>> = serde_json::from_value(value).expect("deserialize");
        assert_eq!(answers[0], Some(Answer::Text("b".into())));
        assert_eq!(answers[1], Some(Answer::Rating(3)));
        assert_eq!(answers[2], None);
        match &answers[3] {
            Some(Answer::File(file)) => assert_eq!(file.size, 10),
            other => panic!("expected a file answer, got {other:?}"),
        }
    }

    #[test]
    fn fractional_and_oversized_ratings_are_not_answers() {
        assert!(serde_json::from_value::<Answer>(json!(4.0)).is_err());
        assert!(serde_json::from_value::<Answer>(json!(300)).is_err());
    }

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(guess_media_type(Path::new("photo.JPG")), Some("image/jpeg"));
        assert_eq!(guess_media_type(Path::new("notes")), None);
    }
}
