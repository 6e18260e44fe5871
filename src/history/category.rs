use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "Image File")]
    ImageFile,
    #[serde(rename = "Document")]
    Document,
    #[serde(rename = "Spreadsheet")]
    Spreadsheet,
    #[serde(rename = "Audio File")]
    AudioFile,
    #[serde(rename = "Video File")]
    VideoFile,
    #[serde(rename = "Text")]
    Text,
}

const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp"];
const DOCUMENT_SUFFIXES: &[&str] = &[".txt", ".pdf", ".doc", ".docx", ".md"];
const SPREADSHEET_SUFFIXES: &[&str] = &[".xlsx", ".xls"];
const AUDIO_SUFFIXES: &[&str] = &[".wav", ".mp3"];
const VIDEO_SUFFIXES: &[&str] = &[".mp4", ".mov", ".mkv"];

/// Classify clipboard content. First matching rule wins; matching is
/// case-sensitive, so `"PHOTO.PNG"` is plain text.
pub fn categorize(content: &str) -> Category {
    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| content.ends_with(s));

    if content.starts_with("http://") || content.starts_with("https://") {
        Category::Url
    } else if ends_with_any(IMAGE_SUFFIXES) {
        Category::ImageFile
    } else if ends_with_any(DOCUMENT_SUFFIXES) {
        Category::Document
    } else if ends_with_any(SPREADSHEET_SUFFIXES) {
        Category::Spreadsheet
    } else if ends_with_any(AUDIO_SUFFIXES) {
        Category::AudioFile
    } else if ends_with_any(VIDEO_SUFFIXES) {
        Category::VideoFile
    } else {
        Category::Text
    }
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Url,
        Self::ImageFile,
        Self::Document,
        Self::Spreadsheet,
        Self::AudioFile,
        Self::VideoFile,
        Self::Text,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::ImageFile => "Image File",
            Self::Document => "Document",
            Self::Spreadsheet => "Spreadsheet",
            Self::AudioFile => "Audio File",
            Self::VideoFile => "Video File",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// Category restriction applied on top of the substring filter. Persisted as
/// `"All"` or a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn allows(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }

    /// All, then each category in turn, then back to All.
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Only(Category::ALL[0]),
            Self::Only(current) => Category::ALL
                .iter()
                .position(|c| c == current)
                .and_then(|i| Category::ALL.get(i + 1))
                .map_or(Self::All, |c| Self::Only(*c)),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "All" {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}
