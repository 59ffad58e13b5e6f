use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
};

/// How the rendered document is handed to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Saved as a local file.
    #[default]
    Download,
    /// Opened in a viewer.
    View,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PdfOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mode: OutputMode,
}

impl OutputMode {
    pub fn disposition(&self) -> &'static str {
        match self {
            OutputMode::Download => "attachment",
            OutputMode::View => "inline",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Download => "download",
            OutputMode::View => "view",
        })
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "download" => Ok(OutputMode::Download),
            "view" => Ok(OutputMode::View),
            s => Err(format!("unsupported output mode {s:?}")),
        }
    }
}

impl PdfOutput {
    pub fn new(project_name: &str, bytes: Vec<u8>, mode: OutputMode) -> Self {
        Self {
            file_name: file_name_for(project_name),
            bytes,
            mode,
        }
    }

    /// The value for a `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        format!("{}; filename=\"{}\"", self.mode.disposition(), self.file_name)
    }
}

/// Derives a portable file name from a project name.
pub fn file_name_for(project_name: &str) -> String {
    let stem = project_name
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        "record.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
