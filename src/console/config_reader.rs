// Reading of the console settings and of the wizard drafts.

use std::path::PathBuf;

use crate::console::*;

const DEFAULT_DATA_DIR: &str = ".elecon";
const DEFAULT_USER_ID: &str = "current-user";

/// The content of the --config file. All the entries are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleSettings {
    pub data_dir: Option<String>,
    pub user_id: Option<String>,
    pub ratios: Option<ConsolidationRatios>,
}

/// The settings after applying the command line and the defaults.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub user_id: String,
    pub ratios: ConsolidationRatios,
}

/// An election draft as written in a JSON file.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct DraftFile {
    #[serde(flatten)]
    pub draft: ElectionDraft,
    #[serde(default)]
    pub candidates: Vec<CandidateInput>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> ConsoleResult<T> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_settings(path: &str) -> ConsoleResult<ConsoleSettings> {
    read_json(path)
}

pub fn read_draft(path: &str) -> ConsoleResult<DraftFile> {
    read_json(path)
}

pub fn read_summary(path: &str) -> ConsoleResult<JSValue> {
    read_json(path)
}

/// Command line first, then the config file, then the defaults.
pub fn resolve_settings(args: &Args) -> ConsoleResult<Settings> {
    let file_settings = match &args.config {
        Some(p) => read_settings(p)?,
        None => ConsoleSettings::default(),
    };
    let data_dir = args
        .data_dir
        .clone()
        .or(file_settings.data_dir)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    Ok(Settings {
        data_dir: PathBuf::from(data_dir),
        user_id: file_settings
            .user_id
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        ratios: file_settings.ratios.unwrap_or_default(),
    })
}
