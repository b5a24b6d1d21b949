pub mod types;
pub mod app_settings;
pub mod logger;
pub mod chapters;
pub mod verse_index;
pub mod content_store;
pub mod video_sources;
pub mod cross_refs;
pub mod app_data;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;

use app_dirs::{get_app_root, AppDataType, AppInfo};
use dotenvy::dotenv;

pub use app_data::AppData;

pub const APP_INFO: AppInfo = AppInfo{name: "gita", author: "gita-gyanaam"};

/// The data directory holding settings, content, the video registry and logs.
///
/// Precedence:
/// - GITA_DIR env var (a .env file is loaded first)
/// - the per-user data dir
pub fn get_create_gita_dir() -> Result<PathBuf, Box<dyn Error>> {
    dotenv().ok();

    let p = match env::var("GITA_DIR") {
        Ok(s) if !s.is_empty() => PathBuf::from(s),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)?,
    };

    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}
