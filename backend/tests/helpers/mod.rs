use std::env;
use std::sync::Once;

use gita_backend::AppData;
use gita_backend::app_settings::AppSettings;
use gita_backend::content_store::MemoryContentStore;
use gita_backend::types::{VerseContent, VerseKey, VideoSource};
use gita_backend::video_sources::VideoRegistry;

static DISABLE_LOG: Once = Once::new();

/// Keep the global logger away from the per-user data dir.
pub fn disable_log() {
    DISABLE_LOG.call_once(|| {
        unsafe { env::set_var("DISABLE_LOG", "true"); }
    });
}

#[allow(dead_code)]
pub fn sample_content(key: VerseKey) -> VerseContent {
    VerseContent {
        sanskrit: format!("श्लोक {}", key),
        romanized: format!("śloka {}", key),
        english: format!("Translation of verse {}", key),
        word_by_word: format!("words of {}", key),
    }
}

#[allow(dead_code)]
pub fn video(key: VerseKey, lang: &str) -> VideoSource {
    VideoSource {
        video_id: format!("vid-{}-{}", key, lang),
        title: format!("Bhagavad Gita {} ({})", key, lang),
    }
}

/// Content for every verse of chapters 1, 2 and 18, videos for a few verses.
#[allow(dead_code)]
pub fn app_data_setup() -> AppData {
    app_data_with_settings(AppSettings::default())
}

#[allow(dead_code)]
pub fn app_data_with_settings(settings: AppSettings) -> AppData {
    disable_log();
    let counts = [(1, 47), (2, 72), (18, 78)];
    let store: MemoryContentStore = counts
        .iter()
        .flat_map(|(c, n)| (1..=*n).map(move |v| VerseKey::new(*c, v)))
        .map(|k| (k, sample_content(k)))
        .collect();

    let mut videos = VideoRegistry::new();
    let k = VerseKey::new(2, 47);
    videos.insert(k, "hi", video(k, "hi"));
    videos.insert(k, "en", video(k, "en"));
    let k = VerseKey::new(18, 66);
    videos.insert(k, "ta", video(k, "ta"));
    videos.insert(k, "bn", video(k, "bn"));

    AppData::from_parts(settings, Box::new(store), videos).expect("embedded tables")
}
