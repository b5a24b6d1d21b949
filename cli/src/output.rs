use colored::Colorize;

use gita_backend::cross_refs::TableDrift;
use gita_backend::types::{ChapterInfo, PopularVerseRef, RelatedVerse, VerseKey, VersePage, VideoSourceMap};
use gita_backend::video_sources::{available_video_languages, video_language_label};

pub fn chapter_line(ch: &ChapterInfo) -> String {
    format!("{:>2}. {} ({} verses)", ch.number, ch.title, ch.verse_count)
}

pub fn chapter_details(ch: &ChapterInfo, link_text: &str, popular: &[PopularVerseRef]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", link_text.bold()));
    out.push_str(&format!("{}\n\n", ch.title_hindi));
    out.push_str(&format!("{}\n\n", ch.description));
    out.push_str(&format!("{}\n{}\n", "Summary".bold(), ch.summary));
    out.push_str(&format!("\nTotal Verses: {}\n", ch.verse_count));
    if !popular.is_empty() {
        out.push_str(&format!("\n{}\n", "Key Verses in This Chapter".bold()));
        out.push_str(&popular_lines(ch.number, popular));
    }
    out
}

pub fn popular_lines(chapter: u32, popular: &[PopularVerseRef]) -> String {
    popular
        .iter()
        .map(|p| format!("  {}.{}  {}\n", chapter, p.verse, p.title))
        .collect()
}

pub fn related_lines(related: &[RelatedVerse]) -> String {
    related
        .iter()
        .map(|r| format!("  {}\n    {}\n", r.title, r.reason))
        .collect()
}

/// One line per language, the default marked with '*'.
pub fn video_lines(sources: &VideoSourceMap, default_language: Option<&str>) -> String {
    if sources.is_empty() {
        return "  Coming Soon\n".to_string();
    }
    available_video_languages(sources)
        .iter()
        .map(|code| {
            let marker = if Some(code.as_str()) == default_language { "*" } else { " " };
            let src = &sources[code];
            format!("{} {}  {}  {}\n", marker, video_language_label(code), src.video_id, src.title)
        })
        .collect()
}

fn nav_text(key: Option<VerseKey>) -> String {
    match key {
        Some(k) => k.to_string(),
        None => "-".to_string(),
    }
}

pub fn verse_page(page: &VersePage) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format!("Chapter {}, Verse {} - {}", page.key.chapter, page.key.verse, page.chapter.title).bold()
    ));
    out.push_str(&format!("{}\n{}\n\n", "Sanskrit Shloka".bold(), page.content.sanskrit));
    out.push_str(&format!("{}\n{}\n\n", "Romanized Transliteration".bold(), page.content.romanized));
    out.push_str(&format!("{}\n{}\n\n", "English Translation".bold(), page.content.english));
    out.push_str(&format!("{}\n{}\n\n", "Word-by-Word Translation".bold(), page.content.word_by_word));

    out.push_str(&format!("{}\n", "Video Commentary".bold()));
    out.push_str(&video_lines(&page.videos, page.default_video_language.as_deref()));

    out.push_str(&format!(
        "\nCurrent: {} of {}\n",
        page.key.verse, page.chapter.verse_count
    ));
    out.push_str(&format!(
        "Previous Verse: {}   Next Verse: {}\n",
        nav_text(page.adjacent.previous_verse),
        nav_text(page.adjacent.next_verse),
    ));

    if !page.popular_verses.is_empty() {
        out.push_str(&format!("\n{}\n", "Key Verses in This Chapter".bold()));
        out.push_str(&popular_lines(page.key.chapter, &page.popular_verses));
    }
    if !page.related_verses.is_empty() {
        out.push_str(&format!("\n{}\n", "Related Verses".bold()));
        out.push_str(&related_lines(&page.related_verses));
    }
    out
}

pub fn drift_lines(drift: &[TableDrift]) -> String {
    drift
        .iter()
        .map(|d| match d.source_chapter {
            Some(c) => format!("  {} (chapter {}): {}\n", d.table, c, d.target),
            None => format!("  {}: {}\n", d.table, d.target),
        })
        .collect()
}

/// Collapse consecutive verses of a chapter into ranges: "2.1-72, 3.5".
pub fn key_ranges(keys: &[VerseKey]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = keys.iter().peekable();

    while let Some(start) = iter.next() {
        let mut end = *start;
        while let Some(next) = iter.peek() {
            if next.chapter == end.chapter && next.verse == end.verse + 1 {
                end = **next;
                iter.next();
            } else {
                break;
            }
        }
        if end == *start {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end.verse));
        }
    }

    parts.join(", ")
}
