//! # Rendering Module
//!
//! Turns library results into terminal text. Every function returns a `String`
//! and takes the [`Palette`] to use, so tests render with colors off and assert
//! on plain text.
//!
//! Layout (width, truncation, padding) is computed here with `unicode-width`,
//! since card names are free text and may contain wide characters.

use super::styles::Palette;
use cardvaultapp::commands::stats::CollectionStats;
use cardvaultapp::commands::{CmdMessage, MessageLevel};
use cardvaultapp::model::CardRecord;
use cardvaultapp::reconcile::ReconcileReport;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const TYPE_WIDTH: usize = 18;

/// One line per card: id, name and author, types, age.
pub fn render_card_list(cards: &[CardRecord], palette: &Palette) -> String {
    if cards.is_empty() {
        return format!("{}\n", palette.muted.apply_to("No cards found."));
    }

    let id_width = cards.iter().map(|c| c.id.as_str().width()).max().unwrap_or(0);
    let fixed_width = 2 + id_width + 2 + 2 + TYPE_WIDTH + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);

    let mut out = String::new();
    for card in cards {
        let id = card.id.as_str();
        let id_padding = " ".repeat(id_width.saturating_sub(id.width()));

        let title = format!("{} by {}", card.fields.name, card.fields.author);
        let title = truncate_to_width(&title, available);
        let title_padding = " ".repeat(available.saturating_sub(title.width()));

        let types = truncate_to_width(&type_label(card), TYPE_WIDTH);
        let types_padding = " ".repeat(TYPE_WIDTH.saturating_sub(types.width()));

        out.push_str(&format!(
            "  {}{}  {}{}  {}{}{}\n",
            palette.id.apply_to(id),
            id_padding,
            palette.title.apply_to(title),
            title_padding,
            palette.label.apply_to(types),
            types_padding,
            palette.muted.apply_to(format_time_ago(card.created_at)),
        ));
    }
    out
}

/// Every field of one card.
pub fn render_card(card: &CardRecord, palette: &Palette) -> String {
    let fields = &card.fields;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        palette.title.apply_to(&fields.name),
        palette.id.apply_to(card.id.as_str())
    ));
    out.push_str(&format!(
        "{}\n\n",
        palette.muted.apply_to(format!("by {}", fields.author))
    ));

    let mut row = |label: &str, value: String| {
        out.push_str(&format!(
            "  {:<12} {}\n",
            palette.label.apply_to(label),
            value
        ));
    };
    row("Type", type_label(card));
    row(
        "Stats",
        format!(
            "HP {}  ATK {}  DEF {}",
            palette.stat.apply_to(fields.hp),
            palette.stat.apply_to(fields.attack),
            palette.stat.apply_to(fields.defense)
        ),
    );
    if let Some(weakness) = &fields.weakness {
        row("Weakness", weakness.clone());
    }
    if let Some(resistance) = &fields.resistance {
        row("Resistance", resistance.clone());
    }
    row(
        "Ability",
        format!("{}: {}", fields.ability_name, fields.ability_description),
    );
    if let Some(image) = &fields.image {
        row("Image", truncate_to_width(image, LINE_WIDTH - 16));
    }
    row("Created", card.created_at.to_rfc3339());
    row("Updated", card.updated_at.to_rfc3339());
    if let Some(imported_at) = fields.imported_at {
        row("Imported", imported_at.to_rfc3339());
    }

    out.push('\n');
    out.push_str(&format!("  {}\n", fields.description));
    out
}

pub fn render_stats(stats: &CollectionStats, palette: &Palette) -> String {
    let mut out = String::new();
    let mut row = |label: &str, value: String| {
        out.push_str(&format!("{:<10} {}\n", palette.label.apply_to(label), value));
    };

    row("Cards", palette.stat.apply_to(stats.total_cards).to_string());
    row(
        "Authors",
        count_and_names(stats.author_count, &stats.authors, palette),
    );
    row(
        "Types",
        count_and_names(stats.type_count, &stats.types, palette),
    );
    if let Some(oldest) = &stats.oldest {
        row("Oldest", describe_dated(oldest));
    }
    if let Some(newest) = &stats.newest {
        row("Newest", describe_dated(newest));
    }
    out
}

fn count_and_names(count: usize, names: &[String], palette: &Palette) -> String {
    if names.is_empty() {
        return palette.stat.apply_to(count).to_string();
    }
    format!(
        "{} ({})",
        palette.stat.apply_to(count),
        palette.muted.apply_to(names.join(", "))
    )
}

fn describe_dated(card: &CardRecord) -> String {
    format!(
        "{} ({})",
        card.fields.name,
        card.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// Startup recoveries worth telling the user about, if any.
pub fn render_reconcile(report: &ReconcileReport, palette: &Palette) -> String {
    let mut messages = Vec::new();
    if report.restored > 0 {
        messages.push(CmdMessage::success(format!(
            "Restored {} card(s) from the backup mirror",
            report.restored
        )));
    }
    if report.migrated > 0 {
        messages.push(CmdMessage::success(format!(
            "Recovered {} card(s) missing from the store",
            report.migrated
        )));
    }
    if report.failed > 0 {
        messages.push(CmdMessage::warning(format!(
            "{} card(s) could not be recovered from the backup mirror",
            report.failed
        )));
    }
    render_messages(&messages, palette)
}

pub fn render_messages(messages: &[CmdMessage], palette: &Palette) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &palette.info,
            MessageLevel::Success => &palette.success,
            MessageLevel::Warning => &palette.warning,
            MessageLevel::Error => &palette.error,
        };
        out.push_str(&format!("{}\n", style.apply_to(&message.content)));
    }
    out
}

fn type_label(card: &CardRecord) -> String {
    card.fields.types().collect::<Vec<_>>().join("/")
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvaultapp::model::{CardFields, CardId};
    use chrono::{Duration, TimeZone};

    fn plain() -> Palette {
        Palette::new(false)
    }

    fn make_card(id: &str, name: &str) -> CardRecord {
        let created_at = Utc::now() - Duration::hours(2);
        CardRecord {
            id: CardId::from(id),
            created_at,
            updated_at: created_at,
            fields: CardFields {
                name: name.to_string(),
                author: "Ash".to_string(),
                type1: "Fire".to_string(),
                type2: Some("Flying".to_string()),
                ..CardFields::default()
            },
        }
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_card_list(&[], &plain()), "No cards found.\n");
    }

    #[test]
    fn list_line_has_id_title_types_and_age() {
        let output = render_card_list(&[make_card("abc123", "Blaze")], &plain());
        assert!(output.starts_with("  abc123  Blaze by Ash"));
        assert!(output.contains("Fire/Flying"));
        assert!(output.contains("hours ago"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn list_lines_are_aligned_across_id_widths() {
        let output = render_card_list(
            &[make_card("a", "One"), make_card("abcdef", "Two")],
            &plain(),
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0].find("One"), lines[1].find("Two"));
        assert_eq!(lines[0].width(), lines[1].width());
    }

    #[test]
    fn long_names_are_truncated_to_line_width() {
        let long = "W".repeat(300);
        let output = render_card_list(&[make_card("x", &long)], &plain());
        assert!(output.contains('…'));
        assert!(output.trim_end().width() <= LINE_WIDTH);
    }

    #[test]
    fn card_detail_shows_all_sections() {
        let mut card = make_card("abc", "Blaze");
        card.fields.weakness = Some("Water".to_string());
        card.fields.image = Some("https://example.test/blaze.png".to_string());
        let output = render_card(&card, &plain());

        assert!(output.starts_with("Blaze  abc\nby Ash\n"));
        assert!(output.contains("Fire/Flying"));
        assert!(output.contains("HP 60  ATK 40  DEF 30"));
        assert!(output.contains("Water"));
        assert!(!output.contains("Resistance"));
        assert!(output.contains("Special Ability: An amazing ability!"));
        assert!(output.contains("https://example.test/blaze.png"));
        assert!(output.contains("A mysterious creature"));
    }

    #[test]
    fn stats_list_authors_and_dates() {
        let mut oldest = make_card("a", "Old");
        oldest.created_at = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 0).unwrap();
        let stats = CollectionStats {
            total_cards: 2,
            author_count: 1,
            authors: vec!["Ash".to_string()],
            type_count: 2,
            types: vec!["Fire".to_string(), "Flying".to_string()],
            oldest: Some(oldest),
            newest: None,
        };
        let output = render_stats(&stats, &plain());

        assert!(output.contains("Cards      2"));
        assert!(output.contains("1 (Ash)"));
        assert!(output.contains("2 (Fire, Flying)"));
        assert!(output.contains("Old (2023-01-02 03:04)"));
        assert!(!output.contains("Newest"));
    }

    #[test]
    fn messages_render_one_per_line() {
        let messages = vec![
            CmdMessage::success("Card saved: Blaze"),
            CmdMessage::warning("Skipped 1 entry"),
        ];
        assert_eq!(
            render_messages(&messages, &plain()),
            "Card saved: Blaze\nSkipped 1 entry\n"
        );
    }

    #[test]
    fn quiet_reconcile_renders_nothing() {
        assert!(render_reconcile(&ReconcileReport::default(), &plain()).is_empty());
    }

    #[test]
    fn reconcile_recoveries_are_reported() {
        let report = ReconcileReport {
            restored: 3,
            ..ReconcileReport::default()
        };
        assert_eq!(
            render_reconcile(&report, &plain()),
            "Restored 3 card(s) from the backup mirror\n"
        );
    }

    #[test]
    fn truncate_respects_wide_characters() {
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let formatted = format_time_ago(Utc::now() - Duration::days(3));
        assert_eq!(formatted.len(), TIME_WIDTH);
        assert!(formatted.ends_with("days ago"));
    }
}
