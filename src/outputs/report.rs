//! Report layout.
//!
//! Turns articles and their summaries into an ordered list of [`Block`]s
//! plus a [`PageHeader`] that the PDF painter repeats on every page. Keeping
//! the layout separate from painting lets the report structure be checked
//! without decoding PDF content streams.
//!
//! # Structure
//!
//! ```text
//! [header]      AI News Summarizer Report / Topic / Generated on
//! Total Articles Found: N
//! Article 1               (blue bar)
//!   Title / Description / Source & Date / URL
//! AI Generated Summary 1  (green bar)
//!   Generated Headline / Summary / Tags
//! ----------------------- (divider, not after the last pair)
//! Article 2 ...
//! ```
//!
//! Every string is passed through [`clean_for_output`] here.

use crate::models::{Article, Summary};
use crate::text::{clean_for_output, combine_and_trim};
use chrono::NaiveDateTime;
use itertools::Itertools;

pub const REPORT_TITLE: &str = "AI News Summarizer Report";

const GENERATED_AT_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// Background of the "Article i" bar.
pub const ARTICLE_FILL: (u8, u8, u8) = (230, 243, 252);
/// Background of the "AI Generated Summary i" bar.
pub const SUMMARY_FILL: (u8, u8, u8) = (234, 250, 241);

/// Lines printed centered at the top of every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub title: String,
    pub topic: String,
    pub generated_on: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Bold single line, e.g. the article count.
    Line(String),
    /// Section bar with a filled background.
    Section { text: String, fill: (u8, u8, u8) },
    /// Bold field label such as `Title:`.
    Label(String),
    /// Wrapped body text.
    Paragraph(String),
    /// Vertical space in millimetres.
    Gap(f32),
    /// Grey horizontal rule between article/summary pairs.
    Divider,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub header: PageHeader,
    pub body: Vec<Block>,
}

/// Lay out the report for `topic`.
///
/// Articles and summaries are paired by position; an article without a
/// matching summary is not rendered.
pub fn build_layout(
    articles: &[Article],
    summaries: &[Summary],
    topic: &str,
    generated_at: NaiveDateTime,
) -> ReportLayout {
    let header = PageHeader {
        title: clean_for_output(REPORT_TITLE),
        topic: clean_for_output(&format!("Topic: {}", topic)),
        generated_on: clean_for_output(&format!(
            "Generated on: {}",
            generated_at.format(GENERATED_AT_FORMAT)
        )),
    };

    let mut body = vec![
        Block::Line(format!("Total Articles Found: {}", articles.len())),
        Block::Gap(5.0),
    ];

    for (idx, (article, summary)) in articles.iter().zip(summaries).enumerate() {
        let idx = idx + 1;
        push_article(&mut body, article, summary, idx);
        if idx < articles.len() {
            body.push(Block::Divider);
            body.push(Block::Gap(5.0));
        }
    }

    ReportLayout { header, body }
}

fn push_field(body: &mut Vec<Block>, label: &str, value: &str, gap: f32) {
    body.push(Block::Label(label.to_string()));
    body.push(Block::Paragraph(clean_for_output(value)));
    body.push(Block::Gap(gap));
}

fn push_article(body: &mut Vec<Block>, article: &Article, summary: &Summary, idx: usize) {
    body.push(Block::Section {
        text: format!("Article {}", idx),
        fill: ARTICLE_FILL,
    });
    body.push(Block::Gap(2.0));
    push_field(body, "Title:", &article.title, 2.0);
    push_field(
        body,
        "Description:",
        &combine_and_trim(&article.description, &article.content),
        2.0,
    );
    push_field(
        body,
        "Source & Date:",
        &format!("{} | {}", article.source, summary.date),
        2.0,
    );
    push_field(body, "URL:", &article.url, 5.0);

    body.push(Block::Section {
        text: format!("AI Generated Summary {}", idx),
        fill: SUMMARY_FILL,
    });
    body.push(Block::Gap(2.0));
    push_field(body, "Generated Headline:", &summary.headline, 2.0);
    push_field(body, "Summary:", &summary.summary, 2.0);
    push_field(body, "Tags:", &summary.tags.iter().join(", "), 8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// All body text in order, one entry per text-bearing block.
    fn texts(layout: &ReportLayout) -> Vec<&str> {
        layout
            .body
            .iter()
            .filter_map(|block| match block {
                Block::Line(t) | Block::Label(t) | Block::Paragraph(t) => Some(t.as_str()),
                Block::Section { text, .. } => Some(text.as_str()),
                Block::Gap(_) | Block::Divider => None,
            })
            .collect()
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn pair(n: usize) -> (Article, Summary) {
        (
            Article {
                title: format!("Electric Vehicles surge {n}"),
                description: "EV sales rise".to_string(),
                content: "... [+120 chars]".to_string(),
                source: "Reuters".to_string(),
                published_at: "2024-03-05T14:30:00Z".to_string(),
                url: format!("https://example.com/{n}"),
            },
            Summary {
                headline: "EV Sales Soar".to_string(),
                summary: "Sales rose sharply.".to_string(),
                tags: vec!["EV".to_string(), "Sales".to_string(), "Growth".to_string()],
                source: "Reuters".to_string(),
                date: "March 05, 2024 at 02:30 PM".to_string(),
            },
        )
    }

    #[test]
    fn test_header() {
        let layout = build_layout(&[], &[], "electric vehicles", at());
        assert_eq!(layout.header.title, "AI News Summarizer Report");
        assert_eq!(layout.header.topic, "Topic: electric vehicles");
        assert_eq!(
            layout.header.generated_on,
            "Generated on: March 05, 2024 at 02:30 PM"
        );
    }

    #[test]
    fn test_zero_articles_has_count_and_no_sections() {
        let layout = build_layout(&[], &[], "nothing", at());
        let texts = texts(&layout);
        assert_eq!(texts, vec!["Total Articles Found: 0"]);
        assert!(!layout.body.iter().any(|b| matches!(b, Block::Section { .. } | Block::Divider)));
    }

    #[test]
    fn test_sections_in_order_with_dividers_between() {
        let (articles, summaries): (Vec<_>, Vec<_>) = (1..=3).map(pair).unzip();
        let layout = build_layout(&articles, &summaries, "electric vehicles", at());

        let sections: Vec<&str> = layout
            .body
            .iter()
            .filter_map(|b| match b {
                Block::Section { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sections,
            vec![
                "Article 1",
                "AI Generated Summary 1",
                "Article 2",
                "AI Generated Summary 2",
                "Article 3",
                "AI Generated Summary 3",
            ]
        );

        let dividers = layout.body.iter().filter(|b| **b == Block::Divider).count();
        assert_eq!(dividers, 2);
        let last_divider = layout.body.iter().rposition(|b| *b == Block::Divider).unwrap();
        let last_section = layout
            .body
            .iter()
            .rposition(|b| matches!(b, Block::Section { text, .. } if text == "Article 3"))
            .unwrap();
        assert!(last_divider < last_section);
    }

    #[test]
    fn test_article_fields() {
        let (article, summary) = pair(1);
        let layout = build_layout(&[article], &[summary], "electric vehicles", at());
        let texts = texts(&layout);

        assert!(texts.contains(&"Total Articles Found: 1"));
        assert!(texts.contains(&"Electric Vehicles surge 1"));
        assert!(texts.contains(&"EV sales rise."));
        assert!(texts.contains(&"Reuters | March 05, 2024 at 02:30 PM"));
        assert!(texts.contains(&"https://example.com/1"));
        assert!(texts.contains(&"EV Sales Soar"));
        assert!(texts.contains(&"Sales rose sharply."));
        assert!(texts.contains(&"EV, Sales, Growth"));
        assert!(!layout.body.contains(&Block::Divider));
    }

    #[test]
    fn test_text_is_cleaned_for_output() {
        let (mut article, mut summary) = pair(1);
        article.title = "Tesla’s “record” quarter 🚗".to_string();
        summary.headline = "Café owners react".to_string();
        let layout = build_layout(&[article], &[summary], "tesla ✓", at());

        assert_eq!(layout.header.topic, "Topic: tesla ");
        for text in texts(&layout) {
            assert!(text.chars().all(|c| (c as u32) <= 0xFF), "{text:?}");
        }
        let texts = texts(&layout);
        assert!(texts.contains(&"Teslas record quarter "));
        assert!(texts.contains(&"Cafe owners react"));
    }
}
