//! Flow layout: places a document tree onto fixed-size pages.
//!
//! Lines are wrapped with the static Helvetica metrics and the flow breaks to a
//! new page whenever the next line would cross into the footer area. Section
//! headings are kept with at least two lines of their content. The projector
//! never paginates; this is the only place page boundaries exist.

use crate::layout::font_metrics::{get_metrics, FontFace, PageConfig};
use crate::layout::tree::{Block, DocumentTree, EntryBlock, Section, SectionKind, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const BRAND_BLUE: Rgb = Rgb(0x1e, 0x40, 0xaf);
const ACCENT_BLUE: Rgb = Rgb(0x25, 0x63, 0xeb);
const PALE_BLUE: Rgb = Rgb(0xdb, 0xea, 0xfe);
const SLATE: Rgb = Rgb(0x64, 0x74, 0x8b);
const SLATE_DARK: Rgb = Rgb(0x47, 0x55, 0x69);
const INK: Rgb = Rgb(0x1f, 0x29, 0x37);
const BODY_GRAY: Rgb = Rgb(0x37, 0x41, 0x51);
const MUTED_GRAY: Rgb = Rgb(0x6b, 0x72, 0x80);
const LIGHT_GRAY: Rgb = Rgb(0x9c, 0xa3, 0xaf);
const FOOTER_GRAY: Rgb = Rgb(0x94, 0xa3, 0xb8);
const FOOTER_RULE: Rgb = Rgb(0xe2, 0xe8, 0xf0);

const TAG_SEPARATOR: &str = "  \u{b7}  ";

/// A single drawing instruction in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

impl LaidOutPage {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width_pt: f32,
    pub height_pt: f32,
    pub pages: Vec<LaidOutPage>,
}

impl PageLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct FontStyle {
    face: FontFace,
    size: f32,
    color: Rgb,
}

impl FontStyle {
    const fn new(face: FontFace, size: f32, color: Rgb) -> Self {
        FontStyle { face, size, color }
    }
}

const HEADING: FontStyle = FontStyle::new(FontFace::Bold, 16.0, BRAND_BLUE);
const ENTRY_TITLE: FontStyle = FontStyle::new(FontFace::Bold, 12.0, INK);
const ENTRY_SUBTITLE: FontStyle = FontStyle::new(FontFace::Oblique, 11.0, MUTED_GRAY);
const ENTRY_DETAIL: FontStyle = FontStyle::new(FontFace::Regular, 10.0, LIGHT_GRAY);
const ENTRY_DATE: FontStyle = FontStyle::new(FontFace::Bold, 10.0, SLATE);
const DESCRIPTION: FontStyle = FontStyle::new(FontFace::Regular, 10.0, BODY_GRAY);
const TAG: FontStyle = FontStyle::new(FontFace::Regular, 9.0, BRAND_BLUE);
const GROUP_LABEL: FontStyle = FontStyle::new(FontFace::Bold, 10.0, INK);
const LINK: FontStyle = FontStyle::new(FontFace::Regular, 10.0, ACCENT_BLUE);
const FOOTER: FontStyle = FontStyle::new(FontFace::Regular, 8.0, FOOTER_GRAY);

fn font_style(style: TextStyle) -> FontStyle {
    match style {
        TextStyle::Name => FontStyle::new(FontFace::Bold, 24.0, BRAND_BLUE),
        TextStyle::Headline => FontStyle::new(FontFace::Oblique, 14.0, SLATE),
        TextStyle::Contact => FontStyle::new(FontFace::Regular, 10.0, SLATE_DARK),
        TextStyle::Summary => FontStyle::new(FontFace::Regular, 11.0, BODY_GRAY),
        TextStyle::Body => DESCRIPTION,
        TextStyle::Notice => FontStyle::new(FontFace::Regular, 12.0, BODY_GRAY),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    config: &'a PageConfig,
    pages: Vec<LaidOutPage>,
    current: LaidOutPage,
    /// Top of the next line, in points from the page bottom.
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Cursor {
            config,
            pages: Vec::new(),
            current: LaidOutPage::default(),
            y: config.page_height_pt - config.margin_pt,
        }
    }

    fn top(&self) -> f32 {
        self.config.page_height_pt - self.config.margin_pt
    }

    fn bottom(&self) -> f32 {
        self.config.margin_pt + self.config.footer_height_pt
    }

    fn left(&self) -> f32 {
        self.config.margin_pt
    }

    fn right(&self) -> f32 {
        self.config.page_width_pt - self.config.margin_pt
    }

    fn line_height(&self, font: FontStyle) -> f32 {
        font.size * self.config.line_height
    }

    /// Starts a new page unless `height` still fits. A fresh page always accepts
    /// content, so oversized blocks cannot loop forever.
    fn ensure(&mut self, height: f32) {
        let fresh = (self.y - self.top()).abs() < f32::EPSILON;
        if !fresh && self.y - height < self.bottom() {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = self.top();
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    fn push_text(&mut self, x: f32, baseline: f32, font: FontStyle, text: &str) {
        self.current.ops.push(DrawOp::Text {
            x,
            y: baseline,
            face: font.face,
            size: font.size,
            color: font.color,
            text: text.to_string(),
        });
    }

    fn rule(&mut self, width: f32, color: Rgb) {
        let (x1, x2, y) = (self.left(), self.right(), self.y);
        self.current.ops.push(DrawOp::Rule {
            x1,
            x2,
            y,
            width,
            color,
        });
    }

    /// One unwrapped line at `x`.
    fn line_at(&mut self, x: f32, font: FontStyle, text: &str) {
        let height = self.line_height(font);
        self.ensure(height);
        let baseline = self.y - font.size;
        self.push_text(x, baseline, font, text);
        self.y -= height;
    }

    /// Wrapped paragraph(s) across the full text width. Newlines start new paragraphs.
    fn paragraph(&mut self, font: FontStyle, text: &str) {
        self.paragraph_within(font, text, self.config.text_width_pt());
    }

    fn paragraph_within(&mut self, font: FontStyle, text: &str, width: f32) {
        let metrics = get_metrics(font.face);
        for raw in text.lines() {
            if raw.trim().is_empty() {
                self.gap(self.line_height(font) * 0.5);
                continue;
            }
            for line in metrics.wrap(raw, font.size, width) {
                let x = self.left();
                self.line_at(x, font, &line);
            }
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.pages.push(self.current);
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

pub fn flow_document(tree: &DocumentTree, config: &PageConfig) -> PageLayout {
    let mut cursor = Cursor::new(config);
    let links = tree.section(SectionKind::Links);

    for section in &tree.sections {
        match section.kind {
            SectionKind::Header => flow_header(&mut cursor, section, links),
            SectionKind::Links => {}
            _ => flow_section(&mut cursor, section),
        }
    }

    let mut pages = cursor.finish();
    if let Some(footer) = &tree.footer {
        for page in &mut pages {
            draw_footer(page, config, footer);
        }
    }

    PageLayout {
        width_pt: config.page_width_pt,
        height_pt: config.page_height_pt,
        pages,
    }
}

/// Name and headline on the left; contact items and links right-aligned on the right.
fn flow_header(cursor: &mut Cursor<'_>, header: &Section, links: Option<&Section>) {
    let start = cursor.y;

    let mut right_lines: Vec<(FontStyle, String)> = Vec::new();
    for block in &header.blocks {
        if let Block::Text { style, text } = block {
            match style {
                TextStyle::Contact => right_lines.push((font_style(*style), text.clone())),
                _ => {
                    let font = font_style(*style);
                    let x = cursor.left();
                    cursor.line_at(x, font, text);
                }
            }
        }
    }
    for block in links.map(|section| section.blocks.as_slice()).unwrap_or_default() {
        if let Block::Link { label, url } = block {
            right_lines.push((LINK, format!("{label}: {url}")));
        }
    }
    let left_end = cursor.y;

    cursor.y = start;
    for (font, text) in &right_lines {
        let width = get_metrics(font.face).width_pt(text, font.size);
        let x = (cursor.right() - width).max(cursor.left());
        cursor.line_at(x, *font, text);
    }

    cursor.y = cursor.y.min(left_end);
    cursor.gap(10.0);
    cursor.rule(2.0, ACCENT_BLUE);
    cursor.gap(20.0);
}

fn flow_section(cursor: &mut Cursor<'_>, section: &Section) {
    if let Some(heading) = &section.heading {
        // Keep the heading with the first lines of its content.
        let keep = cursor.line_height(HEADING) + 2.0 * cursor.line_height(DESCRIPTION);
        cursor.ensure(keep);
        let x = cursor.left();
        cursor.line_at(x, HEADING, heading);
        cursor.rule(1.0, PALE_BLUE);
        cursor.gap(8.0);
    }

    for block in &section.blocks {
        flow_block(cursor, block);
    }
    cursor.gap(15.0);
}

fn flow_block(cursor: &mut Cursor<'_>, block: &Block) {
    match block {
        Block::Text { style, text } => cursor.paragraph(font_style(*style), text),
        Block::Link { label, url } => cursor.paragraph(LINK, &format!("{label}: {url}")),
        Block::Tags { items } => flow_tags(cursor, items),
        Block::Group { label, items } => {
            let x = cursor.left();
            cursor.line_at(x, GROUP_LABEL, label);
            flow_tags(cursor, items);
            cursor.gap(4.0);
        }
        Block::Entry(entry) => flow_entry(cursor, entry),
    }
}

fn flow_tags(cursor: &mut Cursor<'_>, items: &[String]) {
    let width = cursor.config.text_width_pt();
    for line in pack_items(items, TAG, width) {
        let x = cursor.left();
        cursor.line_at(x, TAG, &line);
    }
}

/// Packs whole items onto lines, never splitting a single item.
fn pack_items(items: &[String], font: FontStyle, max_width: f32) -> Vec<String> {
    let metrics = get_metrics(font.face);
    let mut lines = Vec::new();
    let mut current = String::new();

    for item in items {
        let candidate = if current.is_empty() {
            item.clone()
        } else {
            format!("{current}{TAG_SEPARATOR}{item}")
        };
        if !current.is_empty() && metrics.width_pt(&candidate, font.size) > max_width {
            lines.push(std::mem::replace(&mut current, item.clone()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn flow_entry(cursor: &mut Cursor<'_>, entry: &EntryBlock) {
    let title_height = cursor.line_height(ENTRY_TITLE);
    cursor.ensure(title_height + cursor.line_height(ENTRY_SUBTITLE));

    // The date sits right-aligned on the title's first line.
    let date_width = entry
        .date_range
        .as_deref()
        .map(|date| get_metrics(ENTRY_DATE.face).width_pt(date, ENTRY_DATE.size))
        .unwrap_or(0.0);
    if let Some(date) = &entry.date_range {
        let baseline = cursor.y - ENTRY_TITLE.size;
        let x = (cursor.right() - date_width).max(cursor.left());
        cursor.push_text(x, baseline, ENTRY_DATE, date);
    }
    let title_width = (cursor.config.text_width_pt() - date_width - 10.0).max(1.0);
    if entry.title.is_empty() {
        cursor.gap(title_height);
    } else {
        cursor.paragraph_within(ENTRY_TITLE, &entry.title, title_width);
    }

    if let Some(subtitle) = &entry.subtitle {
        cursor.paragraph(ENTRY_SUBTITLE, subtitle);
    }
    for detail in &entry.details {
        cursor.paragraph(ENTRY_DETAIL, detail);
    }
    if let Some(description) = &entry.description {
        cursor.gap(5.0);
        cursor.paragraph(DESCRIPTION, description);
    }
    cursor.gap(12.0);
}

fn draw_footer(page: &mut LaidOutPage, config: &PageConfig, footer: &str) {
    let baseline = config.margin_pt - 10.0;
    page.ops.push(DrawOp::Rule {
        x1: config.margin_pt,
        x2: config.page_width_pt - config.margin_pt,
        y: baseline + FOOTER.size + 5.0,
        width: 1.0,
        color: FOOTER_RULE,
    });
    let width = get_metrics(FOOTER.face).width_pt(footer, FOOTER.size);
    page.ops.push(DrawOp::Text {
        x: ((config.page_width_pt - width) / 2.0).max(config.margin_pt),
        y: baseline,
        face: FOOTER.face,
        size: FOOTER.size,
        color: FOOTER.color,
        text: footer.to_string(),
    });
}
