//! Minimal PDF 1.4 writer for laid-out pages.
//!
//! Uses the three standard Type1 Helvetica faces with WinAnsiEncoding, so no
//! font embedding is needed. Object layout:
//! `1` catalog, `2` page tree, then a page + content stream pair per page,
//! then one object per font face and finally the info dictionary.

use chrono::{DateTime, Utc};

use crate::layout::flow::{DrawOp, PageLayout, Rgb};
use crate::layout::font_metrics::FontFace;

pub const PRODUCER: &str = "cv-builder";

#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn write_pdf(layout: &PageLayout, metadata: &PdfMetadata) -> Vec<u8> {
    let page_count = layout.pages.len();
    let font_obj_start = 3 + page_count * 2;
    let info_obj_id = font_obj_start + FontFace::ALL.len();

    let mut objects: Vec<String> = Vec::with_capacity(info_obj_id);
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..page_count)
        .map(|index| format!("{} 0 R", 3 + index * 2))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));

    let font_resources: Vec<String> = FontFace::ALL
        .iter()
        .enumerate()
        .map(|(offset, face)| format!("/{} {} 0 R", face.resource_name(), font_obj_start + offset))
        .collect();
    let font_resources = font_resources.join(" ");

    for (index, page) in layout.pages.iter().enumerate() {
        let content_obj_id = 4 + index * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources << /Font << {} >> >> >>",
            layout.width_pt, layout.height_pt, content_obj_id, font_resources
        ));
        let stream = content_stream(&page.ops);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    for face in FontFace::ALL {
        objects.push(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            face.base_font()
        ));
    }

    let mut info = format!(
        "<< /Title ({}) /Producer ({PRODUCER}) /Creator ({PRODUCER})",
        escape_pdf_string(&metadata.title)
    );
    if let Some(created_at) = metadata.created_at {
        info.push_str(&format!(
            " /CreationDate ({})",
            created_at.format("D:%Y%m%d%H%M%SZ")
        ));
    }
    info.push_str(" >>");
    objects.push(info);

    serialize(&objects, info_obj_id)
}

fn serialize(objects: &[String], info_obj_id: usize) -> Vec<u8> {
    let mut pdf = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n");
    pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut xref_positions = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(b"xref\n");
    pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for pos in &xref_positions {
        pdf.extend_from_slice(format!("{pos:010} 00000 n \n").as_bytes());
    }

    pdf.extend_from_slice(b"trailer\n");
    pdf.extend_from_slice(
        format!(
            "<< /Size {} /Root 1 0 R /Info {} 0 R >>\n",
            xref_positions.len() + 1,
            info_obj_id
        )
        .as_bytes(),
    );
    pdf.extend_from_slice(format!("startxref\n{xref_start}\n%%EOF\n").as_bytes());
    pdf
}

fn content_stream(ops: &[DrawOp]) -> String {
    let mut stream = String::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                stream.push_str(&format!(
                    "BT /{} {:.1} Tf {} rg {:.2} {:.2} Td ({}) Tj ET\n",
                    face.resource_name(),
                    size,
                    color_operands(*color),
                    x,
                    y,
                    escape_pdf_string(text)
                ));
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                stream.push_str(&format!(
                    "{} RG {:.1} w {:.2} {:.2} m {:.2} {:.2} l S\n",
                    color_operands(*color),
                    width,
                    x1,
                    y,
                    x2,
                    y
                ));
            }
        }
    }
    stream
}

fn color_operands(Rgb(r, g, b): Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0
    )
}

/// Escapes a string for a PDF literal, mapping characters onto WinAnsiEncoding.
/// Characters the encoding cannot represent become `?`.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' | '\r' | '\t' => result.push(' '),
            ' '..='~' => result.push(c),
            _ => match win_ansi_code(c) {
                Some(code) => result.push_str(&format!("\\{code:03o}")),
                None => result.push('?'),
            },
        }
    }
    result
}

fn win_ansi_code(c: char) -> Option<u8> {
    match c {
        '\u{20ac}' => Some(0x80),
        '\u{201a}' => Some(0x82),
        '\u{201e}' => Some(0x84),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2122}' => Some(0x99),
        '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).ok(),
        _ => None,
    }
}
