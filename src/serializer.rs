/*!
 * Multi-format serializer.
 *
 * Renders styled tokens as plain SRT, styled SRT, WebVTT, ASS/SSA or JSON.
 * Rendering never fails at this boundary: an empty token list yields a
 * sentinel document and invalid style or time data yields a format-valid
 * error document naming the offending token.
 */

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::grouping::{self, OutputGroup};
use crate::styling::{self, FontWeight, StyleDescriptor};
use crate::timecode::{self, TimecodeStyle};
use crate::word_timing::TimedToken;

/// Text of the cue emitted for empty input
pub const EMPTY_SENTINEL: &str = "No subtitle data.";

/// Time span of sentinel and error cues
const PLACEHOLDER_END_MS: u64 = 5_000;

const ASS_SCRIPT_INFO: &str = "[Script Info]\n\
Title: Subtitle\n\
ScriptType: v4.00+\n\
WrapStyle: 0\n\
PlayResX: 1280\n\
PlayResY: 720\n\
ScaledBorderAndShadow: yes\n";

const ASS_STYLES: &str = "[V4+ Styles]\n\
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1\n";

const ASS_EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n";

/// Output grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    PlainSrt,
    #[default]
    StyledSrt,
    Vtt,
    Ass,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::PlainSrt,
        OutputFormat::StyledSrt,
        OutputFormat::Vtt,
        OutputFormat::Ass,
        OutputFormat::Json,
    ];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainSrt | Self::StyledSrt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainSrt | Self::StyledSrt | Self::Ass => "text/plain",
            Self::Vtt => "text/vtt",
            Self::Json => "application/json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainSrt => "plain_srt",
            Self::StyledSrt => "styled_srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
        }
    }

    /// Whether the format carries style information
    pub fn is_styled(&self) -> bool {
        !matches!(self, Self::PlainSrt)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .find(|f| f.as_str() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown output format: {}", s))
    }
}

/// Reduced style object of a JSON record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonStyle {
    #[serde(default = "default_json_color")]
    pub color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub icon: String,
}

fn default_json_color() -> String {
    StyleDescriptor::default().color
}

impl Default for JsonStyle {
    fn default() -> Self {
        JsonStyle {
            color: default_json_color(),
            font_weight: FontWeight::Normal,
            icon: String::new(),
        }
    }
}

/// One token in the JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    pub index: usize,
    pub start_time: String,
    pub end_time: String,
    #[serde(alias = "text")]
    pub word: String,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub style: JsonStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_icons: Vec<String>,
}

/// Render tokens to a string, never failing
pub fn render(tokens: &[TimedToken], format: OutputFormat, grouped: bool) -> String {
    if tokens.is_empty() {
        debug!("No tokens to render, emitting {} sentinel", format);
        return empty_document(format);
    }

    match try_render(tokens, format, grouped) {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to render {}: {}", format, e);
            error_document(format, &e)
        }
    }
}

/// Render tokens to bytes
pub fn serialize(tokens: &[TimedToken], format: OutputFormat, grouped: bool) -> Vec<u8> {
    render(tokens, format, grouped).into_bytes()
}

/// Render tokens, reporting the first invalid token
pub fn try_render(tokens: &[TimedToken], format: OutputFormat, grouped: bool) -> Result<String, RenderError> {
    for (i, token) in tokens.iter().enumerate() {
        check_token(token, i + 1, format)?;
    }

    // JSON is one record per token whatever the grouping
    let groups = grouping::group_tokens(tokens, grouped && format != OutputFormat::Json);
    match format {
        OutputFormat::PlainSrt => Ok(render_srt(&groups, false)),
        OutputFormat::StyledSrt => Ok(render_srt(&groups, true)),
        OutputFormat::Vtt => Ok(render_vtt(&groups)),
        OutputFormat::Ass => Ok(render_ass(&groups)),
        OutputFormat::Json => render_json(tokens),
    }
}

fn check_token(token: &TimedToken, position: usize, format: OutputFormat) -> Result<(), RenderError> {
    if token.end_ms < token.start_ms {
        return Err(RenderError::InvalidTimeRange {
            start_ms: token.start_ms,
            end_ms: token.end_ms,
            position,
        });
    }
    if format.is_styled() {
        if let Some(style) = &token.style {
            if styling::parse_hex_rgb(&style.color).is_none() {
                return Err(RenderError::InvalidColor {
                    color: style.color.clone(),
                    token: token.text.clone(),
                    position,
                });
            }
        }
    }
    Ok(())
}

fn style_of(token: &TimedToken) -> StyleDescriptor {
    token.style.clone().unwrap_or_default()
}

/// Icon shown before a token, with a count of the further icons
fn icon_label(token: &TimedToken, style: &StyleDescriptor) -> String {
    let primary = if token.primary_icon.is_empty() {
        style.icon.as_str()
    } else {
        token.primary_icon.as_str()
    };
    if primary.is_empty() {
        return String::new();
    }
    if token.secondary_icons.is_empty() {
        primary.to_string()
    } else {
        format!("{} [+{}]", primary, token.secondary_icons.len())
    }
}

fn with_icon(label: &str, body: &str) -> String {
    if label.is_empty() {
        body.to_string()
    } else {
        format!("{} {}", label, body)
    }
}

fn styled_srt_token(token: &TimedToken) -> String {
    let style = style_of(token);
    let word = if style.is_bold() {
        format!("<b>{}</b>", token.text)
    } else {
        token.text.clone()
    };
    let body = format!("<font color=\"{}\">{}</font>", style.bare_color(), word);
    with_icon(&icon_label(token, &style), &body)
}

fn vtt_token(token: &TimedToken) -> String {
    let style = style_of(token);
    let class = format!("{}{}", style.bare_color(), style.weight.class_suffix());
    format!("<c.{}>{}</c>", class, with_icon(&icon_label(token, &style), &token.text))
}

/// `#RRGGBB` to ASS `&HBBGGRR&`
fn ass_color(color: &str) -> String {
    match styling::parse_hex_rgb(color) {
        Some((r, g, b)) => format!("&H{:02X}{:02X}{:02X}&", b, g, r),
        None => "&HFFFFFF&".to_string(),
    }
}

fn ass_token(token: &TimedToken) -> String {
    let style = style_of(token);
    let bold = if style.is_bold() { "\\b1" } else { "" };
    format!(
        "{{\\c{}{}}}{}{{\\r}}",
        ass_color(&style.color),
        bold,
        with_icon(&icon_label(token, &style), &token.text)
    )
}

fn join_tokens(group: &OutputGroup<'_>, render_token: fn(&TimedToken) -> String) -> String {
    group
        .tokens
        .iter()
        .map(|t| render_token(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_srt(groups: &[OutputGroup<'_>], styled: bool) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        let text = if styled {
            join_tokens(group, styled_srt_token)
        } else {
            group.plain_text()
        };
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            timecode::format_timecode(group.start_ms, TimecodeStyle::Srt),
            timecode::format_timecode(group.end_ms, TimecodeStyle::Srt),
            text
        );
    }
    out
}

fn render_vtt(groups: &[OutputGroup<'_>]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for group in groups {
        let _ = write!(
            out,
            "{} --> {}\n{}\n\n",
            timecode::format_timecode(group.start_ms, TimecodeStyle::Vtt),
            timecode::format_timecode(group.end_ms, TimecodeStyle::Vtt),
            join_tokens(group, vtt_token)
        );
    }
    out
}

fn ass_header() -> String {
    format!("{}\n{}\n[Events]\n{}", ASS_SCRIPT_INFO, ASS_STYLES, ASS_EVENTS_FORMAT)
}

/// One `Dialogue:` line
pub(crate) fn ass_dialogue(start_ms: u64, end_ms: u64, text: &str) -> String {
    format!(
        "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
        timecode::format_timecode(start_ms, TimecodeStyle::Ass),
        timecode::format_timecode(end_ms, TimecodeStyle::Ass),
        text
    )
}

fn render_ass(groups: &[OutputGroup<'_>]) -> String {
    let mut out = ass_header();
    for group in groups {
        out.push_str(&ass_dialogue(group.start_ms, group.end_ms, &join_tokens(group, ass_token)));
    }
    out
}

/// ASS document with one unstyled line per `(start, end, text)` entry
pub(crate) fn render_plain_ass<'a>(lines: impl IntoIterator<Item = (u64, u64, &'a str)>) -> String {
    let mut out = ass_header();
    for (start_ms, end_ms, text) in lines {
        out.push_str(&ass_dialogue(start_ms, end_ms, text));
    }
    out
}

fn to_record(index: usize, token: &TimedToken) -> JsonRecord {
    let style = style_of(token);
    let icon = icon_label_without_count(token, &style);
    JsonRecord {
        index,
        start_time: timecode::format_srt(token.start_ms),
        end_time: timecode::format_srt(token.end_ms),
        word: token.text.clone(),
        important: token.important,
        categories: token.categories.clone(),
        style: JsonStyle {
            color: style.color,
            font_weight: style.weight,
            icon,
        },
        secondary_icons: token.secondary_icons.clone(),
    }
}

fn icon_label_without_count(token: &TimedToken, style: &StyleDescriptor) -> String {
    if token.primary_icon.is_empty() {
        style.icon.clone()
    } else {
        token.primary_icon.clone()
    }
}

fn render_json(tokens: &[TimedToken]) -> Result<String, RenderError> {
    let records: Vec<JsonRecord> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| to_record(i + 1, t))
        .collect();
    serde_json::to_string_pretty(&records).map_err(|e| RenderError::Json(e.to_string()))
}

/// Build a token back from a JSON record
pub fn token_from_record(record: &JsonRecord) -> Result<TimedToken, RenderError> {
    let start_ms = timecode::parse_timecode(&record.start_time).map_err(|source| RenderError::InvalidTime {
        position: record.index,
        source,
    })?;
    let end_ms = timecode::parse_timecode(&record.end_time).map_err(|source| RenderError::InvalidTime {
        position: record.index,
        source,
    })?;

    let mut token = TimedToken::new(record.index as u32, start_ms, end_ms, record.word.clone());
    token.important = record.important;
    token.categories = record.categories.clone();
    token.primary_icon = record.style.icon.clone();
    token.secondary_icons = record.secondary_icons.clone();
    Ok(token.with_style(StyleDescriptor::new(
        &record.style.color,
        record.style.font_weight,
        &record.style.icon,
        "none",
    )))
}

fn placeholder_document(format: OutputFormat, message: &str) -> String {
    match format {
        OutputFormat::PlainSrt | OutputFormat::StyledSrt => format!(
            "1\n{} --> {}\n{}\n\n",
            timecode::format_timecode(0, TimecodeStyle::Srt),
            timecode::format_timecode(PLACEHOLDER_END_MS, TimecodeStyle::Srt),
            message
        ),
        OutputFormat::Vtt => format!(
            "WEBVTT\n\n{} --> {}\n{}\n\n",
            timecode::format_timecode(0, TimecodeStyle::Vtt),
            timecode::format_timecode(PLACEHOLDER_END_MS, TimecodeStyle::Vtt),
            message
        ),
        OutputFormat::Ass => render_plain_ass([(0, PLACEHOLDER_END_MS, message)]),
        OutputFormat::Json => serde_json::json!({ "error": message }).to_string(),
    }
}

/// Document emitted for empty input
pub fn empty_document(format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => "[]".to_string(),
        _ => placeholder_document(format, EMPTY_SENTINEL),
    }
}

/// Format-valid document describing a rendering failure
pub fn error_document(format: OutputFormat, error: &RenderError) -> String {
    let label = match format {
        OutputFormat::PlainSrt | OutputFormat::StyledSrt => "SRT",
        OutputFormat::Vtt => "VTT",
        OutputFormat::Ass => "ASS",
        OutputFormat::Json => "JSON",
    };
    placeholder_document(format, &format!("Error generating {}: {}", label, error))
}
