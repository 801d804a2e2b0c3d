//! Typed declaration values and their CSS serialization.
//!
//! Values arrive from the style storage layer as a tagged union. Every variant
//! has exactly one formatting routine; [`StyleValue::to_css`] dispatches to it
//! once, at emission time, and then checks that the produced text cannot break
//! out of the declaration it is written into.

use std::collections::HashMap;

use cssparser::{ParseError, Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

use super::error::ValueError;
use super::Asset;

/// A declaration value.
///
/// Unknown `type` tags deserialize to [`StyleValue::Unsupported`] so that a
/// single unfamiliar value never rejects a whole snapshot; the emitter drops
/// the declaration instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StyleValue {
    /// A bare identifier such as `block` or `red`.
    Keyword { value: String },
    /// A number with a unit. The unit `number` renders without suffix.
    Unit { value: f64, unit: String },
    /// An sRGB color with alpha.
    Rgb {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        alpha: f64,
    },
    /// A font family stack.
    FontFamily { value: Vec<String> },
    /// A custom property reference with an optional fallback.
    Var {
        value: String,
        #[serde(default)]
        fallback: Option<Box<StyleValue>>,
    },
    /// Raw CSS text the storage layer could not type.
    Unparsed { value: String },
    /// Space separated values (`1px 2px`).
    Tuple { value: Vec<StyleValue> },
    /// Comma separated values (`url(a), url(b)`).
    Layers { value: Vec<StyleValue> },
    /// An image reference.
    Image { value: ImageValue },
    /// A value the storage layer already knows to be invalid.
    Invalid { value: String },
    #[serde(other)]
    Unsupported,
}

fn opaque() -> f64 {
    1.0
}

/// Source of an image value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ImageValue {
    /// An uploaded asset, resolved through the asset table.
    Asset { value: String },
    /// An absolute or relative url used verbatim.
    Url { url: String },
}

/// Lookup tables needed to turn asset references into urls.
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    pub assets: &'a HashMap<String, Asset>,
    pub asset_base_url: &'a str,
}

impl StyleValue {
    /// Convenience constructor for keyword values.
    pub fn keyword(value: impl Into<String>) -> Self {
        StyleValue::Keyword {
            value: value.into(),
        }
    }

    /// Convenience constructor for unit values.
    pub fn unit(value: f64, unit: impl Into<String>) -> Self {
        StyleValue::Unit {
            value,
            unit: unit.into(),
        }
    }

    /// Serializes the value as CSS declaration text.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the value cannot be rendered, or when the
    /// rendered text would terminate or escape its declaration (a stray `;`,
    /// braces, comments, or malformed strings).
    pub fn to_css(&self, ctx: &ValueContext<'_>) -> Result<String, ValueError> {
        let text = self.format(ctx)?;
        ensure_contained(&text)?;
        Ok(text)
    }

    fn format(&self, ctx: &ValueContext<'_>) -> Result<String, ValueError> {
        match self {
            StyleValue::Keyword { value } => format_keyword(value),
            StyleValue::Unit { value, unit } => format_unit(*value, unit),
            StyleValue::Rgb { r, g, b, alpha } => format_rgb(*r, *g, *b, *alpha),
            StyleValue::FontFamily { value } => format_font_family(value),
            StyleValue::Var { value, fallback } => format_var(value, fallback.as_deref(), ctx),
            StyleValue::Unparsed { value } => format_unparsed(value),
            StyleValue::Tuple { value } => format_list(value, " ", ctx),
            StyleValue::Layers { value } => format_list(value, ", ", ctx),
            StyleValue::Image { value } => format_image(value, ctx),
            StyleValue::Invalid { value } => Err(ValueError::Invalid(value.clone())),
            StyleValue::Unsupported => Err(ValueError::Unsupported),
        }
    }
}

fn format_keyword(value: &str) -> Result<String, ValueError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValueError::Empty);
    }
    Ok(value.to_string())
}

fn format_number(value: f64) -> Result<String, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::NonFinite(value));
    }
    // Avoid rendering negative zero as "-0".
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.to_string())
}

fn format_unit(value: f64, unit: &str) -> Result<String, ValueError> {
    let number = format_number(value)?;
    if unit == "number" {
        Ok(number)
    } else {
        Ok(format!("{number}{unit}"))
    }
}

fn format_rgb(r: u8, g: u8, b: u8, alpha: f64) -> Result<String, ValueError> {
    let alpha = format_number(alpha.clamp(0.0, 1.0))?;
    Ok(format!("rgba({r}, {g}, {b}, {alpha})"))
}

fn format_font_family(families: &[String]) -> Result<String, ValueError> {
    let mut out = String::new();
    for family in families.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        if !out.is_empty() {
            out.push_str(", ");
        }
        if is_plain_family_name(family) {
            out.push_str(family);
        } else {
            cssparser::serialize_string(family, &mut out).map_err(|_| ValueError::Empty)?;
        }
    }
    if out.is_empty() {
        return Err(ValueError::Empty);
    }
    Ok(out)
}

/// Family names made of identifier characters render unquoted, everything
/// else (spaces, digits up front, punctuation) is quoted.
fn is_plain_family_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn format_var(
    name: &str,
    fallback: Option<&StyleValue>,
    ctx: &ValueContext<'_>,
) -> Result<String, ValueError> {
    let name = name.trim();
    if name.trim_start_matches('-').is_empty() {
        return Err(ValueError::Empty);
    }
    let mut out = String::from("var(");
    if !name.starts_with("--") {
        out.push_str("--");
    }
    out.push_str(name);
    if let Some(fallback) = fallback {
        out.push_str(", ");
        out.push_str(&fallback.format(ctx)?);
    }
    out.push(')');
    Ok(out)
}

fn format_unparsed(value: &str) -> Result<String, ValueError> {
    let value = value.trim().trim_end_matches(';').trim_end();
    if value.is_empty() {
        return Err(ValueError::Empty);
    }
    Ok(value.to_string())
}

fn format_list(
    items: &[StyleValue],
    separator: &str,
    ctx: &ValueContext<'_>,
) -> Result<String, ValueError> {
    if items.is_empty() {
        return Err(ValueError::Empty);
    }
    let parts = items
        .iter()
        .map(|item| item.format(ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(separator))
}

fn format_image(image: &ImageValue, ctx: &ValueContext<'_>) -> Result<String, ValueError> {
    let url = match image {
        ImageValue::Asset { value } => {
            let asset = ctx
                .assets
                .get(value)
                .ok_or_else(|| ValueError::UnknownAsset(value.clone()))?;
            format!("{}{}", ctx.asset_base_url, asset.name)
        }
        ImageValue::Url { url } => url.clone(),
    };
    let mut out = String::from("url(");
    cssparser::serialize_string(&url, &mut out).map_err(|_| ValueError::Empty)?;
    out.push(')');
    Ok(out)
}

/// Rejects text that would not stay inside a single declaration.
fn ensure_contained(text: &str) -> Result<(), ValueError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    check_tokens(&mut parser, Position::Value).map_err(|_| ValueError::Escapes(text.to_string()))
}

/// Whether `suffix` can be appended to a class selector without leaving it.
///
/// Pseudo-states (`:hover`) and descendant combinators (` > li`) pass; text
/// that opens or closes a block, ends a statement, starts a selector list or
/// holds a comment does not.
pub fn is_safe_selector_suffix(suffix: &str) -> bool {
    let mut input = ParserInput::new(suffix);
    let mut parser = Parser::new(&mut input);
    check_tokens(&mut parser, Position::Selector).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Value,
    Selector,
    Nested,
}

fn check_tokens<'i>(parser: &mut Parser<'i, '_>, position: Position) -> Result<(), ParseError<'i, ()>> {
    loop {
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };
        match token {
            Token::Semicolon if position != Position::Nested => {
                return Err(parser.new_custom_error(()))
            }
            Token::Comma if position == Position::Selector => {
                return Err(parser.new_custom_error(()))
            }
            Token::CurlyBracketBlock
            | Token::CloseCurlyBracket
            | Token::Comment(_)
            | Token::BadString(_)
            | Token::BadUrl(_)
            | Token::CDO
            | Token::CDC => return Err(parser.new_custom_error(())),
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                parser.parse_nested_block(|nested| check_tokens(nested, Position::Nested))?;
            }
            _ => {}
        }
    }
}
