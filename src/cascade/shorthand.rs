//! Shorthand expansion
//!
//! A browser's style object never lists `margin`; it lists `margin-top`,
//! `margin-right` and so on. Declarations are expanded the same way before
//! they reach the cascade so a shorthand and a longhand compete for the same
//! property.
//!
//! Values that cannot be split without a full value parser (`var()`
//! references, multi-layer backgrounds, system fonts) are kept as written.

use log::debug;

use super::color::is_color_token;
use super::stylesheet::RawDeclaration;

const MARGIN: &[&str] = &["margin-top", "margin-right", "margin-bottom", "margin-left"];
const PADDING: &[&str] = &["padding-top", "padding-right", "padding-bottom", "padding-left"];
const INSET: &[&str] = &["top", "right", "bottom", "left"];
const BORDER_WIDTH: &[&str] = &[
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
];
const BORDER_STYLE: &[&str] = &[
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
];
const BORDER_COLOR: &[&str] = &[
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];
const BORDER_RADIUS: &[&str] = &[
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];
const BORDER: &[&str] = &[
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];
const BORDER_TOP: &[&str] = &["border-top-width", "border-top-style", "border-top-color"];
const BORDER_RIGHT: &[&str] = &["border-right-width", "border-right-style", "border-right-color"];
const BORDER_BOTTOM: &[&str] = &["border-bottom-width", "border-bottom-style", "border-bottom-color"];
const BORDER_LEFT: &[&str] = &["border-left-width", "border-left-style", "border-left-color"];
const OUTLINE: &[&str] = &["outline-width", "outline-style", "outline-color"];
const FLEX: &[&str] = &["flex-grow", "flex-shrink", "flex-basis"];
const FLEX_FLOW: &[&str] = &["flex-direction", "flex-wrap"];
const GAP: &[&str] = &["row-gap", "column-gap"];
const OVERFLOW: &[&str] = &["overflow-x", "overflow-y"];
const FONT: &[&str] = &[
    "font-style",
    "font-variant",
    "font-weight",
    "font-stretch",
    "font-size",
    "line-height",
    "font-family",
];
const BACKGROUND: &[&str] = &[
    "background-image",
    "background-position",
    "background-size",
    "background-repeat",
    "background-attachment",
    "background-origin",
    "background-clip",
    "background-color",
];

const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];
const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const BORDER_WIDTHS: &[&str] = &["thin", "medium", "thick"];
const FONT_STYLES: &[&str] = &["italic", "oblique"];
const FONT_WEIGHTS: &[&str] = &["bold", "bolder", "lighter"];
const FONT_STRETCHES: &[&str] = &[
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
];
const FONT_SIZES: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
    "larger", "smaller",
];
const SYSTEM_FONTS: &[&str] = &["caption", "icon", "menu", "message-box", "small-caption", "status-bar"];
const REPEATS: &[&str] = &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const ATTACHMENTS: &[&str] = &["scroll", "fixed", "local"];
const BOXES: &[&str] = &["border-box", "padding-box", "content-box"];
const POSITIONS: &[&str] = &["left", "right", "top", "bottom", "center"];
const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "%", "vh", "vw", "vmin", "vmax", "ch", "ex", "pt", "pc", "in", "cm", "mm",
    "q", "fr", "lh", "rlh", "svh", "lvh", "dvh", "svw", "lvw", "dvw", "cqw", "cqh",
];

/// Longhands a shorthand property sets, `None` for longhands and unknown properties
pub fn longhands_of(property: &str) -> Option<&'static [&'static str]> {
    let longhands = match property {
        "margin" => MARGIN,
        "padding" => PADDING,
        "inset" => INSET,
        "border-width" => BORDER_WIDTH,
        "border-style" => BORDER_STYLE,
        "border-color" => BORDER_COLOR,
        "border-radius" => BORDER_RADIUS,
        "border" => BORDER,
        "border-top" => BORDER_TOP,
        "border-right" => BORDER_RIGHT,
        "border-bottom" => BORDER_BOTTOM,
        "border-left" => BORDER_LEFT,
        "outline" => OUTLINE,
        "flex" => FLEX,
        "flex-flow" => FLEX_FLOW,
        "gap" => GAP,
        "overflow" => OVERFLOW,
        "font" => FONT,
        "background" => BACKGROUND,
        _ => return None,
    };
    Some(longhands)
}

/// Expand a shorthand declaration into its longhands.
///
/// Longhands come back in the order above and keep the declaration's
/// importance. Anything that is not an expandable shorthand is returned as is.
pub fn expand_declaration(raw: &RawDeclaration) -> Vec<RawDeclaration> {
    let Some(longhands) = longhands_of(&raw.property) else {
        return vec![raw.clone()];
    };

    let lowered = raw.value.to_ascii_lowercase();
    if lowered.contains("var(") || lowered.contains("env(") {
        debug!("Keeping {} as written, value has substitutions", raw.property);
        return vec![raw.clone()];
    }

    let values = if CSS_WIDE_KEYWORDS.contains(&lowered.as_str()) {
        Some(vec![lowered; longhands.len()])
    } else {
        split_shorthand(&raw.property, &raw.value)
    };

    match values {
        Some(values) if values.len() == longhands.len() => longhands
            .iter()
            .zip(values)
            .map(|(longhand, value)| RawDeclaration {
                property: longhand.to_string(),
                value,
                important: raw.important,
            })
            .collect(),
        _ => {
            debug!("Keeping {}: {} as written", raw.property, raw.value);
            vec![raw.clone()]
        }
    }
}

/// Longhand values in the order of [`longhands_of`]
fn split_shorthand(property: &str, value: &str) -> Option<Vec<String>> {
    let tokens = split_value_tokens(value);
    if tokens.is_empty() {
        return None;
    }
    match property {
        "margin" | "padding" | "inset" | "border-width" | "border-style" | "border-color" => {
            box_values(&tokens)
        }
        "border-radius" if !tokens.iter().any(|t| t == "/") => box_values(&tokens),
        "border" => {
            let (width, style, color) = width_style_color(&tokens, BORDER_STYLES)?;
            let mut values = vec![width; 4];
            values.extend(vec![style; 4]);
            values.extend(vec![color; 4]);
            Some(values)
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            let (width, style, color) = width_style_color(&tokens, BORDER_STYLES)?;
            Some(vec![width, style, color])
        }
        "outline" => {
            let mut styles = BORDER_STYLES.to_vec();
            styles.push("auto");
            let (width, style, color) = width_style_color(&tokens, &styles)?;
            Some(vec![width, style, color])
        }
        "flex" => flex_values(&tokens),
        "flex-flow" => flex_flow_values(&tokens),
        "gap" | "overflow" => match tokens.as_slice() {
            [both] => Some(vec![both.clone(), both.clone()]),
            [first, second] => Some(vec![first.clone(), second.clone()]),
            _ => None,
        },
        "font" => font_values(&tokens),
        "background" => background_values(value, &tokens),
        _ => None,
    }
}

/// Split a value at top-level whitespace. A top-level `/` becomes its own token.
pub fn split_value_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in value.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '(') => {
                depth += 1;
                current.push(ch);
            }
            (None, ')') => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            (None, '/') if depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push("/".to_string());
            }
            (None, c) if c.is_whitespace() && depth == 0 => flush(&mut current, &mut tokens),
            (None, c) => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

fn is_keyword(token: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| token.eq_ignore_ascii_case(k))
}

fn is_number(token: &str) -> bool {
    token.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// A length or percentage: a number with a unit, a bare `0`, or a math function
fn is_length(token: &str) -> bool {
    let lowered = token.to_ascii_lowercase();
    if ["calc(", "min(", "max(", "clamp("]
        .iter()
        .any(|f| lowered.starts_with(f))
    {
        return true;
    }
    if is_number(&lowered) {
        return lowered.parse::<f64>().map(|n| n == 0.0).unwrap_or(false);
    }
    LENGTH_UNITS.iter().any(|unit| {
        lowered
            .strip_suffix(unit)
            .map(|number| !number.is_empty() && is_number(number))
            .unwrap_or(false)
    })
}

/// Top, right, bottom, left from one to four values
fn box_values(tokens: &[String]) -> Option<Vec<String>> {
    let [top, right, bottom, left] = match tokens {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return None,
    };
    Some(vec![top.clone(), right.clone(), bottom.clone(), left.clone()])
}

/// Width, style and color in any order, each at most once, missing ones at their initial value
fn width_style_color(tokens: &[String], styles: &[&str]) -> Option<(String, String, String)> {
    let mut width = None;
    let mut style = None;
    let mut color = None;

    for token in tokens {
        let slot = if is_keyword(token, styles) {
            &mut style
        } else if is_length(token) || is_keyword(token, BORDER_WIDTHS) {
            &mut width
        } else if is_color_token(token) {
            &mut color
        } else {
            return None;
        };
        if slot.replace(token.clone()).is_some() {
            return None;
        }
    }

    Some((
        width.unwrap_or_else(|| "medium".to_string()),
        style.unwrap_or_else(|| "none".to_string()),
        color.unwrap_or_else(|| "currentcolor".to_string()),
    ))
}

fn flex_values(tokens: &[String]) -> Option<Vec<String>> {
    let owned = |values: [&str; 3]| Some(values.iter().map(|v| v.to_string()).collect());
    match tokens {
        [single] if single.eq_ignore_ascii_case("none") => owned(["0", "0", "auto"]),
        [single] if single.eq_ignore_ascii_case("auto") => owned(["1", "1", "auto"]),
        [grow] if is_number(grow) => owned([grow.as_str(), "1", "0%"]),
        [basis] => owned(["1", "1", basis.as_str()]),
        [grow, shrink] if is_number(grow) && is_number(shrink) => owned([grow.as_str(), shrink.as_str(), "0%"]),
        [grow, basis] if is_number(grow) => owned([grow.as_str(), "1", basis.as_str()]),
        [grow, shrink, basis] if is_number(grow) && is_number(shrink) => {
            owned([grow.as_str(), shrink.as_str(), basis.as_str()])
        }
        _ => None,
    }
}

fn flex_flow_values(tokens: &[String]) -> Option<Vec<String>> {
    const DIRECTIONS: &[&str] = &["row", "row-reverse", "column", "column-reverse"];
    const WRAPS: &[&str] = &["nowrap", "wrap", "wrap-reverse"];

    let mut direction = None;
    let mut wrap = None;
    for token in tokens {
        let slot = if is_keyword(token, DIRECTIONS) {
            &mut direction
        } else if is_keyword(token, WRAPS) {
            &mut wrap
        } else {
            return None;
        };
        if slot.replace(token.clone()).is_some() {
            return None;
        }
    }
    Some(vec![
        direction.unwrap_or_else(|| "row".to_string()),
        wrap.unwrap_or_else(|| "nowrap".to_string()),
    ])
}

/// `[style || variant || weight || stretch]? size [/ line-height]? family`
fn font_values(tokens: &[String]) -> Option<Vec<String>> {
    if let [single] = tokens {
        if is_keyword(single, SYSTEM_FONTS) {
            return None;
        }
    }

    let mut style = None;
    let mut variant = None;
    let mut weight = None;
    let mut stretch = None;

    let mut rest = tokens.iter().peekable();
    let size = loop {
        let token = rest.next()?;
        let slot = if token.eq_ignore_ascii_case("normal") {
            continue;
        } else if is_keyword(token, FONT_STYLES) {
            &mut style
        } else if token.eq_ignore_ascii_case("small-caps") {
            &mut variant
        } else if is_keyword(token, FONT_WEIGHTS) || is_number(token) {
            &mut weight
        } else if is_keyword(token, FONT_STRETCHES) {
            &mut stretch
        } else if is_length(token) || is_keyword(token, FONT_SIZES) {
            break token.clone();
        } else {
            return None;
        };
        if slot.replace(token.clone()).is_some() {
            return None;
        }
    };

    let line_height = if rest.peek().map(|t| t.as_str()) == Some("/") {
        rest.next();
        Some(rest.next()?.clone())
    } else {
        None
    };

    let family = rest.cloned().collect::<Vec<_>>().join(" ");
    if family.is_empty() {
        return None;
    }

    let normal = || "normal".to_string();
    Some(vec![
        style.unwrap_or_else(normal),
        variant.unwrap_or_else(normal),
        weight.unwrap_or_else(normal),
        stretch.unwrap_or_else(normal),
        size,
        line_height.unwrap_or_else(normal),
        family,
    ])
}

/// A single background layer; several layers are kept as written
fn background_values(value: &str, tokens: &[String]) -> Option<Vec<String>> {
    if !has_comma_only_in_functions(value) {
        return None;
    }

    let mut image = None;
    let mut position: Vec<String> = Vec::new();
    let mut size: Vec<String> = Vec::new();
    let mut repeat: Vec<String> = Vec::new();
    let mut attachment = None;
    let mut boxes: Vec<String> = Vec::new();
    let mut color = None;
    let mut after_slash = false;

    for token in tokens {
        let lowered = token.to_ascii_lowercase();
        if token == "/" {
            if position.is_empty() || after_slash {
                return None;
            }
            after_slash = true;
        } else if after_slash && (is_length(token) || is_keyword(token, &["auto", "cover", "contain"])) {
            size.push(token.clone());
        } else if lowered == "none" || lowered.starts_with("url(") || lowered.contains("gradient(") {
            if image.replace(token.clone()).is_some() {
                return None;
            }
        } else if is_keyword(token, REPEATS) {
            repeat.push(token.clone());
        } else if is_keyword(token, ATTACHMENTS) {
            if attachment.replace(token.clone()).is_some() {
                return None;
            }
        } else if is_keyword(token, BOXES) {
            boxes.push(token.clone());
        } else if is_keyword(token, POSITIONS) || is_length(token) {
            if after_slash {
                return None;
            }
            position.push(token.clone());
        } else if is_color_token(token) {
            if color.replace(token.clone()).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }

    if repeat.len() > 2 || boxes.len() > 2 || position.len() > 4 || size.len() > 2 {
        return None;
    }
    let joined = |parts: Vec<String>, initial: &str| {
        if parts.is_empty() {
            initial.to_string()
        } else {
            parts.join(" ")
        }
    };
    let origin = boxes.first().cloned().unwrap_or_else(|| "padding-box".to_string());
    let clip = boxes
        .get(1)
        .or(boxes.first())
        .cloned()
        .unwrap_or_else(|| "border-box".to_string());

    Some(vec![
        image.unwrap_or_else(|| "none".to_string()),
        joined(position, "0% 0%"),
        joined(size, "auto"),
        joined(repeat, "repeat"),
        attachment.unwrap_or_else(|| "scroll".to_string()),
        origin,
        clip,
        color.unwrap_or_else(|| "transparent".to_string()),
    ])
}

/// Whether every comma of `value` sits inside parentheses
fn has_comma_only_in_functions(value: &str) -> bool {
    let mut depth = 0usize;
    for ch in value.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return false,
            _ => {}
        }
    }
    true
}
