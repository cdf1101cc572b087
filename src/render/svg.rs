//! SVG document assembly for resolved icons.
//!
//! The icon body is copied verbatim. Flips and rotation become a `<g
//! transform>` wrapper and the view box is adjusted so the transformed
//! drawing stays inside it:
//!
//! - both flips together are a half turn and are folded into the rotation
//! - a single flip is `translate(..) scale(-1 1)` (horizontal) or
//!   `translate(..) scale(1 -1)` (vertical), and moves the box to the origin
//! - rotation is prepended as `rotate(90|180|-90 cx cy)`; odd quarter turns
//!   swap the box axes
//!
//! The document is `pixel_size` pixels tall and as wide as the box ratio
//! allows.

use std::fmt::Write as _;

use crate::models::{ResolvedIconInfo, aspect_ratio};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Renders `info` as a standalone SVG document `pixel_size` pixels tall.
#[must_use]
pub fn path_to_svg(info: &ResolvedIconInfo, pixel_size: u32) -> String {
    let icon = &info.icon;
    let mut view_box = ViewBox {
        left: icon.left,
        top: icon.top,
        width: icon.width,
        height: icon.height,
    };
    let mut rotation = icon.rotate % 4;
    let mut transforms: Vec<String> = Vec::new();

    match (icon.h_flip, icon.v_flip) {
        (true, true) => rotation = (rotation + 2) % 4,
        (true, false) => {
            transforms.push(format!(
                "translate({} {})",
                format_number(view_box.width + view_box.left),
                format_number(-view_box.top)
            ));
            transforms.push("scale(-1 1)".to_string());
            view_box.left = 0.0;
            view_box.top = 0.0;
        }
        (false, true) => {
            transforms.push(format!(
                "translate({} {})",
                format_number(-view_box.left),
                format_number(view_box.height + view_box.top)
            ));
            transforms.push("scale(1 -1)".to_string());
            view_box.left = 0.0;
            view_box.top = 0.0;
        }
        (false, false) => {}
    }

    match rotation {
        1 => {
            let center = format_number(view_box.height / 2.0 + view_box.top);
            transforms.insert(0, format!("rotate(90 {center} {center})"));
        }
        2 => {
            transforms.insert(
                0,
                format!(
                    "rotate(180 {} {})",
                    format_number(view_box.width / 2.0 + view_box.left),
                    format_number(view_box.height / 2.0 + view_box.top)
                ),
            );
        }
        3 => {
            let center = format_number(view_box.width / 2.0 + view_box.left);
            transforms.insert(0, format!("rotate(-90 {center} {center})"));
        }
        _ => {}
    }

    if rotation % 2 == 1 {
        std::mem::swap(&mut view_box.left, &mut view_box.top);
        std::mem::swap(&mut view_box.width, &mut view_box.height);
    }

    let height = f64::from(pixel_size);
    let width = height * aspect_ratio(view_box.width, view_box.height);

    let mut svg = String::with_capacity(icon.body.len() + 256);
    let _ = write!(
        svg,
        "<svg xmlns=\"{SVG_NAMESPACE}\" xmlns:xlink=\"{XLINK_NAMESPACE}\" \
         width=\"{}px\" height=\"{}px\" preserveAspectRatio=\"xMidYMid meet\" \
         viewBox=\"{} {} {} {}\">",
        format_number(width),
        format_number(height),
        format_number(view_box.left),
        format_number(view_box.top),
        format_number(view_box.width),
        format_number(view_box.height),
    );

    if transforms.is_empty() {
        svg.push_str(&icon.body);
    } else {
        let _ = write!(svg, "<g transform=\"{}\">{}</g>", transforms.join(" "), icon.body);
    }

    svg.push_str("</svg>");
    svg
}

/// Prints `value` with at most two decimals and no trailing zeros.
fn format_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
