//! Alias and inheritance resolution within one icon set.
//!
//! An alias names a parent (an icon or another alias) and optionally carries
//! transform deltas. Resolution walks the parent chain until it reaches a
//! concrete icon, normalizes that icon against the collection defaults, and
//! then applies the collected alias deltas from the innermost alias outwards:
//!
//! ```text
//! outer ──parent──> middle ──parent──> icon
//!                                       │ normalize (collection defaults, 16x16)
//!                     apply middle <────┘
//! apply outer <───────┘
//! ```
//!
//! - `left`, `top`, `width`, `height` on an alias replace the parent's value
//! - `rotate` is added to the parent's rotation, modulo 4
//! - `hFlip` and `vFlip` toggle the parent's flags (XOR)
//!
//! The walk keeps the names it has visited; reaching a name twice means the
//! chain is cyclic and the lookup resolves to nothing.

use std::collections::HashSet;

use crate::constants::DEFAULT_ICON_SIZE;
use crate::models::{AliasDefinition, IconDefinition, IconSet, ResolvedIcon};

/// Resolves `name` in `set` to concrete geometry.
///
/// Returns `None` when the name is neither an icon nor an alias, when an
/// alias points at a missing parent, or when the alias chain loops.
pub fn resolve_icon_definition(set: &IconSet, name: &str) -> Option<ResolvedIcon> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut chain: Vec<&AliasDefinition> = Vec::new();
    let mut current: &str = name;

    let base = loop {
        if !visited.insert(current) {
            tracing::debug!(
                target: "resolver",
                "Alias cycle in '{}' at '{}' while resolving '{}'",
                set.prefix,
                current,
                name
            );
            return None;
        }

        if let Some(icon) = set.icons.get(current) {
            break normalize(set, icon);
        }

        let alias = set.aliases.get(current)?;
        chain.push(alias);
        current = &alias.parent;
    };

    Some(chain.iter().rev().fold(base, |icon, alias| apply_alias(icon, alias)))
}

fn normalize(set: &IconSet, icon: &IconDefinition) -> ResolvedIcon {
    ResolvedIcon {
        body: icon.body.clone(),
        left: icon.left.or(set.left).unwrap_or(0.0),
        top: icon.top.or(set.top).unwrap_or(0.0),
        width: icon.width.or(set.width).unwrap_or(DEFAULT_ICON_SIZE),
        height: icon.height.or(set.height).unwrap_or(DEFAULT_ICON_SIZE),
        rotate: quarter_turns(icon.rotate.unwrap_or(0)),
        h_flip: icon.h_flip.unwrap_or(false),
        v_flip: icon.v_flip.unwrap_or(false),
    }
}

fn apply_alias(parent: ResolvedIcon, alias: &AliasDefinition) -> ResolvedIcon {
    // Both operands are below 4, so the sum cannot overflow
    let delta = quarter_turns(alias.rotate.unwrap_or(0));
    ResolvedIcon {
        left: alias.left.unwrap_or(parent.left),
        top: alias.top.unwrap_or(parent.top),
        width: alias.width.unwrap_or(parent.width),
        height: alias.height.unwrap_or(parent.height),
        rotate: (parent.rotate + delta) % 4,
        h_flip: parent.h_flip ^ alias.h_flip.unwrap_or(false),
        v_flip: parent.v_flip ^ alias.v_flip.unwrap_or(false),
        body: parent.body,
    }
}

fn quarter_turns(rotate: i32) -> u8 {
    // rem_euclid(4) is always in 0..4
    rotate.rem_euclid(4) as u8
}
