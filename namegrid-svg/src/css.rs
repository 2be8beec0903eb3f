//! `<style>` sheets embedded in templates.
//!
//! Only what label fonts need: rules with tag, `#id` and `.class` compounds
//! joined by descendant combinators. Anything fancier is skipped.

use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::dom::SvgElement;
use crate::style::style_declarations;

#[derive(Clone, Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

/// (ids, classes, tags)
type Specificity = (u16, u16, u16);

#[derive(Clone, Debug, PartialEq)]
struct Rule {
    /// Outermost compound first.
    parts: Vec<Compound>,
    specificity: Specificity,
    declarations: Vec<Declaration>,
    order: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct Declaration {
    name: String,
    value: String,
    important: bool,
}

/// All rules of a template's `<style>` elements, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// Collect every `<style>` element below `root`. Sheets that fail to
    /// parse are skipped.
    pub fn from_root(root: &SvgElement) -> Self {
        let mut sheet = Self::default();
        let mut order = 0;
        root.walk(&mut |el| {
            if el.name != "style" {
                return;
            }
            let css = el.text_content();
            match StyleSheet::parse(css.trim(), ParserOptions::default()) {
                Ok(parsed) => collect_rules(parsed.rules, &mut sheet.rules, &mut order),
                Err(e) => tracing::warn!("ignoring template stylesheet: {e}"),
            }
        });
        sheet
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Cascaded value of `name` for the last element of `lineage`, which runs
    /// from the outermost ancestor to the element. Important sheet rules beat
    /// the inline style, which beats ordinary sheet rules, which beat the
    /// presentation attribute.
    pub fn property(&self, lineage: &[&SvgElement], name: &str) -> Option<String> {
        let el = *lineage.last()?;
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.declarations.iter().any(|d| d.name == name))
            .filter(|r| matches(lineage, &r.parts))
            .collect();
        matched.sort_by_key(|r| (r.specificity, r.order));
        let sheet_value = |important: bool| {
            matched
                .iter()
                .flat_map(|r| r.declarations.iter())
                .filter(|d| d.name == name && d.important == important)
                .last()
                .map(|d| d.value.clone())
        };

        sheet_value(true)
            .or_else(|| inline_value(el, name))
            .or_else(|| sheet_value(false))
            .or_else(|| el.attr(name).map(|v| v.trim().to_string()))
    }
}

fn inline_value(el: &SvgElement, name: &str) -> Option<String> {
    style_declarations(el.attr("style")?)
        .into_iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

fn collect_rules(rules: CssRuleList, out: &mut Vec<Rule>, order: &mut usize) {
    for rule in rules.0 {
        match rule {
            CssRule::Style(style_rule) => {
                let selectors = style_rule
                    .selectors
                    .to_css_string(PrinterOptions::default())
                    .unwrap_or_default();
                let declarations = style_rule
                    .declarations
                    .to_css_string(PrinterOptions::default())
                    .map(|css| parse_declarations(&css))
                    .unwrap_or_default();
                if !declarations.is_empty() {
                    for raw in selectors.split(',') {
                        if let Some((parts, specificity)) = parse_selector(raw) {
                            out.push(Rule {
                                parts,
                                specificity,
                                declarations: declarations.clone(),
                                order: *order,
                            });
                        }
                    }
                }
                *order += 1;
            }
            CssRule::Media(media) => collect_rules(media.rules, out, order),
            _ => {}
        }
    }
}

fn parse_declarations(css: &str) -> Vec<Declaration> {
    style_declarations(css)
        .into_iter()
        .map(|(name, value)| {
            let (value, important) = match value.strip_suffix("!important") {
                Some(v) => (v.trim_end().to_string(), true),
                None => (value, false),
            };
            Declaration {
                name,
                value,
                important,
            }
        })
        .collect()
}

fn parse_selector(raw: &str) -> Option<(Vec<Compound>, Specificity)> {
    let parts = raw
        .split_whitespace()
        .map(parse_compound)
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    let specificity = parts.iter().fold((0, 0, 0), |(i, c, t), p| {
        (
            i + u16::from(p.id.is_some()),
            c + p.classes.len() as u16,
            t + u16::from(p.tag.is_some()),
        )
    });
    Some((parts, specificity))
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}

/// `text`, `*`, `.a.b`, `text#title.big`. Combinators, attributes and
/// pseudo-classes are not supported.
fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = token;
    if let Some(r) = rest.strip_prefix('*') {
        rest = r;
    } else {
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if end > 0 {
            compound.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
    }
    while let Some(marker) = rest.chars().next() {
        let body = &rest[marker.len_utf8()..];
        let end = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
        if end == 0 {
            return None;
        }
        let ident = body[..end].to_string();
        match marker {
            '.' => compound.classes.push(ident),
            '#' if compound.id.is_none() => compound.id = Some(ident),
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(compound)
}

fn compound_matches(el: &SvgElement, c: &Compound) -> bool {
    if let Some(tag) = &c.tag
        && !el.name.eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(id) = &c.id
        && el.attr("id") != Some(id.as_str())
    {
        return false;
    }
    let classes = el.attr("class").unwrap_or_default();
    c.classes
        .iter()
        .all(|want| classes.split_whitespace().any(|have| have == want))
}

/// Does the selector ending in `parts.last()` match the last element of
/// `lineage`, with each earlier compound matching some ancestor?
fn matches(lineage: &[&SvgElement], parts: &[Compound]) -> bool {
    let (Some((el, ancestors)), Some((last, outer))) = (lineage.split_last(), parts.split_last())
    else {
        return false;
    };
    if !compound_matches(el, last) {
        return false;
    }
    let mut remaining = ancestors;
    for part in outer.iter().rev() {
        let Some(pos) = remaining.iter().rposition(|a| compound_matches(a, part)) else {
            return false;
        };
        remaining = &remaining[..pos];
    }
    true
}
