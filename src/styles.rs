use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use blake2::{Blake2s256, Digest};

use crate::{
    error::Error,
    tag::{Tag, ATTR_STYLE_FAMILY, ATTR_STYLE_NAME, OFFICE_STYLES, STYLE_STYLE},
};

/// Style families the minimizer keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFamily {
    TableColumn,
    TableCell,
}

impl StyleFamily {
    pub fn parse(raw: &str) -> Option<StyleFamily> {
        match raw {
            "table-column" => Some(StyleFamily::TableColumn),
            "table-cell" => Some(StyleFamily::TableCell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleFamily::TableColumn => "table-column",
            StyleFamily::TableCell => "table-cell",
        }
    }
}

/// The retained subset of a style's visual properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefinition {
    pub family: StyleFamily,
    pub column_width: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

impl StyleDefinition {
    pub fn new(family: StyleFamily) -> StyleDefinition {
        StyleDefinition {
            family,
            column_width: None,
            color: None,
            background_color: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.column_width.is_none() && self.color.is_none() && self.background_color.is_none()
    }

    /// Content hash of the three retained properties.
    pub fn key(&self) -> StyleKey {
        StyleKey::digest(
            self.column_width.as_deref(),
            self.color.as_deref(),
            self.background_color.as_deref(),
        )
    }
}

/// First 16 hex digits of BLAKE2s-256 over `width;color;background`.
///
/// Truncated to 64 bits, so collisions are possible in principle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleKey(String);

impl StyleKey {
    pub const LEN: usize = 16;

    pub fn digest(
        column_width: Option<&str>,
        color: Option<&str>,
        background_color: Option<&str>,
    ) -> StyleKey {
        let content = format!(
            "{};{};{}",
            column_width.unwrap_or_default(),
            color.unwrap_or_default(),
            background_color.unwrap_or_default()
        );
        let mut code = hex::encode(Blake2s256::digest(content.as_bytes()));
        code.truncate(Self::LEN);
        StyleKey(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Distinct definitions, iterated in ascending key order.
pub type StyleRegistry = BTreeMap<StyleKey, StyleDefinition>;

/// Original style name to canonical key.
#[derive(Debug, Default)]
pub struct NameToCode(HashMap<String, StyleKey>);

impl NameToCode {
    pub fn insert(&mut self, name: String, key: StyleKey) {
        self.0.insert(name, key);
    }

    pub fn resolve(&self, name: &str) -> Option<&StyleKey> {
        self.0.get(name)
    }

    /// Looks up an optional reference; unknown and absent names both yield `None`.
    pub fn rewrite(&self, name: Option<&str>) -> Option<&StyleKey> {
        name.and_then(|name| self.resolve(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug)]
struct Pending {
    name: String,
    definition: StyleDefinition,
}

/// Gathers automatic style definitions as the document streams past.
#[derive(Debug, Default)]
pub struct StyleCollector {
    in_named_styles: bool,
    pending: Option<Pending>,
    registry: StyleRegistry,
    names: NameToCode,
}

impl StyleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn names(&self) -> &NameToCode {
        &self.names
    }

    #[cfg(test)]
    fn in_named_styles(&self) -> bool {
        self.in_named_styles
    }

    /// Observes a start element.
    pub fn start(&mut self, tag: &Tag) -> Result<(), Error> {
        match tag {
            Tag::OfficeStyles => self.in_named_styles = true,
            Tag::Style { name, family } if !self.in_named_styles => {
                let name = name.as_ref().ok_or_else(|| missing(ATTR_STYLE_NAME))?;
                let family = family.as_ref().ok_or_else(|| missing(ATTR_STYLE_FAMILY))?;
                self.pending = match StyleFamily::parse(family) {
                    Some(family) => Some(Pending {
                        name: name.clone(),
                        definition: StyleDefinition::new(family),
                    }),
                    None => {
                        log::debug!("Skipping style {name:?} of family {family:?}");
                        None
                    }
                };
            }
            Tag::TableColumnProperties { column_width } => {
                if let Some(pending) = self.pending.as_mut() {
                    if let Some(width) = present(column_width) {
                        pending.definition.column_width = Some(width);
                    }
                }
            }
            Tag::TableCellProperties { background_color } => {
                if let Some(pending) = self.pending.as_mut() {
                    if let Some(color) = present(background_color) {
                        pending.definition.background_color =
                            (color != "transparent").then_some(color);
                    }
                }
            }
            Tag::TextProperties { color } => {
                if let Some(pending) = self.pending.as_mut() {
                    if let Some(color) = present(color) {
                        pending.definition.color = Some(color);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Observes an end element by its qualified name.
    pub fn end(&mut self, id: &str) {
        match id {
            OFFICE_STYLES => self.in_named_styles = false,
            STYLE_STYLE => {
                if let Some(Pending { name, definition }) = self.pending.take() {
                    self.commit(name, definition);
                }
            }
            _ => {}
        }
    }

    fn commit(&mut self, name: String, definition: StyleDefinition) {
        if definition.is_empty() {
            log::debug!("Dropping style {name:?} without retained properties");
            return;
        }
        let key = definition.key();
        log::debug!("from={name} to={key} style={definition:?}");
        self.registry.insert(key.clone(), definition);
        self.names.insert(name, key);
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn missing(attribute: &'static str) -> Error {
    Error::MissingAttribute {
        id: STYLE_STYLE.to_string(),
        missing: attribute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn style(name: &str, family: &str) -> Tag {
        Tag::Style {
            name: Some(name.to_string()),
            family: Some(family.to_string()),
        }
    }

    fn text_color(color: &str) -> Tag {
        Tag::TextProperties {
            color: Some(color.to_string()),
        }
    }

    fn background(color: &str) -> Tag {
        Tag::TableCellProperties {
            background_color: Some(color.to_string()),
        }
    }

    fn width(width: &str) -> Tag {
        Tag::TableColumnProperties {
            column_width: Some(width.to_string()),
        }
    }

    fn collect(collector: &mut StyleCollector, tags: &[Tag]) {
        for tag in tags {
            collector.start(tag).unwrap();
        }
        for tag in tags.iter().rev() {
            collector.end(tag.id());
        }
    }

    #[rstest]
    #[case(None, Some("#000000"), Some("#FFFF00"), "3ce3e126352c5af3")]
    #[case(Some("1.2in"), None, None, "4bccf3fcb993722e")]
    #[case(None, Some("#ff0000"), None, "c0fadcc41fe88e7f")]
    #[case(None, None, Some("#ffff00"), "02f5340ddb434cc0")]
    fn key_digest(
        #[case] width: Option<&str>,
        #[case] color: Option<&str>,
        #[case] background: Option<&str>,
        #[case] expected: &str,
    ) {
        let key = StyleKey::digest(width, color, background);
        assert_eq!(key.as_str(), expected);
        assert_eq!(key.as_str().len(), StyleKey::LEN);
    }

    #[test]
    fn cell_style_is_collected() {
        let mut collector = StyleCollector::new();
        collect(
            &mut collector,
            &[style("ce1", "table-cell"), background("#FFFF00")],
        );
        collect(&mut collector, &[style("ce2", "table-cell"), text_color("#000000")]);
        // text properties nested after the cell properties belong to the same style
        collector.start(&style("ce3", "table-cell")).unwrap();
        collector.start(&background("#FFFF00")).unwrap();
        collector.end(crate::tag::STYLE_TABLE_CELL_PROPERTIES);
        collector.start(&text_color("#000000")).unwrap();
        collector.end(crate::tag::STYLE_TEXT_PROPERTIES);
        collector.end(STYLE_STYLE);

        let key = collector.names().resolve("ce3").unwrap();
        assert_eq!(key.as_str(), "3ce3e126352c5af3");
        let definition = &collector.registry()[key];
        assert_eq!(definition.family, StyleFamily::TableCell);
        assert_eq!(definition.color.as_deref(), Some("#000000"));
        assert_eq!(definition.background_color.as_deref(), Some("#FFFF00"));
        assert_eq!(collector.registry().len(), 3);
    }

    #[test]
    fn identical_properties_share_a_key() {
        let mut collector = StyleCollector::new();
        collect(&mut collector, &[style("co1", "table-column"), width("0.889in")]);
        collect(&mut collector, &[style("co2", "table-column"), width("0.889in")]);
        assert_eq!(collector.registry().len(), 1);
        assert_eq!(collector.names().len(), 2);
        assert_eq!(
            collector.names().resolve("co1"),
            collector.names().resolve("co2")
        );
    }

    #[rstest]
    #[case(&[])]
    #[case(&["transparent"])]
    #[case(&[""])]
    fn style_without_properties_is_dropped(#[case] backgrounds: &[&str]) {
        let mut collector = StyleCollector::new();
        let mut tags = vec![style("ce9", "table-cell")];
        tags.extend(backgrounds.iter().map(|b| background(b)));
        collect(&mut collector, &tags);
        assert!(collector.registry().is_empty());
        assert!(collector.names().resolve("ce9").is_none());
    }

    #[test]
    fn named_styles_are_not_collected() {
        let mut collector = StyleCollector::new();
        collector.start(&Tag::OfficeStyles).unwrap();
        assert!(collector.in_named_styles());
        collect(&mut collector, &[style("Default", "table-cell"), text_color("#111111")]);
        collector.end(OFFICE_STYLES);
        assert!(!collector.in_named_styles());
        assert!(collector.registry().is_empty());
        assert!(collector.names().is_empty());
    }

    #[test]
    fn other_families_are_skipped() {
        let mut collector = StyleCollector::new();
        collect(&mut collector, &[style("P1", "paragraph"), text_color("#ff0000")]);
        assert!(collector.names().is_empty());
    }

    #[test]
    fn stray_properties_are_ignored() {
        let mut collector = StyleCollector::new();
        collector.start(&text_color("#ff0000")).unwrap();
        collector.end(crate::tag::STYLE_TEXT_PROPERTIES);
        collect(&mut collector, &[style("co1", "table-column"), width("1.2in")]);
        let key = collector.names().resolve("co1").unwrap();
        assert_eq!(collector.registry()[key].color, None);
    }

    #[test]
    fn style_without_name_fails() {
        let mut collector = StyleCollector::new();
        let tag = Tag::Style {
            name: None,
            family: Some("table-cell".to_string()),
        };
        assert!(matches!(
            collector.start(&tag),
            Err(Error::MissingAttribute {
                missing: ATTR_STYLE_NAME,
                ..
            })
        ));
    }
}
