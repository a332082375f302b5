use xml::{attribute::Attribute, attribute::OwnedAttribute, name::Name};

use crate::{
    styles::NameToCode,
    tag::{Tag, ATTR_COLUMNS_REPEATED, ATTR_TABLE_NAME, ATTR_TABLE_STYLE_NAME},
};

/// Attributes an emitted start element carries.
#[derive(Debug, PartialEq, Eq)]
pub enum Attributes {
    /// Passed through as authored.
    Original(Vec<OwnedAttribute>),
    /// Rebuilt from the element's typed record.
    Projected(Vec<(&'static str, String)>),
}

impl Attributes {
    pub fn as_writer(&self) -> Vec<Attribute<'_>> {
        match self {
            Attributes::Original(atts) => atts.iter().map(OwnedAttribute::borrow).collect(),
            Attributes::Projected(atts) => atts
                .iter()
                .map(|(name, value)| Attribute::new(Name::from(*name), value.as_str()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Attributes::Original(atts) => atts.len(),
            Attributes::Projected(atts) => atts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reduces the attribute set of table elements to what survives minimization.
///
/// Style references are replaced by their canonical key; references to
/// styles that were never collected are dropped.
pub fn project(tag: &Tag, original: Vec<OwnedAttribute>, names: &NameToCode) -> Attributes {
    match tag {
        Tag::Table { name } => Attributes::Projected(vec![(ATTR_TABLE_NAME, name.clone())]),
        Tag::TableColumn { style_name } => Attributes::Projected(
            names
                .rewrite(style_name.as_deref())
                .map(|key| (ATTR_TABLE_STYLE_NAME, key.to_string()))
                .into_iter()
                .collect(),
        ),
        Tag::TableRow => Attributes::Projected(vec![]),
        Tag::TableCell {
            style_name,
            columns_repeated,
        } => {
            let mut atts = vec![];
            if let Some(repeated) = columns_repeated.as_ref().filter(|r| !r.is_empty()) {
                atts.push((ATTR_COLUMNS_REPEATED, repeated.clone()));
            }
            if let Some(key) = names.rewrite(style_name.as_deref()) {
                atts.push((ATTR_TABLE_STYLE_NAME, key.to_string()));
            }
            Attributes::Projected(atts)
        }
        _ => Attributes::Original(original),
    }
}
