use xml::{attribute::OwnedAttribute, name::OwnedName};

use crate::error::Error;

pub const OFFICE_STYLES: &str = "office:styles";
pub const OFFICE_AUTOMATIC_STYLES: &str = "office:automatic-styles";
pub const CONFIG_ITEM: &str = "config:config-item";
pub const CONFIG_ITEM_SET: &str = "config:config-item-set";
pub const STYLE_STYLE: &str = "style:style";
pub const STYLE_TABLE_COLUMN_PROPERTIES: &str = "style:table-column-properties";
pub const STYLE_TABLE_CELL_PROPERTIES: &str = "style:table-cell-properties";
pub const STYLE_TEXT_PROPERTIES: &str = "style:text-properties";
pub const TABLE_TABLE: &str = "table:table";
pub const TABLE_COLUMN: &str = "table:table-column";
pub const TABLE_ROW: &str = "table:table-row";
pub const TABLE_CELL: &str = "table:table-cell";

pub const ATTR_CONFIG_NAME: &str = "config:name";
pub const ATTR_STYLE_NAME: &str = "style:name";
pub const ATTR_STYLE_FAMILY: &str = "style:family";
pub const ATTR_COLUMN_WIDTH: &str = "style:column-width";
pub const ATTR_COLOR: &str = "fo:color";
pub const ATTR_BACKGROUND_COLOR: &str = "fo:background-color";
pub const ATTR_TABLE_NAME: &str = "table:name";
pub const ATTR_TABLE_STYLE_NAME: &str = "table:style-name";
pub const ATTR_COLUMNS_REPEATED: &str = "table:number-columns-repeated";

/// A start element, reduced to the fields the minimizer looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    OfficeStyles,
    OfficeAutomaticStyles,
    ConfigItem {
        name: String,
    },
    ConfigItemSet {
        name: String,
    },
    /// `style:style`. Name and family are only required once the collector
    /// decides to record the definition.
    Style {
        name: Option<String>,
        family: Option<String>,
    },
    TableColumnProperties {
        column_width: Option<String>,
    },
    TableCellProperties {
        background_color: Option<String>,
    },
    TextProperties {
        color: Option<String>,
    },
    Table {
        name: String,
    },
    TableColumn {
        style_name: Option<String>,
    },
    TableRow,
    TableCell {
        style_name: Option<String>,
        columns_repeated: Option<String>,
    },
    Other {
        id: String,
    },
}

impl Tag {
    /// Qualified name as it appears in the document.
    pub fn id(&self) -> &str {
        match self {
            Tag::OfficeStyles => OFFICE_STYLES,
            Tag::OfficeAutomaticStyles => OFFICE_AUTOMATIC_STYLES,
            Tag::ConfigItem { .. } => CONFIG_ITEM,
            Tag::ConfigItemSet { .. } => CONFIG_ITEM_SET,
            Tag::Style { .. } => STYLE_STYLE,
            Tag::TableColumnProperties { .. } => STYLE_TABLE_COLUMN_PROPERTIES,
            Tag::TableCellProperties { .. } => STYLE_TABLE_CELL_PROPERTIES,
            Tag::TextProperties { .. } => STYLE_TEXT_PROPERTIES,
            Tag::Table { .. } => TABLE_TABLE,
            Tag::TableColumn { .. } => TABLE_COLUMN,
            Tag::TableRow => TABLE_ROW,
            Tag::TableCell { .. } => TABLE_CELL,
            Tag::Other { id } => id,
        }
    }
}

impl TryFrom<(&OwnedName, &Vec<OwnedAttribute>)> for Tag {
    type Error = Error;

    fn try_from(value: (&OwnedName, &Vec<OwnedAttribute>)) -> Result<Self, Self::Error> {
        let (name, atts) = value;
        let id = normalize(name);
        let tag = match id.as_str() {
            OFFICE_STYLES => Tag::OfficeStyles,
            OFFICE_AUTOMATIC_STYLES => Tag::OfficeAutomaticStyles,
            CONFIG_ITEM => Tag::ConfigItem {
                name: required(&id, atts, ATTR_CONFIG_NAME)?,
            },
            CONFIG_ITEM_SET => Tag::ConfigItemSet {
                name: required(&id, atts, ATTR_CONFIG_NAME)?,
            },
            STYLE_STYLE => Tag::Style {
                name: attribute(atts, ATTR_STYLE_NAME),
                family: attribute(atts, ATTR_STYLE_FAMILY),
            },
            STYLE_TABLE_COLUMN_PROPERTIES => Tag::TableColumnProperties {
                column_width: attribute(atts, ATTR_COLUMN_WIDTH),
            },
            STYLE_TABLE_CELL_PROPERTIES => Tag::TableCellProperties {
                background_color: attribute(atts, ATTR_BACKGROUND_COLOR),
            },
            STYLE_TEXT_PROPERTIES => Tag::TextProperties {
                color: attribute(atts, ATTR_COLOR),
            },
            TABLE_TABLE => Tag::Table {
                name: required(&id, atts, ATTR_TABLE_NAME)?,
            },
            TABLE_COLUMN => Tag::TableColumn {
                style_name: attribute(atts, ATTR_TABLE_STYLE_NAME),
            },
            TABLE_ROW => Tag::TableRow,
            TABLE_CELL => Tag::TableCell {
                style_name: attribute(atts, ATTR_TABLE_STYLE_NAME),
                columns_repeated: attribute(atts, ATTR_COLUMNS_REPEATED),
            },
            _ => Tag::Other { id },
        };
        Ok(tag)
    }
}

fn attribute(atts: &[OwnedAttribute], key: &str) -> Option<String> {
    atts.iter()
        .find(|&a| normalize(&a.name) == key)
        .map(|a| a.value.clone())
}

fn required(id: &str, atts: &[OwnedAttribute], key: &'static str) -> Result<String, Error> {
    attribute(atts, key).ok_or_else(|| Error::MissingAttribute {
        id: id.to_string(),
        missing: key,
    })
}

/// Renders a parsed name back to its `prefix:local` form.
pub fn normalize(raw: &OwnedName) -> String {
    let mut id = if let Some(prefix) = raw.prefix_ref() {
        prefix.to_string() + ":"
    } else {
        "".to_string()
    };
    id.push_str(&raw.local_name);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(id: &str) -> OwnedName {
        id.parse().expect("valid qualified name")
    }

    fn atts(pairs: &[(&str, &str)]) -> Vec<OwnedAttribute> {
        pairs
            .iter()
            .map(|(k, v)| OwnedAttribute::new(name(k), *v))
            .collect()
    }

    #[rstest]
    #[case("table:table-row", "table:table-row")]
    #[case("office:body", "office:body")]
    #[case("plain", "plain")]
    fn normalize_keeps_prefix(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(&name(raw)), expected);
    }

    #[test]
    fn cell_collects_typed_fields() {
        let tag = Tag::try_from((
            &name(TABLE_CELL),
            &atts(&[
                ("office:value-type", "float"),
                (ATTR_TABLE_STYLE_NAME, "ce1"),
                (ATTR_COLUMNS_REPEATED, "3"),
            ]),
        ))
        .unwrap();
        assert_eq!(
            tag,
            Tag::TableCell {
                style_name: Some("ce1".to_string()),
                columns_repeated: Some("3".to_string()),
            }
        );
    }

    #[rstest]
    #[case(CONFIG_ITEM, ATTR_CONFIG_NAME)]
    #[case(CONFIG_ITEM_SET, ATTR_CONFIG_NAME)]
    #[case(TABLE_TABLE, ATTR_TABLE_NAME)]
    fn missing_required_attribute(#[case] element: &str, #[case] attribute: &str) {
        let err = Tag::try_from((&name(element), &atts(&[]))).unwrap_err();
        match err {
            Error::MissingAttribute { id, missing } => {
                assert_eq!(id, element);
                assert_eq!(missing, attribute);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_elements_keep_their_name() {
        let tag = Tag::try_from((&name("text:p"), &atts(&[]))).unwrap();
        assert_eq!(tag.id(), "text:p");
    }
}
