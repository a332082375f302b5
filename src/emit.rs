use std::io::Write;

use xml::writer::{EventWriter, XmlEvent};

use crate::{
    styles::{StyleDefinition, StyleKey, StyleRegistry},
    tag::{
        ATTR_BACKGROUND_COLOR, ATTR_COLOR, ATTR_COLUMN_WIDTH, ATTR_STYLE_FAMILY, ATTR_STYLE_NAME,
        OFFICE_AUTOMATIC_STYLES, STYLE_STYLE, STYLE_TABLE_CELL_PROPERTIES,
        STYLE_TABLE_COLUMN_PROPERTIES, STYLE_TEXT_PROPERTIES,
    },
};

/// Writes the rebuilt `office:automatic-styles` block: one `style:style` per
/// registry entry, named by its key, in ascending key order.
pub fn automatic_styles<W: Write>(
    writer: &mut EventWriter<W>,
    registry: &StyleRegistry,
) -> xml::writer::Result<()> {
    writer.write(XmlEvent::start_element(OFFICE_AUTOMATIC_STYLES))?;
    for (key, definition) in registry {
        style(writer, key, definition)?;
    }
    writer.write(XmlEvent::end_element())
}

fn style<W: Write>(
    writer: &mut EventWriter<W>,
    key: &StyleKey,
    definition: &StyleDefinition,
) -> xml::writer::Result<()> {
    writer.write(
        XmlEvent::start_element(STYLE_STYLE)
            .attr(ATTR_STYLE_NAME, key.as_str())
            .attr(ATTR_STYLE_FAMILY, definition.family.as_str()),
    )?;
    if let Some(width) = &definition.column_width {
        property(writer, STYLE_TABLE_COLUMN_PROPERTIES, ATTR_COLUMN_WIDTH, width)?;
    }
    if let Some(color) = &definition.color {
        property(writer, STYLE_TEXT_PROPERTIES, ATTR_COLOR, color)?;
    }
    if let Some(color) = &definition.background_color {
        property(writer, STYLE_TABLE_CELL_PROPERTIES, ATTR_BACKGROUND_COLOR, color)?;
    }
    writer.write(XmlEvent::end_element())
}

fn property<W: Write>(
    writer: &mut EventWriter<W>,
    element: &str,
    attribute: &str,
    value: &str,
) -> xml::writer::Result<()> {
    writer.write(XmlEvent::start_element(element).attr(attribute, value))?;
    writer.write(XmlEvent::end_element())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StyleFamily;
    use xml::EmitterConfig;

    fn render(registry: &StyleRegistry) -> String {
        let mut writer = EmitterConfig::new()
            .write_document_declaration(false)
            .create_writer(Vec::new());
        automatic_styles(&mut writer, registry).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn empty_registry_emits_empty_container() {
        assert_eq!(render(&StyleRegistry::new()), "<office:automatic-styles />");
    }

    #[test]
    fn styles_are_sorted_by_key() {
        let mut registry = StyleRegistry::new();
        let mut cell = StyleDefinition::new(StyleFamily::TableCell);
        cell.color = Some("#000000".to_string());
        cell.background_color = Some("#FFFF00".to_string());
        let mut column = StyleDefinition::new(StyleFamily::TableColumn);
        column.column_width = Some("1.2in".to_string());
        registry.insert(column.key(), column);
        registry.insert(cell.key(), cell);

        assert_eq!(
            render(&registry),
            concat!(
                "<office:automatic-styles>",
                "<style:style style:name=\"3ce3e126352c5af3\" style:family=\"table-cell\">",
                "<style:text-properties fo:color=\"#000000\" />",
                "<style:table-cell-properties fo:background-color=\"#FFFF00\" />",
                "</style:style>",
                "<style:style style:name=\"4bccf3fcb993722e\" style:family=\"table-column\">",
                "<style:table-column-properties style:column-width=\"1.2in\" />",
                "</style:style>",
                "</office:automatic-styles>",
            )
        );
    }
}
