use std::{borrow::Cow, io::Read, io::Write};

use xml::{
    attribute::OwnedAttribute,
    common::XmlVersion,
    name::OwnedName,
    namespace::Namespace,
    reader,
    writer::{self, EventWriter},
    EmitterConfig, ParserConfig,
};

use crate::{
    emit,
    error::Result,
    rewrite,
    scope::Scopes,
    styles::StyleCollector,
    suppress::SuppressionStack,
    tag::{normalize, Tag, OFFICE_AUTOMATIC_STYLES},
};

/// Counters for a single streaming pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub starts: usize,
    pub characters: usize,
    pub ends: usize,
    pub max_depth: usize,
}

/// Reader settings shared by both passes over a document.
pub fn parser_config() -> ParserConfig {
    ParserConfig::new()
        .trim_whitespace(false)
        .cdata_to_characters(true)
        .ignore_comments(true)
}

/// State for minimizing one document. Never reused across files.
pub struct Minimizer<W: Write> {
    writer: EventWriter<W>,
    stack: SuppressionStack,
    scopes: Scopes,
    styles: StyleCollector,
    stats: Stats,
}

impl<W: Write> Minimizer<W> {
    pub fn new(sink: W) -> Minimizer<W> {
        let writer = EmitterConfig::new()
            .perform_indent(false)
            .write_document_declaration(true)
            .create_writer(sink);
        Minimizer {
            writer,
            stack: SuppressionStack::new(),
            scopes: Scopes::new(),
            styles: StyleCollector::new(),
            stats: Stats::default(),
        }
    }

    /// Streams `source` through the filters into the sink.
    pub fn run<R: Read>(mut self, source: R) -> Result<(W, Stats)> {
        let mut parser = parser_config().create_reader(source);
        loop {
            match parser.next()? {
                reader::XmlEvent::StartDocument {
                    version,
                    standalone,
                    ..
                } => {
                    log::trace!("StartDocument {version}");
                    self.start_document(version, standalone)?;
                }
                reader::XmlEvent::StartElement {
                    name,
                    attributes,
                    namespace,
                } => self.start_element(&name, attributes, &namespace)?,
                reader::XmlEvent::EndElement { name } => self.end_element(&name)?,
                reader::XmlEvent::Characters(content) | reader::XmlEvent::Whitespace(content) => {
                    self.characters(&content)?
                }
                reader::XmlEvent::EndDocument => break,
                event => log::trace!("Skipping {event:?}"),
            }
        }
        self.stats.max_depth = self.stack.max_depth();
        Ok((self.writer.into_inner(), self.stats))
    }

    fn start_document(&mut self, version: XmlVersion, standalone: Option<bool>) -> Result<()> {
        self.writer.write(writer::XmlEvent::StartDocument {
            version,
            encoding: Some("UTF-8"),
            standalone,
        })?;
        Ok(())
    }

    fn start_element(
        &mut self,
        name: &OwnedName,
        attributes: Vec<OwnedAttribute>,
        namespace: &Namespace,
    ) -> Result<()> {
        let tag = Tag::try_from((name, &attributes))?;
        self.styles.start(&tag)?;
        let introduced = self.scopes.enter(namespace);
        if !self.stack.enter(&tag) {
            log::trace!("Suppressed {} at depth {}", tag.id(), self.stack.depth());
            return Ok(());
        }
        let attributes = rewrite::project(&tag, attributes, self.styles.names());
        self.writer.write(writer::XmlEvent::StartElement {
            name: name.borrow(),
            attributes: Cow::Owned(attributes.as_writer()),
            namespace: Cow::Owned(introduced),
        })?;
        self.stats.starts += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &OwnedName) -> Result<()> {
        let id = normalize(name);
        self.styles.end(&id);
        self.scopes.exit();
        let emitted = self.stack.exit();
        if id == OFFICE_AUTOMATIC_STYLES {
            if self.stack.is_emitting() {
                emit::automatic_styles(&mut self.writer, self.styles.registry())?;
            }
        } else if emitted {
            self.writer.write(writer::XmlEvent::end_element())?;
            self.stats.ends += 1;
        }
        Ok(())
    }

    fn characters(&mut self, content: &str) -> Result<()> {
        if self.stack.characters_allowed() {
            self.writer.write(writer::XmlEvent::characters(content))?;
            self.stats.characters += 1;
        }
        Ok(())
    }
}
