use std::fmt::Debug;

use crate::tag::Tag;

/// Elements that never reach the output, together with everything below them.
pub const SUPPRESSED_ELEMENTS: [&str; 10] = [
    "office:font-face-decls",
    "office:master-styles",
    "office:styles",
    "office:automatic-styles",
    "office:forms",
    "meta:creation-date",
    "meta:print-date",
    "meta:editing-cycles",
    "meta:editing-duration",
    "dc:date",
];

/// View-only settings dropped from `config:config-item`.
///
/// `PositionLeft` and `PositionRight` are absent on purpose: they carry the
/// frozen column split.
pub const BLOCKED_CONFIG_ITEMS: [&str; 36] = [
    "VisibleAreaTop",
    "VisibleAreaLeft",
    "VisibleAreaWidth",
    "VisibleAreaHeight",
    "CursorPositionX",
    "CursorPositionY",
    "ActiveSplitRange",
    "PositionTop",
    "PositionBottom",
    "ZoomType",
    "ZoomValue",
    "PageViewZoomValue",
    "ShowGrid",
    "AnchoredTextOverflowLegacy",
    "LegacySingleLineFontwork",
    "ConnectorUseSnapRect",
    "IgnoreBreakAfterMultilineField",
    "ActiveTable",
    "HorizontalScrollbarWidth",
    "ShowPageBreakPreview",
    "ShowZeroValues",
    "ShowNotes",
    "ShowFormulasMarks",
    "GridColor",
    "ShowPageBreaks",
    "FormulaBarHeight",
    "HasSheetTabs",
    "IsOutlineSymbolsSet",
    "IsValueHighlightingEnabled",
    "IsSnapToRaster",
    "RasterIsVisible",
    "RasterResolutionX",
    "RasterResolutionY",
    "RasterSubdivisionX",
    "RasterSubdivisionY",
    "IsRasterAxisSynchronized",
];

/// `config:config-item-set` holding the legacy OpenOffice settings.
pub const BLOCKED_CONFIG_ITEM_SET: &str = "ooo:configuration-settings";

/// Whether the element itself may be emitted, ignoring its ancestors.
pub fn keeps(tag: &Tag) -> bool {
    match tag {
        Tag::ConfigItem { name } => !BLOCKED_CONFIG_ITEMS.contains(&name.as_str()),
        Tag::ConfigItemSet { name } => name != BLOCKED_CONFIG_ITEM_SET,
        other => !SUPPRESSED_ELEMENTS.contains(&other.id()),
    }
}

/// One slot per open element; `false` elides the element and its subtree.
#[derive(Default)]
pub struct SuppressionStack {
    slots: Vec<bool>,
    max_depth: usize,
}

impl SuppressionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a slot for `tag` and reports whether it is emitted.
    pub fn enter(&mut self, tag: &Tag) -> bool {
        let emit = keeps(tag) && self.is_emitting();
        self.slots.push(emit);
        self.max_depth = self.max_depth.max(self.slots.len());
        emit
    }

    /// Closes the innermost slot, returning whether its element was emitted.
    pub fn exit(&mut self) -> bool {
        self.slots.pop().unwrap_or(true)
    }

    /// State of the innermost open element; the document level is always emitted.
    pub fn is_emitting(&self) -> bool {
        self.slots.last().copied().unwrap_or(true)
    }

    pub fn characters_allowed(&self) -> bool {
        self.is_emitting()
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Debug for SuppressionStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.slots.fmt(f)
    }
}
