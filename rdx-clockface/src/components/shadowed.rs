//! Main/shadow element pairs that are always written together.

use crate::common::ElementId;
use crate::error::FaceError;
use crate::host::DocumentTree;

fn resolve(document: &dyn DocumentTree, name: String) -> Result<ElementId, FaceError> {
    document
        .element_id(&name)
        .ok_or(FaceError::ElementNotFound(name))
}

/// A label drawn twice, once as a drop shadow.
///
/// Resolves `{name}LabelMain` and `{name}LabelShadow`.
#[derive(Debug, Clone, Copy)]
pub struct ShadowedLabel {
    main: ElementId,
    shadow: ElementId,
}

impl ShadowedLabel {
    pub fn new(document: &dyn DocumentTree, name: &str) -> Result<Self, FaceError> {
        Ok(Self {
            main: resolve(document, format!("{name}LabelMain"))?,
            shadow: resolve(document, format!("{name}LabelShadow"))?,
        })
    }

    pub fn set_text(&self, document: &mut dyn DocumentTree, text: &str) {
        document.set_text(self.main, text);
        document.set_text(self.shadow, text);
    }
}

/// An icon drawn twice, once as a drop shadow.
///
/// Resolves `{name}IconMain` and `{name}IconShadow`.
#[derive(Debug, Clone, Copy)]
pub struct ShadowedIcon {
    main: ElementId,
    shadow: ElementId,
}

impl ShadowedIcon {
    pub fn new(document: &dyn DocumentTree, name: &str) -> Result<Self, FaceError> {
        Ok(Self {
            main: resolve(document, format!("{name}IconMain"))?,
            shadow: resolve(document, format!("{name}IconShadow"))?,
        })
    }

    pub fn set_icon(&self, document: &mut dyn DocumentTree, file_name: &str) {
        document.set_href(self.main, file_name);
        document.set_href(self.shadow, file_name);
    }
}
