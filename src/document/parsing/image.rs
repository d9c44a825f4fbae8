//! Image extraction and figure numbering
//!
//! One walk over the element stream: level-1 chapter headings move the
//! chapter number, `图…` captions wait for the next drawing, and each drawing
//! resolves its relationships into numbered images. A picture that cannot be
//! resolved is reported and skipped; the walk always completes.

use std::path::{Path, PathBuf};

use super::super::content::{ContentRef, DocumentContent, DrawingRef, ParagraphElement, Relationship};
use super::super::models::Image;
use super::numbering::{detect_chapter_marker, ChapterMarker, FigureNumbering};
use crate::error::ImageResolutionError;

/// Where image targets live and whether to check them
#[derive(Debug, Clone, Default)]
pub(crate) struct ImageLocator {
    pub(crate) base_dir: Option<PathBuf>,
    pub(crate) verify_targets: bool,
}

impl ImageLocator {
    fn locate(&self, target: &str) -> Result<PathBuf, ImageResolutionError> {
        match &self.base_dir {
            Some(dir) => {
                let path = dir.join(target);
                if self.verify_targets && !path.exists() {
                    return Err(ImageResolutionError::TargetNotFound(
                        path.to_string_lossy().to_string(),
                    ));
                }
                Ok(path)
            }
            None => Ok(PathBuf::from(target)),
        }
    }
}

/// Pictures found by the walk, plus what went wrong along the way
#[derive(Debug, Default)]
pub(crate) struct ImageExtraction {
    pub(crate) images: Vec<Image>,
    pub(crate) warnings: Vec<String>,
}

pub(crate) struct ImageAssociator<'a> {
    relationships: &'a [Relationship],
    locator: ImageLocator,
    numbering: FigureNumbering,
    pending_caption: Option<String>,
    extraction: ImageExtraction,
}

impl<'a> ImageAssociator<'a> {
    pub(crate) fn new(relationships: &'a [Relationship], locator: ImageLocator) -> Self {
        Self {
            relationships,
            locator,
            numbering: FigureNumbering::new(),
            pending_caption: None,
            extraction: ImageExtraction::default(),
        }
    }

    pub(crate) fn observe_paragraph(&mut self, para: &ParagraphElement) {
        let text = para.text.trim();
        if text.is_empty() {
            return;
        }

        if para.style.as_ref().and_then(|s| s.heading_level) == Some(1) {
            self.update_chapter(text);
        }

        let is_caption = match &para.style {
            Some(style) => style.is_caption() && text.starts_with('图'),
            None => text.starts_with('图'),
        };

        if is_caption {
            self.pending_caption = Some(text.to_string());
        } else if let Some(discarded) = self.pending_caption.take() {
            log::debug!("caption {discarded:?} is not followed by a picture, discarding");
        }
    }

    fn update_chapter(&mut self, text: &str) {
        match detect_chapter_marker(text) {
            Some(ChapterMarker::Number(chapter)) => {
                log::debug!("chapter {chapter} starts at {text:?}");
                self.numbering.enter_chapter(chapter);
            }
            Some(ChapterMarker::Unmapped(numeral)) => {
                let message = format!(
                    "chapter numeral {numeral:?} in {text:?} is not recognised, staying in chapter {}",
                    self.numbering.current_chapter()
                );
                log::warn!("{message}");
                self.extraction.warnings.push(message);
            }
            None => {}
        }
    }

    pub(crate) fn observe_drawing(&mut self, drawing: &DrawingRef) {
        let ids: Vec<String> = if drawing.relationship_ids.is_empty() {
            // No embedded reference: fall back to every picture of the part
            self.relationships
                .iter()
                .filter(|r| r.is_image())
                .map(|r| r.id.clone())
                .collect()
        } else {
            drawing.relationship_ids.clone()
        };

        for id in ids {
            match self.resolve(&id, drawing) {
                Ok(image) => {
                    self.extraction.images.push(image);
                    self.numbering.advance();
                }
                Err(err) => {
                    let message = format!("skipping image: {err}");
                    log::warn!("{message}");
                    self.extraction.warnings.push(message);
                }
            }
        }
    }

    fn resolve(&mut self, id: &str, drawing: &DrawingRef) -> Result<Image, ImageResolutionError> {
        let relationships = self.relationships;
        let relationship = relationships
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ImageResolutionError::MissingRelationship(id.to_string()))?;

        if !relationship.is_image() {
            return Err(ImageResolutionError::NotAnImage {
                id: id.to_string(),
                target: relationship.target.clone(),
            });
        }

        let path = self.locator.locate(&relationship.target)?;
        let number = self.numbering.peek();
        let caption = self
            .pending_caption
            .take()
            .unwrap_or_else(|| number.default_caption());

        Ok(Image {
            path: path_string(&path),
            caption: Some(caption),
            figure_number: number.label(),
            relationship_id: Some(relationship.id.clone()),
            width: drawing.extent.map(|(w, _)| w),
            height: drawing.extent.map(|(_, h)| h),
        })
    }

    pub(crate) fn collect(mut self, content: &DocumentContent) -> ImageExtraction {
        for element in content.elements() {
            match element {
                ContentRef::Paragraph(para) => self.observe_paragraph(para),
                ContentRef::Drawing(drawing) => self.observe_drawing(drawing),
                ContentRef::Table(_) => {}
            }
        }
        self.extraction
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
