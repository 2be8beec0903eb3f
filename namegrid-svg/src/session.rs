//! One editing session: the current template and the latest grid built from it.

use namegrid_core::constants::{DEFAULT_FILE_NAME, FILE_NAME_SUFFIX};
use namegrid_core::{
    FormInputs, LabelFitter, NameList, Notice, TemplateDefaults, TextMeasurer, compute_layout,
};

use crate::assemble::{GridDocument, assemble};
use crate::error::Result;
use crate::normalize::{BoxMeasurer, NormalizedTemplate};
use crate::template::Template;

/// A template together with everything derived from it at upload time.
#[derive(Clone, Debug)]
pub struct LoadedTemplate {
    pub template: Template,
    pub normalized: NormalizedTemplate,
    pub defaults: TemplateDefaults,
    /// Measurement problems met while loading.
    pub notices: Vec<Notice>,
}

/// Result of one successful layout pass.
#[derive(Clone, Debug)]
pub struct GridOutput {
    pub document: GridDocument,
    pub svg: String,
    pub notices: Vec<Notice>,
    pub file_name: String,
}

/// `badge.svg` becomes `badge-name-tags.svg`. A leading dot does not start an
/// extension.
pub fn output_file_name(upload_name: &str) -> String {
    let base = match upload_name.rfind('.') {
        Some(i) if i > 0 => &upload_name[..i],
        _ => upload_name,
    };
    format!("{base}{FILE_NAME_SUFFIX}")
}

pub struct Session {
    text_measurer: Box<dyn TextMeasurer>,
    box_measurer: Box<dyn BoxMeasurer>,
    fitter: LabelFitter,
    template: Option<LoadedTemplate>,
    file_name: String,
    last_output: Option<GridOutput>,
}

impl Session {
    pub fn new(text_measurer: Box<dyn TextMeasurer>, box_measurer: Box<dyn BoxMeasurer>) -> Self {
        Self {
            text_measurer,
            box_measurer,
            fitter: LabelFitter::default(),
            template: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            last_output: None,
        }
    }

    pub fn with_fitter(mut self, fitter: LabelFitter) -> Self {
        self.fitter = fitter;
        self
    }

    /// Parse and normalize a new template. On failure the previous template
    /// and file name stay in place.
    pub fn load_template(&mut self, file_name: Option<&str>, svg_text: &str) -> Result<&LoadedTemplate> {
        let template = Template::parse(svg_text)?;
        let mut notices = Vec::new();
        let (normalized, notice) = NormalizedTemplate::new(&template, self.box_measurer.as_ref());
        notices.extend(notice);
        let (defaults, notice) = normalized.defaults(self.text_measurer.as_ref());
        notices.extend(notice);

        if let Some(name) = file_name.filter(|n| !n.is_empty()) {
            self.file_name = output_file_name(name);
        }
        tracing::debug!(
            file_name = %self.file_name,
            width = template.width,
            height = template.height,
            bbox_x = normalized.bbox.x,
            bbox_y = normalized.bbox.y,
            "template loaded"
        );
        Ok(&*self.template.insert(LoadedTemplate {
            template,
            normalized,
            defaults,
            notices,
        }))
    }

    pub fn template(&self) -> Option<&LoadedTemplate> {
        self.template.as_ref()
    }

    pub fn defaults(&self) -> TemplateDefaults {
        self.template
            .as_ref()
            .map(|t| t.defaults)
            .unwrap_or_default()
    }

    /// Suggested download name for the grid.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn last_output(&self) -> Option<&GridOutput> {
        self.last_output.as_ref()
    }

    /// Recompute the whole grid from the current form values.
    ///
    /// Returns `Ok(None)` while no template is loaded. An error leaves the
    /// previous output untouched.
    pub fn rebuild(&mut self, form: &FormInputs) -> Result<Option<&GridOutput>> {
        let Some(loaded) = &self.template else {
            tracing::debug!("no template loaded, skipping layout");
            return Ok(None);
        };

        let (sizing, mut notices) = form.resolve(&loaded.defaults);
        let names = NameList::parse(&form.names);
        if names.is_empty() {
            notices.push(Notice::EmptyNameList);
        }
        let layout = compute_layout(
            names.len(),
            sizing.cell_width,
            loaded.normalized.width,
            loaded.normalized.height,
            sizing.page_width,
        );
        let document: GridDocument = assemble(
            &names,
            &layout,
            Some(&loaded.normalized),
            &sizing,
            &self.fitter,
            self.text_measurer.as_ref(),
        )?;

        let output = GridOutput {
            svg: document.to_svg_string(),
            document,
            notices,
            file_name: self.file_name.clone(),
        };
        Ok(Some(&*self.last_output.insert(output)))
    }
}
