use std::sync::Arc;

pub mod charset;
pub mod loader;
pub mod replace;
pub mod ruby;

// Re-export the pipeline entry points for convenient access
pub use charset::{LetterForm, normalize};
pub use replace::{
    CapacityReport, Conversion, ConvertError, ConvertResult, RuleBundle, SubstitutionRule,
    run_parallel, run_single_pass,
};
pub use ruby::{CharWidthTable, OutputFormat, format_gloss_pair};

/// Converts Esperanto text with one rule bundle and one set of output options
pub struct Converter {
    bundle: Arc<RuleBundle>,
    format: OutputFormat,
    letters: LetterForm,
    workers: usize,
}

impl Converter {
    pub fn new(bundle: RuleBundle) -> Self {
        Converter {
            bundle: Arc::new(bundle),
            format: OutputFormat::default(),
            letters: LetterForm::default(),
            workers: 1,
        }
    }

    pub fn with_format(&mut self, format: OutputFormat) -> &mut Self {
        self.format = format;
        self
    }

    pub fn with_letter_form(&mut self, letters: LetterForm) -> &mut Self {
        self.letters = letters;
        self
    }

    pub fn with_workers(&mut self, workers: usize) -> &mut Self {
        self.workers = workers.max(1);
        self
    }

    pub fn get_format(&self) -> OutputFormat {
        self.format
    }

    pub fn get_bundle(&self) -> &RuleBundle {
        &self.bundle
    }

    fn finish(&self, mut conversion: Conversion) -> Conversion {
        if self.format.is_sized() {
            conversion.text = ruby::collapse_identical_ruby(&conversion.text);
        }
        conversion.text = self.letters.apply(&conversion.text);
        conversion
    }

    /// Convert on the current thread.
    pub fn convert(&self, text: &str) -> Conversion {
        self.finish(run_single_pass(text, &self.bundle, self.format))
    }

    /// Convert using the configured number of workers.
    pub async fn convert_parallel(&self, text: &str) -> ConvertResult<Conversion> {
        let conversion =
            run_parallel(text, self.workers, Arc::clone(&self.bundle), self.format).await?;
        Ok(self.finish(conversion))
    }

    /// Wrap converted text in the page chrome for the configured format.
    pub fn render_document(&self, body: &str) -> String {
        ruby::wrap_document(body, self.format)
    }
}
